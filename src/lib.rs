pub mod app;
pub mod config;
pub mod governance;
pub mod typewriter;
pub mod ui;
