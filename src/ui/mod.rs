pub mod admin_view;
pub mod copilot_view;
pub mod dashboard_view;
pub mod help_view;
pub mod home_view;
pub mod layout;
pub mod policies_view;
pub mod selftest_view;
pub mod status_bar;
pub mod title_bar;
pub mod transparency_view;
