use anyhow::Result;
use evgg_console::{app, config};
use clap::Parser;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

#[derive(Parser)]
#[command(
    name = "evgg-console",
    about = "EVGG - AI governance console for faculty, students, and compliance admins",
    version
)]
struct Cli {
    /// Governance service base URL (overrides config file and EVGG_API_BASE)
    #[arg(long)]
    base_url: Option<String>,

    /// Default course shown on the admin and copilot screens
    #[arg(long)]
    course: Option<String>,

    /// Default student pseudonym for the dashboard and transparency screens
    #[arg(long)]
    pseudonym: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::ConsoleConfig::load()?;
    if let Some(base) = cli.base_url {
        config.base_url = base;
    }
    if let Some(course) = cli.course {
        config.default_course = course;
    }
    if let Some(pseudonym) = cli.pseudonym {
        config.default_pseudonym = pseudonym;
    }

    // Log to a file so the alternate screen stays clean.
    config::init_logging();
    tracing::info!(base_url = %config.base_url, "starting console");

    // Initialize terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let mut app = app::App::new(config)?;
    let result = app.run(&mut terminal);

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
