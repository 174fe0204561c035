//! barcart - a terminal cocktail recipe finder.
//!
//! Describe a drink, look up the best-matching recipe on TheCocktailDB,
//! and keep a local list of favorites. Lookups are cached on disk forever.

mod app;
mod form;
mod ui;
mod utils;

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use barcart_core::Config;

use app::{open_services, App, AppState, Favorites, Lookup};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "barcart.log";

#[derive(Parser, Debug)]
#[command(name = "barcart", version, about = "Find cocktail recipes and keep your favorites")]
struct Cli {
    /// Look up one recipe by name, print it as JSON and exit
    #[arg(long, value_name = "NAME")]
    lookup: Option<String>,

    /// With --lookup, also append the recipe to favorites
    #[arg(long, requires = "lookup")]
    save: bool,

    /// Print the favorites list as JSON and exit
    #[arg(long, conflicts_with = "lookup")]
    favorites: bool,

    /// Keep the recipe cache and favorites in memory only
    #[arg(long)]
    no_persist: bool,
}

/// Initialize the tracing subscriber.
///
/// With a log directory, output goes to a file so it never draws over the TUI.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(dir) = log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
        return None;
    };

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e:#}; using default configuration");
            let mut config = Config::default();
            config.apply_env(|name| std::env::var(name).ok());
            config
        }
    };

    if cli.favorites {
        init_tracing(None);
        return print_favorites(&config, !cli.no_persist);
    }
    if let Some(ref name) = cli.lookup {
        init_tracing(None);
        return lookup_once(&config, name, cli.save, !cli.no_persist).await;
    }

    let log_dir = config.cache_dir().ok();
    let _guard = init_tracing(log_dir.as_deref());
    info!("barcart starting");

    let mut app = App::new(config, !cli.no_persist)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        return Ok(ExitCode::FAILURE);
    }

    info!("barcart shutting down");
    Ok(ExitCode::SUCCESS)
}

/// One lookup from the command line; prints the recipe as pretty JSON.
async fn lookup_once(config: &Config, name: &str, save: bool, persist: bool) -> Result<ExitCode> {
    let (mut lookup, mut favorites) = open_services(config, persist)?;
    let found = run_lookup(
        &mut lookup,
        &mut favorites,
        name,
        save,
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await?;
    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Look up `name`, write the recipe JSON to `out` and notes to `err`.
/// Returns false when no recipe was found.
async fn run_lookup(
    lookup: &mut Lookup,
    favorites: &mut Favorites,
    name: &str,
    save: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool> {
    let recipe = match lookup.lookup(name).await {
        Ok(recipe) => recipe,
        Err(e) => {
            debug!(query = name, error = %e, "Lookup failed");
            writeln!(err, "{}", e.user_message())?;
            return Ok(false);
        }
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&recipe)?)?;

    if save {
        let recipe_name = recipe.name.clone();
        favorites.save(recipe)?;
        writeln!(err, "Saved {recipe_name} to favorites ({} total)", favorites.len())?;
    }
    Ok(true)
}

fn print_favorites(config: &Config, persist: bool) -> Result<ExitCode> {
    let (_, favorites) = open_services(config, persist)?;
    write_favorites(&favorites, &mut io::stdout())?;
    Ok(ExitCode::SUCCESS)
}

fn write_favorites(favorites: &Favorites, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&favorites.load())?)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so background lookups get picked up
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release events on platforms that report them
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key) {
                    return Ok(());
                }
            }
        }

        // Check for completed background lookups
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
