//! Binary entry point that glues the SQLite-backed song library to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we bring up logging and the database, hydrate the
//! initial app state, and drive the Ratatui event loop until the user exits.
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};

use cantica::{config, data_dir, fetch_service, fetch_songs, open_database, run_app, App};

/// Initialize persistence, load cached data, and launch the Ratatui event
/// loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// the user removing the writable data directory) to the terminal instead of
/// crashing silently.
fn main() -> Result<()> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).context("failed to create data directory")?;
    init_logging(&dir)?;

    let conn = open_database()?;
    let config = match config::load(&dir) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default configuration");
            config::Config::default()
        }
    };

    let songs = fetch_songs(&conn)?;
    let service = fetch_service(&conn)?;
    tracing::info!(
        songs = songs.len(),
        service = service.len(),
        "library loaded"
    );

    let mut app = App::new(conn, dir, config, songs, service);
    run_app(&mut app)
}

/// Log to a file inside the data directory; writing to stdout would corrupt
/// the alternate screen the TUI runs in.
fn init_logging(dir: &Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("cantica.log"))
        .context("failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
