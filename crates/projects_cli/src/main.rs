//! Interactive entry point for the projects manager.
//!
//! # Responsibility
//! - Load configuration and start file logging.
//! - Verify the database opens before handing control to the menu.

mod config;
mod console;
mod shell;

use anyhow::{Context, Result};
use config::Config;
use console::Console;
use log::info;
use projects_core::db::open_db;
use projects_core::{Gateway, ProjectService, SqliteProjectRepository};
use shell::Shell;

fn main() -> Result<()> {
    let config = Config::load()?;

    let log_dir = config.log_dir()?;
    let log_dir = log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    projects_core::init_logging(config.log_level(), log_dir)
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging")?;

    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    // Fail fast on an unreadable file or a schema from a newer release.
    drop(
        open_db(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?,
    );
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        projects_core::core_version()
    );

    let service = ProjectService::new(SqliteProjectRepository::new(Gateway::new(db_path)));
    let console = Console::new(std::io::stdin().lock(), std::io::stdout());
    Shell::new(service, console)
        .run()
        .context("Terminal I/O failed")?;

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}
