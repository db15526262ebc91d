//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookstore_core` wiring against the database named by
//!   `DATABASE_URL`.
//! - Print a short, deterministic catalog summary.
//!
//! Set `BOOKSTORE_LOG_DIR` to an absolute directory to enable file logging.

use bookstore_core::{
    core_version, default_log_level, init_logging, BookstoreService, DatabaseConfig,
    DatabaseLocation,
};
use log::error;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "BOOKSTORE_LOG_DIR";

fn main() -> ExitCode {
    println!("bookstore_core version={}", core_version());

    if let Some(log_dir) = std::env::var(LOG_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
    {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = DatabaseConfig::from_env().map_err(|err| format!("config error: {err}"))?;
    match &config.location {
        DatabaseLocation::InMemory => println!("database=memory"),
        DatabaseLocation::File(path) => println!("database={}", path.display()),
    }

    let conn = config
        .open()
        .map_err(|err| format!("database open failed: {err}"))?;
    let service =
        BookstoreService::sqlite(&conn).map_err(|err| format!("repository init failed: {err}"))?;

    let categories = service
        .list_categories()
        .map_err(|err| format!("listing categories failed: {err}"))?;
    println!("categories={}", categories.len());
    for category in &categories {
        println!("  {} {}", category.id, category.name);
    }

    Ok(())
}
