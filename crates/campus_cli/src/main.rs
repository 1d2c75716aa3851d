//! CLI probe for the campus core.
//!
//! # Responsibility
//! - Verify `campus_core` linkage and print version info.
//! - Open the configured record store (creating an empty document on first
//!   use) and print collection counts.
//!
//! Usage: `campus_cli [config.json]`. `CAMPUS_*` environment variables
//! override file values.

use campus_core::{init_logging_from_config, CampusApi, CoreConfig, RecordStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("campus_core ping={}", campus_core::ping());
    println!("campus_core version={}", campus_core::core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), String> {
    let config = match config_path {
        Some(path) => CoreConfig::from_json_file(path).map_err(|err| err.to_string())?,
        None => CoreConfig::default(),
    }
    .apply_env()
    .map_err(|err| err.to_string())?;

    init_logging_from_config(&config).map_err(|err| err.to_string())?;

    let api = CampusApi::open(&config).map_err(|err| err.to_string())?;
    let document = api.store().load().map_err(|err| err.to_string())?;

    println!("data_file={}", config.data_file.display());
    println!("backend={:?}", config.backend);
    println!(
        "students={} colleges={}",
        document.students.len(),
        document.colleges.len()
    );
    Ok(())
}
