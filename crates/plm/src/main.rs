mod app;
mod cli;
mod logging;
mod settings;

use clap::Parser;
use plm_platform::AppPaths;
use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::settings::AppSettings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match AppPaths::new() {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("error: {error}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(error) = paths.ensure_dirs() {
        eprintln!("error: cannot create application directories: {error}");
        return ExitCode::FAILURE;
    }

    let settings_path = cli.config.clone().unwrap_or_else(|| paths.settings_file());
    let settings = AppSettings::load_from_path(&settings_path);
    logging::init_logging(
        &paths.log_file(),
        settings.debug_logging || cli.verbose,
        settings.max_log_size_bytes,
    );
    log::debug!("Using settings from {}", settings_path.display());

    if matches!(cli.command, Command::Init) && !settings.missing_fields().is_empty() {
        if settings_path.exists() {
            eprintln!(
                "Fill in {} in {}",
                settings.missing_fields().join(", "),
                settings_path.display()
            );
            return ExitCode::FAILURE;
        }
        return match settings.save_to_path(&settings_path) {
            Ok(()) => {
                println!("Wrote settings template to {}", settings_path.display());
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: cannot write {}: {error}", settings_path.display());
                ExitCode::FAILURE
            }
        };
    }

    let client = match app::build_client(&settings, &paths) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("error: {error} (settings file: {})", settings_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match app::execute(&client, cli.command, &mut stdout).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            log::warn!("Command failed: {error}");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
