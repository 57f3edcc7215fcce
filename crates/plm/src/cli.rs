use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plm", version, about = "License and update client for self-hosted plugins")]
pub struct Cli {
    /// Settings file to use instead of the per-user one.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write a settings template if none exists yet.
    Init,
    /// Show license details from the license server.
    Info { license_key: Option<String> },
    /// Validate a license key.
    Validate { license_key: Option<String> },
    /// Activate a license key and remember the activation.
    Activate { license_key: Option<String> },
    /// Print the latest release information.
    Release {
        /// Bypass the cached response.
        #[arg(long)]
        force: bool,
    },
    /// Check whether a newer release is available.
    CheckUpdate {
        /// Bypass the cached response.
        #[arg(long)]
        force: bool,
    },
    /// Print the plugin details shown in the update dialog.
    PluginInfo,
    /// Move an extracted update package into place.
    Install {
        /// Directory the package was extracted to.
        package_dir: PathBuf,
    },
    /// Show the plugin slug and whether its license is activated.
    Status,
}
