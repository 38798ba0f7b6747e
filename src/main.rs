//! audit-settings
//!
//! Loads an audit-protocol settings file the same way the services do at
//! startup. Exits non-zero when the file cannot be read or decoded.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use audit_settings::config::{Settings, SettingsProfile};
use audit_settings::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "audit-settings")]
#[command(about = "Load and check audit-protocol service settings", long_about = None)]
struct Cli {
    /// Service family the settings are loaded for.
    #[arg(short, long, value_enum, default_value_t = SettingsProfile::Auditor)]
    profile: SettingsProfile,

    /// Print the defaulted settings as JSON.
    #[arg(long)]
    print: bool,

    /// Path to the settings JSON file.
    path: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    tracing::info!("audit-settings v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::load(&cli.path, cli.profile) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Settings could not be loaded, aborting startup");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        retry_count = settings.retry_count(),
        unbounded_retries = settings.retries_unbounded(),
        rate_limits = settings.rate_limits().len(),
        "Settings loaded"
    );

    if cli.print {
        match serde_json::to_string_pretty(&settings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode settings");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
