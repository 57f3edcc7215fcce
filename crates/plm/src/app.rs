use plm_core::{
    ApiResult, LicenseClient, PLUGIN_INFORMATION_ACTION, ReleaseData, ReqwestTransport,
    RequestContext, TransportError, UpdateHooks,
};
use plm_host::{
    HookExtra, HostError, HostServices, InstallResult, PluginInfoArgs, UpdateTransient,
};
use plm_platform::{AppPaths, FileCacheStore, FileOptionStore, FsFileMover, FsPluginRegistry};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cli::Command;
use crate::settings::AppSettings;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Wire the license client to the filesystem host under `paths`.
pub fn build_client(settings: &AppSettings, paths: &AppPaths) -> Result<LicenseClient, AppError> {
    let missing = settings.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::MissingSettings(missing));
    }

    let options = Arc::new(FileOptionStore::new(paths.options_file()));
    let host = HostServices {
        cache: Arc::new(FileCacheStore::new(paths.transients_file())),
        options: options.clone(),
        registry: Arc::new(FsPluginRegistry::new(settings.plugins_dir(), options)),
        files: Arc::new(FsFileMover::new(settings.plugins_dir())),
    };
    let transport = ReqwestTransport::new(Duration::from_secs(settings.http_timeout_secs))?;

    Ok(LicenseClient::new(
        settings.client_config(),
        Arc::new(transport),
        host,
    ))
}

/// Run one command, writing its result to `out`.
///
/// Returns `false` when the license server reported an error.
pub async fn execute(
    client: &LicenseClient,
    command: Command,
    out: &mut impl Write,
) -> Result<bool, AppError> {
    match command {
        Command::Info { license_key } => {
            print_api_result(out, client.get_info(license_key.as_deref()).await)
        }
        Command::Validate { license_key } => {
            print_api_result(out, client.validate(license_key.as_deref()).await)
        }
        Command::Activate { license_key } => {
            print_api_result(out, client.activate(license_key.as_deref()).await)
        }
        Command::Release { force } => {
            let release = client.get_release_info(force).await;
            print_json(out, &release)?;
            Ok(ReleaseData::from_response(&release).is_some())
        }
        Command::CheckUpdate { force } => {
            let request = RequestContext { force_check: force };
            let transient = client
                .set_transient(UpdateTransient::empty_response(), &request)
                .await;
            let slug = client.slug();
            match transient.update_for(&slug) {
                Some(update) => print_json(out, update)?,
                None => writeln!(out, "No update available for {slug}")?,
            }
            Ok(true)
        }
        Command::PluginInfo => {
            let slug = client.slug();
            let info = client
                .set_plugin_info(
                    None,
                    PLUGIN_INFORMATION_ACTION,
                    &PluginInfoArgs::for_slug(slug.clone()),
                )
                .await;
            match info {
                Some(info) => {
                    print_json(out, &info)?;
                    Ok(true)
                }
                None => {
                    writeln!(out, "No release information available for {slug}")?;
                    Ok(false)
                }
            }
        }
        Command::Install { package_dir } => {
            let hook_extra = HookExtra {
                plugin: Some(client.slug()),
                kind: Some("plugin".to_string()),
                action: Some("update".to_string()),
            };
            let result = InstallResult {
                destination: package_dir,
                ..InstallResult::default()
            };
            let result = client.post_install(true, &hook_extra, result).await?;
            writeln!(out, "Installed to {}", result.destination.display())?;
            Ok(true)
        }
        Command::Init => {
            writeln!(out, "Settings are already complete")?;
            Ok(true)
        }
        Command::Status => {
            let status = Status {
                slug: client.slug(),
                activated: client.is_activated(),
            };
            print_json(out, &status)?;
            Ok(true)
        }
    }
}

#[derive(Serialize)]
struct Status {
    slug: String,
    activated: bool,
}

fn print_api_result(out: &mut impl Write, result: ApiResult) -> Result<bool, AppError> {
    match result {
        Ok(payload) => {
            print_json(out, &payload)?;
            Ok(true)
        }
        Err(error) => {
            print_json(out, &error)?;
            Ok(false)
        }
    }
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
