use async_trait::async_trait;
use log::{debug, info, warn};
use plm_host::{
    HookExtra, HostError, InstallResult, PluginInfo, PluginInfoArgs, PluginUpdate,
    UpdateTransient,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::client::LicenseClient;
use crate::release::ReleaseData;
use crate::version::is_newer_version;

/// Filter run before the host stores its plugin update transient.
pub const HOOK_UPDATE_TRANSIENT: &str = "pre_set_site_transient_update_plugins";
/// Filter answering the host's plugin-details requests.
pub const HOOK_PLUGINS_API: &str = "plugins_api";
/// Filter run after the host extracted an update package.
pub const HOOK_POST_INSTALL: &str = "upgrader_post_install";

/// The plugins API action the details dialog asks for.
pub const PLUGIN_INFORMATION_ACTION: &str = "plugin_information";

/// Query parameter a user sets to force a fresh update check.
pub const FORCE_CHECK_PARAM: &str = "force-check";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookRegistration {
    pub hook: &'static str,
    pub priority: i32,
    pub accepted_args: u8,
}

/// What the inbound host request asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub force_check: bool,
}

impl RequestContext {
    /// Read the force-check signal from query parameters. Empty values and
    /// `"0"` do not count.
    pub fn from_query<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let force_check = params
            .into_iter()
            .any(|(name, value)| name == FORCE_CHECK_PARAM && !value.is_empty() && value != "0");
        Self { force_check }
    }
}

/// Callbacks the host's plugin-update pipeline invokes.
#[async_trait]
pub trait UpdateHooks: Send + Sync {
    fn registrations(&self) -> Vec<HookRegistration> {
        vec![
            HookRegistration {
                hook: HOOK_UPDATE_TRANSIENT,
                priority: 10,
                accepted_args: 1,
            },
            HookRegistration {
                hook: HOOK_PLUGINS_API,
                priority: 10,
                accepted_args: 3,
            },
            HookRegistration {
                hook: HOOK_POST_INSTALL,
                priority: 10,
                accepted_args: 3,
            },
        ]
    }

    /// Add this plugin's update, if any, to the host's update transient.
    async fn set_transient(
        &self,
        transient: UpdateTransient,
        request: &RequestContext,
    ) -> UpdateTransient;

    /// Answer a plugin-details request for this plugin.
    async fn set_plugin_info(
        &self,
        res: Option<PluginInfo>,
        action: &str,
        args: &PluginInfoArgs,
    ) -> Option<PluginInfo>;

    /// Move a freshly extracted update into the plugin's own directory.
    ///
    /// # Errors
    /// Returns the host error when the package cannot be moved.
    async fn post_install(
        &self,
        success: bool,
        hook_extra: &HookExtra,
        result: InstallResult,
    ) -> Result<InstallResult, HostError>;
}

#[async_trait]
impl UpdateHooks for LicenseClient {
    async fn set_transient(
        &self,
        mut transient: UpdateTransient,
        request: &RequestContext,
    ) -> UpdateTransient {
        if transient.response.is_none() {
            return transient;
        }

        let force_check = !self.api_update_called() && request.force_check;
        let slug = self.slug();
        let Some(plugin) = self.host.registry.plugin_data(self.plugin_file()) else {
            debug!("No plugin data for {slug}, skipping update check");
            return transient;
        };

        let response = self.get_release_info(force_check).await;
        let Some(release) = ReleaseData::from_response(&response) else {
            return transient;
        };
        let Some(new_version) = release.version() else {
            return transient;
        };

        if !is_newer_version(&new_version, &plugin.version) {
            return transient;
        }

        let license_key = self.config.license_key.as_deref().unwrap_or_default();
        let update = PluginUpdate {
            slug: slug.clone(),
            new_version,
            tested: release.tested(),
            url: plugin.plugin_uri,
            package: release.package_url(license_key),
            icons: release.map("icons").cloned(),
        };
        info!(
            "Update available for {slug}: {} -> {}",
            plugin.version, update.new_version
        );

        if let Some(response) = transient.response.as_mut() {
            response.insert(slug, update);
        }
        transient
    }

    async fn set_plugin_info(
        &self,
        res: Option<PluginInfo>,
        action: &str,
        args: &PluginInfoArgs,
    ) -> Option<PluginInfo> {
        if action != PLUGIN_INFORMATION_ACTION {
            return res;
        }

        let Some(plugin) = self.host.registry.plugin_data(self.plugin_file()) else {
            return res;
        };

        let response = self.get_release_info(false).await;
        let Some(release) = ReleaseData::from_response(&response) else {
            return res;
        };

        let slug = self.slug();
        if args.slug.as_deref() != Some(slug.as_str()) {
            return res;
        }

        let mut info = PluginInfo::new();
        info.insert("slug", slug);
        info.insert("name", plugin.name);
        info.insert("author", plugin.author);
        info.insert("homepage", plugin.plugin_uri);

        for (key, value) in release.fields() {
            if key == "sections" {
                continue;
            }
            info.insert(key.clone(), value.clone());
        }

        for key in ["icons", "banners", "sections"] {
            if let Some(map) = release.map(key) {
                info.insert(key, Value::Object(map.clone()));
            }
        }

        Some(info)
    }

    async fn post_install(
        &self,
        success: bool,
        hook_extra: &HookExtra,
        mut result: InstallResult,
    ) -> Result<InstallResult, HostError> {
        let slug = self.slug();
        debug!(
            "Post-install for {slug} (installer success: {success}, package for: {:?})",
            hook_extra.plugin
        );

        let plugins_dir = self.host.registry.plugins_dir();
        let Some(plugin_dir) = plugin_folder(&plugins_dir, &slug) else {
            warn!("{slug} has no folder of its own, leaving the package in place");
            return Err(HostError::protected_destination(&plugins_dir));
        };
        let was_active = self.host.registry.is_plugin_active(&slug);

        self.host.files.move_dir(&result.destination, &plugin_dir)?;
        result.destination = plugin_dir;

        if was_active && let Err(error) = self.host.registry.activate_plugin(&slug) {
            warn!("Failed to re-activate {slug} after update: {error}");
        }

        Ok(result)
    }
}

/// Directory holding the plugin: the slug's parent under the plugin root.
/// Single-file plugins sit directly in the root and have none.
fn plugin_folder(plugins_dir: &Path, slug: &str) -> Option<PathBuf> {
    Path::new(slug)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(|parent| plugins_dir.join(parent))
}
