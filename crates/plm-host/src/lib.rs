//! Host-platform seams for the plugin license client.
//!
//! The update pipeline of the host CMS (its transient cache, option table,
//! plugin registry and filesystem helper) is reached only through the traits
//! in this crate, so the client logic can run against any host:
//! - [`CacheStore`] and [`OptionStore`] for persisted state.
//! - [`PluginRegistry`] for plugin metadata and activation.
//! - [`FileMover`] for relocating an extracted update package.

mod error;
mod memory;
mod traits;
mod types;

pub use error::HostError;
pub use memory::{MemoryCacheStore, MemoryOptionStore};
pub use traits::{CacheStore, FileMover, HostServices, OptionStore, PluginRegistry};
pub use types::{
    HookExtra, InstallResult, PluginInfo, PluginInfoArgs, PluginMetadata, PluginUpdate,
    UpdateTransient,
};
