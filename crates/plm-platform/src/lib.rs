//! Filesystem-backed host for running the license client outside a CMS.

mod atomic;
mod cache_store;
mod files;
mod option_store;
mod paths;
mod registry;

pub use cache_store::FileCacheStore;
pub use files::FsFileMover;
pub use option_store::FileOptionStore;
pub use paths::{AppPaths, AppPathsError};
pub use registry::{ACTIVE_PLUGINS_OPTION, FsPluginRegistry, parse_plugin_header};
