use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("IO error ({kind}): {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Failed to serialize {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("Plugin not found: {slug}")]
    PluginNotFound { slug: String },

    #[error("Failed to move {from} to {to}: {details}")]
    MoveFailed {
        from: String,
        to: String,
        details: String,
    },

    #[error("Refusing to replace {path}: it holds other plugins")]
    ProtectedDestination { path: String },

    #[error("Host storage error in {context}: {details}")]
    Storage {
        context: &'static str,
        details: String,
    },
}

impl HostError {
    pub fn serialization_from<E>(context: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Serialization {
            context,
            details: error.to_string(),
        }
    }

    pub fn storage(context: &'static str, details: impl Into<String>) -> Self {
        Self::Storage {
            context,
            details: details.into(),
        }
    }

    pub fn move_failed<E>(from: &std::path::Path, to: &std::path::Path, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::MoveFailed {
            from: from.display().to_string(),
            to: to.display().to_string(),
            details: error.to_string(),
        }
    }
}

impl HostError {
    #[must_use]
    pub fn protected_destination(path: &std::path::Path) -> Self {
        HostError::ProtectedDestination {
            path: path.display().to_string(),
        }
    }
}

impl From<std::io::Error> for HostError {
    fn from(err: std::io::Error) -> Self {
        HostError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::HostError;

    #[test]
    fn io_error_conversion_maps_to_io_variant() {
        let mapped = HostError::from(std::io::Error::other("read-only file system"));
        assert!(
            matches!(mapped, HostError::Io { kind, ref message } if kind == std::io::ErrorKind::Other && message.contains("read-only"))
        );
    }

    #[test]
    fn move_failed_display_includes_both_paths() {
        let error = HostError::move_failed(
            Path::new("/tmp/upgrade/my-plugin"),
            Path::new("/srv/plugins/my-plugin"),
            "directory not empty",
        );

        assert_eq!(
            error.to_string(),
            "Failed to move /tmp/upgrade/my-plugin to /srv/plugins/my-plugin: directory not empty"
        );
    }

    #[test]
    fn protected_destination_names_the_directory() {
        let error = HostError::protected_destination(Path::new("/srv/plugins"));
        assert_eq!(
            error.to_string(),
            "Refusing to replace /srv/plugins: it holds other plugins"
        );
    }

    #[test]
    fn storage_helper_keeps_context() {
        let error = HostError::storage("option store", "lock poisoned");
        assert!(matches!(
            error,
            HostError::Storage {
                context: "option store",
                ..
            }
        ));
    }
}
