use plm_host::{FileMover, HostError};
use std::path::{Path, PathBuf};

/// [`FileMover`] using plain filesystem renames.
///
/// The plugins root and its ancestors are never replaced.
#[derive(Debug, Clone)]
pub struct FsFileMover {
    plugins_dir: PathBuf,
}

impl FsFileMover {
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
        }
    }

    fn is_protected(&self, to: &Path) -> bool {
        resolve(&self.plugins_dir).starts_with(resolve(to))
    }
}

fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

impl FileMover for FsFileMover {
    fn move_dir(&self, from: &Path, to: &Path) -> Result<(), HostError> {
        if from == to {
            return Ok(());
        }
        if self.is_protected(to) {
            return Err(HostError::protected_destination(to));
        }

        let replace = || -> std::io::Result<()> {
            if to.exists() {
                std::fs::remove_dir_all(to)?;
            }
            if let Some(parent) = to.parent() {
                std::fs::create_dir_all(parent)?;
            }
            match std::fs::rename(from, to) {
                Err(error) if error.kind() == std::io::ErrorKind::CrossesDevices => {
                    copy_dir_all(from, to)?;
                    std::fs::remove_dir_all(from)
                }
                other => other,
            }
        };

        replace().map_err(|error| HostError::move_failed(from, to, error))?;
        log::debug!("Moved {} to {}", from.display(), to.display());
        Ok(())
    }
}

fn copy_dir_all(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use plm_host::{FileMover, HostError};

    use super::{FsFileMover, copy_dir_all};

    #[test]
    fn move_replaces_existing_plugin_directory() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let from = temp_dir.path().join("upgrade/my-plugin-abc123");
        let to = temp_dir.path().join("plugins/my-plugin");
        std::fs::create_dir_all(&from).expect("source should be created");
        std::fs::write(from.join("my-plugin.php"), "new").expect("source file should be written");
        std::fs::create_dir_all(&to).expect("target should be created");
        std::fs::write(to.join("stale.php"), "old").expect("stale file should be written");

        FsFileMover::new(temp_dir.path().join("plugins"))
            .move_dir(&from, &to)
            .expect("move should succeed");

        assert!(!from.exists());
        assert!(!to.join("stale.php").exists());
        assert_eq!(
            std::fs::read_to_string(to.join("my-plugin.php")).expect("moved file should exist"),
            "new"
        );
    }

    #[test]
    fn missing_source_reports_move_failure() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");

        let error = FsFileMover::new(temp_dir.path().join("plugins"))
            .move_dir(
                &temp_dir.path().join("missing"),
                &temp_dir.path().join("plugins/my-plugin"),
            )
            .expect_err("move of missing source should fail");

        assert!(matches!(error, HostError::MoveFailed { .. }));
    }

    #[test]
    fn plugins_root_is_never_replaced() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let plugins_dir = temp_dir.path().join("plugins");
        let sibling = plugins_dir.join("other-plugin/other.php");
        std::fs::create_dir_all(sibling.parent().expect("parent")).expect("sibling dir");
        std::fs::write(&sibling, "<?php").expect("sibling plugin should be written");
        let from = temp_dir.path().join("upgrade/hello");
        std::fs::create_dir_all(&from).expect("source should be created");
        std::fs::write(from.join("hello.php"), "new").expect("source file should be written");
        let mover = FsFileMover::new(&plugins_dir);

        let error = mover
            .move_dir(&from, &plugins_dir)
            .expect_err("plugins root must be protected");
        assert!(matches!(error, HostError::ProtectedDestination { .. }));

        let error = mover
            .move_dir(&from, temp_dir.path())
            .expect_err("ancestors of the plugins root must be protected");
        assert!(matches!(error, HostError::ProtectedDestination { .. }));

        assert!(sibling.is_file());
        assert!(from.join("hello.php").is_file());
    }

    #[test]
    fn copy_dir_all_copies_nested_files() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let from = temp_dir.path().join("src");
        std::fs::create_dir_all(from.join("assets")).expect("nested dir should be created");
        std::fs::write(from.join("assets/icon.svg"), "<svg/>").expect("file should be written");

        let to = temp_dir.path().join("dst");
        copy_dir_all(&from, &to).expect("copy should succeed");

        assert!(to.join("assets/icon.svg").is_file());
    }
}
