//! Backup store for reversible deletes
//!
//! Before an item is trashed it is copied into its own folder here,
//! `{stamp}_{name}/{name}`. The store is wiped once at startup and never
//! garbage-collected while running.

use std::path::{Path, PathBuf};

use crate::gateway::{display_name, FsGateway, GatewayError};

pub struct BackupStore {
    root: PathBuf,
    last_stamp: i64,
}

impl BackupStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), last_stamp: 0 }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove every backup. Called once when the explorer starts.
    pub fn wipe(&self, fs: &dyn FsGateway) -> Result<(), GatewayError> {
        tracing::debug!(root = %self.root.display(), "wiping backup store");
        fs.clear_directory_contents(&self.root)
    }

    /// A fresh backup folder path for `name`. Stamps are milliseconds since
    /// the epoch, bumped so that no two allocations share one.
    pub fn allocate(&mut self, name: &str) -> PathBuf {
        let now = chrono::Utc::now().timestamp_millis();
        let stamp = now.max(self.last_stamp + 1);
        self.last_stamp = stamp;
        self.root.join(format!("{}_{}", stamp, name))
    }

    /// Copy `path` into a new backup folder and return the copy's path.
    pub fn preserve(&mut self, fs: &dyn FsGateway, path: &Path) -> Result<PathBuf, GatewayError> {
        let name = display_name(path);
        let folder = self.allocate(&name);
        fs.create_folder(&folder)?;
        let copy = folder.join(&name);
        fs.copy(path, &copy)?;
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::{Call, MemoryGateway};

    #[test]
    fn stamps_never_repeat() {
        let mut store = BackupStore::new("/cache");
        let a = store.allocate("a.txt");
        let b = store.allocate("a.txt");
        let c = store.allocate("a.txt");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(a.file_name().unwrap().to_string_lossy().ends_with("_a.txt"));
    }

    #[test]
    fn preserve_creates_folder_then_copies() {
        let fs = MemoryGateway::new().with_file("/docs/report.docx");
        let mut store = BackupStore::new("/cache");

        let copy = store.preserve(&fs, Path::new("/docs/report.docx")).unwrap();
        let folder = copy.parent().unwrap().to_path_buf();
        assert_eq!(copy.file_name().unwrap(), "report.docx");
        assert_eq!(
            fs.calls(),
            vec![
                Call::CreateFolder(folder),
                Call::Copy(PathBuf::from("/docs/report.docx"), copy.clone()),
            ]
        );
        assert!(fs.exists(&copy));
    }

    #[test]
    fn wipe_empties_store() {
        let fs = MemoryGateway::new().with_file("/cache/1_a/a");
        let store = BackupStore::new("/cache");
        store.wipe(&fs).unwrap();
        assert!(fs.snapshot("/cache").is_empty());
        assert!(fs.exists(Path::new("/cache")));
    }
}
