//! Recycle bin: trashed items are moved under `<data dir>/trash/files`
//! and tracked in a JSON manifest so they can be put back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("{op} failed for {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} does not exist")]
    Missing(PathBuf),
    #[error("{0} is not in the recycle bin")]
    NotTrashed(PathBuf),
    #[error("cannot restore over existing {0}")]
    Occupied(PathBuf),
}

fn io(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> TrashError {
    let path = path.to_path_buf();
    move |source| TrashError::Io { op, path, source }
}

/// Metadata for a trashed item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrashEntry {
    pub original_name: String,
    /// Where the item lived before it was trashed
    pub original_path: PathBuf,
    /// Where it lives now, inside the bin
    pub trash_path: PathBuf,
    pub trashed_at: DateTime<Local>,
    pub is_dir: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct TrashManifest {
    entries: Vec<TrashEntry>,
}

impl TrashManifest {
    fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    fn save(&self, path: &Path) -> Result<(), TrashError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io("create manifest dir", parent))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TrashError::Io { op: "encode manifest", path: path.to_path_buf(), source: e.into() })?;
        std::fs::write(path, json).map_err(io("write manifest", path))
    }
}

/// A recycle bin rooted at a directory.
pub struct RecycleBin {
    root: PathBuf,
}

impl RecycleBin {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The per-user bin under the Launchpad data directory.
    pub fn user() -> Self {
        Self::new(padcore::storage::data_dir(padcore::APP_NAME).join("trash"))
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    /// Items currently in the bin, oldest first.
    #[cfg(test)]
    pub fn entries(&self) -> Vec<TrashEntry> {
        let mut manifest = TrashManifest::load(&self.manifest_path());
        manifest.entries.retain(|e| e.trash_path.exists());
        manifest.entries
    }

    /// Move `source` into the bin.
    pub fn trash(&self, source: &Path) -> Result<TrashEntry, TrashError> {
        let meta = std::fs::symlink_metadata(source).map_err(|_| TrashError::Missing(source.to_path_buf()))?;
        let files = self.files_dir();
        std::fs::create_dir_all(&files).map_err(io("create bin", &files))?;

        let original_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".into());

        let mut dest = files.join(&original_name);
        let mut counter = 1u32;
        while dest.exists() {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "file".into());
            let ext = source
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            dest = files.join(format!("{} ({}){}", stem, counter, ext));
            counter += 1;
        }

        move_path(source, &dest)?;

        let entry = TrashEntry {
            original_name,
            original_path: source.to_path_buf(),
            trash_path: dest,
            trashed_at: Local::now(),
            is_dir: meta.is_dir(),
        };

        let manifest_path = self.manifest_path();
        let mut manifest = TrashManifest::load(&manifest_path);
        manifest.entries.push(entry.clone());
        manifest.save(&manifest_path)?;

        tracing::debug!(from = %source.display(), to = %entry.trash_path.display(), "trashed");
        Ok(entry)
    }

    /// Put the most recently trashed item that came from `original_path` back.
    #[cfg(test)]
    pub fn restore(&self, original_path: &Path) -> Result<(), TrashError> {
        let manifest_path = self.manifest_path();
        let mut manifest = TrashManifest::load(&manifest_path);

        let idx = manifest
            .entries
            .iter()
            .rposition(|e| e.original_path == original_path)
            .ok_or_else(|| TrashError::NotTrashed(original_path.to_path_buf()))?;

        if original_path.exists() {
            return Err(TrashError::Occupied(original_path.to_path_buf()));
        }

        let entry = manifest.entries.remove(idx);
        if let Some(parent) = entry.original_path.parent() {
            std::fs::create_dir_all(parent).map_err(io("create parent", parent))?;
        }
        move_path(&entry.trash_path, &entry.original_path)?;
        manifest.save(&manifest_path)
    }
}

/// Rename, falling back to copy + remove across filesystems.
fn move_path(from: &Path, to: &Path) -> Result<(), TrashError> {
    match std::fs::rename(from, to) {
        Ok(()) => return Ok(()),
        Err(e) if padcore::storage::is_cross_device(&e) => {}
        Err(e) => return Err(io("move", from)(e)),
    }
    if from.is_dir() {
        copy_dir_all(from, to)?;
        std::fs::remove_dir_all(from).map_err(io("remove", from))
    } else {
        std::fs::copy(from, to).map_err(io("copy", from))?;
        std::fs::remove_file(from).map_err(io("remove", from))
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), TrashError> {
    std::fs::create_dir_all(dst).map_err(io("create dir", dst))?;
    for entry in std::fs::read_dir(src).map_err(io("read dir", src))? {
        let entry = entry.map_err(io("read dir", src))?;
        let ty = entry.file_type().map_err(io("stat", &entry.path()))?;
        let target = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(io("copy", &entry.path()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin() -> (tempfile::TempDir, RecycleBin) {
        let dir = tempfile::tempdir().unwrap();
        let bin = RecycleBin::new(dir.path().join("bin"));
        (dir, bin)
    }

    #[test]
    fn trash_then_restore_file() {
        let (dir, bin) = bin();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let entry = bin.trash(&file).unwrap();
        assert!(!file.exists());
        assert!(entry.trash_path.exists());
        assert_eq!(bin.entries().len(), 1);

        bin.restore(&file).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "hello");
        assert!(bin.entries().is_empty());
    }

    #[test]
    fn same_name_gets_unique_slot() {
        let (dir, bin) = bin();
        let a = dir.path().join("a").join("report.docx");
        let b = dir.path().join("b").join("report.docx");
        for p in [&a, &b] {
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, "x").unwrap();
        }

        let first = bin.trash(&a).unwrap();
        let second = bin.trash(&b).unwrap();
        assert_ne!(first.trash_path, second.trash_path);
        assert!(second.trash_path.ends_with("report (1).docx"));
    }

    #[test]
    fn directories_are_trashed_whole() {
        let (dir, bin) = bin();
        let folder = dir.path().join("photos");
        std::fs::create_dir_all(folder.join("2024")).unwrap();
        std::fs::write(folder.join("2024").join("a.png"), "png").unwrap();

        let entry = bin.trash(&folder).unwrap();
        assert!(entry.is_dir);
        assert!(entry.trash_path.join("2024").join("a.png").exists());
    }

    #[test]
    fn restore_refuses_to_overwrite() {
        let (dir, bin) = bin();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "old").unwrap();
        bin.trash(&file).unwrap();
        std::fs::write(&file, "new").unwrap();

        assert!(matches!(bin.restore(&file), Err(TrashError::Occupied(_))));
    }

    #[test]
    fn missing_source_is_reported() {
        let (dir, bin) = bin();
        let err = bin.trash(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, TrashError::Missing(_)));
    }
}
