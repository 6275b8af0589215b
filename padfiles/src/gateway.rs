//! Filesystem gateway
//!
//! Every filesystem touch the explorer makes goes through [`FsGateway`].
//! Reads never fail: an unreadable directory lists as empty. Mutations
//! return a [`GatewayError`] for the caller to surface.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use padtrash::{RecycleBin, TrashError};
use thiserror::Error;
use walkdir::WalkDir;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{op} failed for {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} not found")]
    NotFound(PathBuf),
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),
    #[error(transparent)]
    Trash(#[from] TrashError),
}

fn io(op: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> GatewayError {
    let path = path.to_path_buf();
    move |source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            GatewayError::NotFound(path)
        } else {
            GatewayError::Io { op, path, source }
        }
    }
}

/// One row of a directory listing. Identity is the path.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<DateTime<Local>>,
}

impl DirectoryEntry {
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { name, path, is_dir, size: None, modified: None }
    }

    fn from_fs(path: PathBuf) -> Option<Self> {
        let meta = std::fs::metadata(&path).ok()?;
        let mut entry = Self::new(path, meta.is_dir());
        if !entry.is_dir {
            entry.size = Some(meta.len());
        }
        entry.modified = meta.modified().ok().map(DateTime::<Local>::from);
        Some(entry)
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// File name of `path`, or the whole path for roots like `/`.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Where the explorer is pointed: a real directory or the synthetic
/// "My PC" root that lists volumes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    MyPc,
    Dir(PathBuf),
}

impl Location {
    /// Trim the last path segment. Filesystem roots go up to "My PC".
    pub fn parent(&self) -> Option<Location> {
        match self {
            Location::MyPc => None,
            Location::Dir(path) => Some(match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => Location::Dir(p.to_path_buf()),
                _ => Location::MyPc,
            }),
        }
    }

    pub fn as_dir(&self) -> Option<&Path> {
        match self {
            Location::MyPc => None,
            Location::Dir(p) => Some(p),
        }
    }

    pub fn is_my_pc(&self) -> bool {
        matches!(self, Location::MyPc)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::MyPc => f.write_str("My PC"),
            Location::Dir(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Dir(path)
    }
}

/// Filesystem primitives consumed by the explorer.
pub trait FsGateway: Send + Sync {
    /// Direct children of `path`; empty when unreadable.
    fn list_directory(&self, path: &Path) -> Vec<DirectoryEntry>;
    /// Case-insensitive substring match on names below `root`, at most
    /// `max_depth + 1` levels deep. Unreadable subtrees are skipped.
    fn search_entries(&self, root: &Path, query: &str, max_depth: usize) -> Vec<DirectoryEntry>;
    fn create_folder(&self, path: &Path) -> Result<(), GatewayError>;
    fn create_file(&self, path: &Path) -> Result<(), GatewayError>;
    /// Move `from` to `to`. Never replaces or merges into an existing `to`.
    fn rename_or_move(&self, from: &Path, to: &Path) -> Result<(), GatewayError>;
    /// Copy a file, or a directory recursively.
    fn copy(&self, from: &Path, to: &Path) -> Result<(), GatewayError>;
    /// Reversible delete.
    fn trash(&self, path: &Path) -> Result<(), GatewayError>;
    /// Leave `path` as an empty directory.
    fn clear_directory_contents(&self, path: &Path) -> Result<(), GatewayError>;
    /// Mounted volumes, shown as the contents of "My PC".
    fn list_removable_roots(&self) -> Vec<DirectoryEntry>;
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem, with deletes going to the user's recycle bin.
pub struct LocalGateway {
    bin: RecycleBin,
}

impl Default for LocalGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalGateway {
    pub fn new() -> Self {
        Self { bin: RecycleBin::user() }
    }

    pub fn with_bin(bin: RecycleBin) -> Self {
        Self { bin }
    }
}

impl FsGateway for LocalGateway {
    fn list_directory(&self, path: &Path) -> Vec<DirectoryEntry> {
        let rd = match std::fs::read_dir(path) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::debug!(path = %path.display(), "listing skipped: {e}");
                return Vec::new();
            }
        };
        rd.flatten().filter_map(|e| DirectoryEntry::from_fs(e.path())).collect()
    }

    fn search_entries(&self, root: &Path, query: &str, max_depth: usize) -> Vec<DirectoryEntry> {
        let needle = query.to_lowercase();
        WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth + 1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().to_lowercase().contains(&needle))
            .filter_map(|e| DirectoryEntry::from_fs(e.into_path()))
            .collect()
    }

    fn create_folder(&self, path: &Path) -> Result<(), GatewayError> {
        std::fs::create_dir_all(path).map_err(io("create folder", path))
    }

    fn create_file(&self, path: &Path) -> Result<(), GatewayError> {
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
            .map_err(io("create file", path))
    }

    fn rename_or_move(&self, from: &Path, to: &Path) -> Result<(), GatewayError> {
        // rename(2) would silently replace an existing file.
        if std::fs::symlink_metadata(to).is_ok() {
            return Err(GatewayError::AlreadyExists(to.to_path_buf()));
        }
        match std::fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(e) if padcore::storage::is_cross_device(&e) => {}
            Err(e) => return Err(io("move", from)(e)),
        }
        self.copy(from, to)?;
        if from.is_dir() {
            std::fs::remove_dir_all(from).map_err(io("remove", from))
        } else {
            std::fs::remove_file(from).map_err(io("remove", from))
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), GatewayError> {
        let meta = std::fs::metadata(from).map_err(io("copy", from))?;
        if !meta.is_dir() {
            return std::fs::copy(from, to).map(|_| ()).map_err(io("copy", from));
        }
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                GatewayError::Io { op: "copy", path, source: e.into() }
            })?;
            let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
            let target = to.join(rel);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target).map_err(io("create folder", &target))?;
            } else {
                std::fs::copy(entry.path(), &target).map_err(io("copy", entry.path()))?;
            }
        }
        Ok(())
    }

    fn trash(&self, path: &Path) -> Result<(), GatewayError> {
        self.bin.trash(path)?;
        Ok(())
    }

    fn clear_directory_contents(&self, path: &Path) -> Result<(), GatewayError> {
        if path.exists() {
            std::fs::remove_dir_all(path).map_err(io("clear", path))?;
        }
        std::fs::create_dir_all(path).map_err(io("clear", path))
    }

    fn list_removable_roots(&self) -> Vec<DirectoryEntry> {
        let disks = sysinfo::Disks::new_with_refreshed_list();
        let mut mounts: Vec<PathBuf> = disks.list().iter().map(|d| d.mount_point().to_path_buf()).collect();
        #[cfg(unix)]
        mounts.push(PathBuf::from("/"));
        mounts.sort();
        mounts.dedup();
        mounts.into_iter().map(|p| DirectoryEntry::new(p, true)).collect()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
