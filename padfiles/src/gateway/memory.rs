//! In-memory gateway that records every call, for controller tests.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{DirectoryEntry, FsGateway, GatewayError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CreateFolder(PathBuf),
    CreateFile(PathBuf),
    Rename(PathBuf, PathBuf),
    Copy(PathBuf, PathBuf),
    Trash(PathBuf),
    Clear(PathBuf),
}

#[derive(Default)]
struct State {
    /// path -> is_dir
    nodes: BTreeMap<PathBuf, bool>,
    calls: Vec<Call>,
    failing: HashSet<PathBuf>,
}

#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), true);
        self
    }

    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), false);
        self
    }

    /// Make every mutation touching `path` fail.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.state.lock().unwrap().failing.insert(path.as_ref().to_path_buf());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().nodes.get(path.as_ref()).copied().unwrap_or(false)
    }

    /// Every node under `root` as (path, is_dir), sorted.
    pub fn snapshot(&self, root: impl AsRef<Path>) -> Vec<(PathBuf, bool)> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .filter(|(p, _)| p.starts_with(root.as_ref()) && p.as_path() != root.as_ref())
            .map(|(p, d)| (p.clone(), *d))
            .collect()
    }

    fn insert(&self, path: &Path, is_dir: bool) {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            state.nodes.entry(ancestor.to_path_buf()).or_insert(true);
        }
        state.nodes.insert(path.to_path_buf(), is_dir);
    }

    fn begin(&self, call: Call, touched: &[&Path]) -> Result<std::sync::MutexGuard<'_, State>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some(p) = touched.iter().find(|p| state.failing.contains(**p)) {
            return Err(GatewayError::Io {
                op: "memory",
                path: p.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "injected failure"),
            });
        }
        Ok(state)
    }
}

fn subtree(nodes: &BTreeMap<PathBuf, bool>, root: &Path) -> Vec<(PathBuf, bool)> {
    nodes
        .iter()
        .filter(|(p, _)| p.starts_with(root))
        .map(|(p, d)| (p.clone(), *d))
        .collect()
}

impl FsGateway for MemoryGateway {
    fn list_directory(&self, path: &Path) -> Vec<DirectoryEntry> {
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, d)| DirectoryEntry::new(p.clone(), *d))
            .collect()
    }

    fn search_entries(&self, root: &Path, query: &str, max_depth: usize) -> Vec<DirectoryEntry> {
        let needle = query.to_lowercase();
        let state = self.state.lock().unwrap();
        state
            .nodes
            .iter()
            .filter(|(p, _)| {
                p.strip_prefix(root)
                    .map(|rel| {
                        let depth = rel.components().count();
                        depth >= 1 && depth <= max_depth + 1
                    })
                    .unwrap_or(false)
            })
            .map(|(p, d)| DirectoryEntry::new(p.clone(), *d))
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn create_folder(&self, path: &Path) -> Result<(), GatewayError> {
        drop(self.begin(Call::CreateFolder(path.to_path_buf()), &[path])?);
        self.insert(path, true);
        Ok(())
    }

    fn create_file(&self, path: &Path) -> Result<(), GatewayError> {
        drop(self.begin(Call::CreateFile(path.to_path_buf()), &[path])?);
        self.insert(path, false);
        Ok(())
    }

    fn rename_or_move(&self, from: &Path, to: &Path) -> Result<(), GatewayError> {
        let mut state = self.begin(Call::Rename(from.to_path_buf(), to.to_path_buf()), &[from, to])?;
        let moved = subtree(&state.nodes, from);
        if moved.is_empty() {
            return Err(GatewayError::NotFound(from.to_path_buf()));
        }
        if state.nodes.contains_key(to) {
            return Err(GatewayError::AlreadyExists(to.to_path_buf()));
        }
        for (p, d) in moved {
            state.nodes.remove(&p);
            let rel = p.strip_prefix(from).unwrap_or(Path::new(""));
            state.nodes.insert(to.join(rel), d);
        }
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), GatewayError> {
        let mut state = self.begin(Call::Copy(from.to_path_buf(), to.to_path_buf()), &[from, to])?;
        let copied = subtree(&state.nodes, from);
        if copied.is_empty() {
            return Err(GatewayError::NotFound(from.to_path_buf()));
        }
        for (p, d) in copied {
            let rel = p.strip_prefix(from).unwrap_or(Path::new(""));
            state.nodes.insert(to.join(rel), d);
        }
        Ok(())
    }

    fn trash(&self, path: &Path) -> Result<(), GatewayError> {
        let mut state = self.begin(Call::Trash(path.to_path_buf()), &[path])?;
        let gone = subtree(&state.nodes, path);
        if gone.is_empty() {
            return Err(GatewayError::NotFound(path.to_path_buf()));
        }
        for (p, _) in gone {
            state.nodes.remove(&p);
        }
        Ok(())
    }

    fn clear_directory_contents(&self, path: &Path) -> Result<(), GatewayError> {
        let mut state = self.begin(Call::Clear(path.to_path_buf()), &[path])?;
        for (p, _) in subtree(&state.nodes, path) {
            state.nodes.remove(&p);
        }
        drop(state);
        self.insert(path, true);
        Ok(())
    }

    fn list_removable_roots(&self) -> Vec<DirectoryEntry> {
        vec![DirectoryEntry::new("/", true)]
    }

    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().nodes.contains_key(path)
    }
}
