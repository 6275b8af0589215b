//! Clipboard state and paste naming

use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// Paths waiting to be pasted. Replaced wholesale by each copy or cut.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clipboard {
    pub paths: Vec<PathBuf>,
    pub mode: ClipboardMode,
}

impl Clipboard {
    /// `None` for an empty set of paths; an empty clipboard does not exist.
    pub fn new(paths: Vec<PathBuf>, mode: ClipboardMode) -> Option<Self> {
        let mut unique = Vec::with_capacity(paths.len());
        for path in paths {
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        (!unique.is_empty()).then_some(Self { paths: unique, mode })
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// Split "a.txt" into ("a", ".txt"). Dotfiles and names without a dot have
/// no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// `name` if free, else the first of "a (1).txt", "a (2).txt", ... not in `taken`.
pub fn collision_free_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    (1u32..)
        .map(|n| format!("{} ({}){}", stem, n, ext))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// True when moving or copying `source` to `dest` would put a folder inside
/// itself.
pub fn lands_inside_itself(source: &Path, dest: &Path) -> bool {
    dest != source && dest.starts_with(source)
}
