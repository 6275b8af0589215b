//! Drag-and-drop move of explorer entries

use std::path::{Path, PathBuf};

use crate::gateway::{display_name, DirectoryEntry};
use crate::selection::Selection;

/// The entries being dragged, fixed when the drag starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    paths: Vec<PathBuf>,
}

impl DragSession {
    /// Start dragging `entry`. An unselected entry becomes the whole
    /// selection first; a selected one drags the current selection.
    pub fn begin(selection: &mut Selection, entry: &Path) -> Self {
        if !selection.contains(entry) {
            selection.click(entry);
        }
        Self { paths: selection.paths().to_vec() }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_dragged(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Only directories that are not themselves being dragged take a drop.
    pub fn accepts(&self, target: &DirectoryEntry) -> bool {
        target.is_dir && !self.is_dragged(&target.path)
    }

    /// (from, to) pairs for dropping into `target_dir`, skipping entries
    /// that are already there.
    pub fn moves_into(&self, target_dir: &Path) -> Vec<(PathBuf, PathBuf)> {
        self.paths
            .iter()
            .map(|from| (from.clone(), target_dir.join(display_name(from))))
            .filter(|(from, to)| from != to)
            .collect()
    }

    /// Offer the first dragged path to other Launchpad windows. Only one
    /// path crosses over even for a multi-item drag.
    pub fn hand_off(&self) -> Option<&Path> {
        let first = self.paths.first()?;
        padcore::drag::start_drag(first);
        Some(first)
    }

    /// Withdraw the cross-window offer.
    pub fn finish(self) {
        padcore::drag::end_drag();
    }
}
