//! Drag handoff to other Launchpad surfaces
//!
//! When the explorer starts dragging, it writes the dragged path to a
//! state file in the temp directory. Other surfaces (the favorites grid,
//! a second explorer window) read it to accept the drop. Only one path is
//! handed off, even when several entries are being dragged.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handoffs older than this are treated as abandoned.
const STALE_AFTER: Duration = Duration::from_secs(30);

fn drag_state_path() -> PathBuf {
    std::env::temp_dir().join(format!("{}_drag_state.txt", crate::APP_NAME))
}

/// Publish `path` as the item being dragged out of this window.
pub fn start_drag(path: &Path) {
    start_drag_at(&drag_state_path(), path);
}

/// Clear the handoff after a drop or cancel.
pub fn end_drag() {
    let _ = fs::remove_file(drag_state_path());
}

/// The path currently offered by another window, if any.
pub fn dragged_path() -> Option<PathBuf> {
    dragged_path_at(&drag_state_path())
}

fn start_drag_at(state: &Path, path: &Path) {
    if let Some(s) = path.to_str() {
        if let Err(e) = fs::write(state, s) {
            tracing::debug!("drag handoff not written: {e}");
        }
    }
}

fn dragged_path_at(state: &Path) -> Option<PathBuf> {
    let modified = fs::metadata(state).and_then(|m| m.modified()).ok()?;
    if modified.elapsed().map(|e| e > STALE_AFTER).unwrap_or(false) {
        let _ = fs::remove_file(state);
        return None;
    }

    let content = fs::read_to_string(state).ok()?;
    let path = PathBuf::from(content.lines().next()?.trim());
    path.exists().then_some(path)
}
