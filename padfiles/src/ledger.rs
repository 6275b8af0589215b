//! Undo/redo ledger
//!
//! Operations are recorded as what was done, not as their inverse. The
//! inverse is worked out when undoing.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gateway::{FsGateway, GatewayError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UndoOperation {
    Rename { path: PathBuf, new_path: PathBuf },
    Create { path: PathBuf },
    /// `restore_path` is the backup copy made before trashing.
    Delete { path: PathBuf, restore_path: PathBuf },
}

impl UndoOperation {
    /// The path the user thinks of this operation as acting on.
    pub fn path(&self) -> &Path {
        match self {
            UndoOperation::Rename { path, .. }
            | UndoOperation::Create { path }
            | UndoOperation::Delete { path, .. } => path,
        }
    }

    /// Perform the inverse. A delete is undone by copying the backup back,
    /// so the backup survives and the undo can be repeated.
    pub fn revert(&self, fs: &dyn FsGateway) -> Result<(), GatewayError> {
        match self {
            UndoOperation::Rename { path, new_path } => fs.rename_or_move(new_path, path),
            UndoOperation::Create { path } => fs.trash(path),
            UndoOperation::Delete { path, restore_path } => fs.copy(restore_path, path),
        }
    }

    /// Perform the operation again after it was undone.
    pub fn reapply(&self, fs: &dyn FsGateway) -> Result<(), GatewayError> {
        match self {
            UndoOperation::Rename { path, new_path } => fs.rename_or_move(path, new_path),
            UndoOperation::Create { path } => {
                // Only plain-text documents are created as files; anything
                // else came from "New Folder" or a pasted folder.
                if path.to_string_lossy().ends_with(".txt") {
                    fs.create_file(path)
                } else {
                    fs.create_folder(path)
                }
            }
            UndoOperation::Delete { path, .. } => fs.trash(path),
        }
    }
}

impl fmt::Display for UndoOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// Undo and redo stacks. Recording a new operation drops the redo stack.
#[derive(Debug, Default)]
pub struct Ledger {
    undo: Vec<UndoOperation>,
    redo: Vec<UndoOperation>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, op: UndoOperation) {
        tracing::debug!(%op, "recorded");
        self.undo.push(op);
        self.redo.clear();
    }

    pub fn pop_undo(&mut self) -> Option<UndoOperation> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<UndoOperation> {
        self.redo.pop()
    }

    /// Park an undone operation on the redo stack.
    pub fn push_undone(&mut self, op: UndoOperation) {
        self.redo.push(op);
    }

    /// Return a redone operation to the undo stack, keeping the redo stack.
    pub fn push_redone(&mut self, op: UndoOperation) {
        self.undo.push(op);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn peek_undo(&self) -> Option<&UndoOperation> {
        self.undo.last()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
