//! Recycle bin library: reversible deletion for Launchpad surfaces.

mod recycle;

pub use recycle::{RecycleBin, TrashEntry, TrashError};
