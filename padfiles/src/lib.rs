//! padfiles: the Launchpad file explorer
//!
//! The explorer core is plain state plus a [`gateway::FsGateway`]; the egui
//! view in [`app`] drives it once per frame.

pub mod app;
pub mod backup;
pub mod clipboard;
pub mod dnd;
pub mod explorer;
pub mod gateway;
pub mod ledger;
pub mod navigation;
pub mod search;
pub mod selection;

pub use explorer::{Explorer, ExplorerEvent, ExplorerMode};
pub use gateway::{DirectoryEntry, FsGateway, GatewayError, LocalGateway, Location};
pub use ledger::{Ledger, UndoOperation};
