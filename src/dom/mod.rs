//! In-memory document the rendering pipeline writes into.
//!
//! The [`Document`] plays the role of the live DOM: an arena of element,
//! text and container nodes with a permanently connected `body`. It also
//! supplies the attachment-observation capability (see [`observer`]) and
//! the host event loop tick ([`Document::flush`]).

mod document;
mod node;
pub mod observer;
mod serialize;

pub use document::{Document, NodeId};
pub use node::{ElementData, Event, EventHandler, NodeKind};
pub use observer::{ConnectionWatch, WatchState};
