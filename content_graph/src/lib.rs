//! # Content Graph
//!
//! The static topic tree a guided conversation walks through. This crate is
//! the single source of truth for content and holds no conversation state.
//!
//! ## Core Components
//!
//! - **node**: topics, answers, control nodes and option buttons
//! - **document**: the nested JSON format content is authored in
//! - **graph**: the read-only lookup table, validation and reachability
//!
//! A graph is loaded once and shared by every conversation.

mod bundled;
mod document;
mod error;
mod graph;
mod node;

pub use bundled::*;
pub use document::*;
pub use error::*;
pub use graph::*;
pub use node::*;
