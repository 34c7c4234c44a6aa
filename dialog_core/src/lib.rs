//! # Dialog Core
//!
//! A guided, menu-driven conversation over a [`content_graph::ContentGraph`].
//! The visitor picks options, the engine answers with a rendered message and
//! the next set of options, and keeps enough history to step back or start over.
//!
//! ## Core Components
//!
//! - **navigation**: the state machine resolving selections, with per-conversation state
//! - **render**: the markup dialect turned into structured display content
//! - **config**: engine settings loaded from TOML
//!
//! ## Design Philosophy
//!
//! - **Always Answerable**: every selection yields something valid to show
//! - **Explicit State**: conversation state is a value passed into each call, never global
//! - **Presentation-Agnostic**: output is structured content; HTML and plain text are views of it

pub mod config;
pub mod error;
pub mod navigation;
pub mod render;

pub use config::*;
pub use error::*;
pub use navigation::*;
pub use render::*;
