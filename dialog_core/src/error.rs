//! Error types for the dialog engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;
use content_graph::GraphError;

/// Failure to build a [`Navigator`](crate::Navigator).
#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("content graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("graph is rooted at '{graph}' but configuration expects '{config}'")]
    RootMismatch { graph: String, config: String },
}

/// A navigation fault the engine recovered from by showing the root greeting.
///
/// Never returned as an error; carried on the instruction for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationFault {
    #[error("option '{option_id}' does not resolve under context '{context}'")]
    UnresolvedReference { option_id: String, context: String },

    #[error("no previous step to go back to")]
    EmptyHistory,
}
