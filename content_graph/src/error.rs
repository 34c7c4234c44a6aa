//! Error types for loading and checking content graphs.

use thiserror::Error;

use crate::DanglingReference;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("control node '{id}' must not carry a message, options or answers")]
    ControlWithContent { id: String },

    #[error("root node '{root}' is missing or is not a topic")]
    MissingRoot { root: String },

    #[error("{} option reference(s) do not resolve: {}", .0.len(), list(.0))]
    DanglingReferences(Vec<DanglingReference>),
}

fn list(refs: &[DanglingReference]) -> String {
    refs.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
