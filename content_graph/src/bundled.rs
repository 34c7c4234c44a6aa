//! Content shipped with the crate: the interior-design studio's topic tree.

use super::{ContentGraph, GraphError, DEFAULT_ROOT};

/// Raw JSON of the bundled content.
pub const BUNDLED_CONTENT: &str = include_str!("../content/default.json");

impl ContentGraph {
    /// Load the bundled content graph.
    pub fn bundled() -> Result<Self, GraphError> {
        Self::from_json_with_root(BUNDLED_CONTENT, DEFAULT_ROOT)
    }
}
