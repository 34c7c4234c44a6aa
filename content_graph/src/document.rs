//! Authoring format - the nested JSON document content graphs are loaded from.
//!
//! The document is a map from top-level id to node. A node either carries
//! content (`message`, `options`, `answers`) or a control `action`:
//!
//! ```json
//! {
//!   "greeting": { "message": "Hi!", "options": [{ "id": "faq", "label": "FAQ" }] },
//!   "faq": {
//!     "message": "Common questions:",
//!     "options": [{ "id": "hours", "label": "Hours?" }],
//!     "answers": { "hours": { "message": "9 to 5", "options": [{ "id": "back", "label": "Back" }] } }
//!   },
//!   "back": { "action": "goBack" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ControlAction, OptionRef};

/// Whole authored document, keyed by top-level id.
pub type ContentDocument = BTreeMap<String, NodeSpec>;

/// A top-level entry as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionRef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub answers: BTreeMap<String, AnswerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ControlAction>,
}

impl NodeSpec {
    /// Whether any content field is set alongside an action.
    pub(crate) fn has_content(&self) -> bool {
        self.message.is_some() || !self.options.is_empty() || !self.answers.is_empty()
    }
}

/// A direct answer as authored under its parent topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionRef>,
}
