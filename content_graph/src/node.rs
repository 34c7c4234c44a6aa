//! Node definitions - the entries of the content graph.

use serde::{Deserialize, Serialize};

/// Reserved option id that steps one screen back.
pub const BACK_ID: &str = "back";

/// Reserved option id that returns to the root greeting.
pub const MAIN_ID: &str = "main";

/// A button specification shown under a bot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRef {
    /// Id resolved against the graph when the option is selected.
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl OptionRef {
    /// Create an option without an icon.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
        }
    }

    /// Builder: attach an icon glyph.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Text shown on the button, icon first when present.
    pub fn display_label(&self) -> String {
        match &self.icon {
            Some(icon) => format!("{} {}", icon, self.label),
            None => self.label.clone(),
        }
    }
}

/// Navigation actions carried by control nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlAction {
    /// Clear the path and show the root greeting.
    Reset,
    /// Return to the screen one level up.
    GoBack,
}

/// A displayable node: a message plus the options offered under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub id: String,

    /// Authored text in the markup dialect.
    pub message: Option<String>,

    /// Display order equals authoring order. Empty means terminal.
    pub options: Vec<OptionRef>,
}

impl TopicNode {
    /// Create a node with the given id and message and no options.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: Some(message.into()),
            options: Vec::new(),
        }
    }

    /// Builder: append an option.
    pub fn with_option(mut self, option: OptionRef) -> Self {
        self.options.push(option);
        self
    }

    /// A terminal node offers no further choices.
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }
}

/// Key of the single lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKey {
    /// Top-level entry, addressed by its own id.
    Topic(String),
    /// Direct answer nested under a top-level topic.
    Answer { parent: String, id: String },
}

impl NodeKey {
    pub fn topic(id: impl Into<String>) -> Self {
        Self::Topic(id.into())
    }

    pub fn answer(parent: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Answer {
            parent: parent.into(),
            id: id.into(),
        }
    }

    /// The context option ids are resolved against for this node's options.
    pub fn context(&self) -> &str {
        match self {
            NodeKey::Topic(id) => id,
            NodeKey::Answer { parent, .. } => parent,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKey::Topic(id) => write!(f, "{}", id),
            NodeKey::Answer { parent, id } => write!(f, "{}/{}", parent, id),
        }
    }
}

/// Tagged entry of the content graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Top-level topic, including shared terminal nodes and the root greeting.
    Category(TopicNode),
    /// Direct answer reached from its parent topic's option list.
    Answer(TopicNode),
    /// Non-content node dispatching a navigation action.
    Control(ControlAction),
}

impl Node {
    /// Content carried by the node, if it is displayable.
    pub fn topic(&self) -> Option<&TopicNode> {
        match self {
            Node::Category(topic) | Node::Answer(topic) => Some(topic),
            Node::Control(_) => None,
        }
    }

    pub fn action(&self) -> Option<ControlAction> {
        match self {
            Node::Control(action) => Some(*action),
            _ => None,
        }
    }
}
