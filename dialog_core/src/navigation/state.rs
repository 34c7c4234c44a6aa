//! Per-conversation navigation state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    /// Create a new random conversation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    User,
}

/// One entry of the transcript. Raw authored text, not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Context the option was selected under.
    pub context: String,
    pub option_id: String,
}

impl PathEntry {
    pub fn new(context: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            option_id: option_id.into(),
        }
    }
}

/// Mutable state of a single conversation.
///
/// The transcript is history only; branching decisions read the path stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    id: ConversationId,
    transcript: Vec<Turn>,
    path: Vec<PathEntry>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    /// Create an empty state for a newly activated conversation.
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            transcript: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// The breadcrumb trail, oldest first.
    pub fn path(&self) -> &[PathEntry] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Append the user's own selection, as shown on the chosen button.
    pub fn record_user_turn(&mut self, label: impl Into<String>) {
        self.transcript.push(Turn {
            speaker: Speaker::User,
            text: label.into(),
        });
    }

    pub(crate) fn record_bot_turn(&mut self, text: impl Into<String>) {
        self.transcript.push(Turn {
            speaker: Speaker::Bot,
            text: text.into(),
        });
    }

    pub(crate) fn push_path(&mut self, entry: PathEntry) {
        self.path.push(entry);
    }

    pub(crate) fn pop_path(&mut self) -> Option<PathEntry> {
        self.path.pop()
    }

    pub(crate) fn peek_path(&self) -> Option<&PathEntry> {
        self.path.last()
    }

    pub(crate) fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Forget everything except the conversation id.
    pub(crate) fn clear(&mut self) {
        self.transcript.clear();
        self.path.clear();
    }
}
