//! Content Graph - the immutable lookup table every conversation reads from.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use tracing::info;

use super::{
    ContentDocument, ControlAction, GraphError, Node, NodeKey, TopicNode, BACK_ID, MAIN_ID,
};

/// Id of the root greeting unless configured otherwise.
pub const DEFAULT_ROOT: &str = "greeting";

/// An option whose id resolves to nothing from the list it appears in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DanglingReference {
    /// Node whose option list holds the reference.
    pub node: NodeKey,
    pub option: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.node, self.option)
    }
}

/// The content graph: topics, answers and control nodes in one table.
///
/// Shared terminal nodes (a pricing inquiry, a call-to-action) are ordinary
/// top-level topics referenced from many option lists, so the structure is a
/// rooted DAG rather than a strict tree.
#[derive(Debug, Clone)]
pub struct ContentGraph {
    root: TopicNode,
    nodes: HashMap<NodeKey, Node>,
}

impl ContentGraph {
    /// Build a graph from an authored document.
    pub fn from_document(doc: ContentDocument, root: &str) -> Result<Self, GraphError> {
        let mut nodes = HashMap::new();

        for (id, spec) in doc {
            if let Some(action) = spec.action {
                if spec.has_content() {
                    return Err(GraphError::ControlWithContent { id });
                }
                nodes.insert(NodeKey::Topic(id), Node::Control(action));
                continue;
            }

            for (answer_id, answer) in spec.answers {
                let node = TopicNode {
                    id: answer_id.clone(),
                    message: answer.message,
                    options: answer.options,
                };
                nodes.insert(NodeKey::answer(id.as_str(), answer_id), Node::Answer(node));
            }

            let node = TopicNode {
                id: id.clone(),
                message: spec.message,
                options: spec.options,
            };
            nodes.insert(NodeKey::Topic(id), Node::Category(node));
        }

        let root = match nodes.get(&NodeKey::topic(root)) {
            Some(Node::Category(topic)) => topic.clone(),
            _ => {
                return Err(GraphError::MissingRoot {
                    root: root.to_string(),
                })
            }
        };

        info!(nodes = nodes.len(), root = %root.id, "content graph loaded");
        Ok(Self { root, nodes })
    }

    /// Parse a JSON document rooted at [`DEFAULT_ROOT`].
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Self::from_json_with_root(json, DEFAULT_ROOT)
    }

    /// Parse a JSON document with an explicit root id.
    pub fn from_json_with_root(json: &str, root: &str) -> Result<Self, GraphError> {
        let doc: ContentDocument = serde_json::from_str(json)?;
        Self::from_document(doc, root)
    }

    /// Read and parse a JSON document from disk.
    pub fn load(path: impl AsRef<Path>, root: &str) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_with_root(&json, root)
    }

    /// The root greeting.
    pub fn root(&self) -> &TopicNode {
        &self.root
    }

    /// Id of the root greeting, also the root context marker.
    pub fn root_id(&self) -> &str {
        &self.root.id
    }

    /// Look up a top-level content node.
    pub fn get_topic(&self, id: &str) -> Option<&TopicNode> {
        match self.nodes.get(&NodeKey::topic(id)) {
            Some(Node::Category(topic)) => Some(topic),
            _ => None,
        }
    }

    /// Look up a direct answer under a top-level topic.
    pub fn get_answer(&self, parent: &str, id: &str) -> Option<&TopicNode> {
        match self.nodes.get(&NodeKey::answer(parent, id)) {
            Some(Node::Answer(topic)) => Some(topic),
            _ => None,
        }
    }

    /// Resolve an id to a control action.
    ///
    /// The reserved ids `back` and `main` are controls whether or not the
    /// document declares them.
    pub fn control(&self, id: &str) -> Option<ControlAction> {
        match id {
            BACK_ID => Some(ControlAction::GoBack),
            MAIN_ID => Some(ControlAction::Reset),
            _ => self.nodes.get(&NodeKey::topic(id)).and_then(Node::action),
        }
    }

    /// Raw table access.
    pub fn get(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Get the total number of nodes, answers and controls included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all entries of the table.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Whether `option_id`, selected under `context`, resolves to anything.
    pub fn option_resolves(&self, context: &str, option_id: &str) -> bool {
        self.control(option_id).is_some()
            || (context != self.root.id && self.get_answer(context, option_id).is_some())
            || self.get_topic(option_id).is_some()
    }

    /// Where an option selected under `context` leads, if it leads to content.
    fn target(&self, context: &str, option_id: &str) -> Option<NodeKey> {
        if self.control(option_id).is_some() {
            return None;
        }
        if context != self.root.id && self.get_answer(context, option_id).is_some() {
            return Some(NodeKey::answer(context, option_id));
        }
        self.get_topic(option_id).map(|_| NodeKey::topic(option_id))
    }

    /// Every option reference that resolves to nothing, sorted.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for (key, node) in &self.nodes {
            let Some(topic) = node.topic() else {
                continue;
            };
            for option in &topic.options {
                if !self.option_resolves(key.context(), &option.id) {
                    dangling.push(DanglingReference {
                        node: key.clone(),
                        option: option.id.clone(),
                    });
                }
            }
        }

        dangling.sort();
        dangling
    }

    /// Check that every option reference resolves.
    pub fn validate(&self) -> Result<(), GraphError> {
        let dangling = self.dangling_references();
        if dangling.is_empty() {
            Ok(())
        } else {
            Err(GraphError::DanglingReferences(dangling))
        }
    }

    /// Content nodes reachable from the root by selecting options.
    pub fn reachable(&self) -> HashSet<NodeKey> {
        let root = NodeKey::topic(self.root.id.as_str());
        let mut seen = HashSet::from([root.clone()]);
        let mut queue = VecDeque::from([root]);

        while let Some(key) = queue.pop_front() {
            let Some(topic) = self.nodes.get(&key).and_then(Node::topic) else {
                continue;
            };
            for option in &topic.options {
                if let Some(next) = self.target(key.context(), &option.id) {
                    if seen.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
            }
        }

        seen
    }
}
