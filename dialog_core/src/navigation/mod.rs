//! Navigation Controller - the conversation state machine.
//!
//! Every selection is resolved by one priority list, first match wins:
//! 1. **Reset**: `main`, or any control node tagged `reset`
//! 2. **Back**: `back`, or any control node tagged `goBack`
//! 3. **Answer**: an answer of the current context (never under the root)
//! 4. **Topic**: a top-level topic, which becomes the new context
//! 5. **Fallback**: apology, then the root greeting
//!
//! The controller owns no conversation state. Each call borrows the
//! [`NavigationState`] it acts on, so one navigator serves any number of
//! independent conversations.

mod state;

pub use state::*;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use content_graph::{ContentGraph, ControlAction, GraphError, OptionRef, TopicNode};

use crate::render::{render, StructuredContent};
use crate::{EngineConfig, NavigationFault, NavigatorError};

/// What the presentation layer should draw next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderInstruction {
    /// Shown before `message`, e.g. the apology on fallback.
    pub notice: Option<StructuredContent>,

    /// The bot turn. Absent for nodes authored without a message.
    pub message: Option<StructuredContent>,

    /// Option buttons, in display order.
    pub options: Vec<OptionRef>,

    /// Context to pass back with the next selection.
    pub context: String,

    /// Set when this instruction is a recovery from a navigation fault.
    pub fault: Option<NavigationFault>,
}

impl RenderInstruction {
    pub fn option(&self, id: &str) -> Option<&OptionRef> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn option_ids(&self) -> Vec<&str> {
        self.options.iter().map(|option| option.id.as_str()).collect()
    }
}

/// Outcome of resolving a selection against the graph.
enum Resolution<'g> {
    Reset,
    Back,
    Answer(&'g TopicNode),
    Topic(&'g TopicNode),
    Unresolved,
}

impl Resolution<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Resolution::Reset => "reset",
            Resolution::Back => "back",
            Resolution::Answer(_) => "answer",
            Resolution::Topic(_) => "topic",
            Resolution::Unresolved => "unresolved",
        }
    }
}

/// Drives conversations over a shared content graph.
#[derive(Debug, Clone)]
pub struct Navigator {
    graph: Arc<ContentGraph>,
    config: EngineConfig,
}

impl Navigator {
    /// Create a navigator, checking the graph against the configuration.
    ///
    /// Unresolved option references are logged, or rejected when
    /// `strict_references` is set.
    pub fn new(graph: Arc<ContentGraph>, config: EngineConfig) -> Result<Self, NavigatorError> {
        config.validate()?;
        if graph.root_id() != config.root_id {
            return Err(NavigatorError::RootMismatch {
                graph: graph.root_id().to_string(),
                config: config.root_id.clone(),
            });
        }

        let dangling = graph.dangling_references();
        if !dangling.is_empty() {
            if config.strict_references {
                return Err(GraphError::DanglingReferences(dangling).into());
            }
            for reference in &dangling {
                warn!(node = %reference.node, option = %reference.option, "option reference does not resolve");
            }
        }

        Ok(Self { graph, config })
    }

    /// Parse a JSON content document rooted where the configuration says.
    pub fn from_json(json: &str, config: EngineConfig) -> Result<Self, NavigatorError> {
        let graph = ContentGraph::from_json_with_root(json, &config.root_id)?;
        Self::new(Arc::new(graph), config)
    }

    pub fn graph(&self) -> &ContentGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn root_id(&self) -> &str {
        self.graph.root_id()
    }

    /// Show the root greeting when a conversation is first activated.
    pub fn start(&self, state: &mut NavigationState) -> RenderInstruction {
        debug!(conversation = %state.id(), "conversation started");
        self.greeting(state)
    }

    /// Explicit reset: clear transcript and path, show the root greeting.
    pub fn reset(&self, state: &mut NavigationState) -> RenderInstruction {
        debug!(conversation = %state.id(), "conversation reset");
        state.clear();
        self.greeting(state)
    }

    /// Record the option's label as the user's turn, then handle the selection.
    pub fn choose(
        &self,
        state: &mut NavigationState,
        option: &OptionRef,
        context: &str,
    ) -> RenderInstruction {
        state.record_user_turn(option.label.as_str());
        self.handle_selection(state, &option.id, context)
    }

    /// Resolve a selection made under `context` and advance the conversation.
    ///
    /// Always yields something to show; unresolved ids fall back to the root greeting.
    pub fn handle_selection(
        &self,
        state: &mut NavigationState,
        option_id: &str,
        context: &str,
    ) -> RenderInstruction {
        let resolution = self.resolve(option_id, context);
        debug!(
            conversation = %state.id(),
            option_id,
            context,
            resolution = resolution.kind(),
            depth = state.depth(),
            "selection"
        );

        match resolution {
            Resolution::Reset => {
                state.clear_path();
                self.greeting(state)
            }
            Resolution::Back => self.go_back(state),
            Resolution::Answer(answer) => {
                state.push_path(PathEntry::new(context, option_id));
                self.present(state, answer, context)
            }
            Resolution::Topic(topic) => {
                state.push_path(PathEntry::new(self.root_id(), option_id));
                self.present(state, topic, option_id)
            }
            Resolution::Unresolved => {
                let fault = NavigationFault::UnresolvedReference {
                    option_id: option_id.to_string(),
                    context: context.to_string(),
                };
                self.apologize(state, fault)
            }
        }
    }

    fn resolve(&self, option_id: &str, context: &str) -> Resolution<'_> {
        match self.graph.control(option_id) {
            Some(ControlAction::Reset) => return Resolution::Reset,
            Some(ControlAction::GoBack) => return Resolution::Back,
            None => {}
        }

        if context != self.root_id() {
            if let Some(answer) = self.graph.get_answer(context, option_id) {
                return Resolution::Answer(answer);
            }
        }

        match self.graph.get_topic(option_id) {
            Some(topic) => Resolution::Topic(topic),
            None => Resolution::Unresolved,
        }
    }

    /// Step back one screen.
    ///
    /// The entry on top of the stack is the screen being left. The one below
    /// it names the screen to redisplay: under the root it is the topic that
    /// was opened, otherwise it is an answer and its parent topic is shown
    /// again with the parent's option list.
    fn go_back(&self, state: &mut NavigationState) -> RenderInstruction {
        if state.pop_path().is_none() {
            return self.recover(state, NavigationFault::EmptyHistory);
        }

        let Some(previous) = state.peek_path().cloned() else {
            return self.greeting(state);
        };

        let (node, active) = if previous.context == self.root_id() {
            (self.graph.get_topic(&previous.option_id), previous.option_id.as_str())
        } else {
            (
                self.graph
                    .get_topic(&previous.context)
                    .or_else(|| self.graph.get_topic(&previous.option_id)),
                previous.context.as_str(),
            )
        };

        match node {
            Some(node) => self.present(state, node, active),
            None => {
                let fault = NavigationFault::UnresolvedReference {
                    option_id: previous.option_id.clone(),
                    context: previous.context.clone(),
                };
                self.recover(state, fault)
            }
        }
    }

    fn present(
        &self,
        state: &mut NavigationState,
        node: &TopicNode,
        context: &str,
    ) -> RenderInstruction {
        if let Some(message) = &node.message {
            state.record_bot_turn(message.as_str());
        }

        RenderInstruction {
            notice: None,
            message: node.message.as_deref().map(render),
            options: node.options.clone(),
            context: context.to_string(),
            fault: None,
        }
    }

    fn greeting(&self, state: &mut NavigationState) -> RenderInstruction {
        let root = self.graph.root();
        self.present(state, root, root.id.as_str())
    }

    /// Root greeting, marked with the fault that led there.
    fn recover(&self, state: &mut NavigationState, fault: NavigationFault) -> RenderInstruction {
        debug!(conversation = %state.id(), %fault, "showing root greeting");
        let mut instruction = self.greeting(state);
        instruction.fault = Some(fault);
        instruction
    }

    /// Apology followed by the root greeting. The path is left untouched.
    fn apologize(&self, state: &mut NavigationState, fault: NavigationFault) -> RenderInstruction {
        let apology = self.config.fallback_message.as_str();
        state.record_bot_turn(apology);
        let mut instruction = self.recover(state, fault);
        instruction.notice = Some(render(apology));
        instruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> Navigator {
        let graph = ContentGraph::bundled().unwrap();
        Navigator::new(Arc::new(graph), EngineConfig::default()).unwrap()
    }

    fn greeting(nav: &Navigator) -> (Option<StructuredContent>, Vec<OptionRef>) {
        let root = nav.graph().root();
        (root.message.as_deref().map(render), root.options.clone())
    }

    fn assert_is_greeting(nav: &Navigator, instruction: &RenderInstruction) {
        let (message, options) = greeting(nav);
        assert_eq!(instruction.message, message);
        assert_eq!(instruction.options, options);
        assert_eq!(instruction.context, "greeting");
    }

    #[test]
    fn test_start_shows_greeting() {
        let nav = navigator();
        let mut state = NavigationState::new();

        let instruction = nav.start(&mut state);

        assert_is_greeting(&nav, &instruction);
        assert!(instruction.notice.is_none());
        assert!(instruction.fault.is_none());
        assert_eq!(state.transcript().len(), 1);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_services_luxury_back() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let services = nav.handle_selection(&mut state, "services", "greeting");
        assert_eq!(services.context, "services");
        assert_eq!(services.options.len(), 6);

        let luxury = nav.handle_selection(&mut state, "luxury", &services.context);
        assert_eq!(luxury.context, "services");
        assert!(luxury.message.as_ref().unwrap().plain_text().starts_with("Luxury Interiors"));
        assert_eq!(luxury.option_ids(), vec!["pricing", "contact_service", "back"]);
        assert_eq!(state.depth(), 2);

        let back = nav.handle_selection(&mut state, "back", &luxury.context);
        assert_eq!(back.context, "services");
        assert_eq!(back.options, services.options);
        assert_eq!(back.message, services.message);
        assert_eq!(state.path(), &[PathEntry::new("greeting", "services")]);
    }

    #[test]
    fn test_unregistered_id_falls_back() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        let services = nav.handle_selection(&mut state, "services", "greeting");
        let path_before = state.path().to_vec();

        let instruction = nav.handle_selection(&mut state, "luxary", &services.context);

        assert_is_greeting(&nav, &instruction);
        assert_eq!(
            instruction.notice.as_ref().map(|n| n.plain_text()),
            Some(nav.config().fallback_message.clone())
        );
        assert_eq!(
            instruction.fault,
            Some(NavigationFault::UnresolvedReference {
                option_id: "luxary".to_string(),
                context: "services".to_string(),
            })
        );
        assert_eq!(state.path(), path_before.as_slice());
    }

    #[test]
    fn test_back_after_one_descent_returns_greeting() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        nav.handle_selection(&mut state, "faq", "greeting");

        let back = nav.handle_selection(&mut state, "back", "faq");

        assert_is_greeting(&nav, &back);
        assert!(back.fault.is_none());
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_back_at_root_is_idempotent() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let first = nav.handle_selection(&mut state, "back", "greeting");
        let second = nav.handle_selection(&mut state, "back", "greeting");

        assert_is_greeting(&nav, &first);
        assert_eq!(first, second);
        assert_eq!(first.fault, Some(NavigationFault::EmptyHistory));
        assert!(first.notice.is_none());
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_back_with_empty_path_keeps_transcript() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        nav.handle_selection(&mut state, "faq", "greeting");
        nav.handle_selection(&mut state, "back", "faq");
        let turns = state.transcript().len();

        let back = nav.handle_selection(&mut state, "back", "greeting");

        assert_is_greeting(&nav, &back);
        assert_eq!(back.fault, Some(NavigationFault::EmptyHistory));
        assert_eq!(state.depth(), 0);
        assert_eq!(state.transcript().len(), turns + 1);
    }

    #[test]
    fn test_topic_answer_round_trip() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let about = nav.handle_selection(&mut state, "about", "greeting");
        let company = nav.handle_selection(&mut state, "company", &about.context);
        assert_eq!(company.option_ids(), vec!["back"]);

        let back = nav.handle_selection(&mut state, "back", &company.context);
        assert_eq!(back.message, about.message);
        assert_eq!(back.options, about.options);
        assert_eq!(back.context, "about");

        let back = nav.handle_selection(&mut state, "back", &back.context);
        assert_is_greeting(&nav, &back);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_back_redisplays_topic_after_sibling_answers() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let contact = nav.handle_selection(&mut state, "contact", "greeting");
        let visit = nav.handle_selection(&mut state, "visit", &contact.context);
        let hours = nav.handle_selection(&mut state, "hours", &visit.context);
        assert_eq!(hours.context, "contact");
        assert_eq!(state.depth(), 3);

        // One step up from hours shows the contact topic, not the visit answer.
        let back = nav.handle_selection(&mut state, "back", &hours.context);
        assert_eq!(back.message, contact.message);
        assert_eq!(back.context, "contact");
        assert_eq!(state.depth(), 2);
    }

    #[test]
    fn test_main_resets_from_any_depth() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        nav.handle_selection(&mut state, "services", "greeting");
        nav.handle_selection(&mut state, "luxury", "services");
        let cta = nav.handle_selection(&mut state, "contact_service", "services");
        assert_eq!(cta.context, "contact_service");
        assert_eq!(cta.option_ids(), vec!["main"]);
        assert_eq!(state.depth(), 3);

        let instruction = nav.handle_selection(&mut state, "main", &cta.context);

        assert_is_greeting(&nav, &instruction);
        assert_eq!(state.depth(), 0);
        // Earlier turns stay visible as history.
        assert_eq!(state.transcript().len(), 5);
    }

    #[test]
    fn test_explicit_reset_clears_transcript() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        nav.handle_selection(&mut state, "themes", "greeting");
        nav.handle_selection(&mut state, "coastal", "themes");

        let instruction = nav.reset(&mut state);

        assert_is_greeting(&nav, &instruction);
        assert_eq!(state.depth(), 0);
        assert_eq!(state.transcript().len(), 1);
    }

    #[test]
    fn test_shared_terminal_from_answer() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        nav.handle_selection(&mut state, "services", "greeting");
        nav.handle_selection(&mut state, "luxury", "services");

        let pricing = nav.handle_selection(&mut state, "pricing", "services");
        assert_eq!(pricing.context, "pricing");
        assert_eq!(state.path().last(), Some(&PathEntry::new("greeting", "pricing")));

        let back = nav.handle_selection(&mut state, "back", &pricing.context);
        assert_eq!(back.context, "services");
        assert_eq!(back.options.len(), 6);
    }

    #[test]
    fn test_answers_do_not_resolve_under_root() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let instruction = nav.handle_selection(&mut state, "luxury", "greeting");

        assert!(matches!(
            instruction.fault,
            Some(NavigationFault::UnresolvedReference { .. })
        ));
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_dangling_bundled_reference_falls_back() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        let pricing = nav.handle_selection(&mut state, "pricing", "greeting");

        let instruction = nav.handle_selection(&mut state, "phone", &pricing.context);

        assert!(instruction.notice.is_some());
        assert_is_greeting(&nav, &instruction);
        assert_eq!(state.depth(), 1);
    }

    #[test]
    fn test_choose_records_user_turn() {
        let nav = navigator();
        let mut state = NavigationState::new();
        let start = nav.start(&mut state);
        let option = start.option("faq").unwrap().clone();

        let faq = nav.choose(&mut state, &option, &start.context);

        assert_eq!(faq.context, "faq");
        let turns = state.transcript();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[1].speaker, Speaker::User);
        assert_eq!(turns[1].text, "Common Questions");
        assert_eq!(turns[2].speaker, Speaker::Bot);
        assert_eq!(turns[2].text, "Common questions we receive:");
    }

    #[test]
    fn test_independent_conversations() {
        let nav = navigator();
        let mut first = NavigationState::new();
        let mut second = NavigationState::new();
        nav.start(&mut first);
        nav.start(&mut second);

        nav.handle_selection(&mut first, "services", "greeting");
        nav.handle_selection(&mut first, "kitchen", "services");

        assert_eq!(first.depth(), 2);
        assert_eq!(second.depth(), 0);
        let back = nav.handle_selection(&mut second, "back", "greeting");
        assert_eq!(back.fault, Some(NavigationFault::EmptyHistory));
        assert_eq!(first.depth(), 2);
    }

    #[test]
    fn test_custom_control_nodes() {
        let json = r#"{
            "greeting": { "message": "Hi", "options": [{ "id": "faq", "label": "FAQ" }] },
            "faq": { "message": "Q", "options": [{ "id": "up", "label": "Up" }, { "id": "restart", "label": "Restart" }] },
            "up": { "action": "goBack" },
            "restart": { "action": "reset" }
        }"#;
        let nav = Navigator::from_json(json, EngineConfig::default()).unwrap();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        nav.handle_selection(&mut state, "faq", "greeting");
        let up = nav.handle_selection(&mut state, "up", "faq");
        assert_is_greeting(&nav, &up);

        nav.handle_selection(&mut state, "faq", "greeting");
        let restart = nav.handle_selection(&mut state, "restart", "faq");
        assert_is_greeting(&nav, &restart);
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_terminal_topic_without_options() {
        let json = r#"{
            "greeting": { "message": "Hi", "options": [{ "id": "bye", "label": "Bye" }] },
            "bye": { "message": "Goodbye!" }
        }"#;
        let nav = Navigator::from_json(json, EngineConfig::default()).unwrap();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let bye = nav.handle_selection(&mut state, "bye", "greeting");
        assert!(bye.options.is_empty());
        assert_eq!(bye.context, "bye");

        // The reserved back id still works with no option offering it.
        let back = nav.handle_selection(&mut state, "back", &bye.context);
        assert_is_greeting(&nav, &back);
    }

    #[test]
    fn test_strict_references_rejects_bundled() {
        let graph = Arc::new(ContentGraph::bundled().unwrap());
        let config = EngineConfig {
            strict_references: true,
            ..EngineConfig::default()
        };

        let result = Navigator::new(graph, config);

        assert!(matches!(
            result,
            Err(NavigatorError::Graph(GraphError::DanglingReferences(refs))) if refs.len() == 1
        ));
    }

    #[test]
    fn test_root_mismatch() {
        let graph = Arc::new(ContentGraph::bundled().unwrap());
        let config = EngineConfig {
            root_id: "start".to_string(),
            ..EngineConfig::default()
        };

        let result = Navigator::new(graph, config);

        assert!(matches!(result, Err(NavigatorError::RootMismatch { .. })));
    }

    #[test]
    fn test_custom_root_and_fallback() {
        let json = r#"{ "start": { "message": "Welcome", "options": [{ "id": "x", "label": "X" }] } }"#;
        let config = EngineConfig {
            root_id: "start".to_string(),
            fallback_message: "Sorry!".to_string(),
            ..EngineConfig::default()
        };
        let nav = Navigator::from_json(json, config).unwrap();
        let mut state = NavigationState::new();
        nav.start(&mut state);

        let instruction = nav.handle_selection(&mut state, "x", "start");

        assert_eq!(instruction.context, "start");
        assert_eq!(instruction.notice.map(|n| n.plain_text()), Some("Sorry!".to_string()));
    }

    #[test]
    fn test_instruction_serializes() {
        let nav = navigator();
        let mut state = NavigationState::new();
        nav.start(&mut state);
        let instruction = nav.handle_selection(&mut state, "nowhere", "greeting");

        let json = serde_json::to_value(&instruction).unwrap();

        assert_eq!(json["context"], "greeting");
        assert_eq!(json["fault"]["kind"], "unresolved_reference");
        assert_eq!(json["options"][0]["id"], "services");
        let icon = nav.graph().root().options[0].icon.clone().unwrap();
        assert_eq!(json["options"][0]["icon"], icon.as_str());
    }
}
