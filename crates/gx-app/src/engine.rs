//! Engine - shared orchestration state for the shells
//!
//! The Engine owns the application state, the message channel and the event
//! broadcaster. Deferred work (highlight passes, search slices) goes through
//! the channel so it runs after everything already queued.

use std::path::Path;

use gx_core::prelude::*;
use tokio::sync::{broadcast, mpsc};

use crate::breadcrumb::breadcrumb;
use crate::config::{self, Settings};
use crate::engine_event::EngineEvent;
use crate::handler::{self, UpdateAction};
use crate::message::Message;
use crate::state::AppState;
use crate::tree::NodeId;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StateSnapshot {
    root_generation: u64,
    selected: Option<NodeId>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            root_generation: state.root_generation,
            selected: state.selected(),
        }
    }
}

pub struct Engine {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the message channel
    pub msg_tx: mpsc::UnboundedSender<Message>,

    /// Receiver half; drained by the shell's event loop
    pub msg_rx: mpsc::UnboundedReceiver<Message>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl Engine {
    /// Create an Engine with settings from `<config_dir>/.gx/config.toml`.
    ///
    /// A default config file is written if none exists (non-fatal if it
    /// cannot be).
    pub fn new(config_dir: &Path) -> Self {
        if let Err(e) = config::init_config_dir(config_dir) {
            warn!("Failed to initialize .gx directory: {}", e);
        }
        let settings = config::load_settings(config_dir);
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Settings) -> Self {
        let state = AppState::with_settings(settings);
        let (msg_tx, msg_rx) = mpsc::unbounded_channel::<Message>();
        // Broadcast channel for engine events (capacity 256)
        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            msg_tx,
            msg_rx,
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Queue a message for the next drain.
    pub fn send(&self, msg: Message) {
        // The receiver lives in self
        let _ = self.msg_tx.send(msg);
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Follow-up messages run immediately, deferred ones are queued on the
    /// channel. Emits EngineEvents based on state changes detected by
    /// comparing before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        let mut next = Some(msg);
        while let Some(m) = next {
            let result = handler::update(&mut self.state, m);
            match result.action {
                Some(UpdateAction::Defer(deferred)) => self.send(deferred),
                Some(UpdateAction::Notify(event)) => self.emit(event),
                None => {}
            }
            next = result.message;
        }

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Drain and process all pending messages from the channel, including
    /// those queued while draining. Returns the number processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Like [`Self::drain_pending_messages`], yielding to the runtime after
    /// each message so other tasks keep running during a long search.
    pub async fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
            tokio::task::yield_now().await;
        }
        count
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        let Some(tree) = self.state.tree.as_ref() else {
            return;
        };

        if pre.root_generation != post.root_generation {
            if let Ok(root) = tree.node(tree.root()) {
                self.emit(EngineEvent::RootLoaded {
                    root: root.id,
                    name: root.name.clone(),
                    value_text: root.value_text.clone(),
                    failed: root.value.is_failure(),
                });
            }
        }

        let root_changed = pre.root_generation != post.root_generation;
        if pre.selected != post.selected && !(root_changed && post.selected.is_none()) {
            let crumb = post
                .selected
                .and_then(|node| breadcrumb(tree, node).ok())
                .unwrap_or_default();
            self.emit(EngineEvent::SelectionChanged {
                node: post.selected,
                breadcrumb: crumb,
            });
        }
    }

    /// Emit an event to all subscribers.
    ///
    /// Silently ignores send errors (no subscribers is not an error).
    fn emit(&self, event: EngineEvent) {
        trace!("Engine event: {}", event.event_type());
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchOptions, SearchOutcome};
    use gx_core::{DynamicObject, TypeDescriptor, Value};
    use tempfile::tempdir;

    fn demo_root() -> Message {
        let root = DynamicObject::new(TypeDescriptor::named("Root"))
            .with_display("root")
            .with_field("Name", TypeDescriptor::String, "first")
            .with_field("Other", TypeDescriptor::String, "second");
        Message::LoadRoot {
            name: "root".into(),
            value: Value::object(root),
            declared_type: TypeDescriptor::Object,
        }
    }

    fn collect(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_engine_new_creates_config() {
        let temp = tempdir().unwrap();
        let engine = Engine::new(temp.path());
        assert!(temp.path().join(".gx/config.toml").exists());
        assert_eq!(engine.state.settings, Settings::default());
    }

    #[test]
    fn test_load_root_emits_root_loaded() {
        let mut engine = Engine::with_settings(Settings::default());
        let mut rx = engine.subscribe();

        engine.process_message(demo_root());

        let events = collect(&mut rx);
        assert_eq!(
            events,
            vec![EngineEvent::RootLoaded {
                root: NodeId::new(0),
                name: "root".into(),
                value_text: "root".into(),
                failed: false,
            }]
        );
    }

    #[test]
    fn test_deferred_highlight_runs_on_drain() {
        let mut engine = Engine::with_settings(Settings::default());
        engine.process_message(demo_root());
        let root = engine.state.tree.as_ref().unwrap().root();
        engine.process_message(Message::Expand(root));
        let name = engine
            .state
            .tree
            .as_ref()
            .unwrap()
            .child_named(root, "Name")
            .unwrap();

        let mut rx = engine.subscribe();
        engine.process_message(Message::Select(name));
        assert_eq!(
            collect(&mut rx),
            vec![EngineEvent::SelectionChanged {
                node: Some(name),
                breadcrumb: "Name".into(),
            }]
        );

        assert_eq!(engine.drain_pending_messages(), 1);
        assert_eq!(
            collect(&mut rx),
            vec![EngineEvent::HighlightApplied { count: 0 }]
        );
    }

    #[tokio::test]
    async fn test_search_completes_when_idle() {
        let mut settings = Settings::default();
        settings.search.steps_per_slice = 1;
        let mut engine = Engine::with_settings(settings);
        engine.process_message(demo_root());
        let mut rx = engine.subscribe();

        engine.send(Message::StartSearch {
            start: None,
            options: SearchOptions::new("second"),
        });
        let processed = engine.run_until_idle().await;
        assert!(processed > 2);

        let events = collect(&mut rx);
        let outcome = events.iter().find_map(|event| match event {
            EngineEvent::SearchFinished { outcome, .. } => Some(*outcome),
            _ => None,
        });
        assert!(matches!(outcome, Some(SearchOutcome::Found { .. })));
        assert!(events
            .iter()
            .any(|event| matches!(event, EngineEvent::SelectionChanged { .. })));
    }
}
