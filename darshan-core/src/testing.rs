//! Testing utilities for the guide.
//!
//! Provides a scripted [`MockBackend`] for deterministic chat tests
//! without network calls, and a [`GuideHarness`] that wires a full
//! session together around it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gemini::{Reply, Request};

use crate::chat::{GenerativeBackend, SendOutcome};
use crate::scene::{Entity, SceneEvent};
use crate::session::GuideSession;

/// A scripted reply for the mock backend to return.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// A well-formed reply carrying this text.
    Text(String),
    /// A raw response body, run through the real shape probing.
    Raw(serde_json::Value),
    /// A non-2xx API error with this status code.
    Status(u16),
}

#[derive(Default)]
struct MockState {
    scripted: VecDeque<ScriptedReply>,
    requests: Vec<Request>,
}

/// A generative backend that returns scripted replies and records every
/// request it receives. Clones share state, so a test can keep a handle
/// after moving the backend into a session.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a well-formed text reply.
    pub fn queue_text(&self, text: impl Into<String>) {
        self.push(ScriptedReply::Text(text.into()));
    }

    /// Queue a raw response body to exercise the shape probing.
    pub fn queue_raw(&self, value: serde_json::Value) {
        self.push(ScriptedReply::Raw(value));
    }

    /// Queue a non-2xx API failure.
    pub fn queue_status(&self, status: u16) {
        self.push(ScriptedReply::Status(status));
    }

    fn push(&self, reply: ScriptedReply) {
        self.state.lock().unwrap().scripted.push_back(reply);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<Request> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, request: Request) -> Result<Reply, gemini::Error> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.scripted.pop_front()
        };

        match scripted {
            Some(ScriptedReply::Text(text)) => Ok(Reply::CandidateParts(text)),
            Some(ScriptedReply::Raw(value)) => Ok(Reply::from_value(value)),
            Some(ScriptedReply::Status(status)) => Err(gemini::Error::Api {
                status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(Reply::CandidateParts(
                "The guide has no more scripted replies.".to_string(),
            )),
        }
    }
}

/// A full guide session wired to a mock backend.
pub struct GuideHarness {
    pub session: GuideSession,
    pub backend: MockBackend,
}

impl GuideHarness {
    pub fn new() -> Self {
        let backend = MockBackend::new();
        let session = GuideSession::with_backend(Box::new(backend.clone()));
        Self { session, backend }
    }

    /// Queue a chat reply.
    pub fn expect_reply(&mut self, text: impl Into<String>) -> &mut Self {
        self.backend.queue_text(text);
        self
    }

    /// Select a site through the loader.
    pub fn select(&mut self, id: &str) {
        self.session.select_site(id);
    }

    /// Dispatch a scene event, as the rendering framework would.
    pub fn dispatch(&mut self, event: SceneEvent) {
        self.session.scene_event(event);
    }

    /// Send a chat message.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        self.session.send_chat(text).await
    }

    /// The entity currently attached under the marker.
    pub fn attachment(&self) -> Option<&Entity> {
        self.session.loader().attachment()
    }

    /// The title currently shown by the info panel, if visible.
    pub fn visible_panel_title(&self) -> Option<&str> {
        let panel = self.session.panel();
        panel.is_visible().then(|| panel.title())
    }
}

impl Default for GuideHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a model entity for the given site is attached.
#[track_caller]
pub fn assert_model_attached(harness: &GuideHarness, site_id: &str) {
    let entity = harness
        .attachment()
        .unwrap_or_else(|| panic!("expected an attachment for '{site_id}'"));
    assert!(entity.is_model(), "expected a model entity for '{site_id}'");
    assert_eq!(entity.site_id, site_id);
}

/// Assert that a primitive fallback with the given color is attached.
#[track_caller]
pub fn assert_primitive_attached(harness: &GuideHarness, color: &str) {
    use crate::scene::EntityKind;
    let entity = harness.attachment().expect("expected an attachment");
    match &entity.kind {
        EntityKind::Primitive { color: actual, .. } => assert_eq!(actual, color),
        other => panic!("expected a primitive fallback, got {other:?}"),
    }
}
