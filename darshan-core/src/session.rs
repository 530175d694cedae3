//! GuideSession - the primary public API for the guide.
//!
//! Wraps the model loader, info panel, and chat session into a single
//! object the frontend owns. All scene mutation flows through here.

use thiserror::Error;

use crate::catalog::SiteRecord;
use crate::chat::{ChatSession, ChatTurn, GenerativeBackend, SendOutcome};
use crate::loader::ModelLoader;
use crate::panel::InfoPanel;
use crate::scene::SceneEvent;

/// Errors from session construction.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No API key configured - set GEMINI_API_KEY environment variable")]
    NoApiKey,
}

/// One run of the guide: marker scene, info panel, chat conversation.
pub struct GuideSession {
    loader: ModelLoader,
    panel: InfoPanel,
    chat: ChatSession,
}

impl GuideSession {
    /// Create a session talking to the real Gemini endpoint.
    ///
    /// Requires the `GEMINI_API_KEY` environment variable to be set.
    pub fn from_env() -> Result<Self, SessionError> {
        let client = gemini::Gemini::from_env().map_err(|_| SessionError::NoApiKey)?;
        Ok(Self::with_backend(Box::new(client)))
    }

    /// Create a session over any generative backend.
    pub fn with_backend(backend: Box<dyn GenerativeBackend>) -> Self {
        Self {
            loader: ModelLoader::new(),
            panel: InfoPanel::new(),
            chat: ChatSession::new(backend),
        }
    }

    /// Select a site, replacing the marker attachment and showing its
    /// info panel. Unknown ids are logged no-ops.
    pub fn select_site(&mut self, id: &str) {
        self.loader.select_site(id, &mut self.panel);
    }

    /// Dispatch a scene event (click or model-error) into the loader.
    pub fn scene_event(&mut self, event: SceneEvent) {
        self.loader.handle_event(event, &mut self.panel);
    }

    /// Dismiss the info panel.
    pub fn hide_panel(&mut self) {
        self.panel.hide();
    }

    /// Send a chat message and wait for the reply (or apology).
    pub async fn send_chat(&mut self, text: &str) -> SendOutcome {
        self.chat.send(text).await
    }

    pub fn loader(&self) -> &ModelLoader {
        &self.loader
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    /// The record for the currently attached site, if any.
    pub fn current_site(&self) -> Option<&'static SiteRecord> {
        self.loader.current_site()
    }

    /// The chat transcript so far.
    pub fn chat_history(&self) -> &[ChatTurn] {
        self.chat.history()
    }
}
