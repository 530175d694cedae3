//! Chatbot session backed by a generative-language endpoint.
//!
//! The session owns its conversation history explicitly; there is no
//! ambient global state. Because `send` takes `&mut self`, a session can
//! never have two requests in flight, which resolves the overlapping-send
//! ambiguity of the original page structurally.

use async_trait::async_trait;
use gemini::{Content, Gemini, Reply, Request};

/// Persona framing sent as the system instruction on every request.
pub const PERSONA: &str = "You are a helpful AI assistant for an Indian heritage and culture \
     guide. Answer concisely and informatively.";

/// Fixed apology rendered when the request fails for any reason.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again later.";

/// Fixed placeholder rendered when no known response shape matched.
pub const PLACEHOLDER: &str = "I'm not sure how to respond to that.";

/// At most this many recent turns are forwarded as context. Older turns
/// are retained for display only.
const CONTEXT_TURNS: usize = 5;

const TEMPERATURE: f32 = 0.7;
const TOP_K: u32 = 1;
const TOP_P: f32 = 0.8;
const MAX_OUTPUT_TOKENS: u32 = 500;

/// The sender of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
        }
    }
}

/// Seam for the generative-language endpoint, so tests can script
/// replies without a network.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, request: Request) -> Result<Reply, gemini::Error>;
}

#[async_trait]
impl GenerativeBackend for gemini::Gemini {
    async fn generate(&self, request: Request) -> Result<Reply, gemini::Error> {
        Gemini::generate(self, request).await
    }
}

/// What a call to [`ChatSession::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing happened.
    Ignored,
    /// An assistant reply (possibly the placeholder) was appended.
    Replied,
    /// The request failed; the fixed apology was appended.
    Failed,
}

/// A chatbot conversation for the lifetime of one run.
pub struct ChatSession {
    backend: Box<dyn GenerativeBackend>,
    history: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new(backend: Box<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            history: Vec::new(),
        }
    }

    /// The full conversation so far, in insertion order.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Send a user message and append the assistant's reply.
    ///
    /// Empty input (after trimming) is rejected without a turn or a
    /// network call. Errors never propagate: failure appends the fixed
    /// apology and is reported through the outcome only.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.history.push(ChatTurn::user(text));
        let result = self.backend.generate(self.build_request()).await;

        match result {
            Ok(reply) => {
                let answer = match reply.text().map(str::trim) {
                    Some(text) if !text.is_empty() => text.to_string(),
                    _ => {
                        tracing::warn!("no usable text in reply, using placeholder");
                        PLACEHOLDER.to_string()
                    }
                };
                self.history.push(ChatTurn::assistant(answer));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::error!(error = %e, "chat request failed");
                self.history.push(ChatTurn::assistant(APOLOGY));
                SendOutcome::Failed
            }
        }
    }

    /// Build the request from the persona and the recent context window.
    fn build_request(&self) -> Request {
        let start = self.history.len().saturating_sub(CONTEXT_TURNS);
        let contents = self.history[start..]
            .iter()
            .map(|turn| match turn.role {
                TurnRole::User => Content::user(&turn.text),
                TurnRole::Assistant => Content::model(&turn.text),
            })
            .collect();

        Request::new(contents)
            .with_system(PERSONA)
            .with_temperature(TEMPERATURE)
            .with_top_k(TOP_K)
            .with_top_p(TOP_P)
            .with_max_output_tokens(MAX_OUTPUT_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    #[tokio::test]
    async fn test_send_appends_both_turns() {
        let backend = MockBackend::new();
        backend.queue_text("The Taj Mahal was completed in 1653.");
        let mut chat = ChatSession::new(Box::new(backend));

        let outcome = chat.send("When was the Taj Mahal built?").await;

        assert_eq!(outcome, SendOutcome::Replied);
        assert_eq!(chat.history().len(), 2);
        assert_eq!(chat.history()[0].role, TurnRole::User);
        assert_eq!(chat.history()[1].role, TurnRole::Assistant);
        assert!(chat.history()[1].text.contains("1653"));
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let backend = MockBackend::new();
        let requests = backend.clone();
        let mut chat = ChatSession::new(Box::new(backend));

        assert_eq!(chat.send("").await, SendOutcome::Ignored);
        assert_eq!(chat.send("   ").await, SendOutcome::Ignored);

        assert!(chat.history().is_empty());
        assert!(requests.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_persona_and_parameters() {
        let backend = MockBackend::new();
        backend.queue_text("Namaste!");
        let recorder = backend.clone();
        let mut chat = ChatSession::new(Box::new(backend));

        chat.send("Hello").await;

        let request = recorder.last_request().unwrap();
        assert_eq!(request.system.as_deref(), Some(PERSONA));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_k, Some(1));
        assert_eq!(request.top_p, Some(0.8));
        assert_eq!(request.max_output_tokens, Some(500));
    }

    #[tokio::test]
    async fn test_context_capped_at_five_turns() {
        let backend = MockBackend::new();
        let recorder = backend.clone();
        let mut chat = ChatSession::new(Box::new(backend));

        for i in 0..12 {
            recorder.queue_text(format!("reply {i}"));
            chat.send(&format!("question {i}")).await;
        }

        // All 24 turns are retained for display.
        assert_eq!(chat.history().len(), 24);

        // But the last request carried exactly the 5 most recent turns.
        let request = recorder.last_request().unwrap();
        assert_eq!(request.contents.len(), 5);
        assert_eq!(request.contents[4].text, "question 11");
        assert_eq!(request.contents[3].text, "reply 10");
    }

    #[tokio::test]
    async fn test_failure_appends_single_apology() {
        let backend = MockBackend::new();
        backend.queue_status(429);
        let mut chat = ChatSession::new(Box::new(backend));

        let outcome = chat.send("Hello?").await;

        assert_eq!(outcome, SendOutcome::Failed);
        let apologies: Vec<_> = chat
            .history()
            .iter()
            .filter(|t| t.text == APOLOGY)
            .collect();
        assert_eq!(apologies.len(), 1);
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_unrecognized_reply_uses_placeholder() {
        let backend = MockBackend::new();
        backend.queue_raw(serde_json::json!({"usageMetadata": {"totalTokenCount": 3}}));
        let mut chat = ChatSession::new(Box::new(backend));

        assert_eq!(chat.send("Hello").await, SendOutcome::Replied);
        assert_eq!(chat.history()[1].text, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_blank_reply_uses_placeholder() {
        let backend = MockBackend::new();
        backend.queue_text("   ");
        let mut chat = ChatSession::new(Box::new(backend));

        chat.send("Hello").await;
        assert_eq!(chat.history()[1].text, PLACEHOLDER);
    }
}
