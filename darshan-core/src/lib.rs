//! AR heritage guide engine.
//!
//! This crate provides:
//! - A static catalog of heritage sites with model and fallback specs
//! - The marker scene model and the loader/fallback state machine
//! - The info panel controller
//! - A chatbot session backed by a generative-language endpoint
//!
//! # Quick Start
//!
//! ```ignore
//! use darshan_core::GuideSession;
//! use darshan_core::scene::SceneEvent;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = GuideSession::from_env()?;
//!
//!     session.select_site("tajmahal");
//!     println!("{}", session.panel().title());
//!
//!     session.send_chat("Who commissioned the Taj Mahal?").await;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod chat;
pub mod loader;
pub mod panel;
pub mod scene;
pub mod session;
pub mod testing;

// Primary public API
pub use catalog::SiteRecord;
pub use chat::{ChatSession, ChatTurn, GenerativeBackend, SendOutcome, TurnRole};
pub use loader::{AttachmentState, ModelLoader};
pub use panel::InfoPanel;
pub use scene::{Entity, EntityKind, Marker, SceneEvent};
pub use session::{GuideSession, SessionError};
pub use testing::{GuideHarness, MockBackend};
