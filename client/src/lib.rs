//! Conversation state engine for Huddle chat clients.
//!
//! Incoming server events are folded into per-conversation state (history, metadata,
//! membership, unread counters, typing indicators); outgoing operations are mapped onto
//! the backend API method that fits the conversation's variant.

pub mod config;
pub mod conversation;
pub mod runtime;
pub mod transport;

pub use config::ClientConfig;
pub use conversation::{Command, Conversation, ConversationError, ConversationSnapshot, Variant};
pub use runtime::{ConversationHandle, ConversationRuntime};
pub use transport::{ApiRequest, ChannelTransport, Transport, TransportCommand};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
