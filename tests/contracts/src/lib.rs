//! Fixtures shared by the contract tests.

use huddle_client::{ChannelTransport, ClientConfig, Conversation, TransportCommand, Variant};
use huddle_messaging::Message;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// A conversation wired to a channel transport, plus the receiving end of that transport.
pub struct Fixture {
    pub conversation: Conversation,
    pub outbox: UnboundedReceiver<TransportCommand>,
}

impl Fixture {
    pub fn new(id: &str, variant: Variant) -> Self {
        Self::with_config(id, variant, ClientConfig::default())
    }

    pub fn with_config(id: &str, variant: Variant, config: ClientConfig) -> Self {
        let (transport, outbox) = ChannelTransport::new();
        Self {
            conversation: Conversation::new(id, variant, Arc::new(transport), Arc::new(config)),
            outbox,
        }
    }

    /// Every API call issued so far as `(method, params)`.
    pub fn api_calls(&mut self) -> Vec<(&'static str, Value)> {
        let mut calls = Vec::new();
        while let Ok(command) = self.outbox.try_recv() {
            if let TransportCommand::ApiCall { request, .. } = command {
                calls.push((request.method, Value::Object(request.params)));
            }
        }
        calls
    }
}

/// Parse a raw server event, panicking on malformed fixtures.
pub fn event(raw: Value) -> Message {
    Message::from_value(raw).expect("fixture event should decode")
}
