//! Boundary to the network layer.
//!
//! The engine never waits on the network: API calls are handed over together with a
//! callback that runs whenever (and if) the response comes back.

use huddle_messaging::OutboundMessage;
use serde_json::{Map, Value};
use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// Callback invoked with the raw response payload of an API call.
pub type ResponseHandler = Box<dyn FnOnce(Value) + Send + 'static>;

/// A backend API call: method name plus its parameter object.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: &'static str,
    pub params: Map<String, Value>,
}

impl ApiRequest {
    pub fn new(method: &'static str, params: Map<String, Value>) -> Self {
        Self { method, params }
    }
}

/// Fire-and-forget transport consumed by conversations.
pub trait Transport: Send + Sync {
    /// Issue an API call; `on_response` receives the raw payload.
    fn api_call(&self, request: ApiRequest, on_response: ResponseHandler);

    /// Push a message onto the persistent connection. No response is expected.
    fn send(&self, message: OutboundMessage);
}

/// Work handed to the host's network task by [`ChannelTransport`].
pub enum TransportCommand {
    ApiCall {
        request: ApiRequest,
        on_response: ResponseHandler,
    },
    Send(OutboundMessage),
}

impl TransportCommand {
    /// Deliver `response` to the callback of an API call. No-op for sends.
    pub fn respond(self, response: Value) {
        if let TransportCommand::ApiCall { on_response, .. } = self {
            on_response(response);
        }
    }
}

impl fmt::Debug for TransportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCommand::ApiCall { request, .. } => {
                f.debug_struct("ApiCall").field("request", request).finish()
            }
            TransportCommand::Send(message) => f.debug_tuple("Send").field(message).finish(),
        }
    }
}

/// Transport that queues commands on an unbounded channel for a network task to drain.
#[derive(Clone)]
pub struct ChannelTransport {
    command_tx: mpsc::UnboundedSender<TransportCommand>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransportCommand>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        (Self { command_tx }, command_rx)
    }
}

impl Transport for ChannelTransport {
    fn api_call(&self, request: ApiRequest, on_response: ResponseHandler) {
        let method = request.method;
        if self
            .command_tx
            .send(TransportCommand::ApiCall {
                request,
                on_response,
            })
            .is_err()
        {
            warn!(method, "transport closed, dropping api call");
        }
    }

    fn send(&self, message: OutboundMessage) {
        let id = message.id;
        if self.command_tx.send(TransportCommand::Send(message)).is_err() {
            warn!(%id, "transport closed, dropping outbound message");
        }
    }
}
