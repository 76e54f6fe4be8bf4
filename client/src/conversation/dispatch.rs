//! Mapping conversation operations onto backend API methods.

use crate::transport::{ApiRequest, ResponseHandler, Transport};
use huddle_messaging::{ConversationId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// The fixed category of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    PublicChannel,
    PrivateGroup,
    DirectMessage,
}

/// A logical operation on a conversation, independent of its variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchHistory {
        latest: Option<Timestamp>,
        oldest: Option<Timestamp>,
    },
    Mark {
        ts: Timestamp,
    },
    Leave,
    SetTopic {
        topic: String,
    },
    SetPurpose {
        purpose: String,
    },
    Rename {
        name: String,
    },
    Invite {
        user: UserId,
    },
}

impl Command {
    /// Backend method for this operation, or `None` where the variant does not support it.
    pub fn method(&self, variant: Variant) -> Option<&'static str> {
        use Variant::{DirectMessage, PrivateGroup, PublicChannel};

        let method = match (self, variant) {
            (Command::FetchHistory { .. }, PublicChannel) => "channels.history",
            (Command::FetchHistory { .. }, PrivateGroup) => "groups.history",
            (Command::FetchHistory { .. }, DirectMessage) => "im.history",
            (Command::Mark { .. }, PublicChannel) => "channels.mark",
            (Command::Mark { .. }, PrivateGroup) => "groups.mark",
            (Command::Mark { .. }, DirectMessage) => "im.mark",
            (Command::Leave, PublicChannel) => "channels.leave",
            (Command::Leave, PrivateGroup) => "groups.leave",
            (Command::SetTopic { .. }, PublicChannel) => "channels.setTopic",
            (Command::SetTopic { .. }, PrivateGroup) => "groups.setTopic",
            (Command::SetPurpose { .. }, PublicChannel) => "channels.setPurpose",
            (Command::SetPurpose { .. }, PrivateGroup) => "groups.setPurpose",
            (Command::Rename { .. }, PublicChannel) => "channels.rename",
            (Command::Rename { .. }, PrivateGroup) => "groups.rename",
            (Command::Invite { .. }, PublicChannel) => "channels.invite",
            (Command::Invite { .. }, PrivateGroup) => "groups.invite",
            (
                Command::Leave
                | Command::SetTopic { .. }
                | Command::SetPurpose { .. }
                | Command::Rename { .. }
                | Command::Invite { .. },
                DirectMessage,
            ) => return None,
        };
        Some(method)
    }

    /// Wire parameters: always `channel`, plus the operation's own fields.
    pub fn into_params(self, channel: &ConversationId) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("channel".into(), Value::String(channel.to_string()));
        match self {
            Command::FetchHistory { latest, oldest } => {
                if let Some(latest) = latest {
                    params.insert("latest".into(), Value::String(latest.to_string()));
                }
                if let Some(oldest) = oldest {
                    params.insert("oldest".into(), Value::String(oldest.to_string()));
                }
            }
            Command::Mark { ts } => {
                params.insert("ts".into(), Value::String(ts.to_string()));
            }
            Command::Leave => {}
            Command::SetTopic { topic } => {
                params.insert("topic".into(), Value::String(topic));
            }
            Command::SetPurpose { purpose } => {
                params.insert("purpose".into(), Value::String(purpose));
            }
            Command::Rename { name } => {
                params.insert("name".into(), Value::String(name));
            }
            Command::Invite { user } => {
                params.insert("user".into(), Value::String(user.to_string()));
            }
        }
        params
    }
}

/// Issues commands for one conversation through the transport.
#[derive(Clone)]
pub struct Dispatcher {
    channel: ConversationId,
    variant: Variant,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(channel: ConversationId, variant: Variant, transport: Arc<dyn Transport>) -> Self {
        Self {
            channel,
            variant,
            transport,
        }
    }

    /// Resolve and issue `command`. Returns the method used, or `None` when skipped.
    pub fn dispatch(&self, command: Command) -> Option<&'static str> {
        let Some(method) = command.method(self.variant) else {
            debug!(
                channel = %self.channel,
                variant = ?self.variant,
                ?command,
                "operation not available, skipping"
            );
            return None;
        };
        self.call(method, command.into_params(&self.channel));
        Some(method)
    }

    /// Issue a variant-independent API call; the response is only logged.
    pub fn call(&self, method: &'static str, params: Map<String, Value>) {
        self.transport
            .api_call(ApiRequest::new(method, params), log_response(method));
    }
}

fn log_response(method: &'static str) -> ResponseHandler {
    Box::new(move |response| debug!(method, %response, "api response"))
}
