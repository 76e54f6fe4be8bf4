//! A single chat conversation: channel, private group or direct message.
//!
//! [`Conversation`] owns the history and typing state, folds incoming events in through
//! [`reconcile`] and sends commands out through a [`Dispatcher`]. It assumes a single
//! owner; see [`crate::runtime`] for running one behind a task.

mod dispatch;
mod event;
mod history;
mod reconcile;
mod typing;

pub use dispatch::{Command, Dispatcher, Variant};
pub use event::EventKind;
pub use history::HistoryStore;
pub use reconcile::{reconcile, ConversationState, Effect};
pub use typing::TypingTracker;

use crate::config::ClientConfig;
use crate::transport::Transport;
use huddle_messaging::{
    ConversationId, ConversationInfo, Message, MessagingError, OutboundMessage, Timestamp,
    TopicInfo, UserId,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("conversation task has stopped")]
    Closed,
    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

pub type Result<T> = std::result::Result<T, ConversationError>;

/// Point-in-time copy of a conversation's visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSnapshot {
    pub id: ConversationId,
    pub variant: Variant,
    pub name: String,
    pub topic: TopicInfo,
    pub purpose: TopicInfo,
    pub members: Vec<UserId>,
    pub latest: Option<Message>,
    pub unread_count: u64,
    pub last_read: Option<Timestamp>,
    pub history_len: usize,
    pub typing: BTreeSet<UserId>,
}

pub struct Conversation {
    id: ConversationId,
    variant: Variant,
    state: ConversationState,
    typing: TypingTracker,
    dispatcher: Dispatcher,
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl Conversation {
    pub fn new(
        id: impl Into<ConversationId>,
        variant: Variant,
        transport: Arc<dyn Transport>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self::from_info(ConversationInfo::new(id), variant, transport, config)
    }

    /// Seed a conversation from the server's listing of it.
    pub fn from_info(
        info: ConversationInfo,
        variant: Variant,
        transport: Arc<dyn Transport>,
        config: Arc<ClientConfig>,
    ) -> Self {
        let ConversationInfo {
            id,
            name,
            topic,
            purpose,
            members,
            latest,
            unread_count,
            last_read,
        } = info;

        Self {
            dispatcher: Dispatcher::new(id.clone(), variant, Arc::clone(&transport)),
            typing: TypingTracker::new(config.typing_timeout),
            state: ConversationState {
                name,
                topic,
                purpose,
                members,
                latest,
                unread_count,
                last_read,
                history: HistoryStore::new(),
            },
            id,
            variant,
            transport,
            config,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn topic(&self) -> &TopicInfo {
        &self.state.topic
    }

    pub fn purpose(&self) -> &TopicInfo {
        &self.state.purpose
    }

    pub fn members(&self) -> &[UserId] {
        &self.state.members
    }

    pub fn latest(&self) -> Option<&Message> {
        self.state.latest.as_ref()
    }

    pub fn unread_count(&self) -> u64 {
        self.state.unread_count
    }

    pub fn last_read(&self) -> Option<&Timestamp> {
        self.state.last_read.as_ref()
    }

    /// The live history map. It is not a copy: later events show up in it.
    pub fn history(&self) -> &BTreeMap<Timestamp, Message> {
        self.state.history.as_map()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            id: self.id.clone(),
            variant: self.variant,
            name: self.state.name.clone(),
            topic: self.state.topic.clone(),
            purpose: self.state.purpose.clone(),
            members: self.state.members.clone(),
            latest: self.state.latest.clone(),
            unread_count: self.state.unread_count,
            last_read: self.state.last_read.clone(),
            history_len: self.state.history.len(),
            typing: self.typing(),
        }
    }

    /// Fold an incoming event into local state, marking it read when auto-mark is on.
    pub fn add_message(&mut self, event: Message) {
        let effect = reconcile(&mut self.state, event, self.config.auto_mark);
        if let Some(Effect::MarkRead(ts)) = effect {
            self.mark(ts);
        }
    }

    /// Record the read cursor the server reported.
    pub fn set_last_read(&mut self, ts: Timestamp) {
        self.state.last_read = Some(ts);
    }

    /// Recompute `unread_count` from history and the read cursor.
    pub fn recalc_unreads(&mut self) -> u64 {
        self.state.unread_count = self
            .state
            .history
            .count_unread(self.state.last_read.as_ref());
        self.state.unread_count
    }

    pub fn started_typing(&mut self, user: UserId) {
        self.typing.started_typing(user);
    }

    pub fn typing(&self) -> BTreeSet<UserId> {
        self.typing.typing()
    }

    pub fn is_typing(&self, user: &UserId) -> bool {
        self.typing.is_typing(user)
    }

    pub fn next_typing_deadline(&self) -> Option<Instant> {
        self.typing.next_deadline()
    }

    /// Drop typing indicators whose quiet period ended by `now`.
    pub fn expire_typing(&mut self, now: Instant) -> Vec<UserId> {
        let expired = self.typing.expire_due(now);
        for user in &expired {
            debug!(channel = %self.id, %user, "typing indicator expired");
        }
        expired
    }

    /// Post through the web API. `attachments` are sent in their JSON text form.
    pub fn post_message(&self, mut payload: Map<String, Value>) -> Result<()> {
        if let Some(attachments) = payload.get_mut("attachments") {
            if !attachments.is_string() && !attachments.is_null() {
                let encoded = serde_json::to_string(attachments).map_err(MessagingError::Encode)?;
                *attachments = Value::String(encoded);
            }
        }
        payload.insert("channel".into(), Value::String(self.id.to_string()));
        debug!(channel = %self.id, params = ?payload, "posting message");
        self.dispatcher.call("chat.postMessage", payload);
        Ok(())
    }

    /// Send `text` over the persistent connection. Returns the correlation id.
    pub fn send(&self, text: impl Into<String>) -> Uuid {
        self.send_message(OutboundMessage::text(text))
    }

    pub fn send_message(&self, mut message: OutboundMessage) -> Uuid {
        message.channel = Some(self.id.clone());
        let id = message.id;
        self.transport.send(message);
        id
    }

    pub fn dispatch(&self, command: Command) -> Option<&'static str> {
        self.dispatcher.dispatch(command)
    }

    pub fn fetch_history(
        &self,
        latest: Option<Timestamp>,
        oldest: Option<Timestamp>,
    ) -> Option<&'static str> {
        self.dispatch(Command::FetchHistory { latest, oldest })
    }

    pub fn mark(&self, ts: Timestamp) -> Option<&'static str> {
        self.dispatch(Command::Mark { ts })
    }

    pub fn leave(&self) -> Option<&'static str> {
        self.dispatch(Command::Leave)
    }

    pub fn set_topic(&self, topic: impl Into<String>) -> Option<&'static str> {
        self.dispatch(Command::SetTopic {
            topic: topic.into(),
        })
    }

    pub fn set_purpose(&self, purpose: impl Into<String>) -> Option<&'static str> {
        self.dispatch(Command::SetPurpose {
            purpose: purpose.into(),
        })
    }

    pub fn rename(&self, name: impl Into<String>) -> Option<&'static str> {
        self.dispatch(Command::Rename { name: name.into() })
    }

    pub fn invite(&self, user: UserId) -> Option<&'static str> {
        self.dispatch(Command::Invite { user })
    }
}
