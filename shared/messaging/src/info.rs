//! Conversation metadata as reported by the server.

use crate::{ConversationId, Message, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A topic or purpose line together with who set it and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_set: Option<Timestamp>,
}

/// Server snapshot of a conversation, used to seed local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationInfo {
    pub id: ConversationId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: TopicInfo,
    #[serde(default)]
    pub purpose: TopicInfo,
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<Message>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read: Option<Timestamp>,
}

impl ConversationInfo {
    pub fn new(id: impl Into<ConversationId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            topic: TopicInfo::default(),
            purpose: TopicInfo::default(),
            members: Vec::new(),
            latest: None,
            unread_count: 0,
            last_read: None,
        }
    }
}
