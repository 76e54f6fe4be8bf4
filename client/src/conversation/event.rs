//! Classification of incoming message events by subtype.

use huddle_messaging::{Message, Timestamp, UserId};

/// What an incoming event means for the conversation, borrowed from the raw message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind<'a> {
    /// A regular message, including archive / unarchive notices.
    Posted,
    /// An edit; the nested message replaces the stored one.
    Changed(&'a Message),
    Deleted(Option<&'a Timestamp>),
    TopicSet {
        topic: Option<&'a str>,
        user: Option<&'a UserId>,
    },
    PurposeSet {
        purpose: Option<&'a str>,
        user: Option<&'a UserId>,
    },
    Renamed(Option<&'a str>),
    BotPosted,
    Joined(Option<&'a UserId>),
    Left(Option<&'a UserId>),
    /// A subtype this client does not know; the event is still kept.
    Unrecognized(&'a str),
}

impl<'a> EventKind<'a> {
    pub fn classify(message: &'a Message) -> Self {
        let Some(subtype) = message.subtype.as_deref() else {
            return EventKind::Posted;
        };

        match subtype {
            "channel_archive" | "channel_unarchive" | "group_archive" | "group_unarchive" => {
                EventKind::Posted
            }
            "message_changed" => match message.message.as_deref() {
                Some(inner) => EventKind::Changed(inner),
                None => EventKind::Unrecognized(subtype),
            },
            "message_deleted" => EventKind::Deleted(message.deleted_ts.as_ref()),
            "channel_topic" | "group_topic" => EventKind::TopicSet {
                topic: message.topic.as_deref(),
                user: message.user.as_ref(),
            },
            "channel_purpose" | "group_purpose" => EventKind::PurposeSet {
                purpose: message.purpose.as_deref(),
                user: message.user.as_ref(),
            },
            "channel_name" | "group_name" => EventKind::Renamed(message.name.as_deref()),
            "bot_message" => EventKind::BotPosted,
            "channel_join" | "group_join" => EventKind::Joined(message.user.as_ref()),
            "channel_leave" | "group_leave" => EventKind::Left(message.user.as_ref()),
            other => EventKind::Unrecognized(other),
        }
    }
}
