//! Applying incoming events to conversation state.

use super::event::EventKind;
use super::history::HistoryStore;
use huddle_messaging::{Message, Timestamp, TopicInfo, UserId};
use std::cmp::Ordering;
use tracing::debug;

/// The mutable part of a conversation that events act on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    pub name: String,
    pub topic: TopicInfo,
    pub purpose: TopicInfo,
    pub members: Vec<UserId>,
    pub latest: Option<Message>,
    pub unread_count: u64,
    pub last_read: Option<Timestamp>,
    pub history: HistoryStore,
}

/// Follow-up work requested by [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    MarkRead(Timestamp),
}

/// Where the event lands in history once its subtype rule has run.
enum Record {
    Event,
    Replacement(Message),
    Removal(Timestamp),
    Nothing,
}

/// Apply `event` to `state`.
///
/// Every subtype except deletions and edits is stored under its own `ts`. The unread
/// counter only moves when there is already a `latest` to compare against, so the first
/// message a conversation ever sees never counts as unread.
pub fn reconcile(state: &mut ConversationState, event: Message, auto_mark: bool) -> Option<Effect> {
    let record = match EventKind::classify(&event) {
        EventKind::Posted | EventKind::BotPosted => Record::Event,
        EventKind::Changed(inner) if inner.ts.is_some() => Record::Replacement(inner.clone()),
        EventKind::Changed(_) => {
            debug!(ts = ?event.ts, "edited message carries no ts, ignoring replacement");
            Record::Nothing
        }
        EventKind::Deleted(deleted_ts) => match deleted_ts {
            Some(ts) => Record::Removal(ts.clone()),
            None => Record::Nothing,
        },
        EventKind::TopicSet { topic, user } => {
            state.topic = TopicInfo {
                value: topic.unwrap_or_default().to_string(),
                creator: user.cloned(),
                last_set: event.ts.clone(),
            };
            Record::Event
        }
        EventKind::PurposeSet { purpose, user } => {
            state.purpose = TopicInfo {
                value: purpose.unwrap_or_default().to_string(),
                creator: user.cloned(),
                last_set: event.ts.clone(),
            };
            Record::Event
        }
        EventKind::Renamed(name) => {
            if let Some(name) = name {
                state.name = name.to_string();
            }
            Record::Event
        }
        EventKind::Joined(user) => {
            if let Some(user) = user {
                state.members.push(user.clone());
            }
            Record::Event
        }
        EventKind::Left(user) => {
            if let Some(index) = user.and_then(|u| state.members.iter().position(|m| m == u)) {
                state.members.remove(index);
            }
            Record::Event
        }
        EventKind::Unrecognized(subtype) => {
            debug!(subtype, "unknown message subtype");
            Record::Event
        }
    };

    let latest_ts = state.latest.as_ref().and_then(|l| l.ts.as_ref());
    let advances_latest = match (&event.ts, latest_ts) {
        (Some(ts), Some(latest_ts)) => {
            !event.hidden && ts.numeric_cmp(latest_ts) == Ordering::Greater
        }
        _ => false,
    };
    if advances_latest {
        state.unread_count += 1;
        state.latest = Some(event.clone());
    }

    let mark_at = event.ts.clone();

    match record {
        Record::Event => match event.ts.clone() {
            Some(ts) => {
                state.history.insert(ts, event);
            }
            None => debug!(subtype = ?event.subtype, "event without ts not stored"),
        },
        Record::Replacement(inner) => {
            if let Some(ts) = inner.ts.clone() {
                state.history.insert(ts, inner);
            }
        }
        Record::Removal(ts) => {
            state.history.remove(&ts);
        }
        Record::Nothing => {}
    }

    if auto_mark {
        mark_at.map(Effect::MarkRead)
    } else {
        None
    }
}
