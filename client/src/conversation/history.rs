//! Timestamp-ordered message history of a single conversation.

use huddle_messaging::{Message, Timestamp};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryStore {
    messages: BTreeMap<Timestamp, Message>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message` under `ts`, replacing whatever was there.
    pub fn insert(&mut self, ts: Timestamp, message: Message) -> Option<Message> {
        self.messages.insert(ts, message)
    }

    /// Remove the entry at `ts`. Missing keys are fine.
    pub fn remove(&mut self, ts: &Timestamp) -> Option<Message> {
        self.messages.remove(ts)
    }

    pub fn get(&self, ts: &Timestamp) -> Option<&Message> {
        self.messages.get(ts)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Timestamp, &Message)> {
        self.messages.iter()
    }

    pub fn as_map(&self) -> &BTreeMap<Timestamp, Message> {
        &self.messages
    }

    /// Visible entries strictly newer than `last_read`, or every visible entry without a cursor.
    pub fn count_unread(&self, last_read: Option<&Timestamp>) -> u64 {
        self.messages
            .iter()
            .filter(|(_, message)| !message.hidden)
            .filter(|(ts, _)| {
                last_read.map_or(true, |cursor| ts.numeric_cmp(cursor) == Ordering::Greater)
            })
            .count() as u64
    }
}
