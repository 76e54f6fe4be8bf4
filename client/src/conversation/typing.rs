//! Ephemeral "user is typing" indicators.
//!
//! Each signal schedules an expiry deadline for its user; a repeat signal replaces the
//! deadline instead of stacking a second one. Whoever drives the conversation sleeps
//! until [`TypingTracker::next_deadline`] and then calls [`TypingTracker::expire_due`].

use huddle_messaging::UserId;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct TypingTracker {
    timeout: Duration,
    deadlines: HashMap<UserId, Instant>,
}

impl TypingTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadlines: HashMap::new(),
        }
    }

    pub fn started_typing(&mut self, user: UserId) -> Instant {
        self.started_typing_at(user, Instant::now())
    }

    /// Cancel any pending expiry for `user` and schedule a fresh one from `now`.
    /// Indicators already past their deadline are dropped along the way.
    pub fn started_typing_at(&mut self, user: UserId, now: Instant) -> Instant {
        self.deadlines.retain(|_, deadline| *deadline > now);
        let deadline = now + self.timeout;
        self.deadlines.insert(user, deadline);
        deadline
    }

    pub fn typing(&self) -> BTreeSet<UserId> {
        self.typing_at(Instant::now())
    }

    /// Users whose indicator is still up at `now`, whether or not expiry has been pumped.
    pub fn typing_at(&self, now: Instant) -> BTreeSet<UserId> {
        self.deadlines
            .iter()
            .filter(|(_, deadline)| **deadline > now)
            .map(|(user, _)| user.clone())
            .collect()
    }

    pub fn is_typing(&self, user: &UserId) -> bool {
        self.deadlines
            .get(user)
            .is_some_and(|deadline| *deadline > Instant::now())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Drop every indicator whose deadline has passed and return the affected users.
    pub fn expire_due(&mut self, now: Instant) -> Vec<UserId> {
        let mut expired = Vec::new();
        self.deadlines.retain(|user, deadline| {
            if *deadline <= now {
                expired.push(user.clone());
                false
            } else {
                true
            }
        });
        expired.sort();
        expired
    }
}
