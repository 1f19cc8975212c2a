//! Per-key request sequencing.
//!
//! Every request for a `(tenant_id, type)` slot takes a ticket. When the
//! response arrives it is accepted only if no newer ticket was issued for the
//! same slot in the meantime, so a slow stale response cannot overwrite a
//! fresher one.

use std::collections::HashMap;

use parking_lot::Mutex;

use form_engine_core::ConfigKey;

/// Proof of issue for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: ConfigKey,
    sequence: u64,
}

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Result of completing a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The ticket is the latest for its slot
    Fresh(T),
    /// A newer request was issued; the response is dropped
    Stale,
}

impl<T> Outcome<T> {
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Outcome::Fresh(value) => Some(value),
            Outcome::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Outcome::Stale)
    }
}

/// Monotonic ticket counter per slot.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    latest: Mutex<HashMap<ConfigKey, u64>>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket newer than every earlier one for the slot.
    pub fn issue(&self, key: ConfigKey) -> Ticket {
        let mut latest = self.latest.lock();
        let counter = latest.entry(key.clone()).or_insert(0);
        *counter += 1;
        Ticket {
            key,
            sequence: *counter,
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.latest
            .lock()
            .get(&ticket.key)
            .is_some_and(|&latest| latest == ticket.sequence)
    }

    /// Accepts `value` if the ticket is still the latest for its slot.
    pub fn complete<T>(&self, ticket: &Ticket, value: T) -> Outcome<T> {
        if self.is_latest(ticket) {
            Outcome::Fresh(value)
        } else {
            tracing::warn!(
                key = %ticket.key,
                sequence = ticket.sequence,
                "Dropping stale response"
            );
            Outcome::Stale
        }
    }
}
