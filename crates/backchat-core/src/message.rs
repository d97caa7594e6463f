//! Upstream message values consumed by the transcript.
//!
//! The message store owns these; the row model only reads them. Two fields
//! matter for diffing: `stable_id`, the per-message identity that feeds the
//! entry identifier, and `stable_version`, bumped by the store on every
//! content mutation so equality can detect edits without comparing bodies.

use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::entry::STABLE_ID_BASE_MASK;

/// Stable numeric id assigned by the message store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

/// Chronological key of a message: timestamp, per-peer sequence, id.
///
/// Field order gives the derived `Ord` the intended lexicographic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageIndex {
    pub timestamp: u64,
    pub sequence: u32,
    pub id: MessageId,
}

impl MessageIndex {
    /// Sorts before every real message index.
    pub const MIN: MessageIndex = MessageIndex {
        timestamp: 0,
        sequence: 0,
        id: MessageId(0),
    };

    pub fn new(timestamp: u64, sequence: u32, id: MessageId) -> Self {
        Self {
            timestamp,
            sequence,
            id,
        }
    }
}

bitflags! {
    /// Delivery and display state of a message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MessageFlags: u32 {
        /// Authored by the remote peer.
        const INCOMING = 1 << 0;
        /// Upload in progress.
        const SENDING = 1 << 1;
        /// Queued locally, not yet handed to the network.
        const UNSENT = 1 << 2;
        /// Delivery failed.
        const FAILED = 1 << 3;
        /// Pinned in the conversation.
        const PINNED = 1 << 4;
        /// Delivered without a notification.
        const SILENT = 1 << 5;
    }
}

/// A media attachment. Compared by value, element-wise within a message's
/// attachment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Media {
    Photo {
        id: u64,
        width: u32,
        height: u32,
    },
    Video {
        id: u64,
        width: u32,
        height: u32,
        duration_secs: u32,
    },
    Document {
        id: u64,
        file_name: String,
        size_bytes: u64,
    },
}

/// A quoted or replied-to message resolved from the associated-message
/// cache. Equality decisions only consult `stable_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedMessage {
    pub stable_version: u32,
    pub text: String,
}

/// A raw message as produced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Identity for diffing. Nonzero, fits the 40-bit base field, and is
    /// drawn from a space disjoint from group stable ids.
    pub stable_id: u64,
    /// Bumped by the store on every content mutation.
    pub stable_version: u32,
    pub timestamp: u64,
    pub sequence: u32,
    pub flags: MessageFlags,
    pub text: String,
    pub media: Vec<Media>,
    /// Quoted messages by id. May be partially populated; see the equality
    /// rules in [`crate::entry`].
    pub associated: HashMap<MessageId, AssociatedMessage>,
}

impl Message {
    /// `stable_id` must be nonzero and fit the 40-bit base field; both are
    /// debug-asserted here and re-checked fallibly by
    /// [`crate::snapshot::Snapshot::new`].
    pub fn new(id: MessageId, stable_id: u64, timestamp: u64, sequence: u32) -> Self {
        debug_assert!(
            stable_id != 0 && stable_id <= STABLE_ID_BASE_MASK,
            "message stable id {stable_id:#x} outside the 40-bit base field"
        );
        Self {
            id,
            stable_id,
            stable_version: 0,
            timestamp,
            sequence,
            flags: MessageFlags::INCOMING,
            text: String::new(),
            media: Vec::new(),
            associated: HashMap::new(),
        }
    }

    pub fn index(&self) -> MessageIndex {
        MessageIndex {
            timestamp: self.timestamp,
            sequence: self.sequence,
            id: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_orders_by_timestamp_then_sequence_then_id() {
        let early = MessageIndex::new(100, 0, MessageId(9));
        let late = MessageIndex::new(200, 0, MessageId(1));
        assert!(early < late);

        let first = MessageIndex::new(100, 1, MessageId(9));
        let second = MessageIndex::new(100, 2, MessageId(1));
        assert!(first < second);

        let a = MessageIndex::new(100, 1, MessageId(1));
        let b = MessageIndex::new(100, 1, MessageId(2));
        assert!(a < b);
    }

    #[test]
    fn min_index_sorts_before_everything() {
        let index = MessageIndex::new(1, 0, MessageId(1));
        assert!(MessageIndex::MIN < index);
    }

    #[test]
    fn message_index_reflects_fields() {
        let mut message = Message::new(MessageId(7), 7, 1234, 3);
        message.flags = MessageFlags::INCOMING | MessageFlags::PINNED;
        assert_eq!(message.index(), MessageIndex::new(1234, 3, MessageId(7)));
    }
}
