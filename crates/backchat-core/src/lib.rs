//! Transcript row model: identity, ordering, and re-render equality for
//! the rows of a scrolling message transcript.
//!
//! An upstream layer assembles a [`Snapshot`] of [`HistoryEntry`] values
//! for each state of the transcript; `backchat-list` reconciles two
//! snapshots into an edit script; a view layer applies it. This crate owns
//! the part that makes that pipeline correct: collision-free identifiers
//! across heterogeneous row kinds, a strict total order, and equality that
//! is strict enough to catch every visible change but loose enough to skip
//! re-renders on irrelevant churn.

pub mod entry;
pub mod error;
pub mod message;
pub mod presentation;
pub mod snapshot;

#[cfg(test)]
mod test_utils;

pub use entry::{
    AdminRank, ContentTypeHint, EntryAttributes, GroupInfo, GroupMember, HistoryEntry,
    MediaEditToken, MonthLocation, STABLE_ID_BASE_BITS, Selection,
};
pub use error::{Result, TranscriptError};
pub use message::{AssociatedMessage, Media, Message, MessageFlags, MessageId, MessageIndex};
pub use presentation::{PresentationData, StringsBundle, Theme, TimeFormat};
pub use snapshot::Snapshot;
