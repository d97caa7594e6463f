//! Error types for the backchat-core crate

use thiserror::Error;

/// Result type alias for transcript model operations
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Invariant violations detected while assembling a snapshot.
///
/// These come from upstream id-space misuse, not from user action: a
/// snapshot that trips one of these would make the diff engine conflate
/// unrelated rows, so assembly fails instead of passing it along.
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Two distinct rows encoded the same 64-bit identifier.
    #[error("duplicate stable id {id:#x} in snapshot")]
    DuplicateStableId { id: u64 },

    /// A message or group stable id is zero or overflows the 40-bit base
    /// field, where it would corrupt the kind tag.
    #[error("stable id {id:#x} is zero or exceeds the 40-bit base field")]
    StableIdOutOfRange { id: u64 },

    /// A message group entry with no members has no defined position.
    #[error("message group {group_id} has no members")]
    EmptyGroup { group_id: u64 },
}
