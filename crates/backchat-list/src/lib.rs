//! Keyed list reconciliation.
//!
//! Computes a minimal edit script between two snapshots of an ordered list
//! whose items carry stable identifiers. Consumers (the transcript view)
//! apply the script instead of re-rendering every row.
//!
//! Items supply three operations through [`DiffItem`]:
//!
//! - a stable id, unique within each snapshot, used to match rows across
//!   snapshots;
//! - a strict total order, consistent across both snapshots;
//! - a content-equality check deciding whether a matched row needs an
//!   in-place update. False negatives only cost an extra redraw; false
//!   positives leave stale content on screen and are bugs in the item type.

pub mod diff;

pub use diff::{ListEdit, apply, diff};

/// An item that can be reconciled across two list snapshots.
pub trait DiffItem: Clone {
    /// Stable identifier matching an item across snapshots.
    type Id: Copy + Eq + std::hash::Hash;

    /// Identifier for this item. Must be unique within a single snapshot.
    fn stable_id(&self) -> Self::Id;

    /// Strict total order over items. `a.precedes(b)` and `b.precedes(a)`
    /// are mutually exclusive; both are false only for the same identifier.
    fn precedes(&self, other: &Self) -> bool;

    /// Whether this item renders identically to `other`, so a matched row
    /// may skip its update. Not required to be full structural equality.
    fn content_eq(&self, other: &Self) -> bool;
}
