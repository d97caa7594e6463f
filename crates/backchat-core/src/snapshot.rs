//! Snapshot assembly and precondition checks.
//!
//! The diff contract requires identifier injectivity within a snapshot and
//! a consistent order across the two snapshots being compared. Upstream
//! guarantees the id-space half of that (disjoint message and group id
//! ranges, base ids inside 40 bits); [`Snapshot::new`] is where those
//! guarantees stop being assumed and start being checked.

use std::cmp::Ordering;
use std::collections::HashSet;

use backchat_list::ListEdit;

use crate::entry::{HistoryEntry, STABLE_ID_BASE_MASK};
use crate::error::{Result, TranscriptError};

/// An ordered, validated sequence of transcript rows at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: Vec<HistoryEntry>,
}

impl Snapshot {
    /// Sorts `entries` by [`HistoryEntry::precedes`] and validates the
    /// diff preconditions: base ids nonzero and inside the 40-bit field,
    /// groups non-empty, identifiers collision-free.
    pub fn new(mut entries: Vec<HistoryEntry>) -> Result<Self> {
        entries.sort_by(|a, b| {
            if a.precedes(b) {
                Ordering::Less
            } else if b.precedes(a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if let HistoryEntry::MessageGroup { group, members, .. } = entry {
                if members.is_empty() {
                    tracing::error!(group_id = group.stable_id, "message group has no members");
                    return Err(TranscriptError::EmptyGroup {
                        group_id: group.stable_id,
                    });
                }
            }

            let base = match entry {
                HistoryEntry::Message { message, .. } => Some(message.stable_id),
                HistoryEntry::MessageGroup { group, .. } => Some(group.stable_id),
                _ => None,
            };
            if let Some(base) = base {
                if base == 0 || base > STABLE_ID_BASE_MASK {
                    tracing::error!(base_id = base, "stable id outside the 40-bit base field");
                    return Err(TranscriptError::StableIdOutOfRange { id: base });
                }
            }

            let id = entry.stable_id();
            if !seen.insert(id) {
                tracing::error!(stable_id = id, "duplicate stable id in snapshot");
                return Err(TranscriptError::DuplicateStableId { id });
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Edit script transforming this snapshot into `newer`.
    pub fn diff(&self, newer: &Snapshot) -> Vec<ListEdit<HistoryEntry>> {
        backchat_list::diff(&self.entries, &newer.entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entry::{GroupInfo, HistoryEntry};
    use crate::message::{MessageId, MessageIndex};
    use crate::test_utils;

    #[test]
    fn entries_are_sorted_on_construction() {
        let presentation = test_utils::presentation();
        let late = test_utils::message_entry(test_utils::message(2, 200), &presentation);
        let early = test_utils::message_entry(test_utils::message(1, 100), &presentation);
        let banner = HistoryEntry::InfoBanner {
            title: "No messages".into(),
            text: "Say hello".into(),
            presentation,
        };

        let snapshot = Snapshot::new(vec![late, early, banner]).unwrap();
        let ids: Vec<u64> = snapshot
            .entries()
            .iter()
            .map(HistoryEntry::stable_id)
            .collect();
        assert_eq!(ids, vec![6 << 40, 1 | (2 << 40), 2 | (2 << 40)]);
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let presentation = test_utils::presentation();
        let first = test_utils::message_entry(test_utils::message(1, 100), &presentation);
        let second = test_utils::message_entry(test_utils::message(1, 200), &presentation);

        let err = Snapshot::new(vec![first, second]).unwrap_err();
        assert!(matches!(
            err,
            TranscriptError::DuplicateStableId { id } if id == 1 | (2 << 40)
        ));
    }

    #[test]
    fn group_colliding_with_message_is_rejected() {
        // Upstream guarantees disjoint id spaces; a violation must fail
        // loudly rather than letting the diff engine conflate the rows.
        let presentation = test_utils::presentation();
        let message = test_utils::message_entry(test_utils::message(5, 100), &presentation);
        let group = HistoryEntry::MessageGroup {
            group: GroupInfo::new(5),
            members: vec![test_utils::group_member(test_utils::message(6, 200))],
            presentation,
        };

        assert!(matches!(
            Snapshot::new(vec![message, group]),
            Err(TranscriptError::DuplicateStableId { .. })
        ));
    }

    #[test]
    fn zero_base_id_is_rejected() {
        let presentation = test_utils::presentation();
        let mut message = test_utils::message(1, 100);
        message.stable_id = 0;
        let entry = test_utils::message_entry(message, &presentation);

        assert!(matches!(
            Snapshot::new(vec![entry]),
            Err(TranscriptError::StableIdOutOfRange { id: 0 })
        ));
    }

    #[test]
    fn oversized_base_id_is_rejected() {
        let presentation = test_utils::presentation();
        let mut message = test_utils::message(1, 100);
        message.stable_id = 1 << 40;
        let entry = test_utils::message_entry(message, &presentation);

        assert!(matches!(
            Snapshot::new(vec![entry]),
            Err(TranscriptError::StableIdOutOfRange { .. })
        ));
    }

    #[test]
    fn empty_group_is_rejected() {
        let presentation = test_utils::presentation();
        let group = HistoryEntry::MessageGroup {
            group: GroupInfo::new(9),
            members: Vec::new(),
            presentation,
        };

        assert!(matches!(
            Snapshot::new(vec![group]),
            Err(TranscriptError::EmptyGroup { group_id: 9 })
        ));
    }

    #[test]
    fn edited_message_yields_a_single_update() {
        // The marker is untouched; only the edited message re-renders.
        let presentation = test_utils::presentation();
        let marker = HistoryEntry::UnreadMarker {
            index: MessageIndex::new(500, 0, MessageId(5)),
            presentation: Arc::clone(&presentation),
        };

        let message = test_utils::message(1, 100);
        let mut edited = message.clone();
        edited.stable_version = 2;
        edited.text = "edited".into();

        let old = Snapshot::new(vec![
            test_utils::message_entry(message, &presentation),
            marker.clone(),
        ])
        .unwrap();
        let new = Snapshot::new(vec![
            test_utils::message_entry(edited.clone(), &presentation),
            marker,
        ])
        .unwrap();

        let edits = old.diff(&new);
        assert_eq!(edits.len(), 1);
        assert!(matches!(
            &edits[0],
            ListEdit::Update { index: 0, item: HistoryEntry::Message { message, .. } }
                if message.stable_version == 2
        ));
    }

    #[test]
    fn theme_swap_updates_every_row() {
        let old_presentation = test_utils::presentation();
        let new_presentation = test_utils::presentation();

        let old = Snapshot::new(vec![
            test_utils::message_entry(test_utils::message(1, 100), &old_presentation),
            test_utils::message_entry(test_utils::message(2, 200), &old_presentation),
        ])
        .unwrap();
        let new = Snapshot::new(vec![
            test_utils::message_entry(test_utils::message(1, 100), &new_presentation),
            test_utils::message_entry(test_utils::message(2, 200), &new_presentation),
        ])
        .unwrap();

        let edits = old.diff(&new);
        assert_eq!(edits.len(), 2);
        assert!(
            edits
                .iter()
                .all(|edit| matches!(edit, ListEdit::Update { .. }))
        );
    }
}
