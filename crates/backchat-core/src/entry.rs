//! Transcript rows: identity, ordering, and re-render equality.
//!
//! A [`HistoryEntry`] is one renderable row of the transcript. Entries are
//! short-lived values rebuilt for every snapshot; continuity across
//! snapshots is expressed entirely through [`HistoryEntry::stable_id`] plus
//! the selective `PartialEq` below, never through object identity.
//!
//! The identifier packs a per-row base id into the low
//! [`STABLE_ID_BASE_BITS`] bits and a small kind tag into the bits above,
//! so structurally different row kinds share one 64-bit identifier space
//! without colliding. Message and group base ids are drawn from disjoint
//! ranges upstream; [`crate::snapshot::Snapshot::new`] verifies the
//! consequences of that guarantee per snapshot.

use std::sync::Arc;

use backchat_list::DiffItem;
use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageIndex};
use crate::presentation::{PresentationData, StringsBundle, Theme};

/// Width of the base-id field of an entry identifier.
pub const STABLE_ID_BASE_BITS: u32 = 40;

/// Mask selecting the base-id field.
pub(crate) const STABLE_ID_BASE_MASK: u64 = (1 << STABLE_ID_BASE_BITS) - 1;

const TAG_MESSAGE_GENERIC: u64 = 2;
const TAG_MESSAGE_LARGE_EMOJI: u64 = 3;
const TAG_MESSAGE_ANIMATED_EMOJI: u64 = 4;
// Group ids never collide with message ids upstream, so groups can share
// the generic message tag.
const TAG_GROUP: u64 = 2;
const TAG_UNREAD_MARKER: u64 = 4;
const TAG_REPLY_COUNT_MARKER: u64 = 5;
const TAG_INFO_BANNER: u64 = 6;
const TAG_SEARCH_PLACEHOLDER: u64 = 7;

/// How a message's content was classified for rendering.
///
/// Part of the identifier: when the hint changes, the row gets a new
/// identity so the view remounts the specialized renderer instead of
/// attempting an in-place update across incompatible layouts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentTypeHint {
    #[default]
    Generic,
    LargeEmoji,
    AnimatedEmoji,
}

/// Admin rank shown next to the author name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRank {
    Owner,
    Admin,
    Custom(String),
}

/// Opaque handle for an in-flight media edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEditToken(pub u64);

/// Per-message display attributes. All fields participate in equality.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttributes {
    pub admin_rank: Option<AdminRank>,
    pub is_contact: bool,
    pub content_type_hint: ContentTypeHint,
    pub pending_media_edit: Option<MediaEditToken>,
    pub is_playing: bool,
}

/// Selection state of a message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    None,
    Selectable { selected: bool },
}

/// Identity of a message group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Drawn from a range disjoint from message stable ids upstream.
    pub stable_id: u64,
}

impl GroupInfo {
    pub fn new(stable_id: u64) -> Self {
        debug_assert!(
            stable_id != 0 && stable_id <= STABLE_ID_BASE_MASK,
            "group stable id {stable_id:#x} outside the 40-bit base field"
        );
        Self { stable_id }
    }
}

/// One message inside a group entry, in original arrival order.
#[derive(Debug, Clone)]
pub struct GroupMember {
    pub message: Message,
    pub is_read: bool,
    pub selection: Selection,
    pub attributes: EntryAttributes,
}

/// Placement of a message within its calendar month, carried for the month
/// separator overlay. Never part of equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLocation {
    pub index_in_month: u32,
}

/// One renderable row of the transcript.
#[derive(Debug, Clone)]
pub enum HistoryEntry {
    /// A single message.
    Message {
        message: Message,
        presentation: Arc<PresentationData>,
        is_read: bool,
        month_location: Option<MonthLocation>,
        selection: Selection,
        attributes: EntryAttributes,
    },
    /// An album or caption group rendered as one visual block. `members`
    /// is non-empty and immutable for the row's lifetime; membership
    /// changes produce a new row value.
    MessageGroup {
        group: GroupInfo,
        members: Vec<GroupMember>,
        presentation: Arc<PresentationData>,
    },
    /// Divider before the first unread message.
    UnreadMarker {
        index: MessageIndex,
        presentation: Arc<PresentationData>,
    },
    /// "N replies" banner.
    ReplyCountMarker {
        index: MessageIndex,
        is_comments: bool,
        count: u32,
        presentation: Arc<PresentationData>,
    },
    /// Static informational row, e.g. the empty-chat placeholder.
    InfoBanner {
        title: String,
        text: String,
        presentation: Arc<PresentationData>,
    },
    /// Fixed search-entry row.
    SearchPlaceholder {
        theme: Arc<Theme>,
        strings: Arc<StringsBundle>,
    },
}

impl HistoryEntry {
    /// 64-bit identifier, injective within a snapshot.
    pub fn stable_id(&self) -> u64 {
        match self {
            HistoryEntry::Message {
                message,
                attributes,
                ..
            } => {
                let tag = match attributes.content_type_hint {
                    ContentTypeHint::Generic => TAG_MESSAGE_GENERIC,
                    ContentTypeHint::LargeEmoji => TAG_MESSAGE_LARGE_EMOJI,
                    ContentTypeHint::AnimatedEmoji => TAG_MESSAGE_ANIMATED_EMOJI,
                };
                (message.stable_id & STABLE_ID_BASE_MASK) | (tag << STABLE_ID_BASE_BITS)
            }
            HistoryEntry::MessageGroup { group, .. } => {
                (group.stable_id & STABLE_ID_BASE_MASK) | (TAG_GROUP << STABLE_ID_BASE_BITS)
            }
            HistoryEntry::UnreadMarker { .. } => TAG_UNREAD_MARKER << STABLE_ID_BASE_BITS,
            HistoryEntry::ReplyCountMarker { .. } => {
                TAG_REPLY_COUNT_MARKER << STABLE_ID_BASE_BITS
            }
            HistoryEntry::InfoBanner { .. } => TAG_INFO_BANNER << STABLE_ID_BASE_BITS,
            HistoryEntry::SearchPlaceholder { .. } => {
                TAG_SEARCH_PLACEHOLDER << STABLE_ID_BASE_BITS
            }
        }
    }

    /// Chronological position. Groups sort by their most recent member;
    /// banners and the search placeholder sort before everything.
    pub fn index(&self) -> MessageIndex {
        match self {
            HistoryEntry::Message { message, .. } => message.index(),
            HistoryEntry::MessageGroup { members, .. } => members
                .last()
                .map_or(MessageIndex::MIN, |member| member.message.index()),
            HistoryEntry::UnreadMarker { index, .. }
            | HistoryEntry::ReplyCountMarker { index, .. } => *index,
            HistoryEntry::InfoBanner { .. } | HistoryEntry::SearchPlaceholder { .. } => {
                MessageIndex::MIN
            }
        }
    }

    /// Strict total order: chronological index first, identifier as the
    /// tie-break. The tie-break is by identifier magnitude, not semantic
    /// priority; same-index rows order arbitrarily but consistently.
    pub fn precedes(&self, other: &Self) -> bool {
        let lhs = self.index();
        let rhs = other.index();
        if lhs == rhs {
            self.stable_id() < other.stable_id()
        } else {
            lhs < rhs
        }
    }
}

/// Version-level comparison of message payloads, shared by the single
/// message and group member rules: stable version, the media list
/// element-wise, and the associated-message caches.
///
/// Only associated ids resolved on both sides are compared. A message
/// missing from one side's cache is not a mismatch, so eviction without a
/// version bump never triggers a re-render; the flip side is that quoted
/// content evicted from exactly one cache can render stale.
fn message_content_eq(lhs: &Message, rhs: &Message) -> bool {
    if lhs.stable_version != rhs.stable_version {
        return false;
    }
    if lhs.media != rhs.media {
        return false;
    }
    for (id, associated) in &lhs.associated {
        if let Some(other) = rhs.associated.get(id) {
            if other.stable_version != associated.stable_version {
                return false;
            }
        }
    }
    true
}

/// Re-render suppression: two entries are equal iff no visible property
/// differs. Presentation handles compare by identity, message bodies by
/// stable version, and cross-variant comparisons are always unequal.
impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                // Month location is an overlay input, not row content.
                HistoryEntry::Message {
                    message: lhs,
                    presentation: lhs_presentation,
                    is_read: lhs_read,
                    selection: lhs_selection,
                    attributes: lhs_attributes,
                    month_location: _,
                },
                HistoryEntry::Message {
                    message: rhs,
                    presentation: rhs_presentation,
                    is_read: rhs_read,
                    selection: rhs_selection,
                    attributes: rhs_attributes,
                    month_location: _,
                },
            ) => {
                lhs.index() == rhs.index()
                    && lhs.flags == rhs.flags
                    && lhs_read == rhs_read
                    && lhs_selection == rhs_selection
                    && Arc::ptr_eq(lhs_presentation, rhs_presentation)
                    && message_content_eq(lhs, rhs)
                    && lhs_attributes == rhs_attributes
            }
            (
                HistoryEntry::MessageGroup {
                    group: lhs_group,
                    members: lhs_members,
                    presentation: lhs_presentation,
                },
                HistoryEntry::MessageGroup {
                    group: rhs_group,
                    members: rhs_members,
                    presentation: rhs_presentation,
                },
            ) => {
                lhs_group == rhs_group
                    && Arc::ptr_eq(lhs_presentation, rhs_presentation)
                    && lhs_members.len() == rhs_members.len()
                    && lhs_members.iter().zip(rhs_members).all(|(lhs, rhs)| {
                        lhs.message.id == rhs.message.id
                            && lhs.message.timestamp == rhs.message.timestamp
                            && lhs.message.flags == rhs.message.flags
                            && lhs.is_read == rhs.is_read
                            && lhs.selection == rhs.selection
                            && lhs.attributes == rhs.attributes
                            && message_content_eq(&lhs.message, &rhs.message)
                    })
            }
            (
                HistoryEntry::UnreadMarker {
                    index: lhs_index,
                    presentation: lhs_presentation,
                },
                HistoryEntry::UnreadMarker {
                    index: rhs_index,
                    presentation: rhs_presentation,
                },
            ) => lhs_index == rhs_index && Arc::ptr_eq(lhs_presentation, rhs_presentation),
            (
                HistoryEntry::ReplyCountMarker {
                    index: lhs_index,
                    is_comments: lhs_comments,
                    count: lhs_count,
                    presentation: lhs_presentation,
                },
                HistoryEntry::ReplyCountMarker {
                    index: rhs_index,
                    is_comments: rhs_comments,
                    count: rhs_count,
                    presentation: rhs_presentation,
                },
            ) => {
                lhs_index == rhs_index
                    && lhs_comments == rhs_comments
                    && lhs_count == rhs_count
                    && Arc::ptr_eq(lhs_presentation, rhs_presentation)
            }
            (
                HistoryEntry::InfoBanner {
                    title: lhs_title,
                    text: lhs_text,
                    presentation: lhs_presentation,
                },
                HistoryEntry::InfoBanner {
                    title: rhs_title,
                    text: rhs_text,
                    presentation: rhs_presentation,
                },
            ) => {
                lhs_title == rhs_title
                    && lhs_text == rhs_text
                    && Arc::ptr_eq(lhs_presentation, rhs_presentation)
            }
            (
                HistoryEntry::SearchPlaceholder {
                    theme: lhs_theme,
                    strings: lhs_strings,
                },
                HistoryEntry::SearchPlaceholder {
                    theme: rhs_theme,
                    strings: rhs_strings,
                },
            ) => Arc::ptr_eq(lhs_theme, rhs_theme) && Arc::ptr_eq(lhs_strings, rhs_strings),
            _ => false,
        }
    }
}

impl DiffItem for HistoryEntry {
    type Id = u64;

    fn stable_id(&self) -> u64 {
        HistoryEntry::stable_id(self)
    }

    fn precedes(&self, other: &Self) -> bool {
        HistoryEntry::precedes(self, other)
    }

    fn content_eq(&self, other: &Self) -> bool {
        self == other
    }
}
