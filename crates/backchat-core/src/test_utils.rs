//! Shared fixtures for model tests.

use std::sync::Arc;

use crate::entry::{EntryAttributes, GroupMember, HistoryEntry, Selection};
use crate::message::{Message, MessageId};
use crate::presentation::{PresentationData, StringsBundle, Theme, TimeFormat};

pub fn theme(name: &str) -> Arc<Theme> {
    Arc::new(Theme {
        name: name.to_string(),
        accent_color: 0x007a_ff,
        dark: false,
    })
}

pub fn strings(locale: &str) -> Arc<StringsBundle> {
    Arc::new(StringsBundle {
        locale: locale.to_string(),
    })
}

pub fn presentation() -> Arc<PresentationData> {
    Arc::new(PresentationData::new(
        theme("day"),
        strings("en"),
        TimeFormat::TwentyFourHour,
    ))
}

/// Message with `stable_id` doubling as the message id, at `timestamp`.
pub fn message(stable_id: u64, timestamp: u64) -> Message {
    Message::new(MessageId(stable_id), stable_id, timestamp, 0)
}

pub fn message_entry(message: Message, presentation: &Arc<PresentationData>) -> HistoryEntry {
    HistoryEntry::Message {
        message,
        presentation: Arc::clone(presentation),
        is_read: true,
        month_location: None,
        selection: Selection::None,
        attributes: EntryAttributes::default(),
    }
}

pub fn group_member(message: Message) -> GroupMember {
    GroupMember {
        message,
        is_read: true,
        selection: Selection::None,
        attributes: EntryAttributes::default(),
    }
}
