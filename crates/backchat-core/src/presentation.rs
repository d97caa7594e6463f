//! Shared styling bundles compared by identity.
//!
//! A [`PresentationData`] is rebuilt wholesale when the theme or locale
//! changes and is otherwise immutable. Rows hold `Arc` handles and compare
//! them with `Arc::ptr_eq`: identity is an exact proxy for "did the
//! styling change", and it avoids deep comparison of a large bundle on
//! every diff. Two bundles with identical field values but distinct
//! allocations deliberately compare unequal.
//!
//! Deliberately no `PartialEq` on these types: structural comparison of a
//! presentation bundle is never the right operation in this crate.

use std::sync::Arc;

/// Color palette and chrome for the transcript.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub accent_color: u32,
    pub dark: bool,
}

/// Localized UI strings.
#[derive(Debug, Clone)]
pub struct StringsBundle {
    pub locale: String,
}

/// Clock format for message timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    TwelveHour,
    TwentyFourHour,
}

/// The styling bundle handed to every row of a snapshot.
#[derive(Debug, Clone)]
pub struct PresentationData {
    pub theme: Arc<Theme>,
    pub strings: Arc<StringsBundle>,
    pub time_format: TimeFormat,
}

impl PresentationData {
    pub fn new(theme: Arc<Theme>, strings: Arc<StringsBundle>, time_format: TimeFormat) -> Self {
        Self {
            theme,
            strings,
            time_format,
        }
    }
}
