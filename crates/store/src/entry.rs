use std::fmt;

use bytes::Bytes;
use clipnest_base::EntryKind;
use time::{macros::format_description, OffsetDateTime, UtcOffset};

const PIN_INDICATOR: &str = "📌 ";
const OCR_LABEL_LENGTH: usize = 25;

/// Session-local identifier of an entry.
///
/// Identifiers are assigned when an entry enters the store and are not
/// persisted, the display index is the handle exposed to users.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id(u64);

impl Id {
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 { self.0 }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:016x}", self.0) }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Content {
    Text(String),

    /// PNG encoded image and the text recognized in it (may be empty).
    Image { data: Bytes, ocr_text: String },
}

impl Content {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        match self {
            Self::Text(_) => EntryKind::Text,
            Self::Image { .. } => EntryKind::Image,
        }
    }
}

/// An entry as it is persisted, without its session identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub content: Content,
    pub timestamp: OffsetDateTime,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    id: Id,

    content: Content,

    timestamp: OffsetDateTime,

    pinned: bool,
}

impl Entry {
    #[inline]
    pub(crate) const fn new(id: Id, content: Content, timestamp: OffsetDateTime, pinned: bool) -> Self {
        Self { id, content, timestamp, pinned }
    }

    #[inline]
    pub(crate) fn from_snapshot(id: Id, Snapshot { content, timestamp, pinned }: Snapshot) -> Self {
        Self { id, content, timestamp, pinned }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> Id { self.id }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntryKind { self.content.kind() }

    #[inline]
    #[must_use]
    pub const fn content(&self) -> &Content { &self.content }

    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> OffsetDateTime { self.timestamp }

    #[inline]
    #[must_use]
    pub const fn is_pinned(&self) -> bool { self.pinned }

    #[inline]
    pub(crate) fn set_pinned(&mut self, pinned: bool) { self.pinned = pinned; }

    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Image { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn image_data(&self) -> Option<&Bytes> {
        match &self.content {
            Content::Image { data, .. } => Some(data),
            Content::Text(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn ocr_text(&self) -> Option<&str> {
        match &self.content {
            Content::Image { ocr_text, .. } if !ocr_text.is_empty() => Some(ocr_text),
            _ => None,
        }
    }

    /// Returns `true` if the entry survives a search for `needle`.
    ///
    /// `needle` must already be lowercase. Images are never filtered out.
    #[inline]
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        match &self.content {
            Content::Text(text) => needle.is_empty() || text.to_lowercase().contains(needle),
            Content::Image { .. } => true,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot { content: self.content.clone(), timestamp: self.timestamp, pinned: self.pinned }
    }

    #[must_use]
    pub fn basic_information(&self) -> String {
        match &self.content {
            Content::Text(text) => {
                format!("text, {} characters", text.chars().count())
            }
            Content::Image { data, .. } => {
                format!("image/png, {}", humansize::format_size(data.len(), humansize::BINARY))
            }
        }
    }

    /// Single line shown in a history listing, e.g. `📌 [12:01:02] some text`.
    #[must_use]
    pub fn display_line(&self, max_chars: Option<usize>) -> String {
        let label = match &self.content {
            Content::Text(text) => text.replace('\n', " ").replace('\r', ""),
            Content::Image { ocr_text, .. } if ocr_text.is_empty() => "[IMAGE]".to_string(),
            Content::Image { ocr_text, .. } => {
                format!("[IMAGE: {}...]", truncate(ocr_text, OCR_LABEL_LENGTH))
            }
        };

        let pin = if self.pinned { PIN_INDICATOR } else { "" };
        let line = format!("{pin}[{time}] {label}", time = self.local_time());

        match max_chars {
            Some(limit) if limit > 0 && line.chars().count() > limit => {
                format!("{}...", truncate(&line, limit))
            }
            _ => line,
        }
    }

    fn local_time(&self) -> String {
        self.timestamp
            .to_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default()
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((idx, _)) => &s[..idx],
    }
}
