use bytes::Bytes;
use time::OffsetDateTime;

/// Messages handled by the control loop, the only owner of the history.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    TextCaptured { text: String, captured_at: OffsetDateTime },

    /// A PNG image seen on the clipboard, after text recognition.
    ImageCaptured { png: Bytes, ocr_text: String, captured_at: OffsetDateTime },

    /// The history file was changed on disk.
    HistoryFileChanged,
}

/// Image waiting for text recognition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CapturedImage {
    pub png: Bytes,

    pub captured_at: OffsetDateTime,
}
