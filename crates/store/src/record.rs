use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use clipnest_base::EntryKind;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};
use time::OffsetDateTime;

use crate::entry::{Content, Snapshot};

/// One persisted history entry.
///
/// Fields that are missing in older files fall back to defaults: `type` is
/// `text`, `pinned` is `false`, `ocr_text` is empty and `timestamp` is the
/// epoch.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "type", default)]
    pub kind: EntryKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,

    #[serde(default = "Record::default_timestamp", with = "clipnest_base::serde::epoch_seconds")]
    pub timestamp: OffsetDateTime,

    #[serde(default)]
    pub pinned: bool,
}

impl Record {
    #[inline]
    #[must_use]
    pub const fn default_timestamp() -> OffsetDateTime { OffsetDateTime::UNIX_EPOCH }
}

impl From<&Snapshot> for Record {
    fn from(Snapshot { content, timestamp, pinned }: &Snapshot) -> Self {
        match content {
            Content::Text(text) => Self {
                kind: EntryKind::Text,
                text: Some(text.clone()),
                image_data: None,
                ocr_text: None,
                timestamp: *timestamp,
                pinned: *pinned,
            },
            Content::Image { data, ocr_text } => Self {
                kind: EntryKind::Image,
                text: None,
                image_data: Some(BASE64.encode(data)),
                ocr_text: Some(ocr_text.clone()),
                timestamp: *timestamp,
                pinned: *pinned,
            },
        }
    }
}

impl TryFrom<Record> for Snapshot {
    type Error = Error;

    fn try_from(Record { kind, text, image_data, ocr_text, timestamp, pinned }: Record) -> Result<Self, Error> {
        let content = match kind {
            EntryKind::Text => Content::Text(text.context(MissingFieldSnafu { field: "text" })?),
            EntryKind::Image => {
                let encoded = image_data.context(MissingFieldSnafu { field: "image_data" })?;
                let data = BASE64.decode(encoded.as_bytes()).context(DecodeImageDataSnafu)?;
                Content::Image { data: Bytes::from(data), ocr_text: ocr_text.unwrap_or_default() }
            }
        };
        Ok(Self { content, timestamp, pinned })
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Record has no `{field}` field"))]
    MissingField { field: &'static str },

    #[snafu(display("Could not decode `image_data`, error: {source}"))]
    DecodeImageData { source: base64::DecodeError },
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use super::Record;
    use crate::entry::{Content, Snapshot};

    #[test]
    fn test_text_record_layout() {
        let snapshot = Snapshot {
            content: Content::Text("hello".to_string()),
            timestamp: OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(1_500),
            pinned: true,
        };
        let value = serde_json::to_value(Record::from(&snapshot)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "type": "text", "text": "hello", "timestamp": 1.5, "pinned": true })
        );
    }

    #[test]
    fn test_image_record_layout() {
        let snapshot = Snapshot {
            content: Content::Image { data: vec![1, 2, 3].into(), ocr_text: "abc".to_string() },
            timestamp: OffsetDateTime::UNIX_EPOCH + Duration::seconds(2),
            pinned: false,
        };
        let value = serde_json::to_value(Record::from(&snapshot)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "image",
                "image_data": "AQID",
                "ocr_text": "abc",
                "timestamp": 2.0,
                "pinned": false
            })
        );

        let record: Record = serde_json::from_value(value).unwrap();
        assert_eq!(Snapshot::try_from(record).unwrap(), snapshot);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: Record = serde_json::from_str(r#"{ "text": "legacy" }"#).unwrap();
        let snapshot = Snapshot::try_from(record).unwrap();
        assert_eq!(snapshot.content, Content::Text("legacy".to_string()));
        assert!(!snapshot.pinned);
        assert_eq!(snapshot.timestamp, OffsetDateTime::UNIX_EPOCH);

        let record: Record =
            serde_json::from_str(r#"{ "type": "image", "image_data": "AQID", "timestamp": 3 }"#)
                .unwrap();
        let snapshot = Snapshot::try_from(record).unwrap();
        assert_eq!(
            snapshot.content,
            Content::Image { data: vec![1, 2, 3].into(), ocr_text: String::new() }
        );
    }

    #[test]
    fn test_invalid_records() {
        let record: Record = serde_json::from_str(r#"{ "type": "text" }"#).unwrap();
        assert!(Snapshot::try_from(record).is_err());

        let record: Record =
            serde_json::from_str(r#"{ "type": "image", "image_data": "%%%" }"#).unwrap();
        assert!(Snapshot::try_from(record).is_err());

        assert!(serde_json::from_str::<Record>(r#"{ "type": "video" }"#).is_err());
    }
}
