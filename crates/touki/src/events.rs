//! NDJSON events reported while a batch runs.
//!
//! Each event serializes to one JSON object with a `type` tag, written one
//! per line:
//!
//! ```text
//! {"type":"progress","current":1,"total":2,"file":"a.pdf"}
//! {"type":"result","file":"a.pdf","size":1024,"records":[...]}
//! {"type":"error","file":"b.pdf","size":9,"message":"parse error: ..."}
//! ```

use serde::{Deserialize, Serialize};
use touki_core::OwnershipRecord;

use crate::batch::{BatchProgress, FileOutcome};

/// One line of the batch event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchEvent {
    /// A file finished; `current` of `total` are done.
    Progress {
        current: usize,
        total: usize,
        file: String,
    },
    /// Records of a file that was processed.
    Result {
        file: String,
        size: usize,
        records: Vec<OwnershipRecord>,
    },
    /// A file that could not be processed.
    Error {
        file: String,
        size: usize,
        message: String,
    },
}

impl BatchEvent {
    /// The progress event for a completion notice.
    pub fn progress(progress: &BatchProgress<'_>) -> Self {
        BatchEvent::Progress {
            current: progress.current,
            total: progress.total,
            file: progress.outcome.name.clone(),
        }
    }

    /// The result or error event for an outcome.
    pub fn from_outcome(outcome: &FileOutcome) -> Self {
        match &outcome.result {
            Ok(records) => BatchEvent::Result {
                file: outcome.name.clone(),
                size: outcome.size,
                records: records.clone(),
            },
            Err(e) => BatchEvent::Error {
                file: outcome.name.clone(),
                size: outcome.size,
                message: e.to_string(),
            },
        }
    }

    /// Serialize as a single line of JSON (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touki_core::PdfError;

    fn record() -> OwnershipRecord {
        OwnershipRecord {
            record_date: "2025-06-12T17:45:00".to_string(),
            property_address: "東京都墨田区八広４丁目".to_string(),
            owner_name: "田中太郎".to_string(),
            owner_address: "東京都墨田区八広４丁目１２－３".to_string(),
        }
    }

    #[test]
    fn result_event_shape() {
        let outcome = FileOutcome {
            name: "a.pdf".to_string(),
            size: 1024,
            result: Ok(vec![record()]),
        };
        let line = BatchEvent::from_outcome(&outcome).to_json_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "result");
        assert_eq!(value["file"], "a.pdf");
        assert_eq!(value["size"], 1024);
        assert_eq!(value["records"][0]["ownerName"], "田中太郎");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn error_event_carries_message() {
        let outcome = FileOutcome {
            name: "b.pdf".to_string(),
            size: 9,
            result: Err(PdfError::ParseError("invalid file header".to_string())),
        };
        let line = BatchEvent::from_outcome(&outcome).to_json_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "parse error: invalid file header");
    }

    #[test]
    fn progress_event_shape() {
        let outcome = FileOutcome {
            name: "c.pdf".to_string(),
            size: 1,
            result: Ok(Vec::new()),
        };
        let event = BatchEvent::progress(&BatchProgress {
            current: 1,
            total: 3,
            outcome: &outcome,
        });
        assert_eq!(
            event.to_json_line().unwrap(),
            r#"{"type":"progress","current":1,"total":3,"file":"c.pdf"}"#
        );
    }

    #[test]
    fn events_deserialize_back() {
        let line = r#"{"type":"error","file":"x.pdf","size":3,"message":"m"}"#;
        let event: BatchEvent = serde_json::from_str(line).unwrap();
        assert_eq!(
            event,
            BatchEvent::Error {
                file: "x.pdf".to_string(),
                size: 3,
                message: "m".to_string(),
            }
        );
    }
}
