//! Audit records for sync runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One document in the `sync_runs` collection, appended after each sync
/// attempt, successful or aborted. Recording is best-effort and never
/// fails the sync itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRunRecord {
    pub run_id: Uuid,
    pub trigger_source: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub completed_at: DateTime<Utc>,
    pub total: i64,
    pub success: i64,
    pub failed: i64,
    /// Set when the run aborted before the upsert loop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_record_encodes_counts_and_timestamps() {
        let record = SyncRunRecord {
            run_id: Uuid::new_v4(),
            trigger_source: "http".to_string(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            total: 3,
            success: 2,
            failed: 1,
            error: None,
        };
        let doc = bson::to_document(&record).expect("encode");
        assert_eq!(doc.get_i64("total").expect("total"), 3);
        assert_eq!(doc.get_i64("success").expect("success"), 2);
        assert_eq!(doc.get_i64("failed").expect("failed"), 1);
        assert!(doc.get_datetime("startedAt").is_ok());
        assert!(!doc.contains_key("error"));
    }

    #[test]
    fn aborted_run_record_carries_the_error() {
        let record = SyncRunRecord {
            run_id: Uuid::new_v4(),
            trigger_source: "http".to_string(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            total: 0,
            success: 0,
            failed: 0,
            error: Some("qikink authentication failed".to_string()),
        };
        let doc = bson::to_document(&record).expect("encode");
        assert_eq!(
            doc.get_str("error").expect("error"),
            "qikink authentication failed"
        );
    }
}
