//! Posting-queue entries.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{CandidateId, Platform, QueueEntryId, VideoAssetId};

/// Queue entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Waiting for its scheduled slot
    #[default]
    Pending,
    /// Dispatch in progress
    Posting,
    /// Successfully published
    Posted,
    /// Publish attempt failed (retryable)
    Failed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Posting => "posting",
            QueueStatus::Posted => "posted",
            QueueStatus::Failed => "failed",
        }
    }
}

/// One scheduled (candidate, platform) posting.
///
/// Natural key: (candidate_id, platform). Queueing the same pair twice is
/// a no-op that returns the existing entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub candidate_id: CandidateId,
    /// The rendered asset this entry will publish
    pub video_id: VideoAssetId,
    pub platform: Platform,
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    pub status: QueueStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Create a pending entry at the given slot.
    pub fn new(
        candidate_id: CandidateId,
        video_id: VideoAssetId,
        platform: Platform,
        scheduled_for: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QueueEntryId::new(),
            candidate_id,
            video_id,
            platform,
            scheduled_for,
            status: QueueStatus::Pending,
            error_message: None,
            posted_at: None,
            created_at: Utc::now(),
        }
    }

    /// The idempotency key queueing dedupes on.
    pub fn natural_key(&self) -> (CandidateId, Platform) {
        (self.candidate_id.clone(), self.platform)
    }

    /// Mark dispatch as started.
    pub fn start_posting(mut self) -> Self {
        self.status = QueueStatus::Posting;
        self
    }

    /// Mark as successfully published.
    pub fn mark_posted(mut self) -> Self {
        self.status = QueueStatus::Posted;
        self.posted_at = Some(Utc::now());
        self.error_message = None;
        self
    }

    /// Mark the publish attempt as failed.
    pub fn mark_failed(mut self, error: impl Into<String>) -> Self {
        self.status = QueueStatus::Failed;
        self.error_message = Some(error.into());
        self
    }

    /// Reset a failed entry for another attempt.
    pub fn reset_for_retry(mut self) -> Self {
        self.status = QueueStatus::Pending;
        self.error_message = None;
        self
    }

    /// Whether this entry is due at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == QueueStatus::Pending && self.scheduled_for <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry() -> QueueEntry {
        QueueEntry::new(
            CandidateId::new(),
            VideoAssetId::new(),
            Platform::Instagram,
            Utc::now(),
        )
    }

    #[test]
    fn new_entries_are_pending() {
        let e = entry();
        assert_eq!(e.status, QueueStatus::Pending);
        assert!(e.posted_at.is_none());
    }

    #[test]
    fn mark_posted_stamps_time_and_clears_error() {
        let e = entry().mark_failed("transient").reset_for_retry().mark_posted();
        assert_eq!(e.status, QueueStatus::Posted);
        assert!(e.posted_at.is_some());
        assert!(e.error_message.is_none());
    }

    #[test]
    fn due_respects_status_and_schedule() {
        let now = Utc::now();
        let mut e = entry();
        e.scheduled_for = now - Duration::minutes(5);
        assert!(e.is_due(now));
        e.scheduled_for = now + Duration::minutes(5);
        assert!(!e.is_due(now));
        let posted = entry().mark_posted();
        assert!(!posted.is_due(now + Duration::hours(1)));
    }
}
