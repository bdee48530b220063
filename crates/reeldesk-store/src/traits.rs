//! Record-store traits the core programs against.
//!
//! Persistence is a replaceable collaborator: any backend with upsert,
//! range, and ordered-limit query support can implement these. The
//! in-memory implementation in [`crate::memory`] is the reference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use reeldesk_models::{
    ApprovalLevel, CandidateId, ContentCandidate, ContentStatus, DirectionRecord, Platform,
    ProducedVideo, QueueEntry, QueueEntryId, ReviewTask, ReviewTaskId, VideoAssetId,
};

use crate::error::StoreResult;

/// Content candidates and their produced video assets.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn get_candidate(&self, id: &CandidateId) -> StoreResult<Option<ContentCandidate>>;

    /// Insert or replace a candidate, keyed on its id.
    async fn upsert_candidate(&self, candidate: ContentCandidate) -> StoreResult<()>;

    /// Stamp the decision engine's disposition onto an existing candidate.
    async fn set_disposition(
        &self,
        id: &CandidateId,
        status: ContentStatus,
        approval: ApprovalLevel,
        quality_score: f64,
    ) -> StoreResult<()>;

    /// Candidates in a given status, oldest first, up to `limit`.
    async fn list_by_status(
        &self,
        status: ContentStatus,
        limit: usize,
    ) -> StoreResult<Vec<ContentCandidate>>;

    async fn insert_produced_video(&self, video: ProducedVideo) -> StoreResult<()>;

    async fn get_produced_video(&self, id: &VideoAssetId) -> StoreResult<Option<ProducedVideo>>;

    /// Latest produced asset for a candidate, if any.
    async fn produced_video_for(
        &self,
        candidate_id: &CandidateId,
    ) -> StoreResult<Option<ProducedVideo>>;
}

/// Editorial review tasks.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_task(&self, task: ReviewTask) -> StoreResult<()>;

    async fn get_task(&self, id: &ReviewTaskId) -> StoreResult<Option<ReviewTask>>;

    /// Replace an existing task. `NotFound` if the id is unknown.
    async fn update_task(&self, task: ReviewTask) -> StoreResult<()>;

    /// Open tasks (pending + in_review) ordered by priority descending,
    /// then creation time ascending, up to `limit`.
    async fn list_open_tasks(&self, limit: usize) -> StoreResult<Vec<ReviewTask>>;

    async fn list_all_tasks(&self) -> StoreResult<Vec<ReviewTask>>;
}

/// The posting queue.
///
/// Implementations must serialize mutation per platform: two concurrent
/// allocations reading the same last-scheduled time would produce
/// colliding slots.
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn insert_entry(&self, entry: QueueEntry) -> StoreResult<()>;

    async fn get_entry(&self, id: &QueueEntryId) -> StoreResult<Option<QueueEntry>>;

    /// Replace an existing entry. `NotFound` if the id is unknown.
    async fn update_entry(&self, entry: QueueEntry) -> StoreResult<()>;

    /// Look up by the (candidate, platform) natural key.
    async fn find_by_key(
        &self,
        candidate_id: &CandidateId,
        platform: Platform,
    ) -> StoreResult<Option<QueueEntry>>;

    /// Most recent `scheduled_for` across all entries for a platform.
    async fn last_scheduled(&self, platform: Platform) -> StoreResult<Option<DateTime<Utc>>>;

    /// Pending entries due at `now`, ascending by scheduled time.
    async fn due_entries(
        &self,
        now: DateTime<Utc>,
        platform: Option<Platform>,
    ) -> StoreResult<Vec<QueueEntry>>;

    /// All pending entries for a platform, ascending by scheduled time.
    async fn pending_entries(&self, platform: Platform) -> StoreResult<Vec<QueueEntry>>;

    /// Failed entries, up to `limit`.
    async fn failed_entries(&self, limit: usize) -> StoreResult<Vec<QueueEntry>>;

    /// Hard-delete an entry (explicit cancellation only). Returns whether
    /// an entry was removed.
    async fn delete_entry(&self, id: &QueueEntryId) -> StoreResult<bool>;
}

/// Audit log of approval decisions, one record per candidate.
#[async_trait]
pub trait DirectionStore: Send + Sync {
    /// Upsert keyed on candidate id: re-evaluation overwrites.
    async fn upsert_direction(&self, record: DirectionRecord) -> StoreResult<()>;

    async fn get_direction(&self, id: &CandidateId) -> StoreResult<Option<DirectionRecord>>;

    async fn list_directions(&self) -> StoreResult<Vec<DirectionRecord>>;
}
