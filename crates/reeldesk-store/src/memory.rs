//! Process-local in-memory store.
//!
//! Reference implementation of the store traits, also used by tests. A
//! single `RwLock` over all tables makes queue mutation single-writer,
//! which is what the scheduling invariants require.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::sync::RwLock;
use tracing::{debug, info};

use reeldesk_models::{
    ApprovalLevel, CandidateId, ContentCandidate, ContentStatus, DirectionRecord, Platform,
    ProducedVideo, QueueEntry, QueueEntryId, QueueStatus, ReviewTask, ReviewTaskId, VideoAssetId,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{CandidateStore, DirectionStore, QueueStore, ReviewStore};

#[derive(Default)]
struct Tables {
    candidates: HashMap<CandidateId, ContentCandidate>,
    videos: HashMap<VideoAssetId, ProducedVideo>,
    tasks: HashMap<ReviewTaskId, ReviewTask>,
    queue: HashMap<QueueEntryId, QueueEntry>,
    directions: HashMap<CandidateId, DirectionRecord>,
}

/// In-memory record store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn get_candidate(&self, id: &CandidateId) -> StoreResult<Option<ContentCandidate>> {
        let tables = self.tables.read().await;
        Ok(tables.candidates.get(id).cloned())
    }

    async fn upsert_candidate(&self, candidate: ContentCandidate) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        debug!(candidate_id = %candidate.id, "Upserting candidate");
        tables.candidates.insert(candidate.id.clone(), candidate);
        Ok(())
    }

    async fn set_disposition(
        &self,
        id: &CandidateId,
        status: ContentStatus,
        approval: ApprovalLevel,
        quality_score: f64,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let candidate = tables
            .candidates
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(format!("Candidate {} not found", id)))?;
        candidate.status = status;
        candidate.approval = Some(approval);
        candidate.quality_score = Some(quality_score);
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: ContentStatus,
        limit: usize,
    ) -> StoreResult<Vec<ContentCandidate>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<ContentCandidate> = tables
            .candidates
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect();
        matches.sort_by_key(|c| c.created_at);
        matches.truncate(limit);
        Ok(matches)
    }

    async fn insert_produced_video(&self, video: ProducedVideo) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        info!(video_id = %video.id, candidate_id = %video.candidate_id, "Recorded produced video");
        tables.videos.insert(video.id.clone(), video);
        Ok(())
    }

    async fn get_produced_video(&self, id: &VideoAssetId) -> StoreResult<Option<ProducedVideo>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.get(id).cloned())
    }

    async fn produced_video_for(
        &self,
        candidate_id: &CandidateId,
    ) -> StoreResult<Option<ProducedVideo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .values()
            .filter(|v| &v.candidate_id == candidate_id)
            .max_by_key(|v| v.produced_at)
            .cloned())
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_task(&self, task: ReviewTask) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.tasks.contains_key(&task.id) {
            return Err(StoreError::already_exists(format!("Task {}", task.id)));
        }
        info!(task_id = %task.id, candidate_id = %task.candidate_id, "Created review task");
        tables.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn get_task(&self, id: &ReviewTaskId) -> StoreResult<Option<ReviewTask>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(id).cloned())
    }

    async fn update_task(&self, task: ReviewTask) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&task.id) {
            return Err(StoreError::not_found(format!("Task {} not found", task.id)));
        }
        tables.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    async fn list_open_tasks(&self, limit: usize) -> StoreResult<Vec<ReviewTask>> {
        let tables = self.tables.read().await;
        let mut open: Vec<ReviewTask> = tables
            .tasks
            .values()
            .filter(|t| !t.stage.is_terminal())
            .cloned()
            .collect();
        // Priority descending, then oldest first within equal priority.
        open.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.created_at.cmp(&b.created_at))
        });
        open.truncate(limit);
        Ok(open)
    }

    async fn list_all_tasks(&self) -> StoreResult<Vec<ReviewTask>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.values().cloned().collect())
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn insert_entry(&self, entry: QueueEntry) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.queue.contains_key(&entry.id) {
            return Err(StoreError::already_exists(format!("Queue entry {}", entry.id)));
        }
        info!(
            entry_id = %entry.id,
            platform = %entry.platform,
            scheduled_for = %entry.scheduled_for,
            "Queued entry"
        );
        tables.queue.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn get_entry(&self, id: &QueueEntryId) -> StoreResult<Option<QueueEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.queue.get(id).cloned())
    }

    async fn update_entry(&self, entry: QueueEntry) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.queue.contains_key(&entry.id) {
            return Err(StoreError::not_found(format!("Queue entry {} not found", entry.id)));
        }
        tables.queue.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn find_by_key(
        &self,
        candidate_id: &CandidateId,
        platform: Platform,
    ) -> StoreResult<Option<QueueEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .queue
            .values()
            .find(|e| &e.candidate_id == candidate_id && e.platform == platform)
            .cloned())
    }

    async fn last_scheduled(&self, platform: Platform) -> StoreResult<Option<DateTime<Utc>>> {
        let tables = self.tables.read().await;
        Ok(tables
            .queue
            .values()
            .filter(|e| e.platform == platform)
            .map(|e| e.scheduled_for)
            .max())
    }

    async fn due_entries(
        &self,
        now: DateTime<Utc>,
        platform: Option<Platform>,
    ) -> StoreResult<Vec<QueueEntry>> {
        let tables = self.tables.read().await;
        let mut due: Vec<QueueEntry> = tables
            .queue
            .values()
            .filter(|e| e.is_due(now))
            .filter(|e| platform.map_or(true, |p| e.platform == p))
            .cloned()
            .collect();
        due.sort_by_key(|e| e.scheduled_for);
        Ok(due)
    }

    async fn pending_entries(&self, platform: Platform) -> StoreResult<Vec<QueueEntry>> {
        let tables = self.tables.read().await;
        let mut pending: Vec<QueueEntry> = tables
            .queue
            .values()
            .filter(|e| e.status == QueueStatus::Pending && e.platform == platform)
            .cloned()
            .collect();
        pending.sort_by_key(|e| e.scheduled_for);
        Ok(pending)
    }

    async fn failed_entries(&self, limit: usize) -> StoreResult<Vec<QueueEntry>> {
        let tables = self.tables.read().await;
        let mut failed: Vec<QueueEntry> = tables
            .queue
            .values()
            .filter(|e| e.status == QueueStatus::Failed)
            .cloned()
            .collect();
        failed.sort_by_key(|e| e.scheduled_for);
        failed.truncate(limit);
        Ok(failed)
    }

    async fn delete_entry(&self, id: &QueueEntryId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables.queue.remove(id).is_some())
    }
}

#[async_trait]
impl DirectionStore for MemoryStore {
    async fn upsert_direction(&self, record: DirectionRecord) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let outcome = if tables.directions.contains_key(&record.candidate_id) {
            "updated"
        } else {
            "created"
        };
        counter!("direction_upsert_total", "outcome" => outcome).increment(1);
        debug!(candidate_id = %record.candidate_id, outcome, "Stored content direction");
        tables.directions.insert(record.candidate_id.clone(), record);
        Ok(())
    }

    async fn get_direction(&self, id: &CandidateId) -> StoreResult<Option<DirectionRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.directions.get(id).cloned())
    }

    async fn list_directions(&self) -> StoreResult<Vec<DirectionRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.directions.values().cloned().collect())
    }
}
