//! Posting-queue allocation.
//!
//! Slots are computed from the platform's last scheduled time plus its
//! minimum interval, with a lead-time fallback when the platform has no
//! history or the computed slot is already in the past. Queueing is
//! idempotent on the (candidate, platform) natural key.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use tracing::{debug, info, warn};

use reeldesk_models::{
    CandidateId, ContentCandidate, ContentStatus, Platform, ProducedVideo, QueueEntry,
    QueueEntryId, QueueStatus,
};
use reeldesk_store::{CandidateStore, QueueStore};

use crate::config::{QuietWindow, SchedulerConfig};
use crate::error::{QueueError, QueueResult};

/// Per-platform outcome of a queue request.
#[derive(Debug, Clone)]
pub enum QueueOutcome {
    /// A new entry was created at the given slot
    Queued(QueueEntry),
    /// The (candidate, platform) pair was already queued
    AlreadyQueued(QueueEntry),
}

impl QueueOutcome {
    pub fn entry(&self) -> &QueueEntry {
        match self {
            QueueOutcome::Queued(e) | QueueOutcome::AlreadyQueued(e) => e,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, QueueOutcome::Queued(_))
    }
}

/// One platform's result inside a queue plan.
#[derive(Debug, Clone)]
pub struct QueuePlanItem {
    pub platform: Platform,
    pub outcome: QueueOutcome,
}

/// Summary of one buffer-maintenance run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferReport {
    /// Entries for since-rejected candidates replaced, keeping their slots
    pub replaced: usize,
    /// New entries added to reach the buffer target
    pub topped_up: usize,
    /// The candidate pool ran dry before every platform hit target
    pub pool_exhausted: bool,
}

/// Compute the next posting slot for a platform.
///
/// `last` is the platform's most recent scheduled time, `interval` its
/// minimum spacing. A slot that would land in the past falls back to
/// `now + lead`; the result is then pushed past any quiet window.
pub fn next_slot(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: Duration,
    lead: Duration,
    quiet_windows: &[QuietWindow],
) -> DateTime<Utc> {
    let base = match last {
        Some(last) if last + interval > now => last + interval,
        _ => now + lead,
    };
    crate::config::shift_past_quiet_hours(quiet_windows, base)
}

/// The queue allocator: owns slot computation and buffer upkeep.
pub struct QueueAllocator<S> {
    store: Arc<S>,
    config: SchedulerConfig,
}

impl<S> QueueAllocator<S>
where
    S: CandidateStore + QueueStore,
{
    pub fn new(store: Arc<S>, config: SchedulerConfig) -> Self {
        Self { store, config }
    }

    /// Queue one candidate's produced video across `platforms`.
    ///
    /// Idempotent: a (candidate, platform) pair that is already queued
    /// comes back as [`QueueOutcome::AlreadyQueued`] and the remaining
    /// platforms still get their entries. An explicit `publish_at` is
    /// used verbatim for every platform, bypassing slot computation and
    /// quiet hours.
    pub async fn queue_for_posting(
        &self,
        candidate_id: &CandidateId,
        platforms: &[Platform],
        publish_at: Option<DateTime<Utc>>,
    ) -> QueueResult<Vec<QueuePlanItem>> {
        let candidate = self
            .store
            .get_candidate(candidate_id)
            .await?
            .ok_or_else(|| QueueError::not_found(format!("candidate {}", candidate_id)))?;
        let video = self
            .store
            .produced_video_for(candidate_id)
            .await?
            .ok_or_else(|| {
                QueueError::not_found(format!("produced video for candidate {}", candidate_id))
            })?;

        let mut plan = Vec::with_capacity(platforms.len());
        for &platform in platforms {
            let outcome = self
                .queue_one(&candidate, &video, platform, publish_at)
                .await?;
            plan.push(QueuePlanItem { platform, outcome });
        }

        if plan.iter().any(|item| item.outcome.is_new()) {
            let mut queued = candidate;
            queued.status = ContentStatus::Queued;
            self.store.upsert_candidate(queued).await?;
        }
        Ok(plan)
    }

    /// Queue a batch of candidates; a missing candidate or video skips
    /// that item and the batch continues.
    pub async fn queue_batch(
        &self,
        candidate_ids: &[CandidateId],
        platforms: &[Platform],
    ) -> QueueResult<Vec<(CandidateId, QueueResult<Vec<QueuePlanItem>>)>> {
        let mut results = Vec::with_capacity(candidate_ids.len());
        for candidate_id in candidate_ids {
            let result = self.queue_for_posting(candidate_id, platforms, None).await;
            if let Err(QueueError::NotFound(reason)) = &result {
                warn!(candidate_id = %candidate_id, reason, "skipping unqueueable candidate");
            }
            results.push((candidate_id.clone(), result));
        }
        Ok(results)
    }

    /// Next computed slot for a platform, given the live queue state.
    pub async fn next_posting_time(
        &self,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> QueueResult<DateTime<Utc>> {
        let last = self.store.last_scheduled(platform).await?;
        Ok(next_slot(
            last,
            now,
            self.config.min_interval(platform),
            self.config.first_post_lead,
            &self.config.quiet_windows,
        ))
    }

    /// Keep every platform's pending buffer at target.
    ///
    /// Pending entries whose candidate was rejected after queueing are
    /// replaced first, each replacement inheriting the vacated slot so
    /// the cadence holds. A dry pool still removes the stale entry; the
    /// slot just goes unfilled. Top-ups then fill the remaining shortfall at
    /// freshly computed slots. All platforms draw from one shared pool of
    /// produced, not-yet-queued candidates, and replacements consume the
    /// pool before top-ups run.
    pub async fn maintain_queue_buffer(&self, platforms: &[Platform]) -> QueueResult<BufferReport> {
        let mut pool = self.candidate_pool().await?;
        let mut report = BufferReport::default();
        let now = Utc::now();

        for &platform in platforms {
            for stale in self.rejected_pending(platform).await? {
                // The stale entry must never reach dispatch, so it goes
                // regardless of whether a replacement is available.
                self.store.delete_entry(&stale.id).await?;
                let Some((candidate, video)) = Self::draw(&mut pool) else {
                    report.pool_exhausted = true;
                    warn!(
                        entry_id = %stale.id,
                        candidate_id = %stale.candidate_id,
                        platform = %platform,
                        "rejected candidate's entry removed, no replacement available"
                    );
                    continue;
                };
                let entry = QueueEntry::new(
                    candidate.id.clone(),
                    video.id.clone(),
                    platform,
                    stale.scheduled_for,
                );
                self.store.insert_entry(entry.clone()).await?;
                self.mark_queued(candidate).await?;
                report.replaced += 1;
                info!(
                    entry_id = %entry.id,
                    replaced_entry_id = %stale.id,
                    candidate_id = %stale.candidate_id,
                    platform = %platform,
                    slot = %entry.scheduled_for,
                    "rejected candidate's entry replaced"
                );
            }

            // Then top up to target.
            let mut pending = self.store.pending_entries(platform).await?.len();
            while pending < self.config.buffer_target {
                let Some((candidate, video)) = Self::draw(&mut pool) else {
                    report.pool_exhausted = true;
                    break;
                };
                let slot = self.next_posting_time(platform, now).await?;
                let entry = QueueEntry::new(candidate.id.clone(), video.id.clone(), platform, slot);
                self.store.insert_entry(entry.clone()).await?;
                self.mark_queued(candidate).await?;
                report.topped_up += 1;
                pending += 1;
                debug!(entry_id = %entry.id, platform = %platform, slot = %slot, "buffer top-up");
            }
        }

        counter!("queue_buffer_replacements_total").increment(report.replaced as u64);
        counter!("queue_buffer_topups_total").increment(report.topped_up as u64);
        Ok(report)
    }

    /// Cancel a pending entry. Entries that started dispatch stay put.
    pub async fn cancel(&self, entry_id: &QueueEntryId) -> QueueResult<QueueEntry> {
        let entry = self.fetch(entry_id).await?;
        if entry.status != QueueStatus::Pending {
            return Err(QueueError::invalid_entry(format!(
                "entry {} is {}, only pending entries can be cancelled",
                entry_id,
                entry.status.as_str()
            )));
        }
        self.store.delete_entry(entry_id).await?;
        info!(entry_id = %entry_id, "queue entry cancelled");
        Ok(entry)
    }

    /// Move a pending entry to an explicit time, taken verbatim.
    pub async fn reschedule(
        &self,
        entry_id: &QueueEntryId,
        publish_at: DateTime<Utc>,
    ) -> QueueResult<QueueEntry> {
        let mut entry = self.fetch(entry_id).await?;
        if entry.status != QueueStatus::Pending {
            return Err(QueueError::invalid_entry(format!(
                "entry {} is {}, only pending entries can be rescheduled",
                entry_id,
                entry.status.as_str()
            )));
        }
        entry.scheduled_for = publish_at;
        self.store.update_entry(entry.clone()).await?;
        Ok(entry)
    }

    /// Pending entries ascending by slot, optionally per platform.
    pub async fn upcoming(
        &self,
        platform: Option<Platform>,
        limit: usize,
    ) -> QueueResult<Vec<QueueEntry>> {
        let mut entries = match platform {
            Some(platform) => self.store.pending_entries(platform).await?,
            None => {
                let mut all = Vec::new();
                for &platform in Platform::all() {
                    all.extend(self.store.pending_entries(platform).await?);
                }
                all.sort_by_key(|e| e.scheduled_for);
                all
            }
        };
        entries.truncate(limit);
        Ok(entries)
    }

    async fn queue_one(
        &self,
        candidate: &ContentCandidate,
        video: &ProducedVideo,
        platform: Platform,
        publish_at: Option<DateTime<Utc>>,
    ) -> QueueResult<QueueOutcome> {
        if let Some(existing) = self.store.find_by_key(&candidate.id, platform).await? {
            debug!(
                entry_id = %existing.id,
                candidate_id = %candidate.id,
                platform = %platform,
                "already queued"
            );
            return Ok(QueueOutcome::AlreadyQueued(existing));
        }

        let slot = match publish_at {
            Some(explicit) => explicit,
            None => self.next_posting_time(platform, Utc::now()).await?,
        };
        let entry = QueueEntry::new(candidate.id.clone(), video.id.clone(), platform, slot);
        self.store.insert_entry(entry.clone()).await?;

        counter!("queue_entries_created_total", "platform" => platform.as_str()).increment(1);
        info!(
            entry_id = %entry.id,
            candidate_id = %candidate.id,
            platform = %platform,
            slot = %slot,
            "queued for posting"
        );
        Ok(QueueOutcome::Queued(entry))
    }

    /// Pending entries whose candidate has since been rejected.
    async fn rejected_pending(&self, platform: Platform) -> QueueResult<Vec<QueueEntry>> {
        let mut stale = Vec::new();
        for entry in self.store.pending_entries(platform).await? {
            let rejected = self
                .store
                .get_candidate(&entry.candidate_id)
                .await?
                .map(|c| c.status == ContentStatus::Rejected)
                .unwrap_or(false);
            if rejected {
                stale.push(entry);
            }
        }
        Ok(stale)
    }

    /// Produced candidates paired with their assets, oldest first.
    async fn candidate_pool(&self) -> QueueResult<Vec<(ContentCandidate, ProducedVideo)>> {
        let candidates = self
            .store
            .list_by_status(ContentStatus::Produced, usize::MAX)
            .await?;
        let mut pool = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(video) = self.store.produced_video_for(&candidate.id).await? {
                pool.push((candidate, video));
            }
        }
        Ok(pool)
    }

    /// Take the oldest candidate remaining in the shared pool.
    fn draw(
        pool: &mut Vec<(ContentCandidate, ProducedVideo)>,
    ) -> Option<(ContentCandidate, ProducedVideo)> {
        if pool.is_empty() {
            None
        } else {
            Some(pool.remove(0))
        }
    }

    async fn mark_queued(&self, mut candidate: ContentCandidate) -> QueueResult<()> {
        candidate.status = ContentStatus::Queued;
        self.store.upsert_candidate(candidate).await?;
        Ok(())
    }

    async fn fetch(&self, entry_id: &QueueEntryId) -> QueueResult<QueueEntry> {
        self.store
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| QueueError::not_found(format!("queue entry {}", entry_id)))
    }
}
