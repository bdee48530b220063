//! Publish dispatch.
//!
//! Walks due queue entries in slot order and hands each to the publish
//! collaborator, with a courtesy delay between consecutive calls.
//! Republishing a posted entry is a no-op, so a crashed run can be
//! replayed safely.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{info, warn};

use reeldesk_models::{
    ContentCandidate, ContentStatus, Platform, QueueEntry, QueueEntryId, QueueStatus, VideoAssetId,
};
use reeldesk_store::{CandidateStore, QueueStore, TtlCache};

use crate::config::SchedulerConfig;
use crate::error::{QueueError, QueueResult};

/// One publish call to the external collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub platform: Platform,
    pub video_url: String,
    pub caption: String,
    pub hashtags: Vec<String>,
}

/// The external publish collaborator.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish one video; returns the live post URL.
    async fn publish(&self, request: &PublishRequest) -> QueueResult<String>;
}

/// What happened to one entry during a dispatch run.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Posted { post_url: String },
    /// Entry was already posted; nothing was sent
    AlreadyPosted,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub entry_id: QueueEntryId,
    pub platform: Platform,
    pub outcome: PublishOutcome,
}

/// Hashtags included in a caption, capped per platform.
fn caption_hashtag_cap(platform: Platform) -> usize {
    match platform {
        Platform::Instagram => 10,
        _ => 5,
    }
}

fn build_caption(candidate: &ContentCandidate, platform: Platform) -> (String, Vec<String>) {
    let mut hashtags = candidate.platform_hashtags(platform, caption_hashtag_cap(platform));
    if hashtags.is_empty() {
        hashtags = candidate
            .hashtags
            .iter()
            .take(caption_hashtag_cap(platform))
            .map(|t| format!("#{}", t))
            .collect();
    }
    let caption = if hashtags.is_empty() {
        candidate.caption.clone()
    } else {
        format!("{}\n\n{}", candidate.caption, hashtags.join(" "))
    };
    (caption, hashtags)
}

/// The dispatcher: drains due entries through a [`Publisher`].
pub struct Dispatcher<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
    config: SchedulerConfig,
    /// Resolved asset URLs, so a burst of entries for one video does not
    /// hit the store repeatedly
    asset_urls: TtlCache<VideoAssetId, String>,
}

impl<S, P> Dispatcher<S, P>
where
    S: CandidateStore + QueueStore,
    P: Publisher,
{
    pub fn new(store: Arc<S>, publisher: Arc<P>, config: SchedulerConfig) -> Self {
        Self {
            store,
            publisher,
            config,
            asset_urls: TtlCache::new(Duration::from_secs(300)),
        }
    }

    /// Publish everything due at `now`, in slot order, optionally for a
    /// single platform.
    pub async fn publish_due(
        &self,
        now: DateTime<Utc>,
        platform: Option<Platform>,
    ) -> QueueResult<Vec<PublishResult>> {
        let due = self.store.due_entries(now, platform).await?;
        if due.is_empty() {
            return Ok(Vec::new());
        }
        info!(count = due.len(), "dispatching due queue entries");

        let mut results = Vec::with_capacity(due.len());
        for (index, entry) in due.into_iter().enumerate() {
            if index > 0 && !self.config.inter_post_delay.is_zero() {
                tokio::time::sleep(self.config.inter_post_delay).await;
            }
            results.push(self.publish_entry(entry).await?);
        }
        Ok(results)
    }

    /// Publish one entry by id, regardless of its slot.
    pub async fn publish(&self, entry_id: &QueueEntryId) -> QueueResult<PublishResult> {
        let entry = self
            .store
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| QueueError::not_found(format!("queue entry {}", entry_id)))?;
        self.publish_entry(entry).await
    }

    /// Reset failed entries and dispatch them again immediately.
    pub async fn retry_failed(&self, limit: usize) -> QueueResult<Vec<PublishResult>> {
        let failed = self.store.failed_entries(limit).await?;
        let mut results = Vec::with_capacity(failed.len());
        for (index, entry) in failed.into_iter().enumerate() {
            if index > 0 && !self.config.inter_post_delay.is_zero() {
                tokio::time::sleep(self.config.inter_post_delay).await;
            }
            let reset = entry.reset_for_retry();
            self.store.update_entry(reset.clone()).await?;
            results.push(self.publish_entry(reset).await?);
        }
        Ok(results)
    }

    async fn publish_entry(&self, entry: QueueEntry) -> QueueResult<PublishResult> {
        // Re-publishing a posted entry must be a no-op: dispatch runs can
        // overlap or be replayed after a crash.
        if entry.status == QueueStatus::Posted {
            return Ok(PublishResult {
                entry_id: entry.id,
                platform: entry.platform,
                outcome: PublishOutcome::AlreadyPosted,
            });
        }

        let candidate = match self.store.get_candidate(&entry.candidate_id).await? {
            Some(candidate) => candidate,
            None => {
                let error = format!("candidate {} missing", entry.candidate_id);
                return self.fail(entry, error).await;
            }
        };
        let video_url = match self.resolve_video_url(&entry.video_id).await? {
            Some(url) => url,
            None => {
                let error = format!("video asset {} missing", entry.video_id);
                return self.fail(entry, error).await;
            }
        };

        self.store.update_entry(entry.clone().start_posting()).await?;
        let (caption, hashtags) = build_caption(&candidate, entry.platform);
        let request = PublishRequest {
            platform: entry.platform,
            video_url,
            caption,
            hashtags,
        };

        if self.config.dry_run {
            info!(entry_id = %entry.id, platform = %entry.platform, "dry run, skipping publish call");
            return self.succeed(entry, candidate, "dry-run".to_string()).await;
        }

        match self.publisher.publish(&request).await {
            Ok(post_url) => self.succeed(entry, candidate, post_url).await,
            Err(err) => self.fail(entry, err.to_string()).await,
        }
    }

    async fn succeed(
        &self,
        entry: QueueEntry,
        mut candidate: ContentCandidate,
        post_url: String,
    ) -> QueueResult<PublishResult> {
        let posted = entry.mark_posted();
        self.store.update_entry(posted.clone()).await?;
        candidate.status = ContentStatus::Published;
        self.store.upsert_candidate(candidate).await?;

        counter!("publish_total", "platform" => posted.platform.as_str(), "outcome" => "posted")
            .increment(1);
        info!(entry_id = %posted.id, platform = %posted.platform, post_url, "published");
        Ok(PublishResult {
            entry_id: posted.id,
            platform: posted.platform,
            outcome: PublishOutcome::Posted { post_url },
        })
    }

    async fn fail(&self, entry: QueueEntry, error: String) -> QueueResult<PublishResult> {
        let failed = entry.mark_failed(error.clone());
        self.store.update_entry(failed.clone()).await?;

        counter!("publish_total", "platform" => failed.platform.as_str(), "outcome" => "failed")
            .increment(1);
        warn!(entry_id = %failed.id, platform = %failed.platform, error, "publish failed");
        Ok(PublishResult {
            entry_id: failed.id,
            platform: failed.platform,
            outcome: PublishOutcome::Failed { error },
        })
    }

    async fn resolve_video_url(&self, video_id: &VideoAssetId) -> QueueResult<Option<String>> {
        if let Some(url) = self.asset_urls.get(video_id).await {
            return Ok(Some(url));
        }
        let Some(video) = self.store.get_produced_video(video_id).await? else {
            return Ok(None);
        };
        self.asset_urls.put(video_id.clone(), video.video_url.clone()).await;
        Ok(Some(video.video_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use reeldesk_models::{CandidateId, CandidateMetadata, ProducedVideo};
    use reeldesk_store::MemoryStore;
    use tokio::sync::Mutex;

    /// Publisher fake that records requests and can be set to fail.
    struct FakePublisher {
        calls: Mutex<Vec<PublishRequest>>,
        fail_with: Option<String>,
    }

    impl FakePublisher {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with: Some(error.to_string()),
            }
        }

        async fn call_count(&self) -> usize {
            self.calls.lock().await.len()
        }
    }

    #[async_trait]
    impl Publisher for FakePublisher {
        async fn publish(&self, request: &PublishRequest) -> QueueResult<String> {
            self.calls.lock().await.push(request.clone());
            match &self.fail_with {
                Some(error) => Err(QueueError::publish(error.clone())),
                None => Ok(format!("https://{}/p/123", request.platform)),
            }
        }
    }

    fn test_config() -> SchedulerConfig {
        SchedulerConfig {
            inter_post_delay: Duration::ZERO,
            quiet_windows: vec![],
            ..SchedulerConfig::default()
        }
    }

    async fn seed_entry(store: &MemoryStore, scheduled_for: DateTime<Utc>) -> QueueEntry {
        let candidate = ContentCandidate::from_analysis(
            "A hook",
            "Enough explanation to pass along.",
            "Caption body.",
            vec!["history".to_string()],
            CandidateMetadata::default(),
        );
        let candidate_id = candidate.id.clone();
        store.upsert_candidate(candidate).await.unwrap();

        let video = ProducedVideo::new(candidate_id.clone(), "https://cdn.example/v.mp4", None);
        let video_id = video.id.clone();
        store.insert_produced_video(video).await.unwrap();

        let entry = QueueEntry::new(candidate_id, video_id, Platform::Instagram, scheduled_for);
        store.insert_entry(entry.clone()).await.unwrap();
        entry
    }

    #[tokio::test]
    async fn due_entries_are_published_and_marked() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(FakePublisher::ok());
        let dispatcher = Dispatcher::new(store.clone(), publisher.clone(), test_config());
        let now = Utc::now();
        let entry = seed_entry(&store, now - ChronoDuration::minutes(1)).await;
        seed_entry(&store, now + ChronoDuration::hours(2)).await; // not due

        let results = dispatcher.publish_due(now, None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].outcome, PublishOutcome::Posted { .. }));
        assert_eq!(publisher.call_count().await, 1);

        let stored = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QueueStatus::Posted);
        assert!(stored.posted_at.is_some());

        let candidate = store.get_candidate(&entry.candidate_id).await.unwrap().unwrap();
        assert_eq!(candidate.status, ContentStatus::Published);
    }

    #[tokio::test]
    async fn republishing_a_posted_entry_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(FakePublisher::ok());
        let dispatcher = Dispatcher::new(store.clone(), publisher.clone(), test_config());
        let entry = seed_entry(&store, Utc::now()).await;

        dispatcher.publish(&entry.id).await.unwrap();
        let second = dispatcher.publish(&entry.id).await.unwrap();

        assert_eq!(second.outcome, PublishOutcome::AlreadyPosted);
        assert_eq!(publisher.call_count().await, 1);
    }

    #[tokio::test]
    async fn failures_are_recorded_on_the_entry() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(FakePublisher::failing("rate limited"));
        let dispatcher = Dispatcher::new(store.clone(), publisher, test_config());
        let entry = seed_entry(&store, Utc::now()).await;

        let result = dispatcher.publish(&entry.id).await.unwrap();
        assert!(matches!(result.outcome, PublishOutcome::Failed { .. }));

        let stored = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QueueStatus::Failed);
        assert!(stored.error_message.as_deref().unwrap_or("").contains("rate limited"));
    }

    #[tokio::test]
    async fn retry_failed_resets_and_redispatches() {
        let store = Arc::new(MemoryStore::new());
        let entry = seed_entry(&store, Utc::now()).await;
        store
            .update_entry(entry.clone().start_posting().mark_failed("transient"))
            .await
            .unwrap();

        let publisher = Arc::new(FakePublisher::ok());
        let dispatcher = Dispatcher::new(store.clone(), publisher.clone(), test_config());
        let results = dispatcher.retry_failed(10).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].outcome, PublishOutcome::Posted { .. }));
        let stored = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QueueStatus::Posted);
        assert!(stored.error_message.is_none());
    }

    #[tokio::test]
    async fn dry_run_skips_the_publisher_but_marks_posted() {
        let store = Arc::new(MemoryStore::new());
        let publisher = Arc::new(FakePublisher::ok());
        let config = SchedulerConfig {
            dry_run: true,
            ..test_config()
        };
        let dispatcher = Dispatcher::new(store.clone(), publisher.clone(), config);
        let entry = seed_entry(&store, Utc::now()).await;

        let result = dispatcher.publish(&entry.id).await.unwrap();
        assert!(matches!(result.outcome, PublishOutcome::Posted { .. }));
        assert_eq!(publisher.call_count().await, 0);
        let stored = store.get_entry(&entry.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QueueStatus::Posted);
    }

    #[tokio::test]
    async fn missing_candidate_fails_the_entry() {
        let store = Arc::new(MemoryStore::new());
        let video = ProducedVideo::new(CandidateId::new(), "https://cdn.example/v.mp4", None);
        store.insert_produced_video(video.clone()).await.unwrap();
        let entry = QueueEntry::new(CandidateId::new(), video.id, Platform::Tiktok, Utc::now());
        store.insert_entry(entry.clone()).await.unwrap();

        let dispatcher = Dispatcher::new(store.clone(), Arc::new(FakePublisher::ok()), test_config());
        let result = dispatcher.publish(&entry.id).await.unwrap();
        assert!(matches!(result.outcome, PublishOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn caption_carries_hashtags() {
        let candidate = ContentCandidate::from_analysis(
            "Hook",
            "Explanation.",
            "Body text.",
            vec!["history".to_string(), "archive".to_string()],
            CandidateMetadata::default(),
        );
        let (caption, hashtags) = build_caption(&candidate, Platform::Instagram);
        assert_eq!(hashtags, vec!["#history", "#archive"]);
        assert!(caption.ends_with("#history #archive"));
    }
}
