//! Human-in-the-loop review workflow.
//!
//! The decision engine routes mid-band candidates here. The desk opens a
//! prioritized task per candidate, editors claim and decide it, and the
//! verdict is stamped back onto the candidate. Decided tasks are frozen;
//! a revision round opens a fresh task.

use std::sync::Arc;

use metrics::counter;
use tracing::info;

use reeldesk_models::{
    ApprovalDecision, ApprovalLevel, ContentCandidate, ContentStatus, ReviewIssue, ReviewPriority,
    ReviewStage, ReviewTask, ReviewTaskId,
};
use reeldesk_store::{CandidateStore, ReviewStore};

use crate::error::{EditorialError, EditorialResult};

/// Aggregate counters over all review tasks. Daily counts use UTC
/// calendar days.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApprovalStats {
    pub pending: usize,
    pub in_review: usize,
    pub approved_today: usize,
    pub revisions_today: usize,
    /// Mean time from task creation to decision over all decided tasks,
    /// in hours rounded to one decimal
    pub avg_review_hours: Option<f64>,
}

/// The review desk: opens, assigns, and settles review tasks.
pub struct ReviewDesk<S> {
    store: Arc<S>,
}

impl<S> ReviewDesk<S>
where
    S: CandidateStore + ReviewStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Open a review task for a candidate routed to editor review.
    ///
    /// Issues carry over from the decision: critiques as critical,
    /// warnings and recommendations as suggestions.
    pub async fn open_review(
        &self,
        candidate: &ContentCandidate,
        decision: &ApprovalDecision,
    ) -> EditorialResult<ReviewTask> {
        let mut issues: Vec<ReviewIssue> = decision
            .validation
            .critiques
            .iter()
            .map(ReviewIssue::critical)
            .collect();
        issues.extend(decision.validation.warnings.iter().map(ReviewIssue::suggestion));
        issues.extend(
            decision
                .validation
                .recommendations
                .iter()
                .map(ReviewIssue::suggestion),
        );

        let priority = Self::priority_for(candidate, decision);
        let task = ReviewTask::new(candidate.id.clone(), issues, priority);
        self.store.insert_task(task.clone()).await?;

        counter!("review_tasks_opened_total", "priority" => priority.as_str()).increment(1);
        info!(
            task_id = %task.id,
            candidate_id = %candidate.id,
            priority = priority.as_str(),
            "review task opened"
        );
        Ok(task)
    }

    /// Claim a pending task for an editor.
    pub async fn assign(
        &self,
        task_id: &ReviewTaskId,
        editor_id: &str,
    ) -> EditorialResult<ReviewTask> {
        let mut task = self.fetch(task_id).await?;
        if !task.assign(editor_id) {
            return Err(EditorialError::invalid_transition(format!(
                "task {} is {}, not pending",
                task_id,
                task.stage.as_str()
            )));
        }
        self.store.update_task(task.clone()).await?;
        Ok(task)
    }

    /// Record the editor's verdict and stamp it onto the candidate.
    pub async fn submit_decision(
        &self,
        task_id: &ReviewTaskId,
        approved: bool,
        feedback: &str,
        editor_id: &str,
    ) -> EditorialResult<ReviewTask> {
        let mut task = self.fetch(task_id).await?;
        if !task.decide(approved, feedback, editor_id) {
            return Err(EditorialError::invalid_transition(format!(
                "task {} is {}, not in review",
                task_id,
                task.stage.as_str()
            )));
        }
        self.store.update_task(task.clone()).await?;

        let quality_score = self
            .store
            .get_candidate(&task.candidate_id)
            .await?
            .and_then(|c| c.quality_score)
            .unwrap_or(0.0);
        let (status, approval) = if approved {
            (ContentStatus::Approved, ApprovalLevel::EditorReview)
        } else {
            (ContentStatus::Rejected, ApprovalLevel::Rejected)
        };
        self.store
            .set_disposition(&task.candidate_id, status, approval, quality_score)
            .await?;

        counter!("review_decisions_total", "outcome" => if approved { "approved" } else { "revision" })
            .increment(1);
        info!(
            task_id = %task.id,
            candidate_id = %task.candidate_id,
            approved,
            editor = editor_id,
            "review decided"
        );
        Ok(task)
    }

    /// Retire a task that is no longer actionable.
    pub async fn archive(&self, task_id: &ReviewTaskId) -> EditorialResult<ReviewTask> {
        let mut task = self.fetch(task_id).await?;
        if !task.archive() {
            return Err(EditorialError::invalid_transition(format!(
                "task {} is already archived",
                task_id
            )));
        }
        self.store.update_task(task.clone()).await?;
        Ok(task)
    }

    /// Actionable tasks: urgent first, oldest first within a priority.
    pub async fn open_tasks(&self, limit: usize) -> EditorialResult<Vec<ReviewTask>> {
        Ok(self.store.list_open_tasks(limit).await?)
    }

    /// Open a follow-up task from a revision round.
    ///
    /// The original task must have been decided as revision-requested; the
    /// revision notes seed the new task's critical issues.
    pub async fn request_revisions(
        &self,
        task_id: &ReviewTaskId,
        notes: &[String],
    ) -> EditorialResult<ReviewTask> {
        let prior = self.fetch(task_id).await?;
        if prior.stage != ReviewStage::RevisionRequested {
            return Err(EditorialError::invalid_transition(format!(
                "task {} is {}, revisions need a revision_requested task",
                task_id,
                prior.stage.as_str()
            )));
        }
        let issues = notes.iter().map(ReviewIssue::critical).collect();
        let task = ReviewTask::new(prior.candidate_id.clone(), issues, prior.priority);
        self.store.insert_task(task.clone()).await?;
        info!(
            task_id = %task.id,
            prior_task_id = %prior.id,
            candidate_id = %task.candidate_id,
            "revision round opened"
        );
        Ok(task)
    }

    /// Aggregate workload and throughput counters.
    pub async fn stats(&self) -> EditorialResult<ApprovalStats> {
        let tasks = self.store.list_all_tasks().await?;
        let today = chrono::Utc::now().date_naive();
        let mut stats = ApprovalStats::default();
        let mut decided_hours = Vec::new();

        for task in &tasks {
            let decided_today = task
                .decided_at
                .map(|t| t.date_naive() == today)
                .unwrap_or(false);
            match task.stage {
                ReviewStage::Pending => stats.pending += 1,
                ReviewStage::InReview => stats.in_review += 1,
                ReviewStage::Approved if decided_today => stats.approved_today += 1,
                ReviewStage::RevisionRequested if decided_today => stats.revisions_today += 1,
                _ => {}
            }
            if let Some(duration) = task.review_duration() {
                decided_hours.push(duration.num_seconds() as f64 / 3600.0);
            }
        }
        if !decided_hours.is_empty() {
            let mean = decided_hours.iter().sum::<f64>() / decided_hours.len() as f64;
            stats.avg_review_hours = Some((mean * 10.0).round() / 10.0);
        }
        Ok(stats)
    }

    async fn fetch(&self, task_id: &ReviewTaskId) -> EditorialResult<ReviewTask> {
        self.store
            .get_task(task_id)
            .await?
            .ok_or_else(|| EditorialError::not_found(format!("review task {}", task_id)))
    }

    fn priority_for(candidate: &ContentCandidate, decision: &ApprovalDecision) -> ReviewPriority {
        // High-virality candidates are worth an editor's time first, as
        // are near-misses sitting just under the auto-approve line.
        if candidate.virality_score >= 8.0 {
            ReviewPriority::Urgent
        } else if candidate.virality_score >= 6.0 || decision.validation.score >= 45.0 {
            ReviewPriority::High
        } else {
            ReviewPriority::Medium
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidelines::{ApprovalThresholds, QualityStandards};
    use crate::ContentDirector;
    use reeldesk_models::CandidateMetadata;
    use reeldesk_store::MemoryStore;

    fn candidate() -> ContentCandidate {
        ContentCandidate::from_analysis(
            "Did this zoning map decide who got rich?",
            "Mid-century zoning maps steered investment toward some blocks and away from \
             others, and the effects compound across generations of owners and renters.",
            "This map explains a pattern most residents never see. The zoning lines drawn \
             decades ago still decide which blocks attract investment and which are passed \
             over. The history matters because the pattern repeats wherever the old maps \
             still govern what gets built and who gets to stay.",
            vec!["zoning".to_string()],
            CandidateMetadata::default(),
        )
    }

    async fn desk_with_open_task() -> (Arc<MemoryStore>, ReviewDesk<MemoryStore>, ReviewTask) {
        let store = Arc::new(MemoryStore::new());
        // Force the editor-review band so the decision is a genuine mid-band one.
        let director = ContentDirector::with_settings(
            store.clone(),
            QualityStandards::default(),
            ApprovalThresholds {
                auto_approve: 95.0,
                review_floor: 10.0,
            },
        );
        let candidate = candidate();
        let decision = director.review_content(&candidate).await.unwrap();
        assert_eq!(decision.approval, ApprovalLevel::EditorReview);

        let desk = ReviewDesk::new(store.clone());
        let task = desk.open_review(&candidate, &decision).await.unwrap();
        (store, desk, task)
    }

    #[tokio::test]
    async fn open_review_carries_issues_over() {
        let (_store, desk, task) = desk_with_open_task().await;
        assert_eq!(task.stage, ReviewStage::Pending);
        // The neutral relevance warning always carries over as a suggestion.
        assert!(!task.issues.is_empty());
        assert_eq!(desk.open_tasks(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approval_stamps_the_candidate() {
        let (store, desk, task) = desk_with_open_task().await;

        desk.assign(&task.id, "editor-1").await.unwrap();
        let decided = desk
            .submit_decision(&task.id, true, "solid context", "editor-1")
            .await
            .unwrap();
        assert_eq!(decided.stage, ReviewStage::Approved);

        let candidate = store.get_candidate(&task.candidate_id).await.unwrap().unwrap();
        assert_eq!(candidate.status, ContentStatus::Approved);
        assert_eq!(candidate.approval, Some(ApprovalLevel::EditorReview));
    }

    #[tokio::test]
    async fn revision_request_rejects_the_candidate() {
        let (store, desk, task) = desk_with_open_task().await;

        desk.assign(&task.id, "editor-1").await.unwrap();
        desk.submit_decision(&task.id, false, "hook overpromises", "editor-1")
            .await
            .unwrap();

        let candidate = store.get_candidate(&task.candidate_id).await.unwrap().unwrap();
        assert_eq!(candidate.status, ContentStatus::Rejected);
        assert_eq!(candidate.approval, Some(ApprovalLevel::Rejected));
    }

    #[tokio::test]
    async fn decision_without_assignment_is_rejected() {
        let (_store, desk, task) = desk_with_open_task().await;
        let err = desk
            .submit_decision(&task.id, true, "", "editor-1")
            .await
            .unwrap_err();
        assert!(matches!(err, EditorialError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let (_store, desk, _task) = desk_with_open_task().await;
        let err = desk.assign(&ReviewTaskId::new(), "editor-1").await.unwrap_err();
        assert!(matches!(err, EditorialError::NotFound(_)));
    }

    #[tokio::test]
    async fn stats_count_stages_and_decided_tasks() {
        let (store, desk, task) = desk_with_open_task().await;
        desk.assign(&task.id, "editor-1").await.unwrap();

        // Age the task so the mean covers a real review window:
        // 4h45m rounds to 4.8 at one decimal.
        let mut aged = store.get_task(&task.id).await.unwrap().unwrap();
        aged.created_at -= chrono::Duration::minutes(285);
        store.update_task(aged).await.unwrap();

        desk.submit_decision(&task.id, true, "", "editor-1").await.unwrap();

        let stats = desk.stats().await.unwrap();
        assert_eq!(stats.approved_today, 1);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.avg_review_hours, Some(4.8));
    }

    #[tokio::test]
    async fn revision_round_opens_a_fresh_task() {
        let (_store, desk, task) = desk_with_open_task().await;
        desk.assign(&task.id, "editor-1").await.unwrap();
        desk.submit_decision(&task.id, false, "rework the hook", "editor-1")
            .await
            .unwrap();

        let follow_up = desk
            .request_revisions(&task.id, &["Hook overpromises".to_string()])
            .await
            .unwrap();
        assert_ne!(follow_up.id, task.id);
        assert_eq!(follow_up.stage, ReviewStage::Pending);
        assert_eq!(follow_up.candidate_id, task.candidate_id);
        assert_eq!(follow_up.issues.len(), 1);

        // Revisions are only valid off a revision-requested task.
        let err = desk.request_revisions(&follow_up.id, &[]).await.unwrap_err();
        assert!(matches!(err, EditorialError::InvalidTransition(_)));
    }
}
