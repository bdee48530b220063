//! Editorial review tasks.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{CandidateId, ReviewTaskId};

/// Review lifecycle stage.
///
/// Transitions are monotonic: pending -> in_review -> approved or
/// revision_requested, with archived reachable from any non-terminal stage.
/// A revision restart is a brand-new task, never a reopened one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    #[default]
    Pending,
    InReview,
    Approved,
    RevisionRequested,
    Archived,
}

impl ReviewStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStage::Pending => "pending",
            ReviewStage::InReview => "in_review",
            ReviewStage::Approved => "approved",
            ReviewStage::RevisionRequested => "revision_requested",
            ReviewStage::Archived => "archived",
        }
    }

    /// A decided or archived task never moves again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReviewStage::Approved | ReviewStage::RevisionRequested | ReviewStage::Archived
        )
    }
}

/// Priority for review queue ordering. Ord follows urgency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ReviewPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewPriority::Low => "low",
            ReviewPriority::Medium => "medium",
            ReviewPriority::High => "high",
            ReviewPriority::Urgent => "urgent",
        }
    }
}

/// Severity of a flagged issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Critical,
    Suggestion,
    Info,
}

/// One issue attached to a review task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub message: String,
    /// Which candidate field the issue refers to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ReviewIssue {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Critical,
            message: message.into(),
            field: None,
        }
    }

    pub fn suggestion(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Suggestion,
            message: message.into(),
            field: None,
        }
    }
}

/// A human-in-the-loop review task for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReviewTask {
    pub id: ReviewTaskId,
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub stage: ReviewStage,
    #[serde(default)]
    pub priority: ReviewPriority,
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    /// Editor feedback recorded with the decision
    #[serde(default)]
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl ReviewTask {
    /// Create a fresh pending task.
    pub fn new(candidate_id: CandidateId, issues: Vec<ReviewIssue>, priority: ReviewPriority) -> Self {
        Self {
            id: ReviewTaskId::new(),
            candidate_id,
            stage: ReviewStage::Pending,
            priority,
            issues,
            feedback: String::new(),
            created_at: Utc::now(),
            assigned_to: None,
            decided_at: None,
            decided_by: None,
        }
    }

    /// Assign to an editor: pending -> in_review.
    ///
    /// Returns false (leaving the task untouched) if the task is not
    /// assignable in its current stage.
    pub fn assign(&mut self, editor_id: impl Into<String>) -> bool {
        if self.stage != ReviewStage::Pending {
            return false;
        }
        self.stage = ReviewStage::InReview;
        self.assigned_to = Some(editor_id.into());
        true
    }

    /// Record the editor's decision: in_review -> approved | revision_requested.
    pub fn decide(
        &mut self,
        approved: bool,
        feedback: impl Into<String>,
        editor_id: impl Into<String>,
    ) -> bool {
        if self.stage != ReviewStage::InReview {
            return false;
        }
        self.stage = if approved {
            ReviewStage::Approved
        } else {
            ReviewStage::RevisionRequested
        };
        self.feedback = feedback.into();
        self.decided_by = Some(editor_id.into());
        self.decided_at = Some(Utc::now());
        true
    }

    /// Retire a task that is no longer actionable.
    pub fn archive(&mut self) -> bool {
        if self.stage == ReviewStage::Archived {
            return false;
        }
        self.stage = ReviewStage::Archived;
        true
    }

    /// Review duration, available once decided.
    pub fn review_duration(&self) -> Option<chrono::Duration> {
        self.decided_at.map(|decided| decided - self.created_at)
    }
}
