//! Per-candidate direction records written by the decision engine.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ApprovalLevel, CandidateId, ContentPillar, ContentStatus, ContentValidation};

/// Audit record of the decision engine's latest verdict for a candidate.
///
/// Upserted on the candidate's identity: re-evaluating the same candidate
/// overwrites its prior record rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DirectionRecord {
    /// Natural key
    pub candidate_id: CandidateId,
    pub status: ContentStatus,
    pub approval: ApprovalLevel,
    /// Composite validation score at decision time
    pub quality_score: f64,
    pub virality_score: f64,
    pub pillar: ContentPillar,
    /// Director's critical-fix notes
    pub notes: Vec<String>,
    /// Full validation details for reviewers
    pub validation: ContentValidation,
    pub updated_at: DateTime<Utc>,
}
