//! Evaluator output and approval decisions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ApprovalLevel, ContentStatus, DirectorGuidance};

/// Individual sub-scores behind a composite validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSignals {
    /// Hook strength (0-10)
    pub hook_strength: f64,
    /// Caption clarity (0-10)
    pub clarity_score: f64,
    /// Platform relevance (0-10), analyzer-supplied or neutral 5
    pub relevance_score: f64,
    /// Sensationalism (0-10, higher is worse)
    pub sensationalism_score: f64,
    /// All required attribution fields present
    pub attribution_complete: bool,
    /// Explanation long enough to carry context
    pub context_present: bool,
}

/// Result of running the quality evaluator over a candidate.
///
/// `is_valid` is the editorial target gate (score >= 70). Routing uses the
/// looser operational thresholds in the decision engine; see
/// `reeldesk-editorial`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentValidation {
    /// Whether the composite score clears the editorial target (>= 70)
    pub is_valid: bool,
    /// Composite score, clamped to 0-100
    pub score: f64,
    /// Blocking issues, in natural language
    pub critiques: Vec<String>,
    /// Non-blocking concerns
    pub warnings: Vec<String>,
    /// Suggested improvements
    pub recommendations: Vec<String>,
    /// Individual sub-scores
    pub signals: ValidationSignals,
}

impl ContentValidation {
    /// Editorial target: composite score at or above this is "valid".
    pub const VALID_SCORE: f64 = 70.0;

    /// Finalize a validation: clamp the score and derive `is_valid`.
    pub fn finalize(
        score: f64,
        critiques: Vec<String>,
        warnings: Vec<String>,
        recommendations: Vec<String>,
        signals: ValidationSignals,
    ) -> Self {
        let score = score.clamp(0.0, 100.0);
        Self {
            is_valid: score >= Self::VALID_SCORE,
            score,
            critiques,
            warnings,
            recommendations,
            signals,
        }
    }
}

/// Routing decision produced by the approval engine for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApprovalDecision {
    /// Lifecycle status the candidate moves to
    pub status: ContentStatus,
    /// Approval routing level
    pub approval: ApprovalLevel,
    /// The triggering validation
    pub validation: ContentValidation,
    /// Production guidance derived alongside the decision
    pub guidance: DirectorGuidance,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> ValidationSignals {
        ValidationSignals {
            hook_strength: 5.0,
            clarity_score: 5.0,
            relevance_score: 5.0,
            sensationalism_score: 0.0,
            attribution_complete: true,
            context_present: true,
        }
    }

    #[test]
    fn finalize_clamps_score() {
        let v = ContentValidation::finalize(130.0, vec![], vec![], vec![], signals());
        assert_eq!(v.score, 100.0);
        let v = ContentValidation::finalize(-20.0, vec![], vec![], vec![], signals());
        assert_eq!(v.score, 0.0);
    }

    #[test]
    fn is_valid_tracks_the_seventy_gate() {
        assert!(ContentValidation::finalize(70.0, vec![], vec![], vec![], signals()).is_valid);
        assert!(!ContentValidation::finalize(69.9, vec![], vec![], vec![], signals()).is_valid);
    }
}
