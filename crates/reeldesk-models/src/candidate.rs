//! Content candidates flowing through the pipeline.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CandidateId, ContentPillar, Platform};

/// Content lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Raw footage ingested
    Ingested,
    /// Split into candidate segments
    Segmented,
    /// Analyzer output attached, waiting QA
    #[default]
    Analyzed,
    /// In editorial review
    QaPending,
    /// Passed QA, ready for production
    Approved,
    /// Failed QA, needs revision
    Rejected,
    /// Video produced, ready for scheduling
    Produced,
    /// Scheduled for posting
    Queued,
    /// Posted to platforms
    Published,
    /// Superseded, not actively promoted
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Ingested => "ingested",
            ContentStatus::Segmented => "segmented",
            ContentStatus::Analyzed => "analyzed",
            ContentStatus::QaPending => "qa_pending",
            ContentStatus::Approved => "approved",
            ContentStatus::Rejected => "rejected",
            ContentStatus::Produced => "produced",
            ContentStatus::Queued => "queued",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContentStatus::Published | ContentStatus::Archived)
    }
}

/// How the candidate cleared (or failed) the approval gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    /// Passed automated QA
    Automatic,
    /// Needs human review
    EditorReview,
    /// Doesn't meet standards
    Rejected,
}

impl ApprovalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalLevel::Automatic => "automatic",
            ApprovalLevel::EditorReview => "editor_review",
            ApprovalLevel::Rejected => "rejected",
        }
    }
}

/// Source attribution fields supplied by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Attribution {
    /// Names of required fields that are missing or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let empty = |f: &Option<String>| f.as_deref().map_or(true, |s| s.is_empty());
        if empty(&self.source) {
            missing.push("source");
        }
        if empty(&self.source_url) {
            missing.push("sourceUrl");
        }
        if empty(&self.creator) {
            missing.push("creator");
        }
        if empty(&self.license) {
            missing.push("license");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Structured metadata attached by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateMetadata {
    /// Detected editorial category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_pillar: Option<ContentPillar>,

    /// Per-platform suitability scores (0-10)
    #[serde(default)]
    pub platform_scores: HashMap<Platform, f64>,

    /// Per-platform hashtag suggestions from the analyzer
    #[serde(default)]
    pub platform_hashtags: HashMap<Platform, Vec<String>>,

    /// Source attribution fields
    #[serde(default)]
    pub attribution: Attribution,

    /// Anything else the analyzer returned that we do not interpret
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

/// The unit flowing through the pipeline: one analyzed clip segment plus
/// the analyzer's editorial output for it.
///
/// Immutable once created except for the disposition fields stamped by the
/// decision engine (`status`, `approval`, `quality_score`). Never deleted;
/// superseded candidates are marked archived.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentCandidate {
    /// Unique candidate ID
    pub id: CandidateId,

    /// Attention-grabbing opening line
    pub hook: String,

    /// Contextual explanation of the clip
    pub explanation: String,

    /// Caption text for the post body
    pub caption: String,

    /// Ordered hashtag list (no leading '#')
    pub hashtags: Vec<String>,

    /// Composite virality estimate (0-10), max of per-platform scores
    pub virality_score: f64,

    /// Structured analyzer metadata
    #[serde(default)]
    pub metadata: CandidateMetadata,

    /// Lifecycle status
    #[serde(default)]
    pub status: ContentStatus,

    /// Approval routing stamped by the decision engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval: Option<ApprovalLevel>,

    /// Composite validation score stamped by the decision engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ContentCandidate {
    /// Build a candidate from analyzer output.
    ///
    /// The virality score is derived here: maximum of the per-platform
    /// suitability scores, clamped to 0-10.
    pub fn from_analysis(
        hook: impl Into<String>,
        explanation: impl Into<String>,
        caption: impl Into<String>,
        hashtags: Vec<String>,
        metadata: CandidateMetadata,
    ) -> Self {
        let virality_score = metadata
            .platform_scores
            .values()
            .copied()
            .fold(0.0_f64, f64::max)
            .clamp(0.0, 10.0);

        Self {
            id: CandidateId::new(),
            hook: hook.into(),
            explanation: explanation.into(),
            caption: caption.into(),
            hashtags,
            virality_score,
            metadata,
            status: ContentStatus::Analyzed,
            approval: None,
            quality_score: None,
            created_at: Utc::now(),
        }
    }

    /// Suitability score for a platform, defaulting to the neutral 5/10
    /// when the analyzer did not supply one.
    pub fn platform_score(&self, platform: Platform) -> f64 {
        self.metadata
            .platform_scores
            .get(&platform)
            .copied()
            .unwrap_or(5.0)
    }

    /// Analyzer-suggested hashtags for a platform, capped at `limit`.
    pub fn platform_hashtags(&self, platform: Platform, limit: usize) -> Vec<String> {
        self.metadata
            .platform_hashtags
            .get(&platform)
            .map(|tags| tags.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Detected pillar, defaulting to historical context when absent.
    pub fn pillar(&self) -> ContentPillar {
        self.metadata
            .content_pillar
            .unwrap_or(ContentPillar::HistoricalContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with_scores(scores: &[(Platform, f64)]) -> CandidateMetadata {
        CandidateMetadata {
            platform_scores: scores.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn virality_takes_platform_maximum() {
        let meta = metadata_with_scores(&[
            (Platform::Instagram, 6.0),
            (Platform::Tiktok, 8.5),
            (Platform::YoutubeShorts, 4.0),
        ]);
        let candidate =
            ContentCandidate::from_analysis("Hook", "Explanation", "Caption", vec![], meta);
        assert_eq!(candidate.virality_score, 8.5);
    }

    #[test]
    fn virality_is_clamped() {
        let meta = metadata_with_scores(&[(Platform::Instagram, 14.0)]);
        let candidate =
            ContentCandidate::from_analysis("Hook", "Explanation", "Caption", vec![], meta);
        assert_eq!(candidate.virality_score, 10.0);
    }

    #[test]
    fn missing_platform_score_defaults_to_neutral() {
        let candidate = ContentCandidate::from_analysis(
            "Hook",
            "Explanation",
            "Caption",
            vec![],
            CandidateMetadata::default(),
        );
        assert_eq!(candidate.platform_score(Platform::Instagram), 5.0);
    }

    #[test]
    fn attribution_reports_missing_fields() {
        let attribution = Attribution {
            source: Some("archive.org".to_string()),
            source_url: None,
            creator: Some(String::new()),
            license: Some("public domain".to_string()),
        };
        assert_eq!(attribution.missing_fields(), vec!["sourceUrl", "creator"]);
        assert!(!attribution.is_complete());
    }
}
