//! Approval decision engine.
//!
//! Runs the quality evaluator over a candidate, routes it by the
//! operational thresholds, derives production guidance, and records the
//! disposition. Routing is driven by the composite score alone; the
//! evaluator's `is_valid` gate (>= 70) is advisory and carried through
//! unchanged in the validation details.

use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};

use reeldesk_models::{
    ApprovalDecision, ApprovalLevel, ContentCandidate, ContentPillar, ContentStatus,
    ContentValidation, DirectionRecord, DirectorGuidance, Platform, PlatformStrategy,
};
use reeldesk_store::{CandidateStore, DirectionStore};

use crate::error::EditorialResult;
use crate::guidelines::{ApprovalThresholds, QualityStandards};
use crate::quality::validate_content;

/// Hashtag caps per platform when building strategies.
fn hashtag_cap(platform: Platform) -> usize {
    match platform {
        Platform::Instagram => 10,
        _ => 5,
    }
}

/// Platforms a strategy is drafted for. Advisory only; actual slots come
/// from the queue allocator.
const STRATEGY_PLATFORMS: &[Platform] =
    &[Platform::Instagram, Platform::Facebook, Platform::YoutubeShorts];

fn default_posting_time(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "18:00 UTC",
        Platform::Facebook => "14:00 UTC",
        Platform::YoutubeShorts | Platform::Tiktok => "12:00 UTC",
    }
}

fn platform_emphasis(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "Strong visual hook in the first 3 seconds",
        Platform::YoutubeShorts => "Front-load the payoff and keep the title searchable",
        Platform::Tiktok => "Native fast-cut pacing with on-screen text",
        Platform::Facebook => "Lead with the context; longer captions perform here",
    }
}

/// Slate summary derived from the direction records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorBrief {
    pub ready_for_production: usize,
    pub pending_review: usize,
    pub rejected: usize,
    /// Records carrying at least one critical-fix note
    pub with_critical_notes: usize,
    pub by_pillar: HashMap<ContentPillar, usize>,
}

/// The content director: evaluates, routes, and records candidates.
pub struct ContentDirector<S> {
    store: Arc<S>,
    standards: QualityStandards,
    thresholds: ApprovalThresholds,
}

impl<S> ContentDirector<S>
where
    S: CandidateStore + DirectionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_settings(store, QualityStandards::default(), ApprovalThresholds::default())
    }

    pub fn with_settings(
        store: Arc<S>,
        standards: QualityStandards,
        thresholds: ApprovalThresholds,
    ) -> Self {
        Self {
            store,
            standards,
            thresholds,
        }
    }

    /// Evaluate one candidate and persist the resulting disposition.
    ///
    /// The stamped candidate and its direction record are both upserted,
    /// so re-reviewing a candidate overwrites the prior verdict instead
    /// of duplicating it.
    pub async fn review_content(
        &self,
        candidate: &ContentCandidate,
    ) -> EditorialResult<ApprovalDecision> {
        let validation = validate_content(candidate, &self.standards);
        let (status, approval) = self.route(&validation);
        let guidance = self.build_guidance(candidate, &validation, approval);

        let mut stamped = candidate.clone();
        stamped.status = status;
        stamped.approval = Some(approval);
        stamped.quality_score = Some(validation.score);
        self.store.upsert_candidate(stamped).await?;

        self.store
            .upsert_direction(DirectionRecord {
                candidate_id: candidate.id.clone(),
                status,
                approval,
                quality_score: validation.score,
                virality_score: candidate.virality_score,
                pillar: candidate.pillar(),
                notes: guidance.critical_fixes.clone(),
                validation: validation.clone(),
                updated_at: chrono::Utc::now(),
            })
            .await?;

        counter!("approval_decisions_total", "level" => approval.as_str()).increment(1);
        match approval {
            ApprovalLevel::Rejected => warn!(
                candidate_id = %candidate.id,
                score = validation.score,
                critiques = validation.critiques.len(),
                "candidate rejected"
            ),
            _ => info!(
                candidate_id = %candidate.id,
                score = validation.score,
                level = approval.as_str(),
                "candidate routed"
            ),
        }

        Ok(ApprovalDecision {
            status,
            approval,
            validation,
            guidance,
        })
    }

    /// Review a batch; each candidate gets an independent verdict.
    pub async fn review_batch(
        &self,
        candidates: &[ContentCandidate],
    ) -> EditorialResult<Vec<ApprovalDecision>> {
        let mut decisions = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            decisions.push(self.review_content(candidate).await?);
        }
        Ok(decisions)
    }

    /// Snapshot of the slate for standups: how much is ready, waiting on
    /// an editor, or blocked, broken down by pillar.
    pub async fn brief(&self) -> EditorialResult<DirectorBrief> {
        let mut brief = DirectorBrief::default();
        for record in self.store.list_directions().await? {
            match record.approval {
                ApprovalLevel::Automatic => brief.ready_for_production += 1,
                ApprovalLevel::EditorReview => brief.pending_review += 1,
                ApprovalLevel::Rejected => brief.rejected += 1,
            }
            if !record.notes.is_empty() {
                brief.with_critical_notes += 1;
            }
            *brief.by_pillar.entry(record.pillar).or_insert(0) += 1;
        }
        Ok(brief)
    }

    fn route(&self, validation: &ContentValidation) -> (ContentStatus, ApprovalLevel) {
        if validation.score >= self.thresholds.auto_approve {
            (ContentStatus::Approved, ApprovalLevel::Automatic)
        } else if validation.score >= self.thresholds.review_floor {
            (ContentStatus::QaPending, ApprovalLevel::EditorReview)
        } else {
            (ContentStatus::Rejected, ApprovalLevel::Rejected)
        }
    }

    fn build_guidance(
        &self,
        candidate: &ContentCandidate,
        validation: &ContentValidation,
        approval: ApprovalLevel,
    ) -> DirectorGuidance {
        let mut critical_fixes = validation.critiques.clone();
        let mut suggested_edits = validation.warnings.clone();
        suggested_edits.extend(validation.recommendations.iter().cloned());

        // Signal-level guidance beyond the validation text: a weak hook is
        // blocking below 6, worth an edit below 8.
        if validation.signals.hook_strength < 6.0 {
            critical_fixes.push("Rework the hook before production".to_string());
        } else if validation.signals.hook_strength < 8.0 {
            suggested_edits.push("Hook is serviceable but could land harder".to_string());
        }
        if validation.signals.sensationalism_score > 4.0 {
            critical_fixes.push("Tone down sensational language".to_string());
        }

        let pillar = candidate.pillar();
        let platform_strategy = STRATEGY_PLATFORMS
            .iter()
            .map(|&platform| {
                let mut hashtags = candidate.platform_hashtags(platform, hashtag_cap(platform));
                if hashtags.is_empty() {
                    hashtags = candidate
                        .hashtags
                        .iter()
                        .take(hashtag_cap(platform).saturating_sub(1))
                        .map(|t| format!("#{}", t))
                        .collect();
                    hashtags.push(pillar.hashtag());
                }
                PlatformStrategy {
                    platform,
                    emphasis: platform_emphasis(platform).to_string(),
                    hashtags,
                    posting_time: default_posting_time(platform).to_string(),
                }
            })
            .collect();

        let next_steps = match approval {
            ApprovalLevel::Automatic => vec![
                "Produce the video asset".to_string(),
                "Queue across video platforms".to_string(),
            ],
            ApprovalLevel::EditorReview => vec![
                "Address critical fixes".to_string(),
                "Resubmit for editorial review".to_string(),
            ],
            ApprovalLevel::Rejected => vec![
                "Revise per critiques, or archive the candidate".to_string(),
            ],
        };

        DirectorGuidance {
            critical_fixes,
            suggested_edits,
            pillar_recommendation: pillar,
            platform_strategy,
            next_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldesk_models::{Attribution, CandidateMetadata, ContentPillar};
    use reeldesk_store::MemoryStore;

    fn director() -> ContentDirector<MemoryStore> {
        ContentDirector::new(Arc::new(MemoryStore::new()))
    }

    fn strong_candidate() -> ContentCandidate {
        ContentCandidate::from_analysis(
            "Nobody's talking about the 1968 riot",
            "Archival research connects the 1968 unrest to housing policy choices that \
             followed, tracing how funding decisions and redlining maps shaped who could \
             build wealth in the decades after.",
            "This footage shows how the decisions made in 1968 still shape the city today. \
             The housing lines drawn back then produced the neighborhoods that exist now. \
             The pattern matters because it explains who holds the land and who never got \
             a fair chance at it.",
            vec!["history".to_string(), "housing".to_string()],
            CandidateMetadata {
                content_pillar: Some(ContentPillar::PolicyImpact),
                attribution: Attribution {
                    source: Some("archive.org".to_string()),
                    source_url: Some("https://archive.org/details/riot-1968".to_string()),
                    creator: Some("Internet Archive".to_string()),
                    license: Some("public domain".to_string()),
                },
                ..Default::default()
            },
        )
    }

    fn junk_candidate() -> ContentCandidate {
        ContentCandidate::from_analysis(
            "wow",
            "",
            "SHOCKING!!!! EXPLOSIVE footage DESTROYED everything you knew!!!",
            vec![],
            CandidateMetadata::default(),
        )
    }

    #[tokio::test]
    async fn score_above_fifty_auto_approves() {
        let director = director();
        let decision = director.review_content(&strong_candidate()).await.unwrap();
        assert_eq!(decision.approval, ApprovalLevel::Automatic);
        assert_eq!(decision.status, ContentStatus::Approved);
        assert_eq!(decision.validation.score, 71.0);
        assert!(decision.validation.is_valid);
    }

    #[tokio::test]
    async fn score_below_floor_rejects() {
        let director = director();
        let decision = director.review_content(&junk_candidate()).await.unwrap();
        assert_eq!(decision.approval, ApprovalLevel::Rejected);
        assert_eq!(decision.status, ContentStatus::Rejected);
    }

    #[tokio::test]
    async fn midband_scores_route_to_editor_review() {
        // Thresholds widened so the strong candidate (71) lands in the band.
        let director = ContentDirector::with_settings(
            Arc::new(MemoryStore::new()),
            QualityStandards::default(),
            ApprovalThresholds {
                auto_approve: 90.0,
                review_floor: 35.0,
            },
        );
        let decision = director.review_content(&strong_candidate()).await.unwrap();
        assert_eq!(decision.approval, ApprovalLevel::EditorReview);
        assert_eq!(decision.status, ContentStatus::QaPending);
    }

    #[tokio::test]
    async fn review_persists_candidate_and_direction() {
        let store = Arc::new(MemoryStore::new());
        let director = ContentDirector::new(store.clone());
        let candidate = strong_candidate();

        director.review_content(&candidate).await.unwrap();

        let stamped = store.get_candidate(&candidate.id).await.unwrap().unwrap();
        assert_eq!(stamped.status, ContentStatus::Approved);
        assert_eq!(stamped.approval, Some(ApprovalLevel::Automatic));
        assert_eq!(stamped.quality_score, Some(71.0));

        let record = store.get_direction(&candidate.id).await.unwrap().unwrap();
        assert_eq!(record.approval, ApprovalLevel::Automatic);
        assert_eq!(record.pillar, ContentPillar::PolicyImpact);
        assert_eq!(record.quality_score, 71.0);
    }

    #[tokio::test]
    async fn re_review_overwrites_prior_verdict() {
        let store = Arc::new(MemoryStore::new());
        let director = ContentDirector::new(store.clone());
        let candidate = strong_candidate();

        director.review_content(&candidate).await.unwrap();
        director.review_content(&candidate).await.unwrap();

        assert_eq!(store.list_directions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn brief_breaks_the_slate_down_by_level_and_pillar() {
        let director = director();
        director.review_content(&strong_candidate()).await.unwrap();
        director.review_content(&junk_candidate()).await.unwrap();

        let brief = director.brief().await.unwrap();
        assert_eq!(brief.ready_for_production, 1);
        assert_eq!(brief.rejected, 1);
        assert_eq!(brief.pending_review, 0);
        assert_eq!(brief.with_critical_notes, 1);
        assert_eq!(brief.by_pillar.get(&ContentPillar::PolicyImpact), Some(&1));
    }

    #[tokio::test]
    async fn guidance_covers_strategy_platforms_with_pillar_fallback_hashtags() {
        let director = director();
        let decision = director.review_content(&strong_candidate()).await.unwrap();
        let strategies = &decision.guidance.platform_strategy;

        assert_eq!(strategies.len(), STRATEGY_PLATFORMS.len());
        for strategy in strategies {
            // No analyzer-supplied platform hashtags, so the fallback set
            // ends with the pillar tag.
            assert_eq!(strategy.hashtags.last().map(String::as_str), Some("#policyimpact"));
            assert!(!strategy.emphasis.is_empty());
        }
        assert_eq!(decision.guidance.pillar_recommendation, ContentPillar::PolicyImpact);
    }
}
