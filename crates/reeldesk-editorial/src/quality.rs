//! Content quality assurance.
//!
//! Pure scoring functions over a candidate's hook, caption, and
//! explanation. No I/O; every check degrades gracefully, so evaluation
//! never fails for a well-formed candidate. Absent optional inputs take
//! their weakest value (a missing platform score counts as 5/10).

use reeldesk_models::{ContentCandidate, ContentValidation, Platform, ValidationSignals};

use crate::guidelines::{
    CURIOSITY_WORDS, FORBIDDEN_PATTERNS, QualityStandards, SENSATIONAL_WORDS, TONE_INDICATORS,
};

/// Explanation shorter than this (in words) lacks real context.
const MIN_CONTEXT_WORDS: usize = 20;

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Score hook strength and caption clarity (each 0-10).
pub fn evaluate_caption_quality(caption: &str, hook: &str) -> (f64, f64) {
    let mut hook_strength: f64 = 5.0; // base score

    let hook_len = word_count(hook);
    if (5..=15).contains(&hook_len) {
        hook_strength += 2.0; // optimal length
    }
    let hook_lower = hook.to_lowercase();
    if hook.contains('?') || CURIOSITY_WORDS.iter().any(|w| hook_lower.contains(w)) {
        hook_strength += 1.0;
    }
    if !hook.chars().next().map_or(false, |c| c.is_uppercase()) {
        hook_strength -= 1.0; // should start with capital
    }

    let mut caption_clarity: f64 = 5.0; // base score

    let caption_len = word_count(caption);
    if (30..=200).contains(&caption_len) {
        caption_clarity += 2.0;
    }
    if caption.matches('.').count() >= 2 {
        caption_clarity += 1.0; // good sentence structure
    }
    if caption.chars().filter(|c| *c == '#' || *c == '@').count() <= 10 {
        caption_clarity += 1.0; // not hashtag-heavy
    }

    (hook_strength.clamp(0.0, 10.0), caption_clarity.clamp(0.0, 10.0))
}

/// Detect sensationalism indicators.
///
/// Returns 0-10 where 0 is properly measured and 10 is highly sensational.
pub fn detect_sensationalism(caption: &str, explanation: &str) -> f64 {
    let raw = format!("{} {}", caption, explanation);
    let text = raw.to_lowercase();
    let mut score = 0.0;

    let sensational_hits = SENSATIONAL_WORDS.iter().filter(|w| text.contains(*w)).count();
    score += sensational_hits as f64 * 2.0;

    // ALL CAPS abuse: more than 10% of the raw text in uppercase
    let total_chars = raw.chars().count();
    if total_chars > 0 {
        let caps = raw.chars().filter(|c| c.is_uppercase()).count();
        if caps as f64 / total_chars as f64 > 0.1 {
            score += 2.0;
        }
    }

    if raw.matches('!').count() > 3 {
        score += 1.0;
    }

    score.clamp(0.0, 10.0)
}

/// Result of the brand-voice alignment check.
#[derive(Debug, Clone)]
pub struct BrandAlignment {
    pub aligned: bool,
    pub issues: Vec<String>,
    /// Brand fit (0-10), neutral base 5
    pub brand_fit: f64,
}

/// Validate alignment with brand voice: no forbidden phrasings and at
/// least two tone categories represented.
pub fn validate_brand_alignment(caption: &str, explanation: &str) -> BrandAlignment {
    let full_text = format!("{} {}", caption, explanation).to_lowercase();
    let mut issues = Vec::new();
    let mut brand_fit: f64 = 5.0; // neutral base

    for pattern in FORBIDDEN_PATTERNS {
        if full_text.contains(pattern) {
            issues.push(format!("Avoids guideline: {}", pattern));
            brand_fit -= 1.5;
        }
    }

    let mut tone_matches = 0;
    for (_tone, indicators) in TONE_INDICATORS {
        if indicators.iter().any(|ind| full_text.contains(ind)) {
            tone_matches += 1;
            brand_fit += 0.5;
        }
    }

    BrandAlignment {
        aligned: issues.is_empty() && tone_matches >= 2,
        issues,
        brand_fit: brand_fit.clamp(0.0, 10.0),
    }
}

/// Comprehensive content validation: detailed assessment plus the
/// editorial pass/fail gate.
pub fn validate_content(candidate: &ContentCandidate, standards: &QualityStandards) -> ContentValidation {
    let mut critiques = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();
    let mut score = 50.0; // start at 50/100

    // 1. Caption quality
    let (hook_strength, clarity_score) = evaluate_caption_quality(&candidate.caption, &candidate.hook);

    if hook_strength < standards.min_hook_strength {
        critiques.push(format!(
            "Hook strength too low ({}/10). Needs more compelling language.",
            hook_strength
        ));
        score -= 10.0;
    } else {
        score += 5.0;
    }

    if clarity_score < standards.min_clarity {
        critiques.push(format!(
            "Caption clarity insufficient ({}/10). Needs clearer explanation.",
            clarity_score
        ));
        score -= 10.0;
    } else {
        score += 5.0;
    }

    // 2. Platform relevance
    let relevance_score = candidate.platform_score(Platform::Instagram);
    if relevance_score < standards.min_relevance {
        warnings.push(format!(
            "Low platform relevance score ({}/10). May have limited appeal.",
            relevance_score
        ));
        score -= 5.0;
    } else {
        score += 5.0;
    }

    // 3. Sensationalism
    let sensationalism_score = detect_sensationalism(&candidate.caption, &candidate.explanation);
    if sensationalism_score > standards.max_sensationalism {
        critiques.push(format!(
            "Sensationalism score too high ({}/10). Tone must be measured.",
            sensationalism_score
        ));
        score -= 10.0;
    } else {
        score += 5.0;
    }

    // 4. Brand alignment
    let alignment = validate_brand_alignment(&candidate.caption, &candidate.explanation);
    if !alignment.aligned {
        if alignment.issues.is_empty() {
            critiques.push("Brand voice misalignment: tone indicators missing".to_string());
        } else {
            critiques.push(format!("Brand voice misalignment: {}", alignment.issues.join(", ")));
        }
        score -= 10.0;
    } else {
        score += alignment.brand_fit;
    }

    // 5. Attribution
    let attribution = &candidate.metadata.attribution;
    if standards.require_attribution {
        if attribution.is_complete() {
            score += 5.0;
        } else {
            critiques.push(format!(
                "Missing source attribution: {}",
                attribution.missing_fields().join(", ")
            ));
            score -= 10.0;
        }
    }

    // 6. Context
    let context_present = word_count(&candidate.explanation) >= MIN_CONTEXT_WORDS;
    if standards.require_context && !context_present {
        warnings.push("Explanation may lack sufficient context. Consider expanding.".to_string());
        score -= 5.0;
    }

    // 7. Pillar categorization, when the analyzer detected one
    if let Some(pillar) = candidate.metadata.content_pillar {
        recommendations.push(format!("Categorized as: {}", pillar));
    }

    // Improvement suggestions for sub-par content
    if score < ContentValidation::VALID_SCORE {
        if hook_strength < 7.0 {
            recommendations
                .push("Strengthen hook: Use more compelling language or create curiosity gap".to_string());
        }
        if sensationalism_score > 3.0 {
            recommendations.push(
                "Reduce sensationalism: Use measured language while maintaining engagement".to_string(),
            );
        }
        if !alignment.aligned {
            recommendations.push("Align with brand voice: Review editorial guidelines for tone".to_string());
        }
    }

    ContentValidation::finalize(
        score,
        critiques,
        warnings,
        recommendations,
        ValidationSignals {
            hook_strength,
            clarity_score,
            relevance_score,
            sensationalism_score,
            attribution_complete: !standards.require_attribution || attribution.is_complete(),
            context_present: !standards.require_context || context_present,
        },
    )
}

/// Validate a batch of candidates.
pub fn validate_batch<'a>(
    candidates: impl IntoIterator<Item = &'a ContentCandidate>,
    standards: &QualityStandards,
) -> Vec<ContentValidation> {
    candidates
        .into_iter()
        .map(|c| validate_content(c, standards))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reeldesk_models::{Attribution, CandidateMetadata, ContentCandidate};

    fn complete_attribution() -> Attribution {
        Attribution {
            source: Some("archive.org".to_string()),
            source_url: Some("https://archive.org/details/riot-1968".to_string()),
            creator: Some("Internet Archive".to_string()),
            license: Some("public domain".to_string()),
        }
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
            vec!["history".to_string(), "housing".to_string(), "cities".to_string()],
            CandidateMetadata {
                attribution: complete_attribution(),
                ..Default::default()
            },
        )
    }

    fn weak_candidate() -> ContentCandidate {
        ContentCandidate::from_analysis(
            "wow",
            "",
            "SHOCKING!!!! EXPLOSIVE footage DESTROYED everything you knew!!!",
            vec![],
            CandidateMetadata::default(),
        )
    }

    #[test]
    fn hook_length_bonus_applies_in_optimal_range() {
        let (hook, _) = evaluate_caption_quality("", "Nobody's talking about the 1968 riot");
        assert_eq!(hook, 7.0); // base 5 + 2 for 6 words, capitalized, no curiosity words
    }

    #[test]
    fn uncapitalized_hook_is_penalized() {
        let (hook, _) = evaluate_caption_quality("", "wow");
        assert_eq!(hook, 4.0); // base 5, no bonuses, -1 for lowercase start
    }

    #[test]
    fn question_mark_counts_as_curiosity() {
        let (hook, _) = evaluate_caption_quality("", "What really happened in the 1968 riot?");
        assert_eq!(hook, 8.0);
    }

    #[test]
    fn sensationalism_is_zero_for_measured_copy() {
        let c = strong_candidate();
        assert_eq!(detect_sensationalism(&c.caption, &c.explanation), 0.0);
    }

    #[test]
    fn sensationalism_counts_words_caps_and_exclamations() {
        let c = weak_candidate();
        // 3 sensational words (x2) + heavy caps (+2) + >3 "!" (+1)
        assert_eq!(detect_sensationalism(&c.caption, &c.explanation), 9.0);
    }

    #[test]
    fn forbidden_pattern_breaks_alignment() {
        let alignment = validate_brand_alignment(
            "We never use clickbait that misleads, this explains and matters.",
            "",
        );
        assert!(!alignment.aligned);
        assert_eq!(alignment.issues.len(), 1);
        assert_eq!(alignment.brand_fit, 4.5); // 5 - 1.5 + 0.5 + 0.5
    }

    #[test]
    fn strong_candidate_scores_seventy_one() {
        let validation = validate_content(&strong_candidate(), &QualityStandards::default());

        assert_eq!(validation.signals.hook_strength, 7.0);
        assert_eq!(validation.signals.clarity_score, 9.0);
        assert_eq!(validation.signals.sensationalism_score, 0.0);
        assert!(validation.signals.attribution_complete);
        assert!(validation.signals.context_present);

        // 50 +5 hook +5 clarity -5 relevance(default 5) +5 sensationalism
        // +6 brand fit +5 attribution
        assert_eq!(validation.score, 71.0);
        assert!(validation.is_valid);
        assert!(validation.critiques.is_empty());
        assert_eq!(validation.warnings.len(), 1); // relevance shortfall only
    }

    #[test]
    fn weak_candidate_is_flagged_and_floored() {
        let validation = validate_content(&weak_candidate(), &QualityStandards::default());

        assert!(!validation.is_valid);
        assert_eq!(validation.score, 0.0); // raw score is negative, clamped
        assert!(validation
            .critiques
            .iter()
            .any(|c| c.contains("Missing source attribution")));
        assert!(validation
            .critiques
            .iter()
            .any(|c| c.contains("Sensationalism score too high")));
        assert!(!validation.signals.attribution_complete);
        assert!(!validation.signals.context_present);
        assert!(!validation.recommendations.is_empty());
    }

    #[test]
    fn score_always_in_range_and_valid_tracks_seventy() {
        for candidate in [strong_candidate(), weak_candidate()] {
            let v = validate_content(&candidate, &QualityStandards::default());
            assert!((0.0..=100.0).contains(&v.score));
            assert_eq!(v.is_valid, v.score >= 70.0);
        }
    }

    #[test]
    fn evaluation_never_panics_on_empty_candidate() {
        let empty = ContentCandidate::from_analysis("", "", "", vec![], CandidateMetadata::default());
        let v = validate_content(&empty, &QualityStandards::default());
        assert!((0.0..=100.0).contains(&v.score));
    }

    #[test]
    fn optional_checks_can_be_disabled() {
        let standards = QualityStandards {
            require_attribution: false,
            require_context: false,
            ..Default::default()
        };
        let v = validate_content(&weak_candidate(), &standards);
        // With the checks off, the signals report their pass state.
        assert!(v.signals.attribution_complete);
        assert!(v.signals.context_present);
        assert!(!v.critiques.iter().any(|c| c.contains("attribution")));
    }
}
