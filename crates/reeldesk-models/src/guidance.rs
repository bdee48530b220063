//! Production guidance derived by the content director.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ContentPillar, Platform};

/// Per-platform posting strategy.
///
/// The posting time here is advisory only; actual slots come from the
/// queue allocator, which tracks real spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformStrategy {
    pub platform: Platform,
    /// What to emphasize in the edit for this platform
    pub emphasis: String,
    /// Capped hashtag slice, leading '#' included
    pub hashtags: Vec<String>,
    /// Suggested time of day, e.g. "18:00 UTC"
    pub posting_time: String,
}

/// The guidance bundle attached to every approval decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectorGuidance {
    /// Must-fix items blocking production
    pub critical_fixes: Vec<String>,
    /// Non-blocking improvements
    pub suggested_edits: Vec<String>,
    /// Pillar the director recommends producing under
    pub pillar_recommendation: ContentPillar,
    /// One strategy per targeted platform
    pub platform_strategy: Vec<PlatformStrategy>,
    /// Ordered checklist for the production team
    pub next_steps: Vec<String>,
}
