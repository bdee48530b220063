//! Editorial content pillars.
//!
//! Pillars are the category labels used for content-mix tracking and
//! pillar-specific hashtag/emphasis selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An editorial category label attached to a candidate by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentPillar {
    HistoricalContext,
    PolicyImpact,
    SocialMovements,
    EconomyFinance,
    ScienceInnovation,
    EnvironmentClimate,
    JusticeRights,
    CultureIdentity,
}

/// Static editorial guidance for a pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PillarGuidance {
    pub description: &'static str,
    pub focus_areas: &'static [&'static str],
    pub goal_story_type: &'static str,
}

impl ContentPillar {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentPillar::HistoricalContext => "historical_context",
            ContentPillar::PolicyImpact => "policy_impact",
            ContentPillar::SocialMovements => "social_movements",
            ContentPillar::EconomyFinance => "economy_finance",
            ContentPillar::ScienceInnovation => "science_innovation",
            ContentPillar::EnvironmentClimate => "environment_climate",
            ContentPillar::JusticeRights => "justice_rights",
            ContentPillar::CultureIdentity => "culture_identity",
        }
    }

    /// Parse from the wire representation.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "historical_context" => Some(ContentPillar::HistoricalContext),
            "policy_impact" => Some(ContentPillar::PolicyImpact),
            "social_movements" => Some(ContentPillar::SocialMovements),
            "economy_finance" => Some(ContentPillar::EconomyFinance),
            "science_innovation" => Some(ContentPillar::ScienceInnovation),
            "environment_climate" => Some(ContentPillar::EnvironmentClimate),
            "justice_rights" => Some(ContentPillar::JusticeRights),
            "culture_identity" => Some(ContentPillar::CultureIdentity),
            _ => None,
        }
    }

    /// All pillars, in content-mix priority order.
    pub fn all() -> &'static [ContentPillar] {
        &[
            ContentPillar::HistoricalContext,
            ContentPillar::PolicyImpact,
            ContentPillar::SocialMovements,
            ContentPillar::EconomyFinance,
            ContentPillar::ScienceInnovation,
            ContentPillar::EnvironmentClimate,
            ContentPillar::JusticeRights,
            ContentPillar::CultureIdentity,
        ]
    }

    /// Pillar-derived hashtag, e.g. `#policyimpact`.
    pub fn hashtag(&self) -> String {
        format!("#{}", self.as_str().replace('_', ""))
    }

    /// Editorial guidance for the pillar.
    pub fn guidance(&self) -> PillarGuidance {
        match self {
            ContentPillar::HistoricalContext => PillarGuidance {
                description: "Archival footage and historical documents showing how past events shaped present",
                focus_areas: &["primary sources", "newsreels", "declassified materials", "eyewitness accounts"],
                goal_story_type: "Show cause-and-effect between historical events and current reality",
            },
            ContentPillar::PolicyImpact => PillarGuidance {
                description: "Real-world effects of policy decisions on communities",
                focus_areas: &["legislative impact", "regulatory changes", "government programs", "budget allocations"],
                goal_story_type: "Illustrate how policy affects daily life with concrete examples",
            },
            ContentPillar::SocialMovements => PillarGuidance {
                description: "Organized efforts for social change and their outcomes",
                focus_areas: &["protests", "civil rights", "activism", "grassroots campaigns"],
                goal_story_type: "Capture momentum, strategy, and impact of movements",
            },
            ContentPillar::EconomyFinance => PillarGuidance {
                description: "Economic trends, market forces, and financial systems affecting people",
                focus_areas: &["inequality", "labor", "wealth gaps", "economic transitions"],
                goal_story_type: "Make complex economics understandable with human impact",
            },
            ContentPillar::ScienceInnovation => PillarGuidance {
                description: "Breakthroughs and discoveries changing how we live",
                focus_areas: &["medical advances", "technology", "research", "public health"],
                goal_story_type: "Explain \"why it matters\" for ordinary people",
            },
            ContentPillar::EnvironmentClimate => PillarGuidance {
                description: "Environmental changes and humanity's response",
                focus_areas: &["climate impacts", "conservation", "pollution", "sustainability"],
                goal_story_type: "Show both problems and solutions with local-to-global scale",
            },
            ContentPillar::JusticeRights => PillarGuidance {
                description: "Justice systems, legal battles, and human rights issues",
                focus_areas: &["court proceedings", "human rights", "legal change", "accountability"],
                goal_story_type: "Illuminate struggles and victories in pursuit of justice",
            },
            ContentPillar::CultureIdentity => PillarGuidance {
                description: "Cultural phenomena, identity, and community narratives",
                focus_areas: &["traditions", "art", "language", "community", "identity expression"],
                goal_story_type: "Celebrate and explain diverse perspectives and traditions",
            },
        }
    }
}

impl fmt::Display for ContentPillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for p in ContentPillar::all() {
            assert_eq!(ContentPillar::from_str_opt(p.as_str()), Some(*p));
        }
    }

    #[test]
    fn hashtag_strips_underscores() {
        assert_eq!(ContentPillar::PolicyImpact.hashtag(), "#policyimpact");
    }
}
