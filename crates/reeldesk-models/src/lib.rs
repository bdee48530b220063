//! Shared data models for the ReelDesk editorial pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Content candidates produced by the upstream analyzer
//! - Validation results and approval decisions
//! - Editorial review tasks
//! - Posting-queue entries and produced video assets

pub mod candidate;
pub mod direction;
pub mod guidance;
pub mod ids;
pub mod pillar;
pub mod platform;
pub mod queue_entry;
pub mod review;
pub mod validation;
pub mod video;

// Re-export common types
pub use candidate::{ApprovalLevel, Attribution, CandidateMetadata, ContentCandidate, ContentStatus};
pub use direction::DirectionRecord;
pub use guidance::{DirectorGuidance, PlatformStrategy};
pub use ids::{CandidateId, QueueEntryId, ReviewTaskId, VideoAssetId};
pub use pillar::{ContentPillar, PillarGuidance};
pub use platform::Platform;
pub use queue_entry::{QueueEntry, QueueStatus};
pub use review::{IssueKind, ReviewIssue, ReviewPriority, ReviewStage, ReviewTask};
pub use validation::{ApprovalDecision, ContentValidation, ValidationSignals};
pub use video::ProducedVideo;
