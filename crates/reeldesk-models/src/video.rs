//! Produced video assets returned by the renderer.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{CandidateId, VideoAssetId};

/// A rendered vertical video ready for queueing.
///
/// The core only needs the URLs the renderer returned; encoding details
/// stay with the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProducedVideo {
    pub id: VideoAssetId,
    /// Candidate this asset was produced from
    pub candidate_id: CandidateId,
    /// Final video URL
    pub video_url: String,
    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub produced_at: DateTime<Utc>,
}

impl ProducedVideo {
    pub fn new(
        candidate_id: CandidateId,
        video_url: impl Into<String>,
        thumbnail_url: Option<String>,
    ) -> Self {
        Self {
            id: VideoAssetId::new(),
            candidate_id,
            video_url: video_url.into(),
            thumbnail_url,
            produced_at: Utc::now(),
        }
    }
}
