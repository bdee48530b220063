//! Target publishing platforms.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A social platform a queue entry can be scheduled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    YoutubeShorts,
    Tiktok,
    /// Article/carousel variants share one Facebook channel.
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::YoutubeShorts => "youtube_shorts",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
        }
    }

    /// Parse from the wire representation.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "instagram" => Some(Platform::Instagram),
            "youtube_shorts" => Some(Platform::YoutubeShorts),
            "tiktok" => Some(Platform::Tiktok),
            "facebook" => Some(Platform::Facebook),
            _ => None,
        }
    }

    /// All platforms, in posting-priority order.
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Instagram,
            Platform::YoutubeShorts,
            Platform::Tiktok,
            Platform::Facebook,
        ]
    }

    /// The short-form video channels targeted by default batch queueing.
    pub fn video_channels() -> &'static [Platform] {
        &[Platform::Instagram, Platform::YoutubeShorts, Platform::Tiktok]
    }

    /// Default minimum spacing between two posts on this platform.
    pub fn default_min_interval(&self) -> Duration {
        Duration::from_secs(6 * 3600)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
