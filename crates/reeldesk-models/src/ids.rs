//! Identifier newtypes used across the pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Create from an existing string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Unique identifier for a content candidate.
    CandidateId
}

string_id! {
    /// Unique identifier for an editorial review task.
    ReviewTaskId
}

string_id! {
    /// Unique identifier for a posting-queue entry.
    QueueEntryId
}

string_id! {
    /// Unique identifier for a produced (rendered) video asset.
    VideoAssetId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(CandidateId::new(), CandidateId::new());
    }

    #[test]
    fn id_round_trips_through_string() {
        let id = QueueEntryId::from_string("entry-42");
        assert_eq!(id.as_str(), "entry-42");
        assert_eq!(id.to_string(), "entry-42");
    }
}
