//! Editorial core: quality evaluation, approval routing, and the human
//! review workflow.
//!
//! The pipeline's decision stage lives here. [`quality`] scores a
//! candidate against the house standards, [`ContentDirector`] turns the
//! score into a routing decision with production guidance, and
//! [`ReviewDesk`] drives the editor workflow for mid-band candidates.

pub mod director;
pub mod error;
pub mod guidelines;
pub mod quality;
pub mod review;

pub use director::{ContentDirector, DirectorBrief};
pub use error::{EditorialError, EditorialResult};
pub use guidelines::{ApprovalThresholds, QualityStandards};
pub use quality::{
    detect_sensationalism, evaluate_caption_quality, validate_batch, validate_brand_alignment,
    validate_content, BrandAlignment,
};
pub use review::{ApprovalStats, ReviewDesk};
