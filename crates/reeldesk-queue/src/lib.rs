//! Posting-queue allocation and publish dispatch.
//!
//! [`QueueAllocator`] turns approved, produced candidates into spaced
//! queue entries; [`Dispatcher`] drains due entries through a
//! [`Publisher`] such as the [`HttpPublisher`].

pub mod allocator;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;

pub use allocator::{next_slot, BufferReport, QueueAllocator, QueueOutcome, QueuePlanItem};
pub use config::{QuietWindow, SchedulerConfig};
pub use dispatch::{Dispatcher, PublishOutcome, PublishRequest, PublishResult, Publisher};
pub use error::{QueueError, QueueResult};
pub use http::HttpPublisher;
