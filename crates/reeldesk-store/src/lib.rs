//! Record-store traits and implementations for the ReelDesk pipeline.
//!
//! The core programs against the traits in [`traits`]; [`memory`] provides
//! the process-local reference implementation, and [`cache`] an injectable
//! TTL cache for collaborator lookups.

pub mod cache;
pub mod error;
pub mod memory;
pub mod traits;

pub use cache::TtlCache;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{CandidateStore, DirectionStore, QueueStore, ReviewStore};
