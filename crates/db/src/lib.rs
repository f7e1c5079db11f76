//! Storage layer: the document-store seam, its MongoDB and in-memory
//! implementations, the issue repository, and the stats aggregator.

pub mod memory;
pub mod mongo;
pub mod repo;
pub mod stats;
pub mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use repo::IssueRepository;
pub use stats::StatsSnapshot;
pub use store::{IssueStore, StoreError};
