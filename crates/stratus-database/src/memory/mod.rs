//! In-memory store implementations.

pub mod store;

pub use store::MemoryStore;
