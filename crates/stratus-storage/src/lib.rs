//! # stratus-storage
//!
//! Blob store backends for Stratus. The [`BlobStore`] trait lives in
//! `stratus-core`; this crate provides the local-filesystem and
//! in-memory implementations.
//!
//! [`BlobStore`]: stratus_core::traits::BlobStore

pub mod providers;

pub use providers::local::LocalBlobStore;
pub use providers::memory::MemoryBlobStore;
