//! Traits defining the seams between Stratus crates.

pub mod blob;

pub use blob::BlobStore;
