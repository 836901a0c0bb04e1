//! # stratus-engine
//!
//! The file lifecycle and storage accounting engine.
//!
//! Four components cooperate here:
//!
//! - [`quota::QuotaLedger`] — the single owner of per-user
//!   `storage_used` counters, mutated only through relative deltas.
//! - [`file::VersionChain`] — maintains each file's ordered version set
//!   and the exactly-one-current invariant.
//! - [`file::LifecycleService`] — drives file state transitions
//!   (active → trashed → purged) and delegates quota and version
//!   changes to the two components above.
//! - [`file::BulkCoordinator`] — fans a bulk request out into per-item
//!   lifecycle calls with per-item failure reporting.
//!
//! The engine is stateless apart from what it reads and writes through
//! the store traits; the backing store's document-level atomic updates
//! are its only concurrency primitive.

pub mod file;
pub mod quota;
pub mod share;
