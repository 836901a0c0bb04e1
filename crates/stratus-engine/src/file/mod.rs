//! File lifecycle, versioning, and bulk operations.

pub mod bulk;
pub mod lifecycle;
pub mod version_chain;

pub use bulk::{BulkAction, BulkCoordinator, BulkItemError, BulkOutcome, MAX_BULK_ITEMS};
pub use lifecycle::{LifecycleService, UploadParams};
pub use version_chain::VersionChain;
