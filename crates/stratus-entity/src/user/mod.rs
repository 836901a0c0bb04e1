//! User-facing entities (quota view).

pub mod quota;

pub use quota::{QuotaAccount, QuotaAdjustment, QuotaSnapshot};
