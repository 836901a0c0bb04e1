//! HTTP request handlers.

pub mod bulk;
pub mod file;
pub mod health;
pub mod share;
pub mod storage;
