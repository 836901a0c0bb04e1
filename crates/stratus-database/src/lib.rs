//! # stratus-database
//!
//! Persistence layer for Stratus.
//!
//! The [`stores`] module defines the async store traits the engine is
//! written against. Two families of implementations live here:
//! PostgreSQL repositories under [`repositories`], and a dashmap-backed
//! [`memory`] store used for tests and embedded deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use stores::{FileStore, QuotaStore, VersionStore};
