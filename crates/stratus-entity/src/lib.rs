//! # stratus-entity
//!
//! Domain entity models for Stratus: files, file versions, and per-user
//! quota accounts.

pub mod file;
pub mod user;
