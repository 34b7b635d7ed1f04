//! Core types and shared functionality for pagelift.
//!
//! This crate provides:
//! - The versioned entry store over pluggable storage areas (in-memory
//!   and SQLite)
//! - The cache version guard
//! - Unified error types
//! - Layered configuration and compiled-in site wiring

pub mod config;
pub mod error;
pub mod site;
pub mod store;
pub mod version;

pub use config::AppConfig;
pub use error::Error;
pub use store::{CacheEntry, EntryStore, MemoryArea, SqliteArea, StorageArea};
pub use version::{VersionCheck, VersionGuard};
