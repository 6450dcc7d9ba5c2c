// crates/company-directory-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Directory Store
// Description: Durable DirectoryStore backend using SQLite.
// Purpose: Provide persistent storage for companies, tags, and translations.
// Dependencies: company-directory-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`DirectoryStore`] implementation.
//! Every session is one `SQLite` transaction, so a failed directory
//! operation leaves no partial writes behind.
//!
//! [`DirectoryStore`]: company_directory_core::DirectoryStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteDirectoryStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
