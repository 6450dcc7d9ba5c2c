// crates/company-directory-core/src/lib.rs
// ============================================================================
// Module: Company Directory Core Library
// Description: Public API surface for the company directory core.
// Purpose: Expose domain types, store interfaces, and directory operations.
// Dependencies: crate::{core, i18n, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Company directory core keeps multilingual company and tag names and serves
//! them resolved into a requested language. It performs no I/O of its own:
//! persistence is reached through [`DirectoryStore`] sessions and transports
//! wrap each operation with [`run_in_session`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod i18n;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::DirectorySession;
pub use interfaces::DirectoryStore;
pub use interfaces::StoreError;
pub use runtime::BusinessRule;
pub use runtime::DirectoryError;
pub use runtime::InMemoryDirectoryStore;
pub use runtime::run_in_session;
