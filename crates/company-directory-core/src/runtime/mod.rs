// crates/company-directory-core/src/runtime/mod.rs
// ============================================================================
// Module: Company Directory Runtime
// Description: Directory operations, name resolution, and tag reconciliation.
// Purpose: Execute directory operations against store sessions.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the directory operations. Transports call into
//! [`run_in_session`] with one of the [`directory`] operations so every
//! request shares the same commit and rollback rules.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod directory;
pub mod errors;
pub mod reconciler;
pub mod resolver;
pub mod session;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use directory::add_company;
pub use directory::append_tags;
pub use directory::delete_tag;
pub use directory::get_by_name;
pub use directory::search_by_name;
pub use directory::search_by_tag;
pub use errors::BusinessRule;
pub use errors::DirectoryError;
pub use reconciler::reconcile;
pub use resolver::resolve_name;
pub use resolver::resolve_name_with_fallback;
pub use session::run_in_session;
pub use store::InMemoryDirectoryStore;
