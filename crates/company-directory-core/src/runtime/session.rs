// crates/company-directory-core/src/runtime/session.rs
// ============================================================================
// Module: Session Scoping
// Description: Runs one directory operation inside one store session.
// Purpose: Pair every unit of work with exactly one commit or rollback.
// Dependencies: crate::{interfaces, runtime::errors}
// ============================================================================

//! ## Overview
//! [`run_in_session`] is the transaction boundary used by transports: it
//! opens a session, runs the operation, and commits only when the operation
//! succeeded. Any error drops the session, which rolls it back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::interfaces::DirectorySession;
use crate::interfaces::DirectoryStore;
use crate::runtime::errors::DirectoryError;

// ============================================================================
// SECTION: Session Scoping
// ============================================================================

/// Runs `operation` in a fresh session of `store`.
///
/// # Errors
///
/// Returns the operation's error, or [`DirectoryError::Store`] when the
/// session cannot be opened or committed.
pub fn run_in_session<T, F>(store: &dyn DirectoryStore, operation: F) -> Result<T, DirectoryError>
where
    F: FnOnce(&mut dyn DirectorySession) -> Result<T, DirectoryError>,
{
    let mut session = store.begin()?;
    let scoped: &mut dyn DirectorySession = session.as_mut();
    let value = operation(scoped)?;
    session.commit()?;
    Ok(value)
}
