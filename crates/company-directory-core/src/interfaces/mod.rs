// crates/company-directory-core/src/interfaces/mod.rs
// ============================================================================
// Module: Directory Store Interfaces
// Description: Backend-agnostic persistence contracts for the directory.
// Purpose: Let directory logic run against any store through explicit sessions.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! A [`DirectoryStore`] hands out one [`DirectorySession`] per unit of work.
//! Sessions expose repository-style queries returning plain records and are
//! the only way directory operations touch persisted state.
//!
//! ## Invariants
//! - Writes made through a session are visible to that session immediately.
//! - Writes become visible to other sessions only after [`DirectorySession::commit`].
//! - Dropping a session without committing discards its writes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CompanyId;
use crate::core::CompanyRecord;
use crate::core::LanguageCode;
use crate::core::NameTranslation;
use crate::core::TagId;
use crate::core::TagRecord;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Directory store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("directory store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("directory store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("directory store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data or input is invalid.
    #[error("directory store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("directory store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Persistent directory backend.
pub trait DirectoryStore: Send + Sync {
    /// Opens a new session.
    ///
    /// Sessions are exclusive: a second `begin` blocks until the first
    /// session finishes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session cannot be opened.
    fn begin(&self) -> Result<Box<dyn DirectorySession + '_>, StoreError>;

    /// Checks whether the store can serve requests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Unit of work against a [`DirectoryStore`].
pub trait DirectorySession {
    /// Returns companies with any name containing `fragment` (case-sensitive),
    /// one per company, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_companies_by_fragment(&self, fragment: &str) -> Result<Vec<CompanyRecord>, StoreError>;

    /// Returns the first company (by id) with any name equal to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_company_by_name(&self, name: &str) -> Result<Option<CompanyRecord>, StoreError>;

    /// Returns the first tag (by id) with any name equal to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_tag_by_name(&self, name: &str) -> Result<Option<TagRecord>, StoreError>;

    /// Returns the first tag (by id) holding any of `criteria` as a
    /// translation in the same language.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_tag_matching(&self, criteria: &[NameTranslation]) -> Result<Option<TagRecord>, StoreError>;

    /// Returns the first tag (by id) with no translation in any of
    /// `languages`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_tag_without_names(
        &self,
        languages: &[LanguageCode],
    ) -> Result<Option<TagRecord>, StoreError>;

    /// Returns companies associated with `tag`, one entry per association,
    /// in association order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn companies_for_tag(&self, tag: TagId) -> Result<Vec<CompanyRecord>, StoreError>;

    /// Returns tags associated with `company`, one entry per association,
    /// in association order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn tags_for_company(&self, company: CompanyId) -> Result<Vec<TagRecord>, StoreError>;

    /// Creates a company with the given translations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert_company(&mut self, names: &[NameTranslation]) -> Result<CompanyRecord, StoreError>;

    /// Creates a tag with the given translations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn insert_tag(&mut self, names: &[NameTranslation]) -> Result<TagRecord, StoreError>;

    /// Appends an association between `company` and `tag`.
    ///
    /// Repeated attaches add repeated associations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn attach(&mut self, company: CompanyId, tag: TagId) -> Result<(), StoreError>;

    /// Removes the earliest association between `company` and `tag`.
    ///
    /// Returns `false` when no association exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn detach_one(&mut self, company: CompanyId, tag: TagId) -> Result<bool, StoreError>;

    /// Publishes the session's writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the commit fails; writes are discarded.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
