// crates/company-directory-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Directory Store
// Description: Mutex-guarded directory tables for tests and local serving.
// Purpose: Provide a deterministic store without external dependencies.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryDirectoryStore`] keeps all tables behind one mutex. A session
//! holds the lock for its whole lifetime and works on a private copy of the
//! tables; commit swaps the copy in, and dropping the session discards it.
//! Contents are lost when the process exits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::CompanyId;
use crate::core::CompanyRecord;
use crate::core::LanguageCode;
use crate::core::NameTranslation;
use crate::core::TagId;
use crate::core::TagRecord;
use crate::core::Translated;
use crate::interfaces::DirectorySession;
use crate::interfaces::DirectoryStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Directory tables in creation order.
#[derive(Debug, Default, Clone)]
struct DirectoryTables {
    /// Companies ordered by id.
    companies: Vec<CompanyRecord>,
    /// Tags ordered by id.
    tags: Vec<TagRecord>,
    /// Company/tag associations in association order.
    links: Vec<(CompanyId, TagId)>,
}

impl DirectoryTables {
    /// Returns the company with `id`.
    fn company(&self, id: CompanyId) -> Option<&CompanyRecord> {
        self.companies.iter().find(|company| company.id == id)
    }

    /// Returns the tag with `id`.
    fn tag(&self, id: TagId) -> Option<&TagRecord> {
        self.tags.iter().find(|tag| tag.id == id)
    }
}

/// Returns the 1-based identifier following `len` existing rows.
fn next_raw_id(len: usize) -> Result<u64, StoreError> {
    u64::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(1))
        .ok_or_else(|| StoreError::Invalid("in-memory identifier space exhausted".to_string()))
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory directory store for tests and local serving.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectoryStore {
    /// Committed tables protected by a mutex.
    tables: Arc<Mutex<DirectoryTables>>,
}

impl InMemoryDirectoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectoryStore for InMemoryDirectoryStore {
    fn begin(&self) -> Result<Box<dyn DirectorySession + '_>, StoreError> {
        let guard = self
            .tables
            .lock()
            .map_err(|_| StoreError::Store("directory store mutex poisoned".to_string()))?;
        let working = guard.clone();
        Ok(Box::new(InMemorySession { guard, working }))
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.tables
            .lock()
            .map(|_| ())
            .map_err(|_| StoreError::Store("directory store mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Session over a private copy of the committed tables.
struct InMemorySession<'a> {
    /// Lock on the committed tables, held until commit or drop.
    guard: MutexGuard<'a, DirectoryTables>,
    /// Working copy receiving this session's writes.
    working: DirectoryTables,
}

impl DirectorySession for InMemorySession<'_> {
    fn find_companies_by_fragment(&self, fragment: &str) -> Result<Vec<CompanyRecord>, StoreError> {
        Ok(self
            .working
            .companies
            .iter()
            .filter(|company| company.names.iter().any(|name| name.name.contains(fragment)))
            .cloned()
            .collect())
    }

    fn find_company_by_name(&self, name: &str) -> Result<Option<CompanyRecord>, StoreError> {
        Ok(self.working.companies.iter().find(|company| company.has_name(name)).cloned())
    }

    fn find_tag_by_name(&self, name: &str) -> Result<Option<TagRecord>, StoreError> {
        Ok(self.working.tags.iter().find(|tag| tag.has_name(name)).cloned())
    }

    fn find_tag_matching(&self, criteria: &[NameTranslation]) -> Result<Option<TagRecord>, StoreError> {
        Ok(self
            .working
            .tags
            .iter()
            .find(|tag| {
                criteria
                    .iter()
                    .any(|criterion| tag.name_in(criterion.language) == Some(criterion.name.as_str()))
            })
            .cloned())
    }

    fn find_tag_without_names(
        &self,
        languages: &[LanguageCode],
    ) -> Result<Option<TagRecord>, StoreError> {
        Ok(self
            .working
            .tags
            .iter()
            .find(|tag| languages.iter().all(|language| tag.name_in(*language).is_none()))
            .cloned())
    }

    fn companies_for_tag(&self, tag: TagId) -> Result<Vec<CompanyRecord>, StoreError> {
        self.working
            .links
            .iter()
            .filter(|(_, linked)| *linked == tag)
            .map(|(company, _)| {
                self.working.company(*company).cloned().ok_or_else(|| {
                    StoreError::Corrupt(format!("association references missing company {company}"))
                })
            })
            .collect()
    }

    fn tags_for_company(&self, company: CompanyId) -> Result<Vec<TagRecord>, StoreError> {
        self.working
            .links
            .iter()
            .filter(|(linked, _)| *linked == company)
            .map(|(_, tag)| {
                self.working.tag(*tag).cloned().ok_or_else(|| {
                    StoreError::Corrupt(format!("association references missing tag {tag}"))
                })
            })
            .collect()
    }

    fn insert_company(&mut self, names: &[NameTranslation]) -> Result<CompanyRecord, StoreError> {
        let raw = next_raw_id(self.working.companies.len())?;
        let id = CompanyId::from_raw(raw)
            .ok_or_else(|| StoreError::Invalid("company id must be non-zero".to_string()))?;
        let record = CompanyRecord { id, names: names.to_vec() };
        self.working.companies.push(record.clone());
        Ok(record)
    }

    fn insert_tag(&mut self, names: &[NameTranslation]) -> Result<TagRecord, StoreError> {
        let raw = next_raw_id(self.working.tags.len())?;
        let id = TagId::from_raw(raw)
            .ok_or_else(|| StoreError::Invalid("tag id must be non-zero".to_string()))?;
        let record = TagRecord { id, names: names.to_vec() };
        self.working.tags.push(record.clone());
        Ok(record)
    }

    fn attach(&mut self, company: CompanyId, tag: TagId) -> Result<(), StoreError> {
        if self.working.company(company).is_none() {
            return Err(StoreError::Invalid(format!("unknown company {company}")));
        }
        if self.working.tag(tag).is_none() {
            return Err(StoreError::Invalid(format!("unknown tag {tag}")));
        }
        self.working.links.push((company, tag));
        Ok(())
    }

    fn detach_one(&mut self, company: CompanyId, tag: TagId) -> Result<bool, StoreError> {
        let position = self.working.links.iter().position(|link| *link == (company, tag));
        Ok(position.map(|index| self.working.links.remove(index)).is_some())
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
