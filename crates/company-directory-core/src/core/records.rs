// crates/company-directory-core/src/core/records.rs
// ============================================================================
// Module: Directory Records
// Description: Plain data rows returned by directory store sessions.
// Purpose: Decouple directory logic from any storage engine representation.
// Dependencies: crate::core::{identifiers, language}, serde
// ============================================================================

//! ## Overview
//! Stores hand back companies and tags as owned records carrying their
//! identity and every persisted name translation. Records are snapshots: they
//! do not track later writes in the same session.
//!
//! Both record types implement [`Translated`], which is the only surface the
//! name resolver needs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CompanyId;
use crate::core::identifiers::TagId;
use crate::core::language::LanguageCode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters stored for a single name translation.
pub const MAX_NAME_CHARS: usize = 100;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One persisted name in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTranslation {
    /// Language of the name.
    pub language: LanguageCode,
    /// Name text.
    pub name: String,
}

impl NameTranslation {
    /// Creates a name translation.
    #[must_use]
    pub fn new(language: LanguageCode, name: impl Into<String>) -> Self {
        Self { language, name: name.into() }
    }
}

/// Company row with its name translations.
///
/// # Invariants
/// - At most one translation per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company identity.
    pub id: CompanyId,
    /// Persisted name translations.
    pub names: Vec<NameTranslation>,
}

/// Tag row with its name translations.
///
/// # Invariants
/// - At most one translation per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Tag identity.
    pub id: TagId,
    /// Persisted name translations.
    pub names: Vec<NameTranslation>,
}

// ============================================================================
// SECTION: Translated Entities
// ============================================================================

/// Entity that owns a set of name translations.
pub trait Translated {
    /// Returns every persisted translation of the entity.
    fn translations(&self) -> &[NameTranslation];

    /// Returns the stored name for `language`, if any.
    fn name_in(&self, language: LanguageCode) -> Option<&str> {
        self.translations()
            .iter()
            .find(|translation| translation.language == language)
            .map(|translation| translation.name.as_str())
    }

    /// Returns true when any translation equals `name` exactly.
    fn has_name(&self, name: &str) -> bool {
        self.translations().iter().any(|translation| translation.name == name)
    }
}

impl Translated for CompanyRecord {
    fn translations(&self) -> &[NameTranslation] {
        &self.names
    }
}

impl Translated for TagRecord {
    fn translations(&self) -> &[NameTranslation] {
        &self.names
    }
}
