// crates/company-directory-core/src/core/candidate.rs
// ============================================================================
// Module: Tag Candidates
// Description: Caller-supplied multilingual tag names awaiting reconciliation.
// Purpose: Describe which names take part in tag find-or-create per operation.
// Dependencies: crate::core::{language, records}, serde
// ============================================================================

//! ## Overview
//! A [`TagCandidate`] carries the names a caller proposes for a tag. Which of
//! those names are matched against existing tags, and which are persisted on
//! a new tag, depends on the [`ReconcileProfile`] of the calling operation:
//! company creation works over `ko`/`en`/`tw`, tag appends over
//! `ko`/`en`/`ja`.
//!
//! A supplied name takes part as given, including the empty string. An absent
//! name takes no part at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::language::LanguageCode;
use crate::core::records::NameTranslation;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Proposed tag names keyed by language.
///
/// `jp` is accepted as an input alias of `ja`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCandidate {
    /// Korean name.
    #[serde(default)]
    pub ko: Option<String>,
    /// English name.
    #[serde(default)]
    pub en: Option<String>,
    /// Japanese name.
    #[serde(default, alias = "jp")]
    pub ja: Option<String>,
    /// Traditional Chinese name.
    #[serde(default)]
    pub tw: Option<String>,
}

impl TagCandidate {
    /// Returns the proposed name for `language` when supplied.
    #[must_use]
    pub fn name_for(&self, language: LanguageCode) -> Option<&str> {
        let slot = match language {
            LanguageCode::Ko => &self.ko,
            LanguageCode::En => &self.en,
            LanguageCode::Ja => &self.ja,
            LanguageCode::Tw => &self.tw,
        };
        slot.as_deref()
    }

    /// Returns the supplied names for `profile`, in profile order.
    #[must_use]
    pub fn supplied_names(&self, profile: ReconcileProfile) -> Vec<NameTranslation> {
        profile
            .languages()
            .into_iter()
            .filter_map(|language| {
                self.name_for(language).map(|name| NameTranslation::new(language, name))
            })
            .collect()
    }
}

/// Language set a reconcile call matches on and persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileProfile {
    /// Company creation: `ko`, `en`, `tw`.
    Create,
    /// Tag append: `ko`, `en`, `ja`.
    Append,
}

impl ReconcileProfile {
    /// Returns the languages of this profile.
    #[must_use]
    pub const fn languages(self) -> [LanguageCode; 3] {
        match self {
            Self::Create => [LanguageCode::Ko, LanguageCode::En, LanguageCode::Tw],
            Self::Append => [LanguageCode::Ko, LanguageCode::En, LanguageCode::Ja],
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
