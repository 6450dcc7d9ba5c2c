// crates/company-directory-core/src/runtime/resolver.rs
// ============================================================================
// Module: Name Resolver
// Description: Picks the display name of a translated entity for a language.
// Purpose: Share one resolution rule between companies and tags.
// Dependencies: crate::core::{language, records}
// ============================================================================

//! ## Overview
//! Two resolution modes exist and callers choose deliberately:
//! - [`resolve_name`] returns the requested language only, or an empty string.
//! - [`resolve_name_with_fallback`] walks [`FALLBACK_ORDER`] when the
//!   requested language is missing or empty.
//!
//! Tag searches use the fallback; get, create, and tag updates do not.
//! Neither mode fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::language::FALLBACK_ORDER;
use crate::core::language::LanguageCode;
use crate::core::records::Translated;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Returns the name stored for `language`, or `""` when absent.
#[must_use]
pub fn resolve_name<T: Translated + ?Sized>(entity: &T, language: LanguageCode) -> &str {
    entity.name_in(language).unwrap_or("")
}

/// Returns the first non-empty name, trying `language` and then
/// [`FALLBACK_ORDER`]; `""` when every translation is empty.
#[must_use]
pub fn resolve_name_with_fallback<T: Translated + ?Sized>(
    entity: &T,
    language: LanguageCode,
) -> &str {
    std::iter::once(language)
        .chain(FALLBACK_ORDER)
        .filter_map(|candidate| entity.name_in(candidate))
        .find(|name| !name.is_empty())
        .unwrap_or("")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
