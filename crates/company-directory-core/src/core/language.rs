// crates/company-directory-core/src/core/language.rs
// ============================================================================
// Module: Language Codes
// Description: Closed enumeration of supported translation locales.
// Purpose: Give every translation and request a typed, validated locale.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Translations are keyed by a two-letter language code. The set is closed:
//! `ko`, `en`, `ja`, and `tw`. Parsing is strict so an unknown request
//! language surfaces as a validation error instead of silently resolving to
//! empty names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported translation language codes.
///
/// # Invariants
/// - Wire labels are exactly two lowercase ASCII letters.
/// - [`LanguageCode::En`] is the request default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    /// Korean.
    Ko,
    /// English.
    #[default]
    En,
    /// Japanese.
    Ja,
    /// Traditional Chinese (Taiwan).
    Tw,
}

/// Fixed fallback order used when a requested translation is missing or empty.
pub const FALLBACK_ORDER: [LanguageCode; 4] =
    [LanguageCode::Ko, LanguageCode::En, LanguageCode::Ja, LanguageCode::Tw];

impl LanguageCode {
    /// Returns the canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
            Self::Ja => "ja",
            Self::Tw => "tw",
        }
    }

    /// Parses a language label (trimmed, case-insensitive).
    ///
    /// Only the four canonical labels are accepted.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ko" => Some(Self::Ko),
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            "tw" => Some(Self::Tw),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
