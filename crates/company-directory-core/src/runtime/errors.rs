// crates/company-directory-core/src/runtime/errors.rs
// ============================================================================
// Module: Directory Errors
// Description: Failure taxonomy for company directory operations.
// Purpose: Separate caller mistakes from store failures for the boundary layer.
// Dependencies: crate::{core, i18n, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! Directory operations fail with a [`DirectoryError`]. Not-found and
//! business-rule variants are caller-recoverable; store failures are not.
//! Every variant renders a localized detail through
//! [`DirectoryError::localized_message`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::LanguageCode;
use crate::interfaces::StoreError;
use crate::t;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Business-rule violations detected before any write is published.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessRule {
    /// The tag exists but is not attached to the company.
    #[error("tag not associated with this company: {tag}")]
    TagNotAssociated {
        /// Requested tag name.
        tag: String,
    },
    /// A name exceeds the stored length limit.
    #[error("name exceeds {max_chars} characters: {name}")]
    NameTooLong {
        /// Offending name.
        name: String,
        /// Maximum allowed characters.
        max_chars: usize,
    },
    /// A required company name is missing.
    #[error("company name is required for language {language}")]
    MissingCompanyName {
        /// Language whose name is missing.
        language: LanguageCode,
    },
}

/// Company directory operation errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No company has the requested name.
    #[error("company not found: {name}")]
    CompanyNotFound {
        /// Requested company name.
        name: String,
    },
    /// No tag has the requested name.
    #[error("tag not found: {name}")]
    TagNotFound {
        /// Requested tag name.
        name: String,
    },
    /// A business rule rejected the request.
    #[error(transparent)]
    Business(#[from] BusinessRule),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DirectoryError {
    /// Returns a stable label for the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CompanyNotFound { .. } => "company_not_found",
            Self::TagNotFound { .. } => "tag_not_found",
            Self::Business(_) => "business_rule",
            Self::Store(_) => "store",
        }
    }

    /// Renders a user-facing message in `language`.
    ///
    /// Store failures render a generic message without internal details.
    #[must_use]
    pub fn localized_message(&self, language: LanguageCode) -> String {
        match self {
            Self::CompanyNotFound { name } => t!(language, "company.not_found", name = name),
            Self::TagNotFound { name } => t!(language, "tag.not_found", name = name),
            Self::Business(BusinessRule::TagNotAssociated { tag }) => {
                t!(language, "tag.not_associated", tag = tag)
            }
            Self::Business(BusinessRule::NameTooLong { name, max_chars }) => {
                t!(language, "name.too_long", name = name, max_chars = max_chars)
            }
            Self::Business(BusinessRule::MissingCompanyName { language: missing }) => {
                t!(language, "company.name_missing", language = missing)
            }
            Self::Store(_) => t!(language, "store.failure"),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
