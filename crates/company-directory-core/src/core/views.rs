// crates/company-directory-core/src/core/views.rs
// ============================================================================
// Module: Directory Views
// Description: Inputs and outputs of company directory operations.
// Purpose: Define the resolved, language-specific shapes callers consume.
// Dependencies: crate::core::candidate, serde
// ============================================================================

//! ## Overview
//! Directory operations return names already resolved for the requested
//! language. Views therefore carry plain strings, never translation sets.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::candidate::TagCandidate;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Company name in a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySummary {
    /// Resolved company name.
    pub company_name: String,
}

/// Company name plus resolved tag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyView {
    /// Resolved company name.
    pub company_name: String,
    /// Resolved tag names.
    pub tags: Vec<String>,
}

/// Input for creating a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    /// Korean name.
    pub ko_name: String,
    /// English name.
    pub en_name: String,
    /// Traditional Chinese name.
    pub tw_name: String,
    /// Tags to reconcile and attach, in order.
    pub tags: Vec<TagCandidate>,
}
