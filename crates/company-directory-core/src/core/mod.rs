// crates/company-directory-core/src/core/mod.rs
// ============================================================================
// Module: Company Directory Core Types
// Description: Domain data types shared across the directory crates.
// Purpose: Provide a single import surface for languages, ids, and records.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types are pure data with no storage or transport concerns. Stores,
//! the HTTP layer, and the runtime operations all speak in these types.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod candidate;
pub mod identifiers;
pub mod language;
pub mod records;
pub mod views;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use candidate::ReconcileProfile;
pub use candidate::TagCandidate;
pub use identifiers::CompanyId;
pub use identifiers::TagId;
pub use language::FALLBACK_ORDER;
pub use language::LanguageCode;
pub use records::CompanyRecord;
pub use records::MAX_NAME_CHARS;
pub use records::NameTranslation;
pub use records::TagRecord;
pub use records::Translated;
pub use views::CompanySummary;
pub use views::CompanyView;
pub use views::NewCompany;
