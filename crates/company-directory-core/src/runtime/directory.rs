// crates/company-directory-core/src/runtime/directory.rs
// ============================================================================
// Module: Company Directory
// Description: Search, lookup, creation, and tag maintenance for companies.
// Purpose: Implement directory operations over an explicit store session.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Each operation takes the session of the current unit of work and the
//! requested language, and returns names already resolved for that language.
//!
//! Resolution and ordering differ per operation and are part of the
//! observable contract:
//!
//! | Operation | Company name | Tag names | Order |
//! |---|---|---|---|
//! | [`search_by_name`] | exact | n/a | insertion |
//! | [`search_by_tag`] | fallback | n/a | company id |
//! | [`get_by_name`] | exact | exact | association |
//! | [`add_company`], [`append_tags`], [`delete_tag`] | exact | exact | sorted |

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CompanyRecord;
use crate::core::CompanySummary;
use crate::core::CompanyView;
use crate::core::LanguageCode;
use crate::core::NameTranslation;
use crate::core::NewCompany;
use crate::core::ReconcileProfile;
use crate::core::TagCandidate;
use crate::interfaces::DirectorySession;
use crate::runtime::errors::BusinessRule;
use crate::runtime::errors::DirectoryError;
use crate::runtime::reconciler::ensure_name_fits;
use crate::runtime::reconciler::reconcile;
use crate::runtime::resolver::resolve_name;
use crate::runtime::resolver::resolve_name_with_fallback;

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Finds companies with any name containing `query` (case-sensitive).
///
/// # Errors
///
/// Returns [`DirectoryError::Store`] when the session fails.
pub fn search_by_name(
    session: &dyn DirectorySession,
    query: &str,
    language: LanguageCode,
) -> Result<Vec<CompanySummary>, DirectoryError> {
    let companies = session.find_companies_by_fragment(query)?;
    Ok(companies
        .iter()
        .map(|company| CompanySummary { company_name: resolve_name(company, language).to_string() })
        .collect())
}

/// Lists companies tagged with the tag named exactly `tag_name` in any language.
///
/// # Errors
///
/// Returns [`DirectoryError::TagNotFound`] when no tag has that name.
pub fn search_by_tag(
    session: &dyn DirectorySession,
    tag_name: &str,
    language: LanguageCode,
) -> Result<Vec<CompanySummary>, DirectoryError> {
    let tag = session
        .find_tag_by_name(tag_name)?
        .ok_or_else(|| DirectoryError::TagNotFound { name: tag_name.to_string() })?;
    let mut companies = session.companies_for_tag(tag.id)?;
    companies.sort_by_key(|company| company.id);
    companies.dedup_by_key(|company| company.id);
    Ok(companies
        .iter()
        .map(|company| CompanySummary {
            company_name: resolve_name_with_fallback(company, language).to_string(),
        })
        .collect())
}

/// Returns the company named exactly `company_name` with its tags in
/// association order.
///
/// # Errors
///
/// Returns [`DirectoryError::CompanyNotFound`] when no company has that name.
pub fn get_by_name(
    session: &dyn DirectorySession,
    company_name: &str,
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let company = require_company(session, company_name)?;
    company_view(session, &company, language)
}

// ============================================================================
// SECTION: Mutations
// ============================================================================

/// Creates a company named in `ko`, `en`, and `tw` and attaches its tags.
///
/// # Errors
///
/// Returns [`DirectoryError::Business`] for oversized names or empty tag
/// candidates, and [`DirectoryError::Store`] when the session fails.
pub fn add_company(
    session: &mut dyn DirectorySession,
    company: &NewCompany,
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let names = [
        NameTranslation::new(LanguageCode::Ko, company.ko_name.as_str()),
        NameTranslation::new(LanguageCode::En, company.en_name.as_str()),
        NameTranslation::new(LanguageCode::Tw, company.tw_name.as_str()),
    ];
    for translation in &names {
        ensure_name_fits(&translation.name)?;
    }
    let record = session.insert_company(&names)?;
    attach_candidates(session, &record, &company.tags, ReconcileProfile::Create)?;
    sorted_company_view(session, &record, language)
}

/// Attaches tags to the company named exactly `company_name`.
///
/// Tags already attached are attached again.
///
/// # Errors
///
/// Returns [`DirectoryError::CompanyNotFound`] when no company has that name.
pub fn append_tags(
    session: &mut dyn DirectorySession,
    company_name: &str,
    tags: &[TagCandidate],
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let company = require_company(session, company_name)?;
    attach_candidates(session, &company, tags, ReconcileProfile::Append)?;
    sorted_company_view(session, &company, language)
}

/// Detaches one association of the tag named `tag_name` from the company
/// named `company_name`. The tag itself is kept.
///
/// # Errors
///
/// Returns [`DirectoryError::CompanyNotFound`], [`DirectoryError::TagNotFound`],
/// or [`BusinessRule::TagNotAssociated`] when the tag is not attached.
pub fn delete_tag(
    session: &mut dyn DirectorySession,
    company_name: &str,
    tag_name: &str,
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let company = require_company(session, company_name)?;
    let tag = session
        .find_tag_by_name(tag_name)?
        .ok_or_else(|| DirectoryError::TagNotFound { name: tag_name.to_string() })?;
    if !session.detach_one(company.id, tag.id)? {
        return Err(BusinessRule::TagNotAssociated { tag: tag_name.to_string() }.into());
    }
    sorted_company_view(session, &company, language)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Looks up a company by exact name or fails with `CompanyNotFound`.
fn require_company(
    session: &dyn DirectorySession,
    company_name: &str,
) -> Result<CompanyRecord, DirectoryError> {
    session
        .find_company_by_name(company_name)?
        .ok_or_else(|| DirectoryError::CompanyNotFound { name: company_name.to_string() })
}

/// Reconciles each candidate and attaches the resulting tag in order.
fn attach_candidates(
    session: &mut dyn DirectorySession,
    company: &CompanyRecord,
    candidates: &[TagCandidate],
    profile: ReconcileProfile,
) -> Result<(), DirectoryError> {
    for candidate in candidates {
        let tag = reconcile(session, candidate, profile)?;
        session.attach(company.id, tag.id)?;
    }
    Ok(())
}

/// Builds a view with tag names in association order.
fn company_view(
    session: &dyn DirectorySession,
    company: &CompanyRecord,
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let tags = session.tags_for_company(company.id)?;
    Ok(CompanyView {
        company_name: resolve_name(company, language).to_string(),
        tags: tags.iter().map(|tag| resolve_name(tag, language).to_string()).collect(),
    })
}

/// Builds a view with tag names sorted ascending.
fn sorted_company_view(
    session: &dyn DirectorySession,
    company: &CompanyRecord,
    language: LanguageCode,
) -> Result<CompanyView, DirectoryError> {
    let mut view = company_view(session, company, language)?;
    view.tags.sort();
    Ok(view)
}
