// crates/company-directory-core/src/runtime/reconciler.rs
// ============================================================================
// Module: Tag Reconciler
// Description: Find-or-create for multilingual tags.
// Purpose: Reuse an existing tag when any candidate name already names one.
// Dependencies: crate::{core, interfaces, runtime::errors}
// ============================================================================

//! ## Overview
//! [`reconcile`] matches a [`TagCandidate`] against existing tags with a
//! logical OR over the profile's languages: a tag matches when its name in
//! any one of those languages equals the candidate's name in that language.
//! The earliest matching tag is returned unchanged. Otherwise a new tag is
//! created with the candidate's supplied names.
//!
//! A candidate supplying no name in the profile's languages matches the
//! earliest tag that has no name in any of them.
//!
//! ## Invariants
//! - Repeating a call with the same candidate returns the same tag.
//! - Existing tags are never renamed or merged.
//! - Reconciliation never rejects a candidate for missing names.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::MAX_NAME_CHARS;
use crate::core::ReconcileProfile;
use crate::core::TagCandidate;
use crate::core::TagRecord;
use crate::interfaces::DirectorySession;
use crate::runtime::errors::BusinessRule;
use crate::runtime::errors::DirectoryError;

// ============================================================================
// SECTION: Reconciliation
// ============================================================================

/// Finds the tag named by `candidate`, creating it when none matches.
///
/// # Errors
///
/// Returns [`BusinessRule::NameTooLong`] for oversized names and
/// [`DirectoryError::Store`] when the session fails.
pub fn reconcile(
    session: &mut dyn DirectorySession,
    candidate: &TagCandidate,
    profile: ReconcileProfile,
) -> Result<TagRecord, DirectoryError> {
    let names = candidate.supplied_names(profile);
    for translation in &names {
        ensure_name_fits(&translation.name)?;
    }
    let existing = if names.is_empty() {
        session.find_tag_without_names(&profile.languages())?
    } else {
        session.find_tag_matching(&names)?
    };
    if let Some(existing) = existing {
        return Ok(existing);
    }
    Ok(session.insert_tag(&names)?)
}

/// Rejects names longer than [`MAX_NAME_CHARS`] characters.
pub(crate) fn ensure_name_fits(name: &str) -> Result<(), BusinessRule> {
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(BusinessRule::NameTooLong { name: name.to_string(), max_chars: MAX_NAME_CHARS });
    }
    Ok(())
}
