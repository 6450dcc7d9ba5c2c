// crates/company-directory-server/src/api.rs
// ============================================================================
// Module: Directory API Schemas
// Description: Request payloads, request errors, and status mapping.
// Purpose: Translate HTTP inputs into directory inputs and errors into replies.
// Dependencies: axum, company-directory-core, serde
// ============================================================================

//! ## Overview
//! Request bodies are parsed here into core inputs. [`ApiError`] unifies
//! transport-level rejections (bad language header, bad body, bad query)
//! with [`DirectoryError`] so every failure maps to one status code and one
//! localized `{"detail": ...}` body.
//!
//! | Error | Status |
//! |---|---|
//! | company or tag not found | 404 |
//! | business rule, bad header, bad body, bad or missing query | 400 |
//! | body over `max_body_bytes` | 413 |
//! | store failure | 500 |

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::StatusCode;
use company_directory_core::BusinessRule;
use company_directory_core::DirectoryError;
use company_directory_core::LanguageCode;
use company_directory_core::NewCompany;
use company_directory_core::TagCandidate;
use company_directory_core::t;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Request Schemas
// ============================================================================

/// Query string for `/search` and `/tags`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Name fragment or exact tag name.
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchParams {
    /// Returns the query or a missing-parameter error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::QueryMissing`] when `query` is absent.
    pub fn required(self) -> Result<String, ApiError> {
        self.query.ok_or(ApiError::QueryMissing("query"))
    }
}

/// Company name translations supplied on creation.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyNameInput {
    /// Korean name.
    #[serde(default)]
    pub ko: Option<String>,
    /// English name.
    #[serde(default)]
    pub en: Option<String>,
    /// Japanese name; accepted but not persisted on creation.
    #[serde(default, alias = "jp")]
    pub ja: Option<String>,
    /// Traditional Chinese name.
    #[serde(default)]
    pub tw: Option<String>,
}

/// One tag entry in a request body.
#[derive(Debug, Deserialize)]
pub struct TagInput {
    /// Candidate names across languages.
    pub tag_name: TagCandidate,
}

/// `POST /companies` request body.
#[derive(Debug, Deserialize)]
pub struct CompanyCreateRequest {
    /// Company names by language.
    pub company_name: CompanyNameInput,
    /// Tags to attach.
    #[serde(default)]
    pub tags: Vec<TagInput>,
}

impl CompanyCreateRequest {
    /// Converts the request into a [`NewCompany`].
    ///
    /// # Errors
    ///
    /// Returns [`BusinessRule::MissingCompanyName`] when the Korean, English,
    /// or Traditional Chinese name is absent.
    pub fn into_new_company(self) -> Result<NewCompany, ApiError> {
        let CompanyNameInput { ko, en, tw, .. } = self.company_name;
        Ok(NewCompany {
            ko_name: required_name(ko, LanguageCode::Ko)?,
            en_name: required_name(en, LanguageCode::En)?,
            tw_name: required_name(tw, LanguageCode::Tw)?,
            tags: self.tags.into_iter().map(|tag| tag.tag_name).collect(),
        })
    }
}

/// Unwraps a required creation name.
fn required_name(name: Option<String>, language: LanguageCode) -> Result<String, ApiError> {
    name.ok_or_else(|| {
        ApiError::Directory(BusinessRule::MissingCompanyName { language }.into())
    })
}

/// Parses a `PUT /companies/{company_name}/tags` body into tag candidates.
///
/// # Errors
///
/// Returns [`ApiError::BodyInvalid`] when the body is not a tag list.
pub fn parse_tag_list(bytes: &[u8]) -> Result<Vec<TagCandidate>, ApiError> {
    let tags: Vec<TagInput> = parse_json(bytes)?;
    Ok(tags.into_iter().map(|tag| tag.tag_name).collect())
}

/// Parses a JSON request body.
///
/// # Errors
///
/// Returns [`ApiError::BodyInvalid`] when the body does not deserialize.
pub fn parse_json<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::BodyInvalid(err.to_string()))
}

// ============================================================================
// SECTION: Response Schemas
// ============================================================================

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Localized error detail.
    pub detail: String,
}

/// Probe response body for `/health` and `/ready`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeBody {
    /// Probe status label.
    pub status: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request failures surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The language header carried an unsupported value.
    #[error("unsupported language: {0}")]
    LanguageInvalid(String),
    /// The request body could not be parsed.
    #[error("invalid request body: {0}")]
    BodyInvalid(String),
    /// The request body exceeded the configured limit.
    #[error("request body exceeds {0} bytes")]
    BodyTooLarge(usize),
    /// A required query parameter is missing.
    #[error("missing query parameter: {0}")]
    QueryMissing(&'static str),
    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    QueryInvalid(String),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Directory(
                DirectoryError::CompanyNotFound { .. } | DirectoryError::TagNotFound { .. },
            ) => StatusCode::NOT_FOUND,
            Self::Directory(DirectoryError::Business(_))
            | Self::LanguageInvalid(_)
            | Self::BodyInvalid(_)
            | Self::QueryMissing(_)
            | Self::QueryInvalid(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Directory(DirectoryError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Directory(error) => error.kind(),
            Self::LanguageInvalid(_) => "language_invalid",
            Self::BodyInvalid(_) => "body_invalid",
            Self::BodyTooLarge(_) => "body_too_large",
            Self::QueryMissing(_) => "query_missing",
            Self::QueryInvalid(_) => "query_invalid",
        }
    }

    /// Renders the error detail in `language`.
    #[must_use]
    pub fn localized_message(&self, language: LanguageCode) -> String {
        match self {
            Self::Directory(error) => error.localized_message(language),
            Self::LanguageInvalid(value) => t!(language, "request.language_invalid", value = value),
            Self::BodyInvalid(error) => t!(language, "request.body_invalid", error = error),
            Self::BodyTooLarge(limit) => t!(language, "request.body_too_large", limit = limit),
            Self::QueryMissing(name) => t!(language, "request.query_missing", name = name),
            Self::QueryInvalid(error) => t!(language, "request.query_invalid", error = error),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
