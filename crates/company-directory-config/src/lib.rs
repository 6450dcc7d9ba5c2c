// crates/company-directory-config/src/lib.rs
// ============================================================================
// Module: Company Directory Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for company-directory.toml semantics.
// Dependencies: company-directory-core, company-directory-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `company-directory-config` defines the configuration model for the company
//! directory server. Loading is strict and fails closed: unknown keys,
//! oversized files, and out-of-range limits are rejected before the server
//! starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
