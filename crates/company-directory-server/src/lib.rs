// crates/company-directory-server/src/lib.rs
// ============================================================================
// Module: Company Directory Server Library
// Description: HTTP API for the multilingual company directory.
// Purpose: Map REST routes onto directory operations and audit each request.
// Dependencies: axum, company-directory-{config, core, store-sqlite}, tokio
// ============================================================================

//! ## Overview
//! The server exposes the company directory over HTTP with axum. Every
//! request resolves its response language from a configurable header, runs
//! exactly one directory operation inside one store session, and emits one
//! audit event.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod audit;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::DirectoryAuditEvent;
pub use audit::DirectoryAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RequestOutcome;
pub use audit::StderrAuditSink;
pub use server::DirectoryServer;
pub use server::DirectoryServerError;
