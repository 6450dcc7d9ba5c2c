// crates/company-directory-store-sqlite/tests/sqlite_directory_store.rs
// ============================================================================
// Module: SQLite Directory Store Tests
// Description: Persistence, transaction, and query tests for the SQLite store.
// Purpose: Validate path safety, schema versioning, rollback, and ordering.
// Dependencies: company-directory-core, company-directory-store-sqlite
// ============================================================================

//! ## Overview
//! Integration tests for the `SQLite` directory store:
//! - Path safety checks and schema version validation
//! - Commit durability across reopen and rollback on drop
//! - Case-sensitive substring search and association ordering
//! - Directory operations end-to-end on a file-backed database

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::path::Path;

use company_directory_core::DirectoryError;
use company_directory_core::DirectorySession;
use company_directory_core::DirectoryStore;
use company_directory_core::LanguageCode;
use company_directory_core::NameTranslation;
use company_directory_core::NewCompany;
use company_directory_core::StoreError;
use company_directory_core::TagCandidate;
use company_directory_core::run_in_session;
use company_directory_core::runtime::add_company;
use company_directory_core::runtime::append_tags;
use company_directory_core::runtime::delete_tag;
use company_directory_core::runtime::get_by_name;
use company_directory_core::runtime::search_by_name;
use company_directory_core::runtime::search_by_tag;
use company_directory_store_sqlite::SqliteDirectoryStore;
use company_directory_store_sqlite::SqliteStoreConfig;
use company_directory_store_sqlite::SqliteStoreError;
use company_directory_store_sqlite::SqliteStoreMode;
use company_directory_store_sqlite::SqliteSyncMode;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::TempDir;

use LanguageCode::En;
use LanguageCode::Ja;
use LanguageCode::Ko;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn config_for_path(path: &Path) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Full,
    }
}

fn store_for(path: &Path) -> SqliteDirectoryStore {
    SqliteDirectoryStore::new(&config_for_path(path)).expect("store init")
}

fn session_for(store: &SqliteDirectoryStore) -> Box<dyn DirectorySession + '_> {
    store.begin().expect("begin session")
}

fn names(pairs: &[(LanguageCode, &str)]) -> Vec<NameTranslation> {
    pairs.iter().map(|(language, name)| NameTranslation::new(*language, *name)).collect()
}

fn wantedlab() -> NewCompany {
    NewCompany {
        ko_name: "원티드랩".to_string(),
        en_name: "Wantedlab".to_string(),
        tw_name: "Wantedlab TW".to_string(),
        tags: vec![
            TagCandidate {
                ko: Some("태그_16".to_string()),
                en: Some("tag_16".to_string()),
                tw: Some("tag_16".to_string()),
                ..TagCandidate::default()
            },
            TagCandidate {
                ko: Some("태그_20".to_string()),
                en: Some("tag_20".to_string()),
                tw: Some("tag_20".to_string()),
                ..TagCandidate::default()
            },
        ],
    }
}

// ============================================================================
// SECTION: Path Validation
// ============================================================================

#[test]
fn sqlite_store_rejects_directory_path() {
    let temp = TempDir::new().unwrap();
    let Err(err) = SqliteDirectoryStore::new(&config_for_path(temp.path())) else {
        panic!("expected invalid directory path to fail");
    };
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn sqlite_store_rejects_overlong_component() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a".repeat(300));
    let Err(err) = SqliteDirectoryStore::new(&config_for_path(&path)) else {
        panic!("expected overlong component to fail");
    };
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn sqlite_store_creates_missing_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("dir").join("directory.db");
    let store = store_for(&path);
    store.readiness().expect("ready");
    assert!(path.exists());
}

// ============================================================================
// SECTION: Schema Versioning
// ============================================================================

#[test]
fn sqlite_store_rejects_unknown_schema_version() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("directory.db");
    drop(store_for(&path));

    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = ?1", params![99_i64]).unwrap();
    drop(connection);

    let Err(err) = SqliteDirectoryStore::new(&config_for_path(&path)) else {
        panic!("expected version mismatch");
    };
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}

#[test]
fn sqlite_store_maps_errors_into_store_errors() {
    let error = StoreError::from(SqliteStoreError::Db("locked".to_string()));
    assert!(matches!(error, StoreError::Store(message) if message == "locked"));
    let error = StoreError::from(SqliteStoreError::Corrupt("bad row".to_string()));
    assert!(matches!(error, StoreError::Corrupt(_)));
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

#[test]
fn sqlite_store_persists_commits_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("directory.db");
    {
        let store = store_for(&path);
        run_in_session(&store, |session| add_company(session, &wantedlab(), En)).unwrap();
    }

    let store = store_for(&path);
    let view = run_in_session(&store, |session| get_by_name(session, "원티드랩", Ko)).unwrap();
    assert_eq!(view.company_name, "원티드랩");
    assert_eq!(view.tags, vec!["태그_16", "태그_20"]);
}

#[test]
fn sqlite_store_rolls_back_dropped_sessions() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    {
        let mut session = session_for(&store);
        session.insert_company(&names(&[(Ko, "원티드랩")])).unwrap();
        assert!(session.find_company_by_name("원티드랩").unwrap().is_some());
    }

    let session = session_for(&store);
    assert!(session.find_company_by_name("원티드랩").unwrap().is_none());
}

#[test]
fn sqlite_store_rolls_back_failed_operations() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    let mut company = wantedlab();
    company.tags.push(TagCandidate::default());

    let error = run_in_session(&store, |session| add_company(session, &company, En)).unwrap_err();
    assert!(matches!(error, DirectoryError::Business(_)));

    let found = run_in_session(&store, |session| search_by_name(session, "Wanted", En)).unwrap();
    assert!(found.is_empty());
}

#[test]
fn sqlite_store_enforces_schema_name_limit() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    let mut session = session_for(&store);
    let long_name = "가".repeat(101);
    let error = session.insert_company(&names(&[(Ko, long_name.as_str())])).unwrap_err();
    assert!(matches!(error, StoreError::Store(_)));
}

// ============================================================================
// SECTION: Queries
// ============================================================================

#[test]
fn sqlite_store_substring_search_is_case_sensitive() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    let mut session = session_for(&store);
    session.insert_company(&names(&[(Ko, "주식회사 링크드코리아"), (En, "LinkedKorea")])).unwrap();
    session.insert_company(&names(&[(Ko, "스피링크")])).unwrap();

    let found = session.find_companies_by_fragment("링크").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].names, names(&[(Ko, "주식회사 링크드코리아"), (En, "LinkedKorea")]));
    assert!(session.find_companies_by_fragment("linked").unwrap().is_empty());
    assert_eq!(session.find_companies_by_fragment("Linked").unwrap().len(), 1);
}

#[test]
fn sqlite_store_keeps_association_order_and_duplicates() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    let mut session = session_for(&store);
    let company = session.insert_company(&names(&[(Ko, "원티드랩")])).unwrap();
    let first = session.insert_tag(&names(&[(Ko, "태그_4")])).unwrap();
    let second = session.insert_tag(&names(&[(Ko, "태그_20")])).unwrap();
    session.attach(company.id, second.id).unwrap();
    session.attach(company.id, first.id).unwrap();
    session.attach(company.id, second.id).unwrap();

    let tags: Vec<_> =
        session.tags_for_company(company.id).unwrap().into_iter().map(|tag| tag.id).collect();
    assert_eq!(tags, vec![second.id, first.id, second.id]);

    assert!(session.detach_one(company.id, second.id).unwrap());
    let tags: Vec<_> =
        session.tags_for_company(company.id).unwrap().into_iter().map(|tag| tag.id).collect();
    assert_eq!(tags, vec![first.id, second.id]);

    assert!(session.detach_one(company.id, second.id).unwrap());
    assert!(!session.detach_one(company.id, second.id).unwrap());
}

#[test]
fn sqlite_store_matches_tags_by_any_criterion_in_id_order() {
    let store = SqliteDirectoryStore::open_in_memory().unwrap();
    let mut session = session_for(&store);
    let first = session.insert_tag(&names(&[(Ja, "タグ_1")])).unwrap();
    let second = session.insert_tag(&names(&[(Ko, "태그_1"), (En, "tag_1")])).unwrap();

    let matched = session.find_tag_matching(&names(&[(Ko, "태그_1"), (Ja, "タグ_1")])).unwrap();
    assert_eq!(matched.map(|tag| tag.id), Some(first.id));
    let matched = session.find_tag_matching(&names(&[(En, "tag_1")])).unwrap();
    assert_eq!(matched.map(|tag| tag.id), Some(second.id));
    let matched = session.find_tag_matching(&names(&[(Ja, "tag_1")])).unwrap();
    assert!(matched.is_none());
    assert!(session.find_tag_matching(&[]).unwrap().is_none());
}

// ============================================================================
// SECTION: Directory Operations
// ============================================================================

#[test]
fn sqlite_store_serves_tag_search_with_fallback() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("directory.db"));
    {
        let mut session = session_for(&store);
        let tag = session.insert_tag(&names(&[(Ja, "タグ_22")])).unwrap();
        for pair in [[(Ko, "딤딤섬 대구점"), (En, "")], [(Ko, ""), (En, "Rejoice Pregnancy")]] {
            let company = session.insert_company(&names(&pair)).unwrap();
            session.attach(company.id, tag.id).unwrap();
            session.attach(company.id, tag.id).unwrap();
        }
        session.commit().unwrap();
    }

    let found = run_in_session(&store, |session| search_by_tag(session, "タグ_22", Ko)).unwrap();
    let found: Vec<_> = found.into_iter().map(|summary| summary.company_name).collect();
    assert_eq!(found, vec!["딤딤섬 대구점", "Rejoice Pregnancy"]);
}

#[test]
fn sqlite_store_serves_append_and_delete() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("directory.db"));
    run_in_session(&store, |session| add_company(session, &wantedlab(), En)).unwrap();

    let appended = vec![
        TagCandidate {
            ko: Some("태그_50".to_string()),
            en: Some("tag_50".to_string()),
            ja: Some("タグ_50".to_string()),
            ..TagCandidate::default()
        },
        TagCandidate {
            ko: Some("태그_4".to_string()),
            en: Some("tag_4".to_string()),
            tw: Some("tag_4".to_string()),
            ..TagCandidate::default()
        },
    ];
    let view =
        run_in_session(&store, |session| append_tags(session, "원티드랩", &appended, En)).unwrap();
    assert_eq!(view.tags, vec!["tag_16", "tag_20", "tag_4", "tag_50"]);

    let view =
        run_in_session(&store, |session| delete_tag(session, "원티드랩", "태그_16", En)).unwrap();
    assert_eq!(view.company_name, "Wantedlab");
    assert_eq!(view.tags, vec!["tag_20", "tag_4", "tag_50"]);

    let orphaned = run_in_session(&store, |session| search_by_tag(session, "tag_16", En)).unwrap();
    assert!(orphaned.is_empty());
}

#[test]
fn sqlite_store_reuses_tags_without_profile_names() {
    let temp = TempDir::new().unwrap();
    let store = store_for(&temp.path().join("directory.db"));
    let ja_only = TagCandidate { ja: Some("タグ_9".to_string()), ..TagCandidate::default() };
    let company = |ko: &str, en: &str| NewCompany {
        ko_name: ko.to_string(),
        en_name: en.to_string(),
        tw_name: en.to_string(),
        tags: vec![ja_only.clone()],
    };

    let first =
        run_in_session(&store, |session| add_company(session, &company("가", "A"), En)).unwrap();
    let second =
        run_in_session(&store, |session| add_company(session, &company("나", "B"), En)).unwrap();
    assert_eq!(first.tags, vec![String::new()]);
    assert_eq!(second.tags, vec![String::new()]);

    let mut session = session_for(&store);
    let tag = session.find_tag_without_names(&[Ko, En, LanguageCode::Tw]).unwrap().unwrap();
    assert!(tag.names.is_empty());
    assert_eq!(session.companies_for_tag(tag.id).unwrap().len(), 2);
    assert!(session.find_tag_without_names(&[Ja]).unwrap().is_some());
    let named = session.insert_tag(&names(&[(Ja, "タグ_10")])).unwrap();
    assert_ne!(session.find_tag_without_names(&[Ja]).unwrap().unwrap().id, named.id);
}
