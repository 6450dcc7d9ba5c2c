// crates/company-directory-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Directory Store
// Description: Durable DirectoryStore backed by SQLite.
// Purpose: Persist companies, tags, translations, and associations.
// Dependencies: company-directory-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`DirectoryStore`] over a single `SQLite`
//! connection. Each session locks the connection, opens a
//! `BEGIN IMMEDIATE` transaction, and rolls it back on drop unless
//! committed.
//!
//! Association order is the rowid of `company_tag_links`, so repeated
//! associations and their order survive restarts. Name substring matching
//! uses `instr`, which is case-sensitive, rather than `LIKE`, which is not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use company_directory_core::CompanyId;
use company_directory_core::CompanyRecord;
use company_directory_core::DirectorySession;
use company_directory_core::DirectoryStore;
use company_directory_core::LanguageCode;
use company_directory_core::NameTranslation;
use company_directory_core::StoreError;
use company_directory_core::TagId;
use company_directory_core::TagRecord;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Directory schema, created once alongside the version row.
const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT
    );
    CREATE TABLE IF NOT EXISTS company_name_translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        language_code TEXT NOT NULL CHECK (length(language_code) = 2),
        name TEXT NOT NULL CHECK (length(name) <= 100),
        UNIQUE (company_id, language_code)
    );
    CREATE TABLE IF NOT EXISTS company_tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT
    );
    CREATE TABLE IF NOT EXISTS company_tag_name_translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tag_id INTEGER NOT NULL REFERENCES company_tags(id) ON DELETE CASCADE,
        language_code TEXT NOT NULL CHECK (length(language_code) = 2),
        name TEXT NOT NULL CHECK (length(name) <= 100),
        UNIQUE (tag_id, language_code)
    );
    CREATE TABLE IF NOT EXISTS company_tag_links (
        company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        company_tag_id INTEGER NOT NULL REFERENCES company_tags(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_company_name_translations_name
        ON company_name_translations (name);
    CREATE INDEX IF NOT EXISTS idx_company_tag_name_translations_name
        ON company_tag_name_translations (name);
    CREATE INDEX IF NOT EXISTS idx_company_tag_links_company
        ON company_tag_links (company_id);
    CREATE INDEX IF NOT EXISTS idx_company_tag_links_tag
        ON company_tag_links (company_tag_id);
";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` directory store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored rows violate directory invariants.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps an engine error into [`SqliteStoreError::Db`].
#[allow(clippy::needless_pass_by_value, reason = "Used directly as a map_err callback.")]
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed directory store.
#[derive(Clone)]
pub struct SqliteDirectoryStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteDirectoryStore {
    /// Opens an `SQLite`-backed directory store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self { connection: Arc::new(Mutex::new(connection)) })
    }

    /// Opens a private in-memory database with the directory schema.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let mut connection = Connection::open_in_memory().map_err(db_error)?;
        connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_error)?;
        initialize_schema(&mut connection)?;
        Ok(Self { connection: Arc::new(Mutex::new(connection)) })
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }
}

impl DirectoryStore for SqliteDirectoryStore {
    fn begin(&self) -> Result<Box<dyn DirectorySession + '_>, StoreError> {
        let connection = self.lock()?;
        recover_open_transaction(&connection)?;
        connection.execute_batch("BEGIN IMMEDIATE;").map_err(db_error)?;
        Ok(Box::new(SqliteSession { connection, finished: false }))
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let connection = self.lock()?;
        recover_open_transaction(&connection)?;
        let version: i64 = connection
            .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
            .map_err(db_error)?;
        drop(connection);
        if version != SCHEMA_VERSION {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {version}"
            ))
            .into());
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Transaction-scoped session holding the connection lock.
struct SqliteSession<'a> {
    /// Locked connection with an open transaction.
    connection: MutexGuard<'a, Connection>,
    /// Set once the transaction has been committed.
    finished: bool,
}

impl Drop for SqliteSession<'_> {
    fn drop(&mut self) {
        // A failed rollback leaves the transaction open for the next `begin`
        // or readiness check to roll back.
        if !self.finished {
            let _ = self.connection.execute_batch("ROLLBACK;");
        }
    }
}

impl SqliteSession<'_> {
    /// Loads the translations of a company in insertion order.
    fn load_company(&self, raw_id: i64) -> Result<CompanyRecord, SqliteStoreError> {
        let id = CompanyId::from_raw(raw_to_u64(raw_id)?)
            .ok_or_else(|| SqliteStoreError::Corrupt("company id must be non-zero".to_string()))?;
        let names = self.load_names(
            "SELECT language_code, name FROM company_name_translations WHERE company_id = ?1 \
             ORDER BY id",
            raw_id,
        )?;
        Ok(CompanyRecord { id, names })
    }

    /// Loads the translations of a tag in insertion order.
    fn load_tag(&self, raw_id: i64) -> Result<TagRecord, SqliteStoreError> {
        let id = TagId::from_raw(raw_to_u64(raw_id)?)
            .ok_or_else(|| SqliteStoreError::Corrupt("tag id must be non-zero".to_string()))?;
        let names = self.load_names(
            "SELECT language_code, name FROM company_tag_name_translations WHERE tag_id = ?1 \
             ORDER BY id",
            raw_id,
        )?;
        Ok(TagRecord { id, names })
    }

    /// Runs a `(language_code, name)` query keyed by one owner id.
    fn load_names(&self, sql: &str, owner: i64) -> Result<Vec<NameTranslation>, SqliteStoreError> {
        let mut statement = self.connection.prepare_cached(sql).map_err(db_error)?;
        let rows = statement
            .query_map(params![owner], |row| {
                let code: String = row.get(0)?;
                let name: String = row.get(1)?;
                Ok((code, name))
            })
            .map_err(db_error)?;
        let mut names = Vec::new();
        for row in rows {
            let (code, name) = row.map_err(db_error)?;
            let language = LanguageCode::parse(&code).ok_or_else(|| {
                SqliteStoreError::Corrupt(format!("unsupported language code: {code}"))
            })?;
            names.push(NameTranslation { language, name });
        }
        Ok(names)
    }

    /// Returns the ids produced by a single-column id query.
    fn query_ids(&self, sql: &str, key: &str) -> Result<Vec<i64>, SqliteStoreError> {
        let mut statement = self.connection.prepare_cached(sql).map_err(db_error)?;
        let rows = statement.query_map(params![key], |row| row.get(0)).map_err(db_error)?;
        rows.collect::<Result<Vec<i64>, _>>().map_err(db_error)
    }

    /// Returns the ids linked to `owner` through `company_tag_links`, in rowid order.
    fn linked_ids(&self, sql: &str, owner: i64) -> Result<Vec<i64>, SqliteStoreError> {
        let mut statement = self.connection.prepare_cached(sql).map_err(db_error)?;
        let rows = statement.query_map(params![owner], |row| row.get(0)).map_err(db_error)?;
        rows.collect::<Result<Vec<i64>, _>>().map_err(db_error)
    }

    /// Returns the first id produced by a single-column id query.
    fn first_id(&self, sql: &str, key: &str) -> Result<Option<i64>, SqliteStoreError> {
        self.connection.query_row(sql, params![key], |row| row.get(0)).optional().map_err(db_error)
    }

    /// Inserts translations for a freshly created owner row.
    fn insert_names(
        &self,
        sql: &str,
        owner: i64,
        names: &[NameTranslation],
    ) -> Result<(), SqliteStoreError> {
        let mut statement = self.connection.prepare_cached(sql).map_err(db_error)?;
        for translation in names {
            statement
                .execute(params![owner, translation.language.as_str(), translation.name])
                .map_err(db_error)?;
        }
        Ok(())
    }

    /// Finds companies with a name containing `fragment`.
    fn companies_by_fragment(&self, fragment: &str) -> Result<Vec<CompanyRecord>, SqliteStoreError> {
        let ids = self.query_ids(
            "SELECT c.id FROM companies c WHERE EXISTS (SELECT 1 FROM company_name_translations n \
             WHERE n.company_id = c.id AND instr(n.name, ?1) > 0) ORDER BY c.id",
            fragment,
        )?;
        ids.into_iter().map(|id| self.load_company(id)).collect()
    }

    /// Finds the first tag holding any of `criteria`.
    fn tag_matching(&self, criteria: &[NameTranslation]) -> Result<Option<TagRecord>, SqliteStoreError> {
        if criteria.is_empty() {
            return Ok(None);
        }
        let clauses = (0..criteria.len())
            .map(|index| {
                format!("(language_code = ?{} AND name = ?{})", index * 2 + 1, index * 2 + 2)
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT tag_id FROM company_tag_name_translations WHERE {clauses} ORDER BY tag_id \
             LIMIT 1"
        );
        let values = criteria
            .iter()
            .flat_map(|criterion| [criterion.language.as_str(), criterion.name.as_str()]);
        let id: Option<i64> = self
            .connection
            .query_row(&sql, params_from_iter(values), |row| row.get(0))
            .optional()
            .map_err(db_error)?;
        id.map(|id| self.load_tag(id)).transpose()
    }

    /// Finds the first tag lacking a translation in every one of `languages`.
    fn tag_without_names(
        &self,
        languages: &[LanguageCode],
    ) -> Result<Option<TagRecord>, SqliteStoreError> {
        let placeholders = (1..=languages.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT t.id FROM company_tags t WHERE NOT EXISTS (SELECT 1 FROM \
             company_tag_name_translations n WHERE n.tag_id = t.id AND n.language_code IN \
             ({placeholders})) ORDER BY t.id LIMIT 1"
        );
        let id: Option<i64> = self
            .connection
            .query_row(
                &sql,
                params_from_iter(languages.iter().map(|language| language.as_str())),
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        id.map(|id| self.load_tag(id)).transpose()
    }

    /// Creates an owner row and returns its rowid.
    fn insert_owner(&self, sql: &str) -> Result<i64, SqliteStoreError> {
        self.connection.execute(sql, params![]).map_err(db_error)?;
        Ok(self.connection.last_insert_rowid())
    }
}

impl DirectorySession for SqliteSession<'_> {
    fn find_companies_by_fragment(&self, fragment: &str) -> Result<Vec<CompanyRecord>, StoreError> {
        Ok(self.companies_by_fragment(fragment)?)
    }

    fn find_company_by_name(&self, name: &str) -> Result<Option<CompanyRecord>, StoreError> {
        let id = self.first_id(
            "SELECT company_id FROM company_name_translations WHERE name = ?1 ORDER BY company_id \
             LIMIT 1",
            name,
        )?;
        Ok(id.map(|id| self.load_company(id)).transpose()?)
    }

    fn find_tag_by_name(&self, name: &str) -> Result<Option<TagRecord>, StoreError> {
        let id = self.first_id(
            "SELECT tag_id FROM company_tag_name_translations WHERE name = ?1 ORDER BY tag_id \
             LIMIT 1",
            name,
        )?;
        Ok(id.map(|id| self.load_tag(id)).transpose()?)
    }

    fn find_tag_matching(&self, criteria: &[NameTranslation]) -> Result<Option<TagRecord>, StoreError> {
        Ok(self.tag_matching(criteria)?)
    }

    fn find_tag_without_names(
        &self,
        languages: &[LanguageCode],
    ) -> Result<Option<TagRecord>, StoreError> {
        Ok(self.tag_without_names(languages)?)
    }

    fn companies_for_tag(&self, tag: TagId) -> Result<Vec<CompanyRecord>, StoreError> {
        let ids = self.linked_ids(
            "SELECT company_id FROM company_tag_links WHERE company_tag_id = ?1 ORDER BY rowid",
            id_to_raw(tag.get())?,
        )?;
        Ok(ids.into_iter().map(|id| self.load_company(id)).collect::<Result<Vec<_>, _>>()?)
    }

    fn tags_for_company(&self, company: CompanyId) -> Result<Vec<TagRecord>, StoreError> {
        let ids = self.linked_ids(
            "SELECT company_tag_id FROM company_tag_links WHERE company_id = ?1 ORDER BY rowid",
            id_to_raw(company.get())?,
        )?;
        Ok(ids.into_iter().map(|id| self.load_tag(id)).collect::<Result<Vec<_>, _>>()?)
    }

    fn insert_company(&mut self, names: &[NameTranslation]) -> Result<CompanyRecord, StoreError> {
        let id = self.insert_owner("INSERT INTO companies DEFAULT VALUES")?;
        self.insert_names(
            "INSERT INTO company_name_translations (company_id, language_code, name) VALUES (?1, \
             ?2, ?3)",
            id,
            names,
        )?;
        Ok(self.load_company(id)?)
    }

    fn insert_tag(&mut self, names: &[NameTranslation]) -> Result<TagRecord, StoreError> {
        let id = self.insert_owner("INSERT INTO company_tags DEFAULT VALUES")?;
        self.insert_names(
            "INSERT INTO company_tag_name_translations (tag_id, language_code, name) VALUES (?1, \
             ?2, ?3)",
            id,
            names,
        )?;
        Ok(self.load_tag(id)?)
    }

    fn attach(&mut self, company: CompanyId, tag: TagId) -> Result<(), StoreError> {
        self.connection
            .execute(
                "INSERT INTO company_tag_links (company_id, company_tag_id) VALUES (?1, ?2)",
                params![id_to_raw(company.get())?, id_to_raw(tag.get())?],
            )
            .map_err(db_error)?;
        Ok(())
    }

    fn detach_one(&mut self, company: CompanyId, tag: TagId) -> Result<bool, StoreError> {
        let removed = self
            .connection
            .execute(
                "DELETE FROM company_tag_links WHERE rowid = (SELECT rowid FROM company_tag_links \
                 WHERE company_id = ?1 AND company_tag_id = ?2 ORDER BY rowid LIMIT 1)",
                params![id_to_raw(company.get())?, id_to_raw(tag.get())?],
            )
            .map_err(db_error)?;
        Ok(removed > 0)
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut session = self;
        session.connection.execute_batch("COMMIT;").map_err(db_error)?;
        session.finished = true;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rolls back a transaction left open on the shared connection.
///
/// The lock holder is the only session, so an open transaction here was
/// leaked by a session whose drop-time rollback failed.
fn recover_open_transaction(connection: &Connection) -> Result<(), SqliteStoreError> {
    if connection.is_autocommit() {
        return Ok(());
    }
    connection.execute_batch("ROLLBACK;").map_err(|err| {
        SqliteStoreError::Db(format!("connection left in an open transaction: {err}"))
    })
}

/// Converts a stored rowid into an identifier value.
fn raw_to_u64(raw: i64) -> Result<u64, SqliteStoreError> {
    u64::try_from(raw).map_err(|_| SqliteStoreError::Corrupt(format!("negative row id: {raw}")))
}

/// Converts an identifier value into a rowid parameter.
fn id_to_raw(id: u64) -> Result<i64, SqliteStoreError> {
    i64::try_from(id).map_err(|_| SqliteStoreError::Invalid(format!("identifier out of range: {id}")))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for integrity and durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(db_error)?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(db_error)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_error)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(db_error)?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(db_error)?;
            tx.execute_batch(SCHEMA_SQL).map_err(db_error)?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(db_error)?;
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only connection state assertions."
    )]

    use company_directory_core::DirectoryStore;
    use rusqlite::params;

    use super::SqliteDirectoryStore;

    /// Leaves an uncommitted company row inside an open transaction.
    fn leak_transaction(store: &SqliteDirectoryStore) {
        let connection = store.lock().unwrap();
        connection.execute_batch("BEGIN; INSERT INTO companies DEFAULT VALUES;").unwrap();
        assert!(!connection.is_autocommit());
    }

    /// Counts committed and pending company rows.
    fn company_rows(store: &SqliteDirectoryStore) -> i64 {
        let connection = store.lock().unwrap();
        connection.query_row("SELECT COUNT(*) FROM companies", params![], |row| row.get(0)).unwrap()
    }

    #[test]
    fn begin_rolls_back_a_leaked_transaction() {
        let store = SqliteDirectoryStore::open_in_memory().unwrap();
        leak_transaction(&store);

        let session = store.begin().unwrap();
        session.commit().unwrap();

        assert_eq!(company_rows(&store), 0);
        assert!(store.lock().unwrap().is_autocommit());
    }

    #[test]
    fn readiness_rolls_back_a_leaked_transaction() {
        let store = SqliteDirectoryStore::open_in_memory().unwrap();
        leak_transaction(&store);

        store.readiness().unwrap();

        assert_eq!(company_rows(&store), 0);
    }
}
