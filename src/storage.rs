// Local key-value storage backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::task::now_ms;

const CURRENT_VERSION: u32 = 1;

/// Directory created inside the store path that holds all persisted state
pub const STORE_DIR: &str = ".tasklist";

/// Durable string key-value area, the local equivalent of browser storage
///
/// Every `set` overwrites the previous value for the key. There is no
/// transactional guarantee across keys and the last writer wins.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Which storage backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::File => write!(f, "file"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

/// Open the configured backend rooted at `path`
pub fn open(backend: Backend, path: &Path) -> Result<Box<dyn KeyValueStorage>> {
    debug!(%backend, path = ?path, "Opening storage");
    let storage: Box<dyn KeyValueStorage> = match backend {
        Backend::Sqlite => Box::new(SqliteStorage::open(path)?),
        Backend::File => Box::new(FileStorage::open(path)?),
        Backend::Memory => Box::new(MemoryStorage::default()),
    };
    Ok(storage)
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Validate a storage key
///
/// Keys double as file names for [`FileStorage`], so they are restricted to
/// alphanumerics, `_` and `-`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Storage key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Storage key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid storage key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

/// Create the store directory with its `.gitignore` and `.version` files
fn prepare_dir(path: &Path) -> Result<PathBuf> {
    let base_path = path.join(STORE_DIR);
    fs::create_dir_all(&base_path).context("Failed to create store directory")?;

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(
            gitignore_path,
            "tasklist.db\ntasklist.db-shm\ntasklist.db-wal\n*.tmp\n",
        )?;
    }

    let version_path = base_path.join(".version");
    if !version_path.exists() {
        fs::write(version_path, CURRENT_VERSION.to_string())?;
    }

    Ok(base_path)
}

// ============================================================================
// SQLite
// ============================================================================

/// Key-value storage in a single SQLite table
pub struct SqliteStorage {
    db: Connection,
}

impl SqliteStorage {
    /// Open or create the database at `<path>/.tasklist/tasklist.db`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_dir(path.as_ref())?;

        let db_path = base_path.join("tasklist.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self { db };
        storage.create_schema()?;

        info!(path = ?db_path, "Opened SQLite storage");
        Ok(storage)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl KeyValueStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .context("Failed to read from SQLite storage")?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, now_ms()],
            )
            .context("Failed to write to SQLite storage")?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

// ============================================================================
// Files
// ============================================================================

/// Key-value storage with one JSON file per key
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create the directory `<path>/.tasklist`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = prepare_dir(path.as_ref())?;
        info!(path = ?base_path, "Opened file storage");
        Ok(Self { base_path })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.key_path(key);
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path).context("Failed to create temp file")?;

            // Acquire exclusive lock before writing
            file.lock_exclusive().context("Failed to acquire file lock")?;

            file.write_all(value.as_bytes())?;
            file.sync_all()?;

            // Lock is automatically released when file is dropped
        }

        fs::rename(&temp_path, &path).with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!(key, bytes = value.len(), "Stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Volatile storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
