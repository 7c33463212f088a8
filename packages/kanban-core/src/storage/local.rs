/// Local filesystem storage backend.
///
/// Keeps every account and every board in one JSON file with:
/// - Atomic writes (write to .tmp, rename)
/// - SHA-256 content hash of the last read/written file, for change detection
/// - Mutex-guarded writes to prevent concurrent modification

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use sha2::{Digest, Sha256};

use super::tables::BoardTables;
use super::{StorageError, TableStore};

/// JSON-file board storage.
pub struct LocalStorage {
    file_path: PathBuf,
    tables: RwLock<BoardTables>,
    /// Serializes read-modify-write cycles against the file
    write_lock: Mutex<()>,
    /// SHA-256 of the content last read or written
    content_hash: RwLock<String>,
}

impl LocalStorage {
    /// Open the data file, starting empty if it does not exist yet.
    pub fn open(file_path: &Path) -> Result<Self, StorageError> {
        let (tables, hash) = match fs::read_to_string(file_path) {
            Ok(content) => (Self::parse(&content)?, Self::content_hash(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No data file at {}, starting empty", file_path.display());
                (BoardTables::default(), String::new())
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            file_path: file_path.to_path_buf(),
            tables: RwLock::new(tables),
            write_lock: Mutex::new(()),
            content_hash: RwLock::new(hash),
        })
    }

    fn parse(content: &str) -> Result<BoardTables, StorageError> {
        if content.trim().is_empty() {
            return Ok(BoardTables::default());
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Compute SHA-256 hash of content (for change detection).
    fn content_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.replace("\r\n", "\n").as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp_path = path.with_extension("kanban.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl TableStore for LocalStorage {
    fn read_tables<R>(&self, f: impl FnOnce(&BoardTables) -> R) -> R {
        f(&self.tables.read().unwrap())
    }

    fn write_tables<R>(
        &self,
        f: impl FnOnce(&mut BoardTables) -> Result<R, StorageError>,
    ) -> Result<R, StorageError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut draft = self.tables.read().unwrap().clone();
        let result = f(&mut draft)?;

        let content = serde_json::to_string_pretty(&draft)?;
        Self::atomic_write(&self.file_path, &content)?;

        *self.tables.write().unwrap() = draft;
        *self.content_hash.write().unwrap() = Self::content_hash(&content);
        Ok(result)
    }

    /// Re-read the file if someone else changed it.
    fn refresh_tables(&self) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().unwrap();
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let hash = Self::content_hash(&content);
        if *self.content_hash.read().unwrap() == hash {
            return Ok(false);
        }

        let tables = Self::parse(&content)?;
        *self.tables.write().unwrap() = tables;
        *self.content_hash.write().unwrap() = hash;
        log::info!("Reloaded external changes from {}", self.file_path.display());
        Ok(true)
    }
}
