//! File-based day storage.
//!
//! Each date maps to `<base_dir>/<YYYY-MM-DD>.<ext>`. Writes go through a
//! temp file and a rename so an interrupted write leaves the old file intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Result, TodoError};
use crate::storage::DayStore;

/// Default file extension for day files.
pub const DEFAULT_EXTENSION: &str = "md";

/// File-based day storage.
#[derive(Debug, Clone)]
pub struct FileDayStore {
    /// Directory holding the day files.
    base_dir: PathBuf,
    /// Extension without the leading dot.
    extension: String,
}

impl FileDayStore {
    /// Create a store rooted at `base_dir` using the default `md` extension.
    ///
    /// The directory is created lazily on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(base_dir, DEFAULT_EXTENSION)
    }

    /// Create a store with a custom extension (leading dots are ignored).
    pub fn with_extension(base_dir: impl Into<PathBuf>, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        let extension = if extension.is_empty() {
            DEFAULT_EXTENSION
        } else {
            extension
        };
        Self {
            base_dir: base_dir.into(),
            extension: extension.to_string(),
        }
    }

    /// Create a store from resolved configuration.
    pub fn from_config(config: &Config, cwd: &Path) -> Self {
        Self::with_extension(config.storage.resolve_base_dir(cwd), &config.storage.extension)
    }

    /// Directory holding the day files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the document for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", date.format("%Y-%m-%d"), self.extension))
    }

    /// Path of the temp file used while writing `date`.
    fn temp_path(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(format!(
            ".{}.{}.tmp",
            date.format("%Y-%m-%d"),
            self.extension
        ))
    }

    /// Write a document atomically using temp file + rename.
    fn atomic_write(&self, date: NaiveDate, content: &str) -> Result<()> {
        let final_path = self.path_for(date);
        let temp_path = self.temp_path(date);

        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)
                .map_err(|e| TodoError::storage(&self.base_dir, e))?;
        }

        if let Err(e) = write_synced(&temp_path, content) {
            let _ = fs::remove_file(&temp_path);
            return Err(TodoError::storage(&temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(TodoError::storage(&final_path, e));
        }

        Ok(())
    }
}

/// Write `content` to a fresh file at `path` and flush it to disk.
fn write_synced(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

impl DayStore for FileDayStore {
    fn read(&self, date: NaiveDate) -> Result<String> {
        let path = self.path_for(date);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "day file missing, reading as empty");
                Ok(String::new())
            }
            Err(e) => Err(TodoError::storage(&path, e)),
        }
    }

    fn write(&self, date: NaiveDate, content: &str) -> Result<()> {
        tracing::debug!(
            path = %self.path_for(date).display(),
            bytes = content.len(),
            "writing day file"
        );
        self.atomic_write(date, content)
    }

    fn location(&self, date: NaiveDate) -> String {
        self.path_for(date).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_day_store_read_write;
    use tempfile::TempDir;

    fn create_test_store() -> (FileDayStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileDayStore::new(dir.path().join("days"));
        (store, dir)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_file_day_store_read_write() {
        let (store, _dir) = create_test_store();
        test_day_store_read_write(&store);
    }

    #[test]
    fn test_path_for() {
        let store = FileDayStore::new("/tmp/todo");
        assert_eq!(
            store.path_for(date()),
            PathBuf::from("/tmp/todo/2024-01-01.md")
        );
    }

    #[test]
    fn test_custom_extension() {
        let store = FileDayStore::with_extension("/tmp/todo", ".txt");
        assert!(store.path_for(date()).ends_with("2024-01-01.txt"));

        let store = FileDayStore::with_extension("/tmp/todo", "");
        assert!(store.path_for(date()).ends_with("2024-01-01.md"));
    }

    #[test]
    fn test_read_missing_is_empty_and_creates_nothing() {
        let (store, _dir) = create_test_store();

        assert_eq!(store.read(date()).unwrap(), "");
        assert!(!store.base_dir().exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("a").join("b");
        let store = FileDayStore::new(&base);

        store.write(date(), "# 2024-01-01\n").unwrap();

        assert!(base.is_dir());
        assert_eq!(
            fs::read_to_string(base.join("2024-01-01.md")).unwrap(),
            "# 2024-01-01\n"
        );
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let (store, _dir) = create_test_store();
        // A non-empty directory at the target path makes the rename fail.
        fs::create_dir_all(store.path_for(date()).join("occupied")).unwrap();

        assert!(store.write(date(), "content\n").is_err());
        assert!(!store.temp_path(date()).exists());
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();

        store.write(date(), "content\n").unwrap();

        assert!(!store.temp_path(date()).exists());
    }

    #[test]
    fn test_unicode_round_trip() {
        let (store, _dir) = create_test_store();
        let content = "# 2024-01-01\n\n## 任务\n\n- [ ] 写周报\n";

        store.write(date(), content).unwrap();

        assert_eq!(store.read(date()).unwrap(), content);
    }

    #[test]
    fn test_read_directory_is_error() {
        let (store, _dir) = create_test_store();
        fs::create_dir_all(store.path_for(date())).unwrap();

        let result = store.read(date());
        assert!(matches!(result, Err(TodoError::Storage { .. })));
    }
}
