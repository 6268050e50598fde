use crate::config::Config;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PROJECT_DIR: &str = ".jotter";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage io error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("quota exceeded writing {key}: {needed} bytes, {quota} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
}

/// String key/value storage the notes are persisted to.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Where `key` lives, for display.
    fn describe(&self, key: &str) -> String;
}

/// One `<key>.json` file per key inside a directory. An optional quota caps
/// the size of a single value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore {
            dir: dir.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                other => other,
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed: value.len(),
                    quota,
                });
            }
        }
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(self.path_for(key), value).map_err(io_err)
    }

    fn describe(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

/// In-process store. Nothing outlives the process; a quota caps the total
/// stored bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    #[cfg(test)]
    pub fn with_quota(quota: usize) -> Self {
        MemoryStore {
            quota: Some(quota),
            ..MemoryStore::default()
        }
    }

    #[cfg(test)]
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("memory:{}", key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    Project,
    Global,
    /// No usable directory; notes live for this process only.
    Session,
}

#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub dir: PathBuf,
    pub scope: StoreScope,
}

impl StoreLocation {
    pub fn session() -> Self {
        StoreLocation {
            dir: PathBuf::new(),
            scope: StoreScope::Session,
        }
    }

    pub fn file_store(&self, config: &Config) -> FileStore {
        FileStore::new(&self.dir).with_quota(config.store_quota_bytes)
    }

    pub fn open(&self, config: &Config) -> Box<dyn KeyValueStore> {
        match self.scope {
            StoreScope::Session => Box::new(MemoryStore::new()),
            StoreScope::Project | StoreScope::Global => Box::new(self.file_store(config)),
        }
    }

    pub fn scope_label(&self) -> &'static str {
        match self.scope {
            StoreScope::Project => "project",
            StoreScope::Global => "global",
            StoreScope::Session => "session only",
        }
    }
}

pub fn init_project_store() -> Result<StoreLocation> {
    let cwd = env::current_dir()?;
    let dir = cwd.join(PROJECT_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {:?}", dir))?;
    Ok(StoreLocation {
        dir,
        scope: StoreScope::Project,
    })
}

pub fn locate_store(start: &Path, config: &Config) -> Result<StoreLocation> {
    if let Some(dir) = find_project_store(start) {
        return Ok(StoreLocation {
            dir,
            scope: StoreScope::Project,
        });
    }
    global_location(config)
}

fn global_location(config: &Config) -> Result<StoreLocation> {
    let dir = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => global_data_dir()?,
    };
    Ok(StoreLocation {
        dir,
        scope: StoreScope::Global,
    })
}

pub fn global_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "jotter").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn find_project_store(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_reads_back_what_it_wrote() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path().join("nested"));
        assert!(store.get_item("notes.app.notes").unwrap().is_none());

        store.set_item("notes.app.notes", "[]").unwrap();
        assert_eq!(
            store.get_item("notes.app.notes").unwrap().as_deref(),
            Some("[]")
        );
        assert!(tmp.path().join("nested/notes.app.notes.json").exists());
    }

    #[test]
    fn file_store_keeps_keys_inside_its_directory() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("../escape/key"),
            PathBuf::from("/data/.._escape_key.json")
        );
    }

    #[test]
    fn memory_store_enforces_quota() {
        let mut store = MemoryStore::with_quota(16);
        store.set_item("k", "short").unwrap();
        let err = store.set_item("k", "a value that is far too long").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn file_store_enforces_quota() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::new(tmp.path()).with_quota(Some(4));
        store.set_item("k", "[]").unwrap();
        let err = store.set_item("k", "[1,2,3]").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 7, .. }));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = FileStore::new(&blocker);
        assert!(matches!(
            store.set_item("k", "[]"),
            Err(StoreError::Io { .. })
        ));
    }

    #[test]
    fn session_location_opens_a_memory_store() {
        let location = StoreLocation::session();
        let store = location.open(&Config::default());
        assert_eq!(store.describe("k"), "memory:k");
        assert_eq!(location.scope_label(), "session only");
    }

    #[test]
    fn project_store_is_found_from_a_subdirectory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(PROJECT_DIR)).unwrap();
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let location = locate_store(&nested, &Config::default()).unwrap();
        assert_eq!(location.scope, StoreScope::Project);
        assert_eq!(location.dir, tmp.path().join(PROJECT_DIR));
    }

    #[test]
    fn configured_data_dir_is_used_outside_projects() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(tmp.path().join("store")),
            ..Config::default()
        };
        let location = global_location(&config).unwrap();
        assert_eq!(location.scope, StoreScope::Global);
        assert_eq!(location.dir, tmp.path().join("store"));
    }
}
