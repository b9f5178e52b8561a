use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A single persisted value, read at start and overwritten wholesale
pub trait HistoryStorage {
    /// Stored value, `None` when nothing has been written yet
    fn read(&self) -> io::Result<Option<String>>;

    fn write(&mut self, value: &str) -> io::Result<()>;

    fn remove(&mut self) -> io::Result<()>;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, value: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        // replace atomically
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &self.path)
    }

    fn remove(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-process value, lost on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    value: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> io::Result<()> {
        self.value = Some(value.to_string());
        Ok(())
    }

    fn remove(&mut self) -> io::Result<()> {
        self.value = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested/history.json"));

        assert_eq!(storage.read().unwrap(), None);
        storage.write("[]").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("[]"));
        storage.write("[1]").unwrap();
        assert_eq!(storage.read().unwrap().as_deref(), Some("[1]"));

        storage.remove().unwrap();
        assert_eq!(storage.read().unwrap(), None);
        // removing twice is fine
        storage.remove().unwrap();
    }
}
