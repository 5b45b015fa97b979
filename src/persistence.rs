//! # List Store
//!
//! Text codec for named lists. A saved file holds one `name=value;` record per line,
//! where `value` is the rendered expression. Loading turns the file back into a
//! single command: every line is followed by a `;` separator, so records written by
//! hand without the trailing `;` still load.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::eval::Bindings;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// File names given to `!save`/`!load` are resolved against `data_dir`.
#[derive(Debug, Clone)]
pub struct ListStore {
    data_dir: PathBuf,
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ListStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolves `file` under the data directory. Absolute names and `..` are
    /// refused so a client cannot reach files outside it.
    pub fn path(&self, file: &str) -> io::Result<PathBuf> {
        let name = Path::new(file.trim());
        let contained = name
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !contained {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "file name leaves the data directory",
            ));
        }
        Ok(self.data_dir.join(name))
    }

    pub fn encode(bindings: &Bindings) -> String {
        bindings
            .iter()
            .map(|(name, value)| format!("{}={};\n", name, value))
            .collect()
    }

    pub fn write(&self, file: &str, bindings: &Bindings) -> PersistenceResult<()> {
        let path = self
            .path(file)
            .map_err(|source| PersistenceError::Unwritable {
                path: PathBuf::from(file.trim()),
                source,
            })?;
        debug!("saving {} lists to {}", bindings.len(), path.display());
        fs::write(&path, Self::encode(bindings))
            .map_err(|source| PersistenceError::Unwritable { path, source })
    }

    /// Reads a saved file as one command text.
    pub fn read(&self, file: &str) -> PersistenceResult<String> {
        let path = self
            .path(file)
            .map_err(|source| PersistenceError::Unreadable {
                path: PathBuf::from(file.trim()),
                source,
            })?;
        debug!("loading lists from {}", path.display());
        let contents = fs::read_to_string(&path)
            .map_err(|source| PersistenceError::Unreadable { path, source })?;
        Ok(contents.lines().map(|line| format!("{};\n", line)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use tempfile::tempdir;

    #[test]
    fn test_encode() {
        let mut bindings = Bindings::new();
        bindings
            .assign("staff", parse("a@x, b@x").unwrap())
            .unwrap();
        assert_eq!(ListStore::encode(&bindings), "staff=(a@x, b@x);\n");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = ListStore::new(dir.path());

        let mut bindings = Bindings::new();
        bindings.assign("x", parse("a@x, y").unwrap()).unwrap();
        store.write(" lists.txt", &bindings).unwrap();

        assert!(dir.path().join("lists.txt").exists());
        assert_eq!(store.read("lists.txt").unwrap(), "x=((a@x),y);;\n");
    }

    #[test]
    fn test_read_appends_separators() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("hand.txt"), "a=a@x\nb=a,b@x\n").unwrap();

        let store = ListStore::new(dir.path());
        assert_eq!(store.read("hand.txt").unwrap(), "a=a@x;\nb=a,b@x;\n");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let store = ListStore::new(dir.path());
        assert!(matches!(
            store.read("missing.txt"),
            Err(PersistenceError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempdir().unwrap();
        let store = ListStore::new(dir.path().join("no-such-dir"));
        assert!(matches!(
            store.write("lists.txt", &Bindings::new()),
            Err(PersistenceError::Unwritable { .. })
        ));
    }

    #[test]
    fn test_path_stays_in_data_dir() {
        let store = ListStore::new("/srv/lists");
        assert_eq!(
            store.path(" team.txt ").unwrap(),
            PathBuf::from("/srv/lists/team.txt")
        );
        assert_eq!(
            store.path("./archive/team.txt").unwrap(),
            PathBuf::from("/srv/lists/archive/team.txt")
        );

        for escaping in ["../x", "/tmp/x", "archive/../../x"] {
            let err = store.path(escaping).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::PermissionDenied, "{}", escaping);
        }
    }

    #[test]
    fn test_escaping_names_map_to_persistence_errors() {
        let dir = tempdir().unwrap();
        let store = ListStore::new(dir.path());
        assert!(matches!(
            store.write("../x", &Bindings::new()),
            Err(PersistenceError::Unwritable { .. })
        ));
        assert!(matches!(
            store.read("/etc/hostname"),
            Err(PersistenceError::Unreadable { .. })
        ));
    }
}
