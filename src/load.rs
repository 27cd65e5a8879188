//! Reading engine JSON documents from disk.

use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use std::io::Write;

    #[test]
    fn test_load_json_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"year\": 1962}}").unwrap();
        let snapshot: Snapshot = load_json(file.path()).unwrap();
        assert_eq!(snapshot.year, 1962);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{").unwrap();
        let err = load_json::<Snapshot>(broken.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref path, .. } if path == broken.path()));
    }
}
