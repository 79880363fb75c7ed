use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{Mentor, Submission};
use super::store::{DocumentStore, StoreError};

/// Point-in-time dump of both collections, keyed by collection name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub mentors: Vec<Mentor>,
    #[serde(default, rename = "kpiSubmissions")]
    pub kpi_submissions: Vec<Submission>,
}

impl StoreSnapshot {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        serde_json::from_reader(reader).map_err(SnapshotError::Parse)
    }

    /// Reads both collections from a live store.
    pub fn capture<S: DocumentStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self {
            mentors: store.list_mentors()?,
            kpi_submissions: store.list_submissions()?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),
}
