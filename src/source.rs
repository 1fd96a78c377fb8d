/// The dashboard is fed by six datasets, one CSV file each. This module names them and
/// defines the trait through which the rest of the crate obtains their raw tables. The
/// stock implementation reads `<data_dir>/<dataset>.csv`; tests substitute an in-memory
/// source.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::csv::{self, RawTable};
use crate::errors::{LoadError, LoadErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Artists,
    Tracks,
    Albums,
    PastEvents,
    FutureEvents,
    RelatedArtists,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::Artists,
        Dataset::Tracks,
        Dataset::Albums,
        Dataset::PastEvents,
        Dataset::FutureEvents,
        Dataset::RelatedArtists,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Artists => "artists",
            Dataset::Tracks => "tracks",
            Dataset::Albums => "albums",
            Dataset::PastEvents => "past_events",
            Dataset::FutureEvents => "future_events",
            Dataset::RelatedArtists => "related_artists",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where raw dataset tables come from. Implementations do no decoding; they hand back the
/// parsed CSV as-is and leave typing to the record decoders.
pub trait DatasetSource: Send + Sync {
    fn load(&self, dataset: Dataset) -> Result<RawTable, LoadError>;
}

/// Reads datasets from CSV files in a single directory, named `<dataset>.csv`.
pub struct CsvDatasetSource {
    data_dir: PathBuf,
}

impl CsvDatasetSource {
    pub fn new(data_dir: PathBuf) -> CsvDatasetSource {
        CsvDatasetSource { data_dir }
    }

    pub fn path_for(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(format!("{}.csv", dataset.name()))
    }
}

impl DatasetSource for CsvDatasetSource {
    fn load(&self, dataset: Dataset) -> Result<RawTable, LoadError> {
        let path = self.path_for(dataset);
        if !path.exists() {
            return Err(LoadError {
                dataset,
                kind: LoadErrorKind::FileNotFound { path },
            });
        }
        let content = read_file(dataset, &path)?;
        let table = csv::parse(&content).map_err(|e| LoadError {
            dataset,
            kind: LoadErrorKind::Malformed(e),
        })?;
        debug!("loaded dataset {} from {}: {} rows", dataset, path.display(), table.len());
        Ok(table)
    }
}

fn read_file(dataset: Dataset, path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError {
        dataset,
        kind: LoadErrorKind::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_names() {
        assert_eq!(Dataset::Artists.name(), "artists");
        assert_eq!(Dataset::PastEvents.name(), "past_events");
        assert_eq!(Dataset::RelatedArtists.to_string(), "related_artists");
    }

    #[test]
    fn test_all_covers_every_dataset() {
        assert_eq!(Dataset::ALL.len(), 6);
        let names: Vec<&str> = Dataset::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec!["artists", "tracks", "albums", "past_events", "future_events", "related_artists"]
        );
    }
}
