use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};

use serde::Deserialize;

use crate::cache::DatasetCache;
use crate::csv::RawTable;
use crate::errors::{LoadError, LoadErrorKind};
use crate::session::Session;
use crate::source::{Dataset, DatasetSource};

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

// A small catalog of three artists: Nova tours and releases a lot, Luna Ray has a few
// tracks and one album, Mosaico has one track and nothing else.
static FIXTURE_CATALOG: &str = include_str!("fixtures.json");

#[derive(Deserialize)]
struct FixtureTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct FixtureCatalog {
    artists: FixtureTable,
    tracks: FixtureTable,
    albums: FixtureTable,
    past_events: FixtureTable,
    future_events: FixtureTable,
    related_artists: FixtureTable,
}

impl From<FixtureTable> for RawTable {
    fn from(table: FixtureTable) -> RawTable {
        RawTable { headers: table.headers, rows: table.rows }
    }
}

/// Counts `load` calls per dataset, for asserting on cache behavior. Clones share counts.
#[derive(Clone, Default)]
pub struct LoadCounter(Arc<Mutex<HashMap<Dataset, usize>>>);

impl LoadCounter {
    pub fn count(&self, dataset: Dataset) -> usize {
        *self.0.lock().unwrap().get(&dataset).unwrap_or(&0)
    }

    fn increment(&self, dataset: Dataset) {
        *self.0.lock().unwrap().entry(dataset).or_insert(0) += 1;
    }
}

/// An in-memory `DatasetSource` over literal tables. Datasets without a table behave like
/// missing files, which lets tests exercise the load failure paths.
pub struct MemorySource {
    tables: HashMap<Dataset, RawTable>,
    counter: LoadCounter,
}

impl MemorySource {
    pub fn new(tables: HashMap<Dataset, RawTable>) -> MemorySource {
        MemorySource { tables, counter: LoadCounter::default() }
    }

    /// A source seeded with the fixture catalog.
    pub fn seeded() -> MemorySource {
        let catalog: FixtureCatalog =
            serde_json::from_str(FIXTURE_CATALOG).expect("failed to parse fixture catalog");
        let mut tables: HashMap<Dataset, RawTable> = HashMap::new();
        tables.insert(Dataset::Artists, catalog.artists.into());
        tables.insert(Dataset::Tracks, catalog.tracks.into());
        tables.insert(Dataset::Albums, catalog.albums.into());
        tables.insert(Dataset::PastEvents, catalog.past_events.into());
        tables.insert(Dataset::FutureEvents, catalog.future_events.into());
        tables.insert(Dataset::RelatedArtists, catalog.related_artists.into());
        MemorySource::new(tables)
    }

    pub fn counter(&self) -> LoadCounter {
        self.counter.clone()
    }

    pub fn set_table(&mut self, dataset: Dataset, table: RawTable) {
        self.tables.insert(dataset, table);
    }

    pub fn remove_table(&mut self, dataset: Dataset) {
        self.tables.remove(&dataset);
    }
}

impl DatasetSource for MemorySource {
    fn load(&self, dataset: Dataset) -> Result<RawTable, LoadError> {
        self.counter.increment(dataset);
        match self.tables.get(&dataset) {
            Some(table) => Ok(table.clone()),
            None => Err(LoadError {
                dataset,
                kind: LoadErrorKind::FileNotFound {
                    path: PathBuf::from(format!("<memory>/{}.csv", dataset.name())),
                },
            }),
        }
    }
}

pub fn seeded_cache() -> Arc<DatasetCache> {
    Arc::new(DatasetCache::new(Box::new(MemorySource::seeded())))
}

pub fn seeded_session() -> Session {
    init();
    Session::new(seeded_cache())
}
