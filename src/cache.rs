/// The dataset cache memoizes decoded datasets in memory. Datasets change rarely (a scraper
/// refreshes them out of band), while the dashboard pages re-read them constantly, so each
/// dataset is loaded and decoded at most once and then shared as an `Arc` until invalidated.
///
/// A failed load is not cached: the error propagates to the caller and the next request
/// retries from the source.
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::csv::RawTable;
use crate::errors::Result;
use crate::records::{self, Album, Artist, RelatedArtistLink, ShowEvent, Track};
use crate::source::{Dataset, DatasetSource};

pub struct DatasetCache {
    source: Box<dyn DatasetSource>,
    artists: Mutex<Option<Arc<Vec<Artist>>>>,
    tracks: Mutex<Option<Arc<Vec<Track>>>>,
    albums: Mutex<Option<Arc<Vec<Album>>>>,
    past_events: Mutex<Option<Arc<Vec<ShowEvent>>>>,
    future_events: Mutex<Option<Arc<Vec<ShowEvent>>>>,
    related_artists: Mutex<Option<Arc<Vec<RelatedArtistLink>>>>,
}

impl DatasetCache {
    pub fn new(source: Box<dyn DatasetSource>) -> DatasetCache {
        DatasetCache {
            source,
            artists: Mutex::new(None),
            tracks: Mutex::new(None),
            albums: Mutex::new(None),
            past_events: Mutex::new(None),
            future_events: Mutex::new(None),
            related_artists: Mutex::new(None),
        }
    }

    pub fn artists(&self) -> Result<Arc<Vec<Artist>>> {
        self.get(Dataset::Artists, &self.artists, records::decode_artists)
    }

    pub fn tracks(&self) -> Result<Arc<Vec<Track>>> {
        self.get(Dataset::Tracks, &self.tracks, records::decode_tracks)
    }

    pub fn albums(&self) -> Result<Arc<Vec<Album>>> {
        self.get(Dataset::Albums, &self.albums, records::decode_albums)
    }

    pub fn past_events(&self) -> Result<Arc<Vec<ShowEvent>>> {
        self.get(Dataset::PastEvents, &self.past_events, |t| {
            records::decode_events(Dataset::PastEvents, t)
        })
    }

    pub fn future_events(&self) -> Result<Arc<Vec<ShowEvent>>> {
        self.get(Dataset::FutureEvents, &self.future_events, |t| {
            records::decode_events(Dataset::FutureEvents, t)
        })
    }

    pub fn related_artists(&self) -> Result<Arc<Vec<RelatedArtistLink>>> {
        self.get(Dataset::RelatedArtists, &self.related_artists, records::decode_related)
    }

    /// Drop the cached copy of one dataset. The next access reloads from the source.
    pub fn invalidate(&self, dataset: Dataset) {
        match dataset {
            Dataset::Artists => *self.artists.lock().unwrap() = None,
            Dataset::Tracks => *self.tracks.lock().unwrap() = None,
            Dataset::Albums => *self.albums.lock().unwrap() = None,
            Dataset::PastEvents => *self.past_events.lock().unwrap() = None,
            Dataset::FutureEvents => *self.future_events.lock().unwrap() = None,
            Dataset::RelatedArtists => *self.related_artists.lock().unwrap() = None,
        }
        debug!("invalidated dataset {dataset}");
    }

    pub fn invalidate_all(&self) {
        for dataset in Dataset::ALL {
            self.invalidate(dataset);
        }
    }

    // The slot lock is held across load and decode, so concurrent requests for the same
    // dataset perform a single load and an invalidate cannot interleave with a fill.
    fn get<T>(
        &self,
        dataset: Dataset,
        slot: &Mutex<Option<Arc<Vec<T>>>>,
        decode: impl Fn(&RawTable) -> Result<Vec<T>>,
    ) -> Result<Arc<Vec<T>>> {
        let mut slot = slot.lock().unwrap();
        if let Some(records) = slot.as_ref() {
            return Ok(Arc::clone(records));
        }
        let table = self.source.load(dataset)?;
        let records = Arc::new(decode(&table)?);
        debug!("cached dataset {}: {} records", dataset, records.len());
        *slot = Some(Arc::clone(&records));
        Ok(records)
    }
}
