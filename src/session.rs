/// A session owns one selection and computes page payloads against the dataset cache. The
/// cache can be private to the session or shared between sessions behind an `Arc`; the
/// selection is never shared. Pages are recomputed only when asked for, and `select_artist`
/// tells the caller whether a recompute is worth doing.
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::DatasetCache;
use crate::config::Config;
use crate::errors::{PulseExpectedError, Result};
use crate::pages::{self, AlbumsPage, HomePage, OverviewPage, Page, RelatedPage, ShowsPage, TracksPage};
use crate::records::Artist;
use crate::selection::{ArtistChoice, SelectionState};
use crate::source::CsvDatasetSource;

pub struct Session {
    cache: Arc<DatasetCache>,
    selection: SelectionState,
    overview_show_limit: usize,
    histogram_bin_width: i64,
}

impl Session {
    pub fn new(cache: Arc<DatasetCache>) -> Session {
        Session {
            cache,
            selection: SelectionState::new(),
            overview_show_limit: 5,
            histogram_bin_width: 10,
        }
    }

    /// A session with a private cache reading CSVs from the configured data directory.
    pub fn from_config(config: &Config) -> Session {
        let source = CsvDatasetSource::new(config.data_dir.clone());
        let cache = Arc::new(DatasetCache::new(Box::new(source)));
        Session::with_shared_cache(config, cache)
    }

    /// A session over an existing cache. This is how a multi-session deployment shares one
    /// set of loaded datasets while keeping selections independent.
    pub fn with_shared_cache(config: &Config, cache: Arc<DatasetCache>) -> Session {
        Session {
            cache,
            selection: SelectionState::new(),
            overview_show_limit: config.overview_show_limit,
            histogram_bin_width: config.histogram_bin_width,
        }
    }

    pub fn cache(&self) -> &Arc<DatasetCache> {
        &self.cache
    }

    /// All artists as `(id, name)` choices, sorted by name. Every page embeds this.
    pub fn artist_roster(&self) -> Result<Vec<ArtistChoice>> {
        let artists = self.cache.artists()?;
        Ok(roster(&artists))
    }

    /// Switch the session to the given artist. The id must exist in the artist table.
    /// Returns whether the selection changed; callers skip recomputing pages on false.
    pub fn select_artist(&self, id: &str) -> Result<bool> {
        let artists = self.cache.artists()?;
        let artist = artists
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| PulseExpectedError::ArtistDoesNotExist { id: id.to_string() })?;
        let changed = self.selection.select(&artist.id, &artist.name);
        if changed {
            debug!("selection changed to {} ({})", artist.name, artist.id);
        }
        Ok(changed)
    }

    pub fn home_page(&self) -> Result<Page<HomePage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let body = pages::home(&artists);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    pub fn overview_page(&self) -> Result<Page<OverviewPage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let artist = artists
            .iter()
            .find(|a| a.id == selected.id)
            .ok_or_else(|| PulseExpectedError::ArtistDoesNotExist { id: selected.id.clone() })?;
        let past = self.cache.past_events()?;
        let future = self.cache.future_events()?;
        let body = pages::overview(artist, &past, &future, self.overview_show_limit);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    pub fn tracks_page(&self) -> Result<Page<TracksPage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let tracks = self.cache.tracks()?;
        let body = pages::tracks(&selected.id, &tracks, self.histogram_bin_width);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    pub fn albums_page(&self) -> Result<Page<AlbumsPage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let albums = self.cache.albums()?;
        let body = pages::albums(&selected.id, &albums);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    pub fn shows_page(&self) -> Result<Page<ShowsPage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let past = self.cache.past_events()?;
        let future = self.cache.future_events()?;
        let body = pages::shows(&selected.id, &past, &future);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    pub fn related_artists_page(&self) -> Result<Page<RelatedPage>> {
        let selected = self.ensure_ready()?;
        let artists = self.cache.artists()?;
        let links = self.cache.related_artists()?;
        let body = pages::related(&selected.id, &links, &artists);
        Ok(Page { roster: roster(&artists), selected, body })
    }

    // Seeds the selection with the alphabetically-first artist name on first use. An empty
    // artist table cannot produce any page.
    fn ensure_ready(&self) -> Result<ArtistChoice> {
        if let Some(current) = self.selection.current() {
            return Ok(current);
        }
        let artists = self.cache.artists()?;
        let default = artists
            .iter()
            .min_by(|a, b| a.name.cmp(&b.name))
            .ok_or(PulseExpectedError::NoArtists)?;
        info!("no artist selected, defaulting to {}", default.name);
        Ok(self.selection.ensure_initialized(&default.id, &default.name))
    }
}

fn roster(artists: &[Artist]) -> Vec<ArtistChoice> {
    let mut roster: Vec<ArtistChoice> = artists
        .iter()
        .map(|a| ArtistChoice { id: a.id.clone(), name: a.name.clone() })
        .collect();
    roster.sort_by(|a, b| a.name.cmp(&b.name));
    roster
}
