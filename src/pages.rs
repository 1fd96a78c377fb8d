/// Payload builders for the dashboard pages. Each builder is a pure function from decoded
/// records to a serializable payload struct; the renderer owns layout and visual encoding
/// and reads everything it needs from the payload. Emptiness is data here, not an error:
/// an artist with no shows gets zero counts and `has_shows: false`, never a failure.
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::common::FlexDate;
use crate::errors::{PulseError, Result};
use crate::geo;
use crate::query::{self, TimeBucket, TimeGranularity};
use crate::records::{Album, Artist, RelatedArtistLink, ShowEvent, Track, GENRE_SEPARATOR};
use crate::selection::ArtistChoice;

/// The popularity ladder, highest threshold first. Values below every threshold fall into
/// the default label.
pub const POPULARITY_BUCKETS: [(i64, &str); 3] =
    [(70, "very popular"), (50, "popular"), (30, "moderate")];
pub const POPULARITY_DEFAULT_LABEL: &str = "low";

/// A complete page payload: the artist roster and current selection that every page embeds,
/// plus the page-specific body flattened alongside them.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub roster: Vec<ArtistChoice>,
    pub selected: ArtistChoice,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Page<T> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| PulseError::Generic(format!("failed to serialize page payload: {e}")))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub artist_count: usize,
}

pub fn home(artists: &[Artist]) -> HomePage {
    HomePage { artist_count: artists.len() }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowSummary {
    pub venue_name: String,
    pub venue_city: String,
    pub venue_country: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub ticket_link: Option<String>,
}

impl ShowSummary {
    fn from_event(event: &ShowEvent) -> ShowSummary {
        ShowSummary {
            venue_name: event.venue_name.clone(),
            venue_city: event.venue_city.clone(),
            venue_country: event.venue_country.clone(),
            event_date: event.event_date,
            start_time: event.start_time,
            ticket_link: event.ticket_link().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub artist: Artist,
    pub upcoming_shows: Vec<ShowSummary>,
    pub recent_shows: Vec<ShowSummary>,
    pub has_shows: bool,
}

/// The artist profile page: the full artist record plus a glance at its nearest shows,
/// `show_limit` per side.
pub fn overview(
    artist: &Artist,
    past: &[ShowEvent],
    future: &[ShowEvent],
    show_limit: usize,
) -> OverviewPage {
    let mut upcoming = query::filter_by_artist(future, &artist.id);
    query::sort_by_key(&mut upcoming, |e| Some(e.event_date), true, true);
    upcoming.truncate(show_limit);

    let mut recent = query::filter_by_artist(past, &artist.id);
    query::sort_by_key(&mut recent, |e| Some(e.event_date), false, true);
    recent.truncate(show_limit);

    let has_shows = !upcoming.is_empty() || !recent.is_empty();
    OverviewPage {
        artist: artist.clone(),
        upcoming_shows: upcoming.into_iter().map(ShowSummary::from_event).collect(),
        recent_shows: recent.into_iter().map(ShowSummary::from_event).collect(),
        has_shows,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackSummary {
    pub name: String,
    pub popularity: i64,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    pub lower_bound: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TracksPage {
    pub tracks: Vec<TrackSummary>,
    pub avg_popularity: Option<f64>,
    pub max_popularity: Option<i64>,
    pub histogram: Vec<HistogramBin>,
    pub categories: Vec<CategoryCount>,
}

pub fn tracks(artist_id: &str, all_tracks: &[Track], bin_width: i64) -> TracksPage {
    let mut mine = query::filter_by_artist(all_tracks, artist_id);
    query::sort_by_key(&mut mine, |t| Some(t.popularity), false, true);

    let avg_popularity = query::mean(mine.iter().map(|t| t.popularity));
    let max_popularity = mine.iter().map(|t| t.popularity).max();
    let histogram = query::histogram(mine.iter().map(|t| t.popularity), bin_width)
        .into_iter()
        .map(|(lower_bound, count)| HistogramBin { lower_bound, count })
        .collect();
    let categories = query::group_count(mine.iter().map(|t| popularity_label(t.popularity)))
        .into_iter()
        .map(|(label, count)| CategoryCount { label: label.to_string(), count })
        .collect();
    let tracks = mine
        .into_iter()
        .map(|t| TrackSummary {
            name: t.name.clone(),
            popularity: t.popularity,
            category: popularity_label(t.popularity),
        })
        .collect();
    TracksPage { tracks, avg_popularity, max_popularity, histogram, categories }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesPoint {
    pub bucket: TimeBucket,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumSummary {
    pub name: String,
    pub kind: String,
    pub release_date: Option<FlexDate>,
    pub release_year: Option<i32>,
    pub total_tracks: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlbumsPage {
    pub albums: Vec<AlbumSummary>,
    pub album_count: usize,
    pub track_total: i64,
    pub kinds: Vec<CategoryCount>,
    pub releases_per_year: Vec<TimeSeriesPoint>,
}

/// The discography page, newest first. Albums with no parsable release date sink to the
/// bottom rather than disappearing.
pub fn albums(artist_id: &str, all_albums: &[Album]) -> AlbumsPage {
    let mut mine = query::filter_by_artist(all_albums, artist_id);
    query::sort_by_key(&mut mine, |a| a.release_date, false, true);

    let album_count = mine.len();
    let track_total: i64 = mine.iter().map(|a| a.total_tracks).sum();
    let kinds = query::group_count(mine.iter().map(|a| a.kind.clone()))
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    let releases_per_year =
        query::time_bucket_count(mine.iter().filter_map(|a| a.release_date.as_ref()), TimeGranularity::Year)
            .into_iter()
            .map(|(bucket, count)| TimeSeriesPoint { bucket, count })
            .collect();
    let albums = mine
        .into_iter()
        .map(|a| AlbumSummary {
            name: a.name.clone(),
            kind: a.kind.clone(),
            release_date: a.release_date,
            release_year: a.release_date.map(|d| d.year),
            total_tracks: a.total_tracks,
        })
        .collect();
    AlbumsPage { albums, album_count, track_total, kinds, releases_per_year }
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryShowCount {
    pub country: String,
    pub count: usize,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowsPage {
    pub future_shows: Vec<ShowSummary>,
    pub past_shows: Vec<ShowSummary>,
    pub total_shows: usize,
    pub future_count: usize,
    pub past_count: usize,
    pub country_count: usize,
    pub city_count: usize,
    pub shows_by_country: Vec<CountryShowCount>,
    pub shows_per_year: Vec<TimeSeriesPoint>,
    pub has_shows: bool,
}

/// The touring page: upcoming shows soonest first, past shows most recent first, and the
/// aggregates over both. Country rows carry centroid coordinates where the country is in
/// the reference table; map consumers drop the coordinate-less rows, the counts keep them.
pub fn shows(artist_id: &str, past: &[ShowEvent], future: &[ShowEvent]) -> ShowsPage {
    let mut future_mine = query::filter_by_artist(future, artist_id);
    query::sort_by_key(&mut future_mine, |e| Some(e.event_date), true, true);
    let mut past_mine = query::filter_by_artist(past, artist_id);
    query::sort_by_key(&mut past_mine, |e| Some(e.event_date), false, true);

    let all: Vec<&ShowEvent> = future_mine.iter().chain(past_mine.iter()).copied().collect();
    let future_count = future_mine.len();
    let past_count = past_mine.len();
    let total_shows = all.len();

    let shows_by_country: Vec<CountryShowCount> =
        query::group_count(all.iter().map(|e| e.venue_country.clone()))
            .into_iter()
            .map(|(country, count)| {
                let coordinates = geo::country_coordinates(&country);
                CountryShowCount {
                    count,
                    latitude: coordinates.map(|(lat, _)| lat),
                    longitude: coordinates.map(|(_, lon)| lon),
                    country,
                }
            })
            .collect();
    let country_count = shows_by_country.len();
    let city_count = query::group_count(all.iter().map(|e| e.venue_city.as_str())).len();

    let shows_per_year =
        query::time_bucket_count(all.iter().map(|e| &e.event_date), TimeGranularity::Year)
            .into_iter()
            .map(|(bucket, count)| TimeSeriesPoint { bucket, count })
            .collect();

    ShowsPage {
        future_shows: future_mine.into_iter().map(ShowSummary::from_event).collect(),
        past_shows: past_mine.into_iter().map(ShowSummary::from_event).collect(),
        total_shows,
        future_count,
        past_count,
        country_count,
        city_count,
        shows_by_country,
        shows_per_year,
        has_shows: total_shows > 0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedLinkSummary {
    pub name: String,
    pub popularity: i64,
    pub category: &'static str,
    /// The delimited genre field as the link carries it.
    pub genres: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedPage {
    pub links: Vec<RelatedLinkSummary>,
    /// Full artist profiles for links whose name resolves against the artist table.
    /// Links naming artists outside the catalog are absent here but still counted in
    /// the tallies.
    pub profiles: Vec<Artist>,
    pub genre_tally: Vec<CategoryCount>,
    pub avg_popularity: Option<f64>,
    pub categories: Vec<CategoryCount>,
}

pub fn related(artist_id: &str, links: &[RelatedArtistLink], artists: &[Artist]) -> RelatedPage {
    let mut mine = query::filter_by_artist(links, artist_id);
    query::sort_by_key(&mut mine, |l| Some(l.related_popularity), false, true);

    let profiles = mine
        .iter()
        .filter_map(|l| find_artist_by_name(artists, &l.related_name))
        .cloned()
        .collect();
    let genre_tally = query::group_count(query::explode_multi_value(
        mine.iter().map(|l| l.related_genres.as_str()),
        GENRE_SEPARATOR,
    ))
    .into_iter()
    .map(|(label, count)| CategoryCount { label, count })
    .collect();
    let avg_popularity = query::mean(mine.iter().map(|l| l.related_popularity));
    let categories = query::group_count(mine.iter().map(|l| popularity_label(l.related_popularity)))
        .into_iter()
        .map(|(label, count)| CategoryCount { label: label.to_string(), count })
        .collect();
    let links = mine
        .into_iter()
        .map(|l| RelatedLinkSummary {
            name: l.related_name.clone(),
            popularity: l.related_popularity,
            category: popularity_label(l.related_popularity),
            genres: l.related_genres.clone(),
        })
        .collect();

    RelatedPage { links, profiles, genre_tally, avg_popularity, categories }
}

fn popularity_label(popularity: i64) -> &'static str {
    query::bucketize(popularity, &POPULARITY_BUCKETS, POPULARITY_DEFAULT_LABEL)
}

// The related dataset identifies artists by display name only. Matching is
// case-insensitive; when several artists share a name, the first table row wins.
fn find_artist_by_name<'a>(artists: &'a [Artist], name: &str) -> Option<&'a Artist> {
    let needle = name.to_lowercase();
    artists.iter().find(|a| a.name.to_lowercase() == needle)
}
