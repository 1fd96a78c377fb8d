/// Typed records for the six datasets, plus the decoders that produce them from raw tables.
/// Decoding is fail-fast: a malformed count or date in any row aborts the whole dataset with
/// an error naming the row and column. Fields that are merely informative (image URLs,
/// imprecise release dates, start times) decode gracefully to None instead.
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::common::{uniq, FlexDate};
use crate::csv::RawTable;
use crate::errors::{LoadError, LoadErrorKind, Result, SchemaError};
use crate::source::Dataset;

/// Separator used inside multi-valued cells, e.g. the genre lists.
pub const GENRE_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistKind {
    Person,
    Group,
}

impl ArtistKind {
    /// The source data spells artist types several ways, some localized. Anything we do not
    /// recognize is treated as a person.
    pub fn decode(value: &str) -> ArtistKind {
        match value.trim().to_lowercase().as_str() {
            "group" | "band" | "banda" | "grupo" => ArtistKind::Group,
            "person" | "singer" | "cantor" | "cantora" => ArtistKind::Person,
            other => {
                if !other.is_empty() {
                    debug!("unrecognized artist type {other:?}, treating as person");
                }
                ArtistKind::Person
            }
        }
    }
}

impl fmt::Display for ArtistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtistKind::Person => write!(f, "Person"),
            ArtistKind::Group => write!(f, "Group"),
        }
    }
}

/// Ticket availability for a show, as the source reports it. Only `Tickets` and
/// `SetReminder` represent an actionable link; the rest render without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    Tickets,
    SetReminder,
    SoldOut,
    Unavailable,
    Other(String),
}

impl TicketStatus {
    pub fn decode(value: &str) -> TicketStatus {
        match value.trim() {
            "Tickets" => TicketStatus::Tickets,
            "Set Reminder" => TicketStatus::SetReminder,
            "Sold Out" => TicketStatus::SoldOut,
            "" => TicketStatus::Unavailable,
            other => TicketStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Tickets => "Tickets",
            TicketStatus::SetReminder => "Set Reminder",
            TicketStatus::SoldOut => "Sold Out",
            TicketStatus::Unavailable => "Unavailable",
            TicketStatus::Other(s) => s,
        }
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub kind: ArtistKind,
    pub country: String,
    /// Deduplicated, in first-seen order.
    pub genres: Vec<String>,
    pub popularity: i64,
    pub followers: i64,
    pub image_url: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub artist_id: String,
    pub name: String,
    pub popularity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub artist_id: String,
    pub name: String,
    pub kind: String,
    pub release_date: Option<FlexDate>,
    pub total_tracks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowEvent {
    pub artist_id: String,
    pub venue_name: String,
    pub venue_city: String,
    pub venue_country: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub ticket_url: Option<String>,
    pub ticket_status: TicketStatus,
}

impl ShowEvent {
    /// The URL to offer for this show, if any. A URL alone is not enough: a sold out or
    /// unavailable show renders without a link even when the source carries one.
    pub fn ticket_link(&self) -> Option<&str> {
        match self.ticket_status {
            TicketStatus::Tickets | TicketStatus::SetReminder => self.ticket_url.as_deref(),
            _ => None,
        }
    }
}

/// One edge in the related-artists graph. The related side is identified by name only;
/// `related_genres` stays in its delimited form so genre tallies can count repeats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedArtistLink {
    pub artist_id: String,
    pub related_name: String,
    pub related_popularity: i64,
    pub related_genres: String,
}

/// Records that belong to a single artist and can be filtered by its id.
pub trait ArtistScoped {
    fn artist_id(&self) -> &str;
}

impl ArtistScoped for Track {
    fn artist_id(&self) -> &str {
        &self.artist_id
    }
}

impl ArtistScoped for Album {
    fn artist_id(&self) -> &str {
        &self.artist_id
    }
}

impl ArtistScoped for ShowEvent {
    fn artist_id(&self) -> &str {
        &self.artist_id
    }
}

impl ArtistScoped for RelatedArtistLink {
    fn artist_id(&self) -> &str {
        &self.artist_id
    }
}

pub fn decode_artists(table: &RawTable) -> Result<Vec<Artist>> {
    let dataset = Dataset::Artists;
    let id = require_column(dataset, table, "id")?;
    let name = require_column(dataset, table, "name")?;
    let kind = require_column(dataset, table, "type")?;
    let country = require_column(dataset, table, "country")?;
    let genres = require_column(dataset, table, "genres")?;
    let popularity = require_column(dataset, table, "popularity")?;
    let followers = require_column(dataset, table, "followers")?;
    let image_url = require_column(dataset, table, "image_url")?;
    let profile_url = require_column(dataset, table, "profile_url")?;
    let mut artists = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        artists.push(Artist {
            id: row[id].trim().to_string(),
            name: row[name].trim().to_string(),
            kind: ArtistKind::decode(&row[kind]),
            country: row[country].trim().to_string(),
            genres: uniq(split_genres(&row[genres])),
            popularity: parse_int(dataset, i + 1, "popularity", &row[popularity])?,
            followers: parse_int(dataset, i + 1, "followers", &row[followers])?,
            image_url: opt_string(&row[image_url]),
            profile_url: opt_string(&row[profile_url]),
        });
    }
    Ok(artists)
}

pub fn decode_tracks(table: &RawTable) -> Result<Vec<Track>> {
    let dataset = Dataset::Tracks;
    let artist_id = require_column(dataset, table, "artist_id")?;
    let name = require_column(dataset, table, "name")?;
    let popularity = require_column(dataset, table, "popularity")?;
    let mut tracks = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        tracks.push(Track {
            artist_id: row[artist_id].trim().to_string(),
            name: row[name].trim().to_string(),
            popularity: parse_int(dataset, i + 1, "popularity", &row[popularity])?,
        });
    }
    Ok(tracks)
}

pub fn decode_albums(table: &RawTable) -> Result<Vec<Album>> {
    let dataset = Dataset::Albums;
    let artist_id = require_column(dataset, table, "artist_id")?;
    let name = require_column(dataset, table, "name")?;
    let kind = require_column(dataset, table, "type")?;
    let release_date = require_column(dataset, table, "release_date")?;
    let total_tracks = require_column(dataset, table, "total_tracks")?;
    let mut albums = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        albums.push(Album {
            artist_id: row[artist_id].trim().to_string(),
            name: row[name].trim().to_string(),
            kind: row[kind].trim().to_string(),
            release_date: FlexDate::parse(&row[release_date]),
            total_tracks: parse_int(dataset, i + 1, "total_tracks", &row[total_tracks])?,
        });
    }
    Ok(albums)
}

/// Shared by the past and future event datasets, which carry identical columns.
pub fn decode_events(dataset: Dataset, table: &RawTable) -> Result<Vec<ShowEvent>> {
    let artist_id = require_column(dataset, table, "artist_id")?;
    let venue_name = require_column(dataset, table, "venue_name")?;
    let venue_city = require_column(dataset, table, "venue_city")?;
    let venue_country = require_column(dataset, table, "venue_country")?;
    let event_date = require_column(dataset, table, "event_date")?;
    let start_time = require_column(dataset, table, "start_time")?;
    let ticket_url = require_column(dataset, table, "ticket_url")?;
    let ticket_status = require_column(dataset, table, "ticket_status")?;
    let mut events = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        events.push(ShowEvent {
            artist_id: row[artist_id].trim().to_string(),
            venue_name: row[venue_name].trim().to_string(),
            venue_city: row[venue_city].trim().to_string(),
            venue_country: row[venue_country].trim().to_string(),
            event_date: parse_date(dataset, i + 1, "event_date", &row[event_date])?,
            start_time: parse_time_opt(&row[start_time]),
            ticket_url: opt_string(&row[ticket_url]),
            ticket_status: TicketStatus::decode(&row[ticket_status]),
        });
    }
    Ok(events)
}

pub fn decode_related(table: &RawTable) -> Result<Vec<RelatedArtistLink>> {
    let dataset = Dataset::RelatedArtists;
    let artist_id = require_column(dataset, table, "artist_id")?;
    let related_name = require_column(dataset, table, "related_name")?;
    let related_popularity = require_column(dataset, table, "related_popularity")?;
    let related_genres = require_column(dataset, table, "related_genres")?;
    let mut links = Vec::with_capacity(table.len());
    for (i, row) in table.rows.iter().enumerate() {
        links.push(RelatedArtistLink {
            artist_id: row[artist_id].trim().to_string(),
            related_name: row[related_name].trim().to_string(),
            related_popularity: parse_int(dataset, i + 1, "related_popularity", &row[related_popularity])?,
            related_genres: row[related_genres].trim().to_string(),
        });
    }
    Ok(links)
}

fn require_column(dataset: Dataset, table: &RawTable, column: &'static str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| SchemaError { dataset, column }.into())
}

fn parse_int(dataset: Dataset, row: usize, column: &'static str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| {
        LoadError {
            dataset,
            kind: LoadErrorKind::InvalidValue {
                row,
                column,
                message: format!("not an integer: {value:?}"),
            },
        }
        .into()
    })
}

fn parse_date(dataset: Dataset, row: usize, column: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LoadError {
            dataset,
            kind: LoadErrorKind::InvalidValue {
                row,
                column,
                message: format!("not a date: {value:?}"),
            },
        }
        .into()
    })
}

fn parse_time_opt(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn opt_string(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn split_genres(value: &str) -> Vec<String> {
    value
        .split(GENRE_SEPARATOR)
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}
