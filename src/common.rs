/// The common module is our ugly grab bag of common toys. Though a fully generalized common module
/// is _typically_ a bad idea, we have few enough things in it that it's OK for now.
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::sync::Mutex;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::errors::{PulseError, Result};

// Version loaded from .version file at compile time
pub const VERSION: &str = include_str!(".version");

/// A calendar date that may be known only down to the year or month, as release dates often
/// are. Ordering treats missing parts as zero, so `1999` sorts before `1999-01` sorts before
/// `1999-01-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlexDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

static FLEX_DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?(?:[T\s].*)?$").unwrap());

impl FlexDate {
    /// Parse `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`, tolerating a trailing time component. Returns
    /// None for anything else; callers treat that as a missing date, not an error.
    pub fn parse(value: &str) -> Option<FlexDate> {
        let caps = FLEX_DATE_REGEX.captures(value.trim())?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2).and_then(|m| m.as_str().parse().ok());
        let day = caps.get(3).and_then(|d| d.as_str().parse().ok());
        Some(FlexDate { year, month, day })
    }
}

impl fmt::Display for FlexDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(month), Some(day)) => write!(f, "{:04}-{:02}-{:02}", self.year, month, day),
            (Some(month), None) => write!(f, "{:04}-{:02}", self.year, month),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

impl Serialize for FlexDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn uniq<T: Clone + Eq + Hash>(xs: Vec<T>) -> Vec<T> {
    let mut rv = Vec::new();
    let mut seen = HashSet::new();
    for x in xs {
        if seen.insert(x.clone()) {
            rv.push(x);
        }
    }
    rv
}

static LOGGING_INITIALIZED: Mutex<bool> = Mutex::new(false);

/// Initialize process-wide logging. Output is "stderr" or "file"; file logs land under the
/// user's state directory and rotate out after ten files. Safe to call repeatedly; only the
/// first call takes effect. Tests get their own capture writer via `testing::init` instead.
pub fn initialize_logging(output: &str) -> Result<()> {
    let mut initialized = LOGGING_INITIALIZED.lock().unwrap();
    if *initialized {
        return Ok(());
    }
    *initialized = true;
    drop(initialized);

    let proj_dirs = ProjectDirs::from("", "", "pulse")
        .ok_or_else(|| PulseError::Generic("failed to determine project directories".to_string()))?;
    let log_dir = if cfg!(target_os = "macos") {
        proj_dirs.cache_dir()
    } else {
        proj_dirs.state_dir().unwrap_or(proj_dirs.cache_dir())
    };
    fs::create_dir_all(log_dir)?;

    let log_despite_testing = std::env::var("LOG_TEST").is_ok();
    let is_testing = std::env::var("CARGO_TEST").is_ok();
    if is_testing && !log_despite_testing {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if output == "file" {
        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .max_log_files(10)
            .filename_prefix("pulse")
            .filename_suffix("log")
            .build(log_dir)
            .map_err(|e| PulseError::Generic(format!("failed to create log file appender: {e}")))?;

        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| PulseError::Generic(format!("failed to install logging subscriber: {e}")))?;
    } else {
        let subscriber = tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(!log_despite_testing)
            .with_line_number(log_despite_testing)
            .with_file(log_despite_testing)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| PulseError::Generic(format!("failed to install logging subscriber: {e}")))?;
    }

    Ok(())
}
