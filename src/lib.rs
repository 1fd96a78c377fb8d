pub mod cache;
pub mod common;
pub mod config;
pub mod csv;
pub mod errors;
pub mod geo;
pub mod pages;
pub mod query;
pub mod records;
pub mod selection;
pub mod session;
pub mod source;

pub use common::VERSION;
pub use config::Config;
pub use errors::{PulseError, PulseExpectedError, Result};
pub use session::Session;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
mod cache_test;
#[cfg(test)]
mod query_test;
