use std::sync::Arc;

use crate::errors::{LoadErrorKind, PulseError, PulseExpectedError};
use crate::source::Dataset;
use crate::testing;

#[test]
fn test_load_is_memoized() {
    testing::init();
    let source = testing::MemorySource::seeded();
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    let first = cache.artists().unwrap();
    let second = cache.artists().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counter.count(Dataset::Artists), 1);
}

#[test]
fn test_datasets_cache_independently() {
    testing::init();
    let source = testing::MemorySource::seeded();
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    cache.artists().unwrap();
    cache.tracks().unwrap();
    cache.tracks().unwrap();
    assert_eq!(counter.count(Dataset::Artists), 1);
    assert_eq!(counter.count(Dataset::Tracks), 1);
    assert_eq!(counter.count(Dataset::Albums), 0);
}

#[test]
fn test_invalidate_forces_single_reload() {
    testing::init();
    let source = testing::MemorySource::seeded();
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    cache.past_events().unwrap();
    cache.invalidate(Dataset::PastEvents);
    cache.past_events().unwrap();
    cache.past_events().unwrap();
    assert_eq!(counter.count(Dataset::PastEvents), 2);
}

#[test]
fn test_invalidate_is_per_dataset() {
    testing::init();
    let source = testing::MemorySource::seeded();
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    cache.artists().unwrap();
    cache.tracks().unwrap();
    cache.invalidate(Dataset::Artists);
    cache.artists().unwrap();
    cache.tracks().unwrap();
    assert_eq!(counter.count(Dataset::Artists), 2);
    assert_eq!(counter.count(Dataset::Tracks), 1);
}

#[test]
fn test_invalidate_all() {
    testing::init();
    let source = testing::MemorySource::seeded();
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    cache.artists().unwrap();
    cache.albums().unwrap();
    cache.invalidate_all();
    cache.artists().unwrap();
    cache.albums().unwrap();
    assert_eq!(counter.count(Dataset::Artists), 2);
    assert_eq!(counter.count(Dataset::Albums), 2);
}

#[test]
fn test_failed_load_is_not_cached() {
    testing::init();
    let mut source = testing::MemorySource::seeded();
    source.remove_table(Dataset::Tracks);
    let counter = source.counter();
    let cache = crate::cache::DatasetCache::new(Box::new(source));

    let err = cache.tracks().unwrap_err();
    assert!(matches!(
        err,
        PulseError::Expected(PulseExpectedError::Load(crate::errors::LoadError {
            dataset: Dataset::Tracks,
            kind: LoadErrorKind::FileNotFound { .. },
        }))
    ));
    assert!(cache.tracks().is_err());
    assert_eq!(counter.count(Dataset::Tracks), 2);
}
