/// Tracks which artist the dashboard is currently focused on. This is per-session UI state,
/// not persisted anywhere; a fresh session starts empty and is seeded with a default on
/// first use.
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistChoice {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct SelectionState {
    current: Mutex<Option<ArtistChoice>>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        SelectionState { current: Mutex::new(None) }
    }

    pub fn current(&self) -> Option<ArtistChoice> {
        self.current.lock().unwrap().clone()
    }

    /// Switch the selection. Returns whether the selection actually changed; selecting the
    /// already-selected artist is a no-op and callers skip their refresh work on false.
    pub fn select(&self, id: &str, name: &str) -> bool {
        let mut current = self.current.lock().unwrap();
        if matches!(current.as_ref(), Some(c) if c.id == id) {
            return false;
        }
        *current = Some(ArtistChoice { id: id.to_string(), name: name.to_string() });
        true
    }

    /// Seed the selection if nothing is selected yet, then return the current choice.
    pub fn ensure_initialized(&self, default_id: &str, default_name: &str) -> ArtistChoice {
        let mut current = self.current.lock().unwrap();
        match current.as_ref() {
            Some(c) => c.clone(),
            None => {
                let choice = ArtistChoice {
                    id: default_id.to_string(),
                    name: default_name.to_string(),
                };
                *current = Some(choice.clone());
                choice
            }
        }
    }
}
