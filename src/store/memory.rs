use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::{Result, RouterError};

use super::rows::PatternRows;
use super::{Pattern, PatternStore};

/// In-memory pattern store
pub struct MemoryPatternStore {
    rows: Mutex<PatternRows>,
    live: watch::Sender<Vec<Pattern>>,
}

impl MemoryPatternStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (live, _) = watch::channel(Vec::new());
        Self {
            rows: Mutex::new(PatternRows::default()),
            live,
        }
    }

    /// Create a store holding the given patterns. Duplicates are skipped.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let store = Self::new();
        {
            let mut rows = store.rows.lock();
            for pattern in patterns {
                match rows.insert(pattern.as_ref()) {
                    Ok(_) | Err(RouterError::AlreadyExists(_)) => {}
                    Err(e) => return Err(e),
                }
            }
            store.live.send_replace(rows.patterns().to_vec());
        }
        Ok(store)
    }
}

impl Default for MemoryPatternStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternStore for MemoryPatternStore {
    fn list(&self) -> Result<Vec<Pattern>> {
        Ok(self.rows.lock().patterns().to_vec())
    }

    fn add(&self, pattern: &str) -> Result<Pattern> {
        let mut rows = self.rows.lock();
        let row = rows.insert(pattern)?;
        self.live.send_replace(rows.patterns().to_vec());
        Ok(row)
    }

    fn remove(&self, pattern: &Pattern) -> Result<()> {
        let mut rows = self.rows.lock();
        if rows.remove(pattern.id).is_some() {
            self.live.send_replace(rows.patterns().to_vec());
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Pattern>> {
        self.live.subscribe()
    }
}
