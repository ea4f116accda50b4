//! Pattern store module.
//!
//! Durable, deduplicated list of domain patterns. Writes are serialized by
//! the store; readers get point-in-time snapshots ordered by pattern text.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{Result, RouterError};

mod editor;
mod file;
mod memory;
mod rows;

pub use editor::{PatternEditor, UiEvent, DUPLICATE_PATTERN_MESSAGE};
pub(crate) use file::temp_path_for;
pub use file::{FilePatternStore, DEFAULT_STORE_FILENAME};
pub use memory::MemoryPatternStore;

/// Patterns seeded into an empty store on first use
pub const DEFAULT_PATTERNS: [&str; 8] = [
    "google.com",
    "youtube.com",
    ".bruc",
    ".lan",
    "github.com",
    "grok.com",
    "x.com",
    "claude.ai",
];

/// A stored pattern row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    /// Store-assigned row id
    pub id: u64,
    /// Unique pattern text
    pub pattern: String,
}

/// Pattern store interface.
pub trait PatternStore: Send + Sync {
    /// List all patterns ordered by pattern text.
    fn list(&self) -> Result<Vec<Pattern>>;

    /// Add a pattern.
    ///
    /// The text is trimmed first. Blank text and a bare `.` are rejected;
    /// text already present returns `AlreadyExists`.
    fn add(&self, pattern: &str) -> Result<Pattern>;

    /// Remove a pattern by row id. Removing a missing row is a no-op.
    fn remove(&self, pattern: &Pattern) -> Result<()>;

    /// Subscribe to the live pattern list.
    fn subscribe(&self) -> watch::Receiver<Vec<Pattern>>;

    /// Pattern texts of the current snapshot, in list order.
    fn snapshot(&self) -> Result<Vec<String>> {
        Ok(self.list()?.into_iter().map(|p| p.pattern).collect())
    }

    /// Seed the default patterns if the store is empty.
    ///
    /// Returns true if the defaults were inserted.
    fn seed_defaults(&self) -> Result<bool> {
        if !self.list()?.is_empty() {
            return Ok(false);
        }
        for pattern in DEFAULT_PATTERNS {
            match self.add(pattern) {
                Ok(_) | Err(RouterError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }
}

/// Trim user input and reject patterns that can never match a real host
pub fn normalize_pattern(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RouterError::EmptyPattern);
    }
    if trimmed == "." {
        return Err(RouterError::InvalidPattern(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
