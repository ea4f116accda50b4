use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::{Result, RouterError};

use super::{Pattern, PatternStore};

/// Message shown when a user adds a pattern that is already stored
pub const DUPLICATE_PATTERN_MESSAGE: &str = "Pattern already exists";

/// One-shot notification for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowMessage(String),
}

/// Editing front for a pattern store.
///
/// Trims user input, ignores blank submissions, and reports rejected adds
/// as one-shot [`UiEvent`]s. Each event is delivered once to the single
/// receiver returned by [`PatternEditor::new`].
pub struct PatternEditor {
    store: Arc<dyn PatternStore>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl PatternEditor {
    /// Create an editor, seeding the store with the defaults if it is empty.
    pub fn new(store: Arc<dyn PatternStore>) -> Result<(Self, mpsc::UnboundedReceiver<UiEvent>)> {
        if store.seed_defaults()? {
            debug!("seeded default patterns");
        }
        let (events, rx) = mpsc::unbounded_channel();
        Ok((Self { store, events }, rx))
    }

    /// Live pattern list for display
    pub fn patterns(&self) -> watch::Receiver<Vec<Pattern>> {
        self.store.subscribe()
    }

    /// Add user-entered text as a pattern.
    ///
    /// Returns the stored row, or None when the input was blank or rejected.
    pub fn add_pattern(&self, text: &str) -> Option<Pattern> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        match self.store.add(trimmed) {
            Ok(row) => Some(row),
            Err(RouterError::AlreadyExists(pattern)) => {
                debug!(pattern = %pattern, "duplicate pattern rejected");
                self.notify(DUPLICATE_PATTERN_MESSAGE);
                None
            }
            Err(e) => {
                warn!(pattern = %trimmed, error = %e, "failed to add pattern");
                self.notify(&e.to_string());
                None
            }
        }
    }

    /// Delete a stored pattern
    pub fn delete_pattern(&self, pattern: &Pattern) {
        if let Err(e) = self.store.remove(pattern) {
            warn!(pattern = %pattern.pattern, error = %e, "failed to delete pattern");
            self.notify(&e.to_string());
        }
    }

    fn notify(&self, message: &str) {
        // A dropped receiver means nobody is listening; the event is discarded
        let _ = self.events.send(UiEvent::ShowMessage(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryPatternStore, DEFAULT_PATTERNS};

    #[test]
    fn test_new_seeds_empty_store() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, _rx) = PatternEditor::new(store.clone()).unwrap();
        assert_eq!(store.list().unwrap().len(), DEFAULT_PATTERNS.len());
        assert_eq!(editor.patterns().borrow().len(), DEFAULT_PATTERNS.len());
    }

    #[test]
    fn test_duplicate_emits_one_event() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, mut rx) = PatternEditor::new(store).unwrap();

        assert!(editor.add_pattern("  example.org ").is_some());
        assert!(editor.add_pattern("example.org").is_none());

        assert_eq!(
            rx.try_recv().unwrap(),
            UiEvent::ShowMessage(DUPLICATE_PATTERN_MESSAGE.to_string())
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_blank_input_is_silent() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, mut rx) = PatternEditor::new(store.clone()).unwrap();
        let before = store.list().unwrap().len();

        assert!(editor.add_pattern("   ").is_none());
        assert!(rx.try_recv().is_err());
        assert_eq!(store.list().unwrap().len(), before);
    }

    #[test]
    fn test_bare_dot_reports_error() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, mut rx) = PatternEditor::new(store).unwrap();

        assert!(editor.add_pattern(".").is_none());
        assert!(matches!(rx.try_recv(), Ok(UiEvent::ShowMessage(_))));
    }

    #[test]
    fn test_delete_pattern() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, _rx) = PatternEditor::new(store.clone()).unwrap();

        let row = editor.add_pattern("example.org").unwrap();
        editor.delete_pattern(&row);
        assert!(!store.snapshot().unwrap().contains(&"example.org".to_string()));
    }

    #[tokio::test]
    async fn test_patterns_stream_updates() {
        let store = Arc::new(MemoryPatternStore::new());
        let (editor, _rx) = PatternEditor::new(store).unwrap();
        let mut live = editor.patterns();
        let _ = live.borrow_and_update();

        editor.add_pattern("example.org");
        live.changed().await.unwrap();
        assert!(live
            .borrow()
            .iter()
            .any(|p| p.pattern == "example.org"));
    }
}
