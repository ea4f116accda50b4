use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError, StoreErrorKind};

use super::{normalize_pattern, Pattern};

/// Persisted pattern rows, kept sorted by pattern text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PatternRows {
    next_id: u64,
    patterns: Vec<Pattern>,
}

impl PatternRows {
    /// Insert a pattern, assigning the next row id
    pub fn insert(&mut self, text: &str) -> Result<Pattern> {
        let text = normalize_pattern(text)?;

        let pos = match self
            .patterns
            .binary_search_by(|p| p.pattern.as_str().cmp(text.as_str()))
        {
            Ok(_) => return Err(RouterError::AlreadyExists(text)),
            Err(pos) => pos,
        };

        self.next_id += 1;
        let row = Pattern {
            id: self.next_id,
            pattern: text,
        };
        self.patterns.insert(pos, row.clone());
        Ok(row)
    }

    /// Remove a row by id. Returns the removed row, if any.
    pub fn remove(&mut self, id: u64) -> Option<Pattern> {
        let pos = self.patterns.iter().position(|p| p.id == id)?;
        Some(self.patterns.remove(pos))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Check rows loaded from disk and restore the ordering invariant
    pub fn validated(mut self) -> Result<Self> {
        let mut seen = HashSet::with_capacity(self.patterns.len());
        for row in &self.patterns {
            if !seen.insert(row.pattern.as_str()) {
                return Err(RouterError::StoreError {
                    kind: StoreErrorKind::Duplicate,
                    message: format!("duplicate pattern row: {}", row.pattern),
                });
            }
        }

        let max_id = self.patterns.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id);
        self.patterns.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_lexicographic_order() {
        let mut rows = PatternRows::default();
        rows.insert("youtube.com").unwrap();
        rows.insert(".lan").unwrap();
        rows.insert("claude.ai").unwrap();

        let texts: Vec<&str> = rows.patterns().iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(texts, vec![".lan", "claude.ai", "youtube.com"]);
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut rows = PatternRows::default();
        let a = rows.insert("a.com").unwrap();
        let b = rows.insert("b.com").unwrap();
        rows.remove(b.id);
        let c = rows.insert("c.com").unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut rows = PatternRows::default();
        rows.insert("github.com").unwrap();
        let err = rows.insert("  github.com ").unwrap_err();
        assert!(matches!(err, RouterError::AlreadyExists(ref p) if p == "github.com"));
        assert_eq!(rows.patterns().len(), 1);
    }

    #[test]
    fn test_remove_missing_row() {
        let mut rows = PatternRows::default();
        rows.insert("github.com").unwrap();
        assert!(rows.remove(42).is_none());
        assert_eq!(rows.patterns().len(), 1);
    }

    #[test]
    fn test_validated_rejects_duplicates() {
        let rows: PatternRows = serde_json::from_str(
            r#"{"next_id": 2, "patterns": [{"id": 1, "pattern": "a.com"}, {"id": 2, "pattern": "a.com"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            rows.validated(),
            Err(RouterError::StoreError {
                kind: StoreErrorKind::Duplicate,
                ..
            })
        ));
    }

    #[test]
    fn test_validated_sorts_and_fixes_next_id() {
        let rows: PatternRows = serde_json::from_str(
            r#"{"next_id": 0, "patterns": [{"id": 7, "pattern": "z.com"}, {"id": 3, "pattern": "a.com"}]}"#,
        )
        .unwrap();
        let mut rows = rows.validated().unwrap();
        assert_eq!(rows.patterns()[0].pattern, "a.com");
        assert_eq!(rows.insert("m.com").unwrap().id, 8);
    }
}
