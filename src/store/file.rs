use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::error::{Result, RouterError, StoreErrorKind};

use super::rows::PatternRows;
use super::{Pattern, PatternStore};

/// Default file name for the persisted pattern rows
pub const DEFAULT_STORE_FILENAME: &str = "url_patterns.json";

/// JSON file backed pattern store.
///
/// Every write rewrites the whole file through a temporary file and a
/// rename, so a crash mid-write leaves the previous contents intact.
pub struct FilePatternStore {
    path: PathBuf,
    rows: Mutex<PatternRows>,
    live: watch::Sender<Vec<Pattern>>,
}

impl FilePatternStore {
    /// Open a store at the given path. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = load_rows(&path)?;
        debug!(path = %path.display(), patterns = rows.patterns().len(), "opened pattern store");

        let (live, _) = watch::channel(rows.patterns().to_vec());
        Ok(Self {
            path,
            rows: Mutex::new(rows),
            live,
        })
    }

    /// Open a store inside a data directory using the default file name
    pub fn open_in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(DEFAULT_STORE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply a change, persist it, and publish the new list.
    ///
    /// `change` reports whether it modified the rows. The in-memory rows are
    /// only replaced after the file write succeeds.
    fn commit<T>(&self, change: impl FnOnce(&mut PatternRows) -> Result<(T, bool)>) -> Result<T> {
        let mut rows = self.rows.lock();
        let mut next = rows.clone();
        let (value, changed) = change(&mut next)?;
        if !changed {
            return Ok(value);
        }

        if let Err(e) = save_rows(&self.path, &next) {
            error!(path = %self.path.display(), error = %e, "failed to persist pattern store");
            return Err(e);
        }

        *rows = next;
        self.live.send_replace(rows.patterns().to_vec());
        Ok(value)
    }
}

impl PatternStore for FilePatternStore {
    fn list(&self) -> Result<Vec<Pattern>> {
        Ok(self.rows.lock().patterns().to_vec())
    }

    fn add(&self, pattern: &str) -> Result<Pattern> {
        self.commit(|rows| rows.insert(pattern).map(|row| (row, true)))
    }

    fn remove(&self, pattern: &Pattern) -> Result<()> {
        self.commit(|rows| Ok(((), rows.remove(pattern.id).is_some())))
    }

    fn subscribe(&self) -> watch::Receiver<Vec<Pattern>> {
        self.live.subscribe()
    }
}

/// Temporary write target next to `path`, keeping the full file name so
/// files that differ only by extension never share one
pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn load_rows(path: &Path) -> Result<PatternRows> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PatternRows::default()),
        Err(e) => {
            return Err(RouterError::StoreError {
                kind: StoreErrorKind::Io,
                message: format!("Failed to read pattern store '{}': {}", path.display(), e),
            })
        }
    };

    if text.trim().is_empty() {
        return Ok(PatternRows::default());
    }

    let rows: PatternRows = serde_json::from_str(&text).map_err(|e| RouterError::StoreError {
        kind: StoreErrorKind::Corrupt,
        message: format!("Invalid pattern store '{}': {}", path.display(), e),
    })?;
    rows.validated()
}

fn save_rows(path: &Path, rows: &PatternRows) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path_for(path);
    let json = serde_json::to_vec_pretty(rows)?;

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(&json)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
