//! Persisted router settings.
//!
//! Currently a single flag: debug mode, which turns on per-pattern match
//! tracing. The flag is shared as `Arc<Settings>` rather than a global.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, RouterError, StoreErrorKind};
use crate::store::temp_path_for;

/// Default file name for persisted settings
pub const DEFAULT_SETTINGS_FILENAME: &str = "router_settings.json";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    debug_mode: bool,
}

/// Process-wide router settings with optional file persistence
#[derive(Debug, Default)]
pub struct Settings {
    debug_mode: AtomicBool,
    path: Option<PathBuf>,
    // Serializes file writes
    write_lock: Mutex<()>,
}

impl Settings {
    /// Create settings that live only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load settings from a file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => SettingsFile::default(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| RouterError::StoreError {
                kind: StoreErrorKind::Corrupt,
                message: format!("Invalid settings file '{}': {}", path.display(), e),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => SettingsFile::default(),
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), debug_mode = file.debug_mode, "loaded settings");
        Ok(Self {
            debug_mode: AtomicBool::new(file.debug_mode),
            path: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    /// Load settings from a data directory using the default file name
    pub fn load_in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load(dir.as_ref().join(DEFAULT_SETTINGS_FILENAME))
    }

    /// Whether debug tracing is enabled
    pub fn debug_mode(&self) -> bool {
        self.debug_mode.load(Ordering::Relaxed)
    }

    /// Enable or disable debug tracing and persist the choice.
    ///
    /// The in-memory value is updated even if persisting fails.
    pub fn set_debug_mode(&self, enabled: bool) -> Result<()> {
        // Memory and file are updated under one lock so they agree
        let _lock = self.write_lock.lock();
        self.debug_mode.store(enabled, Ordering::Relaxed);

        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Err(e) = save(path, SettingsFile { debug_mode: enabled }) {
            warn!(path = %path.display(), error = %e, "failed to persist settings");
            return Err(e);
        }
        Ok(())
    }

    /// Short confirmation text for a debug toggle
    pub fn toggle_message(enabled: bool) -> &'static str {
        if enabled {
            "Debug enabled"
        } else {
            "Debug disabled"
        }
    }
}

fn save(path: &Path, file: SettingsFile) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path_for(path);
    let mut out = fs::File::create(&tmp_path)?;
    out.write_all(&serde_json::to_vec(&file)?)?;
    out.flush()?;
    drop(out);

    fs::rename(&tmp_path, path)?;
    Ok(())
}
