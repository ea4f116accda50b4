//! URI Router - route shared or clicked URLs to one of two applications
//!
//! This library decides which application should open a URL:
//! - Pulls the first `http://` / `https://` URL out of shared text
//! - Matches the URL host against a user-maintained domain pattern list
//! - Launches the primary application on a match, the secondary otherwise
//! - Persists patterns and a debug flag as small JSON files
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use uri_router::{
//!     AppId, LaunchTargets, MemoryPatternStore, PatternStore, Router, RouterOptions, Settings,
//!     Trigger,
//! };
//! use uri_router::launcher::CommandLauncher;
//!
//! let store = Arc::new(MemoryPatternStore::new());
//! store.seed_defaults().unwrap();
//!
//! let launcher = Arc::new(CommandLauncher::from_targets(&LaunchTargets::new(
//!     "chromium", "firefox",
//! )));
//! let router = Router::new(
//!     store,
//!     launcher,
//!     Arc::new(Settings::in_memory()),
//!     RouterOptions::new(),
//! );
//!
//! // Decide without launching
//! let decision = router
//!     .decide(&Trigger::SharedText("Look at this https://github.com/rust-lang".into()))
//!     .unwrap();
//! assert_eq!(decision.host, "github.com");
//! assert_eq!(decision.app, AppId::Primary);
//! ```
//!
//! # Pattern Syntax
//!
//! | Pattern | Example | Matches |
//! |---------|---------|---------|
//! | Base domain | `example.com` | `example.com`, `foo.example.com` |
//! | Suffix | `.lan` | `lan`, `nas.lan`, `a.b.lan` |
//!
//! Comparison ignores ASCII case. The first matching pattern wins.

pub mod error;
pub mod extractor;
pub mod launcher;
pub mod matcher;
pub mod router;
pub mod settings;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use error::{Result, RouterError, StoreErrorKind};
pub use extractor::{extract_all_urls, extract_first_url};
pub use launcher::{AppCommand, CommandLauncher, Launcher};
pub use matcher::{DomainMatcher, DomainPattern, DomainPatternKind, HostMatcher};
pub use settings::Settings;
pub use store::{
    FilePatternStore, MemoryPatternStore, Pattern, PatternEditor, PatternStore, UiEvent,
    DEFAULT_PATTERNS,
};
pub use types::{AppId, Intent, IntentAction, LaunchTargets, RouteDecision, Trigger};

// Re-export router types
pub use router::{host_of, LaunchOutcome, NoUrlReason, RouteState, Router, RouterOptions};
