//! Router module.
//!
//! Routes an inbound URL to the primary or secondary application depending
//! on whether its host matches a stored domain pattern.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{error, info, trace, warn};
use url::Url;

use crate::error::{Result, RouterError};
use crate::extractor::extract_first_url;
use crate::launcher::Launcher;
use crate::matcher::{DomainMatcher, HostMatcher};
use crate::settings::Settings;
use crate::store::PatternStore;
use crate::types::{AppId, Intent, RouteDecision, Trigger};

/// Message for view events and blank input without a URL
pub const NO_URL_MESSAGE: &str = "No valid URL found to process.";

/// Message for shared text without a URL
pub const NO_URL_IN_TEXT_MESSAGE: &str = "No valid URL found in shared text.";

/// Message for URLs without a usable host and internal routing failures
pub const INVALID_URL_MESSAGE: &str = "Error: Invalid URL or pattern.";

/// Completion callback invoked once per routing operation
type CompletionCallback = Box<dyn Fn(&LaunchOutcome) + Send + Sync>;

/// Routing state machine.
///
/// `Idle -> ExtractingUrl -> {NoUrlFound | InvalidUrl | Matching} -> Launching
/// -> {Launched | LaunchFailed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    Idle,
    ExtractingUrl,
    NoUrlFound,
    InvalidUrl,
    Matching,
    Launching,
    Launched,
    LaunchFailed,
}

impl RouteState {
    /// Whether the state ends a routing operation
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RouteState::NoUrlFound
                | RouteState::InvalidUrl
                | RouteState::Launched
                | RouteState::LaunchFailed
        )
    }
}

/// Why no URL could be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoUrlReason {
    /// Input was missing or blank
    Blank,
    /// Shared text contained no `http://` or `https://` URL
    NotInText,
}

/// Terminal result of a routing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched {
        app: AppId,
        identifier: String,
        url: String,
    },
    NoUrlFound {
        reason: NoUrlReason,
    },
    InvalidUrl {
        detail: String,
    },
    AppNotFound {
        app: AppId,
        identifier: String,
        detail: String,
    },
}

impl LaunchOutcome {
    /// Short human-readable message for the user
    pub fn message(&self) -> String {
        match self {
            LaunchOutcome::Launched { identifier, .. } => format!("Opened in {}", identifier),
            LaunchOutcome::NoUrlFound {
                reason: NoUrlReason::Blank,
            } => NO_URL_MESSAGE.to_string(),
            LaunchOutcome::NoUrlFound {
                reason: NoUrlReason::NotInText,
            } => NO_URL_IN_TEXT_MESSAGE.to_string(),
            LaunchOutcome::InvalidUrl { .. } => INVALID_URL_MESSAGE.to_string(),
            LaunchOutcome::AppNotFound { identifier, .. } => {
                format!("Error: App '{}' is not installed.", identifier)
            }
        }
    }

    /// Terminal state reached
    pub fn state(&self) -> RouteState {
        match self {
            LaunchOutcome::Launched { .. } => RouteState::Launched,
            LaunchOutcome::NoUrlFound { .. } => RouteState::NoUrlFound,
            LaunchOutcome::InvalidUrl { .. } => RouteState::InvalidUrl,
            LaunchOutcome::AppNotFound { .. } => RouteState::LaunchFailed,
        }
    }

    pub fn is_launched(&self) -> bool {
        matches!(self, LaunchOutcome::Launched { .. })
    }

    /// Application that was launched or attempted, if routing got that far
    pub fn app(&self) -> Option<AppId> {
        match self {
            LaunchOutcome::Launched { app, .. } | LaunchOutcome::AppNotFound { app, .. } => {
                Some(*app)
            }
            _ => None,
        }
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Router builder options.
#[derive(Default)]
pub struct RouterOptions {
    /// Run URL extraction on view URIs as well as shared text
    pub extract_view_uri: bool,
    /// Called exactly once with every terminal outcome
    pub on_complete: Option<CompletionCallback>,
}

impl RouterOptions {
    /// Create new router options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the first URL from view URIs instead of using them as-is.
    pub fn with_extract_view_uri(mut self, extract: bool) -> Self {
        self.extract_view_uri = extract;
        self
    }

    /// Set the completion callback.
    pub fn with_on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LaunchOutcome) + Send + Sync + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// Router picks the application for a URL and launches it.
///
/// Every call to [`Router::route`] reads one snapshot of the pattern store
/// and runs to a terminal [`LaunchOutcome`]. The router holds no per-call
/// state, so one instance can serve concurrent callers.
pub struct Router {
    store: Arc<dyn PatternStore>,
    launcher: Arc<dyn Launcher>,
    settings: Arc<Settings>,
    options: RouterOptions,
}

impl Router {
    /// Create a new router.
    pub fn new(
        store: Arc<dyn PatternStore>,
        launcher: Arc<dyn Launcher>,
        settings: Arc<Settings>,
        options: RouterOptions,
    ) -> Self {
        Self {
            store,
            launcher,
            settings,
            options,
        }
    }

    /// Pick the destination for a trigger without launching anything.
    pub fn decide(&self, trigger: &Trigger) -> Result<RouteDecision> {
        let url = self.candidate_url(trigger)?;
        let host = host_of(url)?;

        let snapshot = self.store.snapshot()?;
        let matched = DomainMatcher::new(&snapshot)
            .with_trace(self.settings.debug_mode())
            .matches(&host);

        Ok(RouteDecision {
            url: url.to_string(),
            host,
            app: AppId::for_match(matched),
        })
    }

    /// Route a trigger to its application and launch it.
    pub fn route(&self, trigger: &Trigger) -> LaunchOutcome {
        let outcome = self.run(trigger);
        self.complete(&outcome);
        outcome
    }

    /// Normalize a raw inbound intent and route it.
    pub fn route_intent(&self, intent: &Intent) -> LaunchOutcome {
        match Trigger::from_intent(intent) {
            Some(trigger) => self.route(&trigger),
            None => {
                let outcome = LaunchOutcome::NoUrlFound {
                    reason: NoUrlReason::Blank,
                };
                self.complete(&outcome);
                outcome
            }
        }
    }

    fn run(&self, trigger: &Trigger) -> LaunchOutcome {
        let mut state = RouteState::Idle;
        advance(&mut state, RouteState::ExtractingUrl);

        // Extraction and matching failures, panics included, end the session
        let decided = panic::catch_unwind(AssertUnwindSafe(|| self.decide(trigger)));
        let decision = match decided {
            Ok(Ok(decision)) => decision,
            Ok(Err(e)) => {
                let outcome = failure_outcome(trigger, e);
                advance(&mut state, outcome.state());
                return outcome;
            }
            Err(_) => {
                error!("routing panicked during URL extraction or matching");
                advance(&mut state, RouteState::InvalidUrl);
                return LaunchOutcome::InvalidUrl {
                    detail: "internal routing error".to_string(),
                };
            }
        };

        advance(&mut state, RouteState::Matching);
        trace!(host = %decision.host, app = %decision.app, "selected application");

        advance(&mut state, RouteState::Launching);
        let identifier = self.launcher.identifier(decision.app).to_string();
        match self.launcher.launch(&decision.url, decision.app) {
            Ok(()) => {
                advance(&mut state, RouteState::Launched);
                info!(app = %decision.app, identifier = %identifier, host = %decision.host, "launched URL");
                LaunchOutcome::Launched {
                    app: decision.app,
                    identifier,
                    url: decision.url,
                }
            }
            Err(e) => {
                advance(&mut state, RouteState::LaunchFailed);
                warn!(app = %decision.app, identifier = %identifier, error = %e, "target app not found");
                let (identifier, detail) = match e {
                    RouterError::AppNotFound {
                        identifier,
                        message,
                        ..
                    } => (identifier, message),
                    other => (identifier, other.to_string()),
                };
                LaunchOutcome::AppNotFound {
                    app: decision.app,
                    identifier,
                    detail,
                }
            }
        }
    }

    /// Resolve the trigger into a single candidate URL
    fn candidate_url<'a>(&self, trigger: &'a Trigger) -> Result<&'a str> {
        let candidate = match trigger {
            Trigger::ViewUri(uri) if !self.options.extract_view_uri => {
                Some(uri.trim()).filter(|u| !u.is_empty())
            }
            Trigger::ViewUri(text) | Trigger::SharedText(text) => extract_first_url(text),
        };
        candidate.ok_or(RouterError::NoUrlFound)
    }

    fn complete(&self, outcome: &LaunchOutcome) {
        if let Some(ref callback) = self.options.on_complete {
            callback(outcome);
        }
    }
}

/// Parse a candidate URL and return its host
pub fn host_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(RouterError::InvalidUrl(format!("URL has no host: {}", url))),
    }
}

fn advance(state: &mut RouteState, next: RouteState) {
    trace!(from = ?state, to = ?next, "route state");
    *state = next;
}

/// Convert a decision error into a terminal outcome
fn failure_outcome(trigger: &Trigger, err: RouterError) -> LaunchOutcome {
    match err {
        RouterError::NoUrlFound => {
            let reason = match trigger {
                Trigger::SharedText(text) if !text.trim().is_empty() => NoUrlReason::NotInText,
                _ => NoUrlReason::Blank,
            };
            LaunchOutcome::NoUrlFound { reason }
        }
        other => {
            warn!(error = %other, "failed to route URL");
            LaunchOutcome::InvalidUrl {
                detail: other.to_string(),
            }
        }
    }
}
