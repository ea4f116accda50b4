use std::fmt;

/// Default identifier of the application that opens matched URLs
pub const DEFAULT_PRIMARY_APP: &str = "com.android.chrome";

/// Default identifier of the application that opens everything else
pub const DEFAULT_SECONDARY_APP: &str = "net.quetta.browser";

/// MIME type accepted for shared text
pub const TEXT_PLAIN: &str = "text/plain";

/// Launch destination selected by the match outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppId {
    /// Host matched a stored pattern
    Primary,
    /// Host matched nothing
    Secondary,
}

impl AppId {
    /// Select the destination for a match result
    pub fn for_match(matched: bool) -> Self {
        if matched {
            AppId::Primary
        } else {
            AppId::Secondary
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppId::Primary => write!(f, "primary"),
            AppId::Secondary => write!(f, "secondary"),
        }
    }
}

/// Configured identifiers of the two launch destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTargets {
    /// Application identifier used for matched hosts
    pub primary: String,
    /// Application identifier used for unmatched hosts
    pub secondary: String,
}

impl LaunchTargets {
    /// Create launch targets from two identifiers
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Get the identifier configured for an app
    pub fn identifier(&self, app: AppId) -> &str {
        match app {
            AppId::Primary => &self.primary,
            AppId::Secondary => &self.secondary,
        }
    }
}

impl Default for LaunchTargets {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_APP, DEFAULT_SECONDARY_APP)
    }
}

/// Action carried by an inbound intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentAction {
    /// Share sheet
    Send,
    /// Link click
    View,
    /// Anything the router does not handle
    Other,
}

/// Raw inbound event as delivered by the host platform
#[derive(Debug, Clone)]
pub struct Intent {
    pub action: IntentAction,
    pub mime_type: Option<String>,
    /// Shared text payload
    pub text: Option<String>,
    /// URI payload of a view event
    pub data: Option<String>,
}

impl Intent {
    /// Create a share intent carrying plain text
    pub fn send_text(text: impl Into<String>) -> Self {
        Self {
            action: IntentAction::Send,
            mime_type: Some(TEXT_PLAIN.to_string()),
            text: Some(text.into()),
            data: None,
        }
    }

    /// Create a view intent carrying a URI
    pub fn view(uri: impl Into<String>) -> Self {
        Self {
            action: IntentAction::View,
            mime_type: None,
            text: None,
            data: Some(uri.into()),
        }
    }
}

/// Normalized routing input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Free text from the share sheet; a URL is extracted from it
    SharedText(String),
    /// An already structured URI; used as-is
    ViewUri(String),
}

impl Trigger {
    /// Normalize an inbound intent.
    ///
    /// Returns None for actions the router does not handle, shares that are
    /// not `text/plain`, and intents missing their payload.
    pub fn from_intent(intent: &Intent) -> Option<Self> {
        match intent.action {
            IntentAction::Send if intent.mime_type.as_deref() == Some(TEXT_PLAIN) => {
                intent.text.clone().map(Trigger::SharedText)
            }
            IntentAction::View => intent.data.clone().map(Trigger::ViewUri),
            _ => None,
        }
    }

    /// Raw payload of the trigger
    pub fn payload(&self) -> &str {
        match self {
            Trigger::SharedText(text) => text,
            Trigger::ViewUri(uri) => uri,
        }
    }
}

/// Result of the decision phase of routing, before launching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    /// Candidate URL handed to the launcher
    pub url: String,
    /// Host the patterns were matched against
    pub host: String,
    /// Selected destination
    pub app: AppId,
}
