use std::borrow::Cow;

use tracing::debug;

use super::HostMatcher;

/// Domain pattern shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainPatternKind {
    /// Leading dot: ".example.com" matches "example.com" and "foo.example.com"
    Suffix,
    /// Bare domain: "example.com" matches "example.com" and "foo.example.com"
    Base,
}

/// A single parsed domain pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPattern {
    domain: String,
    kind: DomainPatternKind,
}

impl DomainPattern {
    /// Parse a pattern. A leading `.` makes it a suffix pattern.
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.to_ascii_lowercase();

        if let Some(suffix) = pattern.strip_prefix('.') {
            Self {
                domain: suffix.to_string(),
                kind: DomainPatternKind::Suffix,
            }
        } else {
            Self {
                domain: pattern,
                kind: DomainPatternKind::Base,
            }
        }
    }

    /// Domain the pattern is anchored to, without any leading dot
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn kind(&self) -> DomainPatternKind {
        self.kind
    }

    /// Match an already lower-cased host
    fn matches_lowercase(&self, host: &str) -> bool {
        // Both shapes: host == domain, or host ends with ".domain"
        if host == self.domain {
            return true;
        }
        let Some(head) = host.strip_suffix(self.domain.as_str()) else {
            return false;
        };
        head.ends_with('.')
    }
}

impl HostMatcher for DomainPattern {
    fn matches(&self, host: &str) -> bool {
        self.matches_lowercase(&lowercase(host))
    }
}

/// Domain matcher over an ordered pattern snapshot.
///
/// Patterns are tried in order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct DomainMatcher {
    patterns: Vec<DomainPattern>,
    trace: bool,
}

impl DomainMatcher {
    /// Compile a pattern snapshot
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| DomainPattern::parse(p.as_ref()))
                .collect(),
            trace: false,
        }
    }

    /// Log every comparison at debug level
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn patterns(&self) -> &[DomainPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl HostMatcher for DomainMatcher {
    fn matches(&self, host: &str) -> bool {
        let host = lowercase(host);

        if self.trace {
            debug!(host = %host, patterns = self.patterns.len(), "checking host");
        }

        self.patterns.iter().any(|pattern| {
            let result = pattern.matches_lowercase(&host);
            if self.trace {
                debug!(
                    host = %host,
                    pattern = %pattern.domain,
                    kind = ?pattern.kind,
                    result,
                    "compared host against pattern"
                );
            }
            result
        })
    }
}

/// Check whether a host matches any pattern in the list.
///
/// ```
/// use uri_router::matcher::matches;
///
/// assert!(matches("foo.example.com", &["example.com"]));
/// assert!(matches("a.lan", &[".lan"]));
/// assert!(!matches("alan", &[".lan"]));
/// ```
pub fn matches<S: AsRef<str>>(host: &str, patterns: &[S]) -> bool {
    let host = lowercase(host);
    patterns
        .iter()
        .any(|p| DomainPattern::parse(p.as_ref()).matches_lowercase(&host))
}

/// Lower-case ASCII, only allocating when uppercase bytes are present
fn lowercase(host: &str) -> Cow<'_, str> {
    if host.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(host.to_ascii_lowercase())
    } else {
        Cow::Borrowed(host)
    }
}
