mod domain;

pub use domain::{matches, DomainMatcher, DomainPattern, DomainPatternKind};

/// Trait for host matchers
pub trait HostMatcher: Send + Sync {
    /// Check if the host matches this matcher
    fn matches(&self, host: &str) -> bool;
}
