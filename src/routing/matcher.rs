//! Prefix matching over a routing context.
//!
//! # Responsibilities
//! - Match host prefixes (any-of, case-sensitive)
//! - Match path prefixes (case-sensitive)
//!
//! # Design Decisions
//! - Literal `starts_with` only: no regex, no case folding
//! - Matchers are `const`-constructible so rule tables can be statics
//! - Empty host or path never matches a non-empty prefix

use crate::routing::context::RoutingContext;

/// Trait for matching a routing context against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the context matches this condition.
    fn matches(&self, ctx: &RoutingContext) -> bool;
}

/// Matches when the host starts with any of the given prefixes.
#[derive(Debug, Clone, Copy)]
pub struct HostPrefixMatcher {
    prefixes: &'static [&'static str],
}

impl HostPrefixMatcher {
    pub const fn new(prefixes: &'static [&'static str]) -> Self {
        Self { prefixes }
    }

    /// Host-only check, used where no full context exists.
    pub fn matches_host(&self, host: &str) -> bool {
        self.prefixes.iter().any(|p| host.starts_with(p))
    }
}

impl Matcher for HostPrefixMatcher {
    fn matches(&self, ctx: &RoutingContext) -> bool {
        self.matches_host(ctx.host())
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone, Copy)]
pub struct PathPrefixMatcher {
    prefix: &'static str,
}

impl PathPrefixMatcher {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, ctx: &RoutingContext) -> bool {
        ctx.path().starts_with(self.prefix)
    }
}
