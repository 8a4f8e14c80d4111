//! Span Helpers for Feed Passes

use tracing::{span, Level, Span};

/// Create a span for one full pass over a feed
#[inline]
pub fn pass_span(source: &str) -> Span {
    span!(Level::INFO, "secdef.pass", feed.source = %source)
}

/// Create a span for loading configuration
#[inline]
pub fn config_span(path: &str) -> Span {
    span!(Level::DEBUG, "secdef.config", config.path = %path)
}
