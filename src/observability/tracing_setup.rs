//! Tracing Setup
//!
//! Installs a tracing-subscriber `fmt` subscriber with environment-based
//! filtering, as text or JSON.

use tracing_subscriber::EnvFilter;

/// Logging options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Emit one JSON object per event
    pub json: bool,
}

impl LogConfig {
    /// Read `SECDEF_LOG_JSON` (`1`/`true` enables JSON output)
    pub fn from_env() -> Self {
        let json = std::env::var("SECDEF_LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        LogConfig { json }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Filter from `SECDEF_LOG`, then `RUST_LOG`, then `info`
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("SECDEF_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber. Logs go to stderr so stdout carries
/// only the query answers.
pub fn init(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().try_init()?;
    } else {
        builder.try_init()?;
    }

    tracing::debug!(json = config.json, "Tracing initialized");
    Ok(())
}
