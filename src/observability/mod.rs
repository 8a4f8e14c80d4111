//! Observability Module
//!
//! Structured logging for secdef passes through `tracing`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use secdef_stats::observability::{init_tracing, LogConfig};
//!
//! fn main() {
//!     init_tracing(&LogConfig::from_env()).expect("Failed to initialize tracing");
//!     // run passes; per-record issues are logged with their line number
//! }
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SECDEF_LOG` | falls back to `RUST_LOG`, then `info` | Filter directives |
//! | `SECDEF_LOG_JSON` | `false` | Emit JSON lines instead of text |

pub mod spans;
pub mod tracing_setup;

pub use tracing_setup::{init as init_tracing, LogConfig};
