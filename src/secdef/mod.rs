//! Secdef Feed Parsing and Aggregation
//!
//! Single-pass parser for CME-style security definition files. One pass
//! fills three tables:
//!
//! - instruments per security type (tag 167)
//! - futures per product complex (tag 462)
//! - name (tag 55) to expiration (tag 200) for zero-leg futures on one asset
//!
//! Known quirk: the NoLegs tag (555) marks an instrument as multi-leg by its
//! mere presence, whatever its value.

mod aggregator;
pub mod config;
mod observation;
mod query;
mod tables;
mod tokenizer;

pub use aggregator::{
    Aggregator, CountKind, PassStats, PassSummary, RecordIssue, RecordOutcome,
};
pub use config::{SecdefConfig, TagKeys, UnknownKeyPolicy, SOH};
pub use observation::{decide, observe, ExpirationUpdate, RecordObservation, RecordUpdates};
pub use query::{CodeCount, Expiration, QueryResults};
pub use tables::{Aggregates, CountTable, ExpirationTable, Increment};
pub use tokenizer::{strip_terminator, tokenize, Field, Fields};
