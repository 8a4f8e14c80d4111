//! Streaming Aggregator
//!
//! Drives one pass over a feed. Each record is tokenized and scanned once,
//! the resulting observation is turned into updates, and the updates are
//! applied to the three aggregate tables. Problems with a single record are
//! reported in its [`RecordOutcome`] and never stop the pass; failures of
//! the line source do.

use super::config::{SecdefConfig, UnknownKeyPolicy};
use super::observation::{decide, observe, ExpirationUpdate};
use super::tables::{Aggregates, Increment};
use super::tokenizer::tokenize;
use crate::error::Result;
use crate::observability::spans;
use crate::source::LineSource;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Which count table an issue refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountKind {
    SecurityType,
    ProductComplex,
}

impl std::fmt::Display for CountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountKind::SecurityType => write!(f, "security type"),
            CountKind::ProductComplex => write!(f, "product complex"),
        }
    }
}

/// A parse-layer problem confined to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    /// Code outside the seeded set. `extended` tells whether it was added.
    UnrecognizedKey {
        kind: CountKind,
        key: String,
        extended: bool,
    },
    /// Non-empty token without `=`, skipped
    MalformedField { position: usize, token: String },
    /// Record selected for the expiration table but missing a tag
    MissingField { tag: String },
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordIssue::UnrecognizedKey {
                kind,
                key,
                extended,
            } => {
                let action = if *extended { "added" } else { "skipped" };
                write!(f, "unrecognized {} '{}' ({})", kind, key, action)
            }
            RecordIssue::MalformedField { position, token } => {
                write!(f, "field {} '{}' has no '='", position, token)
            }
            RecordIssue::MissingField { tag } => write!(f, "missing tag {}", tag),
        }
    }
}

/// What one record did to the aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// 1-based line number in the feed
    pub line: u64,
    pub counted_security_type: bool,
    pub counted_product_complex: bool,
    pub recorded_expiration: bool,
    pub issues: Vec<RecordIssue>,
}

impl RecordOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Counters for one pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Lines read, including blank ones
    pub lines: u64,
    pub blank_lines: u64,
    /// Non-blank lines processed as records
    pub records: u64,
    pub security_types_counted: u64,
    pub product_complexes_counted: u64,
    pub expirations_recorded: u64,
    pub unrecognized_keys: u64,
    pub malformed_fields: u64,
    pub incomplete_records: u64,
}

impl PassStats {
    /// Parse-layer issues across all records
    pub fn issues(&self) -> u64 {
        self.unrecognized_keys + self.malformed_fields + self.incomplete_records
    }
}

/// Read-only result of a completed pass
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub aggregates: Aggregates,
    pub stats: PassStats,
}

/// Owns the aggregates for the duration of one pass
pub struct Aggregator {
    config: SecdefConfig,
    aggregates: Aggregates,
    stats: PassStats,
}

impl Aggregator {
    /// Create an aggregator with fresh tables. Fails on an invalid config.
    pub fn new(config: SecdefConfig) -> Result<Self> {
        config.validate()?;
        let aggregates = Aggregates::new(&config);
        Ok(Aggregator {
            config,
            aggregates,
            stats: PassStats::default(),
        })
    }

    pub fn config(&self) -> &SecdefConfig {
        &self.config
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Process one raw record. Returns `None` for blank lines.
    pub fn ingest_line(&mut self, line: &str) -> Option<RecordOutcome> {
        self.stats.lines += 1;
        let line_no = self.stats.lines;
        let record = super::tokenizer::strip_terminator(line);
        if record.is_empty() {
            self.stats.blank_lines += 1;
            return None;
        }
        self.stats.records += 1;

        let obs = observe(tokenize(record, self.config.delimiter), &self.config);
        let updates = decide(&obs, &self.config);
        let policy = self.config.unknown_key_policy;

        let mut outcome = RecordOutcome {
            line: line_no,
            ..RecordOutcome::default()
        };

        for &(position, token) in &obs.malformed {
            debug!(line = line_no, position, token, "Skipping field without '='");
            outcome.issues.push(RecordIssue::MalformedField {
                position,
                token: token.to_string(),
            });
        }

        if let Some(code) = updates.security_type {
            let result = self.aggregates.security_types.increment(code, policy);
            outcome.counted_security_type = result.applied();
            note_increment(&mut outcome, CountKind::SecurityType, code, result, policy);
        }

        if let Some(code) = updates.product_complex {
            let result = self.aggregates.product_complexes.increment(code, policy);
            outcome.counted_product_complex = result.applied();
            note_increment(&mut outcome, CountKind::ProductComplex, code, result, policy);
        }

        match updates.expiration {
            ExpirationUpdate::Record { name, expiration } => {
                if let Some(previous) = self.aggregates.expirations.insert(name, expiration) {
                    debug!(
                        line = line_no,
                        name,
                        previous = %previous,
                        expiration,
                        "Instrument name seen again, expiration overwritten"
                    );
                }
                outcome.recorded_expiration = true;
            }
            ExpirationUpdate::Incomplete { missing_tag } => {
                debug!(line = line_no, tag = missing_tag, "Selected instrument lacks tag");
                outcome.issues.push(RecordIssue::MissingField {
                    tag: missing_tag.to_string(),
                });
            }
            ExpirationUpdate::NotSelected => {}
        }

        self.tally(&outcome);
        Some(outcome)
    }

    fn tally(&mut self, outcome: &RecordOutcome) {
        let stats = &mut self.stats;
        stats.security_types_counted += outcome.counted_security_type as u64;
        stats.product_complexes_counted += outcome.counted_product_complex as u64;
        stats.expirations_recorded += outcome.recorded_expiration as u64;
        for issue in &outcome.issues {
            match issue {
                RecordIssue::UnrecognizedKey { .. } => stats.unrecognized_keys += 1,
                RecordIssue::MalformedField { .. } => stats.malformed_fields += 1,
                RecordIssue::MissingField { .. } => stats.incomplete_records += 1,
            }
        }
    }

    /// Consume every record of `source`. A source failure discards the
    /// partial aggregates.
    pub fn run<S: LineSource + ?Sized>(mut self, source: &S) -> Result<PassSummary> {
        let span = spans::pass_span(&source.name());
        let _enter = span.enter();

        info!(source = %source.name(), "Starting secdef pass");
        for line in source.open()? {
            let line = line?;
            self.ingest_line(&line);
        }
        info!(
            records = self.stats.records,
            blank_lines = self.stats.blank_lines,
            issues = self.stats.issues(),
            "Secdef pass complete"
        );

        Ok(self.finish())
    }

    /// Freeze the aggregates
    pub fn finish(self) -> PassSummary {
        PassSummary {
            aggregates: self.aggregates,
            stats: self.stats,
        }
    }
}

fn note_increment(
    outcome: &mut RecordOutcome,
    kind: CountKind,
    code: &str,
    result: Increment,
    policy: UnknownKeyPolicy,
) {
    if result == Increment::Counted {
        return;
    }
    warn!(
        line = outcome.line,
        table = %kind,
        key = code,
        policy = ?policy,
        "Unrecognized code"
    );
    outcome.issues.push(RecordIssue::UnrecognizedKey {
        kind,
        key: code.to_string(),
        extended: result == Increment::Extended,
    });
}
