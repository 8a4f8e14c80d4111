//! Result Rendering
//!
//! Text and JSON renderings of [`QueryResults`] for the command line.

use crate::secdef::{PassStats, QueryResults};
use serde::Serialize;
use std::fmt;

/// Plain text answers, one section per query
pub struct TextReport<'a>(pub &'a QueryResults);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.0;

        writeln!(f, "Instruments per security type (tag 167):")?;
        for row in &results.security_types {
            writeln!(f, "  {} has {} instruments", row.code, row.count)?;
        }

        writeln!(f)?;
        writeln!(f, "Futures per product complex (tag 462):")?;
        for row in &results.product_complexes {
            writeln!(
                f,
                "  Product complex {} has {} futures instruments",
                row.code, row.count
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Earliest expirations (tag 200):")?;
        if results.earliest_expirations.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for entry in &results.earliest_expirations {
            writeln!(f, "  Name: {} has expiration: {}", entry.name, entry.expiration)?;
        }
        Ok(())
    }
}

pub fn render_text(results: &QueryResults) -> String {
    TextReport(results).to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a QueryResults,
    stats: &'a PassStats,
}

/// Pretty JSON with the answers and the pass counters
pub fn render_json(results: &QueryResults, stats: &PassStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { results, stats })
}
