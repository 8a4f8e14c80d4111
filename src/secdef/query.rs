//! Query Derivation
//!
//! Turns the frozen aggregates of a pass into the three answers.

use super::tables::Aggregates;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expiration {
    pub name: String,
    pub expiration: String,
}

/// Answers to the three fixed queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResults {
    /// Instruments per security type
    pub security_types: Vec<CodeCount>,
    /// Futures per product complex
    pub product_complexes: Vec<CodeCount>,
    /// Earliest expirations of zero-leg futures on the filtered asset
    pub earliest_expirations: Vec<Expiration>,
}

impl QueryResults {
    /// Derive all three answers, keeping at most `limit` expirations
    pub fn derive(aggregates: &Aggregates, limit: usize) -> Self {
        QueryResults {
            security_types: count_rows(aggregates.security_types.iter()),
            product_complexes: count_rows(aggregates.product_complexes.iter()),
            earliest_expirations: aggregates
                .expirations
                .earliest(limit)
                .into_iter()
                .map(|(name, expiration)| Expiration {
                    name: name.to_string(),
                    expiration: expiration.to_string(),
                })
                .collect(),
        }
    }
}

fn count_rows<'a>(rows: impl Iterator<Item = (&'a str, u64)>) -> Vec<CodeCount> {
    rows.map(|(code, count)| CodeCount {
        code: code.to_string(),
        count,
    })
    .collect()
}
