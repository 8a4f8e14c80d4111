//! Per-Record Observation and Update Decision
//!
//! A record is scanned once into a [`RecordObservation`]; [`decide`] then
//! turns the observation into the updates the aggregator applies. Nothing
//! touches the aggregates until the whole record has been scanned, so the
//! security type may appear after the product complex in column order.

use super::config::SecdefConfig;
use super::tokenizer::Field;

/// What one scan of a record saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordObservation<'a> {
    /// First SecurityType value
    pub security_type: Option<&'a str>,
    /// SecurityType equals the futures marker
    pub is_futures: bool,
    /// First product complex value
    pub product_complex: Option<&'a str>,
    /// Some token equals the asset filter token exactly
    pub asset_match: bool,
    /// The NoLegs tag is present. The value is never inspected: `555=0`
    /// still counts as having legs.
    pub has_legs: bool,
    pub name: Option<&'a str>,
    pub expiration: Option<&'a str>,
    /// Non-empty tokens without `=`, as (position, token)
    pub malformed: Vec<(usize, &'a str)>,
}

impl<'a> RecordObservation<'a> {
    pub fn has_product_complex(&self) -> bool {
        self.product_complex.is_some()
    }
}

/// Scan the fields of one record, first match wins for every tag
pub fn observe<'a, I>(fields: I, config: &SecdefConfig) -> RecordObservation<'a>
where
    I: IntoIterator<Item = Field<'a>>,
{
    let tags = &config.tags;
    let mut obs = RecordObservation::default();

    for (position, field) in fields.into_iter().enumerate() {
        if field.raw() == config.asset_filter_token {
            obs.asset_match = true;
        }

        let Some((tag, value)) = field.split() else {
            if !field.is_empty() && field.raw() != config.asset_filter_token {
                obs.malformed.push((position, field.raw()));
            }
            continue;
        };

        if tag == tags.security_type {
            if obs.security_type.is_none() {
                obs.security_type = Some(value);
                obs.is_futures = value == config.futures_marker;
            }
        } else if tag == tags.product_complex {
            obs.product_complex.get_or_insert(value);
        } else if tag == tags.no_legs {
            obs.has_legs = true;
        } else if tag == tags.name {
            obs.name.get_or_insert(value);
        } else if tag == tags.expiration {
            obs.expiration.get_or_insert(value);
        }
    }

    obs
}

/// Outcome of the earliest-expiration predicate for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationUpdate<'a> {
    /// Not a zero-leg futures instrument on the filtered asset
    NotSelected,
    Record { name: &'a str, expiration: &'a str },
    /// Selected, but the named tag was absent
    Incomplete { missing_tag: &'a str },
}

/// Updates one record asks of the three aggregates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdates<'a> {
    pub security_type: Option<&'a str>,
    pub product_complex: Option<&'a str>,
    pub expiration: ExpirationUpdate<'a>,
}

/// Pure decision over a finished observation
pub fn decide<'a>(obs: &RecordObservation<'a>, config: &'a SecdefConfig) -> RecordUpdates<'a> {
    let product_complex = if obs.is_futures {
        obs.product_complex
    } else {
        None
    };

    let expiration = if obs.is_futures && obs.asset_match && !obs.has_legs {
        match (obs.name, obs.expiration) {
            (Some(name), Some(expiration)) => ExpirationUpdate::Record { name, expiration },
            (None, _) => ExpirationUpdate::Incomplete {
                missing_tag: &config.tags.name,
            },
            (Some(_), None) => ExpirationUpdate::Incomplete {
                missing_tag: &config.tags.expiration,
            },
        }
    } else {
        ExpirationUpdate::NotSelected
    };

    RecordUpdates {
        security_type: obs.security_type,
        product_complex,
        expiration,
    }
}
