use crate::error::{Result, SecdefError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Start Of Header, the field delimiter of CME secdef files
pub const SOH: u8 = 0x01;

/// What to do with a security-type or product-complex code outside the seeded set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownKeyPolicy {
    /// Add the code to the table with a count of 1 and report it
    Extend,
    /// Report the code and leave the table untouched
    Skip,
}

impl Default for UnknownKeyPolicy {
    fn default() -> Self {
        UnknownKeyPolicy::Extend
    }
}

/// Tag numbers of the fields the three queries read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagKeys {
    /// SecurityType (tag 167)
    pub security_type: String,
    /// Product complex (tag 462)
    pub product_complex: String,
    /// NoLegs (tag 555). Its presence alone marks a multi-leg instrument.
    pub no_legs: String,
    /// Symbol (tag 55)
    pub name: String,
    /// MaturityMonthYear (tag 200)
    pub expiration: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        TagKeys {
            security_type: "167".to_string(),
            product_complex: "462".to_string(),
            no_legs: "555".to_string(),
            name: "55".to_string(),
            expiration: "200".to_string(),
        }
    }
}

impl TagKeys {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("security_type", self.security_type.as_str()),
            ("product_complex", self.product_complex.as_str()),
            ("no_legs", self.no_legs.as_str()),
            ("name", self.name.as_str()),
            ("expiration", self.expiration.as_str()),
        ]
        .into_iter()
    }
}

/// Parser and query configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecdefConfig {
    /// Field delimiter byte. Must be ASCII.
    pub delimiter: u8,
    pub tags: TagKeys,
    /// Whole-token match selecting the asset of interest (e.g. "6937=GE")
    pub asset_filter_token: String,
    /// SecurityType value marking a futures instrument
    pub futures_marker: String,
    /// Security types seeded at zero, in presentation order
    pub security_types: Vec<String>,
    /// Product complexes seeded at zero, in presentation order
    pub product_complexes: Vec<String>,
    pub unknown_key_policy: UnknownKeyPolicy,
    /// Number of earliest expirations reported
    pub earliest_limit: usize,
}

impl Default for SecdefConfig {
    fn default() -> Self {
        SecdefConfig {
            delimiter: SOH,
            tags: TagKeys::default(),
            asset_filter_token: "6937=GE".to_string(),
            futures_marker: "FUT".to_string(),
            security_types: ["FUT", "OOF", "MLEG", "IRS", "FXSPOT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            product_complexes: ["2", "4", "5", "12", "14", "15", "16", "17"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            unknown_key_policy: UnknownKeyPolicy::Extend,
            earliest_limit: 4,
        }
    }
}

impl SecdefConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: SecdefConfig =
            toml::from_str(input).map_err(|e| SecdefError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SecdefError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(SecdefError::Config(format!(
                "delimiter 0x{:02x} is not an ASCII byte",
                self.delimiter
            )));
        }
        let mut roles: HashMap<&str, &str> = HashMap::with_capacity(5);
        for (label, tag) in self.tags.iter() {
            if tag.is_empty() {
                return Err(SecdefError::Config(format!("tag key '{}' is empty", label)));
            }
            if tag.contains('=') || tag.as_bytes().contains(&self.delimiter) {
                return Err(SecdefError::Config(format!(
                    "tag key '{}' contains '=' or the delimiter",
                    label
                )));
            }
            // observe() gives each field to a single role
            if let Some(other) = roles.insert(tag, label) {
                return Err(SecdefError::Config(format!(
                    "tag key '{}' is used for both '{}' and '{}'",
                    tag, other, label
                )));
            }
        }
        if self.asset_filter_token.is_empty() {
            return Err(SecdefError::Config("asset_filter_token is empty".to_string()));
        }
        if self.asset_filter_token.as_bytes().contains(&self.delimiter) {
            return Err(SecdefError::Config(
                "asset_filter_token contains the delimiter".to_string(),
            ));
        }
        check_unique("security_types", &self.security_types)?;
        check_unique("product_complexes", &self.product_complexes)?;
        if self.earliest_limit == 0 {
            return Err(SecdefError::Config(
                "earliest_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_unknown_key_policy(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_key_policy = policy;
        self
    }

    pub fn with_asset_filter(mut self, token: impl Into<String>) -> Self {
        self.asset_filter_token = token.into();
        self
    }

    pub fn with_earliest_limit(mut self, limit: usize) -> Self {
        self.earliest_limit = limit;
        self
    }
}

fn check_unique(label: &str, keys: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(keys.len());
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(SecdefError::Config(format!(
                "{} lists '{}' more than once",
                label, key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SecdefConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delimiter, SOH);
        assert_eq!(config.tags.security_type, "167");
        assert_eq!(config.security_types.len(), 5);
        assert_eq!(config.product_complexes.len(), 8);
        assert_eq!(config.earliest_limit, 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SecdefConfig::from_toml_str(
            r#"
            delimiter = 124
            asset_filter_token = "6937=ZN"
            unknown_key_policy = "skip"

            [tags]
            name = "1151"
            "#,
        )
        .unwrap();

        assert_eq!(config.delimiter, b'|');
        assert_eq!(config.asset_filter_token, "6937=ZN");
        assert_eq!(config.unknown_key_policy, UnknownKeyPolicy::Skip);
        assert_eq!(config.tags.name, "1151");
        assert_eq!(config.tags.expiration, "200");
        assert_eq!(config.futures_marker, "FUT");
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let config = SecdefConfig::default().with_delimiter(0xC3);
        assert!(matches!(config.validate(), Err(SecdefError::Config(_))));
    }

    #[test]
    fn test_rejects_tag_with_equals() {
        let mut config = SecdefConfig::default();
        config.tags.no_legs = "555=0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_shared_tag_key() {
        let mut config = SecdefConfig::default();
        config.tags.expiration = "55".to_string();
        match config.validate() {
            Err(SecdefError::Config(msg)) => {
                assert!(msg.contains("'name'") && msg.contains("'expiration'"), "{}", msg);
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_asset_token_with_delimiter() {
        let config = SecdefConfig::default().with_asset_filter("6937=GE\x01x");
        assert!(matches!(config.validate(), Err(SecdefError::Config(_))));

        let piped = SecdefConfig::default()
            .with_delimiter(b'|')
            .with_asset_filter("6937=GE|x");
        assert!(piped.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_seed_keys() {
        let mut config = SecdefConfig::default();
        config.product_complexes.push("14".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let config = SecdefConfig::default().with_earliest_limit(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let result = SecdefConfig::from_toml_str("delimiter = \"soh\"");
        assert!(matches!(result, Err(SecdefError::Config(_))));
    }
}
