//! Representer configuration.
//!
//! ```yaml
//! skip_empty: true
//! predicates_first: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_SKIP_EMPTY: &str = "YAMLANNO_SKIP_EMPTY";
pub const ENV_PREDICATES_FIRST: &str = "YAMLANNO_PREDICATES_FIRST";

/// Options controlling which skip rules apply and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresenterConfig {
    /// Skip null and empty values. When set, this takes precedence over any
    /// `skip_at_dump_if` predicate unless `predicates_first` is also set.
    pub skip_empty: bool,

    /// Evaluate property annotations before the empty/null rules. A property
    /// with a `skip_at_dump_if` predicate is then decided by that predicate
    /// alone.
    pub predicates_first: bool,
}

impl Default for RepresenterConfig {
    fn default() -> Self {
        Self {
            skip_empty: true,
            predicates_first: false,
        }
    }
}

impl RepresenterConfig {
    pub fn new(skip_empty: bool) -> Self {
        Self {
            skip_empty,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Defaults overlaid with `YAMLANNO_SKIP_EMPTY` and `YAMLANNO_PREDICATES_FIRST`.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup.
    pub fn overlay_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_SKIP_EMPTY) {
            self.skip_empty = parse_bool(ENV_SKIP_EMPTY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PREDICATES_FIRST) {
            self.predicates_first = parse_bool(ENV_PREDICATES_FIRST, &raw)?;
        }
        Ok(self)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
