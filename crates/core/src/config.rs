//! Engine configuration via `sphere.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock engine behaviour. Values are validated eagerly on load.

use crate::error::{Error, Result};
use crate::query::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "sphere.toml";

/// Recency multipliers applied after score normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencyConfig {
    /// Multiplier for documents younger than `day_hours`
    #[serde(default = "default_day_boost")]
    pub day_boost: f32,
    /// Multiplier for documents younger than `week_hours`
    #[serde(default = "default_week_boost")]
    pub week_boost: f32,
    /// Age threshold for `day_boost`, in hours
    #[serde(default = "default_day_hours")]
    pub day_hours: u64,
    /// Age threshold for `week_boost`, in hours
    #[serde(default = "default_week_hours")]
    pub week_hours: u64,
}

fn default_day_boost() -> f32 {
    1.2
}

fn default_week_boost() -> f32 {
    1.1
}

fn default_day_hours() -> u64 {
    24
}

fn default_week_hours() -> u64 {
    168
}

impl Default for RecencyConfig {
    fn default() -> Self {
        RecencyConfig {
            day_boost: default_day_boost(),
            week_boost: default_week_boost(),
            day_hours: default_day_hours(),
            week_hours: default_week_hours(),
        }
    }
}

impl RecencyConfig {
    /// Multiplier for a document of the given age
    pub fn multiplier(&self, age_hours: u64) -> f32 {
        if age_hours < self.day_hours {
            self.day_boost
        } else if age_hours < self.week_hours {
            self.week_boost
        } else {
            1.0
        }
    }
}

/// Engine configuration loaded from `sphere.toml`.
///
/// # Example
///
/// ```toml
/// default_limit = 20
/// match_mode = "any"
///
/// [recency]
/// day_boost = 1.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size when a query gives none
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Largest page size a query may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Snippet length in characters
    #[serde(default = "default_snippet_length")]
    pub snippet_length: usize,
    /// Relevance threshold for relevance-sorted searches
    #[serde(default = "default_min_relevance")]
    pub min_relevance: f32,
    /// Suggestions returned with an empty result page
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Leading tokens of a document used to find similar ones
    #[serde(default = "default_similar_query_tokens")]
    pub similar_query_tokens: usize,
    /// Posting list combination when a query gives none
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Recency multipliers
    #[serde(default)]
    pub recency: RecencyConfig,
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    1000
}

fn default_snippet_length() -> usize {
    150
}

fn default_min_relevance() -> f32 {
    0.1
}

fn default_max_suggestions() -> usize {
    5
}

fn default_similar_query_tokens() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            snippet_length: default_snippet_length(),
            min_relevance: default_min_relevance(),
            max_suggestions: default_max_suggestions(),
            similar_query_tokens: default_similar_query_tokens(),
            match_mode: MatchMode::default(),
            recency: RecencyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(Error::Config("limits must be greater than zero".into()));
        }
        if self.default_limit > self.max_limit {
            return Err(Error::Config(format!(
                "default_limit ({}) exceeds max_limit ({})",
                self.default_limit, self.max_limit
            )));
        }
        if !self.min_relevance.is_finite() || self.min_relevance < 0.0 {
            return Err(Error::Config(format!(
                "min_relevance must be a non-negative number, got {}",
                self.min_relevance
            )));
        }
        if self.similar_query_tokens == 0 {
            return Err(Error::Config(
                "similar_query_tokens must be greater than zero".into(),
            ));
        }
        let r = &self.recency;
        if !(r.day_boost >= 1.0 && r.week_boost >= 1.0) {
            return Err(Error::Config("recency boosts must be at least 1.0".into()));
        }
        if r.day_hours > r.week_hours {
            return Err(Error::Config(format!(
                "recency day_hours ({}) exceeds week_hours ({})",
                r.day_hours, r.week_hours
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Sphere engine configuration

# Page size used when a query does not set one, and the largest allowed.
default_limit = 20
max_limit = 1000

# Characters of content included in a snippet.
snippet_length = 150

# Relevance-sorted searches drop results scoring below this.
min_relevance = 0.1

# Prefix suggestions returned when a search comes back empty.
max_suggestions = 5

# Leading tokens of a document used to look up similar documents.
similar_query_tokens = 10

# How multi-word queries combine: "any" (union) or "all" (intersection).
match_mode = "any"

[recency]
day_boost = 1.2
week_boost = 1.1
day_hours = 24
week_hours = 168
"#
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Serialize this config to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
