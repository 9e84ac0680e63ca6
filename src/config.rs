//! Configuration for the search client.
//!
//! # Example
//!
//! ```
//! use redsearch::SearchConfig;
//!
//! // Minimal config (uses defaults)
//! let config = SearchConfig::default();
//! assert_eq!(config.payload_field, "payload");
//!
//! // Full config
//! let config = SearchConfig {
//!     redis_url: Some("redis://localhost:6379".into()),
//!     payload_field: "body".into(),
//! };
//! ```

use serde::Deserialize;

/// Configuration for a [`crate::SearchClient`] and the search handles it
/// creates.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Redis connection string (e.g., "redis://localhost:6379")
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Field name used for legacy plain-text indexing and for the
    /// single-TEXT-field schema created by the index bootstrap
    /// (default: "payload")
    #[serde(default = "default_payload_field")]
    pub payload_field: String,
}

fn default_payload_field() -> String {
    "payload".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            payload_field: default_payload_field(),
        }
    }
}

/// Options for a [`crate::Suggestion`] dictionary.
///
/// Every option can also be toggled per-instance with the chainable
/// setters on [`crate::Suggestion`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionOptions {
    /// Use fuzzy prefix matching on FT.SUGGET
    #[serde(default)]
    pub fuzzy: bool,

    /// Cap the number of returned suggestions (MAX)
    #[serde(default)]
    pub max_results: Option<u64>,

    /// Increment the score on repeated FT.SUGADD instead of replacing it
    #[serde(default)]
    pub incr: bool,

    /// Return stored payloads alongside suggestions (WITHPAYLOADS)
    #[serde(default)]
    pub with_payloads: bool,
}
