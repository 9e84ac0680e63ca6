// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Autocomplete suggestion dictionary (FT.SUGADD / FT.SUGGET / FT.SUGDEL).
//!
//! A suggestion dictionary is keyed independently from any search index.
//! Options can be fixed at construction via [`SuggestionOptions`] or
//! toggled per-instance with the chainable setters.
//!
//! # Example
//!
//! ```no_run
//! # use redsearch::SearchClient;
//! # async fn example(client: &SearchClient) -> Result<(), redsearch::SearchError> {
//! let sug = client.suggestion_list("sug:cities").fuzzy(true).max_results(5);
//! sug.add("toronto", 1.0, None).await?;
//! let hits = sug.get("tor").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::SuggestionOptions;
use crate::error::SearchError;
use crate::transport::{bulk_strings, reply_string, CommandTransport};

/// Handle on one suggestion dictionary key.
pub struct Suggestion {
    key: String,
    transport: Arc<dyn CommandTransport>,
    options: SuggestionOptions,
}

impl Suggestion {
    pub(crate) fn new(
        key: impl Into<String>,
        transport: Arc<dyn CommandTransport>,
        options: SuggestionOptions,
    ) -> Self {
        Self {
            key: key.into(),
            transport,
            options,
        }
    }

    /// Toggle fuzzy matching on subsequent [`Suggestion::get`] calls.
    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.options.fuzzy = fuzzy;
        self
    }

    /// Cap the number of returned suggestions.
    pub fn max_results(mut self, max_results: u64) -> Self {
        self.options.max_results = Some(max_results);
        self
    }

    /// Add (or re-score) a suggestion.
    ///
    /// A `payload` of `serde_json::Value::String` is sent raw; any other
    /// JSON value is serialized. With the `incr` option set, the score is
    /// incremented instead of replaced.
    pub async fn add(
        &self,
        text: &str,
        score: f64,
        payload: Option<serde_json::Value>,
    ) -> Result<(), SearchError> {
        let mut args = vec![self.key.clone(), text.to_string(), score.to_string()];

        if self.options.incr {
            args.push("INCR".to_string());
        }
        if let Some(payload) = payload {
            args.push("PAYLOAD".to_string());
            args.push(match payload {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
        }

        self.transport.send("FT.SUGADD", &args).await?;
        Ok(())
    }

    /// Fetch suggestions for a prefix.
    ///
    /// With the `with_payloads` option set, the reply interleaves payloads
    /// with suggestions; rows are returned as-is, without reshaping.
    pub async fn get(&self, prefix: &str) -> Result<Vec<String>, SearchError> {
        let mut args = vec![self.key.clone(), prefix.to_string()];

        if self.options.fuzzy {
            args.push("FUZZY".to_string());
        }
        if let Some(max) = self.options.max_results {
            args.push("MAX".to_string());
            args.push(max.to_string());
        }
        if self.options.with_payloads {
            args.push("WITHPAYLOADS".to_string());
        }

        let reply = self.transport.send("FT.SUGGET", &args).await?;
        let rows = bulk_strings("FT.SUGGET", reply)?;
        Ok(rows.iter().filter_map(reply_string).collect())
    }

    /// Delete a suggestion. Returns whether anything was removed.
    pub async fn del(&self, text: &str) -> Result<bool, SearchError> {
        let args = vec![self.key.clone(), text.to_string()];
        let reply = self.transport.send("FT.SUGDEL", &args).await?;
        Ok(matches!(reply, redis::Value::Int(n) if n > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use redis::Value;
    use serde_json::json;

    fn suggestion(transport: Arc<MockTransport>, options: SuggestionOptions) -> Suggestion {
        Suggestion::new("sug:test", transport, options)
    }

    #[tokio::test]
    async fn add_minimal_args() {
        let transport = MockTransport::new();
        suggestion(transport.clone(), SuggestionOptions::default())
            .add("toronto", 1.0, None)
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].0, "FT.SUGADD");
        assert_eq!(calls[0].1, vec!["sug:test", "toronto", "1"]);
    }

    #[tokio::test]
    async fn add_with_incr_and_json_payload() {
        let transport = MockTransport::new();
        let options = SuggestionOptions {
            incr: true,
            ..Default::default()
        };
        suggestion(transport.clone(), options)
            .add("toronto", 2.5, Some(json!({"country": "ca"})))
            .await
            .unwrap();

        assert_eq!(
            transport.calls()[0].1,
            vec![
                "sug:test",
                "toronto",
                "2.5",
                "INCR",
                "PAYLOAD",
                r#"{"country":"ca"}"#,
            ]
        );
    }

    #[tokio::test]
    async fn add_string_payload_is_sent_raw() {
        let transport = MockTransport::new();
        suggestion(transport.clone(), SuggestionOptions::default())
            .add("toronto", 1.0, Some(json!("plain")))
            .await
            .unwrap();

        let args = &transport.calls()[0].1;
        assert_eq!(args[args.len() - 2..], ["PAYLOAD", "plain"]);
    }

    #[tokio::test]
    async fn get_option_order_is_fuzzy_max_withpayloads() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Bulk(vec![Value::Data(b"toronto".to_vec())])));

        let options = SuggestionOptions {
            fuzzy: true,
            max_results: Some(5),
            with_payloads: true,
            incr: false,
        };
        let hits = suggestion(transport.clone(), options).get("tor").await.unwrap();

        assert_eq!(hits, vec!["toronto"]);
        assert_eq!(
            transport.calls()[0].1,
            vec!["sug:test", "tor", "FUZZY", "MAX", "5", "WITHPAYLOADS"]
        );
    }

    #[tokio::test]
    async fn get_without_options_sends_key_and_prefix_only() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Nil));

        let hits = suggestion(transport.clone(), SuggestionOptions::default())
            .get("tor")
            .await
            .unwrap();

        assert!(hits.is_empty());
        assert_eq!(transport.calls()[0].1, vec!["sug:test", "tor"]);
    }

    #[tokio::test]
    async fn del_reports_removal() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Int(1)));
        transport.push_reply(Ok(Value::Int(0)));

        let sug = suggestion(transport.clone(), SuggestionOptions::default());
        assert!(sug.del("toronto").await.unwrap());
        assert!(!sug.del("toronto").await.unwrap());

        assert_eq!(transport.calls()[0].0, "FT.SUGDEL");
        assert_eq!(transport.calls()[0].1, vec!["sug:test", "toronto"]);
    }

    #[tokio::test]
    async fn chainable_setters_override_constructor_options() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Nil));

        suggestion(transport.clone(), SuggestionOptions::default())
            .fuzzy(true)
            .max_results(3)
            .get("tor")
            .await
            .unwrap();

        assert_eq!(
            transport.calls()[0].1,
            vec!["sug:test", "tor", "FUZZY", "MAX", "3"]
        );
    }
}
