// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query builder for FT.SEARCH.
//!
//! Accumulates a boolean mode, numeric/geo/tag filters, a key restriction
//! and pagination bounds, then serializes them into the positional argument
//! array the engine expects and dispatches it. The builder is consumed by
//! [`Query::execute`], so a spent query cannot be reused.
//!
//! # Clause order
//!
//! The argument array has a fixed shape that must be preserved for
//! wire compatibility:
//!
//! ```text
//! [key, query, NOCONTENT,
//!   "FILTER <field> <min> <max>"...,       one per numeric filter, insertion order
//!   "GEOFILTER <field> <lng> <lat> <r> <u>"?,
//!   "INKEYS <count> <k1,k2,...>"?,
//!   LIMIT, start, stop?]
//! ```
//!
//! FILTER / GEOFILTER / INKEYS are each passed as one pre-joined token, not
//! split into separate arguments. The transport's argument parsing depends
//! on this.
//!
//! # Example
//!
//! ```no_run
//! # use redsearch::{SearchClient, QueryMode};
//! # async fn example(client: &SearchClient) -> Result<(), redsearch::SearchError> {
//! let search = client.create_search("idx:products").await?;
//! let ids = search
//!     .query("running shoe")
//!     .mode(QueryMode::And)
//!     .tags_filter("colors", vec!["red".into(), "blue".into()])
//!     .numeric_filter("price", 10.0, 50.0)
//!     .between(0, 9)
//!     .execute()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use crate::error::SearchError;
use crate::metrics;
use crate::transport::{bulk_strings, reply_string, CommandTransport};

/// How the raw query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Tokenize and require every word (joined by a space).
    #[default]
    And,
    /// Tokenize and accept any word (joined by `|`).
    Or,
    /// The raw string is already a full query expression; pass it through
    /// verbatim.
    Direct,
}

/// Distance unit for geo filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoUnit {
    Meters,
    Kilometers,
    #[default]
    Feet,
    Miles,
}

impl std::fmt::Display for GeoUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoUnit::Meters => write!(f, "m"),
            GeoUnit::Kilometers => write!(f, "km"),
            GeoUnit::Feet => write!(f, "ft"),
            GeoUnit::Miles => write!(f, "mi"),
        }
    }
}

#[derive(Debug, Clone)]
struct NumericFilter {
    field: String,
    min: f64,
    max: f64,
}

#[derive(Debug, Clone)]
struct GeoFilter {
    field: String,
    lat: f64,
    lng: f64,
    radius: f64,
    unit: GeoUnit,
}

#[derive(Debug, Clone)]
struct TagFilter {
    field: String,
    tags: Vec<String>,
}

/// Accumulating builder for one FT.SEARCH round-trip.
///
/// Numeric and tag filters are append-only; the geo filter and the key
/// restriction are last-write-wins.
pub struct Query {
    key: String,
    transport: Arc<dyn CommandTransport>,
    raw: String,
    mode: QueryMode,
    numeric: Vec<NumericFilter>,
    geo: Option<GeoFilter>,
    tags: Vec<TagFilter>,
    keys: Option<Vec<String>>,
    range: Option<(u64, u64)>,
}

impl Query {
    pub(crate) fn new(
        key: impl Into<String>,
        transport: Arc<dyn CommandTransport>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            transport,
            raw: raw.into(),
            mode: QueryMode::default(),
            numeric: Vec::new(),
            geo: None,
            tags: Vec::new(),
            keys: None,
            range: None,
        }
    }

    /// Set the boolean mode (default [`QueryMode::And`]).
    pub fn mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Limit results to the given pagination window (LIMIT start stop).
    pub fn between(mut self, start: u64, stop: u64) -> Self {
        self.range = Some((start, stop));
        self
    }

    /// Append a numeric range filter. Each call adds one FILTER clause.
    pub fn numeric_filter(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.numeric.push(NumericFilter {
            field: field.into(),
            min,
            max,
        });
        self
    }

    /// Restrict results to a geo radius, in feet. Last call wins.
    pub fn geo_filter(self, field: impl Into<String>, lat: f64, lng: f64, radius: f64) -> Self {
        self.geo_filter_with_unit(field, lat, lng, radius, GeoUnit::Feet)
    }

    /// Restrict results to a geo radius with an explicit unit. Last call
    /// wins.
    pub fn geo_filter_with_unit(
        mut self,
        field: impl Into<String>,
        lat: f64,
        lng: f64,
        radius: f64,
        unit: GeoUnit,
    ) -> Self {
        self.geo = Some(GeoFilter {
            field: field.into(),
            lat,
            lng,
            radius,
            unit,
        });
        self
    }

    /// Append a single-tag filter (normalized to a one-element tag set).
    pub fn tag_filter(self, field: impl Into<String>, tag: impl Into<String>) -> Self {
        self.tags_filter(field, vec![tag.into()])
    }

    /// Append a tag filter. Entries with no tags are dropped at
    /// serialization.
    pub fn tags_filter(mut self, field: impl Into<String>, tags: Vec<String>) -> Self {
        self.tags.push(TagFilter {
            field: field.into(),
            tags,
        });
        self
    }

    /// Restrict results to the given document keys (INKEYS). Last call
    /// wins.
    pub fn in_keys(mut self, keys: Vec<String>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// The final query string: the (possibly tokenized) base query with any
    /// tag clauses appended.
    pub fn query_string(&self) -> String {
        let core = match self.mode {
            QueryMode::Direct => self.raw.clone(),
            QueryMode::And => words(&self.raw).join(" "),
            QueryMode::Or => words(&self.raw).join("|"),
        };

        let clauses: Vec<String> = self
            .tags
            .iter()
            .filter(|filter| !filter.tags.is_empty())
            .map(|filter| format!("@{}:{{{}}}", filter.field, filter.tags.join("|")))
            .collect();

        if clauses.is_empty() {
            core
        } else {
            format!("({}) {}", core, clauses.join(" "))
        }
    }

    /// The full FT.SEARCH argument array in fixed clause order.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            self.key.clone(),
            self.query_string(),
            "NOCONTENT".to_string(),
        ];

        for filter in &self.numeric {
            args.push(format!("FILTER {} {} {}", filter.field, filter.min, filter.max));
        }

        if let Some(ref filter) = self.geo {
            args.push(format!(
                "GEOFILTER {} {} {} {} {}",
                filter.field, filter.lng, filter.lat, filter.radius, filter.unit
            ));
        }

        if let Some(ref keys) = self.keys {
            args.push(format!("INKEYS {} {}", keys.len(), keys.join(",")));
        }

        if let Some((start, stop)) = self.range {
            args.push("LIMIT".to_string());
            args.push(start.to_string());
            args.push(stop.to_string());
        }

        args
    }

    /// Dispatch FT.SEARCH and return the matching document ids.
    ///
    /// The leading result-count element of the reply is stripped. Transport
    /// errors propagate unchanged; nothing is retried.
    pub async fn execute(self) -> Result<Vec<String>, SearchError> {
        let args = self.command_args();
        let start = Instant::now();

        let reply = self.transport.send("FT.SEARCH", &args).await?;
        let rows = bulk_strings("FT.SEARCH", reply)?;

        let ids: Vec<String> = rows.iter().skip(1).filter_map(reply_string).collect();

        metrics::record_search_latency(start.elapsed());
        metrics::record_search_results(ids.len());

        Ok(ids)
    }
}

/// Split into alphanumeric/underscore runs, the engine's word boundaries.
pub(crate) fn words(input: &str) -> Vec<&str> {
    input
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use redis::Value;

    fn query(raw: &str) -> Query {
        Query::new("idx:test", MockTransport::new(), raw)
    }

    #[test]
    fn words_splits_on_non_word_runs() {
        assert_eq!(words("hello, world!"), vec!["hello", "world"]);
        assert_eq!(words("snake_case ok"), vec!["snake_case", "ok"]);
        assert!(words("  ,;  ").is_empty());
    }

    #[test]
    fn and_mode_joins_with_space() {
        assert_eq!(query("hello world").query_string(), "hello world");
    }

    #[test]
    fn or_mode_joins_with_pipe() {
        assert_eq!(
            query("hello world").mode(QueryMode::Or).query_string(),
            "hello|world"
        );
    }

    #[test]
    fn direct_mode_passes_through_verbatim() {
        assert_eq!(
            query("(a|b) c").mode(QueryMode::Direct).query_string(),
            "(a|b) c"
        );
    }

    #[test]
    fn tag_filter_wraps_base_query() {
        let q = query("shoe").tags_filter("color", vec!["red".into(), "blue".into()]);
        assert_eq!(q.query_string(), "(shoe) @color:{red|blue}");
    }

    #[test]
    fn empty_tag_filter_is_dropped() {
        let q = query("shoe").tags_filter("color", vec![]);
        assert_eq!(q.query_string(), "shoe");
    }

    #[test]
    fn single_tag_is_normalized() {
        let q = query("shoe").tag_filter("color", "red");
        assert_eq!(q.query_string(), "(shoe) @color:{red}");
    }

    #[test]
    fn multiple_tag_clauses_are_space_joined() {
        let q = query("shoe")
            .tags_filter("color", vec!["red".into()])
            .tags_filter("size", vec!["9".into(), "10".into()]);
        assert_eq!(q.query_string(), "(shoe) @color:{red} @size:{9|10}");
    }

    #[test]
    fn numeric_filter_and_limit_clauses() {
        let args = query("shoe")
            .numeric_filter("price", 10.0, 50.0)
            .between(0, 9)
            .command_args();

        assert_eq!(
            args,
            vec![
                "idx:test",
                "shoe",
                "NOCONTENT",
                "FILTER price 10 50",
                "LIMIT",
                "0",
                "9",
            ]
        );
    }

    #[test]
    fn numeric_filters_keep_insertion_order() {
        let args = query("shoe")
            .numeric_filter("price", 10.0, 50.0)
            .numeric_filter("stock", 1.0, 100.0)
            .command_args();

        assert_eq!(args[3], "FILTER price 10 50");
        assert_eq!(args[4], "FILTER stock 1 100");
    }

    #[test]
    fn geo_filter_is_lng_first_and_last_write_wins() {
        let args = query("shoe")
            .geo_filter("location", 1.0, 2.0, 10.0)
            .geo_filter_with_unit("location", 40.0, -73.0, 5.0, GeoUnit::Kilometers)
            .command_args();

        assert_eq!(args[3], "GEOFILTER location -73 40 5 km");
    }

    #[test]
    fn geo_filter_defaults_to_feet() {
        let args = query("shoe").geo_filter("location", 40.0, -73.0, 100.0).command_args();
        assert_eq!(args[3], "GEOFILTER location -73 40 100 ft");
    }

    #[test]
    fn in_keys_count_matches_key_list() {
        let args = query("shoe")
            .in_keys(vec!["doc:1".into(), "doc:2".into(), "doc:3".into()])
            .command_args();

        assert_eq!(args[3], "INKEYS 3 doc:1,doc:2,doc:3");
    }

    #[test]
    fn clause_order_is_fixed() {
        let args = query("shoe")
            .between(0, 9)
            .in_keys(vec!["doc:1".into()])
            .geo_filter("location", 40.0, -73.0, 100.0)
            .numeric_filter("price", 10.0, 50.0)
            .command_args();

        // Regardless of mutation order: FILTER, GEOFILTER, INKEYS, LIMIT.
        assert_eq!(
            args,
            vec![
                "idx:test",
                "shoe",
                "NOCONTENT",
                "FILTER price 10 50",
                "GEOFILTER location -73 40 100 ft",
                "INKEYS 1 doc:1",
                "LIMIT",
                "0",
                "9",
            ]
        );
    }

    #[tokio::test]
    async fn execute_strips_result_count_header() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Bulk(vec![
            Value::Int(3),
            Value::Data(b"id1".to_vec()),
            Value::Data(b"id2".to_vec()),
            Value::Data(b"id3".to_vec()),
        ])));

        let ids = Query::new("idx:test", transport.clone(), "hello")
            .execute()
            .await
            .unwrap();

        assert_eq!(ids, vec!["id1", "id2", "id3"]);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "FT.SEARCH");
        assert_eq!(calls[0].1[..3], ["idx:test", "hello", "NOCONTENT"]);
    }

    #[tokio::test]
    async fn execute_propagates_transport_error() {
        let transport = MockTransport::new();
        transport.push_error("connection reset");

        let err = Query::new("idx:test", transport.clone(), "hello")
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Transport(_)));
        // No retry: exactly one dispatch.
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn execute_rejects_non_array_reply() {
        let transport = MockTransport::new();
        transport.push_reply(Ok(Value::Int(0)));

        let err = Query::new("idx:test", transport, "hello").execute().await.unwrap_err();
        assert!(matches!(err, SearchError::Protocol { .. }));
    }
}
