// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search handles and the client composition root.
//!
//! [`SearchClient`] is the one place a transport is built or injected;
//! every [`Search`], [`Query`] and [`Suggestion`] it hands out shares that
//! transport. Index bootstrap is a probe-then-create sequence:
//!
//! ```text
//! FT.INFO key
//!   ├─ ok                    → use existing index
//!   ├─ "Unknown Index name"  → FT.CREATE key SCHEMA ... , then FT.INFO again
//!   └─ any other error       → surfaced unmodified
//! ```
//!
//! There is no locking around probe-then-create: two concurrent bootstraps
//! for the same key can both issue FT.CREATE, and the second relies on the
//! engine's duplicate-index error.

use std::sync::Arc;

use redis::Value;
use tracing::info;

use crate::config::{SearchConfig, SuggestionOptions};
use crate::error::SearchError;
use crate::metrics;
use crate::query::Query;
use crate::schema::{Document, Schema};
use crate::suggestion::Suggestion;
use crate::transport::{CommandTransport, RedisTransport};

/// Handle on one remote search index.
pub struct Search {
    key: String,
    payload_field: String,
    transport: Arc<dyn CommandTransport>,
    info: Value,
}

impl std::fmt::Debug for Search {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("key", &self.key)
            .field("payload_field", &self.payload_field)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl Search {
    fn new(
        key: impl Into<String>,
        payload_field: impl Into<String>,
        transport: Arc<dyn CommandTransport>,
        info: Value,
    ) -> Self {
        Self {
            key: key.into(),
            payload_field: payload_field.into(),
            transport,
            info,
        }
    }

    /// The index key this handle operates on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw FT.INFO reply captured at bootstrap time.
    pub fn info(&self) -> &Value {
        &self.info
    }

    /// Index a plain text string under `id` in the payload field.
    ///
    /// NOSAVE and REPLACE emulate the original reds behaviour: the engine
    /// indexes the text without storing a document hash, and re-indexing an
    /// existing id replaces it. Priority is fixed at 1.
    pub async fn index(&self, id: &str, text: &str) -> Result<(), SearchError> {
        let args = vec![
            self.key.clone(),
            id.to_string(),
            "1".to_string(),
            "NOSAVE".to_string(),
            "REPLACE".to_string(),
            "FIELDS".to_string(),
            self.payload_field.clone(),
            text.to_string(),
        ];
        self.transport.send("FT.ADD", &args).await?;
        Ok(())
    }

    /// Index a typed [`Document`]. Field kinds are the caller's contract;
    /// they are not checked against the index schema here.
    pub async fn index_document(&self, document: &Document) -> Result<(), SearchError> {
        let mut args = vec![
            self.key.clone(),
            document.doc_id().to_string(),
            "1".to_string(),
            "NOSAVE".to_string(),
            "REPLACE".to_string(),
            "FIELDS".to_string(),
        ];
        args.extend(document.field_args());
        self.transport.send("FT.ADD", &args).await?;
        Ok(())
    }

    /// Remove `id` from the index. Returns whether a document was removed.
    pub async fn remove(&self, id: &str) -> Result<bool, SearchError> {
        let args = vec![self.key.clone(), id.to_string()];
        let reply = self.transport.send("FT.DEL", &args).await?;
        Ok(matches!(reply, Value::Int(n) if n > 0))
    }

    /// Start building a query against this index.
    pub fn query(&self, raw: impl Into<String>) -> Query {
        Query::new(self.key.clone(), Arc::clone(&self.transport), raw)
    }
}

/// Composition root: owns the transport and mints search / suggestion
/// handles over it.
pub struct SearchClient {
    transport: Arc<dyn CommandTransport>,
    config: SearchConfig,
}

impl SearchClient {
    /// Connect to Redis at `url` with default options.
    pub async fn connect(url: &str) -> Result<Self, SearchError> {
        let transport = RedisTransport::connect(url).await?;
        Ok(Self {
            transport: Arc::new(transport),
            config: SearchConfig::default(),
        })
    }

    /// Connect using a full [`SearchConfig`]; `redis_url` is required.
    pub async fn connect_with_config(config: SearchConfig) -> Result<Self, SearchError> {
        let url = config
            .redis_url
            .as_deref()
            .ok_or_else(|| SearchError::Config("redis_url is required to connect".into()))?;
        let transport = RedisTransport::connect(url).await?;
        Ok(Self {
            transport: Arc::new(transport),
            config,
        })
    }

    /// Build a client over an injected transport (tests, shared
    /// connections).
    pub fn with_transport(transport: Arc<dyn CommandTransport>) -> Self {
        Self::with_transport_and_config(transport, SearchConfig::default())
    }

    pub fn with_transport_and_config(
        transport: Arc<dyn CommandTransport>,
        config: SearchConfig,
    ) -> Self {
        Self { transport, config }
    }

    /// Confirm the search module is loaded.
    ///
    /// Issues FT.CREATE with zero arguments as a feature probe: an arity
    /// error means the command exists, so the module is present. Any other
    /// error is surfaced.
    pub async fn confirm_module(&self) -> Result<(), SearchError> {
        match self.transport.send("FT.CREATE", &[]).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_arity_error() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Look up or create the index `key` with a single TEXT field over the
    /// configured payload field, and return a handle on it.
    pub async fn create_search(&self, key: &str) -> Result<Search, SearchError> {
        if key.is_empty() {
            return Err(SearchError::Config(
                "create_search requires a redis key for namespacing".into(),
            ));
        }

        let schema_args = vec![self.config.payload_field.clone(), "TEXT".to_string()];
        let info = self.ensure_index(key, schema_args).await?;

        Ok(Search::new(
            key,
            self.config.payload_field.clone(),
            Arc::clone(&self.transport),
            info,
        ))
    }

    /// Look up or create the index described by `schema`, and return a
    /// handle on it.
    pub async fn create_search_with_schema(&self, schema: Schema) -> Result<Search, SearchError> {
        if schema.key().is_empty() {
            return Err(SearchError::Config(
                "create_search requires a redis key for namespacing".into(),
            ));
        }
        if schema.is_empty() {
            return Err(SearchError::Config(
                "schema must declare at least one field".into(),
            ));
        }

        let info = self.ensure_index(schema.key(), schema.field_args()).await?;

        Ok(Search::new(
            schema.key(),
            self.config.payload_field.clone(),
            Arc::clone(&self.transport),
            info,
        ))
    }

    /// Handle on a suggestion dictionary with default options.
    pub fn suggestion_list(&self, key: impl Into<String>) -> Suggestion {
        self.suggestion_list_with_options(key, SuggestionOptions::default())
    }

    /// Handle on a suggestion dictionary with explicit options.
    pub fn suggestion_list_with_options(
        &self,
        key: impl Into<String>,
        options: SuggestionOptions,
    ) -> Suggestion {
        Suggestion::new(key, Arc::clone(&self.transport), options)
    }

    /// Probe the index, creating it on "Unknown Index name" and re-probing
    /// exactly once. Any other probe error short-circuits.
    async fn ensure_index(&self, key: &str, schema_args: Vec<String>) -> Result<Value, SearchError> {
        let probe = vec![key.to_string()];

        match self.transport.send("FT.INFO", &probe).await {
            Ok(info) => {
                metrics::record_bootstrap(false);
                Ok(info)
            }
            Err(e) if e.is_unknown_index() => {
                let mut args = vec![key.to_string(), "SCHEMA".to_string()];
                args.extend(schema_args);

                info!(key = %key, "index not found, creating");
                self.transport.send("FT.CREATE", &args).await?;

                let info = self.transport.send("FT.INFO", &probe).await?;
                metrics::record_bootstrap(true);
                Ok(info)
            }
            Err(e) => Err(e),
        }
    }
}
