//! # redsearch
//!
//! An async Rust client for the RediSearch Redis module: typed schema,
//! query and suggestion builders over a single shared connection.
//!
//! The engine does all the heavy lifting (indexing, ranking, storage); this
//! crate's job is shaping outgoing command arguments exactly the way the
//! module's positional protocol expects, and lightly reshaping replies
//! (stripping the FT.SEARCH result-count header).
//!
//! ## Architecture
//!
//! ```text
//! Schema / Document ──┐
//!                     ├─→ positional arg arrays ─→ CommandTransport ─→ Redis
//! Query builder ──────┤         (FT.CREATE, FT.ADD, FT.SEARCH, ...)
//! Suggestion ─────────┘
//! ```
//!
//! Every component takes the transport at construction; there is no global
//! client state. [`SearchClient`] is the composition root that builds (or
//! receives) the one shared [`transport::RedisTransport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redsearch::{SearchClient, Schema, Document, QueryMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), redsearch::SearchError> {
//!     let client = SearchClient::connect("redis://localhost:6379").await?;
//!     client.confirm_module().await?;
//!
//!     // Look up or create the index (probe-then-create bootstrap)
//!     let schema = Schema::new("idx:products")
//!         .text_weighted("title", 2.0)
//!         .numeric_sortable("price")
//!         .tag("colors")
//!         .geo("location");
//!     let search = client.create_search_with_schema(schema).await?;
//!
//!     // Index a typed document
//!     let doc = Document::new("product:1")
//!         .text("title", "running shoe")
//!         .numeric("price", 49.95)
//!         .tags("colors", vec!["red".into(), "blue".into()])
//!         .geo("location", 40.0, -73.0);
//!     search.index_document(&doc).await?;
//!
//!     // Query with filters
//!     let ids = search
//!         .query("running shoe")
//!         .mode(QueryMode::And)
//!         .tags_filter("colors", vec!["red".into()])
//!         .numeric_filter("price", 10.0, 50.0)
//!         .between(0, 9)
//!         .execute()
//!         .await?;
//!     println!("matches: {:?}", ids);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`search`]: [`SearchClient`] composition root, [`Search`] index handles
//!   and the probe-then-create bootstrap
//! - [`schema`]: field kinds, typed values, schema/document serialization
//! - [`query`]: the FT.SEARCH builder and its fixed clause order
//! - [`suggestion`]: autocomplete dictionaries (FT.SUGADD/SUGGET/SUGDEL)
//! - [`transport`]: the injectable command/response seam over `redis`
//! - [`error`]: [`SearchError`] and engine error-string recognition
//! - [`config`]: serde-deserializable client and suggestion options
//! - [`metrics`]: backend-agnostic instrumentation hooks

pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod retry;
pub mod schema;
pub mod search;
pub mod suggestion;
pub mod transport;

pub use config::{SearchConfig, SuggestionOptions};
pub use error::SearchError;
pub use query::{GeoUnit, Query, QueryMode};
pub use schema::{Document, FieldKind, FieldOptions, FieldValue, Schema, DEFAULT_TAG_SEPARATOR};
pub use search::{Search, SearchClient};
pub use suggestion::Suggestion;
pub use transport::{CommandTransport, RedisTransport};
