// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Schema and document serialization for FT.CREATE / FT.ADD.
//!
//! A [`Schema`] declares the typed fields of an index and flattens into the
//! positional token list FT.CREATE expects. A [`Document`] carries typed
//! values for those fields and flattens into the FIELDS token list for
//! FT.ADD. Both preserve insertion order, which is load-bearing: the engine
//! receives fields exactly in the order they were declared.
//!
//! # Example
//!
//! ```
//! use redsearch::{Schema, Document};
//!
//! let schema = Schema::new("idx:products")
//!     .text_weighted("title", 2.0)
//!     .numeric_sortable("price")
//!     .tag("colors")
//!     .geo("location");
//!
//! let doc = Document::new("product:1")
//!     .text("title", "running shoe")
//!     .numeric("price", 49.95)
//!     .tags("colors", vec!["red".into(), "blue".into()])
//!     .geo("location", 40.0, -73.0);
//! assert_eq!(doc.field_args()[3], "49.95");
//! ```

/// Field types supported by the engine's index schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Full-text searchable field
    Text,
    /// Numeric field (supports range filters)
    Numeric,
    /// Geographic field (longitude/latitude point)
    Geo,
    /// Tag field (exact match, supports OR)
    Tag,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "TEXT"),
            FieldKind::Numeric => write!(f, "NUMERIC"),
            FieldKind::Geo => write!(f, "GEO"),
            FieldKind::Tag => write!(f, "TAG"),
        }
    }
}

/// Default joiner for tag values.
pub const DEFAULT_TAG_SEPARATOR: char = ',';

/// A typed runtime value for one document field.
///
/// Each variant knows its own wire token. Tags must not contain the chosen
/// separator inside an individual tag; that is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Numeric(f64),
    /// Geographic point. Serializes longitude first.
    Geo { lat: f64, lng: f64 },
    Tag { tags: Vec<String>, separator: char },
}

impl FieldValue {
    /// Tag value using the default `,` separator.
    pub fn tags(tags: Vec<String>) -> Self {
        FieldValue::Tag {
            tags,
            separator: DEFAULT_TAG_SEPARATOR,
        }
    }

    /// Tag value joined by a custom separator (must match the SEPARATOR
    /// declared on the schema field).
    pub fn tags_with_separator(tags: Vec<String>, separator: char) -> Self {
        FieldValue::Tag { tags, separator }
    }

    /// The exact token sent on the wire for this value.
    pub fn wire_token(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Numeric(n) => n.to_string(),
            // Longitude before latitude, the order GEOADD and GEOFILTER use.
            FieldValue::Geo { lat, lng } => format!("{} {}", lng, lat),
            FieldValue::Tag { tags, separator } => tags.join(&separator.to_string()),
        }
    }
}

/// Per-field schema options.
///
/// WEIGHT is only meaningful for TEXT fields and SEPARATOR only for TAG
/// fields. A mismatched option is silently dropped at serialization to stay
/// wire-compatible with the legacy client; the dropping is isolated in
/// [`FieldOptions::applicable_weight`] / [`FieldOptions::applicable_separator`]
/// so a strict validation mode can be added without touching token order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOptions {
    pub kind: FieldKind,
    pub sortable: bool,
    pub no_index: bool,
    pub weight: Option<f64>,
    pub separator: Option<char>,
}

impl FieldOptions {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            sortable: false,
            no_index: false,
            weight: None,
            separator: None,
        }
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn numeric() -> Self {
        Self::new(FieldKind::Numeric)
    }

    pub fn geo() -> Self {
        Self::new(FieldKind::Geo)
    }

    pub fn tag() -> Self {
        Self::new(FieldKind::Tag)
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    /// WEIGHT is emitted only for TEXT fields.
    fn applicable_weight(&self) -> Option<f64> {
        match self.kind {
            FieldKind::Text => self.weight,
            _ => None,
        }
    }

    /// SEPARATOR is emitted only for TAG fields.
    fn applicable_separator(&self) -> Option<char> {
        match self.kind {
            FieldKind::Tag => self.separator,
            _ => None,
        }
    }

    /// Sub-tokens for one field in the FT.CREATE SCHEMA clause:
    /// `[name, KIND, (WEIGHT w)?, (SEPARATOR s)?, (SORTABLE)?, (NOINDEX)?]`
    fn schema_args(&self, name: &str) -> Vec<String> {
        let mut args = vec![name.to_string(), self.kind.to_string()];

        if let Some(weight) = self.applicable_weight() {
            args.push("WEIGHT".to_string());
            args.push(weight.to_string());
        }
        if let Some(separator) = self.applicable_separator() {
            args.push("SEPARATOR".to_string());
            args.push(separator.to_string());
        }
        if self.sortable {
            args.push("SORTABLE".to_string());
        }
        if self.no_index {
            args.push("NOINDEX".to_string());
        }

        args
    }
}

/// Named-field index definition, immutable once handed to the client.
#[derive(Debug, Clone)]
pub struct Schema {
    key: String,
    fields: Vec<(String, FieldOptions)>,
}

impl Schema {
    /// Create an empty schema for the given index key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field with explicit options.
    pub fn field(mut self, name: impl Into<String>, options: FieldOptions) -> Self {
        self.fields.push((name.into(), options));
        self
    }

    /// Add a text field.
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::text())
    }

    /// Add a weighted text field.
    pub fn text_weighted(self, name: impl Into<String>, weight: f64) -> Self {
        self.field(name, FieldOptions::text().weight(weight))
    }

    /// Add a sortable text field.
    pub fn text_sortable(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::text().sortable())
    }

    /// Add a numeric field.
    pub fn numeric(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::numeric())
    }

    /// Add a sortable numeric field.
    pub fn numeric_sortable(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::numeric().sortable())
    }

    /// Add a geo field.
    pub fn geo(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::geo())
    }

    /// Add a tag field with the default `,` separator.
    pub fn tag(self, name: impl Into<String>) -> Self {
        self.field(name, FieldOptions::tag())
    }

    /// Add a tag field with a custom separator.
    pub fn tag_separated(self, name: impl Into<String>, separator: char) -> Self {
        self.field(name, FieldOptions::tag().separator(separator))
    }

    /// The index key this schema describes.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattened schema tokens for FT.CREATE, fields in insertion order.
    pub fn field_args(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(name, options)| options.schema_args(name))
            .collect()
    }
}

/// One indexed record: an id plus typed field values in insertion order.
#[derive(Debug, Clone)]
pub struct Document {
    doc_id: String,
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            fields: Vec::new(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Set a field to an explicit typed value.
    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FieldValue::Text(value.into()))
    }

    pub fn numeric(self, name: impl Into<String>, value: f64) -> Self {
        self.field(name, FieldValue::Numeric(value))
    }

    pub fn geo(self, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        self.field(name, FieldValue::Geo { lat, lng })
    }

    pub fn tags(self, name: impl Into<String>, tags: Vec<String>) -> Self {
        self.field(name, FieldValue::tags(tags))
    }

    /// `[name, token]` pairs for the FT.ADD FIELDS clause, in insertion
    /// order.
    pub fn field_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.fields.len() * 2);
        for (name, value) in &self.fields {
            args.push(name.clone());
            args.push(value.wire_token());
        }
        args
    }
}
