// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for the search client.
//!
//! Transport errors are surfaced unmodified and never retried at this
//! layer. Engine-side domain errors (e.g. "Unknown Index name") arrive as
//! transport errors and are recognized by substring match where the
//! bootstrap needs to branch on them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Error from the Redis connection or the engine itself.
    #[error("transport error: {0}")]
    Transport(#[from] redis::RedisError),

    /// The engine replied with a shape this client does not understand.
    #[error("unexpected reply to {command}: {detail}")]
    Protocol { command: String, detail: String },

    /// Caller contract violation, raised before any round-trip is attempted.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error is the engine's "index does not exist" reply.
    ///
    /// RediSearch reports a missing index as a plain error string, so the
    /// bootstrap matches on the message rather than a structured code.
    pub fn is_unknown_index(&self) -> bool {
        matches!(self, SearchError::Transport(_)) && self.to_string().contains("Unknown Index name")
    }

    /// Whether this error is the "wrong number of arguments" reply used by
    /// the zero-argument FT.CREATE module probe.
    pub fn is_arity_error(&self) -> bool {
        self.to_string().contains("ERR wrong number of arguments")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_error(msg: &str) -> SearchError {
        SearchError::Transport(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "",
            msg.to_string(),
        )))
    }

    #[test]
    fn unknown_index_is_recognized() {
        assert!(engine_error("Unknown Index name").is_unknown_index());
        assert!(!engine_error("some other failure").is_unknown_index());
    }

    #[test]
    fn arity_error_is_recognized() {
        assert!(engine_error("ERR wrong number of arguments for 'ft.create' command").is_arity_error());
        assert!(!engine_error("ERR unknown command").is_arity_error());
    }

    #[test]
    fn config_error_is_not_unknown_index() {
        let err = SearchError::Config("Unknown Index name".into());
        assert!(!err.is_unknown_index());
    }
}
