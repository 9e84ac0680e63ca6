// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Command transport for the RediSearch module.
//!
//! Every component in this crate talks to Redis through the
//! [`CommandTransport`] trait, so the connection can be injected (and
//! mocked in tests) instead of living in module-global state. The default
//! implementation is [`RedisTransport`], a thin wrapper over a shared
//! `redis::aio::ConnectionManager`.
//!
//! Commands are dispatched exactly once; errors surface to the caller
//! unmodified. Only the initial connection handshake is retried.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Value};
use tracing::debug;

use crate::error::SearchError;
use crate::metrics;
use crate::retry::{connect_with_backoff, ConnectBackoff};

/// A single-shot command/response channel to the search engine.
///
/// Sequential calls from one caller are strictly ordered: the second
/// round-trip is only issued after the first completes. No ordering is
/// guaranteed between concurrent callers sharing the same transport.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Send `command` with positional `args` and return the raw reply.
    async fn send(&self, command: &str, args: &[String]) -> Result<Value, SearchError>;
}

/// Default transport over a shared multiplexed Redis connection.
pub struct RedisTransport {
    connection: ConnectionManager,
}

impl RedisTransport {
    /// Connect to Redis, retrying the handshake with backoff so a bad URL
    /// fails within seconds.
    pub async fn connect(url: &str) -> Result<Self, SearchError> {
        let client = Client::open(url)?;

        let connection = connect_with_backoff("redis_connect", &ConnectBackoff::default(), || {
            let client = client.clone();
            async move { ConnectionManager::new(client).await }
        })
        .await?;

        Ok(Self { connection })
    }

    /// Wrap an existing connection manager (for sharing with other layers).
    pub fn from_connection(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CommandTransport for RedisTransport {
    async fn send(&self, command: &str, args: &[String]) -> Result<Value, SearchError> {
        let mut conn = self.connection.clone();

        debug!(command = %command, args = ?args, "dispatch");

        let mut cmd = redis::cmd(command);
        for arg in args {
            cmd.arg(arg);
        }

        match cmd.query_async(&mut conn).await {
            Ok(value) => {
                metrics::record_command(command, "success");
                Ok(value)
            }
            Err(e) => {
                metrics::record_command(command, "error");
                Err(e.into())
            }
        }
    }
}

/// Render one reply element as a string.
pub(crate) fn reply_string(value: &Value) -> Option<String> {
    match value {
        Value::Data(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Status(s) => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interpret a reply as a flat array of strings, or fail with the shape
/// that was actually received.
pub(crate) fn bulk_strings(command: &str, value: Value) -> Result<Vec<Value>, SearchError> {
    match value {
        Value::Bulk(items) => Ok(items),
        Value::Nil => Ok(vec![]),
        other => Err(SearchError::Protocol {
            command: command.to_string(),
            detail: format!("expected array reply, got {:?}", other),
        }),
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording transport for dispatch tests.

    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use redis::Value;

    use crate::error::SearchError;
    use crate::transport::CommandTransport;

    /// Records every dispatched command and answers from a queue of canned
    /// replies (defaulting to `OK` when the queue is empty).
    #[derive(Default)]
    pub struct MockTransport {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        replies: Mutex<VecDeque<Result<Value, SearchError>>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn push_reply(&self, reply: Result<Value, SearchError>) {
            self.replies.lock().push_back(reply);
        }

        pub fn push_error(&self, message: &str) {
            self.push_reply(Err(SearchError::Transport(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "",
                message.to_string(),
            )))));
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl CommandTransport for MockTransport {
        async fn send(&self, command: &str, args: &[String]) -> Result<Value, SearchError> {
            self.calls.lock().push((command.to_string(), args.to_vec()));
            self.replies.lock().pop_front().unwrap_or(Ok(Value::Okay))
        }
    }
}
