// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Connect-time retry with exponential backoff.
//!
//! Only the initial `ConnectionManager` handshake is retried; command
//! round-trips are dispatched exactly once and their errors surface to the
//! caller unmodified.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Backoff schedule for establishing the initial connection.
///
/// Fails after a handful of attempts so a bad URL is reported in seconds
/// rather than hanging the caller.
#[derive(Debug, Clone)]
pub struct ConnectBackoff {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for ConnectBackoff {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            factor: 2.0,
        }
    }
}

#[cfg(test)]
impl ConnectBackoff {
    /// Minimal delays for tests.
    pub fn test() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            factor: 2.0,
        }
    }
}

pub async fn connect_with_backoff<F, Fut, T, E>(
    operation_name: &str,
    backoff: &ConnectBackoff,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delay = backoff.initial_delay;
    let mut attempts = 0;

    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                attempts += 1;
                if attempts >= backoff.max_attempts {
                    return Err(err);
                }
                warn!(
                    "'{}' failed (attempt {}/{}): {}. Retrying in {:?}",
                    operation_name, attempts, backoff.max_attempts, err, delay
                );
                sleep(delay).await;
                delay = delay.mul_f64(backoff.factor).min(backoff.max_delay);
            }
        }
    }
}
