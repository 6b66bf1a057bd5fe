//! # Failover Fetch
//!
//! Data-access client that substitutes a static fallback resource when a
//! primary network source is unavailable or slow.
//!
//! One fetch cycle:
//! - The primary request races a timer of `timeout_budget` (default 5 seconds).
//!   If the timer fires first, the in-flight request is dropped and counts as
//!   a failure. A non-success status or an undecodable body also counts.
//! - On any primary failure with a configured `fallback_url`, one fallback
//!   request runs with **no** budget. Its parsed body becomes the result; the
//!   error stays primary-only. If the fallback also fails, the result is empty
//!   and the error carries both causes.
//!
//! ## Observation
//!
//! [`fetch_with_failover`] returns a [`FetchOutcome`] directly. [`FetchCell`]
//! wraps it in a `{data, loading, error}` observation published over a
//! [`watch`] channel, with a generation counter so a superseded cycle can
//! never overwrite the state of a newer one.
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::{sync::watch, time::timeout};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_BUDGET: Duration = Duration::from_secs(5);

/// Per-invocation knobs for a fetch cycle.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_budget: Duration,
    pub fallback_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_budget: DEFAULT_TIMEOUT_BUDGET,
            fallback_url: None,
        }
    }
}

/// Why a single request attempt failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("status {0}")]
    Status(StatusCode),

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Why a whole fetch cycle failed (or partially failed).
///
/// `Primary` is also reported when the fallback rescued the data, so callers
/// can surface a non-blocking notice while rendering fallback content.
#[derive(Debug, Error)]
pub enum FailoverError {
    #[error("primary fetch failed: {0}")]
    Primary(#[source] FetchFailure),

    #[error("primary fetch failed ({primary}); fallback fetch failed ({fallback})")]
    Both {
        primary: FetchFailure,
        fallback: FetchFailure,
    },
}

/// Result of one completed fetch cycle.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub data: Option<T>,
    pub error: Option<FailoverError>,
}

/// Run one full primary-then-fallback cycle.
pub async fn fetch_with_failover<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    config: &FetchConfig,
) -> FetchOutcome<T> {
    let primary = match bounded_get::<T>(http, url, config.timeout_budget).await {
        Ok(data) => {
            return FetchOutcome {
                data: Some(data),
                error: None,
            };
        }
        Err(failure) => failure,
    };

    warn!(url, error = %primary, "primary fetch failed");

    let Some(fallback_url) = config.fallback_url.as_deref() else {
        return FetchOutcome {
            data: None,
            error: Some(FailoverError::Primary(primary)),
        };
    };

    // The fallback request deliberately carries no budget; it points at a
    // static local resource.
    match get_json::<T>(http, fallback_url).await {
        Ok(data) => FetchOutcome {
            data: Some(data),
            error: Some(FailoverError::Primary(primary)),
        },
        Err(fallback) => {
            warn!(fallback_url, error = %fallback, "fallback fetch failed");
            FetchOutcome {
                data: None,
                error: Some(FailoverError::Both { primary, fallback }),
            }
        }
    }
}

async fn bounded_get<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    budget: Duration,
) -> Result<T, FetchFailure> {
    match timeout(budget, get_json(http, url)).await {
        Ok(result) => result,
        // Dropping the in-flight future aborts the request.
        Err(_) => Err(FetchFailure::TimedOut(budget)),
    }
}

async fn get_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, FetchFailure> {
    let response = http.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchFailure::Status(status));
    }

    response.json::<T>().await.map_err(FetchFailure::Decode)
}

/// Three-field view of a fetch cycle: `{data, loading, error}`.
#[derive(Debug)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FailoverError>,
}

impl<T> FetchState<T> {
    fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Publishes [`FetchState`] observations for successive [`load`] invocations.
///
/// Each `load` bumps a generation counter; a cycle publishes its result only
/// if its generation is still current, so a late-arriving response from a
/// superseded invocation is dropped instead of overwriting newer state.
///
/// [`load`]: FetchCell::load
pub struct FetchCell<T> {
    http: Client,
    generation: AtomicU64,
    tx: watch::Sender<FetchState<T>>,
}

impl<T: DeserializeOwned> FetchCell<T> {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(http: Client) -> Self {
        let (tx, _) = watch::channel(FetchState::idle());
        Self {
            http,
            generation: AtomicU64::new(0),
            tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.tx.subscribe()
    }

    /// Run one fetch cycle and publish the observation, unless a newer `load`
    /// has started in the meantime. Returns the cycle's generation.
    pub async fn load(&self, url: &str, config: &FetchConfig) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.tx.send_replace(FetchState {
            data: None,
            loading: true,
            error: None,
        });

        let outcome = fetch_with_failover::<T>(&self.http, url, config).await;

        if self.generation.load(Ordering::SeqCst) == generation {
            self.tx.send_replace(FetchState {
                data: outcome.data,
                loading: false,
                error: outcome.error,
            });
        } else {
            debug!(url, generation, "dropping superseded fetch result");
        }

        generation
    }
}

impl<T: DeserializeOwned> Default for FetchCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
