use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// Directory holding the food catalog and the static fallback bodies.
    pub data_dir: PathBuf,
    pub pantry_failure_rate: f64,
    pub search_failure_rate: f64,
    /// Pins the failure injectors to a reproducible sequence when set.
    pub failure_seed: Option<u64>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8080"),
            data_dir: try_load("DATA_DIR", "data"),
            pantry_failure_rate: try_load("PANTRY_FAILURE_RATE", "0.2"),
            search_failure_rate: try_load("SEARCH_FAILURE_RATE", "0.25"),
            failure_seed: try_load_optional("FAILURE_SEED"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn try_load_optional<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: Display,
{
    env::var(key).ok().map(|raw| {
        raw.parse()
            .map_err(|e| {
                warn!("Invalid {key} value: {e}");
            })
            .expect("Environment misconfigured!")
    })
}
