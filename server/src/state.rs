use std::sync::{Arc, RwLock};

use chrono::Utc;

use crate::{catalog::Catalog, config::Config, failure::FailureInjector, models::PantryItem};

pub struct State {
    pub config: Config,
    pub catalog: Catalog,
    pub pantry: PantryStore,
    pub pantry_failures: FailureInjector,
    pub search_failures: FailureInjector,
}

impl State {
    pub fn new() -> anyhow::Result<Arc<Self>> {
        let config = Config::load();
        let catalog = Catalog::load(&config.data_dir.join("foods.json"))?;

        Ok(Self::with_parts(config, catalog))
    }

    pub fn with_parts(config: Config, catalog: Catalog) -> Arc<Self> {
        let pantry_failures =
            FailureInjector::new(config.pantry_failure_rate, config.failure_seed);
        let search_failures =
            FailureInjector::new(config.search_failure_rate, config.failure_seed);

        Arc::new(Self {
            catalog,
            pantry: PantryStore::seeded(),
            pantry_failures,
            search_failures,
            config,
        })
    }
}

/// Owned in-memory inventory. Reset to the demo seed at process start and
/// mutated only through [`prepend`]; items are never updated or removed.
///
/// [`prepend`]: PantryStore::prepend
pub struct PantryStore {
    items: RwLock<Vec<PantryItem>>,
}

impl PantryStore {
    pub fn seeded() -> Self {
        let now = Utc::now();

        Self {
            items: RwLock::new(vec![
                PantryItem {
                    id: "p1".to_string(),
                    name: "Apple".to_string(),
                    quantity: 6.0,
                    category: "Fruits".to_string(),
                    added_at: now,
                },
                PantryItem {
                    id: "p2".to_string(),
                    name: "Brown Rice (uncooked)".to_string(),
                    quantity: 2.0,
                    category: "Grains".to_string(),
                    added_at: now,
                },
            ]),
        }
    }

    pub fn snapshot(&self) -> Vec<PantryItem> {
        self.items
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Newest items first, matching the list order the read endpoint serves.
    pub fn prepend(&self, item: PantryItem) {
        self.items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(0, item);
    }
}
