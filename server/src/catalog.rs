use std::{fs, path::Path};

use anyhow::Context;
use tracing::info;

use crate::models::FoodRecord;

pub const SEARCH_LIMIT: usize = 100;

/// Static, read-only food catalog loaded once at startup.
pub struct Catalog {
    foods: Vec<FoodRecord>,
}

impl Catalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading food catalog at {}", path.display()))?;
        let foods: Vec<FoodRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing food catalog at {}", path.display()))?;

        info!("Loaded {} catalog foods", foods.len());

        Ok(Self { foods })
    }

    pub fn from_records(foods: Vec<FoodRecord>) -> Self {
        Self { foods }
    }

    /// Case-insensitive substring match over descriptions, capped at
    /// [`SEARCH_LIMIT`]. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<FoodRecord> {
        let needle = query.to_lowercase();

        self.foods
            .iter()
            .filter(|food| food.description.to_lowercase().contains(&needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }
}
