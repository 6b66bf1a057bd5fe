use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One tracked inventory entry. Created on add, never updated or deleted;
/// lives for the duration of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewPantryItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub category: String,
}

fn default_quantity() -> f64 {
    1.0
}

/// Read-only catalog record, FDC-shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub fdc_id: u64,
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient_name: String,
    pub value: f64,
    pub unit_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    Week,
    Month,
}

impl PlanMode {
    pub fn days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "weekly",
            Self::Month => "monthly",
        }
    }
}

/// Body of `POST /api/diet/{week,month}`. Items only need a name; anything
/// else the caller sends along is ignored.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub pantry: Vec<PlanFood>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanFood {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

/// Generated plan: serializes as a `"Day N"` → meals object, days in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietPlan {
    pub days: Vec<DayMeals>,
}

impl Serialize for DietPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (index, meals) in self.days.iter().enumerate() {
            map.serialize_entry(&format!("Day {}", index + 1), meals)?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub mode: &'static str,
    pub plan: DietPlan,
}
