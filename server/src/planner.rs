use crate::models::{DayMeals, DietPlan, PlanFood, PlanMode};

pub const DEFAULT_BREAKFAST: &str = "Cereal";
pub const DEFAULT_LUNCH: &str = "Salad";
pub const DEFAULT_DINNER: &str = "Rice & Veg";

/// Assign pantry items to calendar days cyclically.
///
/// For 0-based day `d` over a pantry of length `L`: breakfast is item
/// `d % L`, lunch `(d + 1) % L`, dinner `(d + 2) % L`. An empty pantry, or a
/// slot resolving to an item without a name, falls back to the slot default.
/// Pure and deterministic in `(pantry, mode)`.
pub fn plan_from_pantry(pantry: &[PlanFood], mode: PlanMode) -> DietPlan {
    let days = (0..mode.days())
        .map(|day| DayMeals {
            breakfast: meal_for(pantry, day, DEFAULT_BREAKFAST),
            lunch: meal_for(pantry, day + 1, DEFAULT_LUNCH),
            dinner: meal_for(pantry, day + 2, DEFAULT_DINNER),
        })
        .collect();

    DietPlan { days }
}

fn meal_for(pantry: &[PlanFood], slot: usize, default: &str) -> String {
    if pantry.is_empty() {
        return default.to_string();
    }

    let name = &pantry[slot % pantry.len()].name;
    if name.is_empty() {
        default.to_string()
    } else {
        name.clone()
    }
}
