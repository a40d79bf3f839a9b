use serde::{Deserialize, Serialize};

/// One nutrition entry as returned by the lookup service.
///
/// Field names match the upstream JSON exactly so result sets pass through
/// to callers verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub name: String,
    pub calories: f64,
    pub serving_size_g: f64,
    pub fat_total_g: f64,
    pub fat_saturated_g: f64,
    pub protein_g: f64,
    pub sodium_mg: f64,
    pub potassium_mg: f64,
    pub cholesterol_mg: f64,
    pub carbohydrates_total_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
}
