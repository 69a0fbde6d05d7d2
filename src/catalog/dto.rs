use serde::{Deserialize, Serialize};

use crate::nutrition::NutritionTotals;

/// A foreign reference as the backend returns it: populated with the
/// referenced document, or left as its bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Populated(T),
    Id(String),
}

impl<T: HasId> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Populated(doc) => doc.id(),
            Ref::Id(id) => id,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Populated(doc) => Some(doc),
            Ref::Id(_) => None,
        }
    }
}

pub trait HasId {
    fn id(&self) -> &str;
}

/// Catalog ingredient. Nutrition is per 100 grams; any value may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngredientProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "caloriesPer100g", default)]
    pub calories_per_100g: Option<f64>,
    #[serde(rename = "proteinPer100g", default)]
    pub protein_per_100g: Option<f64>,
    #[serde(rename = "fatPer100g", default)]
    pub fat_per_100g: Option<f64>,
    #[serde(rename = "carbsPer100g", default)]
    pub carbs_per_100g: Option<f64>,
    #[serde(rename = "fiberPer100g", default)]
    pub fiber_per_100g: Option<f64>,
    /// Owner; `None` for shared catalog entries.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

impl HasId for IngredientProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A reusable dish. `totals` is the nutrition of one unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DishProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default)]
    pub totals: Option<NutritionTotals>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

impl HasId for DishProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Grams of one ingredient, inside a meal or a dish.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IngredientEntry {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "ingredientId", default)]
    pub ingredient: Option<Ref<IngredientProfile>>,
    /// Grams.
    #[serde(default)]
    pub quantity: Option<f64>,
}

/// Units of one dish inside a meal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DishEntry {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "dishId", default)]
    pub dish: Option<Ref<DishProfile>>,
    /// Servings.
    #[serde(default)]
    pub quantity: Option<f64>,
}

/// Body for creating or updating an ingredient.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "caloriesPer100g")]
    pub calories_per_100g: f64,
    #[serde(rename = "fatPer100g")]
    pub fat_per_100g: f64,
    #[serde(rename = "carbsPer100g")]
    pub carbs_per_100g: f64,
    #[serde(rename = "proteinPer100g")]
    pub protein_per_100g: f64,
    #[serde(rename = "fiberPer100g")]
    pub fiber_per_100g: f64,
    pub user_id: String,
}

/// One ingredient line of a dish being saved, with its computed portion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishIngredientLine {
    pub ingredient_id: String,
    pub quantity: f64,
    #[serde(flatten)]
    pub nutrition: NutritionTotals,
}

/// Body for creating or updating a dish.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishInput {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<DishIngredientLine>,
    pub user_id: String,
}
