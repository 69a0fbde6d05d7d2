use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::catalog::dto::{DishEntry, IngredientEntry};
use crate::nutrition::{AggregationWarning, NutritionTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown meal type {s:?}"))
    }
}

/// One meal of one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "_id")]
    pub id: String,
    pub meal_type: MealType,
    #[serde(with = "crate::dates")]
    pub date: Date,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default)]
    pub dish: Vec<DishEntry>,
}

impl Meal {
    /// True when at least one entry still points at a named catalog item.
    pub fn has_content(&self) -> bool {
        let named_ingredient = self.ingredients.iter().any(|e| {
            e.ingredient
                .as_ref()
                .and_then(|r| r.populated())
                .is_some_and(|p| !p.name.is_empty())
        });
        let named_dish = self.dish.iter().any(|e| {
            e.dish
                .as_ref()
                .and_then(|r| r.populated())
                .is_some_and(|d| !d.name.is_empty())
        });
        named_ingredient || named_dish
    }
}

/// Composite key the backend uses to look up a meal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealQuery {
    pub user_id: String,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub meal_type: MealType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub ingredient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishLine {
    pub dish_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

/// Body of `POST /meals` and `PUT /meals/{id}`: references by id only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPayload {
    pub meal_type: MealType,
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub user_id: String,
    pub ingredients: Vec<IngredientLine>,
    pub dish: Vec<DishLine>,
}

impl MealPayload {
    pub fn empty(query: &MealQuery) -> Self {
        Self {
            meal_type: query.meal_type,
            date: query.date,
            user_id: query.user_id.clone(),
            ingredients: Vec::new(),
            dish: Vec::new(),
        }
    }

    /// Flattens a fetched meal. Entries whose reference is gone cannot be
    /// sent back and are left out; an unknown quantity stays unset.
    pub fn from_meal(meal: &Meal, user_id: &str) -> Self {
        let ingredients = meal
            .ingredients
            .iter()
            .filter_map(|e| {
                Some(IngredientLine {
                    ingredient_id: e.ingredient.as_ref()?.id().to_string(),
                    quantity: e.quantity,
                })
            })
            .collect();
        let dish = meal
            .dish
            .iter()
            .filter_map(|e| {
                Some(DishLine {
                    dish_id: e.dish.as_ref()?.id().to_string(),
                    quantity: e.quantity,
                })
            })
            .collect();
        Self {
            meal_type: meal.meal_type,
            date: meal.date,
            user_id: user_id.to_string(),
            ingredients,
            dish,
        }
    }

    /// Sets the grams of an ingredient, adding it when absent.
    pub fn upsert_ingredient(&mut self, ingredient_id: &str, grams: f64) {
        match self.ingredients.iter_mut().find(|l| l.ingredient_id == ingredient_id) {
            Some(line) => line.quantity = Some(grams),
            None => self.ingredients.push(IngredientLine {
                ingredient_id: ingredient_id.to_string(),
                quantity: Some(grams),
            }),
        }
    }

    /// Sets the units of a dish, adding it when absent.
    pub fn upsert_dish(&mut self, dish_id: &str, units: f64) {
        match self.dish.iter_mut().find(|l| l.dish_id == dish_id) {
            Some(line) => line.quantity = Some(units),
            None => self.dish.push(DishLine {
                dish_id: dish_id.to_string(),
                quantity: Some(units),
            }),
        }
    }
}

/// Target macros from the latest body-metric calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTargets {
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
    pub fiber: f64,
}

/// What the diary shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiarySummary {
    #[serde(with = "crate::dates")]
    pub date: Date,
    pub consumed: NutritionTotals,
    pub target_calories: f64,
    pub remaining_calories: f64,
    pub target_macros: MacroTargets,
    pub warnings: Vec<(MealType, AggregationWarning)>,
}
