//! Client-side nutrition totals for meals, dishes and portions.
//!
//! Ingredients are scaled from their per-100g profile by grams consumed.
//! Dishes contribute their per-unit totals times units consumed. Entries that
//! cannot be computed are skipped and reported as warnings; they never abort
//! the rest of the meal.

use std::fmt;

use serde::Serialize;

use super::NutritionTotals;
use crate::{
    catalog::dto::{DishEntry, IngredientEntry, IngredientProfile, Ref},
    meals::dto::Meal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Ingredient,
    Dish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The referenced ingredient or dish no longer exists.
    MissingReference,
    /// The reference exists but carries no usable nutrition.
    MissingNutrition,
    /// Quantity absent or negative.
    InvalidQuantity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationWarning {
    pub source: EntrySource,
    /// Position of the entry in its list.
    pub index: usize,
    pub entry_id: Option<String>,
    pub kind: WarningKind,
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match self.source {
            EntrySource::Ingredient => "ingredient",
            EntrySource::Dish => "dish",
        };
        let reason = match self.kind {
            WarningKind::MissingReference => "reference no longer exists",
            WarningKind::MissingNutrition => "no nutrition data",
            WarningKind::InvalidQuantity => "quantity missing or invalid",
        };
        write!(f, "{source} #{}: {reason}", self.index + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    pub totals: NutritionTotals,
    pub warnings: Vec<AggregationWarning>,
}

/// Totals of one meal plus a warning for every entry that was skipped.
pub fn aggregate_meal(meal: &Meal) -> Aggregation {
    let mut out = Aggregation::default();

    for (index, entry) in meal.ingredients.iter().enumerate() {
        match ingredient_contribution(entry) {
            Ok(n) => out.totals += n,
            Err(kind) => out.warnings.push(AggregationWarning {
                source: EntrySource::Ingredient,
                index,
                entry_id: entry.id.clone(),
                kind,
            }),
        }
    }

    for (index, entry) in meal.dish.iter().enumerate() {
        match dish_contribution(entry) {
            Ok(n) => out.totals += n,
            Err(kind) => out.warnings.push(AggregationWarning {
                source: EntrySource::Dish,
                index,
                entry_id: entry.id.clone(),
                kind,
            }),
        }
    }

    out
}

pub fn aggregate(meal: &Meal) -> NutritionTotals {
    aggregate_meal(meal).totals
}

/// Sum over several meals (a day).
pub fn sum_day(meals: &[Meal]) -> NutritionTotals {
    meals.iter().map(aggregate).sum()
}

/// Nutrition of `grams` of an ingredient. Missing values count as zero.
pub fn portion(profile: &IngredientProfile, grams: f64) -> NutritionTotals {
    per_100g(profile, profile.calories_per_100g.unwrap_or(0.0)) * (grams / 100.0)
}

/// Per-unit totals of a dish composed of `ingredients`. Unlike meal
/// aggregation, an ingredient without calories still adds its macros.
pub fn dish_totals(ingredients: &[IngredientEntry]) -> NutritionTotals {
    ingredients
        .iter()
        .filter_map(|entry| {
            let profile = entry.ingredient.as_ref()?.populated()?;
            let grams = entry.quantity.filter(|q| *q >= 0.0).unwrap_or(0.0);
            Some(portion(profile, grams))
        })
        .sum()
}

fn ingredient_contribution(entry: &IngredientEntry) -> Result<NutritionTotals, WarningKind> {
    let profile = match &entry.ingredient {
        None => return Err(WarningKind::MissingReference),
        Some(Ref::Id(_)) => return Err(WarningKind::MissingNutrition),
        Some(Ref::Populated(profile)) => profile,
    };
    let calories = profile.calories_per_100g.ok_or(WarningKind::MissingNutrition)?;
    let grams = valid_quantity(entry.quantity)?;
    Ok(per_100g(profile, calories) * (grams / 100.0))
}

fn dish_contribution(entry: &DishEntry) -> Result<NutritionTotals, WarningKind> {
    let dish = match &entry.dish {
        None => return Err(WarningKind::MissingReference),
        Some(Ref::Id(_)) => return Err(WarningKind::MissingNutrition),
        Some(Ref::Populated(dish)) => dish,
    };
    let totals = dish.totals.ok_or(WarningKind::MissingNutrition)?;
    let units = valid_quantity(entry.quantity)?;
    Ok(totals * units)
}

fn valid_quantity(quantity: Option<f64>) -> Result<f64, WarningKind> {
    match quantity {
        Some(q) if q.is_finite() && q >= 0.0 => Ok(q),
        _ => Err(WarningKind::InvalidQuantity),
    }
}

fn per_100g(profile: &IngredientProfile, calories: f64) -> NutritionTotals {
    NutritionTotals {
        calories,
        protein: profile.protein_per_100g.unwrap_or(0.0),
        fat: profile.fat_per_100g.unwrap_or(0.0),
        carbs: profile.carbs_per_100g.unwrap_or(0.0),
        fiber: profile.fiber_per_100g.unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dto::DishProfile;
    use crate::meals::dto::MealType;
    use time::macros::date;

    fn meal(ingredients: Vec<IngredientEntry>, dish: Vec<DishEntry>) -> Meal {
        Meal {
            id: "m1".into(),
            meal_type: MealType::Lunch,
            date: date!(2024 - 05 - 01),
            user_id: None,
            ingredients,
            dish,
        }
    }

    fn rice() -> IngredientProfile {
        IngredientProfile {
            id: "rice".into(),
            name: "Rice".into(),
            calories_per_100g: Some(200.0),
            protein_per_100g: Some(4.0),
            fat_per_100g: None,
            carbs_per_100g: Some(40.0),
            fiber_per_100g: Some(1.0),
            ..Default::default()
        }
    }

    fn ingredient(profile: Option<Ref<IngredientProfile>>, grams: Option<f64>) -> IngredientEntry {
        IngredientEntry {
            id: Some("ie".into()),
            ingredient: profile,
            quantity: grams,
        }
    }

    fn dish(calories: f64, units: Option<f64>) -> DishEntry {
        DishEntry {
            id: Some("de".into()),
            dish: Some(Ref::Populated(DishProfile {
                id: "soup".into(),
                name: "Soup".into(),
                totals: Some(NutritionTotals {
                    calories,
                    protein: 2.0,
                    ..Default::default()
                }),
                ..Default::default()
            })),
            quantity: units,
        }
    }

    #[test]
    fn empty_meal_is_zero() {
        let result = aggregate_meal(&meal(vec![], vec![]));
        assert_eq!(result.totals, NutritionTotals::zero());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn ingredient_scales_per_100g() {
        let m = meal(vec![ingredient(Some(Ref::Populated(rice())), Some(150.0))], vec![]);
        let totals = aggregate(&m);
        assert_eq!(totals.calories, 300.0);
        assert_eq!(totals.protein, 6.0);
        assert_eq!(totals.fat, 0.0);
        assert_eq!(totals.carbs, 60.0);
    }

    #[test]
    fn ingredient_is_linear_in_quantity() {
        for grams in [0.0, 1.0, 50.0, 100.0, 333.0, 1000.0] {
            let m = meal(vec![ingredient(Some(Ref::Populated(rice())), Some(grams))], vec![]);
            let expected = 200.0 * grams / 100.0;
            assert!((aggregate(&m).calories - expected).abs() < 1e-9, "grams {grams}");
        }
    }

    #[test]
    fn dish_scales_by_units_and_superposes() {
        let only_dish = aggregate(&meal(vec![], vec![dish(50.0, Some(3.0))]));
        assert_eq!(only_dish.calories, 150.0);
        assert_eq!(only_dish.protein, 6.0);

        let only_rice = aggregate(&meal(vec![ingredient(Some(Ref::Populated(rice())), Some(100.0))], vec![]));
        let both = aggregate(&meal(
            vec![ingredient(Some(Ref::Populated(rice())), Some(100.0))],
            vec![dish(50.0, Some(3.0))],
        ));
        assert_eq!(both, only_dish + only_rice);
    }

    #[test]
    fn broken_entries_are_skipped_with_warnings() {
        let mut no_calories = rice();
        no_calories.calories_per_100g = None;
        let broken_dish = DishEntry {
            id: Some("gone".into()),
            dish: None,
            quantity: Some(1.0),
        };
        let m = meal(
            vec![
                ingredient(None, Some(100.0)),
                ingredient(Some(Ref::Id("rice".into())), Some(100.0)),
                ingredient(Some(Ref::Populated(no_calories)), Some(100.0)),
                ingredient(Some(Ref::Populated(rice())), None),
                ingredient(Some(Ref::Populated(rice())), Some(50.0)),
            ],
            vec![broken_dish, dish(80.0, Some(-1.0))],
        );

        let result = aggregate_meal(&m);
        assert_eq!(result.totals.calories, 100.0);
        let kinds: Vec<_> = result.warnings.iter().map(|w| (w.source, w.index, w.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (EntrySource::Ingredient, 0, WarningKind::MissingReference),
                (EntrySource::Ingredient, 1, WarningKind::MissingNutrition),
                (EntrySource::Ingredient, 2, WarningKind::MissingNutrition),
                (EntrySource::Ingredient, 3, WarningKind::InvalidQuantity),
                (EntrySource::Dish, 0, WarningKind::MissingReference),
                (EntrySource::Dish, 1, WarningKind::InvalidQuantity),
            ]
        );
        assert_eq!(result.warnings[4].entry_id.as_deref(), Some("gone"));
        assert_eq!(result.warnings[0].to_string(), "ingredient #1: reference no longer exists");
    }

    #[test]
    fn zero_quantity_contributes_nothing_without_warning() {
        let result = aggregate_meal(&meal(
            vec![ingredient(Some(Ref::Populated(rice())), Some(0.0))],
            vec![dish(50.0, Some(0.0))],
        ));
        assert_eq!(result.totals, NutritionTotals::zero());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn aggregation_is_repeatable() {
        let m = meal(
            vec![ingredient(Some(Ref::Populated(rice())), Some(123.0))],
            vec![dish(77.7, Some(1.5))],
        );
        assert_eq!(aggregate_meal(&m), aggregate_meal(&m));
        assert_eq!(
            serde_json::to_string(&aggregate_meal(&m)).unwrap(),
            serde_json::to_string(&aggregate_meal(&m)).unwrap()
        );
    }

    #[test]
    fn day_sums_meals() {
        let breakfast = meal(vec![ingredient(Some(Ref::Populated(rice())), Some(100.0))], vec![]);
        let dinner = meal(vec![], vec![dish(50.0, Some(2.0))]);
        assert_eq!(sum_day(&[breakfast, dinner]).calories, 300.0);
    }

    #[test]
    fn dish_totals_use_missing_calories_as_zero() {
        let mut lean = rice();
        lean.calories_per_100g = None;
        let totals = dish_totals(&[
            ingredient(Some(Ref::Populated(rice())), Some(50.0)),
            ingredient(Some(Ref::Populated(lean)), Some(100.0)),
            ingredient(None, Some(100.0)),
        ]);
        assert_eq!(totals.calories, 100.0);
        assert_eq!(totals.protein, 6.0);
    }

    #[test]
    fn portion_preview() {
        let p = portion(&rice(), 100.0);
        assert_eq!(p.calories, 200.0);
        assert_eq!(p.fiber, 1.0);
    }
}
