use tracing::{info, instrument, warn};

use super::{
    dto::{DishIngredientLine, DishInput, DishProfile, IngredientInput, IngredientProfile},
    repo,
};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
    nutrition::{dish_totals, portion, NutritionTotals},
};

/// Catalog entries that carry an owner.
pub trait Owned {
    fn owner(&self) -> Option<&str>;
    fn name(&self) -> &str;
}

impl Owned for IngredientProfile {
    fn owner(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Owned for DishProfile {
    fn owner(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared entries plus the ones `user_id` created.
pub fn visible_to<T: Owned>(items: Vec<T>, user_id: &str) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.owner().map_or(true, |owner| owner == user_id))
        .collect()
}

/// Case-insensitive substring match on the name. An empty query keeps all.
pub fn search<'a, T: Owned>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}

/// Ingredients the signed-in user may pick from.
#[instrument(skip(api))]
pub async fn pickable_ingredients(api: &ApiClient) -> ClientResult<Vec<IngredientProfile>> {
    let user_id = api.session().user_id().await?;
    let all = repo::list_ingredients(api).await?;
    Ok(visible_to(all, &user_id))
}

/// An ingredient form. Every nutrient is required.
#[derive(Debug, Clone, Default)]
pub struct IngredientDraft {
    /// Set when editing an existing ingredient.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub calories_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub fiber_per_100g: Option<f64>,
}

impl IngredientDraft {
    /// Form prefilled from a stored ingredient.
    pub fn from_profile(profile: &IngredientProfile) -> Self {
        Self {
            id: Some(profile.id.clone()),
            name: profile.name.clone(),
            description: profile.description.clone().unwrap_or_default(),
            category: profile.category.clone().unwrap_or_default(),
            calories_per_100g: profile.calories_per_100g,
            fat_per_100g: profile.fat_per_100g,
            carbs_per_100g: profile.carbs_per_100g,
            protein_per_100g: profile.protein_per_100g,
            fiber_per_100g: profile.fiber_per_100g,
        }
    }
}

#[instrument(skip(api))]
pub async fn edit_ingredient(api: &ApiClient, id: &str) -> ClientResult<IngredientDraft> {
    let profile = repo::get_ingredient(api, id).await?;
    Ok(IngredientDraft::from_profile(&profile))
}

fn nutrient(label: &str, value: Option<f64>, errors: &mut Vec<String>) -> f64 {
    match value {
        None => {
            errors.push(format!("{label} is required"));
            0.0
        }
        Some(v) if !v.is_finite() || v < 0.0 => {
            errors.push(format!("{label} must be a non-negative number"));
            0.0
        }
        Some(v) => v,
    }
}

pub fn validate_ingredient(draft: &IngredientDraft, user_id: &str) -> ClientResult<IngredientInput> {
    let mut errors = Vec::new();
    let name = draft.name.trim();
    let description = draft.description.trim();
    if name.is_empty() {
        errors.push("name is required".to_string());
    }
    if description.is_empty() {
        errors.push("description is required".to_string());
    }
    let input = IngredientInput {
        name: name.to_string(),
        description: description.to_string(),
        category: draft.category.trim().to_string(),
        calories_per_100g: nutrient("calories", draft.calories_per_100g, &mut errors),
        fat_per_100g: nutrient("fat", draft.fat_per_100g, &mut errors),
        carbs_per_100g: nutrient("carbs", draft.carbs_per_100g, &mut errors),
        protein_per_100g: nutrient("protein", draft.protein_per_100g, &mut errors),
        fiber_per_100g: nutrient("fiber", draft.fiber_per_100g, &mut errors),
        user_id: user_id.to_string(),
    };
    if !errors.is_empty() {
        return Err(ClientError::Validation(errors));
    }
    Ok(input)
}

/// Creates the ingredient, or updates it when the draft has an id.
#[instrument(skip(api, draft), fields(name = %draft.name))]
pub async fn save_ingredient(api: &ApiClient, draft: &IngredientDraft) -> ClientResult<()> {
    let user_id = api.session().user_id().await?;
    let input = validate_ingredient(draft, &user_id)?;
    match &draft.id {
        Some(id) => repo::update_ingredient(api, id, &input).await?,
        None => repo::create_ingredient(api, &input).await?,
    }
    info!(name = %input.name, "ingredient saved");
    Ok(())
}

/// One ingredient of a dish being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct DishComponent {
    pub ingredient: IngredientProfile,
    pub grams: f64,
}

impl DishComponent {
    pub fn nutrition(&self) -> NutritionTotals {
        portion(&self.ingredient, self.grams)
    }
}

/// Editable components of an existing dish. Entries whose ingredient is not
/// populated are left out.
pub fn components_of(dish: &DishProfile) -> Vec<DishComponent> {
    dish.ingredients
        .iter()
        .filter_map(|entry| {
            let profile = entry.ingredient.as_ref()?.populated()?;
            Some(DishComponent {
                ingredient: profile.clone(),
                grams: entry.quantity.unwrap_or(0.0),
            })
        })
        .collect()
}

/// Adds `ingredient` unless the dish already has it.
pub fn add_component(components: &mut Vec<DishComponent>, ingredient: IngredientProfile, grams: f64) -> bool {
    if components.iter().any(|c| c.ingredient.id == ingredient.id) {
        return false;
    }
    components.push(DishComponent { ingredient, grams });
    true
}

/// Payload lines, each with its portion nutrition, and the per-unit totals.
pub fn compose_dish(components: &[DishComponent]) -> (Vec<DishIngredientLine>, NutritionTotals) {
    let lines: Vec<DishIngredientLine> = components
        .iter()
        .map(|c| DishIngredientLine {
            ingredient_id: c.ingredient.id.clone(),
            quantity: c.grams,
            nutrition: c.nutrition(),
        })
        .collect();
    let totals = lines.iter().map(|l| l.nutrition).sum();
    (lines, totals)
}

#[derive(Debug, Clone, Default)]
pub struct DishDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub components: Vec<DishComponent>,
}

pub fn validate_dish(draft: &DishDraft, user_id: &str) -> ClientResult<DishInput> {
    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push("name is required".to_string());
    }
    if draft.components.is_empty() {
        errors.push("a dish needs at least one ingredient".to_string());
    }
    if draft
        .components
        .iter()
        .any(|c| !c.grams.is_finite() || c.grams <= 0.0)
    {
        errors.push("ingredient quantities must be greater than zero".to_string());
    }
    if !errors.is_empty() {
        return Err(ClientError::Validation(errors));
    }
    let (ingredients, _) = compose_dish(&draft.components);
    Ok(DishInput {
        name: draft.name.trim().to_string(),
        description: draft.description.trim().to_string(),
        ingredients,
        user_id: user_id.to_string(),
    })
}

/// Loads a stored dish into an edit form.
#[instrument(skip(api))]
pub async fn edit_dish(api: &ApiClient, id: &str) -> ClientResult<DishDraft> {
    let dish = repo::get_dish(api, id).await?;
    let components = components_of(&dish);
    if components.len() < dish.ingredients.len() {
        warn!(
            dish_id = %dish.id,
            dropped = dish.ingredients.len() - components.len(),
            "dish lines without ingredient details left out"
        );
    }
    Ok(DishDraft {
        id: Some(dish.id),
        name: dish.name,
        description: dish.description.unwrap_or_default(),
        components,
    })
}

/// Nutrition of one unit of a dish. Falls back to summing its ingredients
/// when the server sent no totals.
#[instrument(skip(api))]
pub async fn dish_nutrition(api: &ApiClient, id: &str) -> ClientResult<NutritionTotals> {
    let dish = repo::get_dish(api, id).await?;
    Ok(dish.totals.unwrap_or_else(|| dish_totals(&dish.ingredients)))
}

#[instrument(skip(api, draft), fields(name = %draft.name))]
pub async fn save_dish(api: &ApiClient, draft: &DishDraft) -> ClientResult<()> {
    let user_id = api.session().user_id().await?;
    let input = validate_dish(draft, &user_id)?;
    match &draft.id {
        Some(id) => repo::update_dish(api, id, &input).await?,
        None => repo::create_dish(api, &input).await?,
    }
    info!(name = %input.name, lines = input.ingredients.len(), "dish saved");
    Ok(())
}
