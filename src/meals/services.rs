use time::Date;
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{DiarySummary, MacroTargets, Meal, MealPayload, MealQuery, MealType},
    repo,
};
use crate::{
    api::ApiClient,
    body,
    error::{ClientError, ClientResult},
    nutrition::{aggregate_meal, NutritionTotals},
};

async fn query_for(api: &ApiClient, date: Date, meal_type: MealType) -> ClientResult<MealQuery> {
    Ok(MealQuery {
        user_id: api.session().user_id().await?,
        date,
        meal_type,
    })
}

fn check_quantity(quantity: f64) -> ClientResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(ClientError::Validation(vec![
            "quantity must be greater than zero".to_string(),
        ]));
    }
    Ok(())
}

/// Creates the meal when none exists for the key, otherwise rewrites it
/// with `edit` applied.
async fn upsert_meal<F>(api: &ApiClient, query: &MealQuery, edit: F) -> ClientResult<()>
where
    F: FnOnce(&mut MealPayload),
{
    match repo::get_by_date(api, query).await? {
        None => {
            let mut payload = MealPayload::empty(query);
            edit(&mut payload);
            repo::create(api, &payload).await?;
            info!(meal_type = %query.meal_type, "meal created");
        }
        Some(meal) => {
            let mut payload = MealPayload::from_meal(&meal, &query.user_id);
            edit(&mut payload);
            repo::update(api, &meal.id, &payload).await?;
            info!(meal_id = %meal.id, "meal updated");
        }
    }
    Ok(())
}

/// Adds `grams` of an ingredient to the meal, replacing an earlier
/// quantity for the same ingredient.
#[instrument(skip(api))]
pub async fn log_ingredient(
    api: &ApiClient,
    date: Date,
    meal_type: MealType,
    ingredient_id: &str,
    grams: f64,
) -> ClientResult<()> {
    check_quantity(grams)?;
    let query = query_for(api, date, meal_type).await?;
    upsert_meal(api, &query, |p| p.upsert_ingredient(ingredient_id, grams)).await
}

#[instrument(skip(api))]
pub async fn log_dish(
    api: &ApiClient,
    date: Date,
    meal_type: MealType,
    dish_id: &str,
    units: f64,
) -> ClientResult<()> {
    check_quantity(units)?;
    let query = query_for(api, date, meal_type).await?;
    upsert_meal(api, &query, |p| p.upsert_dish(dish_id, units)).await
}

/// Drops the ingredient entry `entry_id` from `meal` and saves the rest.
#[instrument(skip(api, meal), fields(meal_id = %meal.id))]
pub async fn remove_ingredient(api: &ApiClient, meal: &Meal, entry_id: &str) -> ClientResult<()> {
    let user_id = api.session().user_id().await?;
    let mut trimmed = meal.clone();
    trimmed
        .ingredients
        .retain(|e| e.id.as_deref() != Some(entry_id));
    if trimmed.ingredients.len() == meal.ingredients.len() {
        return Err(ClientError::NotFound);
    }
    repo::update(api, &meal.id, &MealPayload::from_meal(&trimmed, &user_id)).await
}

#[instrument(skip(api, meal), fields(meal_id = %meal.id))]
pub async fn remove_dish(api: &ApiClient, meal: &Meal, entry_id: &str) -> ClientResult<()> {
    let user_id = api.session().user_id().await?;
    let mut trimmed = meal.clone();
    trimmed.dish.retain(|e| e.id.as_deref() != Some(entry_id));
    if trimmed.dish.len() == meal.dish.len() {
        return Err(ClientError::NotFound);
    }
    repo::update(api, &meal.id, &MealPayload::from_meal(&trimmed, &user_id)).await
}

/// Meals of the signed-in user on `date` that still show something.
#[instrument(skip(api))]
pub async fn day_meals(api: &ApiClient, date: Date) -> ClientResult<Vec<Meal>> {
    let mut meals = Vec::new();
    for meal_type in MealType::ALL {
        let query = query_for(api, date, meal_type).await?;
        if let Some(meal) = repo::get_by_date(api, &query).await? {
            if meal.has_content() {
                meals.push(meal);
            }
        }
    }
    Ok(meals)
}

/// Consumed, target and remaining calories for `date`. Remaining never
/// drops below zero.
///
/// Only a missing session aborts. Other failures degrade: no plan means a
/// target of 0, a failed meal fetch leaves that meal out, a failed
/// calculation fetch leaves the macro targets at 0.
#[instrument(skip(api))]
pub async fn diary_summary(api: &ApiClient, date: Date) -> ClientResult<DiarySummary> {
    let user_id = api.session().user_id().await?;

    let target_calories = match body::repo::current_plan(api).await {
        Ok(plan) => plan.daily_calories,
        Err(ClientError::SessionExpired) => return Err(ClientError::SessionExpired),
        Err(e) => {
            warn!(error = %e, "diet plan unavailable");
            0.0
        }
    };

    let mut consumed = NutritionTotals::zero();
    let mut warnings = Vec::new();
    for meal_type in MealType::ALL {
        let query = MealQuery {
            user_id: user_id.clone(),
            date,
            meal_type,
        };
        match repo::get_by_date(api, &query).await {
            Ok(Some(meal)) => {
                let agg = aggregate_meal(&meal);
                consumed += agg.totals;
                warnings.extend(agg.warnings.into_iter().map(|w| (meal_type, w)));
            }
            Ok(None) => debug!(%meal_type, "no meal logged"),
            Err(ClientError::SessionExpired) => return Err(ClientError::SessionExpired),
            Err(e) => warn!(%meal_type, error = %e, "meal fetch failed"),
        }
    }

    let target_macros = match body::repo::newest(api).await {
        Ok(calc) => MacroTargets {
            carbs: calc.carbs.unwrap_or(0.0),
            protein: calc.protein.unwrap_or(0.0),
            fat: calc.fat.unwrap_or(0.0),
            fiber: calc.fiber.unwrap_or(0.0),
        },
        Err(ClientError::SessionExpired) => return Err(ClientError::SessionExpired),
        Err(e) => {
            warn!(error = %e, "macro targets unavailable");
            MacroTargets::default()
        }
    };

    Ok(DiarySummary {
        date,
        consumed,
        target_calories,
        remaining_calories: (target_calories - consumed.calories).max(0.0),
        target_macros,
        warnings,
    })
}
