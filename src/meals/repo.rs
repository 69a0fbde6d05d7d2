use tracing::instrument;

use super::dto::{Meal, MealPayload, MealQuery};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
};

/// The meal for (user, date, meal type), or `None` when none was logged yet.
#[instrument(skip(api))]
pub async fn get_by_date(api: &ApiClient, query: &MealQuery) -> ClientResult<Option<Meal>> {
    match api.get_query::<Meal, _>("/meals/by-date", query).await {
        Ok(meal) => Ok(Some(meal)),
        Err(ClientError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

#[instrument(skip(api, payload), fields(meal_type = %payload.meal_type))]
pub async fn create(api: &ApiClient, payload: &MealPayload) -> ClientResult<()> {
    api.post_unit("/meals", payload).await
}

#[instrument(skip(api, payload), fields(meal_type = %payload.meal_type))]
pub async fn update(api: &ApiClient, meal_id: &str, payload: &MealPayload) -> ClientResult<()> {
    api.put_unit(&format!("/meals/{}", meal_id), payload).await
}
