use tracing::instrument;

use super::dto::{DishInput, DishProfile, IngredientInput, IngredientProfile};
use crate::{api::ApiClient, error::ClientResult};

#[instrument(skip(api))]
pub async fn list_ingredients(api: &ApiClient) -> ClientResult<Vec<IngredientProfile>> {
    api.get("/ingredients").await
}

#[instrument(skip(api))]
pub async fn get_ingredient(api: &ApiClient, id: &str) -> ClientResult<IngredientProfile> {
    api.get(&format!("/ingredients/{}", id)).await
}

#[instrument(skip(api, input), fields(name = %input.name))]
pub async fn create_ingredient(api: &ApiClient, input: &IngredientInput) -> ClientResult<()> {
    api.post_unit("/ingredients", input).await
}

#[instrument(skip(api, input), fields(name = %input.name))]
pub async fn update_ingredient(api: &ApiClient, id: &str, input: &IngredientInput) -> ClientResult<()> {
    api.put_unit(&format!("/ingredients/{}", id), input).await
}

#[instrument(skip(api))]
pub async fn get_dish(api: &ApiClient, id: &str) -> ClientResult<DishProfile> {
    api.get(&format!("/dish/{}", id)).await
}

#[instrument(skip(api, input), fields(name = %input.name))]
pub async fn create_dish(api: &ApiClient, input: &DishInput) -> ClientResult<()> {
    api.post_unit("/dish", input).await
}

#[instrument(skip(api, input), fields(name = %input.name))]
pub async fn update_dish(api: &ApiClient, id: &str, input: &DishInput) -> ClientResult<()> {
    api.put_unit(&format!("/dish/{}", id), input).await
}
