use serde::Serialize;
use tracing::instrument;

use super::dto::{
    BodyCalculation, BodyMetricsInput, DietPlan, DietPlanRequest, HistoryFilter, ProfileUpdate,
    WeightReport,
};
use crate::{api::ApiClient, error::ClientResult};

#[derive(Serialize)]
struct HistoryQuery {
    filter: &'static str,
}

#[instrument(skip(api))]
pub async fn calculate(api: &ApiClient, input: &BodyMetricsInput) -> ClientResult<BodyCalculation> {
    api.post("/customer/calculate", input).await
}

#[instrument(skip(api))]
pub async fn newest(api: &ApiClient) -> ClientResult<BodyCalculation> {
    api.get("/customer/calculate/newest").await
}

#[instrument(skip(api))]
pub async fn history(api: &ApiClient, filter: HistoryFilter) -> ClientResult<WeightReport> {
    let query = HistoryQuery {
        filter: filter.as_str(),
    };
    api.get_query("/customer/calculate/history", &query).await
}

#[instrument(skip(api))]
pub async fn update_profile(api: &ApiClient, update: &ProfileUpdate) -> ClientResult<()> {
    api.put_unit("/users/update", update).await
}

#[instrument(skip(api))]
pub async fn current_plan(api: &ApiClient) -> ClientResult<DietPlan> {
    api.get("/customer/dietplan/get-current").await
}

#[instrument(skip(api))]
pub async fn update_plan(api: &ApiClient, request: &DietPlanRequest) -> ClientResult<DietPlan> {
    api.put("/customer/dietplan/update", request).await
}

#[instrument(skip(api))]
pub async fn create_plan(api: &ApiClient, request: &DietPlanRequest) -> ClientResult<DietPlan> {
    api.post("/customer/dietplan/create", request).await
}
