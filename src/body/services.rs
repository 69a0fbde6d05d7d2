use tracing::{info, instrument};

use super::{
    dto::{
        BodyCalculation, BodyMetricsInput, DietPlan, DietPlanRequest, Goal, HistoryFilter,
        ProfileUpdate, WeightEntry, WeightTrend,
    },
    repo,
};
use crate::{
    api::ApiClient,
    error::{ClientError, ClientResult},
};

pub const MIN_TARGET_WEIGHT: f64 = 20.0;
pub const MAX_TARGET_WEIGHT: f64 = 200.0;

pub fn validate_metrics(input: &BodyMetricsInput) -> ClientResult<()> {
    let mut errors = Vec::new();
    if !(1..=120).contains(&input.age) {
        errors.push("age must be between 1 and 120".to_string());
    }
    if !input.height.is_finite() || !(50.0..=250.0).contains(&input.height) {
        errors.push("height must be between 50 and 250 cm".to_string());
    }
    if !input.weight.is_finite() || !(20.0..=300.0).contains(&input.weight) {
        errors.push("weight must be between 20 and 300 kg".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(errors))
    }
}

/// Asks the server for BMR/TDEE and stores the metrics with the resulting
/// TDEE on the user profile.
#[instrument(skip(api))]
pub async fn save_body_metrics(api: &ApiClient, input: BodyMetricsInput) -> ClientResult<BodyCalculation> {
    validate_metrics(&input)?;
    let calculation = repo::calculate(api, &input).await?;
    let update = ProfileUpdate {
        metrics: input,
        tdee: calculation.tdee,
    };
    repo::update_profile(api, &update).await?;
    info!(tdee = ?calculation.tdee, "body metrics saved");
    Ok(calculation)
}

/// Updates the diet plan, creating it when the user has none yet.
#[instrument(skip(api))]
pub async fn set_goal(api: &ApiClient, goal: Goal, target_weight_change: f64) -> ClientResult<DietPlan> {
    let request = DietPlanRequest {
        goal,
        target_weight_change: if goal.needs_weight_change() {
            target_weight_change
        } else {
            0.0
        },
    };
    match repo::update_plan(api, &request).await {
        Ok(plan) => Ok(plan),
        Err(ClientError::NotFound) => {
            info!("no diet plan yet, creating one");
            repo::create_plan(api, &request).await
        }
        Err(e) => Err(e),
    }
}

/// `current + delta` when it stays within the allowed target range,
/// otherwise `current` unchanged.
pub fn adjust_target_weight(current: f64, delta: f64) -> f64 {
    let next = current + delta;
    if (MIN_TARGET_WEIGHT..=MAX_TARGET_WEIGHT).contains(&next) {
        next
    } else {
        current
    }
}

/// Start/current/change over the report as the server orders it.
pub fn trend_of(report: Vec<WeightEntry>) -> Option<WeightTrend> {
    let start = report.first()?.weight;
    let current = report.last()?.weight;
    let mut newest_first = report;
    newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Some(WeightTrend {
        start,
        current,
        change: ((current - start) * 10.0).round() / 10.0,
        newest_first,
    })
}

#[instrument(skip(api))]
pub async fn weight_trend(api: &ApiClient, filter: HistoryFilter) -> ClientResult<Option<WeightTrend>> {
    let report = repo::history(api, filter).await?;
    Ok(trend_of(report.report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::dto::{Activity, Gender};
    use crate::testing::{signed_in_client, spawn_backend};
    use axum::{
        extract::Query,
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    fn metrics() -> BodyMetricsInput {
        BodyMetricsInput {
            gender: Gender::Male,
            age: 21,
            height: 170.0,
            weight: 62.0,
            activity: Activity::Light,
        }
    }

    fn entry(weight: f64, at: &str) -> WeightEntry {
        WeightEntry {
            weight,
            created_at: at.into(),
        }
    }

    #[test]
    fn metrics_out_of_range_are_listed() {
        assert!(validate_metrics(&metrics()).is_ok());
        let mut m = metrics();
        m.age = 0;
        m.height = f64::NAN;
        match validate_metrics(&m).unwrap_err() {
            ClientError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn target_weight_stays_in_range() {
        assert_eq!(adjust_target_weight(50.0, 1.0), 51.0);
        assert_eq!(adjust_target_weight(20.0, -1.0), 20.0);
        assert_eq!(adjust_target_weight(200.0, 1.0), 200.0);
        assert_eq!(adjust_target_weight(199.5, 0.5), 200.0);
    }

    #[test]
    fn trend_uses_report_order_and_sorts_newest_first() {
        let trend = trend_of(vec![
            entry(60.0, "2024-05-01T08:00:00Z"),
            entry(59.4, "2024-05-03T08:00:00Z"),
            entry(58.75, "2024-05-07T08:00:00Z"),
        ])
        .expect("trend");
        assert_eq!(trend.start, 60.0);
        assert_eq!(trend.current, 58.75);
        assert_eq!(trend.change, -1.3);
        assert_eq!(trend.newest_first[0].created_at, "2024-05-07T08:00:00Z");
        assert!(trend_of(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn saving_metrics_stores_tdee_on_profile() {
        let profile = Arc::new(Mutex::new(Value::Null));
        let stored = profile.clone();
        let app = Router::new()
            .route(
                "/customer/calculate",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["activity"], "nhẹ");
                    Json(json!({ "bmr": 1600, "tdee": 2200, "carbs": 275 }))
                }),
            )
            .route(
                "/users/update",
                put(move |Json(body): Json<Value>| {
                    let stored = stored.clone();
                    async move {
                        *stored.lock().unwrap() = body;
                        StatusCode::OK
                    }
                }),
            );
        let base = spawn_backend(app).await;
        let api = signed_in_client(&base).await;

        let calc = save_body_metrics(&api, metrics()).await.expect("save");
        assert_eq!(calc.tdee, Some(2200.0));
        let body = profile.lock().unwrap().clone();
        assert_eq!(body["tdee"], 2200.0);
        assert_eq!(body["gender"], "Nam");
        assert_eq!(body["weight"], 62.0);
    }

    #[tokio::test]
    async fn goal_falls_back_to_create_on_missing_plan() {
        let app = Router::new()
            .route(
                "/customer/dietplan/update",
                put(|| async {
                    (StatusCode::NOT_FOUND, Json(json!({ "message": "Diet plan not found" })))
                }),
            )
            .route(
                "/customer/dietplan/create",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["goal"], "keep");
                    assert_eq!(body["targetWeightChange"], 0.0);
                    Json(json!({ "dailyCalories": 2100, "goal": "keep" }))
                }),
            );
        let base = spawn_backend(app).await;
        let api = signed_in_client(&base).await;

        let plan = set_goal(&api, Goal::Keep, 5.0).await.expect("plan");
        assert_eq!(plan.daily_calories, 2100.0);
    }

    #[tokio::test]
    async fn goal_update_errors_other_than_404_propagate() {
        let app = Router::new().route(
            "/customer/dietplan/update",
            put(|| async {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": "Invalid goal" }))).into_response()
            }),
        );
        let base = spawn_backend(app).await;
        let api = signed_in_client(&base).await;
        let err = set_goal(&api, Goal::Lose, 3.0).await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid goal");
    }

    #[tokio::test]
    async fn weight_trend_passes_filter() {
        let app = Router::new().route(
            "/customer/calculate/history",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("filter").map(String::as_str), Some("month"));
                Json(json!({ "report": [
                    { "weight": 70, "createdAt": "2024-04-01" },
                    { "weight": 68.5, "createdAt": "2024-04-20" }
                ] }))
            }),
        );
        let base = spawn_backend(app).await;
        let api = signed_in_client(&base).await;
        let trend = weight_trend(&api, HistoryFilter::Month).await.unwrap().unwrap();
        assert_eq!(trend.change, -1.5);
    }
}
