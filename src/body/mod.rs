//! Body metrics, weight history and the diet plan.

pub mod dto;
pub mod repo;
mod services;

pub use dto::{
    Activity, BodyCalculation, BodyMetricsInput, DietPlan, Gender, Goal, HistoryFilter,
    WeightEntry, WeightTrend,
};
pub use services::{
    adjust_target_weight, save_body_metrics, set_goal, trend_of, validate_metrics, weight_trend,
    MAX_TARGET_WEIGHT, MIN_TARGET_WEIGHT,
};
