use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Nam", alias = "male")]
    Male,
    #[serde(rename = "Nữ", alias = "female")]
    Female,
}

/// Activity level; the wire values are the backend's own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "ít", alias = "Ít")]
    Sedentary,
    #[serde(rename = "nhẹ", alias = "Nhẹ")]
    Light,
    #[serde(rename = "vừa", alias = "Vừa")]
    Moderate,
    #[serde(rename = "nhiều", alias = "Nhiều")]
    Active,
    #[serde(rename = "cực_nhiều", alias = "Cực nhiều")]
    Extreme,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Activity::Sedentary => "sedentary",
            Activity::Light => "light",
            Activity::Moderate => "moderate",
            Activity::Active => "active",
            Activity::Extreme => "extreme",
        };
        f.write_str(label)
    }
}

/// Body metrics sent for BMR/TDEE calculation and stored on the profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMetricsInput {
    pub gender: Gender,
    pub age: u32,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub activity: Activity,
}

/// Profile update: the metrics plus the TDEE the server computed for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(flatten)]
    pub metrics: BodyMetricsInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdee: Option<f64>,
}

/// A server-side calculation record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyCalculation {
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity: Option<Activity>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    Week,
    Month,
    Year,
}

impl HistoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryFilter::Week => "week",
            HistoryFilter::Month => "month",
            HistoryFilter::Year => "year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub weight: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeightReport {
    #[serde(default)]
    pub report: Vec<WeightEntry>,
}

/// Weight change over the reported period, oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrend {
    pub start: f64,
    pub current: f64,
    /// Rounded to one decimal.
    pub change: f64,
    pub newest_first: Vec<WeightEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Keep,
    Gain,
}

impl Goal {
    /// Whether the goal needs a target weight change.
    pub fn needs_weight_change(&self) -> bool {
        matches!(self, Goal::Lose | Goal::Gain)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanRequest {
    pub goal: Goal,
    pub target_weight_change: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietPlan {
    pub daily_calories: f64,
    pub goal: Option<Goal>,
    pub target_weight_change: Option<f64>,
}
