//! Meal diary: per-day meals, logging and the daily summary.

pub mod dto;
pub mod repo;
mod services;

pub use dto::{DiarySummary, MacroTargets, Meal, MealPayload, MealQuery, MealType};
pub use services::{
    day_meals, diary_summary, log_dish, log_ingredient, remove_dish, remove_ingredient,
};
