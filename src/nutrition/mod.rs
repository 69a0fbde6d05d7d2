//! Nutrition arithmetic.

pub mod aggregate;
mod totals;

pub use aggregate::{
    aggregate, aggregate_meal, dish_totals, portion, sum_day, Aggregation, AggregationWarning,
    EntrySource, WarningKind,
};
pub use totals::NutritionTotals;
