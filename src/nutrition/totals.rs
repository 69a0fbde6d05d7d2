//! Additive nutrition totals shared by ingredients, dishes, meals and days.

use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionTotals {
    pub calories: f64, // kcal
    pub protein: f64,  // grams
    pub fat: f64,      // grams
    pub carbs: f64,    // grams
    pub fiber: f64,    // grams
}

impl NutritionTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            carbs: self.carbs * multiplier,
            fiber: self.fiber * multiplier,
        }
    }

    /// Rounded copy for display; aggregation itself never rounds.
    pub fn rounded(&self, digits: u32) -> Self {
        let factor = 10f64.powi(digits as i32);
        let round = |v: f64| (v * factor).round() / factor;
        Self {
            calories: round(self.calories),
            protein: round(self.protein),
            fat: round(self.fat),
            carbs: round(self.carbs),
            fiber: round(self.fiber),
        }
    }
}

impl Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, other: NutritionTotals) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            carbs: self.carbs + other.carbs,
            fiber: self.fiber + other.fiber,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: NutritionTotals) {
        *self = *self + other;
    }
}

impl Mul<f64> for NutritionTotals {
    type Output = NutritionTotals;

    fn mul(self, multiplier: f64) -> NutritionTotals {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotals::zero(), |acc, n| acc + n)
    }
}

impl fmt::Display for NutritionTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} kcal | protein {:.1} g | fat {:.1} g | carbs {:.1} g | fiber {:.1} g",
            self.calories, self.protein, self.fat, self.carbs, self.fiber
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NutritionTotals {
        NutritionTotals {
            calories: 100.0,
            protein: 10.0,
            fat: 5.0,
            carbs: 12.5,
            fiber: 1.5,
        }
    }

    #[test]
    fn scale_and_add() {
        let doubled = sample() * 2.0;
        assert_eq!(doubled.calories, 200.0);
        assert_eq!(doubled.fiber, 3.0);
        assert_eq!(sample() + sample(), doubled);
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let total: NutritionTotals = Vec::<NutritionTotals>::new().into_iter().sum();
        assert_eq!(total, NutritionTotals::zero());
    }

    #[test]
    fn rounded_for_display() {
        let t = NutritionTotals {
            calories: 123.456,
            ..Default::default()
        };
        assert_eq!(t.rounded(2).calories, 123.46);
        assert_eq!(t.rounded(0).calories, 123.0);
    }

    #[test]
    fn display_uses_fixed_decimals() {
        assert_eq!(
            sample().to_string(),
            "100 kcal | protein 10.0 g | fat 5.0 g | carbs 12.5 g | fiber 1.5 g"
        );
    }
}
