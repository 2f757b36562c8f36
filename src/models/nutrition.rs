//! Shared nutrition data structure
//!
//! Used for per-100g product values, per-entry totals and day totals.

use serde::{Deserialize, Serialize};

/// Calories and macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
}

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Totals for `grams` of a food whose values are per 100 g.
    ///
    /// Each field is `value * grams / 100`, evaluated in that order.
    pub fn for_weight(&self, grams: f64) -> Self {
        Self {
            calories: self.calories * grams / 100.0,
            protein: self.protein * grams / 100.0,
            carbs: self.carbs * grams / 100.0,
            fat: self.fat * grams / 100.0,
        }
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::AddAssign for Nutrition {
    fn add_assign(&mut self, other: Nutrition) {
        *self = Nutrition::add(self, &other);
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}
