//! Nutrition calculation module
//!
//! Day aggregation, calorie targets and weekly statistics. Everything here is
//! pure; callers load entries and products from the store first.

pub mod aggregator;
pub mod stats;
pub mod target;

use std::collections::HashMap;

use crate::models::Product;

pub use aggregator::{aggregate, entry_nutrition, DayTotals, EntryLine, MealBuckets, ReferenceError};
pub use stats::{weekly_statistics, DailyCalories, MacroSplit, ProgressScores, StatsError, WeeklyStatistics};
pub use target::{activity_multiplier, bmr, compute_target, tdee, BodyMetrics};

/// Resolves product ids to catalog products
pub trait ProductLookup {
    fn product(&self, id: i64) -> Option<&Product>;
}

impl ProductLookup for HashMap<i64, Product> {
    fn product(&self, id: i64) -> Option<&Product> {
        self.get(&id)
    }
}

impl ProductLookup for [Product] {
    fn product(&self, id: i64) -> Option<&Product> {
        self.iter().find(|p| p.id == id)
    }
}
