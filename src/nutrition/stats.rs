//! Weekly statistics
//!
//! Seven-day calorie series, averages and progress scores.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::models::{FoodEntry, Nutrition};
use super::aggregator::{entry_nutrition, ReferenceError};
use super::ProductLookup;

/// Days in the statistics window
pub const WINDOW_DAYS: i64 = 7;

const PROTEIN_KCAL_PER_G: f64 = 4.0;
const CARBS_KCAL_PER_G: f64 = 4.0;
const FAT_KCAL_PER_G: f64 = 9.0;

/// Healthy share of calories for one macronutrient, in percent
#[derive(Debug, Clone, Copy)]
struct MacroBand {
    low: f64,
    high: f64,
    /// Points lost per percent away from the band midpoint
    penalty: f64,
}

const PROTEIN_BAND: MacroBand = MacroBand { low: 15.0, high: 20.0, penalty: 3.0 };
const FAT_BAND: MacroBand = MacroBand { low: 20.0, high: 35.0, penalty: 2.0 };
const CARBS_BAND: MacroBand = MacroBand { low: 45.0, high: 65.0, penalty: 2.0 };

impl MacroBand {
    fn score(&self, pct: f64) -> f64 {
        if pct >= self.low && pct <= self.high {
            100.0
        } else {
            let midpoint = (self.low + self.high) / 2.0;
            (100.0 - (pct - midpoint).abs() * self.penalty).max(0.0)
        }
    }
}

/// Why weekly statistics could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Date out of range: no seven-day window ends on {0}")]
    DateOutOfRange(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyCalories {
    pub date: NaiveDate,
    pub calories: f64,
}

/// Share of average calories from each macronutrient, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
}

/// Scores on a 0..=100 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressScores {
    pub consistency: i64,
    pub macro_balance: i64,
    pub calorie_goal: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyStatistics {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub daily: Vec<DailyCalories>,
    /// Window sums divided by seven
    pub averages: Nutrition,
    pub days_logged: usize,
    pub macro_split: MacroSplit,
    pub target_calories: Option<i64>,
    pub scores: ProgressScores,
}

/// Statistics for the seven days ending on `end_day`
pub fn weekly_statistics<C: ProductLookup + ?Sized>(
    entries: &[FoodEntry],
    catalog: &C,
    end_day: NaiveDate,
    target: Option<i64>,
) -> Result<WeeklyStatistics, StatsError> {
    let start = end_day
        .checked_sub_signed(Duration::days(WINDOW_DAYS - 1))
        .ok_or(StatsError::DateOutOfRange(end_day))?;

    let mut per_day: BTreeMap<NaiveDate, Nutrition> = (0..WINDOW_DAYS)
        .map(|offset| (start + Duration::days(offset), Nutrition::zero()))
        .collect();
    let mut logged: BTreeSet<NaiveDate> = BTreeSet::new();

    for entry in entries {
        let Some(day_total) = per_day.get_mut(&entry.date) else {
            continue;
        };
        let product = catalog
            .product(entry.product_id)
            .ok_or(ReferenceError::MissingProduct {
                entry_id: entry.id,
                product_id: entry.product_id,
            })?;

        *day_total += entry_nutrition(product, entry.weight);
        logged.insert(entry.date);
    }

    let daily: Vec<DailyCalories> = per_day
        .iter()
        .map(|(date, n)| DailyCalories { date: *date, calories: n.calories })
        .collect();

    let sum: Nutrition = per_day.values().copied().sum();
    let averages = Nutrition {
        calories: sum.calories / WINDOW_DAYS as f64,
        protein: sum.protein / WINDOW_DAYS as f64,
        carbs: sum.carbs / WINDOW_DAYS as f64,
        fat: sum.fat / WINDOW_DAYS as f64,
    };

    let days_logged = logged.len();
    let macro_split = macro_split(&averages);

    Ok(WeeklyStatistics {
        start,
        end: end_day,
        daily,
        averages,
        days_logged,
        macro_split,
        target_calories: target,
        scores: ProgressScores {
            consistency: consistency_score(days_logged),
            macro_balance: macro_balance_score(&averages),
            calorie_goal: calorie_goal_score(averages.calories, target),
        },
    })
}

/// Percent of the week with at least one entry
pub fn consistency_score(days_logged: usize) -> i64 {
    let pct = days_logged as f64 / WINDOW_DAYS as f64 * 100.0;
    pct.min(100.0).round() as i64
}

pub fn macro_split(averages: &Nutrition) -> MacroSplit {
    if averages.calories <= 0.0 {
        return MacroSplit::default();
    }
    MacroSplit {
        protein_pct: averages.protein * PROTEIN_KCAL_PER_G / averages.calories * 100.0,
        carbs_pct: averages.carbs * CARBS_KCAL_PER_G / averages.calories * 100.0,
        fat_pct: averages.fat * FAT_KCAL_PER_G / averages.calories * 100.0,
    }
}

/// Mean of the three per-macro band scores, 0 with no calories
pub fn macro_balance_score(averages: &Nutrition) -> i64 {
    if averages.calories <= 0.0 {
        return 0;
    }
    let split = macro_split(averages);
    let total = PROTEIN_BAND.score(split.protein_pct)
        + FAT_BAND.score(split.fat_pct)
        + CARBS_BAND.score(split.carbs_pct);
    (total / 3.0).round() as i64
}

/// Closeness of average calories to the target
pub fn calorie_goal_score(avg_calories: f64, target: Option<i64>) -> i64 {
    let Some(target) = target else {
        return 0;
    };
    if avg_calories <= 0.0 {
        return 0;
    }

    let deviation = (avg_calories - target as f64).abs();
    let score = if deviation <= 200.0 {
        100.0
    } else if deviation <= 500.0 {
        (100.0 - (deviation - 200.0) / 3.0).max(0.0)
    } else {
        0.0
    };
    score.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::aggregator::tests::{entry, product};
    use crate::models::Product;
    use std::collections::HashMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    /// 100 g gives 2000 kcal split 18/52/30
    fn balanced() -> Product {
        product(1, "Balanced", Nutrition { calories: 2000.0, protein: 90.0, carbs: 260.0, fat: 66.666_666_666_666_67 })
    }

    fn catalog() -> HashMap<i64, Product> {
        let mut map = HashMap::new();
        map.insert(1, balanced());
        map
    }

    #[test]
    fn empty_week() {
        let stats = weekly_statistics(&[], &catalog(), day(7), Some(2000)).unwrap();
        assert_eq!(stats.start, day(1));
        assert_eq!(stats.daily.len(), 7);
        assert!(stats.daily.iter().all(|d| d.calories == 0.0));
        assert_eq!(stats.averages, Nutrition::zero());
        assert_eq!(stats.scores, ProgressScores { consistency: 0, macro_balance: 0, calorie_goal: 0 });
    }

    #[test]
    fn daily_series_is_chronological_and_zero_filled() {
        let entries = vec![
            entry(1, 1, 50.0, day(7), "lunch"),
            entry(2, 1, 25.0, day(3), "dinner"),
            entry(3, 1, 100.0, day(8), "lunch"),
        ];
        let stats = weekly_statistics(&entries, &catalog(), day(7), None).unwrap();

        let dates: Vec<NaiveDate> = stats.daily.iter().map(|d| d.date).collect();
        assert_eq!(dates, (1..=7).map(day).collect::<Vec<_>>());
        assert_eq!(stats.daily[2].calories, 500.0);
        assert_eq!(stats.daily[6].calories, 1000.0);
        assert_eq!(stats.daily[0].calories, 0.0);
        assert_eq!(stats.days_logged, 2);
        assert!((stats.averages.calories - 1500.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn consistency_rounds() {
        assert_eq!(consistency_score(0), 0);
        assert_eq!(consistency_score(3), 43);
        assert_eq!(consistency_score(7), 100);
        assert_eq!(consistency_score(9), 100);
    }

    #[test]
    fn every_day_on_target_scores_full() {
        let entries: Vec<FoodEntry> = (1..=7)
            .map(|d| entry(d as i64, 1, 100.0, day(d), "lunch"))
            .collect();
        let stats = weekly_statistics(&entries, &catalog(), day(7), Some(2100)).unwrap();

        assert!((stats.averages.calories - 2000.0).abs() < 1e-9);
        assert!((stats.macro_split.protein_pct - 18.0).abs() < 1e-6);
        assert_eq!(stats.scores, ProgressScores { consistency: 100, macro_balance: 100, calorie_goal: 100 });
    }

    #[test]
    fn macro_balance_penalties() {
        // protein 10% (-22.5), carbs 50% (100), fat 40% (-30)
        let averages = Nutrition { calories: 1000.0, protein: 25.0, carbs: 125.0, fat: 400.0 / 9.0 };
        let expected = ((100.0 - 7.5 * 3.0) + 100.0 + (100.0 - 12.5 * 2.0)) / 3.0;
        assert_eq!(macro_balance_score(&averages), f64::round(expected) as i64);
    }

    #[test]
    fn macro_split_inside_all_bands_scores_full() {
        // protein 20%, carbs 52.5%, fat 27.5%
        let averages = Nutrition { calories: 2000.0, protein: 100.0, carbs: 262.5, fat: 550.0 / 9.0 };
        let split = macro_split(&averages);
        assert_eq!(split.protein_pct, 20.0);
        assert_eq!(split.carbs_pct, 52.5);
        assert!((split.fat_pct - 27.5).abs() < 1e-9);
        assert_eq!(macro_balance_score(&averages), 100);
    }

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(PROTEIN_BAND.score(15.0), 100.0);
        assert_eq!(PROTEIN_BAND.score(20.0), 100.0);
        assert_eq!(FAT_BAND.score(20.0), 100.0);
        assert_eq!(FAT_BAND.score(35.0), 100.0);
        assert_eq!(CARBS_BAND.score(45.0), 100.0);
        assert_eq!(CARBS_BAND.score(65.0), 100.0);
        // just outside: 3.5 points from the 17.5 midpoint
        assert_eq!(PROTEIN_BAND.score(14.0), 89.5);

        // protein exactly 15% of 1000 kcal
        let averages = Nutrition { calories: 1000.0, protein: 37.5, carbs: 137.5, fat: 300.0 / 9.0 };
        assert_eq!(macro_split(&averages).protein_pct, 15.0);
        assert_eq!(macro_balance_score(&averages), 100);
    }

    #[test]
    fn macro_balance_clamps_at_zero() {
        // all fat: protein 47.5, carbs and fat clamp to 0
        let averages = Nutrition { calories: 900.0, protein: 0.0, carbs: 0.0, fat: 100.0 };
        assert_eq!(macro_balance_score(&averages), 16);
    }

    #[test]
    fn calorie_goal_plateau_decay_and_cutoff() {
        assert_eq!(calorie_goal_score(2000.0, Some(2200)), 100);
        assert_eq!(calorie_goal_score(2000.0, Some(2350)), 50);
        assert_eq!(calorie_goal_score(2000.0, Some(2500)), 0);
        assert_eq!(calorie_goal_score(2000.0, Some(2501)), 0);
        assert_eq!(calorie_goal_score(2000.0, None), 0);
        assert_eq!(calorie_goal_score(0.0, Some(2000)), 0);
    }

    #[test]
    fn missing_product_fails() {
        let entries = vec![entry(5, 42, 100.0, day(7), "lunch")];
        let err = weekly_statistics(&entries, &catalog(), day(7), None).unwrap_err();
        assert_eq!(
            err,
            StatsError::Reference(ReferenceError::MissingProduct { entry_id: 5, product_id: 42 })
        );
    }

    #[test]
    fn window_before_earliest_date_is_an_error() {
        let err = weekly_statistics(&[], &catalog(), NaiveDate::MIN, None).unwrap_err();
        assert_eq!(err, StatsError::DateOutOfRange(NaiveDate::MIN));

        let earliest_full_week = NaiveDate::MIN + Duration::days(WINDOW_DAYS - 1);
        let stats = weekly_statistics(&[], &catalog(), earliest_full_week, None).unwrap();
        assert_eq!(stats.start, NaiveDate::MIN);
    }
}
