//! Day aggregation
//!
//! Turns a user's food entries into day totals and the four meal buckets.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{FoodEntry, MealType, Nutrition, Product};
use super::ProductLookup;

/// An entry points at a product the catalog does not have
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Food entry {entry_id} references unknown product {product_id}")]
    MissingProduct { entry_id: i64, product_id: i64 },
}

/// One entry as shown in a meal bucket
#[derive(Debug, Clone, Serialize)]
pub struct EntryLine {
    pub entry_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub weight: f64,
    pub nutrition: Nutrition,
}

/// Entries grouped by meal, each in input order
#[derive(Debug, Clone, Default, Serialize)]
pub struct MealBuckets {
    pub breakfast: Vec<EntryLine>,
    pub lunch: Vec<EntryLine>,
    pub dinner: Vec<EntryLine>,
    pub snack: Vec<EntryLine>,
}

impl MealBuckets {
    pub fn get(&self, meal: MealType) -> &[EntryLine] {
        match meal {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
            MealType::Snack => &self.snack,
        }
    }

    fn get_mut(&mut self, meal: MealType) -> &mut Vec<EntryLine> {
        match meal {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => &mut self.snack,
        }
    }

    pub fn len(&self) -> usize {
        MealType::ALL.iter().map(|m| self.get(*m).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub totals: Nutrition,
    pub meals: MealBuckets,
    /// Entries counted in `totals` whose meal type is not one of the buckets
    pub unlisted_entries: usize,
}

/// Nutrition of `weight` grams of `product`
pub fn entry_nutrition(product: &Product, weight: f64) -> Nutrition {
    product.per_100g.for_weight(weight)
}

/// Totals and meal buckets for `day`. Entries dated otherwise are ignored.
pub fn aggregate<C: ProductLookup + ?Sized>(
    entries: &[FoodEntry],
    catalog: &C,
    day: NaiveDate,
) -> Result<DayTotals, ReferenceError> {
    let mut totals = Nutrition::zero();
    let mut meals = MealBuckets::default();
    let mut unlisted_entries = 0;

    for entry in entries.iter().filter(|e| e.date == day) {
        let product = catalog
            .product(entry.product_id)
            .ok_or(ReferenceError::MissingProduct {
                entry_id: entry.id,
                product_id: entry.product_id,
            })?;

        let nutrition = entry_nutrition(product, entry.weight);
        totals += nutrition;

        match entry.meal() {
            Some(meal) => meals.get_mut(meal).push(EntryLine {
                entry_id: entry.id,
                product_id: product.id,
                product_name: product.name.clone(),
                weight: entry.weight,
                nutrition,
            }),
            None => {
                warn!(entry_id = entry.id, meal_type = %entry.meal_type, "entry outside known meals");
                unlisted_entries += 1;
            }
        }
    }

    Ok(DayTotals {
        date: day,
        totals,
        meals,
        unlisted_entries,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn product(id: i64, name: &str, per_100g: Nutrition) -> Product {
        Product {
            id,
            name: name.to_string(),
            per_100g,
            category: "Other".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub(crate) fn entry(id: i64, product_id: i64, weight: f64, date: NaiveDate, meal: &str) -> FoodEntry {
        FoodEntry {
            id,
            user_id: 1,
            product_id,
            weight,
            date,
            meal_type: meal.to_string(),
            created_at: String::new(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn catalog() -> HashMap<i64, Product> {
        let mut map = HashMap::new();
        map.insert(1, product(1, "Chicken", Nutrition { calories: 165.0, protein: 31.0, carbs: 0.0, fat: 3.6 }));
        map.insert(2, product(2, "Rice", Nutrition { calories: 130.0, protein: 2.7, carbs: 28.0, fat: 0.3 }));
        map
    }

    #[test]
    fn empty_day_is_zero_with_empty_buckets() {
        let result = aggregate(&[], &catalog(), day(1)).unwrap();
        assert_eq!(result.totals, Nutrition::zero());
        assert!(result.meals.is_empty());
        assert_eq!(result.unlisted_entries, 0);
    }

    #[test]
    fn entry_totals_follow_weight_formula_exactly() {
        let catalog = catalog();
        let chicken = &catalog[&1];
        let n = entry_nutrition(chicken, 150.0);
        assert_eq!(n.calories, 165.0 * 150.0 / 100.0);
        assert_eq!(n.protein, 31.0 * 150.0 / 100.0);
        assert_eq!(n.fat, 3.6 * 150.0 / 100.0);
    }

    #[test]
    fn groups_by_meal_in_input_order() {
        let entries = vec![
            entry(1, 1, 150.0, day(1), "lunch"),
            entry(2, 2, 200.0, day(1), "lunch"),
            entry(3, 2, 100.0, day(1), "breakfast"),
            entry(4, 1, 50.0, day(1), "snack"),
        ];
        let result = aggregate(&entries, &catalog(), day(1)).unwrap();

        let lunch: Vec<i64> = result.meals.lunch.iter().map(|l| l.entry_id).collect();
        assert_eq!(lunch, vec![1, 2]);
        assert_eq!(result.meals.breakfast.len(), 1);
        assert!(result.meals.dinner.is_empty());
        assert_eq!(result.meals.snack[0].product_name, "Chicken");

        let expected = 165.0 * 150.0 / 100.0 + 130.0 * 200.0 / 100.0 + 130.0 * 100.0 / 100.0 + 165.0 * 50.0 / 100.0;
        assert!((result.totals.calories - expected).abs() < 1e-9);
    }

    #[test]
    fn unknown_meal_counts_in_totals_only() {
        let entries = vec![
            entry(1, 1, 100.0, day(1), "brunch"),
            entry(2, 2, 100.0, day(1), "dinner"),
        ];
        let result = aggregate(&entries, &catalog(), day(1)).unwrap();

        assert!((result.totals.calories - 295.0).abs() < 1e-9);
        assert_eq!(result.meals.len(), 1);
        assert_eq!(result.unlisted_entries, 1);
    }

    #[test]
    fn other_days_are_ignored() {
        let entries = vec![
            entry(1, 1, 100.0, day(1), "lunch"),
            entry(2, 1, 100.0, day(2), "lunch"),
        ];
        let result = aggregate(&entries, &catalog(), day(2)).unwrap();
        assert!((result.totals.calories - 165.0).abs() < 1e-9);
        assert_eq!(result.meals.lunch[0].entry_id, 2);
    }

    #[test]
    fn missing_product_is_a_reference_error() {
        let entries = vec![entry(7, 99, 100.0, day(1), "lunch")];
        let err = aggregate(&entries, &catalog(), day(1)).unwrap_err();
        assert_eq!(err, ReferenceError::MissingProduct { entry_id: 7, product_id: 99 });
    }
}
