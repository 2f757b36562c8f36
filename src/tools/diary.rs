//! Food diary MCP Tools
//!
//! Logging food, removing entries and viewing a day.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{normalize_meal_type, FoodEntry, FoodEntryCreate, MealType, Nutrition, Product, User};
use crate::nutrition::{aggregate, entry_nutrition, DayTotals};
use super::{parse_date, require_user};

/// One `(product, weight)` pair of a logging request
#[derive(Debug, Clone, Deserialize)]
pub struct LogItem {
    pub product_id: i64,
    /// Grams
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct LoggedEntry {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub weight: f64,
    pub nutrition: Nutrition,
}

/// An item that was not logged, with the reason
#[derive(Debug, Serialize)]
pub struct SkippedItem {
    pub product_id: i64,
    pub weight: f64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub date: NaiveDate,
    pub meal_type: String,
    /// False when the meal type is outside breakfast/lunch/dinner/snack
    pub known_meal_type: bool,
    pub added: Vec<LoggedEntry>,
    pub skipped: Vec<SkippedItem>,
    pub total: Nutrition,
}

#[derive(Debug, Serialize)]
pub struct DeleteFoodEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub date: NaiveDate,
}

/// Log one or more products for a user, date and meal.
///
/// Invalid items are skipped and reported; the call fails only when nothing
/// could be logged.
pub fn log_food(
    db: &Database,
    user_name: &str,
    date: Option<&str>,
    meal_type: &str,
    items: &[LogItem],
) -> Result<LogFoodResponse, String> {
    let date = parse_date(date)?;
    let meal_type = normalize_meal_type(meal_type);
    if meal_type.is_empty() {
        return Err("meal_type cannot be empty".to_string());
    }
    if items.is_empty() {
        return Err("No items to log".to_string());
    }

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    // The batch is committed as a whole or not at all
    let tx = conn.transaction().map_err(|e| format!("Database error: {}", e))?;
    let response = log_items(&tx, &user, date, &meal_type, items)?;
    if response.added.is_empty() {
        let reasons: Vec<String> = response
            .skipped
            .iter()
            .map(|s| format!("product {}: {}", s.product_id, s.reason))
            .collect();
        return Err(format!("No entries were added ({})", reasons.join("; ")));
    }
    tx.commit().map_err(|e| format!("Failed to log food: {}", e))?;

    Ok(response)
}

/// Log one product looked up by its exact name
pub fn quick_add_food(
    db: &Database,
    user_name: &str,
    product_name: &str,
    weight: f64,
    date: Option<&str>,
    meal_type: &str,
) -> Result<LogFoodResponse, String> {
    let product_id = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        Product::get_by_name(&conn, product_name.trim())
            .map_err(|e| format!("Failed to get product: {}", e))?
            .ok_or_else(|| format!("Product not found: {}", product_name.trim()))?
            .id
    };

    log_food(db, user_name, date, meal_type, &[LogItem { product_id, weight }])
}

fn log_items(
    conn: &Connection,
    user: &User,
    date: NaiveDate,
    meal_type: &str,
    items: &[LogItem],
) -> Result<LogFoodResponse, String> {
    let known_meal_type = MealType::parse(meal_type).is_some();
    if !known_meal_type {
        warn!(meal_type, "logging under an unknown meal type");
    }

    let mut added = Vec::new();
    let mut skipped = Vec::new();
    let mut total = Nutrition::zero();

    for item in items {
        let skip = |reason: String| SkippedItem {
            product_id: item.product_id,
            weight: item.weight,
            reason,
        };

        if !item.weight.is_finite() || item.weight <= 0.0 {
            skipped.push(skip("weight must be greater than 0".to_string()));
            continue;
        }

        let product = match Product::get_by_id(conn, item.product_id)
            .map_err(|e| format!("Failed to get product: {}", e))?
        {
            Some(p) => p,
            None => {
                skipped.push(skip("product not found".to_string()));
                continue;
            }
        };

        let entry = FoodEntry::create(
            conn,
            &FoodEntryCreate {
                user_id: user.id,
                product_id: product.id,
                weight: item.weight,
                date,
                meal_type: meal_type.to_string(),
            },
        )
        .map_err(|e| format!("Failed to log food: {}", e))?;

        let nutrition = entry_nutrition(&product, entry.weight);
        total += nutrition;
        added.push(LoggedEntry {
            id: entry.id,
            product_id: product.id,
            product_name: product.name,
            weight: entry.weight,
            nutrition,
        });
    }

    info!(user_id = user.id, %date, meal_type, added = added.len(), skipped = skipped.len(), "logged food");

    Ok(LogFoodResponse {
        date,
        meal_type: meal_type.to_string(),
        known_meal_type,
        added,
        skipped,
        total,
    })
}

/// Delete one of the user's own entries
pub fn delete_food_entry(db: &Database, user_name: &str, entry_id: i64) -> Result<DeleteFoodEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    let entry = FoodEntry::get_by_id(&conn, entry_id)
        .map_err(|e| format!("Failed to get food entry: {}", e))?
        .filter(|e| e.user_id == user.id)
        .ok_or_else(|| format!("Food entry not found with id: {}", entry_id))?;

    let deleted = FoodEntry::delete_for_user(&conn, entry_id, user.id)
        .map_err(|e| format!("Failed to delete food entry: {}", e))?;
    if !deleted {
        return Err(format!("Food entry not found with id: {}", entry_id));
    }
    info!(user_id = user.id, entry_id, "deleted food entry");

    Ok(DeleteFoodEntryResponse {
        success: true,
        deleted_id: entry_id,
        date: entry.date,
    })
}

/// Totals and meal buckets of one day
pub fn get_day(db: &Database, user_name: &str, date: Option<&str>) -> Result<DayTotals, String> {
    let date = parse_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    let entries = FoodEntry::list_for_user_day(&conn, user.id, date)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;
    let product_ids: Vec<i64> = entries.iter().map(|e| e.product_id).collect();
    let catalog = Product::get_many(&conn, &product_ids)
        .map_err(|e| format!("Failed to load products: {}", e))?;

    aggregate(&entries, &catalog, date).map_err(|e| e.to_string())
}
