//! Food entry model
//!
//! One product eaten by one user on one day, by weight in grams.
//! Nutrition totals are derived from the product at read time, never stored.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// The four meal buckets of a diary day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// `None` for anything outside the four known buckets
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_meal_type(s).as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// Meal types are stored trimmed and lower-cased
pub fn normalize_meal_type(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    /// Grams
    pub weight: f64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub created_at: String,
}

/// Data for creating a food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub user_id: i64,
    pub product_id: i64,
    pub weight: f64,
    pub date: NaiveDate,
    pub meal_type: String,
}

impl FoodEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            product_id: row.get("product_id")?,
            weight: row.get("weight")?,
            date: row.get("date")?,
            meal_type: row.get("meal_type")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Known meal bucket for this entry, if any
    pub fn meal(&self) -> Option<MealType> {
        MealType::parse(&self.meal_type)
    }

    /// Insert a new entry
    pub fn create(conn: &Connection, data: &FoodEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_entries (user_id, product_id, weight, date, meal_type)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.user_id,
                data.product_id,
                data.weight,
                data.date,
                normalize_meal_type(&data.meal_type),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("food entry {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let entry = conn
            .query_row("SELECT * FROM food_entries WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(entry)
    }

    /// Entries of one user on one day, in insertion order
    pub fn list_for_user_day(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        Self::list_for_user_range(conn, user_id, date, date)
    }

    /// Entries of one user between two days, both inclusive
    pub fn list_for_user_range(
        conn: &Connection,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_entries
            WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC, id ASC
            "#,
        )?;

        let entries = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry if it belongs to `user_id`. Returns false otherwise.
    pub fn delete_for_user(conn: &Connection, id: i64, user_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
