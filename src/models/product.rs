//! Product model
//!
//! Catalog entry with calories and macronutrients per 100 g.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::Nutrition;

/// Category used when none is given
pub const DEFAULT_CATEGORY: &str = "Other";

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Values per 100 g
    pub per_100g: Nutrition,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub calories_per_100g: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub category: Option<String>,
}

/// Administrative correction of a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub calories_per_100g: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub category: Option<String>,
}

impl Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            per_100g: Nutrition {
                calories: row.get("calories_per_100g")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            category: row.get("category")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new product
    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        let category = data
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        conn.execute(
            r#"
            INSERT INTO products (name, calories_per_100g, protein, carbs, fat, category)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.name,
                data.calories_per_100g,
                data.protein,
                data.carbs,
                data.fat,
                category,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::NotFound(format!("product {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let product = conn
            .query_row("SELECT * FROM products WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(product)
    }

    /// Exact lookup by the unique name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let product = conn
            .query_row("SELECT * FROM products WHERE name = ?1", [name], Self::from_row)
            .optional()?;
        Ok(product)
    }

    /// Load the given products keyed by id. Ids with no row are simply absent.
    pub fn get_many(conn: &Connection, ids: &[i64]) -> DbResult<HashMap<i64, Self>> {
        let mut stmt = conn.prepare("SELECT * FROM products WHERE id = ?1")?;
        let mut found = HashMap::with_capacity(ids.len());

        for &id in ids {
            if found.contains_key(&id) {
                continue;
            }
            if let Some(product) = stmt.query_row([id], Self::from_row).optional()? {
                found.insert(id, product);
            }
        }

        Ok(found)
    }

    /// Name substring search
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let pattern = like_pattern(query);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM products
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let products = stmt
            .query_map(params![pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// List products ordered by category then name, with optional filters
    pub fn list(
        conn: &Connection,
        category: Option<&str>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let (mut sql, mut params_vec) = filtered_query("SELECT * FROM products", category, search);

        sql.push_str(" ORDER BY category ASC, name ASC");

        params_vec.push(Box::new(limit));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));
        params_vec.push(Box::new(offset));
        sql.push_str(&format!(" OFFSET ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let products = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Count products matching the same filters as `list`
    pub fn count(conn: &Connection, category: Option<&str>, search: Option<&str>) -> DbResult<i64> {
        let (sql, params_vec) = filtered_query("SELECT COUNT(*) FROM products", category, search);
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count)
    }

    /// Update a product
    pub fn update(conn: &Connection, id: i64, data: &ProductUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(calories_per_100g, "calories_per_100g");
        add_update!(protein, "protein");
        add_update!(carbs, "carbs");
        add_update!(fat, "fat");
        add_update!(category, "category");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE products SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Number of diary entries referencing this product
    pub fn usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food_entries WHERE product_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a product. The foreign key refuses this while entries reference it.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Substring pattern for `LIKE ... ESCAPE '\'`, matching `%` and `_` literally
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filtered_query(
    select: &str,
    category: Option<&str>,
    search: Option<&str>,
) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
    let mut sql = format!("{} WHERE 1=1", select);
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(category) = category.filter(|c| !c.is_empty()) {
        params_vec.push(Box::new(like_pattern(category)));
        sql.push_str(&format!(" AND category LIKE ?{} ESCAPE '\\'", params_vec.len()));
    }

    if let Some(search) = search.filter(|s| !s.is_empty()) {
        params_vec.push(Box::new(like_pattern(search)));
        sql.push_str(&format!(" AND name LIKE ?{} ESCAPE '\\'", params_vec.len()));
    }

    (sql, params_vec)
}
