//! Product catalog MCP Tools
//!
//! Add, search, browse and correct catalog products, plus explicit seeding.

use serde::Serialize;
use tracing::info;

use crate::db::seed::{seed_default_catalog, SeedReport};
use crate::db::Database;
use crate::models::{Nutrition, Product, ProductCreate, ProductUpdate};

/// Products per page of `list_products`
pub const PAGE_SIZE: i64 = 20;

/// Default result count of `search_products`
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// Summary of a product for list/search results
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub calories_per_100g: f64,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            calories_per_100g: p.per_100g.calories,
        }
    }
}

/// Full product detail response
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub per_100g: Nutrition,
    pub created_at: String,
    pub updated_at: String,
    pub usage_count: i64,
}

impl ProductDetail {
    pub fn from_product(p: Product, usage_count: i64) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            per_100g: p.per_100g,
            created_at: p.created_at,
            updated_at: p.updated_at,
            usage_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchProductsResponse {
    pub products: Vec<ProductSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<ProductSummary>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductBlockedResponse {
    pub error: String,
    pub usage_count: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn check_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be a non-negative number", field));
    }
    Ok(())
}

/// Validate and create a product
pub fn add_product(db: &Database, mut data: ProductCreate) -> Result<ProductDetail, String> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err("Product name cannot be empty".to_string());
    }
    check_amount("calories_per_100g", data.calories_per_100g)?;
    check_amount("protein", data.protein)?;
    check_amount("carbs", data.carbs)?;
    check_amount("fat", data.fat)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = Product::get_by_name(&conn, &data.name)
        .map_err(|e| format!("Failed to check product: {}", e))?;
    if existing.is_some() {
        return Err(format!("Product already exists: {}", data.name));
    }

    let product = Product::create(&conn, &data)
        .map_err(|e| format!("Failed to create product: {}", e))?;
    info!(product_id = product.id, category = %product.category, "added product");

    Ok(ProductDetail::from_product(product, 0))
}

/// Get a product with its usage count
pub fn get_product(db: &Database, id: i64) -> Result<Option<ProductDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get product: {}", e))?;

    match product {
        Some(product) => {
            let usage_count = Product::usage_count(&conn, id)
                .map_err(|e| format!("Failed to get usage count: {}", e))?;
            Ok(Some(ProductDetail::from_product(product, usage_count)))
        }
        None => Ok(None),
    }
}

/// Search products by name substring
pub fn search_products(db: &Database, query: &str, limit: Option<i64>) -> Result<SearchProductsResponse, String> {
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, 100);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let products = Product::search(&conn, query.trim(), limit)
        .map_err(|e| format!("Search failed: {}", e))?;

    let summaries: Vec<ProductSummary> = products.iter().map(ProductSummary::from).collect();
    let total = summaries.len();

    Ok(SearchProductsResponse { products: summaries, total })
}

/// One page of products ordered by category, then name
pub fn list_products(
    db: &Database,
    category: Option<&str>,
    search: Option<&str>,
    page: i64,
) -> Result<ListProductsResponse, String> {
    let page = page.max(1);
    let category = category.map(str::trim);
    let search = search.map(str::trim);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let products = Product::list(&conn, category, search, PAGE_SIZE, (page - 1) * PAGE_SIZE)
        .map_err(|e| format!("Failed to list products: {}", e))?;

    let total = Product::count(&conn, category, search)
        .map_err(|e| format!("Failed to count products: {}", e))?;

    Ok(ListProductsResponse {
        products: products.iter().map(ProductSummary::from).collect(),
        total,
        page,
        pages: (total + PAGE_SIZE - 1) / PAGE_SIZE,
    })
}

/// Correct a product's name, values or category
pub fn update_product(db: &Database, id: i64, mut data: ProductUpdate) -> Result<ProductDetail, String> {
    if let Some(name) = data.name.as_mut() {
        *name = name.trim().to_string();
        if name.is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
    }
    for (field, value) in [
        ("calories_per_100g", data.calories_per_100g),
        ("protein", data.protein),
        ("carbs", data.carbs),
        ("fat", data.fat),
    ] {
        if let Some(value) = value {
            check_amount(field, value)?;
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Product::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update product: {}", e))?;

    match updated {
        Some(product) => {
            info!(product_id = id, "updated product");
            let usage_count = Product::usage_count(&conn, id)
                .map_err(|e| format!("Failed to get usage count: {}", e))?;
            Ok(ProductDetail::from_product(product, usage_count))
        }
        None => Err(format!("Product not found with id: {}", id)),
    }
}

/// Delete a product (only allowed if no diary entry uses it)
pub fn delete_product(
    db: &Database,
    id: i64,
) -> Result<Result<DeleteProductSuccessResponse, DeleteProductBlockedResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Product::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get product: {}", e))?
        .is_none()
    {
        return Err(format!("Product not found with id: {}", id));
    }

    let usage_count = Product::usage_count(&conn, id)
        .map_err(|e| format!("Failed to get usage count: {}", e))?;
    if usage_count > 0 {
        return Ok(Err(DeleteProductBlockedResponse {
            error: "Cannot delete product: it is used by diary entries".to_string(),
            usage_count,
        }));
    }

    Product::delete(&conn, id).map_err(|e| format!("Failed to delete product: {}", e))?;
    info!(product_id = id, "deleted product");

    Ok(Ok(DeleteProductSuccessResponse { success: true, deleted_id: id }))
}

/// Add the default catalog products that are missing
pub fn seed_catalog(db: &Database) -> Result<SeedReport, String> {
    db.with_conn_mut(seed_default_catalog)
        .map_err(|e| format!("Failed to seed catalog: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::DEFAULT_CATALOG;
    use crate::tools::test_support::database;

    fn create(name: &str, calories: f64, category: Option<&str>) -> ProductCreate {
        ProductCreate {
            name: name.to_string(),
            calories_per_100g: calories,
            protein: 1.0,
            carbs: 1.0,
            fat: 1.0,
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn add_validates_input() {
        let db = database();
        assert!(add_product(&db, create("  ", 10.0, None)).is_err());
        assert!(add_product(&db, create("Bad", -1.0, None)).is_err());
        assert!(add_product(&db, create("Bad", f64::NAN, None)).is_err());

        let added = add_product(&db, create(" Apple ", 47.0, None)).unwrap();
        assert_eq!(added.name, "Apple");
        assert_eq!(added.category, "Other");

        let dup = add_product(&db, create("Apple", 50.0, None)).unwrap_err();
        assert!(dup.contains("already exists"));
    }

    #[test]
    fn search_defaults_to_ten_results() {
        let db = database();
        for i in 0..15 {
            add_product(&db, create(&format!("Cheese {}", i), 300.0, None)).unwrap();
        }
        assert_eq!(search_products(&db, "cheese", None).unwrap().total, 10);
        assert_eq!(search_products(&db, "cheese", Some(3)).unwrap().total, 3);
    }

    #[test]
    fn list_pages_through_the_catalog() {
        let db = database();
        seed_catalog(&db).unwrap();

        let first = list_products(&db, None, None, 1).unwrap();
        assert_eq!(first.products.len(), PAGE_SIZE as usize);
        assert_eq!(first.total, DEFAULT_CATALOG.len() as i64);
        assert_eq!(first.pages, (first.total + PAGE_SIZE - 1) / PAGE_SIZE);

        let fish = list_products(&db, Some("Fish"), None, 1).unwrap();
        assert!(fish.products.iter().all(|p| p.category == "Fish & Seafood"));
        assert_eq!(fish.total, fish.products.len() as i64);
    }

    #[test]
    fn update_and_missing_product() {
        let db = database();
        let apple = add_product(&db, create("Apple", 47.0, Some("Fruit"))).unwrap();

        let updated = update_product(
            &db,
            apple.id,
            ProductUpdate { category: Some("Fruits & Berries".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(updated.category, "Fruits & Berries");
        assert_eq!(updated.per_100g.calories, 47.0);

        assert!(update_product(&db, 999, ProductUpdate::default()).is_err());
        assert!(update_product(&db, apple.id, ProductUpdate { fat: Some(-2.0), ..Default::default() }).is_err());
    }

    #[test]
    fn delete_unused_product() {
        let db = database();
        let apple = add_product(&db, create("Apple", 47.0, None)).unwrap();

        let result = delete_product(&db, apple.id).unwrap();
        assert!(result.is_ok());
        assert!(get_product(&db, apple.id).unwrap().is_none());
        assert!(delete_product(&db, apple.id).is_err());
    }

    #[test]
    fn delete_is_blocked_while_diary_uses_product() {
        use crate::tools::diary::{delete_food_entry, log_food, LogItem};
        use crate::tools::users::register_user;

        let db = database();
        register_user(&db, "anna").unwrap();
        let apple = add_product(&db, create("Apple", 47.0, None)).unwrap();
        let items = [LogItem { product_id: apple.id, weight: 120.0 }];
        let first = log_food(&db, "anna", Some("2024-03-01"), "snack", &items).unwrap();
        log_food(&db, "anna", Some("2024-03-02"), "snack", &items).unwrap();

        let blocked = delete_product(&db, apple.id).unwrap().unwrap_err();
        assert_eq!(blocked.usage_count, 2);
        assert!(blocked.error.contains("used by diary entries"));
        assert!(get_product(&db, apple.id).unwrap().is_some());

        delete_food_entry(&db, "anna", first.added[0].id).unwrap();
        let blocked = delete_product(&db, apple.id).unwrap().unwrap_err();
        assert_eq!(blocked.usage_count, 1);
    }

    #[test]
    fn seeding_is_idempotent() {
        let db = database();
        let first = seed_catalog(&db).unwrap();
        let second = seed_catalog(&db).unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.total, first.total);
    }
}
