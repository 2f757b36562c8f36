//! Calorie diary MCP server
//!
//! Routes MCP tool calls to the tool layer.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{ProductCreate, ProductUpdate};
use crate::tools::diary::{self, LogItem};
use crate::tools::products;
use crate::tools::profiles::{self, ProfileInput};
use crate::tools::statistics;
use crate::tools::status::{StatusTracker, DIARY_INSTRUCTIONS};
use crate::tools::users;

/// Calorie diary MCP service
#[derive(Clone)]
pub struct DiaryService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    tool_router: ToolRouter<DiaryService>,
}

impl DiaryService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path)),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, key: impl std::fmt::Display) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "key": "{}"}}"#,
        what, key
    ))])
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserNameParams {
    /// Unique user name
    pub name: String,
}

// ============================================================================
// Product Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    /// Unique product name
    pub name: String,
    /// Calories per 100 g
    pub calories_per_100g: f64,
    /// Protein grams per 100 g
    #[serde(default)]
    pub protein: f64,
    /// Carbohydrate grams per 100 g
    #[serde(default)]
    pub carbs: f64,
    /// Fat grams per 100 g
    #[serde(default)]
    pub fat: f64,
    /// Category (default "Other")
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductIdParams {
    /// Product ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchProductsParams {
    /// Part of the product name
    pub query: String,
    /// Maximum results (default 10)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProductsParams {
    /// Category filter (substring)
    pub category: Option<String>,
    /// Name filter (substring)
    pub search: Option<String>,
    /// Page number starting at 1
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 { 1 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProductParams {
    /// Product ID to update
    pub id: i64,
    pub name: Option<String>,
    pub calories_per_100g: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub category: Option<String>,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogItemParam {
    /// Product ID
    pub product_id: i64,
    /// Weight eaten in grams
    pub weight: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// User name
    pub user: String,
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
    /// Meal type: breakfast, lunch, dinner or snack
    pub meal_type: String,
    /// Products and weights to log
    pub items: Vec<LogItemParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct QuickAddFoodParams {
    /// User name
    pub user: String,
    /// Exact product name
    pub product_name: String,
    /// Weight eaten in grams
    pub weight: f64,
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
    /// Meal type: breakfast, lunch, dinner or snack
    pub meal_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodEntryParams {
    /// User name (must own the entry)
    pub user: String,
    /// Food entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserDateParams {
    /// User name
    pub user: String,
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// User name
    pub user: String,
    /// Display name (default: the user name)
    pub name: Option<String>,
    /// Age in years
    pub age: i64,
    /// male or female
    pub gender: String,
    /// Weight in kg
    pub weight: f64,
    /// Height in cm
    pub height: f64,
    /// sedentary, light, moderate, active or very_active
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
    /// lose, maintain or gain
    #[serde(default = "default_goal")]
    pub goal: String,
}

fn default_activity_level() -> String { "sedentary".to_string() }
fn default_goal() -> String { "maintain".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserParams {
    /// User name
    pub user: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl DiaryService {
    // --- Status ---

    #[tool(description = "Get the current status of the calorie diary service including build info, database status, and process information")]
    fn diary_status(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.status_tracker.get_status())
    }

    #[tool(description = "Get instructions for using the calorie diary tools. Call this when starting a food logging session.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Users ---

    #[tool(description = "Register a user with a unique name")]
    fn register_user(&self, Parameters(p): Parameters<UserNameParams>) -> Result<CallToolResult, McpError> {
        let result = users::register_user(&self.database, &p.name).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Look a user up by name")]
    fn get_user(&self, Parameters(p): Parameters<UserNameParams>) -> Result<CallToolResult, McpError> {
        let result = users::get_user(&self.database, &p.name).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(user) => json_result(&user),
            None => Ok(not_found("User", &p.name)),
        }
    }

    // --- Products ---

    #[tool(description = "Create a catalog product with calories and macronutrients per 100 g")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let data = ProductCreate {
            name: p.name, calories_per_100g: p.calories_per_100g,
            protein: p.protein, carbs: p.carbs, fat: p.fat, category: p.category,
        };
        let result = products::add_product(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a product with its per-100 g values and the number of diary entries using it")]
    fn get_product(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let result = products::get_product(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(product) => json_result(&product),
            None => Ok(not_found("Product", p.id)),
        }
    }

    #[tool(description = "Search products by part of their name (10 results by default)")]
    fn search_products(&self, Parameters(p): Parameters<SearchProductsParams>) -> Result<CallToolResult, McpError> {
        let result = products::search_products(&self.database, &p.query, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List products ordered by category and name, 20 per page, with optional category and name filters")]
    fn list_products(&self, Parameters(p): Parameters<ListProductsParams>) -> Result<CallToolResult, McpError> {
        let result = products::list_products(&self.database, p.category.as_deref(), p.search.as_deref(), p.page)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Correct a product's name, per-100 g values or category")]
    fn update_product(&self, Parameters(p): Parameters<UpdateProductParams>) -> Result<CallToolResult, McpError> {
        let data = ProductUpdate {
            name: p.name, calories_per_100g: p.calories_per_100g,
            protein: p.protein, carbs: p.carbs, fat: p.fat, category: p.category,
        };
        let result = products::update_product(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a product (only allowed if no diary entry uses it)")]
    fn delete_product(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let result = products::delete_product(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Ok(success) => json_result(&success),
            Err(blocked) => json_result(&blocked),
        }
    }

    #[tool(description = "Load the default product catalog. Existing products are kept; safe to run repeatedly.")]
    fn seed_catalog(&self) -> Result<CallToolResult, McpError> {
        let result = products::seed_catalog(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Log one or more products with weights in grams for a date and meal. Invalid items are skipped and reported.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let items: Vec<LogItem> = p.items.into_iter()
            .map(|i| LogItem { product_id: i.product_id, weight: i.weight })
            .collect();
        let result = diary::log_food(&self.database, &p.user, p.date.as_deref(), &p.meal_type, &items)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log one product by its exact name")]
    fn quick_add_food(&self, Parameters(p): Parameters<QuickAddFoodParams>) -> Result<CallToolResult, McpError> {
        let result = diary::quick_add_food(&self.database, &p.user, &p.product_name, p.weight, p.date.as_deref(), &p.meal_type)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a food entry belonging to the user")]
    fn delete_food_entry(&self, Parameters(p): Parameters<DeleteFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_food_entry(&self.database, &p.user, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a day's calorie and macro totals with entries grouped into breakfast, lunch, dinner and snack")]
    fn get_day(&self, Parameters(p): Parameters<UserDateParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_day(&self.database, &p.user, p.date.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Profile & Statistics ---

    #[tool(description = "Save the user's body metrics, activity level and goal, and compute the daily calorie target")]
    fn set_profile(&self, Parameters(p): Parameters<SetProfileParams>) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            name: p.name, age: p.age, gender: p.gender, weight: p.weight, height: p.height,
            activity_level: p.activity_level, goal: p.goal,
        };
        let result = profiles::set_profile(&self.database, &p.user, input).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the user's profile with BMR, TDEE and daily calorie target")]
    fn get_profile(&self, Parameters(p): Parameters<UserParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, &p.user).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => json_result(&profile),
            None => Ok(not_found("Profile", &p.user)),
        }
    }

    #[tool(description = "Seven-day statistics ending on a date (default today): daily calories, averages, and consistency, macro balance and calorie goal scores")]
    fn weekly_statistics(&self, Parameters(p): Parameters<UserDateParams>) -> Result<CallToolResult, McpError> {
        let result = statistics::weekly_statistics(&self.database, &p.user, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for DiaryService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::build_info::NAME.into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calorie Diary".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calorie Diary - food logging against a shared product catalog. \
                 IMPORTANT: Call diary_instructions before logging food. \
                 Users: register_user/get_user. \
                 Products: add/get/update/delete_product, search_products, list_products, seed_catalog. \
                 Diary: log_food, quick_add_food, delete_food_entry, get_day. \
                 Profile: set_profile/get_profile. Statistics: weekly_statistics. \
                 Status: diary_status."
                    .into(),
            ),
        }
    }
}
