//! Data models
//!
//! Rust structs representing database entities.

mod food_entry;
mod nutrition;
mod product;
mod profile;
mod user;

pub use food_entry::{normalize_meal_type, FoodEntry, FoodEntryCreate, MealType};
pub use nutrition::Nutrition;
pub use product::{Product, ProductCreate, ProductUpdate, DEFAULT_CATEGORY};
pub use profile::{ActivityLevel, Gender, Goal, ProfileData, UserProfile};
pub use user::User;
