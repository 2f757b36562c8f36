//! Weekly statistics MCP Tool

use chrono::Duration;

use crate::db::Database;
use crate::models::{FoodEntry, Product, UserProfile};
use crate::nutrition::stats::WINDOW_DAYS;
use crate::nutrition::{weekly_statistics as compute_weekly, WeeklyStatistics};
use super::{parse_date, require_user};

/// Seven-day statistics ending on `end_date` (today when omitted)
pub fn weekly_statistics(db: &Database, user_name: &str, end_date: Option<&str>) -> Result<WeeklyStatistics, String> {
    let end = parse_date(end_date)?;
    let start = end
        .checked_sub_signed(Duration::days(WINDOW_DAYS - 1))
        .ok_or_else(|| "Date out of range".to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    let entries = FoodEntry::list_for_user_range(&conn, user.id, start, end)
        .map_err(|e| format!("Failed to list food entries: {}", e))?;
    let product_ids: Vec<i64> = entries.iter().map(|e| e.product_id).collect();
    let catalog = Product::get_many(&conn, &product_ids)
        .map_err(|e| format!("Failed to load products: {}", e))?;

    let target = UserProfile::get_by_user(&conn, user.id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .and_then(|p| p.target_calories);

    compute_weekly(&entries, &catalog, end, target).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductCreate;
    use crate::tools::diary::{log_food, LogItem};
    use crate::tools::products::add_product;
    use crate::tools::profiles::{set_profile, ProfileInput};
    use crate::tools::test_support::database;
    use crate::tools::users::register_user;

    #[test]
    fn week_with_profile_target() {
        let db = database();
        register_user(&db, "ivan").unwrap();
        set_profile(
            &db,
            "ivan",
            ProfileInput {
                name: None,
                age: 30,
                gender: "male".to_string(),
                weight: 70.0,
                height: 175.0,
                activity_level: "sedentary".to_string(),
                goal: "maintain".to_string(),
            },
        )
        .unwrap();
        let meal = add_product(
            &db,
            ProductCreate {
                name: "Daily Meal".to_string(),
                calories_per_100g: 2000.0,
                protein: 90.0,
                carbs: 260.0,
                fat: 66.666_666_666_666_67,
                category: None,
            },
        )
        .unwrap();

        for day in ["2024-03-05", "2024-03-06", "2024-03-07", "2024-02-20"] {
            log_food(&db, "ivan", Some(day), "lunch", &[LogItem { product_id: meal.id, weight: 100.0 }]).unwrap();
        }

        let stats = weekly_statistics(&db, "ivan", Some("2024-03-07")).unwrap();
        assert_eq!(stats.daily.len(), 7);
        assert_eq!(stats.days_logged, 3);
        assert_eq!(stats.target_calories, Some(1978));
        assert_eq!(stats.scores.consistency, 43);
        assert!((stats.averages.calories - 6000.0 / 7.0).abs() < 1e-9);
        // average 857 vs target 1978 is far outside 500 kcal
        assert_eq!(stats.scores.calorie_goal, 0);
        assert_eq!(stats.scores.macro_balance, 100);
    }

    #[test]
    fn earliest_representable_date_is_rejected() {
        let db = database();
        register_user(&db, "anna").unwrap();
        let err = weekly_statistics(&db, "anna", Some("-262143-01-01")).unwrap_err();
        assert_eq!(err, "Date out of range");
    }

    #[test]
    fn week_without_profile_scores_goal_zero() {
        let db = database();
        register_user(&db, "anna").unwrap();
        let stats = weekly_statistics(&db, "anna", None).unwrap();
        assert_eq!(stats.target_calories, None);
        assert_eq!(stats.scores.calorie_goal, 0);
        assert_eq!(stats.end, chrono::Local::now().date_naive());
    }
}
