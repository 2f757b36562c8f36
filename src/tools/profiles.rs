//! Profile MCP Tools
//!
//! Body metrics and goal, with the derived calorie target.

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{ActivityLevel, Gender, Goal, ProfileData, UserProfile};
use crate::nutrition::{bmr, compute_target, tdee, BodyMetrics};
use super::require_user;

/// Raw profile form input; enumerations are parsed permissively
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub age: i64,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub activity_level: String,
    pub goal: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: i64,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        let metrics = BodyMetrics::from(&p);
        Self {
            user_id: p.user_id,
            bmr: bmr(&metrics),
            tdee: tdee(&metrics),
            target_calories: p.target_calories.unwrap_or_else(|| compute_target(&metrics)),
            name: p.name,
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            activity_level: p.activity_level,
            goal: p.goal,
            updated_at: p.updated_at,
        }
    }
}

/// Validate, compute the target and save the user's profile
pub fn set_profile(db: &Database, user_name: &str, input: ProfileInput) -> Result<ProfileResponse, String> {
    if input.age <= 0 {
        return Err("age must be greater than 0".to_string());
    }
    if !input.weight.is_finite() || input.weight <= 0.0 {
        return Err("weight must be greater than 0".to_string());
    }
    if !input.height.is_finite() || input.height <= 0.0 {
        return Err("height must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    let data = ProfileData {
        name: input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| user.name.clone()),
        age: input.age,
        gender: Gender::from_str(&input.gender),
        weight: input.weight,
        height: input.height,
        activity_level: ActivityLevel::from_str(&input.activity_level),
        goal: Goal::from_str(&input.goal),
    };
    let target = compute_target(&BodyMetrics::from(&data));

    let profile = UserProfile::upsert(&conn, user.id, &data, target)
        .map_err(|e| format!("Failed to save profile: {}", e))?;
    info!(user_id = user.id, target, "saved profile");

    Ok(ProfileResponse::from(profile))
}

pub fn get_profile(db: &Database, user_name: &str) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let user = require_user(&conn, user_name)?;

    let profile = UserProfile::get_by_user(&conn, user.id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(profile.map(ProfileResponse::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::database;
    use crate::tools::users::register_user;

    fn input(goal: &str) -> ProfileInput {
        ProfileInput {
            name: None,
            age: 30,
            gender: "male".to_string(),
            weight: 70.0,
            height: 175.0,
            activity_level: "sedentary".to_string(),
            goal: goal.to_string(),
        }
    }

    #[test]
    fn set_profile_computes_target() {
        let db = database();
        register_user(&db, "ivan").unwrap();

        let profile = set_profile(&db, "ivan", input("lose")).unwrap();
        assert_eq!(profile.target_calories, 1478);
        assert_eq!(profile.name, "ivan");
        assert!((profile.bmr - 1648.75).abs() < 1e-9);

        let updated = set_profile(&db, "ivan", input("gain")).unwrap();
        assert_eq!(updated.target_calories, 2478);
        assert_eq!(get_profile(&db, "ivan").unwrap().unwrap().target_calories, 2478);
    }

    #[test]
    fn set_profile_rejects_non_positive_metrics() {
        let db = database();
        register_user(&db, "ivan").unwrap();

        assert!(set_profile(&db, "ivan", ProfileInput { age: 0, ..input("maintain") }).is_err());
        assert!(set_profile(&db, "ivan", ProfileInput { weight: -70.0, ..input("maintain") }).is_err());
        assert!(set_profile(&db, "ivan", ProfileInput { height: 0.0, ..input("maintain") }).is_err());
        assert!(get_profile(&db, "ivan").unwrap().is_none());
    }

    #[test]
    fn unknown_enumerations_fall_back() {
        let db = database();
        register_user(&db, "ivan").unwrap();

        let profile = set_profile(
            &db,
            "ivan",
            ProfileInput { activity_level: "couch".to_string(), ..input("bulk") },
        )
        .unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(profile.goal, Goal::Maintain);
        assert_eq!(profile.target_calories, 1978);
    }
}
