//! User profile model
//!
//! Body metrics, activity level and goal. One profile per user; the
//! calorie target is computed when the profile is saved and cached here.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Anything other than "male" is treated as female
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" => Gender::Male,
            _ => Gender::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Unknown levels fall back to sedentary
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    /// Unknown goals fall back to maintain
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose" => Goal::Lose,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub target_calories: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile form data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: String = row.get("gender")?;
        let activity_level: String = row.get("activity_level")?;
        let goal: String = row.get("goal")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            gender: Gender::from_str(&gender),
            weight: row.get("weight")?,
            height: row.get("height")?,
            activity_level: ActivityLevel::from_str(&activity_level),
            goal: Goal::from_str(&goal),
            target_calories: row.get("target_calories")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn get_by_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let profile = conn
            .query_row(
                "SELECT * FROM user_profiles WHERE user_id = ?1",
                [user_id],
                Self::from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Create the user's profile or replace its contents
    pub fn upsert(
        conn: &Connection,
        user_id: i64,
        data: &ProfileData,
        target_calories: i64,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (
                user_id, name, age, gender, weight, height,
                activity_level, goal, target_calories
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                weight = excluded.weight,
                height = excluded.height,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                target_calories = excluded.target_calories,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.name,
                data.age,
                data.gender.as_str(),
                data.weight,
                data.height,
                data.activity_level.as_str(),
                data.goal.as_str(),
                target_calories,
            ],
        )?;

        Self::get_by_user(conn, user_id)?
            .ok_or_else(|| DbError::NotFound(format!("profile for user {}", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::User;

    fn data(weight: f64, goal: Goal) -> ProfileData {
        ProfileData {
            name: "Anna".to_string(),
            age: 30,
            gender: Gender::Female,
            weight,
            height: 165.0,
            activity_level: ActivityLevel::Moderate,
            goal,
        }
    }

    #[test]
    fn enum_parsing_falls_back() {
        assert_eq!(Gender::from_str("MALE"), Gender::Male);
        assert_eq!(Gender::from_str("other"), Gender::Female);
        assert_eq!(ActivityLevel::from_str("very_active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::from_str("couch"), ActivityLevel::Sedentary);
        assert_eq!(Goal::from_str("Gain"), Goal::Gain);
        assert_eq!(Goal::from_str("bulk"), Goal::Maintain);
    }

    #[test]
    fn upsert_keeps_one_profile_per_user() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let user = User::create(&conn, "anna").unwrap();

        let first = UserProfile::upsert(&conn, user.id, &data(60.0, Goal::Lose), 1500).unwrap();
        let second = UserProfile::upsert(&conn, user.id, &data(58.0, Goal::Maintain), 1900).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.weight, 58.0);
        assert_eq!(second.goal, Goal::Maintain);
        assert_eq!(second.target_calories, Some(1900));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM user_profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_profile_is_none() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert!(UserProfile::get_by_user(&conn, 42).unwrap().is_none());
    }
}
