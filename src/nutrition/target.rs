//! Daily calorie target
//!
//! Mifflin-St Jeor BMR, scaled by activity level and shifted by goal.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, Gender, Goal, ProfileData, UserProfile};

/// kcal per day removed or added for lose/gain goals
pub const GOAL_ADJUSTMENT: f64 = 500.0;

/// Inputs of the target calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub age: i64,
    pub gender: Gender,
    /// Kilograms
    pub weight: f64,
    /// Centimetres
    pub height: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl From<&ProfileData> for BodyMetrics {
    fn from(p: &ProfileData) -> Self {
        Self {
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            activity_level: p.activity_level,
            goal: p.goal,
        }
    }
}

impl From<&UserProfile> for BodyMetrics {
    fn from(p: &UserProfile) -> Self {
        Self {
            age: p.age,
            gender: p.gender,
            weight: p.weight,
            height: p.height,
            activity_level: p.activity_level,
            goal: p.goal,
        }
    }
}

pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
    }
}

/// Basal metabolic rate in kcal/day
pub fn bmr(m: &BodyMetrics) -> f64 {
    let base = 10.0 * m.weight + 6.25 * m.height - 5.0 * m.age as f64;
    match m.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure
pub fn tdee(m: &BodyMetrics) -> f64 {
    bmr(m) * activity_multiplier(m.activity_level)
}

/// Target calories, truncated toward zero.
///
/// Inputs are not validated here.
pub fn compute_target(m: &BodyMetrics) -> i64 {
    let tdee = tdee(m);
    let target = match m.goal {
        Goal::Lose => tdee - GOAL_ADJUSTMENT,
        Goal::Gain => tdee + GOAL_ADJUSTMENT,
        Goal::Maintain => tdee,
    };
    target as i64
}
