//! User MCP Tools

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{User, UserProfile};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub has_profile: bool,
}

/// Register a user under a unique name
pub fn register_user(db: &Database, name: &str) -> Result<UserResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("User name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let existing = User::get_by_name(&conn, name)
        .map_err(|e| format!("Failed to check user: {}", e))?;
    if existing.is_some() {
        return Err(format!("User name already taken: {}", name));
    }

    let user = User::create(&conn, name)
        .map_err(|e| format!("Failed to create user: {}", e))?;
    info!(user_id = user.id, "registered user");

    Ok(UserResponse {
        id: user.id,
        name: user.name,
        created_at: user.created_at,
        has_profile: false,
    })
}

/// Look a user up by name
pub fn get_user(db: &Database, name: &str) -> Result<Option<UserResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_name(&conn, name.trim())
        .map_err(|e| format!("Failed to get user: {}", e))?;

    match user {
        Some(user) => {
            let has_profile = UserProfile::get_by_user(&conn, user.id)
                .map_err(|e| format!("Failed to get profile: {}", e))?
                .is_some();
            Ok(Some(UserResponse {
                id: user.id,
                name: user.name,
                created_at: user.created_at,
                has_profile,
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::database;

    #[test]
    fn register_trims_and_rejects_duplicates() {
        let db = database();
        let user = register_user(&db, "  anna ").unwrap();
        assert_eq!(user.name, "anna");

        let err = register_user(&db, "anna").unwrap_err();
        assert!(err.contains("already taken"));
        assert!(register_user(&db, "   ").is_err());
    }

    #[test]
    fn get_user_reports_missing() {
        let db = database();
        register_user(&db, "anna").unwrap();

        let found = get_user(&db, "anna").unwrap().unwrap();
        assert!(!found.has_profile);
        assert!(get_user(&db, "boris").unwrap().is_none());
    }
}
