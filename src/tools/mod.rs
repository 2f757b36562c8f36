//! Calorie diary tools
//!
//! Tool implementations behind the MCP server. Each takes the database,
//! validates its input and returns a serializable response or a message.

pub mod diary;
pub mod products;
pub mod profiles;
pub mod statistics;
pub mod status;
pub mod users;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::models::User;

/// Parse an ISO `YYYY-MM-DD` date, defaulting to today
pub(crate) fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Look up a registered user by name
pub(crate) fn require_user(conn: &Connection, name: &str) -> Result<User, String> {
    User::get_by_name(conn, name.trim())
        .map_err(|e| format!("Failed to get user: {}", e))?
        .ok_or_else(|| format!("User not found: {}", name.trim()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::migrations::run_migrations;
    use crate::db::Database;

    pub fn database() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_and_defaults_to_today() {
        assert_eq!(
            parse_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(parse_date(None).unwrap(), chrono::Local::now().date_naive());
        assert_eq!(parse_date(Some("  ")).unwrap(), chrono::Local::now().date_naive());
        assert!(parse_date(Some("29.02.2024")).is_err());
    }
}
