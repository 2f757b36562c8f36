//! Diary status tool
//!
//! Runtime status of the service, plus the usage guide handed to MCP clients.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for assistants driving the diary tools
pub const DIARY_INSTRUCTIONS: &str = r#"
# Calorie Diary Instructions

## Users

Every diary call takes a `user` name. Register it once with `register_user`.
Names are unique; there are no passwords.

## Products

Products store calories, protein, carbs and fat **per 100 g**.

- `search_products` finds products by part of the name (10 results by default).
- `list_products` browses by category, 20 per page.
- `add_product` creates a missing product. Convert label values to per 100 g:
  `(value / package_grams) * 100`.
- `seed_catalog` loads the default catalog. Running it again only adds what is missing.

## Logging Food

`log_food` takes a date (YYYY-MM-DD, default today), a meal type and a list of
`{product_id, weight}` items with weight in grams.

Meal types: `breakfast`, `lunch`, `dinner`, `snack`. Other meal types are
stored and counted in day totals but do not appear in any meal group.

Items with an unknown product or a weight of 0 or less are skipped and listed
in the response; the rest are logged.

`quick_add_food` logs one product by its exact name.

## Profile and Targets

`set_profile` stores age, gender (male/female), weight (kg), height (cm),
activity level (sedentary, light, moderate, active, very_active) and goal
(lose, maintain, gain). The daily target uses the Mifflin-St Jeor equation,
the activity multiplier and a 500 kcal shift for lose/gain.

## Statistics

`get_day` shows day totals and meal groups. `weekly_statistics` covers the
seven days ending on a date: daily calories, averages (sum / 7) and three
0-100 scores for consistency, macro balance and closeness to the target.
"#;

/// Runtime status of the diary service
#[derive(Debug, Clone, Serialize)]
pub struct DiaryStatus {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information since startup
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> DiaryStatus {
        let build = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        DiaryStatus {
            name: build.name,
            version: build.version,
            build_number: build.build_number,
            build_timestamp: build.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
