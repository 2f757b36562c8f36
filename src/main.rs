//! Calorie Diary
//!
//! An MCP server for food logging and nutrition statistics.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use caldiary::build_info;
use caldiary::config::AppConfig;
use caldiary::db::{self, Database};
use caldiary::mcp::DiaryService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("caldiary=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let config = AppConfig::from_env();
    info!(path = %config.database_path.display(), "opening database");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            let from = db::migrations::get_schema_version(conn)?;
            info!(from, to = db::migrations::SCHEMA_VERSION, "migrating database schema");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        info!(version, "database schema ready");
        Ok(())
    })?;

    if config.seed_catalog {
        database.with_conn_mut(db::seed::seed_default_catalog)?;
    }

    let service = DiaryService::new(config.database_path, database);

    info!("serving MCP on stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
