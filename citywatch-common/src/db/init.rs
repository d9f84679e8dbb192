//! Database initialization
//!
//! Creates the complaint record store on first run and keeps the settings
//! table populated with defaults, so the portal starts with zero manual
//! setup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows the dashboard to read while a submission commits
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema.
///
/// Used by integration tests and ephemeral runs; identical schema and
/// default settings to the on-disk store.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_complaints_table(pool).await?;
    create_settings_table(pool).await?;
    Ok(())
}

/// Create the complaints table
///
/// Category, severity and status are constrained to the closed enumerations;
/// the record is append-only apart from admin status/remark updates and the
/// one-time image attachment.
pub async fn create_complaints_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS complaints (
            id TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            category TEXT NOT NULL CHECK (category IN ('Water', 'Road', 'Electricity', 'Sanitation', 'Internet', 'Other')),
            severity TEXT NOT NULL CHECK (severity IN ('Low', 'Medium', 'High', 'Critical')),
            state TEXT NOT NULL,
            city TEXT NOT NULL,
            area TEXT,
            image_ref TEXT,
            status TEXT NOT NULL DEFAULT 'Open' CHECK (status IN ('Open', 'In Progress', 'Resolved')),
            remark TEXT,
            submitted_at TIMESTAMP NOT NULL,
            CHECK (length(id) = 8)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Burst partitioning groups by (category, city); the dashboard sorts by
    // submission time
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_complaints_category_city ON complaints(category, city)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_complaints_submitted_at ON complaints(submitted_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize or update default settings
///
/// This function ensures all required settings exist with default values.
/// It also handles NULL values by resetting them to defaults.
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    // Burst detection settings. The threshold rule is
    //   burst = recent_count > max(threshold_min, multiplier * baseline_avg)
    // and every knob is tunable here rather than hard-coded.
    ensure_setting(pool, "burst_recent_window_hours", "24").await?;
    ensure_setting(pool, "burst_baseline_days", "7").await?;
    ensure_setting(pool, "burst_threshold_min", "5").await?;
    ensure_setting(pool, "burst_multiplier", "2.0").await?;

    // Priority ranking settings (severity dominates, recency breaks ties)
    ensure_setting(pool, "priority_weight_severity", "1.0").await?;
    ensure_setting(pool, "priority_weight_burst", "0.6").await?;
    ensure_setting(pool, "priority_weight_recency", "0.4").await?;
    ensure_setting(pool, "recency_half_life_hours", "48").await?;

    // Session and image-access settings
    ensure_setting(pool, "session_timeout_seconds", "86400").await?; // 24 hours
    ensure_setting(pool, "image_token_ttl_seconds", "3600").await?; // 1 hour

    info!("Default settings initialized");
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
/// If the setting exists but has a NULL value, it will be reset to the default.
pub async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM settings WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if !exists {
        // INSERT OR IGNORE handles concurrent initialization races
        sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(default_value)
            .execute(pool)
            .await?;

        return Ok(());
    }

    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_one(pool)
        .await?;

    if value.is_none() {
        sqlx::query("UPDATE settings SET value = ? WHERE key = ?")
            .bind(default_value)
            .bind(key)
            .execute(pool)
            .await?;

        warn!("Setting '{}' was NULL, reset to default: {}", key, default_value);
    }

    Ok(())
}
