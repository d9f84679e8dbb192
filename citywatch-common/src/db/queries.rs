//! Record store queries
//!
//! The store contract the triage pipeline relies on: append, read-all
//! snapshot, update-by-id. Complaints are never deleted.

use crate::db::models::{Category, Complaint, Severity, Status};
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

type ComplaintRow = (
    String,             // id
    String,             // description
    String,             // category
    String,             // severity
    String,             // state
    String,             // city
    Option<String>,     // area
    Option<String>,     // image_ref
    String,             // status
    Option<String>,     // remark
    DateTime<Utc>,      // submitted_at
);

const COMPLAINT_COLUMNS: &str =
    "id, description, category, severity, state, city, area, image_ref, status, remark, submitted_at";

fn row_to_complaint(row: ComplaintRow) -> Complaint {
    Complaint {
        id: row.0,
        description: row.1,
        category: Category::parse(&row.2),
        severity: Severity::parse(&row.3),
        state: row.4,
        city: row.5,
        area: row.6,
        image_ref: row.7,
        status: Status::parse(&row.8),
        remark: row.9,
        submitted_at: row.10,
    }
}

/// Append a new complaint record
pub async fn insert_complaint(pool: &SqlitePool, complaint: &Complaint) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO complaints (id, description, category, severity, state, city, area, image_ref, status, remark, submitted_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&complaint.id)
    .bind(&complaint.description)
    .bind(complaint.category.as_str())
    .bind(complaint.severity.as_str())
    .bind(&complaint.state)
    .bind(&complaint.city)
    .bind(&complaint.area)
    .bind(&complaint.image_ref)
    .bind(complaint.status.as_str())
    .bind(&complaint.remark)
    .bind(complaint.submitted_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Check whether a tracking ID is already taken
pub async fn tracking_id_exists(pool: &SqlitePool, id: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM complaints WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Full snapshot of the record store, newest first.
///
/// Burst detection and ranking re-scan this snapshot on every dashboard
/// read; nothing derived from it is persisted.
pub async fn list_complaints(pool: &SqlitePool) -> Result<Vec<Complaint>> {
    let rows: Vec<ComplaintRow> = sqlx::query_as(&format!(
        "SELECT {} FROM complaints ORDER BY submitted_at DESC",
        COMPLAINT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(row_to_complaint).collect())
}

/// Fetch a single complaint by tracking ID
pub async fn fetch_complaint(pool: &SqlitePool, id: &str) -> Result<Option<Complaint>> {
    let row: Option<ComplaintRow> = sqlx::query_as(&format!(
        "SELECT {} FROM complaints WHERE id = ?",
        COMPLAINT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(row_to_complaint))
}

/// Admin update of status and/or remark.
///
/// Returns false when the tracking ID is unknown. Transitions are
/// unordered: any status may follow any other.
pub async fn update_complaint(
    pool: &SqlitePool,
    id: &str,
    status: Option<Status>,
    remark: Option<&str>,
) -> Result<bool> {
    if status.is_none() && remark.is_none() {
        return tracking_id_exists(pool, id).await;
    }

    let result = match (status, remark) {
        (Some(status), Some(remark)) => {
            sqlx::query("UPDATE complaints SET status = ?, remark = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(remark)
                .bind(id)
                .execute(pool)
                .await?
        }
        (Some(status), None) => {
            sqlx::query("UPDATE complaints SET status = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(id)
                .execute(pool)
                .await?
        }
        (None, Some(remark)) => {
            sqlx::query("UPDATE complaints SET remark = ? WHERE id = ?")
                .bind(remark)
                .bind(id)
                .execute(pool)
                .await?
        }
        (None, None) => unreachable!(),
    };

    Ok(result.rows_affected() > 0)
}

/// Record the image reference for a complaint after a successful upload.
///
/// Returns false when the tracking ID is unknown.
pub async fn set_image_ref(pool: &SqlitePool, id: &str, image_ref: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE complaints SET image_ref = ? WHERE id = ?")
        .bind(image_ref)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
