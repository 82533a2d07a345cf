use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::codec::{date_from_row, enum_from_row, opt_enum_from_row, opt_ts_from_row, ts_from_row, ts_to_sql};
use crate::errors::PortalError;
use crate::models::{ReviewSnapshot, Signature, Snapshot, SnapshotStatus};

const SNAPSHOT_COLUMNS: &str = "s.id, s.report_id, s.status, s.created_at, s.approved_at, s.signature_name, s.signature_method, s.signature_url, s.schema_version, s.snapshot_data";

fn snapshot_from_row(row: &Row) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        id: row.get(0)?,
        report_id: row.get(1)?,
        status: enum_from_row(row, 2)?,
        created_at: ts_from_row(row, 3)?,
        approved_at: opt_ts_from_row(row, 4)?,
        signature_name: row.get(5)?,
        signature_method: opt_enum_from_row(row, 6)?,
        signature_url: row.get(7)?,
        schema_version: row.get(8)?,
        snapshot_data: row.get(9)?,
    })
}

fn review_from_row(row: &Row) -> rusqlite::Result<ReviewSnapshot> {
    Ok(ReviewSnapshot {
        snapshot: snapshot_from_row(row)?,
        report_name: row.get(10)?,
        department: row.get(11)?,
        report_start_date: date_from_row(row, 12)?,
    })
}

/// Optional filters for the reviewer listing.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFilter {
    pub report_id: Option<i64>,
    pub status: Option<SnapshotStatus>,
}

pub fn insert_snapshot(
    conn: &Connection,
    report_id: i64,
    snapshot_data: &str,
    schema_version: u32,
    created_at: DateTime<Utc>,
) -> Result<Snapshot, PortalError> {
    conn.execute(
        "INSERT INTO report_snapshots (report_id, snapshot_data, schema_version, created_at, status) VALUES (?1, ?2, ?3, ?4, 'pending')",
        params![report_id, snapshot_data, schema_version, ts_to_sql(&created_at)],
    )?;
    let id = conn.last_insert_rowid();
    get_snapshot(conn, id)?.ok_or_else(|| PortalError::Internal(format!("snapshot {id} vanished after insert")))
}

pub fn get_snapshot(conn: &Connection, id: i64) -> Result<Option<Snapshot>, PortalError> {
    let sql = format!("SELECT {SNAPSHOT_COLUMNS} FROM report_snapshots s WHERE s.id = ?1");
    Ok(conn.query_row(&sql, params![id], snapshot_from_row).optional()?)
}

/// Set status, approval time and every signature column in one statement.
/// Refuses rows that are already approved.
pub fn mark_approved(
    conn: &Connection,
    id: i64,
    signature: &Signature,
    approved_at: DateTime<Utc>,
) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "UPDATE report_snapshots SET status = 'approved', approved_at = ?2, signature_name = ?3, signature_method = ?4, signature_url = ?5 WHERE id = ?1 AND status <> 'approved'",
        params![
            id,
            ts_to_sql(&approved_at),
            signature.name,
            signature.method.as_str(),
            signature.url,
        ],
    )?;
    Ok(affected > 0)
}

/// Only pending snapshots can be denied; signature columns are untouched.
pub fn mark_denied(conn: &Connection, id: i64) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "UPDATE report_snapshots SET status = 'denied' WHERE id = ?1 AND status = 'pending'",
        params![id],
    )?;
    Ok(affected > 0)
}

pub fn delete_approved(conn: &Connection, id: i64) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "DELETE FROM report_snapshots WHERE id = ?1 AND status = 'approved'",
        params![id],
    )?;
    Ok(affected > 0)
}

/// Snapshots of one report, newest first, optionally restricted to a status.
pub fn list_for_report(
    conn: &Connection,
    report_id: i64,
    status: Option<SnapshotStatus>,
) -> Result<Vec<Snapshot>, PortalError> {
    let sql = format!(
        "SELECT {SNAPSHOT_COLUMNS} FROM report_snapshots s \
         WHERE s.report_id = ?1 AND (?2 IS NULL OR s.status = ?2) \
         ORDER BY s.created_at DESC, s.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![report_id, status.map(|s| s.as_str())], snapshot_from_row)?;
    let mut snapshots = Vec::new();
    for row in rows {
        snapshots.push(row?);
    }
    Ok(snapshots)
}

pub fn list_for_review(conn: &Connection, filter: &SnapshotFilter) -> Result<Vec<ReviewSnapshot>, PortalError> {
    let sql = format!(
        "SELECT {SNAPSHOT_COLUMNS}, r.name, r.department, r.start_date \
         FROM report_snapshots s JOIN reports r ON r.id = s.report_id \
         WHERE (?1 IS NULL OR s.report_id = ?1) AND (?2 IS NULL OR s.status = ?2) \
         ORDER BY s.created_at DESC, s.id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![filter.report_id, filter.status.map(|s| s.as_str())],
        review_from_row,
    )?;
    let mut snapshots = Vec::new();
    for row in rows {
        snapshots.push(row?);
    }
    Ok(snapshots)
}

pub fn get_for_review(conn: &Connection, id: i64) -> Result<Option<ReviewSnapshot>, PortalError> {
    let sql = format!(
        "SELECT {SNAPSHOT_COLUMNS}, r.name, r.department, r.start_date \
         FROM report_snapshots s JOIN reports r ON r.id = s.report_id WHERE s.id = ?1"
    );
    Ok(conn.query_row(&sql, params![id], review_from_row).optional()?)
}
