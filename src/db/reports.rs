use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::codec::{date_from_row, date_to_sql, enum_from_row, ts_from_row, ts_to_sql};
use crate::errors::PortalError;
use crate::models::{NewReport, Report, ReportStatus, ReportUpdate};

const REPORT_COLUMNS: &str =
    "r.id, r.name, r.department, r.start_date, r.status, r.version, r.is_latest, r.created_at, r.updated_at";

fn report_from_row(row: &Row) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        start_date: date_from_row(row, 3)?,
        status: enum_from_row(row, 4)?,
        version: row.get(5)?,
        is_latest: row.get(6)?,
        created_at: ts_from_row(row, 7)?,
        updated_at: ts_from_row(row, 8)?,
    })
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Report>, PortalError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, report_from_row)?;
    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

pub fn insert_report(
    conn: &Connection,
    report: &NewReport,
    now: DateTime<Utc>,
) -> Result<Report, PortalError> {
    let ts = ts_to_sql(&now);
    conn.execute(
        "INSERT INTO reports (name, department, start_date, version, is_latest, status, created_at, updated_at) VALUES (?1, ?2, ?3, 1, 1, 'open', ?4, ?4)",
        params![report.name.trim(), report.department.trim(), date_to_sql(&report.start_date), ts],
    )?;
    let id = conn.last_insert_rowid();
    get_report(conn, id)?.ok_or_else(|| PortalError::Internal(format!("report {id} vanished after insert")))
}

pub fn get_report(conn: &Connection, id: i64) -> Result<Option<Report>, PortalError> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports r WHERE r.id = ?1");
    Ok(conn.query_row(&sql, params![id], report_from_row).optional()?)
}

/// Apply the provided fields in place. Returns `None` when the report is missing.
pub fn update_report(
    conn: &Connection,
    id: i64,
    update: &ReportUpdate,
    now: DateTime<Utc>,
) -> Result<Option<Report>, PortalError> {
    let affected = conn.execute(
        "UPDATE reports SET name = COALESCE(?2, name), department = COALESCE(?3, department), start_date = COALESCE(?4, start_date), updated_at = ?5 WHERE id = ?1",
        params![
            id,
            update.name.as_deref().map(str::trim),
            update.department.as_deref().map(str::trim),
            update.start_date.as_ref().map(date_to_sql),
            ts_to_sql(&now),
        ],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    get_report(conn, id)
}

pub fn set_report_status(
    conn: &Connection,
    id: i64,
    status: ReportStatus,
    now: DateTime<Utc>,
) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "UPDATE reports SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, status.as_str(), ts_to_sql(&now)],
    )?;
    Ok(affected > 0)
}

pub fn touch_report(conn: &Connection, id: i64, now: DateTime<Utc>) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "UPDATE reports SET updated_at = ?2 WHERE id = ?1",
        params![id, ts_to_sql(&now)],
    )?;
    Ok(affected > 0)
}

/// Latest report versions, oldest first, as the form landing page lists them.
pub fn list_latest_reports(conn: &Connection) -> Result<Vec<Report>, PortalError> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports r WHERE r.is_latest = 1 ORDER BY r.created_at ASC, r.id ASC"
    );
    collect(conn, &sql, [])
}

/// Latest reports with at least one approved snapshot, newest first.
pub fn list_public_reports(conn: &Connection) -> Result<Vec<Report>, PortalError> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports r \
         WHERE r.is_latest = 1 \
           AND EXISTS (SELECT 1 FROM report_snapshots s WHERE s.report_id = r.id AND s.status = 'approved') \
         ORDER BY r.created_at DESC, r.id DESC"
    );
    collect(conn, &sql, [])
}
