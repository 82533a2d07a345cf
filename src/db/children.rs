//! Child rows of a draft report: issues, schedule items, financials, appendix.
//!
//! Updates are always scoped by `report_id` so an id belonging to another
//! report reads as missing.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::codec::{date_from_row, date_to_sql, enum_from_row};
use crate::errors::PortalError;
use crate::models::{
    Appendix, AppendixInput, Financial, FinancialInput, Issue, IssueInput, ScheduleInput,
    ScheduleItem,
};

fn issue_from_row(row: &Row) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: row.get(0)?,
        report_id: row.get(1)?,
        description: row.get(2)?,
        start_date: date_from_row(row, 3)?,
        impact: enum_from_row(row, 4)?,
        likelihood: enum_from_row(row, 5)?,
        overall_risk: row.get(6)?,
        recommendation: row.get(7)?,
        status: enum_from_row(row, 8)?,
    })
}

fn schedule_from_row(row: &Row) -> rusqlite::Result<ScheduleItem> {
    Ok(ScheduleItem {
        id: row.get(0)?,
        report_id: row.get(1)?,
        task: row.get(2)?,
        target_date: date_from_row(row, 3)?,
        completion_percent: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn financial_from_row(row: &Row) -> rusqlite::Result<Financial> {
    Ok(Financial {
        id: row.get(0)?,
        report_id: row.get(1)?,
        original_contract_amt: row.get(2)?,
        paid_to_date: row.get(3)?,
    })
}

fn appendix_from_row(row: &Row) -> rusqlite::Result<Appendix> {
    Ok(Appendix {
        id: row.get(0)?,
        report_id: row.get(1)?,
        content: row.get(2)?,
    })
}

const ISSUE_COLUMNS: &str =
    "id, report_id, description, start_date, impact, likelihood, overall_risk, recommendation, status";
const SCHEDULE_COLUMNS: &str = "id, report_id, task, target_date, completion_percent, notes";

// ---- issues ----

pub fn insert_issue(conn: &Connection, report_id: i64, input: &IssueInput) -> Result<Issue, PortalError> {
    conn.execute(
        "INSERT INTO issues (report_id, description, start_date, impact, likelihood, overall_risk, recommendation, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            report_id,
            input.description,
            date_to_sql(&input.start_date),
            input.impact.as_str(),
            input.likelihood.as_str(),
            input.overall_risk(),
            input.recommendation,
            input.status.as_str(),
        ],
    )?;
    get_issue(conn, report_id, conn.last_insert_rowid())?
        .ok_or_else(|| PortalError::Internal("issue vanished after insert".into()))
}

pub fn update_issue(
    conn: &Connection,
    report_id: i64,
    id: i64,
    input: &IssueInput,
) -> Result<Option<Issue>, PortalError> {
    let affected = conn.execute(
        "UPDATE issues SET description = ?3, start_date = ?4, impact = ?5, likelihood = ?6, overall_risk = ?7, recommendation = ?8, status = ?9 WHERE id = ?1 AND report_id = ?2",
        params![
            id,
            report_id,
            input.description,
            date_to_sql(&input.start_date),
            input.impact.as_str(),
            input.likelihood.as_str(),
            input.overall_risk(),
            input.recommendation,
            input.status.as_str(),
        ],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    get_issue(conn, report_id, id)
}

pub fn get_issue(conn: &Connection, report_id: i64, id: i64) -> Result<Option<Issue>, PortalError> {
    let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1 AND report_id = ?2");
    Ok(conn.query_row(&sql, params![id, report_id], issue_from_row).optional()?)
}

pub fn list_issues(conn: &Connection, report_id: i64) -> Result<Vec<Issue>, PortalError> {
    let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE report_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![report_id], issue_from_row)?;
    let mut issues = Vec::new();
    for row in rows {
        issues.push(row?);
    }
    Ok(issues)
}

// ---- schedule ----

pub fn insert_schedule_item(
    conn: &Connection,
    report_id: i64,
    input: &ScheduleInput,
    target_date: NaiveDate,
) -> Result<ScheduleItem, PortalError> {
    conn.execute(
        "INSERT INTO schedule_scope (report_id, task, target_date, completion_percent, notes) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            report_id,
            input.task,
            date_to_sql(&target_date),
            input.completion_percent(),
            input.notes(),
        ],
    )?;
    get_schedule_item(conn, report_id, conn.last_insert_rowid())?
        .ok_or_else(|| PortalError::Internal("schedule item vanished after insert".into()))
}

pub fn update_schedule_item(
    conn: &Connection,
    report_id: i64,
    id: i64,
    input: &ScheduleInput,
    target_date: NaiveDate,
) -> Result<Option<ScheduleItem>, PortalError> {
    let affected = conn.execute(
        "UPDATE schedule_scope SET task = ?3, target_date = ?4, completion_percent = ?5, notes = ?6 WHERE id = ?1 AND report_id = ?2",
        params![
            id,
            report_id,
            input.task,
            date_to_sql(&target_date),
            input.completion_percent(),
            input.notes(),
        ],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    get_schedule_item(conn, report_id, id)
}

pub fn get_schedule_item(
    conn: &Connection,
    report_id: i64,
    id: i64,
) -> Result<Option<ScheduleItem>, PortalError> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule_scope WHERE id = ?1 AND report_id = ?2");
    Ok(conn.query_row(&sql, params![id, report_id], schedule_from_row).optional()?)
}

pub fn delete_schedule_item(conn: &Connection, report_id: i64, id: i64) -> Result<bool, PortalError> {
    let affected = conn.execute(
        "DELETE FROM schedule_scope WHERE id = ?1 AND report_id = ?2",
        params![id, report_id],
    )?;
    Ok(affected > 0)
}

pub fn list_schedule_items(conn: &Connection, report_id: i64) -> Result<Vec<ScheduleItem>, PortalError> {
    let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule_scope WHERE report_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![report_id], schedule_from_row)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

// ---- financials ----

pub fn get_financial(conn: &Connection, report_id: i64) -> Result<Option<Financial>, PortalError> {
    Ok(conn
        .query_row(
            "SELECT id, report_id, original_contract_amt, paid_to_date FROM financials WHERE report_id = ?1",
            params![report_id],
            financial_from_row,
        )
        .optional()?)
}

pub fn insert_financial(
    conn: &Connection,
    report_id: i64,
    input: &FinancialInput,
) -> Result<Financial, PortalError> {
    conn.execute(
        "INSERT INTO financials (report_id, original_contract_amt, paid_to_date) VALUES (?1, ?2, ?3)",
        params![report_id, input.original_contract_amt, input.paid_to_date],
    )?;
    get_financial(conn, report_id)?
        .ok_or_else(|| PortalError::Internal("financial record vanished after insert".into()))
}

pub fn update_financial(
    conn: &Connection,
    report_id: i64,
    id: i64,
    input: &FinancialInput,
) -> Result<Option<Financial>, PortalError> {
    let affected = conn.execute(
        "UPDATE financials SET original_contract_amt = ?3, paid_to_date = ?4 WHERE id = ?1 AND report_id = ?2",
        params![id, report_id, input.original_contract_amt, input.paid_to_date],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    get_financial(conn, report_id)
}

// ---- appendix ----

pub fn get_appendix(conn: &Connection, report_id: i64) -> Result<Option<Appendix>, PortalError> {
    Ok(conn
        .query_row(
            "SELECT id, report_id, content FROM appendix WHERE report_id = ?1",
            params![report_id],
            appendix_from_row,
        )
        .optional()?)
}

pub fn insert_appendix(
    conn: &Connection,
    report_id: i64,
    input: &AppendixInput,
) -> Result<Appendix, PortalError> {
    conn.execute(
        "INSERT INTO appendix (report_id, content) VALUES (?1, ?2)",
        params![report_id, input.content()],
    )?;
    get_appendix(conn, report_id)?
        .ok_or_else(|| PortalError::Internal("appendix vanished after insert".into()))
}

pub fn update_appendix(
    conn: &Connection,
    report_id: i64,
    id: i64,
    input: &AppendixInput,
) -> Result<Option<Appendix>, PortalError> {
    let affected = conn.execute(
        "UPDATE appendix SET content = ?3 WHERE id = ?1 AND report_id = ?2",
        params![id, report_id, input.content()],
    )?;
    if affected == 0 {
        return Ok(None);
    }
    get_appendix(conn, report_id)
}
