//! Draft report store: in-place CRUD for reports and their children.
//!
//! The `*_in` helpers take a bare connection so a submission can run several
//! of them inside one transaction.

use rusqlite::Connection;
use tracing::info;

use super::Portal;
use crate::auth::{require_role, RequestContext};
use crate::db::{children, codec, reports};
use crate::errors::PortalError;
use crate::models::{
    Appendix, AppendixInput, Financial, FinancialInput, FullReport, Issue, IssueInput, NewReport,
    Report, ReportStatus, ReportUpdate, Role, ScheduleInput, ScheduleItem,
};

pub(crate) fn require_report(conn: &Connection, id: i64) -> Result<Report, PortalError> {
    reports::get_report(conn, id)?.ok_or_else(|| PortalError::not_found(format!("Report {id}")))
}

pub(crate) fn load_full_report(conn: &Connection, id: i64) -> Result<FullReport, PortalError> {
    let report = require_report(conn, id)?;
    Ok(FullReport {
        issues: children::list_issues(conn, id)?,
        schedule_scope: children::list_schedule_items(conn, id)?,
        financials: children::get_financial(conn, id)?,
        appendix: children::get_appendix(conn, id)?,
        report,
    })
}

pub(crate) fn upsert_issue_in(
    conn: &Connection,
    report_id: i64,
    input: &IssueInput,
) -> Result<Issue, PortalError> {
    input.validate()?;
    require_report(conn, report_id)?;
    match input.id {
        None => children::insert_issue(conn, report_id, input),
        Some(id) => children::update_issue(conn, report_id, id, input)?
            .ok_or_else(|| PortalError::not_found(format!("Issue {id}"))),
    }
}

pub(crate) fn upsert_schedule_in(
    conn: &Connection,
    report_id: i64,
    input: &ScheduleInput,
) -> Result<ScheduleItem, PortalError> {
    input.validate()?;
    let target_date = input.resolve_target_date(codec::now().date_naive())?;
    require_report(conn, report_id)?;
    match input.id {
        None => children::insert_schedule_item(conn, report_id, input, target_date),
        Some(id) => children::update_schedule_item(conn, report_id, id, input, target_date)?
            .ok_or_else(|| PortalError::not_found(format!("Milestone {id}"))),
    }
}

pub(crate) fn delete_schedule_in(conn: &Connection, report_id: i64, id: i64) -> Result<(), PortalError> {
    require_report(conn, report_id)?;
    if !children::delete_schedule_item(conn, report_id, id)? {
        return Err(PortalError::not_found(format!("Milestone {id}")));
    }
    Ok(())
}

/// At most one financial record per report: without an id the existing row,
/// if any, is updated.
pub(crate) fn upsert_financial_in(
    conn: &Connection,
    report_id: i64,
    input: &FinancialInput,
) -> Result<Financial, PortalError> {
    input.validate()?;
    require_report(conn, report_id)?;
    let target = match input.id {
        Some(id) => Some(id),
        None => children::get_financial(conn, report_id)?.map(|f| f.id),
    };
    match target {
        None => children::insert_financial(conn, report_id, input),
        Some(id) => children::update_financial(conn, report_id, id, input)?
            .ok_or_else(|| PortalError::not_found(format!("Financial record {id}"))),
    }
}

/// Same single-row rule as financials.
pub(crate) fn upsert_appendix_in(
    conn: &Connection,
    report_id: i64,
    input: &AppendixInput,
) -> Result<Appendix, PortalError> {
    require_report(conn, report_id)?;
    let target = match input.id {
        Some(id) => Some(id),
        None => children::get_appendix(conn, report_id)?.map(|a| a.id),
    };
    match target {
        None => children::insert_appendix(conn, report_id, input),
        Some(id) => children::update_appendix(conn, report_id, id, input)?
            .ok_or_else(|| PortalError::not_found(format!("Appendix {id}"))),
    }
}

impl Portal {
    pub fn create_report(&self, ctx: &RequestContext, input: &NewReport) -> Result<Report, PortalError> {
        require_role(ctx, Role::Vendor)?;
        input.validate()?;
        let report = self.db.read(|conn| reports::insert_report(conn, input, codec::now()))?;
        info!(report_id = report.id, actor = ctx.actor(), "Created report");
        Ok(report)
    }

    pub fn update_report(
        &self,
        ctx: &RequestContext,
        id: i64,
        update: &ReportUpdate,
    ) -> Result<Report, PortalError> {
        require_role(ctx, Role::Vendor)?;
        update.validate()?;
        self.db
            .read(|conn| reports::update_report(conn, id, update, codec::now()))?
            .ok_or_else(|| PortalError::not_found(format!("Report {id}")))
    }

    pub fn list_reports(&self, ctx: &RequestContext) -> Result<Vec<Report>, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(reports::list_latest_reports)
    }

    pub fn full_report(&self, ctx: &RequestContext, id: i64) -> Result<FullReport, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| load_full_report(conn, id))
    }

    pub fn upsert_issue(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        input: &IssueInput,
    ) -> Result<Issue, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| upsert_issue_in(conn, report_id, input))
    }

    pub fn upsert_schedule_item(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        input: &ScheduleInput,
    ) -> Result<ScheduleItem, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| upsert_schedule_in(conn, report_id, input))
    }

    pub fn delete_schedule_item(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        id: i64,
    ) -> Result<(), PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| delete_schedule_in(conn, report_id, id))
    }

    pub fn upsert_financial(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        input: &FinancialInput,
    ) -> Result<Financial, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| upsert_financial_in(conn, report_id, input))
    }

    pub fn upsert_appendix(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        input: &AppendixInput,
    ) -> Result<Appendix, PortalError> {
        require_role(ctx, Role::Vendor)?;
        self.db.read(|conn| upsert_appendix_in(conn, report_id, input))
    }

    /// Mark the report closed. Whether closed reports still accept
    /// submissions is governed by [`WorkflowPolicy`](super::WorkflowPolicy).
    pub fn close_report(&self, ctx: &RequestContext, id: i64) -> Result<Report, PortalError> {
        require_role(ctx, Role::Vendor)?;
        let report = self.db.transaction(|tx| {
            if !reports::set_report_status(tx, id, ReportStatus::Closed, codec::now())? {
                return Err(PortalError::not_found(format!("Report {id}")));
            }
            require_report(tx, id)
        })?;
        info!(report_id = id, actor = ctx.actor(), "Closed report");
        Ok(report)
    }
}
