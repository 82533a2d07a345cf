//! Visibility rules: the public only ever sees approved snapshots, reviewers
//! see everything.

use super::store::require_report;
use super::Portal;
use crate::auth::{require_role, RequestContext};
use crate::db::snapshots::{self, SnapshotFilter};
use crate::db::reports;
use crate::errors::PortalError;
use crate::models::{Report, ReviewSnapshot, Role, Snapshot, SnapshotDetail, SnapshotStatus};

/// Which snapshots of a report to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotScope {
    #[default]
    Approved,
    /// Every status; reviewers only.
    All,
}

impl std::str::FromStr for SnapshotScope {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "all" => Ok(Self::All),
            other => Err(PortalError::Validation(format!(
                "scope must be 'approved' or 'all', got '{other}'"
            ))),
        }
    }
}

impl Portal {
    /// Latest reports with at least one approved snapshot, newest first.
    pub fn list_public_reports(&self) -> Result<Vec<Report>, PortalError> {
        self.db.read(reports::list_public_reports)
    }

    /// Approved snapshots of a report, newest first. The head of the list is
    /// the current public view.
    pub fn approved_snapshots(&self, report_id: i64) -> Result<Vec<Snapshot>, PortalError> {
        self.db.read(|conn| {
            require_report(conn, report_id)?;
            snapshots::list_for_report(conn, report_id, Some(SnapshotStatus::Approved))
        })
    }

    pub fn current_public_snapshot(&self, report_id: i64) -> Result<Option<Snapshot>, PortalError> {
        Ok(self.approved_snapshots(report_id)?.into_iter().next())
    }

    /// A single approved snapshot. Anything else reads as missing.
    pub fn public_snapshot(&self, snapshot_id: i64) -> Result<SnapshotDetail, PortalError> {
        let review = self
            .db
            .read(|conn| snapshots::get_for_review(conn, snapshot_id))?
            .filter(|r| r.snapshot.status == SnapshotStatus::Approved)
            .ok_or_else(|| PortalError::not_found(format!("Snapshot {snapshot_id}")))?;
        SnapshotDetail::decode(review)
    }

    pub fn snapshots_for_report(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        scope: SnapshotScope,
    ) -> Result<Vec<Snapshot>, PortalError> {
        match scope {
            SnapshotScope::Approved => self.approved_snapshots(report_id),
            SnapshotScope::All => {
                require_role(ctx, Role::Admin)?;
                self.db.read(|conn| {
                    require_report(conn, report_id)?;
                    snapshots::list_for_report(conn, report_id, None)
                })
            }
        }
    }

    /// Snapshots of any status with their report context, newest first.
    pub fn review_snapshots(
        &self,
        ctx: &RequestContext,
        filter: &SnapshotFilter,
    ) -> Result<Vec<ReviewSnapshot>, PortalError> {
        require_role(ctx, Role::Admin)?;
        self.db.read(|conn| snapshots::list_for_review(conn, filter))
    }

    pub fn review_snapshot(&self, ctx: &RequestContext, snapshot_id: i64) -> Result<SnapshotDetail, PortalError> {
        require_role(ctx, Role::Admin)?;
        let review = self
            .db
            .read(|conn| snapshots::get_for_review(conn, snapshot_id))?
            .ok_or_else(|| PortalError::not_found(format!("Snapshot {snapshot_id}")))?;
        SnapshotDetail::decode(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{CurrentUser, NewReport, SignatureInput};
    use crate::notify::Dispatcher;
    use crate::workflow::WorkflowPolicy;
    use chrono::NaiveDate;

    fn ctx(role: Role) -> RequestContext {
        RequestContext::for_user(CurrentUser { id: 1, email: format!("{role}@ets.gov"), role })
    }

    fn portal() -> Portal {
        let (dispatcher, _rx) = Dispatcher::channel();
        Portal::new(Database::in_memory().unwrap(), dispatcher, WorkflowPolicy::default())
    }

    fn report(portal: &Portal, name: &str) -> i64 {
        portal
            .create_report(
                &ctx(Role::Vendor),
                &NewReport {
                    name: name.into(),
                    department: "ETS".into(),
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                },
            )
            .unwrap()
            .id
    }

    fn signature() -> SignatureInput {
        SignatureInput {
            name: Some("Jane Doe".into()),
            method: Some("upload".into()),
            image_url: Some("https://cdn.example.gov/jane.png".into()),
            image_data_url: None,
        }
    }

    #[test]
    fn test_unreviewed_reports_stay_private() {
        let portal = portal();
        let hidden = report(&portal, "Hidden");
        let shown = report(&portal, "Shown");
        let pending = portal.submit(&ctx(Role::Vendor), hidden).unwrap();
        let denied = portal.submit(&ctx(Role::Vendor), hidden).unwrap();
        portal.deny(&ctx(Role::Admin), denied.snapshot_id).unwrap();
        let approved = portal.submit(&ctx(Role::Vendor), shown).unwrap();
        portal.approve(&ctx(Role::Admin), approved.snapshot_id, &signature()).unwrap();

        let public: Vec<_> = portal.list_public_reports().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(public, vec![shown]);
        assert!(matches!(portal.public_snapshot(pending.snapshot_id), Err(PortalError::NotFound(_))));
        assert!(portal.approved_snapshots(hidden).unwrap().is_empty());
        assert!(portal.current_public_snapshot(hidden).unwrap().is_none());
    }

    #[test]
    fn test_scope_all_needs_admin() {
        let portal = portal();
        let id = report(&portal, "R1");
        portal.submit(&ctx(Role::Vendor), id).unwrap();

        assert!(portal.snapshots_for_report(&ctx(Role::Vendor), id, SnapshotScope::Approved).unwrap().is_empty());
        assert!(matches!(
            portal.snapshots_for_report(&ctx(Role::Vendor), id, SnapshotScope::All),
            Err(PortalError::Permission(_))
        ));
        assert_eq!(portal.snapshots_for_report(&ctx(Role::Admin), id, SnapshotScope::All).unwrap().len(), 1);
    }

    #[test]
    fn test_review_detail_decodes_payload() {
        let portal = portal();
        let id = report(&portal, "R1");
        let receipt = portal.submit(&ctx(Role::Vendor), id).unwrap();
        let detail = portal.review_snapshot(&ctx(Role::Admin), receipt.snapshot_id).unwrap();
        assert_eq!(detail.review.report_name, "R1");
        assert_eq!(detail.payload.name, "R1");
        assert!(matches!(
            portal.review_snapshot(&RequestContext::anonymous(), receipt.snapshot_id),
            Err(PortalError::Authentication(_))
        ));
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!("all".parse::<SnapshotScope>().unwrap(), SnapshotScope::All);
        assert_eq!("approved".parse::<SnapshotScope>().unwrap(), SnapshotScope::Approved);
        assert!(matches!("pending".parse::<SnapshotScope>(), Err(PortalError::Validation(_))));
    }

    #[test]
    fn test_approved_snapshots_unknown_report() {
        assert!(matches!(portal().approved_snapshots(5), Err(PortalError::NotFound(_))));
    }
}
