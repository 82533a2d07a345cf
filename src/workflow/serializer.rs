//! Freezing a draft into a pending snapshot.
//!
//! A submission may carry the form's batched edits. They are applied in a
//! fixed order inside one transaction, so a failing step leaves the draft
//! exactly as it was.

use serde::Deserialize;
use tracing::{debug, info};

use super::store::{
    delete_schedule_in, load_full_report, require_report, upsert_appendix_in, upsert_financial_in,
    upsert_issue_in, upsert_schedule_in,
};
use super::Portal;
use crate::auth::{require_role, RequestContext};
use crate::db::{codec, reports, snapshots};
use crate::errors::PortalError;
use crate::models::{
    AppendixInput, FinancialInput, IssueInput, ReportStatus, Role, ScheduleInput, SnapshotPayload,
    SnapshotReceipt,
};

/// Phases of a submission, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStep {
    DeleteMilestones,
    Issues,
    Schedule,
    Financials,
    Appendix,
    Snapshot,
}

impl std::fmt::Display for SubmitStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SubmitStep::DeleteMilestones => "deleting milestones",
            SubmitStep::Issues => "saving issues",
            SubmitStep::Schedule => "saving schedule",
            SubmitStep::Financials => "saving financials",
            SubmitStep::Appendix => "saving appendix",
            SubmitStep::Snapshot => "creating snapshot",
        })
    }
}

/// Pending form edits sent along with a submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftSubmission {
    pub deleted_schedule_ids: Vec<i64>,
    pub issues: Vec<IssueInput>,
    pub schedule_scope: Vec<ScheduleInput>,
    pub financials: Option<FinancialInput>,
    pub appendix: Option<AppendixInput>,
}

impl DraftSubmission {
    pub fn is_empty(&self) -> bool {
        self.deleted_schedule_ids.is_empty()
            && self.issues.is_empty()
            && self.schedule_scope.is_empty()
            && self.financials.is_none()
            && self.appendix.is_none()
    }

    /// Input checks that need no database, run before the transaction opens.
    fn validate(&self) -> Result<(), PortalError> {
        for issue in &self.issues {
            issue.validate().map_err(|e| e.in_step(SubmitStep::Issues))?;
        }
        let today = codec::now().date_naive();
        for item in &self.schedule_scope {
            item.validate()
                .and_then(|_| item.resolve_target_date(today).map(|_| ()))
                .map_err(|e| e.in_step(SubmitStep::Schedule))?;
        }
        if let Some(financials) = &self.financials {
            financials.validate().map_err(|e| e.in_step(SubmitStep::Financials))?;
        }
        Ok(())
    }
}

impl Portal {
    /// Snapshot the draft as it currently stands.
    pub fn submit(&self, ctx: &RequestContext, report_id: i64) -> Result<SnapshotReceipt, PortalError> {
        self.submit_draft(ctx, report_id, &DraftSubmission::default())
    }

    /// Apply `draft` and snapshot the result, all or nothing. Deletions run
    /// before upserts so a milestone removed on the form cannot come back
    /// under a stale id.
    pub fn submit_draft(
        &self,
        ctx: &RequestContext,
        report_id: i64,
        draft: &DraftSubmission,
    ) -> Result<SnapshotReceipt, PortalError> {
        require_role(ctx, Role::Vendor)?;
        draft.validate()?;

        let allow_closed = self.policy.allow_submit_when_closed;
        let snapshot = self.db.transaction(|tx| {
            let report = require_report(tx, report_id)?;
            if report.status == ReportStatus::Closed && !allow_closed {
                return Err(PortalError::ReportClosed(report_id));
            }

            for &id in &draft.deleted_schedule_ids {
                delete_schedule_in(tx, report_id, id).map_err(|e| e.in_step(SubmitStep::DeleteMilestones))?;
            }
            for issue in &draft.issues {
                upsert_issue_in(tx, report_id, issue).map_err(|e| e.in_step(SubmitStep::Issues))?;
            }
            for item in &draft.schedule_scope {
                // A milestone deleted on the form may still be re-sent under its old id.
                if let Some(id) = item.id.filter(|id| draft.deleted_schedule_ids.contains(id)) {
                    debug!(report_id, milestone_id = id, "Skipping upsert of deleted milestone");
                    continue;
                }
                upsert_schedule_in(tx, report_id, item).map_err(|e| e.in_step(SubmitStep::Schedule))?;
            }
            if let Some(financials) = &draft.financials {
                upsert_financial_in(tx, report_id, financials)
                    .map_err(|e| e.in_step(SubmitStep::Financials))?;
            }
            if let Some(appendix) = &draft.appendix {
                upsert_appendix_in(tx, report_id, appendix).map_err(|e| e.in_step(SubmitStep::Appendix))?;
            }

            let submitted_at = codec::now();
            let capture = || -> Result<_, PortalError> {
                let full = load_full_report(tx, report_id)?;
                let payload = SnapshotPayload::capture(&full, submitted_at);
                let snapshot = snapshots::insert_snapshot(
                    tx,
                    report_id,
                    &payload.encode()?,
                    payload.schema_version,
                    submitted_at,
                )?;
                reports::touch_report(tx, report_id, submitted_at)?;
                Ok(snapshot)
            };
            capture().map_err(|e| e.in_step(SubmitStep::Snapshot))
        })?;

        info!(
            report_id,
            snapshot_id = snapshot.id,
            actor = ctx.actor(),
            edits = !draft.is_empty(),
            "Submitted report for review"
        );

        self.notify_all(
            self.recipients_with_role(Role::Admin),
            "Report snapshot awaiting review",
            &format!("A new snapshot of report {report_id} was submitted for approval."),
            &format!("/review/snapshots/{}", snapshot.id),
        );

        Ok(SnapshotReceipt {
            snapshot_id: snapshot.id,
            status: snapshot.status,
            created_at: snapshot.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::register_user;
    use crate::db::Database;
    use crate::models::{CurrentUser, NewReport, RiskLevel, SnapshotStatus};
    use crate::notify::{Dispatcher, Notification};
    use crate::workflow::WorkflowPolicy;
    use chrono::NaiveDate;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn setup(policy: WorkflowPolicy) -> (Portal, UnboundedReceiver<Notification>, RequestContext) {
        let db = Database::in_memory().unwrap();
        let (dispatcher, rx) = Dispatcher::channel();
        let portal = Portal::new(db, dispatcher, policy);
        let vendor = RequestContext::for_user(CurrentUser {
            id: 1,
            email: "vendor@acme.com".into(),
            role: Role::Vendor,
        });
        (portal, rx, vendor)
    }

    fn create(portal: &Portal, ctx: &RequestContext) -> i64 {
        portal
            .create_report(
                ctx,
                &NewReport {
                    name: "R1".into(),
                    department: "ETS".into(),
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                },
            )
            .unwrap()
            .id
    }

    fn milestone(id: Option<i64>, task: &str) -> ScheduleInput {
        ScheduleInput {
            id,
            task: task.into(),
            target_date: Some("2025-06-30".into()),
            completion_percent: Some(50.0),
            notes: None,
        }
    }

    #[test]
    fn test_submit_creates_pending_snapshot() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        let receipt = portal.submit(&vendor, id).unwrap();
        assert_eq!(receipt.status, SnapshotStatus::Pending);

        let snapshot = portal.db().read(|c| snapshots::get_snapshot(c, receipt.snapshot_id)).unwrap().unwrap();
        let payload = snapshot.payload().unwrap();
        assert_eq!(payload.id, id);
        assert_eq!(payload.submitted_at, receipt.created_at);
    }

    #[test]
    fn test_submit_missing_report() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        assert!(matches!(portal.submit(&vendor, 42), Err(PortalError::NotFound(_))));
    }

    #[test]
    fn test_submit_twice_creates_two_snapshots() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        let a = portal.submit(&vendor, id).unwrap();
        let b = portal.submit(&vendor, id).unwrap();
        assert_ne!(a.snapshot_id, b.snapshot_id);
    }

    #[test]
    fn test_failed_step_rolls_back_everything() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        let kept = portal.upsert_schedule_item(&vendor, id, &milestone(None, "Design")).unwrap();

        let draft = DraftSubmission {
            deleted_schedule_ids: vec![kept.id],
            issues: vec![IssueInput {
                id: Some(999),
                description: "Stale".into(),
                start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                impact: RiskLevel::Low,
                likelihood: RiskLevel::Low,
                overall_risk: None,
                recommendation: None,
                status: Default::default(),
            }],
            ..Default::default()
        };
        let err = portal.submit_draft(&vendor, id, &draft).unwrap_err();
        match &err {
            PortalError::Submission { step, source } => {
                assert_eq!(*step, SubmitStep::Issues);
                assert!(matches!(**source, PortalError::NotFound(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Submission failed while saving issues"));

        let full = portal.full_report(&vendor, id).unwrap();
        assert_eq!(full.schedule_scope.len(), 1, "deletion must be rolled back");
        let count = portal
            .db()
            .read(|c| snapshots::list_for_report(c, id, None))
            .unwrap()
            .len();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_deleted_milestone_resent_with_stale_id_is_skipped() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        let removed = portal.upsert_schedule_item(&vendor, id, &milestone(None, "Design")).unwrap();

        let draft = DraftSubmission {
            deleted_schedule_ids: vec![removed.id],
            schedule_scope: vec![milestone(Some(removed.id), "Design"), milestone(None, "Build")],
            ..Default::default()
        };
        let receipt = portal.submit_draft(&vendor, id, &draft).unwrap();

        let scope = portal.full_report(&vendor, id).unwrap().schedule_scope;
        assert_eq!(scope.len(), 1);
        assert_eq!(scope[0].task, "Build");
        assert_ne!(scope[0].id, removed.id);

        let snapshot = portal.db().read(|c| snapshots::get_snapshot(c, receipt.snapshot_id)).unwrap().unwrap();
        assert_eq!(snapshot.payload().unwrap().schedule_scope, scope);
    }

    #[test]
    fn test_invalid_percent_rejected_before_transaction() {
        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        let mut bad = milestone(None, "UAT");
        bad.completion_percent = Some(101.0);
        let draft = DraftSubmission { schedule_scope: vec![bad], ..Default::default() };
        let err = portal.submit_draft(&vendor, id, &draft).unwrap_err();
        assert!(matches!(err.root(), PortalError::Validation(_)));
        assert!(matches!(err, PortalError::Submission { step: SubmitStep::Schedule, .. }));
    }

    #[test]
    fn test_closed_report_policy() {
        let policy = WorkflowPolicy { allow_submit_when_closed: false, ..Default::default() };
        let (portal, _rx, vendor) = setup(policy);
        let id = create(&portal, &vendor);
        portal.close_report(&vendor, id).unwrap();
        assert!(matches!(portal.submit(&vendor, id), Err(PortalError::ReportClosed(_))));

        let (portal, _rx, vendor) = setup(WorkflowPolicy::default());
        let id = create(&portal, &vendor);
        portal.close_report(&vendor, id).unwrap();
        assert!(portal.submit(&vendor, id).is_ok());
    }

    #[test]
    fn test_submit_notifies_each_admin() {
        let (portal, mut rx, vendor) = setup(WorkflowPolicy::default());
        register_user(portal.db(), "a1@ets.gov", Role::Admin).unwrap();
        register_user(portal.db(), "a2@ets.gov", Role::Admin).unwrap();
        register_user(portal.db(), "v@acme.com", Role::Vendor).unwrap();
        let id = create(&portal, &vendor);
        let receipt = portal.submit(&vendor, id).unwrap();

        let mut recipients = vec![rx.try_recv().unwrap(), rx.try_recv().unwrap()];
        assert!(rx.try_recv().is_err());
        recipients.sort_by(|a, b| a.recipient.cmp(&b.recipient));
        assert_eq!(recipients[0].recipient, "a1@ets.gov");
        assert_eq!(
            recipients[1].url.as_deref(),
            Some(format!("/review/snapshots/{}", receipt.snapshot_id).as_str())
        );
    }

    #[test]
    fn test_draft_body_defaults() {
        let draft: DraftSubmission = serde_json::from_str("{}").unwrap();
        assert!(draft.is_empty());
        let draft: DraftSubmission =
            serde_json::from_str(r#"{"deletedScheduleIds":[3],"appendix":{"content":"x"}}"#).unwrap();
        assert_eq!(draft.deleted_schedule_ids, vec![3]);
        assert!(!draft.is_empty());
    }
}
