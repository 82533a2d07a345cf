//! Snapshot moderation.
//!
//! ```text
//! pending --approve--> approved --remove--> (deleted)
//! pending --deny-----> denied  --approve--> approved
//! ```

use tracing::info;

use super::Portal;
use crate::auth::{require_role, RequestContext};
use crate::db::{codec, snapshots};
use crate::errors::PortalError;
use crate::models::{Role, Signature, SignatureInput, SignatureMethod, Snapshot, SnapshotStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Deny,
    Remove,
}

impl ModerationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Deny => "deny",
            ModerationAction::Remove => "remove",
        }
    }
}

/// Outcome of a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(SnapshotStatus),
    Delete,
}

/// The moderation table. Approving twice is an error rather than a no-op.
pub fn transition(
    snapshot_id: i64,
    from: SnapshotStatus,
    action: ModerationAction,
) -> Result<Transition, PortalError> {
    use ModerationAction::*;
    use SnapshotStatus::*;

    match (from, action) {
        (Pending | Denied, Approve) => Ok(Transition::To(Approved)),
        (Approved, Approve) => Err(PortalError::AlreadyApproved(snapshot_id)),
        (Pending, Deny) => Ok(Transition::To(Denied)),
        (Approved, Remove) => Ok(Transition::Delete),
        (from, action) => Err(PortalError::InvalidStateTransition {
            from,
            action: action.as_str(),
        }),
    }
}

/// A drawn signature must be an inline `data:` URL; an uploaded one must
/// point somewhere.
pub fn validate_signature(input: &SignatureInput) -> Result<Signature, PortalError> {
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| PortalError::Validation("signature name is required".into()))?;

    let method = match input.method.as_deref().map(str::trim) {
        None | Some("") => return Err(PortalError::Validation("signature method is required".into())),
        Some("draw") => SignatureMethod::Draw,
        Some("upload") => SignatureMethod::Upload,
        Some(other) => {
            return Err(PortalError::Validation(format!(
                "signature method must be 'draw' or 'upload', got '{other}'"
            )))
        }
    };

    let url = match method {
        SignatureMethod::Draw => input
            .image_data_url
            .as_deref()
            .filter(|u| u.starts_with("data:"))
            .ok_or_else(|| {
                PortalError::Validation("a drawn signature needs an imageDataUrl".into())
            })?,
        SignatureMethod::Upload => input
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                PortalError::Validation("an uploaded signature needs an imageUrl".into())
            })?,
    };

    Ok(Signature {
        name: name.to_string(),
        method,
        url: url.to_string(),
    })
}

fn require_snapshot(conn: &rusqlite::Connection, id: i64) -> Result<Snapshot, PortalError> {
    snapshots::get_snapshot(conn, id)?.ok_or_else(|| PortalError::not_found(format!("Snapshot {id}")))
}

impl Portal {
    /// Approve a pending or denied snapshot, recording the signature and the
    /// approval time together.
    pub fn approve(
        &self,
        ctx: &RequestContext,
        snapshot_id: i64,
        signature: &SignatureInput,
    ) -> Result<Snapshot, PortalError> {
        require_role(ctx, Role::Admin)?;
        let signature = validate_signature(signature)?;

        let approved = self.db.transaction(|tx| {
            let snapshot = require_snapshot(tx, snapshot_id)?;
            transition(snapshot_id, snapshot.status, ModerationAction::Approve)?;
            if !snapshots::mark_approved(tx, snapshot_id, &signature, codec::now())? {
                return Err(PortalError::AlreadyApproved(snapshot_id));
            }
            require_snapshot(tx, snapshot_id)
        })?;

        info!(
            snapshot_id,
            report_id = approved.report_id,
            signer = %signature.name,
            method = signature.method.as_str(),
            actor = ctx.actor(),
            "Approved snapshot"
        );
        self.notify_all(
            self.vendor_recipients(),
            "Report snapshot approved",
            &format!("Snapshot {snapshot_id} of report {} is now public.", approved.report_id),
            &format!("/public/snapshots/{snapshot_id}"),
        );
        Ok(approved)
    }

    /// Deny a pending snapshot. Signature columns stay empty.
    pub fn deny(&self, ctx: &RequestContext, snapshot_id: i64) -> Result<Snapshot, PortalError> {
        require_role(ctx, Role::Admin)?;

        let denied = self.db.transaction(|tx| {
            let snapshot = require_snapshot(tx, snapshot_id)?;
            transition(snapshot_id, snapshot.status, ModerationAction::Deny)?;
            if !snapshots::mark_denied(tx, snapshot_id)? {
                return Err(PortalError::InvalidStateTransition {
                    from: snapshot.status,
                    action: ModerationAction::Deny.as_str(),
                });
            }
            require_snapshot(tx, snapshot_id)
        })?;

        info!(snapshot_id, report_id = denied.report_id, actor = ctx.actor(), "Denied snapshot");
        self.notify_all(
            self.vendor_recipients(),
            "Report snapshot denied",
            &format!("Snapshot {snapshot_id} of report {} was denied.", denied.report_id),
            &format!("/reports/{}", denied.report_id),
        );
        Ok(denied)
    }

    /// Retract an approved snapshot from public view by deleting it.
    pub fn remove(&self, ctx: &RequestContext, snapshot_id: i64) -> Result<(), PortalError> {
        require_role(ctx, Role::Admin)?;

        let report_id = self.db.transaction(|tx| {
            let snapshot = require_snapshot(tx, snapshot_id)?;
            transition(snapshot_id, snapshot.status, ModerationAction::Remove)?;
            if !snapshots::delete_approved(tx, snapshot_id)? {
                return Err(PortalError::InvalidStateTransition {
                    from: snapshot.status,
                    action: ModerationAction::Remove.as_str(),
                });
            }
            Ok(snapshot.report_id)
        })?;

        info!(snapshot_id, report_id, actor = ctx.actor(), "Removed approved snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(name: &str) -> SignatureInput {
        SignatureInput {
            name: Some(name.into()),
            method: Some("draw".into()),
            image_url: None,
            image_data_url: Some("data:image/png;base64,iVBORw0KGgo=".into()),
        }
    }

    #[test]
    fn test_transition_table() {
        use ModerationAction::*;
        use SnapshotStatus::*;

        assert_eq!(transition(1, Pending, Approve).unwrap(), Transition::To(Approved));
        assert_eq!(transition(1, Denied, Approve).unwrap(), Transition::To(Approved));
        assert_eq!(transition(1, Pending, Deny).unwrap(), Transition::To(Denied));
        assert_eq!(transition(1, Approved, Remove).unwrap(), Transition::Delete);

        assert!(matches!(transition(9, Approved, Approve), Err(PortalError::AlreadyApproved(9))));
        for (from, action) in [(Denied, Deny), (Approved, Deny), (Pending, Remove), (Denied, Remove)] {
            let err = transition(1, from, action).unwrap_err();
            assert!(
                matches!(err, PortalError::InvalidStateTransition { .. }),
                "{from} + {} should be rejected",
                action.as_str()
            );
        }
    }

    #[test]
    fn test_validate_drawn_signature() {
        let signature = validate_signature(&drawn(" Jane Doe ")).unwrap();
        assert_eq!(signature.name, "Jane Doe");
        assert_eq!(signature.method, SignatureMethod::Draw);
        assert!(signature.url.starts_with("data:"));
    }

    #[test]
    fn test_validate_rejects_missing_parts() {
        let mut no_name = drawn("x");
        no_name.name = Some("   ".into());
        assert!(validate_signature(&no_name).is_err());

        let mut no_method = drawn("Jane");
        no_method.method = None;
        assert!(validate_signature(&no_method).unwrap_err().to_string().contains("method is required"));

        let mut bad_method = drawn("Jane");
        bad_method.method = Some("stamp".into());
        assert!(validate_signature(&bad_method).is_err());
    }

    #[test]
    fn test_validate_rejects_method_image_mismatch() {
        let upload_with_data_url = SignatureInput {
            name: Some("Jane".into()),
            method: Some("upload".into()),
            image_url: None,
            image_data_url: Some("data:image/png;base64,AA==".into()),
        };
        assert!(matches!(validate_signature(&upload_with_data_url), Err(PortalError::Validation(_))));

        let draw_with_url = SignatureInput {
            name: Some("Jane".into()),
            method: Some("draw".into()),
            image_url: Some("https://cdn.example.gov/sig.png".into()),
            image_data_url: None,
        };
        assert!(validate_signature(&draw_with_url).is_err());

        let upload = SignatureInput {
            name: Some("Jane".into()),
            method: Some("upload".into()),
            image_url: Some("https://cdn.example.gov/sig.png".into()),
            image_data_url: None,
        };
        assert_eq!(validate_signature(&upload).unwrap().method, SignatureMethod::Upload);
    }
}
