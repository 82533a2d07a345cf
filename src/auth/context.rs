use crate::errors::PortalError;
use crate::models::{CurrentUser, Role};

/// Who is calling. Passed explicitly into every workflow operation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<CurrentUser>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn for_user(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// Label for log lines.
    pub fn actor(&self) -> &str {
        self.user.as_ref().map_or("anonymous", |u| u.email.as_str())
    }
}

/// Guard for the top of role-gated operations. Higher roles satisfy lower
/// requirements.
pub fn require_role(ctx: &RequestContext, role: Role) -> Result<&CurrentUser, PortalError> {
    let user = ctx
        .user
        .as_ref()
        .ok_or_else(|| PortalError::Authentication("sign-in required".into()))?;
    if user.role < role {
        return Err(PortalError::Permission(format!(
            "{} role required, signed in as {}",
            role, user.role
        )));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> RequestContext {
        RequestContext::for_user(CurrentUser { id: 1, email: "u@ets.gov".into(), role })
    }

    #[test]
    fn test_anonymous_needs_sign_in() {
        let err = require_role(&RequestContext::anonymous(), Role::Vendor).unwrap_err();
        assert!(matches!(err, PortalError::Authentication(_)));
        assert_eq!(RequestContext::anonymous().actor(), "anonymous");
    }

    #[test]
    fn test_vendor_cannot_moderate() {
        let err = require_role(&ctx(Role::Vendor), Role::Admin).unwrap_err();
        assert!(matches!(err, PortalError::Permission(_)));
    }

    #[test]
    fn test_admin_can_edit_drafts() {
        let admin = ctx(Role::Admin);
        let user = require_role(&admin, Role::Vendor).unwrap();
        assert_eq!(user.email, "u@ets.gov");
    }

    #[test]
    fn test_public_role_cannot_edit() {
        assert!(require_role(&ctx(Role::Public), Role::Vendor).is_err());
    }
}
