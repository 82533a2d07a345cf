use tracing::info;
use uuid::Uuid;

use crate::db::{codec, users, Database};
use crate::errors::PortalError;
use crate::models::{CurrentUser, Role, User};

/// Bearer tokens are opaque random strings with a recognizable prefix.
pub fn generate_token() -> String {
    format!("ivv_{}", Uuid::new_v4().simple())
}

/// Create a user and return it with its freshly issued token. The token is
/// only ever shown here.
pub fn register_user(db: &Database, email: &str, role: Role) -> Result<(User, String), PortalError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(PortalError::Validation(format!("'{email}' is not an email address")));
    }
    let token = generate_token();
    let user = db.read(|conn| users::insert_user(conn, &email, role, &token, codec::now()))?;
    info!(user_id = user.id, email = %user.email, role = %user.role, "Registered user");
    Ok((user, token))
}

pub fn resolve_token(db: &Database, token: &str) -> Result<CurrentUser, PortalError> {
    db.read(|conn| users::find_by_token(conn, token))?
        .ok_or_else(|| PortalError::Authentication("Invalid API token".into()))
}
