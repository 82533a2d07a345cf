use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::codec::{enum_from_row, ts_from_row, ts_to_sql};
use crate::errors::PortalError;
use crate::models::{CurrentUser, Role, User};

pub fn insert_user(
    conn: &Connection,
    email: &str,
    role: Role,
    api_token: &str,
    now: DateTime<Utc>,
) -> Result<User, PortalError> {
    conn.execute(
        "INSERT INTO users (email, role, api_token, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![email, role.as_str(), api_token, ts_to_sql(&now)],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            PortalError::Validation(format!("user '{email}' already exists"))
        }
        other => other.into(),
    })?;
    Ok(User {
        id: conn.last_insert_rowid(),
        email: email.to_string(),
        role,
        created_at: now,
    })
}

pub fn find_by_token(conn: &Connection, api_token: &str) -> Result<Option<CurrentUser>, PortalError> {
    Ok(conn
        .query_row(
            "SELECT id, email, role FROM users WHERE api_token = ?1",
            params![api_token],
            |row| {
                Ok(CurrentUser {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    role: enum_from_row(row, 2)?,
                })
            },
        )
        .optional()?)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, PortalError> {
    let mut stmt = conn.prepare("SELECT id, email, role, created_at FROM users ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            role: enum_from_row(row, 2)?,
            created_at: ts_from_row(row, 3)?,
        })
    })?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn emails_with_role(conn: &Connection, role: Role) -> Result<Vec<String>, PortalError> {
    let mut stmt = conn.prepare("SELECT email FROM users WHERE role = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![role.as_str()], |row| row.get::<_, String>(0))?;
    let mut emails = Vec::new();
    for row in rows {
        emails.push(row?);
    }
    Ok(emails)
}
