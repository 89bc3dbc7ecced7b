//! User account persistence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_guid, Role, User};
use crate::password::{generate_salt, hash_password};
use crate::{Error, Result};

/// Display name given to accounts created through WeChat login
pub const WECHAT_DEFAULT_NAME: &str = "微信用户";

/// Stored credentials for an email account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: Option<String>,
    pub password_salt: Option<String>,
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: parse_guid(row.get::<&str, _>("guid"))?,
        email: row.get("email"),
        name: row.get("name"),
        role: row.get::<&str, _>("role").parse()?,
    })
}

/// Create an email/password account
///
/// Returns [`Error::Conflict`] if the email is taken.
pub async fn create_password_user(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    name: &str,
    role: Role,
) -> Result<User> {
    let user = User {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
        name: name.to_string(),
        role,
    };
    let salt = generate_salt();
    let hash = hash_password(password, &salt);

    sqlx::query(
        r#"
        INSERT INTO users (guid, email, name, password_hash, password_salt, role)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(email)
    .bind(name)
    .bind(hash)
    .bind(salt)
    .bind(role.as_str())
    .execute(pool)
    .await
    .map_err(|e| Error::from_insert(e, format!("User {} already exists", email)))?;

    Ok(user)
}

/// Look up an account and its credentials by email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        "SELECT guid, email, name, role, password_hash, password_salt FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.get("password_hash"),
            password_salt: row.get("password_salt"),
        })
    })
    .transpose()
}

pub async fn find_by_openid(pool: &SqlitePool, openid: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT guid, email, name, role FROM users WHERE openid = ?")
        .bind(openid)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Find the account bound to a WeChat openid, creating it on first login
pub async fn find_or_create_by_openid(pool: &SqlitePool, openid: &str) -> Result<User> {
    if let Some(user) = find_by_openid(pool, openid).await? {
        return Ok(user);
    }

    let user = User {
        id: Uuid::new_v4(),
        email: None,
        name: WECHAT_DEFAULT_NAME.to_string(),
        role: Role::User,
    };

    let inserted = sqlx::query("INSERT INTO users (guid, openid, name, role) VALUES (?, ?, ?, ?)")
        .bind(user.id.to_string())
        .bind(openid)
        .bind(&user.name)
        .bind(user.role.as_str())
        .execute(pool)
        .await;

    match inserted {
        Ok(_) => Ok(user),
        // Lost a race with a concurrent first login for the same openid
        Err(e) => match Error::from_insert(e, "openid") {
            Error::Conflict(_) => find_by_openid(pool, openid)
                .await?
                .ok_or_else(|| Error::Internal(format!("User for openid {} vanished", openid))),
            other => Err(other),
        },
    }
}
