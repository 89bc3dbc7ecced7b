//! Default accounts
//!
//! `seed_database` resets the database to a default laboratory with one
//! administrator and one regular member. `ensure_admin` only adds the
//! administrator if missing; the spreadsheet import uses it so imported
//! data always has someone able to log in.

use colony_common::db::{self, laboratories, users, LabRole, Role, User};
use colony_common::Result;
use sqlx::SqlitePool;
use tracing::info;

pub const ADMIN_EMAIL: &str = "admin@lab.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_NAME: &str = "管理员";

pub const MEMBER_EMAIL: &str = "user@lab.com";
pub const MEMBER_PASSWORD: &str = "user123";
pub const MEMBER_NAME: &str = "实验员";

pub const DEFAULT_LAB_NAME: &str = "默认实验室";
pub const DEFAULT_LAB_DESCRIPTION: &str = "系统默认创建的实验室";

/// Accounts created by [`seed_database`]
#[derive(Debug, Clone)]
pub struct SeedResult {
    pub admin: User,
    pub member: User,
}

/// Wipe everything and create the default laboratory and accounts
pub async fn seed_database(pool: &SqlitePool) -> Result<SeedResult> {
    db::wipe_all(pool).await?;

    let lab = laboratories::create_laboratory(pool, DEFAULT_LAB_NAME, Some(DEFAULT_LAB_DESCRIPTION)).await?;

    let admin = users::create_password_user(pool, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_NAME, Role::Admin).await?;
    laboratories::add_member(pool, admin.id, lab.id, LabRole::Admin).await?;

    let member =
        users::create_password_user(pool, MEMBER_EMAIL, MEMBER_PASSWORD, MEMBER_NAME, Role::User).await?;
    laboratories::add_member(pool, member.id, lab.id, LabRole::Member).await?;

    info!("Database seeded");
    info!("Administrator: {} / {}", ADMIN_EMAIL, ADMIN_PASSWORD);
    info!("Member:        {} / {}", MEMBER_EMAIL, MEMBER_PASSWORD);

    Ok(SeedResult { admin, member })
}

/// Create the administrator account unless it already exists
pub async fn ensure_admin(pool: &SqlitePool) -> Result<User> {
    if let Some(existing) = users::find_by_email(pool, ADMIN_EMAIL).await? {
        return Ok(existing.user);
    }

    let admin = users::create_password_user(pool, ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_NAME, Role::Admin).await?;
    info!("Created administrator account: {} / {}", ADMIN_EMAIL, ADMIN_PASSWORD);
    Ok(admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_common::db::init_memory_database;

    #[tokio::test]
    async fn test_seed_creates_lab_and_accounts() {
        let pool = init_memory_database().await.unwrap();
        let seeded = seed_database(&pool).await.unwrap();

        assert_eq!(seeded.admin.role, Role::Admin);
        assert_eq!(seeded.member.role, Role::User);

        let lab = laboratories::primary_laboratory(&pool, seeded.member.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lab.name, DEFAULT_LAB_NAME);
    }

    #[tokio::test]
    async fn test_seed_twice_resets() {
        let pool = init_memory_database().await.unwrap();
        seed_database(&pool).await.unwrap();
        seed_database(&pool).await.expect("reseeding must not conflict");

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 2);
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        let first = ensure_admin(&pool).await.unwrap();
        let second = ensure_admin(&pool).await.unwrap();
        assert_eq!(first.id, second.id);
    }
}
