//! Database schema, models and queries

pub mod cages;
pub mod init;
pub mod laboratories;
pub mod mice;
pub mod models;
pub mod strains;
pub mod users;

pub use init::*;
pub use models::*;

use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

/// Parse a `guid` column value
pub(crate) fn parse_guid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| Error::Internal(format!("Corrupt guid '{}': {}", value, e)))
}

pub(crate) fn parse_opt_guid(value: Option<String>) -> Result<Option<Uuid>> {
    value.as_deref().map(parse_guid).transpose()
}

/// Delete every mouse, cage and strain
///
/// Children first so the wipe does not depend on cascade behavior.
pub async fn wipe_colony(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    let mice = sqlx::query("DELETE FROM mice").execute(&mut *tx).await?;
    let cages = sqlx::query("DELETE FROM cages").execute(&mut *tx).await?;
    let strains = sqlx::query("DELETE FROM strains").execute(&mut *tx).await?;
    tx.commit().await?;

    info!(
        "Wiped colony data: {} mouse rows, {} cages, {} strains",
        mice.rows_affected(),
        cages.rows_affected(),
        strains.rows_affected()
    );
    Ok(())
}

/// Delete colony data plus every account and laboratory
pub async fn wipe_all(pool: &SqlitePool) -> Result<()> {
    wipe_colony(pool).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM user_laboratories").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM laboratories").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
    tx.commit().await?;

    info!("Wiped accounts and laboratories");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_wipe_colony_keeps_users() {
        let pool = init_memory_database().await.unwrap();
        let user = users::create_password_user(&pool, "a@lab.com", "pw", "A", Role::User)
            .await
            .unwrap();
        let strain = strains::create_strain(&pool, "NAT10", None, None).await.unwrap();
        let cage = cages::create_cage(
            &pool,
            strain.id,
            &NewCage {
                cage_number: "A1".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        mice::create_mouse(&pool, cage.id, &NewMouse::default()).await.unwrap();

        wipe_colony(&pool).await.unwrap();

        let counts: (i64, i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM strains), (SELECT COUNT(*) FROM cages), (SELECT COUNT(*) FROM mice)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(counts, (0, 0, 0));
        assert!(users::find_by_email(&pool, "a@lab.com").await.unwrap().is_some());
        assert_eq!(user.email.as_deref(), Some("a@lab.com"));
    }

    #[tokio::test]
    async fn test_wipe_all_removes_accounts() {
        let pool = init_memory_database().await.unwrap();
        users::create_password_user(&pool, "a@lab.com", "pw", "A", Role::Admin)
            .await
            .unwrap();
        laboratories::create_laboratory(&pool, "Lab", None).await.unwrap();

        wipe_all(&pool).await.unwrap();

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        let labs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM laboratories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((users, labs), (0, 0));
    }
}
