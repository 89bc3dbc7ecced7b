//! Laboratory persistence and membership

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_guid, LabRole, Laboratory};
use crate::{Error, Result};

pub async fn create_laboratory(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<Laboratory> {
    let lab = Laboratory {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: description.map(str::to_string),
    };

    sqlx::query("INSERT INTO laboratories (guid, name, description) VALUES (?, ?, ?)")
        .bind(lab.id.to_string())
        .bind(&lab.name)
        .bind(&lab.description)
        .execute(pool)
        .await?;

    Ok(lab)
}

pub async fn load_laboratory(pool: &SqlitePool, id: Uuid) -> Result<Option<Laboratory>> {
    let row = sqlx::query("SELECT guid, name, description FROM laboratories WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.map(|row| {
        Ok(Laboratory {
            id: parse_guid(row.get::<&str, _>("guid"))?,
            name: row.get("name"),
            description: row.get("description"),
        })
    })
    .transpose()
}

/// Add a user to a laboratory
pub async fn add_member(pool: &SqlitePool, user_id: Uuid, lab_id: Uuid, role: LabRole) -> Result<()> {
    sqlx::query("INSERT INTO user_laboratories (user_id, lab_id, role) VALUES (?, ?, ?)")
        .bind(user_id.to_string())
        .bind(lab_id.to_string())
        .bind(role.as_str())
        .execute(pool)
        .await
        .map_err(|e| Error::from_insert(e, "User is already a member of this laboratory"))?;

    Ok(())
}

/// First laboratory the user joined
pub async fn primary_laboratory(pool: &SqlitePool, user_id: Uuid) -> Result<Option<Laboratory>> {
    let row = sqlx::query(
        r#"
        SELECT l.guid, l.name, l.description
        FROM user_laboratories ul
        JOIN laboratories l ON l.guid = ul.lab_id
        WHERE ul.user_id = ?
        ORDER BY ul.created_at, ul.rowid
        LIMIT 1
        "#,
    )
    .bind(user_id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(Laboratory {
            id: parse_guid(row.get::<&str, _>("guid"))?,
            name: row.get("name"),
            description: row.get("description"),
        })
    })
    .transpose()
}
