//! Cage persistence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_guid, Cage, NewCage};
use crate::{Error, Result};

fn cage_from_row(row: &SqliteRow) -> Result<Cage> {
    Ok(Cage {
        id: parse_guid(row.get::<&str, _>("guid"))?,
        strain_id: parse_guid(row.get::<&str, _>("strain_id"))?,
        cage_number: row.get("cage_number"),
        group_id: row.get("group_id"),
        mating_date: row.get("mating_date"),
        notes: row.get("notes"),
    })
}

/// Create a cage in a strain
///
/// Returns [`Error::Conflict`] if the strain already has this cage number.
pub async fn create_cage(pool: &SqlitePool, strain_id: Uuid, new: &NewCage) -> Result<Cage> {
    let cage = Cage {
        id: Uuid::new_v4(),
        strain_id,
        cage_number: new.cage_number.clone(),
        group_id: new.group_id.clone(),
        mating_date: new.mating_date,
        notes: new.notes.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO cages (guid, strain_id, cage_number, group_id, mating_date, notes)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(cage.id.to_string())
    .bind(strain_id.to_string())
    .bind(&cage.cage_number)
    .bind(&cage.group_id)
    .bind(cage.mating_date)
    .bind(&cage.notes)
    .execute(pool)
    .await
    .map_err(|e| Error::from_insert(e, format!("Cage {} already exists in strain", new.cage_number)))?;

    Ok(cage)
}

pub async fn load_cage(pool: &SqlitePool, id: Uuid) -> Result<Option<Cage>> {
    let row = sqlx::query(
        "SELECT guid, strain_id, cage_number, group_id, mating_date, notes FROM cages WHERE guid = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(cage_from_row).transpose()
}

pub async fn list_cages_for_strain(pool: &SqlitePool, strain_id: Uuid) -> Result<Vec<Cage>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, strain_id, cage_number, group_id, mating_date, notes
        FROM cages
        WHERE strain_id = ?
        ORDER BY cage_number ASC
        "#,
    )
    .bind(strain_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(cage_from_row).collect()
}

/// Delete a cage; its mice cascade. Returns false if it did not exist.
pub async fn delete_cage(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cages WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
