//! Mouse entry persistence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_guid, Mouse, NewMouse};
use crate::{Error, Result};

fn mouse_from_row(row: &SqliteRow) -> Result<Mouse> {
    Ok(Mouse {
        id: parse_guid(row.get::<&str, _>("guid"))?,
        cage_id: parse_guid(row.get::<&str, _>("cage_id"))?,
        sex: row.get::<&str, _>("sex").parse()?,
        quantity: row.get("quantity"),
        genotype: row.get("genotype"),
        dob: row.get("dob"),
        notes: row.get("notes"),
    })
}

/// Create a mouse entry in a cage
pub async fn create_mouse(pool: &SqlitePool, cage_id: Uuid, new: &NewMouse) -> Result<Mouse> {
    if new.quantity < 1 {
        return Err(Error::InvalidInput(format!("Quantity must be at least 1, got {}", new.quantity)));
    }

    let mouse = Mouse {
        id: Uuid::new_v4(),
        cage_id,
        sex: new.sex,
        quantity: new.quantity,
        genotype: new.genotype.clone(),
        dob: new.dob,
        notes: new.notes.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO mice (guid, cage_id, sex, quantity, genotype, dob, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(mouse.id.to_string())
    .bind(cage_id.to_string())
    .bind(mouse.sex.as_str())
    .bind(mouse.quantity)
    .bind(&mouse.genotype)
    .bind(mouse.dob)
    .bind(&mouse.notes)
    .execute(pool)
    .await?;

    Ok(mouse)
}

/// Mice of a cage in insertion order
pub async fn list_mice_for_cage(pool: &SqlitePool, cage_id: Uuid) -> Result<Vec<Mouse>> {
    let rows = sqlx::query(
        r#"
        SELECT guid, cage_id, sex, quantity, genotype, dob, notes
        FROM mice
        WHERE cage_id = ?
        ORDER BY rowid ASC
        "#,
    )
    .bind(cage_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter().map(mouse_from_row).collect()
}
