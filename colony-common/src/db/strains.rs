//! Strain persistence

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{cages, mice, parse_guid, parse_opt_guid, CageWithMice, Laboratory, Strain, StrainDetail, StrainSummary};
use crate::{Error, Result};

fn strain_from_row(row: &SqliteRow) -> Result<Strain> {
    Ok(Strain {
        id: parse_guid(row.get::<&str, _>("guid"))?,
        name: row.get("name"),
        description: row.get("description"),
        laboratory_id: parse_opt_guid(row.get("laboratory_id"))?,
    })
}

/// Laboratory columns aliased `lab_*` by a LEFT JOIN
fn joined_laboratory(row: &SqliteRow) -> Result<Option<Laboratory>> {
    let Some(guid) = row.get::<Option<String>, _>("lab_guid") else {
        return Ok(None);
    };
    Ok(Some(Laboratory {
        id: parse_guid(&guid)?,
        name: row.get("lab_name"),
        description: row.get("lab_description"),
    }))
}

/// Create a strain
///
/// Returns [`Error::Conflict`] when the name is already used.
pub async fn create_strain(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    laboratory_id: Option<Uuid>,
) -> Result<Strain> {
    let strain = Strain {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: description.map(str::to_string),
        laboratory_id,
    };

    sqlx::query("INSERT INTO strains (guid, name, description, laboratory_id) VALUES (?, ?, ?, ?)")
        .bind(strain.id.to_string())
        .bind(&strain.name)
        .bind(&strain.description)
        .bind(laboratory_id.map(|id| id.to_string()))
        .execute(pool)
        .await
        .map_err(|e| Error::from_insert(e, format!("Strain {} already exists", name)))?;

    Ok(strain)
}

pub async fn load_strain(pool: &SqlitePool, id: Uuid) -> Result<Option<Strain>> {
    let row = sqlx::query("SELECT guid, name, description, laboratory_id FROM strains WHERE guid = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(strain_from_row).transpose()
}

/// All strains ordered by name, with cage counts and laboratory
pub async fn list_strains(pool: &SqlitePool) -> Result<Vec<StrainSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT s.guid, s.name, s.description, s.laboratory_id,
               (SELECT COUNT(*) FROM cages c WHERE c.strain_id = s.guid) AS cage_count,
               l.guid AS lab_guid, l.name AS lab_name, l.description AS lab_description
        FROM strains s
        LEFT JOIN laboratories l ON l.guid = s.laboratory_id
        ORDER BY s.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(StrainSummary {
                strain: strain_from_row(row)?,
                cage_count: row.get("cage_count"),
                laboratory: joined_laboratory(row)?,
            })
        })
        .collect()
}

/// Strain with its cages (ordered by cage number) and their mice
pub async fn load_strain_detail(pool: &SqlitePool, id: Uuid) -> Result<Option<StrainDetail>> {
    let row = sqlx::query(
        r#"
        SELECT s.guid, s.name, s.description, s.laboratory_id,
               l.guid AS lab_guid, l.name AS lab_name, l.description AS lab_description
        FROM strains s
        LEFT JOIN laboratories l ON l.guid = s.laboratory_id
        WHERE s.guid = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let strain = strain_from_row(&row)?;
    let laboratory = joined_laboratory(&row)?;

    let mut detailed = Vec::new();
    for cage in cages::list_cages_for_strain(pool, strain.id).await? {
        let mice = mice::list_mice_for_cage(pool, cage.id).await?;
        detailed.push(CageWithMice { cage, mice });
    }

    Ok(Some(StrainDetail {
        strain,
        cages: detailed,
        laboratory,
    }))
}

/// Delete a strain; cages and mice cascade. Returns false if it did not exist.
pub async fn delete_strain(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM strains WHERE guid = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
