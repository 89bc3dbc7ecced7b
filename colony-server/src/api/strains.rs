//! Strain endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use colony_common::db::{cages, laboratories, strains, CageWithMice, NewCage, StrainDetail, StrainSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::{non_empty, parse_id, parse_wire_date};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStrainRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub laboratory_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCageRequest {
    pub cage_number: Option<String>,
    pub group_id: Option<String>,
    pub mating_date: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/strains
pub async fn list_strains(State(state): State<AppState>) -> ApiResult<Json<Vec<StrainSummary>>> {
    Ok(Json(strains::list_strains(&state.db).await?))
}

/// POST /api/strains
pub async fn create_strain(
    State(state): State<AppState>,
    Json(req): Json<CreateStrainRequest>,
) -> ApiResult<(StatusCode, Json<StrainSummary>)> {
    let lab_id = req.laboratory_id.unwrap_or_default();
    let lab = match Uuid::parse_str(&lab_id) {
        Ok(id) => laboratories::load_laboratory(&state.db, id).await?,
        Err(_) => None,
    };
    let Some(lab) = lab else {
        return Err(ApiError::NotFound("实验室不存在".to_string()));
    };

    let Some(name) = non_empty(req.name) else {
        return Err(ApiError::BadRequest("Strain name is required".to_string()));
    };
    let description = non_empty(req.description);

    let strain = strains::create_strain(&state.db, &name, description.as_deref(), Some(lab.id)).await?;
    info!("Created strain {} in laboratory {}", strain.name, lab.name);

    Ok((
        StatusCode::CREATED,
        Json(StrainSummary {
            strain,
            cage_count: 0,
            laboratory: Some(lab),
        }),
    ))
}

/// GET /api/strains/:id
pub async fn get_strain(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<StrainDetail>> {
    let strain_id = parse_id(&id, "Strain")?;
    strains::load_strain_detail(&state.db, strain_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Strain {} not found", id)))
}

/// DELETE /api/strains/:id
///
/// Cages and mice go with it.
pub async fn delete_strain(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let strain_id = parse_id(&id, "Strain")?;
    if !strains::delete_strain(&state.db, strain_id).await? {
        return Err(ApiError::NotFound(format!("Strain {} not found", id)));
    }
    info!("Deleted strain {}", strain_id);
    Ok(Json(json!({ "success": true })))
}

/// POST /api/strains/:id/cages
pub async fn create_cage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateCageRequest>,
) -> ApiResult<(StatusCode, Json<CageWithMice>)> {
    let strain_id = parse_id(&id, "Strain")?;
    if strains::load_strain(&state.db, strain_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Strain {} not found", id)));
    }

    let Some(cage_number) = non_empty(req.cage_number) else {
        return Err(ApiError::BadRequest("Cage number is required".to_string()));
    };

    let new_cage = NewCage {
        cage_number,
        group_id: non_empty(req.group_id),
        mating_date: parse_wire_date(req.mating_date, "matingDate")?,
        notes: non_empty(req.notes),
    };

    let cage = cages::create_cage(&state.db, strain_id, &new_cage).await?;

    Ok((
        StatusCode::CREATED,
        Json(CageWithMice { cage, mice: Vec::new() }),
    ))
}

pub fn strain_routes() -> Router<AppState> {
    Router::new()
        .route("/api/strains", get(list_strains).post(create_strain))
        .route("/api/strains/:id", get(get_strain).delete(delete_strain))
        .route("/api/strains/:id/cages", post(create_cage))
}
