//! Cage endpoints and mouse creation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use colony_common::db::{cages, mice, Mouse, NewMouse, Sex};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{non_empty, parse_id, parse_wire_date};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateMouseRequest {
    pub sex: Option<String>,
    pub quantity: Option<i64>,
    pub genotype: Option<String>,
    pub dob: Option<String>,
    pub notes: Option<String>,
}

impl CreateMouseRequest {
    fn into_new_mouse(self) -> ApiResult<NewMouse> {
        let sex = match non_empty(self.sex) {
            Some(raw) => raw.to_uppercase().parse::<Sex>()?,
            None => Sex::Unknown,
        };

        let quantity = self.quantity.unwrap_or(1);
        if quantity < 1 {
            return Err(ApiError::BadRequest(format!("Quantity must be at least 1, got {}", quantity)));
        }

        Ok(NewMouse {
            sex,
            quantity,
            genotype: non_empty(self.genotype),
            dob: parse_wire_date(self.dob, "dob")?,
            notes: non_empty(self.notes),
        })
    }
}

/// DELETE /api/cages/:id
pub async fn delete_cage(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let cage_id = parse_id(&id, "Cage")?;
    if !cages::delete_cage(&state.db, cage_id).await? {
        return Err(ApiError::NotFound(format!("Cage {} not found", id)));
    }
    info!("Deleted cage {}", cage_id);
    Ok(Json(json!({ "success": true })))
}

/// POST /api/cages/:id/mice
pub async fn create_mouse(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateMouseRequest>,
) -> ApiResult<(StatusCode, Json<Mouse>)> {
    let cage_id = parse_id(&id, "Cage")?;
    if cages::load_cage(&state.db, cage_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Cage {} not found", id)));
    }

    let new_mouse = req.into_new_mouse()?;
    let mouse = mice::create_mouse(&state.db, cage_id, &new_mouse).await?;

    Ok((StatusCode::CREATED, Json(mouse)))
}

pub fn cage_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cages/:id", delete(delete_cage))
        .route("/api/cages/:id/mice", post(create_mouse))
}
