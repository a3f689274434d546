use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::api::AppState;
use crate::error::Error;
use crate::incidencias::{self, Incidencia, IncidenciaInput, IncidenciaStats};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Incidencia>>, Error> {
    let conn = state.conn();
    Ok(Json(incidencias::list_incidencias(&conn)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Incidencia>, Error> {
    let conn = state.conn();
    Ok(Json(incidencias::get_incidencia(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<IncidenciaInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let conn = state.conn();
    let id = incidencias::create_incidencia(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Incidencia creada correctamente", "id": id })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<IncidenciaInput>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    incidencias::update_incidencia(&conn, id, &input)?;
    Ok(Json(
        json!({ "message": "Incidencia actualizada correctamente" }),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    incidencias::delete_incidencia(&conn, id)?;
    Ok(Json(
        json!({ "message": "Incidencia eliminada correctamente" }),
    ))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<IncidenciaStats>, Error> {
    let conn = state.conn();
    Ok(Json(incidencias::stats(&conn)?))
}
