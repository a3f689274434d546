use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::api::AppState;
use crate::clases::{self, Clase, ClaseCambios, ClaseDetalle, NuevaClase};
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct FiltroClases {
    pub fecha: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroClases>,
) -> Result<Json<Vec<Clase>>, Error> {
    let conn = state.conn();
    Ok(Json(clases::list_clases(&conn, filtro.fecha)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClaseDetalle>, Error> {
    let conn = state.conn();
    Ok(Json(clases::get_clase(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NuevaClase>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let conn = state.conn();
    let id = clases::create_clase(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Clase creada correctamente", "id": id })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(cambios): Json<ClaseCambios>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    clases::update_clase(&conn, id, &cambios)?;
    Ok(Json(json!({ "message": "Clase actualizada correctamente" })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    clases::delete_clase(&conn, id)?;
    Ok(Json(json!({ "message": "Clase eliminada correctamente" })))
}

#[derive(Debug, Deserialize)]
pub struct CambioAsistencia {
    pub asistio: bool,
}

pub async fn asistencia(
    State(state): State<AppState>,
    Path((id, alumno_id)): Path<(i64, i64)>,
    Json(cambio): Json<CambioAsistencia>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    clases::set_asistencia(&conn, id, alumno_id, cambio.asistio)?;
    Ok(Json(
        json!({ "message": "Asistencia actualizada correctamente" }),
    ))
}

pub async fn enroll(
    State(state): State<AppState>,
    Path((id, alumno_id)): Path<(i64, i64)>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let conn = state.conn();
    clases::enroll_alumno(&conn, id, alumno_id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Alumno inscrito correctamente" })),
    ))
}

pub async fn unenroll(
    State(state): State<AppState>,
    Path((id, alumno_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    clases::unenroll_alumno(&conn, id, alumno_id)?;
    Ok(Json(json!({ "message": "Alumno dado de baja de la clase" })))
}
