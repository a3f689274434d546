use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::alumnos::{self, Alumno, AlumnoInput};
use crate::api::AppState;
use crate::clases::{self, ClaseDeAlumno};
use crate::error::Error;
use crate::interacciones::{self, Interaccion};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Alumno>>, Error> {
    let conn = state.conn();
    Ok(Json(alumnos::list_alumnos(&conn)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Alumno>, Error> {
    let conn = state.conn();
    Ok(Json(alumnos::get_alumno(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<AlumnoInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let conn = state.conn();
    let id = alumnos::create_alumno(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Alumno creado correctamente", "id": id })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AlumnoInput>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    alumnos::update_alumno(&conn, id, &input)?;
    Ok(Json(json!({ "message": "Alumno actualizado correctamente" })))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    alumnos::delete_alumno(&conn, id)?;
    Ok(Json(json!({ "message": "Alumno eliminado correctamente" })))
}

pub async fn clases(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ClaseDeAlumno>>, Error> {
    let conn = state.conn();
    Ok(Json(clases::list_by_alumno(&conn, id)?))
}

pub async fn interacciones(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Interaccion>>, Error> {
    let conn = state.conn();
    Ok(Json(interacciones::list_por_alumno(&conn, id)?))
}
