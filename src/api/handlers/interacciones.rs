use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::api::AppState;
use crate::error::Error;
use crate::interacciones::{self, Interaccion, InteraccionInput};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Interaccion>>, Error> {
    let conn = state.conn();
    Ok(Json(interacciones::list_interacciones(&conn)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Interaccion>, Error> {
    let conn = state.conn();
    Ok(Json(interacciones::get_interaccion(&conn, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<InteraccionInput>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let conn = state.conn();
    let id = interacciones::create_interaccion(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Interacción creada correctamente", "id": id })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<InteraccionInput>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    interacciones::update_interaccion(&conn, id, &input)?;
    Ok(Json(
        json!({ "message": "Interacción actualizada correctamente" }),
    ))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    interacciones::delete_interaccion(&conn, id)?;
    Ok(Json(
        json!({ "message": "Interacción eliminada correctamente" }),
    ))
}
