use axum::extract::{Path, State};
use axum::Json;

use crate::api::AppState;
use crate::aulas::{self, Aula};
use crate::error::Error;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Aula>>, Error> {
    let conn = state.conn();
    Ok(Json(aulas::list_aulas(&conn)?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Aula>, Error> {
    let conn = state.conn();
    Ok(Json(aulas::get_aula(&conn, id)?))
}
