use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::api::{AppState, ProfesorId};
use crate::auth;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct Registro {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(registro): Json<Registro>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let id = {
        let conn = state.conn();
        auth::register(&conn, &registro.nombre, &registro.email, &registro.password)?
    };
    let token = state.tokens.issue(id);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Profesor registrado correctamente",
            "data": {
                "id": id,
                "nombre": registro.nombre.trim(),
                "email": registro.email.trim(),
                "token": token,
            }
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct Credenciales {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(credenciales): Json<Credenciales>,
) -> Result<Json<serde_json::Value>, Error> {
    let profesor = {
        let conn = state.conn();
        auth::login(&conn, &credenciales.email, &credenciales.password)?
    };
    let token = state.tokens.issue(profesor.id);
    Ok(Json(json!({
        "success": true,
        "message": "Login exitoso",
        "data": { "token": token, "profesor": profesor }
    })))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(ProfesorId(profesor_id)): Extension<ProfesorId>,
) -> Result<Json<serde_json::Value>, Error> {
    let profesor = {
        let conn = state.conn();
        auth::get_profesor(&conn, profesor_id)?
    };
    Ok(Json(json!({
        "success": true,
        "message": "Token válido",
        "data": { "profesor": profesor, "valid": true }
    })))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(ProfesorId(profesor_id)): Extension<ProfesorId>,
) -> Result<Json<serde_json::Value>, Error> {
    let conn = state.conn();
    let profesor = auth::get_profesor(&conn, profesor_id)?;
    let (total_alumnos, clases_proximas, incidencias_pendientes): (i64, i64, i64) = conn
        .query_row(
            "SELECT
               (SELECT COUNT(*) FROM alumnos),
               (SELECT COUNT(*) FROM clases WHERE fecha >= date('now')),
               (SELECT COUNT(*) FROM incidencias WHERE estado = 'pendiente')",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .map_err(Error::Storage)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "profesor": profesor,
            "estadisticas": {
                "total_alumnos": total_alumnos,
                "clases_proximas": clases_proximas,
                "incidencias_pendientes": incidencias_pendientes,
            }
        }
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.tokens.revoke(token);
    }
    Json(json!({ "success": true, "message": "Logout exitoso" }))
}
