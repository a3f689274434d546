use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::Error;

/// Maps the domain taxonomy onto HTTP. Storage details go to the log, never
/// into the response body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, mensaje) = match &self {
            Error::InvalidInterval => (
                StatusCode::BAD_REQUEST,
                "hora_inicio debe ser anterior a hora_fin".to_string(),
            ),
            Error::SchedulingConflict { .. } => (
                StatusCode::BAD_REQUEST,
                "El aula está ocupada en ese horario".to_string(),
            ),
            Error::NotFound(que) => (StatusCode::NOT_FOUND, format!("Recurso no encontrado: {que}")),
            Error::UnknownReference(que) => (
                StatusCode::BAD_REQUEST,
                format!("Referencia desconocida: {que}"),
            ),
            Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            Error::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.to_string()),
            Error::Storage(e) => {
                tracing::error!(error = ?e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
        };

        let mut body = json!({ "error": mensaje });
        if let Error::SchedulingConflict { clase_id } = &self {
            body["clase_id"] = json!(clase_id);
        }
        (status, Json(body)).into_response()
    }
}
