use axum::Json;
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "message": "Servidor de escuela de música funcionando",
        "database": "SQLite local",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
