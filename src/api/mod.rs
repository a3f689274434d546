mod error;
mod handlers;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use rusqlite::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::TokenStore;
use crate::error::Error;

/// Shared service state. The single connection behind a mutex is deliberate:
/// booking validation is a read-then-write sequence, and holding the lock for
/// the whole service call means two overlapping create/update requests for
/// the same room serialize instead of both passing validation and
/// double-booking the room.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            tokens: Arc::new(TokenStore::new()),
        }
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        // Poisoning only records a panic in another request; the connection
        // itself is still consistent.
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Authenticated teacher id, attached by `require_auth`.
#[derive(Debug, Clone, Copy)]
pub struct ProfesorId(pub i64);

async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(Error::Unauthorized("token de acceso requerido"))?
        .to_string();

    let profesor_id = state
        .tokens
        .verify(&token)
        .ok_or(Error::Unauthorized("token inválido o expirado"))?;
    {
        // The account may have been removed since the token was issued.
        // Only that case is a 401; a storage failure stays a 500.
        let conn = state.conn();
        match crate::auth::get_profesor(&conn, profesor_id) {
            Ok(_) => {}
            Err(Error::NotFound(_)) => {
                return Err(Error::Unauthorized("profesor no encontrado"))
            }
            Err(e) => return Err(e),
        }
    }

    req.extensions_mut().insert(ProfesorId(profesor_id));
    Ok(next.run(req).await)
}

pub fn router(state: AppState) -> Router {
    let protegidas = Router::new()
        .route("/api/auth/verify", get(handlers::auth::verify))
        .route("/api/auth/profile", get(handlers::auth::profile))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/api/health", get(handlers::core::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/aulas", get(handlers::aulas::list))
        .route("/api/aulas/:id", get(handlers::aulas::get_one))
        .route(
            "/api/alumnos",
            get(handlers::alumnos::list).post(handlers::alumnos::create),
        )
        .route(
            "/api/alumnos/:id",
            get(handlers::alumnos::get_one)
                .put(handlers::alumnos::update)
                .delete(handlers::alumnos::remove),
        )
        .route("/api/alumnos/:id/clases", get(handlers::alumnos::clases))
        .route(
            "/api/alumnos/:id/interacciones",
            get(handlers::alumnos::interacciones),
        )
        .route(
            "/api/clases",
            get(handlers::clases::list).post(handlers::clases::create),
        )
        .route(
            "/api/clases/:id",
            get(handlers::clases::get_one)
                .put(handlers::clases::update)
                .delete(handlers::clases::remove),
        )
        .route(
            "/api/clases/:id/asistencia/:alumno_id",
            put(handlers::clases::asistencia),
        )
        .route(
            "/api/clases/:id/alumnos/:alumno_id",
            post(handlers::clases::enroll).delete(handlers::clases::unenroll),
        )
        .route(
            "/api/interacciones",
            get(handlers::interacciones::list).post(handlers::interacciones::create),
        )
        .route(
            "/api/interacciones/:id",
            get(handlers::interacciones::get_one)
                .put(handlers::interacciones::update)
                .delete(handlers::interacciones::remove),
        )
        .route(
            "/api/incidencias",
            get(handlers::incidencias::list).post(handlers::incidencias::create),
        )
        .route(
            "/api/incidencias/stats/resumen",
            get(handlers::incidencias::stats),
        )
        .route(
            "/api/incidencias/:id",
            get(handlers::incidencias::get_one)
                .put(handlers::incidencias::update)
                .delete(handlers::incidencias::remove),
        )
        .merge(protegidas)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
