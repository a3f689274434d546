//! Credential check and bearer-token issuance. Tokens are opaque uuid-v4
//! values held in an in-process store with a 24 h expiry; restarting the
//! service logs everyone out, which is acceptable for a single-instance
//! admin tool.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize)]
pub struct Profesor {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub creado_en: String,
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stored form is `salt$hexdigest` with a random per-user salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = digest(&salt, password);
    format!("{salt}${hash}")
}

pub fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) => digest(salt, password) == hash,
        None => false,
    }
}

#[derive(Debug, Clone)]
struct Sesion {
    profesor_id: i64,
    expira: DateTime<Utc>,
}

#[derive(Default)]
pub struct TokenStore {
    sesiones: Mutex<HashMap<String, Sesion>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, profesor_id: i64) -> String {
        self.issue_with_expiry(profesor_id, Utc::now() + Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn issue_with_expiry(&self, profesor_id: i64, expira: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        self.lock()
            .insert(token.clone(), Sesion { profesor_id, expira });
        token
    }

    /// Returns the owning teacher id for a live token; expired tokens are
    /// dropped on the way out.
    pub fn verify(&self, token: &str) -> Option<i64> {
        let mut sesiones = self.lock();
        match sesiones.get(token) {
            Some(s) if s.expira > Utc::now() => Some(s.profesor_id),
            Some(_) => {
                sesiones.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn revoke(&self, token: &str) {
        self.lock().remove(token);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Sesion>> {
        // A poisoned lock means a panic in another request; the map itself
        // is still usable.
        self.sesiones.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn register(conn: &Connection, nombre: &str, email: &str, password: &str) -> Result<i64> {
    if nombre.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(Error::BadRequest(
            "nombre, email y password son requeridos".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(Error::BadRequest("formato de email inválido".to_string()));
    }
    if password.len() < 6 {
        return Err(Error::BadRequest(
            "la contraseña debe tener al menos 6 caracteres".to_string(),
        ));
    }

    let existente: Option<i64> = conn
        .query_row("SELECT id FROM profesores WHERE email = ?", [email.trim()], |r| r.get(0))
        .optional()?;
    if existente.is_some() {
        return Err(Error::BadRequest("el email ya está registrado".to_string()));
    }

    conn.execute(
        "INSERT INTO profesores(nombre, email, password) VALUES(?, ?, ?)",
        (nombre.trim(), email.trim(), hash_password(password)),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn login(conn: &Connection, email: &str, password: &str) -> Result<Profesor> {
    let fila: Option<(i64, String, String, String, String)> = conn
        .query_row(
            "SELECT id, nombre, email, password, creado_en FROM profesores WHERE email = ?",
            [email],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                ))
            },
        )
        .optional()?;

    // Same response for unknown email and wrong password.
    let Some((id, nombre, email, stored, creado_en)) = fila else {
        return Err(Error::Unauthorized("credenciales inválidas"));
    };
    if !verify_password(&stored, password) {
        return Err(Error::Unauthorized("credenciales inválidas"));
    }
    Ok(Profesor {
        id,
        nombre,
        email,
        creado_en,
    })
}

pub fn get_profesor(conn: &Connection, profesor_id: i64) -> Result<Profesor> {
    conn.query_row(
        "SELECT id, nombre, email, creado_en FROM profesores WHERE id = ?",
        [profesor_id],
        |r| {
            Ok(Profesor {
                id: r.get(0)?,
                nombre: r.get(1)?,
                email: r.get(2)?,
                creado_en: r.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or(Error::NotFound("profesor"))
}
