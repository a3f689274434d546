use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AlumnoInput {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub instrumento: Option<String>,
    #[serde(default)]
    pub nivel: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Alumno {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: Option<String>,
    pub instrumento: Option<String>,
    pub nivel: String,
    pub observaciones: Option<String>,
    pub creado_en: String,
}

fn alumno_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Alumno> {
    Ok(Alumno {
        id: r.get(0)?,
        nombre: r.get(1)?,
        apellido: r.get(2)?,
        email: r.get(3)?,
        telefono: r.get(4)?,
        instrumento: r.get(5)?,
        nivel: r.get(6)?,
        observaciones: r.get(7)?,
        creado_en: r.get(8)?,
    })
}

const COLUMNAS: &str =
    "id, nombre, apellido, email, telefono, instrumento, nivel, observaciones, creado_en";

pub fn list_alumnos(conn: &Connection) -> Result<Vec<Alumno>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNAS} FROM alumnos ORDER BY nombre, apellido"
    ))?;
    let alumnos = stmt
        .query_map([], alumno_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(alumnos)
}

pub fn get_alumno(conn: &Connection, alumno_id: i64) -> Result<Alumno> {
    conn.query_row(
        &format!("SELECT {COLUMNAS} FROM alumnos WHERE id = ?"),
        [alumno_id],
        alumno_from_row,
    )
    .optional()?
    .ok_or(Error::NotFound("alumno"))
}

fn validar(input: &AlumnoInput) -> Result<()> {
    if input.nombre.trim().is_empty()
        || input.apellido.trim().is_empty()
        || input.email.trim().is_empty()
    {
        return Err(Error::BadRequest(
            "nombre, apellido y email son requeridos".to_string(),
        ));
    }
    Ok(())
}

pub fn create_alumno(conn: &Connection, input: &AlumnoInput) -> Result<i64> {
    validar(input)?;
    conn.execute(
        "INSERT INTO alumnos(nombre, apellido, email, telefono, instrumento, nivel, observaciones)
         VALUES(?, ?, ?, ?, ?, ?, ?)",
        params![
            input.nombre.trim(),
            input.apellido.trim(),
            input.email.trim(),
            input.telefono,
            input.instrumento,
            input.nivel.as_deref().unwrap_or("Principiante"),
            input.observaciones,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_alumno(conn: &Connection, alumno_id: i64, input: &AlumnoInput) -> Result<()> {
    validar(input)?;
    let cambiadas = conn.execute(
        "UPDATE alumnos
         SET nombre = ?, apellido = ?, email = ?, telefono = ?, instrumento = ?,
             nivel = ?, observaciones = ?
         WHERE id = ?",
        params![
            input.nombre.trim(),
            input.apellido.trim(),
            input.email.trim(),
            input.telefono,
            input.instrumento,
            input.nivel.as_deref().unwrap_or("Principiante"),
            input.observaciones,
            alumno_id,
        ],
    )?;
    if cambiadas == 0 {
        return Err(Error::NotFound("alumno"));
    }
    Ok(())
}

/// Removes the student's roster rows and interactions first, in the same
/// transaction, so the foreign keys never dangle.
pub fn delete_alumno(conn: &Connection, alumno_id: i64) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM clase_alumnos WHERE alumno_id = ?", [alumno_id])?;
    tx.execute("DELETE FROM interacciones WHERE alumno_id = ?", [alumno_id])?;
    let borradas = tx.execute("DELETE FROM alumnos WHERE id = ?", [alumno_id])?;
    if borradas == 0 {
        return Err(Error::NotFound("alumno"));
    }
    tx.commit()?;
    Ok(())
}
