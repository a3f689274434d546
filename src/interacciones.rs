use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct InteraccionInput {
    pub alumno_id: i64,
    pub tipo: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub fecha: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct Interaccion {
    pub id: i64,
    pub alumno_id: i64,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub fecha: String,
    pub alumno_nombre: String,
    pub alumno_apellido: String,
}

const SELECT: &str = "SELECT i.id, i.alumno_id, i.tipo, i.descripcion, i.fecha,
                             a.nombre, a.apellido
                      FROM interacciones i
                      JOIN alumnos a ON i.alumno_id = a.id";

fn interaccion_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Interaccion> {
    Ok(Interaccion {
        id: r.get(0)?,
        alumno_id: r.get(1)?,
        tipo: r.get(2)?,
        descripcion: r.get(3)?,
        fecha: r.get(4)?,
        alumno_nombre: r.get(5)?,
        alumno_apellido: r.get(6)?,
    })
}

pub fn list_interacciones(conn: &Connection) -> Result<Vec<Interaccion>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY i.fecha DESC"))?;
    let filas = stmt
        .query_map([], interaccion_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(filas)
}

pub fn list_por_alumno(conn: &Connection, alumno_id: i64) -> Result<Vec<Interaccion>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE i.alumno_id = ? ORDER BY i.fecha DESC"
    ))?;
    let filas = stmt
        .query_map([alumno_id], interaccion_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(filas)
}

pub fn get_interaccion(conn: &Connection, id: i64) -> Result<Interaccion> {
    conn.query_row(&format!("{SELECT} WHERE i.id = ?"), [id], interaccion_from_row)
        .optional()?
        .ok_or(Error::NotFound("interacción"))
}

fn validar(conn: &Connection, input: &InteraccionInput) -> Result<()> {
    if input.tipo.trim().is_empty() {
        return Err(Error::BadRequest("el tipo es requerido".to_string()));
    }
    let alumno: Option<i64> = conn
        .query_row("SELECT 1 FROM alumnos WHERE id = ?", [input.alumno_id], |r| r.get(0))
        .optional()?;
    if alumno.is_none() {
        return Err(Error::UnknownReference("alumno"));
    }
    Ok(())
}

pub fn create_interaccion(conn: &Connection, input: &InteraccionInput) -> Result<i64> {
    validar(conn, input)?;
    let fecha = input.fecha.unwrap_or_else(|| Local::now().date_naive());
    conn.execute(
        "INSERT INTO interacciones(alumno_id, tipo, descripcion, fecha) VALUES(?, ?, ?, ?)",
        params![
            input.alumno_id,
            input.tipo.trim(),
            input.descripcion,
            fecha.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_interaccion(conn: &Connection, id: i64, input: &InteraccionInput) -> Result<()> {
    validar(conn, input)?;
    let fecha = input.fecha.unwrap_or_else(|| Local::now().date_naive());
    let cambiadas = conn.execute(
        "UPDATE interacciones SET alumno_id = ?, tipo = ?, descripcion = ?, fecha = ?
         WHERE id = ?",
        params![
            input.alumno_id,
            input.tipo.trim(),
            input.descripcion,
            fecha.to_string(),
            id
        ],
    )?;
    if cambiadas == 0 {
        return Err(Error::NotFound("interacción"));
    }
    Ok(())
}

pub fn delete_interaccion(conn: &Connection, id: i64) -> Result<()> {
    let borradas = conn.execute("DELETE FROM interacciones WHERE id = ?", [id])?;
    if borradas == 0 {
        return Err(Error::NotFound("interacción"));
    }
    Ok(())
}
