use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct IncidenciaInput {
    #[serde(default)]
    pub aula_id: Option<i64>,
    pub descripcion: String,
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Incidencia {
    pub id: i64,
    pub aula_id: Option<i64>,
    pub descripcion: String,
    pub estado: String,
    pub fecha_reporte: String,
    pub aula_nombre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IncidenciaStats {
    pub total: i64,
    pub pendientes: i64,
    pub resueltas: i64,
}

const SELECT: &str = "SELECT i.id, i.aula_id, i.descripcion, i.estado, i.fecha_reporte,
                             a.nombre
                      FROM incidencias i
                      LEFT JOIN aulas a ON i.aula_id = a.id";

fn incidencia_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Incidencia> {
    Ok(Incidencia {
        id: r.get(0)?,
        aula_id: r.get(1)?,
        descripcion: r.get(2)?,
        estado: r.get(3)?,
        fecha_reporte: r.get(4)?,
        aula_nombre: r.get(5)?,
    })
}

pub fn list_incidencias(conn: &Connection) -> Result<Vec<Incidencia>> {
    let mut stmt = conn.prepare(&format!("{SELECT} ORDER BY i.fecha_reporte DESC"))?;
    let filas = stmt
        .query_map([], incidencia_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(filas)
}

pub fn get_incidencia(conn: &Connection, id: i64) -> Result<Incidencia> {
    conn.query_row(&format!("{SELECT} WHERE i.id = ?"), [id], incidencia_from_row)
        .optional()?
        .ok_or(Error::NotFound("incidencia"))
}

fn aula_valida(conn: &Connection, aula_id: Option<i64>) -> Result<()> {
    let Some(aula_id) = aula_id else { return Ok(()) };
    let existe: Option<i64> = conn
        .query_row("SELECT 1 FROM aulas WHERE id = ?", [aula_id], |r| r.get(0))
        .optional()?;
    if existe.is_none() {
        return Err(Error::UnknownReference("aula"));
    }
    Ok(())
}

pub fn create_incidencia(conn: &Connection, input: &IncidenciaInput) -> Result<i64> {
    if input.descripcion.trim().is_empty() {
        return Err(Error::BadRequest("la descripción es requerida".to_string()));
    }
    aula_valida(conn, input.aula_id)?;
    conn.execute(
        "INSERT INTO incidencias(aula_id, descripcion, estado) VALUES(?, ?, ?)",
        params![
            input.aula_id,
            input.descripcion.trim(),
            input.estado.as_deref().unwrap_or("pendiente"),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_incidencia(conn: &Connection, id: i64, input: &IncidenciaInput) -> Result<()> {
    if input.descripcion.trim().is_empty() {
        return Err(Error::BadRequest("la descripción es requerida".to_string()));
    }
    aula_valida(conn, input.aula_id)?;
    let cambiadas = conn.execute(
        "UPDATE incidencias SET aula_id = ?, descripcion = ?, estado = ? WHERE id = ?",
        params![
            input.aula_id,
            input.descripcion.trim(),
            input.estado.as_deref().unwrap_or("pendiente"),
            id
        ],
    )?;
    if cambiadas == 0 {
        return Err(Error::NotFound("incidencia"));
    }
    Ok(())
}

pub fn delete_incidencia(conn: &Connection, id: i64) -> Result<()> {
    let borradas = conn.execute("DELETE FROM incidencias WHERE id = ?", [id])?;
    if borradas == 0 {
        return Err(Error::NotFound("incidencia"));
    }
    Ok(())
}

pub fn stats(conn: &Connection) -> Result<IncidenciaStats> {
    let stats = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN estado = 'pendiente' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN estado = 'resuelto' THEN 1 ELSE 0 END), 0)
         FROM incidencias",
        [],
        |r| {
            Ok(IncidenciaStats {
                total: r.get(0)?,
                pendientes: r.get(1)?,
                resueltas: r.get(2)?,
            })
        },
    )?;
    Ok(stats)
}
