use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{Error, Result};

/// Rooms are referenced by classes and incidents but never mutated through
/// this service; the seed data in `db` is the catalog.
#[derive(Debug, Serialize)]
pub struct Aula {
    pub id: i64,
    pub nombre: String,
    pub capacidad: Option<i64>,
    pub descripcion: Option<String>,
}

fn aula_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Aula> {
    Ok(Aula {
        id: r.get(0)?,
        nombre: r.get(1)?,
        capacidad: r.get(2)?,
        descripcion: r.get(3)?,
    })
}

pub fn list_aulas(conn: &Connection) -> Result<Vec<Aula>> {
    let mut stmt =
        conn.prepare("SELECT id, nombre, capacidad, descripcion FROM aulas ORDER BY nombre")?;
    let aulas = stmt
        .query_map([], aula_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(aulas)
}

pub fn get_aula(conn: &Connection, aula_id: i64) -> Result<Aula> {
    conn.query_row(
        "SELECT id, nombre, capacidad, descripcion FROM aulas WHERE id = ?",
        [aula_id],
        aula_from_row,
    )
    .optional()?
    .ok_or(Error::NotFound("aula"))
}
