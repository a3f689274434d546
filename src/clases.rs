//! Class lifecycle: create/update/delete with room-booking validation, plus
//! the class↔student roster and its attendance flag.
//!
//! Every entry point takes a plain `&Connection`; the API layer serializes
//! calls behind one mutex so a validate-then-write sequence can never
//! interleave with another booking for the same room (see `api::AppState`).

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::horario;

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaClase {
    pub fecha: NaiveDate,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub aula_id: i64,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub alumno_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaseCambios {
    pub fecha: NaiveDate,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub aula_id: i64,
    #[serde(default)]
    pub descripcion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Clase {
    pub id: i64,
    pub fecha: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub aula_id: i64,
    pub descripcion: Option<String>,
    pub aula_nombre: String,
}

#[derive(Debug, Serialize)]
pub struct ClaseDetalle {
    #[serde(flatten)]
    pub clase: Clase,
    pub alumnos: Vec<AlumnoEnClase>,
}

/// Roster entry: student display fields plus the attendance outcome.
#[derive(Debug, Serialize)]
pub struct AlumnoEnClase {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub instrumento: Option<String>,
    pub nivel: String,
    pub asistio: bool,
}

/// One row of a student's history: the class plus whether they attended.
#[derive(Debug, Serialize)]
pub struct ClaseDeAlumno {
    #[serde(flatten)]
    pub clase: Clase,
    pub asistio: bool,
}

fn horas_validas(hora_inicio: &str, hora_fin: &str) -> Result<(NaiveTime, NaiveTime)> {
    let inicio = horario::parse_hora(hora_inicio)?;
    let fin = horario::parse_hora(hora_fin)?;
    if inicio >= fin {
        return Err(Error::InvalidInterval);
    }
    Ok((inicio, fin))
}

fn aula_exists(conn: &Connection, aula_id: i64) -> Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM aulas WHERE id = ?", [aula_id], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?
        .is_some())
}

fn alumno_exists(conn: &Connection, alumno_id: i64) -> Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM alumnos WHERE id = ?", [alumno_id], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?
        .is_some())
}

pub fn clase_exists(conn: &Connection, clase_id: i64) -> Result<bool> {
    Ok(conn
        .query_row("SELECT 1 FROM clases WHERE id = ?", [clase_id], |r| {
            r.get::<_, i64>(0)
        })
        .optional()?
        .is_some())
}

/// Validates the booking, inserts the class and its roster in one
/// transaction, and returns the new class id. An unknown student id fails
/// the whole operation; nothing is written on any error path (dropping the
/// transaction rolls it back).
pub fn create_clase(conn: &Connection, input: &NuevaClase) -> Result<i64> {
    let (inicio, fin) = horas_validas(&input.hora_inicio, &input.hora_fin)?;
    if !aula_exists(conn, input.aula_id)? {
        return Err(Error::UnknownReference("aula"));
    }

    let tx = conn.unchecked_transaction()?;
    if let Some(clase_id) =
        horario::find_conflict(&tx, input.aula_id, input.fecha, inicio, fin, None)?
    {
        return Err(Error::SchedulingConflict { clase_id });
    }

    tx.execute(
        "INSERT INTO clases(fecha, hora_inicio, hora_fin, aula_id, descripcion)
         VALUES(?, ?, ?, ?, ?)",
        params![
            input.fecha.to_string(),
            inicio.format("%H:%M").to_string(),
            fin.format("%H:%M").to_string(),
            input.aula_id,
            input.descripcion,
        ],
    )?;
    let clase_id = tx.last_insert_rowid();

    let mut vistos = HashSet::new();
    for &alumno_id in &input.alumno_ids {
        if !vistos.insert(alumno_id) {
            continue;
        }
        if !alumno_exists(&tx, alumno_id)? {
            return Err(Error::UnknownReference("alumno"));
        }
        tx.execute(
            "INSERT INTO clase_alumnos(clase_id, alumno_id, asistio) VALUES(?, ?, 0)",
            params![clase_id, alumno_id],
        )?;
    }

    tx.commit()?;
    Ok(clase_id)
}

/// Reschedules a class. The validator excludes `clase_id` so a class never
/// conflicts with its own current slot. The roster is not touched here.
pub fn update_clase(conn: &Connection, clase_id: i64, cambios: &ClaseCambios) -> Result<()> {
    if !clase_exists(conn, clase_id)? {
        return Err(Error::NotFound("clase"));
    }
    let (inicio, fin) = horas_validas(&cambios.hora_inicio, &cambios.hora_fin)?;
    if !aula_exists(conn, cambios.aula_id)? {
        return Err(Error::UnknownReference("aula"));
    }

    let tx = conn.unchecked_transaction()?;
    if let Some(ocupada) = horario::find_conflict(
        &tx,
        cambios.aula_id,
        cambios.fecha,
        inicio,
        fin,
        Some(clase_id),
    )? {
        return Err(Error::SchedulingConflict { clase_id: ocupada });
    }

    tx.execute(
        "UPDATE clases
         SET fecha = ?, hora_inicio = ?, hora_fin = ?, aula_id = ?, descripcion = ?
         WHERE id = ?",
        params![
            cambios.fecha.to_string(),
            inicio.format("%H:%M").to_string(),
            fin.format("%H:%M").to_string(),
            cambios.aula_id,
            cambios.descripcion,
            clase_id,
        ],
    )?;
    tx.commit()?;
    Ok(())
}

/// Removes the roster rows and then the class inside one transaction, so a
/// failure partway leaves neither an orphaned roster nor an orphaned class.
pub fn delete_clase(conn: &Connection, clase_id: i64) -> Result<()> {
    if !clase_exists(conn, clase_id)? {
        return Err(Error::NotFound("clase"));
    }
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM clase_alumnos WHERE clase_id = ?", [clase_id])?;
    tx.execute("DELETE FROM clases WHERE id = ?", [clase_id])?;
    tx.commit()?;
    Ok(())
}

pub fn get_clase(conn: &Connection, clase_id: i64) -> Result<ClaseDetalle> {
    let clase = conn
        .query_row(
            "SELECT c.id, c.fecha, c.hora_inicio, c.hora_fin, c.aula_id, c.descripcion,
                    a.nombre
             FROM clases c
             JOIN aulas a ON c.aula_id = a.id
             WHERE c.id = ?",
            [clase_id],
            clase_from_row,
        )
        .optional()?
        .ok_or(Error::NotFound("clase"))?;

    Ok(ClaseDetalle {
        clase,
        alumnos: list_by_class(conn, clase_id)?,
    })
}

pub fn list_clases(conn: &Connection, fecha: Option<NaiveDate>) -> Result<Vec<Clase>> {
    let base = "SELECT c.id, c.fecha, c.hora_inicio, c.hora_fin, c.aula_id, c.descripcion,
                       a.nombre
                FROM clases c
                JOIN aulas a ON c.aula_id = a.id";
    let orden = "ORDER BY c.fecha DESC, c.hora_inicio DESC";

    let clases = match fecha {
        Some(f) => {
            let mut stmt = conn.prepare(&format!("{base} WHERE c.fecha = ? {orden}"))?;
            let rows = stmt.query_map([f.to_string()], clase_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!("{base} {orden}"))?;
            let rows = stmt.query_map([], clase_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(clases)
}

fn clase_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Clase> {
    Ok(Clase {
        id: r.get(0)?,
        fecha: r.get(1)?,
        hora_inicio: r.get(2)?,
        hora_fin: r.get(3)?,
        aula_id: r.get(4)?,
        descripcion: r.get(5)?,
        aula_nombre: r.get(6)?,
    })
}

/// Enrolled students for a class. Returns an empty list for an unknown or
/// deleted class id.
pub fn list_by_class(conn: &Connection, clase_id: i64) -> Result<Vec<AlumnoEnClase>> {
    let mut stmt = conn.prepare(
        "SELECT al.id, al.nombre, al.apellido, al.email, al.instrumento, al.nivel, ca.asistio
         FROM alumnos al
         JOIN clase_alumnos ca ON al.id = ca.alumno_id
         WHERE ca.clase_id = ?
         ORDER BY al.apellido, al.nombre",
    )?;
    let alumnos = stmt
        .query_map([clase_id], |r| {
            Ok(AlumnoEnClase {
                id: r.get(0)?,
                nombre: r.get(1)?,
                apellido: r.get(2)?,
                email: r.get(3)?,
                instrumento: r.get(4)?,
                nivel: r.get(5)?,
                asistio: r.get::<_, i64>(6)? != 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(alumnos)
}

/// A student's classes, most recent first.
pub fn list_by_alumno(conn: &Connection, alumno_id: i64) -> Result<Vec<ClaseDeAlumno>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.fecha, c.hora_inicio, c.hora_fin, c.aula_id, c.descripcion,
                a.nombre, ca.asistio
         FROM clases c
         JOIN clase_alumnos ca ON c.id = ca.clase_id
         JOIN aulas a ON c.aula_id = a.id
         WHERE ca.alumno_id = ?
         ORDER BY c.fecha DESC, c.hora_inicio DESC",
    )?;
    let clases = stmt
        .query_map([alumno_id], |r| {
            Ok(ClaseDeAlumno {
                clase: clase_from_row(r)?,
                asistio: r.get::<_, i64>(7)? != 0,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(clases)
}

/// Attendance is a separate concern from scheduling: this touches only the
/// `asistio` flag of one roster row.
pub fn set_asistencia(
    conn: &Connection,
    clase_id: i64,
    alumno_id: i64,
    asistio: bool,
) -> Result<()> {
    let cambiadas = conn.execute(
        "UPDATE clase_alumnos SET asistio = ? WHERE clase_id = ? AND alumno_id = ?",
        params![asistio as i64, clase_id, alumno_id],
    )?;
    if cambiadas == 0 {
        return Err(Error::NotFound("inscripción"));
    }
    Ok(())
}

pub fn enroll_alumno(conn: &Connection, clase_id: i64, alumno_id: i64) -> Result<()> {
    if !clase_exists(conn, clase_id)? {
        return Err(Error::NotFound("clase"));
    }
    if !alumno_exists(conn, alumno_id)? {
        return Err(Error::UnknownReference("alumno"));
    }
    let insertadas = conn.execute(
        "INSERT OR IGNORE INTO clase_alumnos(clase_id, alumno_id, asistio) VALUES(?, ?, 0)",
        params![clase_id, alumno_id],
    )?;
    if insertadas == 0 {
        return Err(Error::BadRequest(
            "el alumno ya está inscrito en la clase".to_string(),
        ));
    }
    Ok(())
}

pub fn unenroll_alumno(conn: &Connection, clase_id: i64, alumno_id: i64) -> Result<()> {
    let borradas = conn.execute(
        "DELETE FROM clase_alumnos WHERE clase_id = ? AND alumno_id = ?",
        params![clase_id, alumno_id],
    )?;
    if borradas == 0 {
        return Err(Error::NotFound("inscripción"));
    }
    Ok(())
}
