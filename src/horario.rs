use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};

use crate::error::{Error, Result};

/// Accepts both `HH:MM` (what the API uses) and `HH:MM:SS` (older rows).
pub fn parse_hora(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| Error::BadRequest(format!("hora inválida: {s}")))
}

/// Whether two same-day intervals share at least one instant.
///
/// Strict comparisons on both sides: a class ending at 10:00 does not
/// conflict with one starting at 10:00, so back-to-back bookings in the same
/// room are allowed. The full-interval test also catches containment, which
/// an endpoint-in-range check would miss. Callers guarantee start < end.
pub fn overlaps(
    a_inicio: NaiveTime,
    a_fin: NaiveTime,
    b_inicio: NaiveTime,
    b_fin: NaiveTime,
) -> bool {
    a_inicio < b_fin && b_inicio < a_fin
}

/// Booking validator: scans the existing classes for this room and date and
/// returns the id of the first one whose interval overlaps the candidate.
/// `exclude` skips the row being updated so a class never conflicts with
/// itself.
pub fn find_conflict(
    conn: &Connection,
    aula_id: i64,
    fecha: NaiveDate,
    inicio: NaiveTime,
    fin: NaiveTime,
    exclude: Option<i64>,
) -> Result<Option<i64>> {
    let mut stmt = conn.prepare(
        "SELECT id, hora_inicio, hora_fin FROM clases WHERE aula_id = ? AND fecha = ?",
    )?;
    let candidatos = stmt
        .query_map(params![aula_id, fecha.to_string()], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (id, hora_inicio, hora_fin) in candidatos {
        if exclude == Some(id) {
            continue;
        }
        let b_inicio = parse_hora(&hora_inicio)?;
        let b_fin = parse_hora(&hora_fin)?;
        if overlaps(inicio, fin, b_inicio, b_fin) {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
