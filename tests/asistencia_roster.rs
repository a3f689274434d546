use chrono::NaiveDate;
use rusqlite::Connection;

use escuelad::alumnos::{self, AlumnoInput};
use escuelad::clases::{self, NuevaClase};
use escuelad::error::Error;

fn test_db() -> Connection {
    escuelad::db::open_in_memory("admin123").expect("open in-memory db")
}

fn alumno(conn: &Connection, nombre: &str) -> i64 {
    alumnos::create_alumno(
        conn,
        &AlumnoInput {
            nombre: nombre.to_string(),
            apellido: "Prueba".to_string(),
            email: format!("{nombre}@email.com"),
            telefono: None,
            instrumento: Some("Guitarra".to_string()),
            nivel: None,
            observaciones: None,
        },
    )
    .expect("create alumno")
}

fn nueva(fecha: &str, inicio: &str, fin: &str, aula_id: i64, alumno_ids: Vec<i64>) -> NuevaClase {
    NuevaClase {
        fecha: fecha.parse::<NaiveDate>().expect("valid date"),
        hora_inicio: inicio.to_string(),
        hora_fin: fin.to_string(),
        aula_id,
        descripcion: None,
        alumno_ids,
    }
}

#[test]
fn roster_is_deduplicated_and_starts_unattended() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let s2 = alumno(&conn, "carlos");
    let id = clases::create_clase(
        &conn,
        &nueva("2026-09-01", "10:00", "11:00", 1, vec![s1, s2, s1]),
    )
    .expect("create");

    let roster = clases::list_by_class(&conn, id).expect("roster");
    assert_eq!(roster.len(), 2);
    assert!(roster.iter().all(|a| !a.asistio));
}

#[test]
fn unknown_student_fails_the_whole_create() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let err = clases::create_clase(
        &conn,
        &nueva("2026-09-01", "10:00", "11:00", 1, vec![s1, 999]),
    )
    .expect_err("unknown alumno id");
    assert!(matches!(err, Error::UnknownReference("alumno")));

    // No partial roster, and no class row either.
    let clases_total: i64 = conn
        .query_row("SELECT COUNT(*) FROM clases", [], |r| r.get(0))
        .expect("count");
    assert_eq!(clases_total, 0);
}

#[test]
fn set_asistencia_touches_exactly_one_row() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let s2 = alumno(&conn, "carlos");
    let id = clases::create_clase(&conn, &nueva("2026-09-01", "10:00", "11:00", 1, vec![s1, s2]))
        .expect("create");

    clases::set_asistencia(&conn, id, s1, true).expect("mark attended");

    let roster = clases::list_by_class(&conn, id).expect("roster");
    for a in &roster {
        assert_eq!(a.asistio, a.id == s1, "only s1 should be marked");
    }

    // The flag is freely settable back.
    clases::set_asistencia(&conn, id, s1, false).expect("unmark");
    assert!(clases::list_by_class(&conn, id)
        .expect("roster")
        .iter()
        .all(|a| !a.asistio));
}

#[test]
fn set_asistencia_requires_an_enrollment() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let ajeno = alumno(&conn, "carlos");
    let id = clases::create_clase(&conn, &nueva("2026-09-01", "10:00", "11:00", 1, vec![s1]))
        .expect("create");

    assert!(matches!(
        clases::set_asistencia(&conn, id, ajeno, true),
        Err(Error::NotFound("inscripción"))
    ));
    assert!(matches!(
        clases::set_asistencia(&conn, 999, s1, true),
        Err(Error::NotFound("inscripción"))
    ));
}

#[test]
fn enroll_and_unenroll_single_students() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let id = clases::create_clase(&conn, &nueva("2026-09-01", "10:00", "11:00", 1, vec![]))
        .expect("create");

    clases::enroll_alumno(&conn, id, s1).expect("enroll");
    assert!(matches!(
        clases::enroll_alumno(&conn, id, s1),
        Err(Error::BadRequest(_))
    ));
    assert!(matches!(
        clases::enroll_alumno(&conn, 999, s1),
        Err(Error::NotFound("clase"))
    ));
    assert!(matches!(
        clases::enroll_alumno(&conn, id, 999),
        Err(Error::UnknownReference("alumno"))
    ));

    clases::unenroll_alumno(&conn, id, s1).expect("unenroll");
    assert!(matches!(
        clases::unenroll_alumno(&conn, id, s1),
        Err(Error::NotFound("inscripción"))
    ));
    assert!(clases::list_by_class(&conn, id).expect("roster").is_empty());
}

#[test]
fn student_history_is_most_recent_first_with_room_names() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    clases::create_clase(&conn, &nueva("2026-09-01", "10:00", "11:00", 1, vec![s1]))
        .expect("older");
    clases::create_clase(&conn, &nueva("2026-09-03", "09:00", "10:00", 2, vec![s1]))
        .expect("newer");
    let id = clases::create_clase(&conn, &nueva("2026-09-03", "12:00", "13:00", 1, vec![s1]))
        .expect("newest");
    clases::set_asistencia(&conn, id, s1, true).expect("mark");

    let historial = clases::list_by_alumno(&conn, s1).expect("history");
    let fechas: Vec<(String, String)> = historial
        .iter()
        .map(|c| (c.clase.fecha.clone(), c.clase.hora_inicio.clone()))
        .collect();
    assert_eq!(
        fechas,
        vec![
            ("2026-09-03".to_string(), "12:00".to_string()),
            ("2026-09-03".to_string(), "09:00".to_string()),
            ("2026-09-01".to_string(), "10:00".to_string()),
        ]
    );
    assert!(historial[0].asistio);
    assert!(!historial[1].asistio);
    assert_eq!(historial[1].clase.aula_nombre, "Aula 2");
}

#[test]
fn class_detail_includes_room_name_and_roster() {
    let conn = test_db();
    let s1 = alumno(&conn, "maria");
    let id = clases::create_clase(&conn, &nueva("2026-09-01", "10:00", "11:00", 2, vec![s1]))
        .expect("create");

    let detalle = clases::get_clase(&conn, id).expect("detail");
    assert_eq!(detalle.clase.aula_nombre, "Aula 2");
    assert_eq!(detalle.alumnos.len(), 1);
    assert_eq!(detalle.alumnos[0].nombre, "maria");
    assert!(!detalle.alumnos[0].asistio);
}
