use chrono::NaiveDate;
use rusqlite::Connection;

use escuelad::alumnos::{self, AlumnoInput};
use escuelad::clases::{self, NuevaClase};
use escuelad::error::Error;
use escuelad::interacciones::{self, InteraccionInput};

fn test_db() -> Connection {
    escuelad::db::open_in_memory("admin123").expect("open in-memory db")
}

fn input(nombre: &str) -> AlumnoInput {
    AlumnoInput {
        nombre: nombre.to_string(),
        apellido: "Gómez".to_string(),
        email: format!("{nombre}@email.com"),
        telefono: Some("123-456-789".to_string()),
        instrumento: Some("Piano".to_string()),
        nivel: None,
        observaciones: None,
    }
}

#[test]
fn create_defaults_level_and_round_trips() {
    let conn = test_db();
    let id = alumnos::create_alumno(&conn, &input("maria")).expect("create");
    let alumno = alumnos::get_alumno(&conn, id).expect("get");
    assert_eq!(alumno.nombre, "maria");
    assert_eq!(alumno.nivel, "Principiante");
    assert_eq!(alumno.instrumento.as_deref(), Some("Piano"));
}

#[test]
fn required_fields_are_enforced() {
    let conn = test_db();
    let mut sin_email = input("maria");
    sin_email.email = "  ".to_string();
    assert!(matches!(
        alumnos::create_alumno(&conn, &sin_email),
        Err(Error::BadRequest(_))
    ));
}

#[test]
fn update_and_missing_targets() {
    let conn = test_db();
    let id = alumnos::create_alumno(&conn, &input("maria")).expect("create");

    let mut cambios = input("maria");
    cambios.nivel = Some("Intermedio".to_string());
    alumnos::update_alumno(&conn, id, &cambios).expect("update");
    assert_eq!(alumnos::get_alumno(&conn, id).expect("get").nivel, "Intermedio");

    assert!(matches!(
        alumnos::get_alumno(&conn, 999),
        Err(Error::NotFound("alumno"))
    ));
    assert!(matches!(
        alumnos::update_alumno(&conn, 999, &cambios),
        Err(Error::NotFound("alumno"))
    ));
    assert!(matches!(
        alumnos::delete_alumno(&conn, 999),
        Err(Error::NotFound("alumno"))
    ));
}

#[test]
fn listing_orders_by_name() {
    let conn = test_db();
    alumnos::create_alumno(&conn, &input("maria")).expect("maria");
    alumnos::create_alumno(&conn, &input("ana")).expect("ana");
    alumnos::create_alumno(&conn, &input("carlos")).expect("carlos");

    let nombres: Vec<String> = alumnos::list_alumnos(&conn)
        .expect("list")
        .into_iter()
        .map(|a| a.nombre)
        .collect();
    assert_eq!(nombres, vec!["ana", "carlos", "maria"]);
}

#[test]
fn delete_cascades_roster_and_interactions() {
    let conn = test_db();
    let id = alumnos::create_alumno(&conn, &input("maria")).expect("create");
    let clase_id = clases::create_clase(
        &conn,
        &NuevaClase {
            fecha: "2026-09-01".parse::<NaiveDate>().expect("date"),
            hora_inicio: "10:00".to_string(),
            hora_fin: "11:00".to_string(),
            aula_id: 1,
            descripcion: None,
            alumno_ids: vec![id],
        },
    )
    .expect("create clase");
    interacciones::create_interaccion(
        &conn,
        &InteraccionInput {
            alumno_id: id,
            tipo: "llamada".to_string(),
            descripcion: None,
            fecha: None,
        },
    )
    .expect("create interaccion");

    alumnos::delete_alumno(&conn, id).expect("delete");

    assert!(clases::list_by_class(&conn, clase_id).expect("roster").is_empty());
    assert!(interacciones::list_por_alumno(&conn, id)
        .expect("interacciones")
        .is_empty());
    // The class itself survives; only the enrollment went away.
    clases::get_clase(&conn, clase_id).expect("clase still exists");
}
