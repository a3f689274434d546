use rusqlite::Connection;
use std::path::Path;

use crate::auth;

pub fn open_db(path: &Path, admin_password: &str) -> anyhow::Result<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    init(&conn, admin_password)?;
    Ok(conn)
}

/// In-memory database with the full schema and seed rows; used by tests.
pub fn open_in_memory(admin_password: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init(&conn, admin_password)?;
    Ok(conn)
}

fn init(conn: &Connection, admin_password: &str) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS profesores(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            creado_en TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS aulas(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            capacidad INTEGER,
            descripcion TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS alumnos(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            apellido TEXT NOT NULL,
            email TEXT NOT NULL,
            telefono TEXT,
            instrumento TEXT,
            nivel TEXT NOT NULL DEFAULT 'Principiante',
            observaciones TEXT,
            creado_en TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS clases(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fecha TEXT NOT NULL,
            hora_inicio TEXT NOT NULL,
            hora_fin TEXT NOT NULL,
            aula_id INTEGER NOT NULL,
            descripcion TEXT,
            FOREIGN KEY(aula_id) REFERENCES aulas(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_clases_aula_fecha ON clases(aula_id, fecha)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS clase_alumnos(
            clase_id INTEGER NOT NULL,
            alumno_id INTEGER NOT NULL,
            asistio INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY(clase_id, alumno_id),
            FOREIGN KEY(clase_id) REFERENCES clases(id),
            FOREIGN KEY(alumno_id) REFERENCES alumnos(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_clase_alumnos_alumno ON clase_alumnos(alumno_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS interacciones(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            alumno_id INTEGER NOT NULL,
            tipo TEXT NOT NULL,
            descripcion TEXT,
            fecha TEXT NOT NULL,
            FOREIGN KEY(alumno_id) REFERENCES alumnos(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_interacciones_alumno ON interacciones(alumno_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS incidencias(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            aula_id INTEGER,
            descripcion TEXT NOT NULL,
            estado TEXT NOT NULL DEFAULT 'pendiente',
            fecha_reporte TEXT NOT NULL DEFAULT CURRENT_DATE,
            FOREIGN KEY(aula_id) REFERENCES aulas(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_incidencias_aula ON incidencias(aula_id)",
        [],
    )?;

    seed_initial_data(conn, admin_password)?;
    Ok(())
}

fn seed_initial_data(conn: &Connection, admin_password: &str) -> anyhow::Result<()> {
    let aulas: i64 = conn.query_row("SELECT COUNT(*) FROM aulas", [], |r| r.get(0))?;
    if aulas == 0 {
        let mut stmt =
            conn.prepare("INSERT INTO aulas(nombre, capacidad, descripcion) VALUES(?, ?, ?)")?;
        stmt.execute(("Aula 1", 10, "Aula principal"))?;
        stmt.execute(("Aula 2", 8, "Aula de práctica"))?;
        stmt.execute(("Aula 3", 6, "Aula individual"))?;
    }

    let profesores: i64 = conn.query_row("SELECT COUNT(*) FROM profesores", [], |r| r.get(0))?;
    if profesores == 0 {
        conn.execute(
            "INSERT INTO profesores(nombre, email, password) VALUES(?, ?, ?)",
            (
                "Administrador",
                "admin@escuela.com",
                auth::hash_password(admin_password),
            ),
        )?;
    }

    Ok(())
}
