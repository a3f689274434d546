use chrono::{Duration, Utc};
use rusqlite::Connection;

use escuelad::auth::{self, TokenStore};
use escuelad::error::Error;

fn test_db() -> Connection {
    escuelad::db::open_in_memory("admin123").expect("open in-memory db")
}

#[test]
fn seeded_admin_can_log_in() {
    let conn = test_db();
    let profesor = auth::login(&conn, "admin@escuela.com", "admin123").expect("admin login");
    assert_eq!(profesor.email, "admin@escuela.com");
    assert_eq!(profesor.nombre, "Administrador");
}

#[test]
fn wrong_password_and_unknown_email_look_the_same() {
    let conn = test_db();
    let e1 = auth::login(&conn, "admin@escuela.com", "nope").expect_err("wrong password");
    let e2 = auth::login(&conn, "nadie@escuela.com", "nope").expect_err("unknown email");
    assert!(matches!(e1, Error::Unauthorized(m) if m == "credenciales inválidas"));
    assert!(matches!(e2, Error::Unauthorized(m) if m == "credenciales inválidas"));
}

#[test]
fn register_validates_and_rejects_duplicates() {
    let conn = test_db();
    assert!(matches!(
        auth::register(&conn, "Ana", "sin-arroba", "secreto1"),
        Err(Error::BadRequest(_))
    ));
    assert!(matches!(
        auth::register(&conn, "Ana", "ana@escuela.com", "corta"),
        Err(Error::BadRequest(_))
    ));
    assert!(matches!(
        auth::register(&conn, "", "ana@escuela.com", "secreto1"),
        Err(Error::BadRequest(_))
    ));

    let id = auth::register(&conn, "Ana", "ana@escuela.com", "secreto1").expect("register");
    assert!(matches!(
        auth::register(&conn, "Otra Ana", "ana@escuela.com", "secreto2"),
        Err(Error::BadRequest(_))
    ));

    let profesor = auth::login(&conn, "ana@escuela.com", "secreto1").expect("login after register");
    assert_eq!(profesor.id, id);
}

#[test]
fn password_hashes_are_salted_and_verifiable() {
    let h1 = auth::hash_password("secreto1");
    let h2 = auth::hash_password("secreto1");
    assert_ne!(h1, h2, "salts must differ");
    assert!(auth::verify_password(&h1, "secreto1"));
    assert!(auth::verify_password(&h2, "secreto1"));
    assert!(!auth::verify_password(&h1, "secreto2"));
    assert!(!auth::verify_password("sin-formato", "secreto1"));
}

#[test]
fn tokens_round_trip_and_revoke() {
    let tokens = TokenStore::new();
    let t = tokens.issue(7);
    assert_eq!(tokens.verify(&t), Some(7));
    tokens.revoke(&t);
    assert_eq!(tokens.verify(&t), None);
    assert_eq!(tokens.verify("no-such-token"), None);
}

#[test]
fn expired_tokens_are_rejected_and_dropped() {
    let tokens = TokenStore::new();
    let t = tokens.issue_with_expiry(7, Utc::now() - Duration::minutes(1));
    assert_eq!(tokens.verify(&t), None);
    // Second lookup also misses: the store evicted it.
    assert_eq!(tokens.verify(&t), None);
}

#[test]
fn profesor_lookup_reports_missing_accounts() {
    let conn = test_db();
    assert!(matches!(
        auth::get_profesor(&conn, 999),
        Err(Error::NotFound("profesor"))
    ));
    let admin = auth::get_profesor(&conn, 1).expect("seeded admin");
    assert_eq!(admin.email, "admin@escuela.com");
}
