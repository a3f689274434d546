pub mod alumnos;
pub mod aulas;
pub mod auth;
pub mod clases;
pub mod core;
pub mod incidencias;
pub mod interacciones;
