pub mod alumnos;
pub mod api;
pub mod aulas;
pub mod auth;
pub mod clases;
pub mod config;
pub mod db;
pub mod error;
pub mod horario;
pub mod incidencias;
pub mod interacciones;
