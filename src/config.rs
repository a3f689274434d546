use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub admin_password: String,
}

impl Config {
    /// Reads settings from the environment (a `.env` file is honored).
    /// Everything has a default so a bare `escuelad` starts a usable server.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let db_path = std::env::var("ESCUELAD_DB")
            .unwrap_or_else(|_| "data/escuela-musica.db".to_string())
            .into();
        let port: u16 = match std::env::var("PORT") {
            Ok(v) => v.parse().context("PORT must be a port number")?,
            Err(_) => 3000,
        };
        let admin_password = std::env::var("ESCUELAD_ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin123".to_string());

        Ok(Self {
            db_path,
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            admin_password,
        })
    }
}
