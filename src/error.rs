use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the service layer. The API layer maps each variant
/// to an HTTP status in `api::error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("hora_inicio must be earlier than hora_fin")]
    InvalidInterval,

    /// The requested slot overlaps an existing class in the same room/date.
    /// Carries one colliding class id.
    #[error("room already booked by class {clase_id}")]
    SchedulingConflict { clase_id: i64 },

    #[error("{0} not found")]
    NotFound(&'static str),

    /// A referenced row (aula, alumno) does not exist. Detected before any
    /// write, so the caller sees no partial state.
    #[error("unknown {0} id")]
    UnknownReference(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
}
