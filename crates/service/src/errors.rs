use thiserror::Error;

pub const ARTIST_NOT_FOUND: &str = "Artista não encontrado";
pub const ARTIST_EXISTS: &str = "Artista já existe!";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad request input: path segment or payload shape.
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    /// Stored data that cannot be interpreted, e.g. a non-numeric `Index` cell.
    #[error("malformed data: {0}")]
    Malformed(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn artist_not_found() -> Self { Self::NotFound(ARTIST_NOT_FOUND.into()) }

    pub fn artist_exists() -> Self { Self::Conflict(ARTIST_EXISTS.into()) }

    /// Message suitable for a client-facing `{"erro": ...}` body.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(m) | ServiceError::NotFound(m) | ServiceError::Conflict(m) => m.clone(),
            ServiceError::Malformed(m) => format!("dados inválidos no arquivo: {m}"),
            ServiceError::Storage(_) => "erro interno de armazenamento".into(),
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self { Self::Storage(e.to_string()) }
}

impl From<csv::Error> for ServiceError {
    fn from(e: csv::Error) -> Self { Self::Storage(e.to_string()) }
}
