//! # Errores del Servidor
//! src/error.rs
//!
//! Los errores de protocolo NO viven aquí: viajan como `status_hint` dentro
//! del `Request`. Este enum cubre lo que no es protocolo: capacidad del
//! registry, I/O, arranque del pool y configuración inválida.

use crate::http::StatusCode;

/// Errores que puede producir el servidor fuera del parsing
#[derive(Debug)]
pub enum ServerError {
    /// El registry está lleno y el path es nuevo
    RegistryFull { capacity: usize },

    /// Falla de lectura/escritura (socket o archivo temporal)
    Io(std::io::Error),

    /// No se pudo crear un thread del pool
    WorkerSpawn(std::io::Error),

    /// Valor de configuración inválido
    InvalidConfig(String),
}

impl ServerError {
    /// Código HTTP con el que se reporta el error al cliente
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::RegistryFull { .. } => StatusCode::InternalServerError,
            ServerError::Io(_) => StatusCode::InternalServerError,
            ServerError::WorkerSpawn(_) => StatusCode::InternalServerError,
            ServerError::InvalidConfig(_) => StatusCode::InternalServerError,
        }
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::RegistryFull { capacity } => {
                write!(f, "Resource registry is full (capacity: {})", capacity)
            }
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
            ServerError::WorkerSpawn(e) => write!(f, "Failed to spawn worker thread: {}", e),
            ServerError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Io(e) | ServerError::WorkerSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_full_maps_to_500() {
        let err = ServerError::RegistryFull { capacity: 10 };
        assert_eq!(err.status(), StatusCode::InternalServerError);
        assert!(err.to_string().contains("capacity: 10"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: ServerError = io.into();
        assert!(matches!(err, ServerError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_config_message() {
        let err = ServerError::InvalidConfig("workers must be >= 1".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: workers must be >= 1");
    }
}
