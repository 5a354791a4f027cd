//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! - `tcp`: socket de escucha, acceptor y lectura de requests
//! - `pipeline`: parse → recurso → respuesta, independiente del socket

pub mod pipeline;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pipeline::Pipeline;
pub use tcp::Server;
