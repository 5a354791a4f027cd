//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./resource_server --port 8080 \
//!   --workers 6 \
//!   --registry-capacity 64 \
//!   --buffer-size 65536
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 WORKERS=8 LOG_LEVEL=debug ./resource_server
//! ```

use crate::error::ServerError;
use crate::http::ParseLimits;
use clap::Parser;
use std::time::Duration;

/// Tamaño mínimo aceptado para el buffer de lectura
const MIN_BUFFER_SIZE: usize = 64;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "resource_server")]
#[command(about = "Servidor HTTP/1.1 concurrente donde cada path es un recurso mutable")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    // === Workers ===

    /// Número de threads del pool
    #[arg(short, long, default_value = "6", env = "WORKERS")]
    pub workers: usize,

    /// Intervalo de espera de los workers en la cola (ms)
    #[arg(long = "poll-interval-ms", default_value = "1000", env = "POLL_INTERVAL_MS")]
    pub poll_interval_ms: u64,

    // === Registry ===

    /// Cantidad máxima de paths distintos
    #[arg(long = "registry-capacity", default_value = "64", env = "REGISTRY_CAPACITY")]
    pub registry_capacity: usize,

    // === Límites del protocolo ===

    /// Tamaño del buffer de lectura por request (bytes)
    #[arg(long = "buffer-size", default_value = "65536", env = "BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Cantidad máxima de headers recolectados
    #[arg(long = "max-headers", default_value = "20", env = "MAX_HEADERS")]
    pub max_headers: usize,

    /// Largo máximo de una línea de header
    #[arg(long = "max-header-length", default_value = "200", env = "MAX_HEADER_LENGTH")]
    pub max_header_length: usize,

    /// Largo máximo del path (se trunca)
    #[arg(long = "max-path-length", default_value = "255", env = "MAX_PATH_LENGTH")]
    pub max_path_length: usize,

    /// Tamaño de cada chunk al enviar binarios
    #[arg(long = "chunk-size", default_value = "1024", env = "CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Timeout de lectura del socket (ms)
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Logging ===

    /// Nivel de log (trace, debug, info, warn, error). RUST_LOG tiene prioridad.
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI y entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use resource_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ServerError> {
        let invalid = |msg: &str| Err(ServerError::InvalidConfig(msg.to_string()));

        if self.workers == 0 {
            return invalid("workers must be >= 1");
        }
        if self.registry_capacity == 0 {
            return invalid("registry capacity must be >= 1");
        }
        if self.buffer_size < MIN_BUFFER_SIZE {
            return invalid("buffer size must be >= 64 bytes");
        }
        if self.chunk_size == 0 {
            return invalid("chunk size must be >= 1");
        }
        if self.max_headers == 0 {
            return invalid("max headers must be >= 1");
        }
        if self.max_header_length == 0 {
            return invalid("max header length must be >= 1");
        }
        if self.max_path_length == 0 {
            return invalid("max path length must be >= 1");
        }
        if self.poll_interval_ms == 0 {
            return invalid("poll interval must be >= 1 ms");
        }

        Ok(())
    }

    /// Límites que usa el parser
    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_path_len: self.max_path_length,
            max_headers: self.max_headers,
            max_header_len: self.max_header_length,
        }
    }

    /// Intervalo de espera de los workers
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Timeout de lectura del socket (`None` si es 0)
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!(
            address = %self.address(),
            workers = self.workers,
            registry_capacity = self.registry_capacity,
            buffer_size = self.buffer_size,
            chunk_size = self.chunk_size,
            "Server configuration"
        );
        tracing::debug!(
            max_headers = self.max_headers,
            max_header_length = self.max_header_length,
            max_path_length = self.max_path_length,
            poll_interval_ms = self.poll_interval_ms,
            read_timeout_ms = self.read_timeout_ms,
            "Protocol limits"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            workers: 6,
            poll_interval_ms: 1000,
            registry_capacity: 64,
            buffer_size: 65536,
            max_headers: 20,
            max_header_length: 200,
            max_path_length: 255,
            chunk_size: 1024,
            read_timeout_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}
