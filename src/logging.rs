//! # Logging
//! src/logging.rs
//!
//! Instala un subscriber de `tracing` con salida formateada. Si `RUST_LOG`
//! está definido tiene prioridad sobre el nivel configurado.

use tracing_subscriber::EnvFilter;

/// Inicializa el subscriber global
///
/// Llamarlo más de una vez no falla: el segundo intento se ignora.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}
