//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread acceptor encola cada conexión aceptada en el pool de workers.
//! Cada worker lee un request, lo pasa por el `Pipeline` y cierra la conexión.
//!
//! ## Shutdown
//!
//! El flag de stop (p. ej. activado por SIGINT) se revisa entre accepts. Al
//! activarse se detienen los workers, las conexiones que quedaron en cola se
//! cierran sin respuesta y se liberan los payloads de todos los recursos.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::request::find_subsequence;
use crate::http::StatusCode;
use crate::resources::ResourceRegistry;
use crate::server::pipeline::Pipeline;
use crate::workers::WorkerPool;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pausa del acceptor cuando no hay conexiones pendientes
const ACCEPT_POLL: Duration = Duration::from_millis(100);

/// Servidor HTTP/1.1 con pool fijo de workers
pub struct Server {
    config: Config,
    listener: TcpListener,
    registry: Arc<ResourceRegistry>,
    stop: Arc<AtomicBool>,
}

impl Server {
    /// Valida la configuración y abre el socket de escucha
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate()?;

        let listener = TcpListener::bind(config.address())?;
        listener.set_nonblocking(true)?;

        tracing::info!(address = %listener.local_addr()?, "Server listening");

        Ok(Self {
            registry: Arc::new(ResourceRegistry::new(config.registry_capacity)),
            config,
            listener,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Dirección real de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Flag que detiene el servidor al ponerse en `true`
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Registry compartido con los workers
    pub fn registry(&self) -> Arc<ResourceRegistry> {
        Arc::clone(&self.registry)
    }

    /// Acepta conexiones hasta que se active el flag de stop
    pub fn run(self) -> Result<(), ServerError> {
        let pipeline = Arc::new(Pipeline::from_config(&self.config, Arc::clone(&self.registry)));
        let buffer_size = self.config.buffer_size;
        let read_timeout = self.config.read_timeout();

        let mut pool = WorkerPool::new(self.config.workers, self.config.poll_interval(), move |stream: TcpStream| {
            handle_connection(stream, &pipeline, buffer_size, read_timeout)
        })?;

        tracing::info!(workers = pool.size(), "Worker pool started");

        while !self.stop.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    // En algunas plataformas el socket hereda el modo del listener
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!(peer = %peer, error = %e, "Cannot configure connection");
                        continue;
                    }
                    tracing::debug!(peer = %peer, queued = pool.queued(), "Connection accepted");
                    pool.submit(stream);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL),
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                    thread::sleep(ACCEPT_POLL);
                }
            }
        }

        tracing::info!("Shutdown requested, stopping workers");

        let abandoned = pool.shutdown();
        if !abandoned.is_empty() {
            tracing::warn!(count = abandoned.len(), "Closing queued connections without response");
        }

        let cleared = self.registry.clear_all();
        tracing::info!(resources = self.registry.len(), cleared, "Server stopped");

        Ok(())
    }
}

/// Atiende una conexión: un request, una respuesta
fn handle_connection(mut stream: TcpStream, pipeline: &Pipeline, buffer_size: usize, read_timeout: Option<Duration>) {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    if let Err(e) = stream.set_read_timeout(read_timeout) {
        tracing::warn!(peer = %peer, error = %e, "Cannot set read timeout");
    }

    let raw = match read_request(&mut stream, buffer_size) {
        Ok(raw) if raw.is_empty() => {
            tracing::debug!(peer = %peer, "Connection closed without data");
            return;
        }
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(peer = %peer, error = %e, "Failed to read request");
            reply_read_error(pipeline, &peer, &mut stream);
            return;
        }
    };

    tracing::debug!(peer = %peer, bytes = raw.len(), "Request received");

    if let Err(e) = pipeline.handle(&raw, &mut stream) {
        tracing::warn!(peer = %peer, error = %e, "Failed to write response");
    }

    let _ = stream.shutdown(Shutdown::Write);
}

/// 500 best-effort cuando no se pudo leer el request
///
/// Retorna si la respuesta se alcanzó a escribir.
fn reply_read_error<W: Write>(pipeline: &Pipeline, peer: &str, out: &mut W) -> bool {
    match pipeline.send_status(StatusCode::InternalServerError, out) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(peer = %peer, error = %e, "Failed to write error response");
            false
        }
    }
}

/// Lee un request en un único buffer de `buffer_size` bytes
///
/// Termina cuando los headers están completos y el body alcanzó el
/// `Content-Length` declarado, cuando el buffer se llena, en EOF o en
/// timeout (si ya se leyó algo). Lo que exceda el buffer se descarta.
pub fn read_request<R: Read>(reader: &mut R, buffer_size: usize) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; buffer_size];
    let mut filled = 0;

    while filled < buffer_size {
        let n = match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if filled > 0 && matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => break,
            Err(e) => return Err(e),
        };

        filled += n;
        if is_complete(&buffer[..filled]) {
            break;
        }
    }

    buffer.truncate(filled);
    Ok(buffer)
}

/// ¿Ya llegaron los headers y todo el body declarado?
fn is_complete(data: &[u8]) -> bool {
    let Some(end) = find_subsequence(data, b"\r\n\r\n") else {
        return false;
    };

    let received = data.len() - (end + 4);
    received >= declared_length(&data[..end]).unwrap_or(0)
}

/// `Content-Length` de la cabecera cruda, si es válido
fn declared_length(head: &[u8]) -> Option<usize> {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .skip(1)
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
}
