//! # Pipeline de Requests
//! src/server/pipeline.rs
//!
//! ```text
//! bytes → parse → find_or_create → operación sobre el recurso → response → write
//! ```
//!
//! El pipeline no conoce sockets: escribe sobre cualquier `Write`. Todo camino
//! termina en una respuesta HTTP bien formada.

use crate::config::Config;
use crate::error::ServerError;
use crate::http::{chunked, Body, Method, ParseLimits, Request, Response, StatusCode};
use crate::resources::{BinaryFile, Payload, Resource, ResourceRegistry};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!("resource_server/", env!("CARGO_PKG_VERSION"));

/// Procesa requests contra el registry
pub struct Pipeline {
    registry: Arc<ResourceRegistry>,
    limits: ParseLimits,
    chunk_size: usize,
}

impl Pipeline {
    pub fn new(registry: Arc<ResourceRegistry>, limits: ParseLimits, chunk_size: usize) -> Self {
        Self {
            registry,
            limits,
            chunk_size,
        }
    }

    /// Construye el pipeline con los límites de la configuración
    pub fn from_config(config: &Config, registry: Arc<ResourceRegistry>) -> Self {
        Self::new(registry, config.parse_limits(), config.chunk_size)
    }

    /// Registry compartido
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Procesa un request completo y escribe la respuesta en `out`
    ///
    /// Retorna el status enviado. Un `Err` significa que la respuesta no se
    /// pudo escribir; la conexión debe abandonarse.
    pub fn handle<W: Write>(&self, raw: &[u8], out: &mut W) -> io::Result<StatusCode> {
        let start = Instant::now();
        let mut request = Request::parse(raw, &self.limits);

        tracing::debug!(
            method = request.method().as_str(),
            path = request.path(),
            version = request.version(),
            headers = request.headers().len(),
            hint = %request.status_hint(),
            "Request parsed"
        );

        let status = match self.registry.find_or_create(request.path()) {
            Ok(resource) => self.dispatch(&mut request, &resource, out)?,
            Err(e) => {
                tracing::error!(path = request.path(), error = %e, "Cannot register resource");
                self.send_status(e.status(), out)?
            }
        };

        tracing::info!(
            method = request.method().as_str(),
            path = request.path(),
            status = status.as_u16(),
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Request handled"
        );

        Ok(status)
    }

    /// Despacha según el método
    fn dispatch<W: Write>(&self, request: &mut Request<'_>, resource: &Resource, out: &mut W) -> io::Result<StatusCode> {
        match request.method().clone() {
            Method::GET => self.respond_get(resource, out),
            Method::DELETE => {
                let status = if resource.clear() {
                    StatusCode::NoContent
                } else {
                    StatusCode::NotFound
                };
                request.set_status_hint(status);
                self.send_status(status, out)
            }
            ref method if method.requires_body() => {
                let status = self.apply_body(request, resource);
                self.send_status(status, out)
            }
            _ => self.send_status(request.status_hint(), out),
        }
    }

    /// Guarda el body del request si la validación lo permitió
    fn apply_body(&self, request: &Request<'_>, resource: &Resource) -> StatusCode {
        let hint = request.status_hint();
        if !hint.is_success() {
            return hint;
        }

        match request.body() {
            Body::None => hint,
            Body::Text(bytes) => {
                resource.write_text(bytes);
                hint
            }
            Body::Binary(bytes) => match resource.write_binary(bytes) {
                Ok(()) => hint,
                Err(e) => {
                    tracing::warn!(path = resource.path(), error = %e, "Failed to store binary payload");
                    ServerError::from(e).status()
                }
            },
        }
    }

    /// GET: el lock del recurso se mantiene durante todo el streaming binario
    fn respond_get<W: Write>(&self, resource: &Resource, out: &mut W) -> io::Result<StatusCode> {
        let mut payload = resource.lock();

        let response = match &mut *payload {
            Payload::Binary(file) => return self.stream_binary(file, out),
            Payload::Text(bytes) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", text_content_type(bytes))
                .with_header("Server", SERVER_NAME)
                .with_body(bytes),
            Payload::Empty => Response::for_status(StatusCode::NotFound),
        };

        // La copia ya está hecha: el socket se escribe sin el lock
        drop(payload);
        self.send(response, out)
    }

    /// Envía la cabecera y el archivo como chunks
    fn stream_binary<W: Write>(&self, file: &mut BinaryFile, out: &mut W) -> io::Result<StatusCode> {
        let head = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_header("Transfer-Encoding", "chunked");
        out.write_all(&head.head_bytes())?;

        let sent = chunked::stream(file.reader()?, &mut *out, self.chunk_size)?;
        tracing::debug!(bytes = sent, "Binary payload streamed");

        Ok(StatusCode::Ok)
    }

    /// Respuesta genérica para un status (reason phrase como body)
    pub fn send_status<W: Write>(&self, status: StatusCode, out: &mut W) -> io::Result<StatusCode> {
        self.send(Response::for_status(status), out)
    }

    fn send<W: Write>(&self, response: Response, out: &mut W) -> io::Result<StatusCode> {
        let status = response.status();
        out.write_all(&response.into_bytes())?;
        out.flush()?;
        Ok(status)
    }
}

/// `application/json` si el texto es un objeto o arreglo JSON
fn text_content_type(bytes: &[u8]) -> &'static str {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Object(_)) | Ok(serde_json::Value::Array(_)) => "application/json",
        _ => "text/plain",
    }
}
