//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API para construir respuestas HTTP/1.1
//! y convertirlas a bytes para enviar al cliente.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Server: resource_server/0.1.0\r\n
//! Content-Length: 4\r\n
//! \r\n
//! bar\n
//! ```
//!
//! Convenciones:
//! - `set_body` siempre agrega un `\n` final y lo cuenta en el largo.
//! - `Content-Length` se agrega al final, justo antes de serializar.
//! - Las respuestas chunked usan `head_bytes` y nunca llevan `Content-Length`.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use resource_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body(b"bar");
//!
//! let bytes = response.into_bytes();
//! assert!(bytes.ends_with(b"Content-Length: 4\r\n\r\nbar\n"));
//! ```

use super::StatusCode;

/// Versión HTTP de todas las respuestas
const HTTP_VERSION: &str = "HTTP/1.1";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta genérica: el body es la reason phrase
    ///
    /// 204 nunca lleva body.
    ///
    /// # Ejemplo
    /// ```
    /// use resource_server::http::{Response, StatusCode};
    ///
    /// let response = Response::for_status(StatusCode::NotFound);
    /// assert_eq!(response.body(), b"Not Found\n");
    /// ```
    pub fn for_status(status: StatusCode) -> Self {
        let mut response = Self::new(status);
        if status != StatusCode::NoContent {
            response.set_body(status.reason_phrase().as_bytes());
        }
        response
    }

    /// Agrega un header (builder)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header al final de la lista
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Establece el body (builder)
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.set_body(body);
        self
    }

    /// Reemplaza el body, agregando un `\n` final
    pub fn set_body(&mut self, body: &[u8]) {
        let mut owned = Vec::with_capacity(body.len() + 1);
        owned.extend_from_slice(body);
        owned.push(b'\n');
        self.body = owned;
    }

    /// Largo exacto de la serialización
    fn serialized_len(&self, include_body: bool) -> usize {
        let status_line = format!("{} {}\r\n", HTTP_VERSION, self.status);
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + 2 + value.len() + 2)
            .sum();
        let body = if include_body { self.body.len() } else { 0 };

        status_line.len() + headers + 2 + body
    }

    /// Escribe status line, headers y línea vacía
    fn write_head(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("{} {}\r\n", HTTP_VERSION, self.status).as_bytes());
        for (name, value) in &self.headers {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            out.extend_from_slice(value.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");
    }

    /// Serializa tal cual, sin tocar los headers
    ///
    /// El buffer se reserva con el largo exacto antes de escribir.
    pub fn to_bytes(&self) -> Vec<u8> {
        let total = self.serialized_len(true);
        let mut out = Vec::with_capacity(total);

        self.write_head(&mut out);
        out.extend_from_slice(&self.body);

        debug_assert_eq!(out.len(), total);
        out
    }

    /// Agrega `Content-Length` como último header y serializa
    pub fn into_bytes(mut self) -> Vec<u8> {
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self.to_bytes()
    }

    /// Sólo la cabecera (para respuestas chunked)
    pub fn head_bytes(&self) -> Vec<u8> {
        let total = self.serialized_len(false);
        let mut out = Vec::with_capacity(total);
        self.write_head(&mut out);
        out
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene los headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el valor de un header (primera ocurrencia)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header_name, _)| header_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Largo del body (incluye el `\n` final)
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_set_body_appends_newline() {
        let response = Response::new(StatusCode::Ok).with_body(b"bar");
        assert_eq!(response.body(), b"bar\n");
        assert_eq!(response.body_len(), 4);
    }

    #[test]
    fn test_set_body_replaces_previous() {
        let mut response = Response::new(StatusCode::Ok).with_body(b"first body");
        response.set_body(b"x");
        assert_eq!(response.body(), b"x\n");
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("Server", "test")
            .with_header("X-Custom", "value");

        let names: Vec<&str> = response.headers().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "Server", "X-Custom"]);
        assert_eq!(response.header("Server"), Some("test"));
    }

    #[test]
    fn test_into_bytes_content_length_last() {
        let bytes = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body(b"Test")
            .into_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nTest\n"
        );
    }

    #[test]
    fn test_no_content_has_zero_length() {
        let bytes = Response::for_status(StatusCode::NoContent).into_bytes();
        assert_eq!(bytes, b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_for_status_error_body() {
        let response = Response::for_status(StatusCode::PreconditionFailed);
        assert_eq!(response.body(), b"Precondition Failed\n");

        let unknown = Response::for_status(StatusCode::Other(299));
        assert_eq!(unknown.body(), b"Unknown Status\n");
    }

    #[test]
    fn test_to_bytes_exact_capacity() {
        let response = Response::new(StatusCode::NotFound)
            .with_header("A", "1")
            .with_body(&[0u8, 1, 2, 255]);
        let bytes = response.to_bytes();

        assert_eq!(bytes.len(), response.serialized_len(true));
        assert!(bytes.ends_with(&[0u8, 1, 2, 255, b'\n']));
    }

    #[test]
    fn test_head_bytes_omit_body_and_length() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "application/octet-stream")
            .with_header("Transfer-Encoding", "chunked");
        let text = String::from_utf8(response.head_bytes()).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nTransfer-Encoding: chunked\r\n\r\n"
        );
        assert!(!text.contains("Content-Length"));
    }
}
