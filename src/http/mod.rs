//! # Módulo HTTP
//!
//! Implementa la porción de HTTP/1.1 que necesita el servidor, a nivel de
//! bytes y sin librerías de alto nivel:
//!
//! - Parsing best-effort de requests desde un único buffer
//! - Construcción y serialización de responses
//! - Tabla cerrada de status codes
//! - Streaming chunked para recursos binarios
//!
//! ### Formato de Request
//!
//! ```text
//! POST /archivo HTTP/1.1\r\n
//! Content-Type: multipart/form-data; boundary=B1\r\n
//! \r\n
//! --B1\r\n
//! Content-Disposition: form-data; name="file"\r\n
//! \r\n
//! <bytes>\r\n
//! --B1--\r\n
//! ```
//!
//! ### Formato de Response chunked
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/octet-stream\r\n
//! Transfer-Encoding: chunked\r\n
//! \r\n
//! 400\r\n<1024 bytes>\r\n
//! 0\r\n\r\n
//! ```

pub mod chunked;   // Transfer-Encoding: chunked
pub mod request;   // Parsing de requests
pub mod response;  // Construcción de responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Body, Method, ParseLimits, Request};
pub use response::Response;
pub use status::StatusCode;
