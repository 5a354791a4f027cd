//! # Códigos de Estado HTTP
//!
//! Tabla cerrada de códigos que emite el servidor. Cada variante se mapea
//! una sola vez a su par (código, reason phrase):
//!
//! - **2xx**: Éxito (200, 204)
//! - **4xx**: Error del cliente (400, 404, 412, 415)
//! - **5xx**: Error del servidor (500)
//!
//! Cualquier otro código cae en `Other` y se reporta como "Unknown Status".

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok,

    /// 204 No Content - El recurso tenía datos y fueron eliminados
    NoContent,

    /// 400 Bad Request - Upload multipart malformado
    BadRequest,

    /// 404 Not Found - El recurso no tiene contenido
    NotFound,

    /// 412 Precondition Failed - Falta Content-Length y Content-Type
    PreconditionFailed,

    /// 415 Unsupported Media Type - Content-Type no soportado
    UnsupportedMediaType,

    /// 500 Internal Server Error - Registry lleno o error de I/O
    InternalServerError,

    /// Cualquier otro código
    Other(u16),
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use resource_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::PreconditionFailed => 412,
            StatusCode::UnsupportedMediaType => 415,
            StatusCode::InternalServerError => 500,
            StatusCode::Other(code) => *code,
        }
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use resource_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Other(299).reason_phrase(), "Unknown Status");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::PreconditionFailed => "Precondition Failed",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::Other(_) => "Unknown Status",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
