//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser best-effort sobre un único buffer de tamaño fijo. Nunca falla:
//! los problemas de protocolo quedan codificados en `status_hint`, que el
//! pipeline convierte después en una respuesta.
//!
//! ## Formato de un Request
//!
//! ```text
//! PUT /notas HTTP/1.1\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hola!
//! ```
//!
//! ## Etapas
//!
//! 1. **Request Line**: `METHOD PATH VERSION`, tokens truncados (no rechazados)
//! 2. **Headers**: líneas guardadas tal cual hasta la línea vacía
//! 3. **Validación**: POST/PUT/PATCH necesitan `Content-Length` o `Content-Type`
//! 4. **Body**: texto (resto del buffer) o binario (payload multipart)

use super::StatusCode;

/// Longitud máxima del token de método
pub const MAX_METHOD_LEN: usize = 9;

/// Longitud máxima del token de versión
pub const MAX_VERSION_LEN: usize = 9;

/// Content-Types aceptados como payload de texto
const TEXT_CONTENT_TYPES: [&str; 6] = [
    "text/plain",
    "text/html",
    "text/css",
    "text/javascript",
    "application/json",
    "application/xml",
];

/// Límites aplicados durante el parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Longitud máxima del path (se trunca si es mayor)
    pub max_path_len: usize,

    /// Cantidad máxima de headers recolectados
    pub max_headers: usize,

    /// Longitud máxima de una línea de header
    pub max_header_len: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_path_len: 255,
            max_headers: 20,
            max_header_len: 200,
        }
    }
}

/// Métodos HTTP reconocidos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Leer el contenido del recurso
    GET,

    /// POST - Escribir el recurso
    POST,

    /// PUT - Reemplazar el recurso
    PUT,

    /// PATCH - Reemplazar el recurso
    PATCH,

    /// DELETE - Vaciar el recurso
    DELETE,

    /// Cualquier otro token (incluido el vacío)
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::Other(token) => token,
        }
    }

    /// POST, PUT y PATCH exigen body
    pub fn requires_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// Body extraído del request, como vista sobre el buffer de entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    /// Sin body (o body vacío)
    None,

    /// Body de texto: todo lo que sigue a la línea vacía
    Text(&'a [u8]),

    /// Payload de un upload multipart/form-data
    Binary(&'a [u8]),
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request<'a> {
    /// Método HTTP
    method: Method,

    /// Path del request, clave del recurso
    path: String,

    /// Versión HTTP tal como llegó
    version: String,

    /// Líneas de header verbatim ("Name: Value"), en orden de llegada
    headers: Vec<String>,

    /// Valor de Content-Type (primera ocurrencia)
    content_type: Option<String>,

    /// Valor de Content-Length (primera ocurrencia, si es numérico)
    content_length: Option<usize>,

    /// Body extraído
    body: Body<'a>,

    /// Código preliminar decidido durante el parsing
    status_hint: StatusCode,
}

impl<'a> Request<'a> {
    /// Parsea un request desde el buffer leído del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use resource_server::http::request::{Body, ParseLimits, Request};
    /// use resource_server::http::StatusCode;
    ///
    /// let raw = b"PUT /foo HTTP/1.1\r\nContent-Type: text/plain\r\n\r\nbar";
    /// let request = Request::parse(raw, &ParseLimits::default());
    ///
    /// assert_eq!(request.path(), "/foo");
    /// assert_eq!(request.body(), Body::Text(b"bar"));
    /// assert_eq!(request.status_hint(), StatusCode::Ok);
    /// ```
    pub fn parse(buffer: &'a [u8], limits: &ParseLimits) -> Self {
        let mut request = Request {
            method: Method::Other(String::new()),
            path: String::new(),
            version: String::new(),
            headers: Vec::new(),
            content_type: None,
            content_length: None,
            body: Body::None,
            status_hint: StatusCode::Ok,
        };

        // 1. Request line. Sin CRLF quedan method y path vacíos.
        let mut cursor = 0;
        if let Some(end) = find_subsequence(buffer, b"\r\n") {
            request.parse_request_line(&buffer[..end], limits);
            cursor = end + 2;
        }

        // 2. Headers
        let body_start = request.collect_headers(buffer, cursor, limits);

        // 3. Sólo POST/PUT/PATCH consultan el body
        if !request.method.requires_body() {
            return request;
        }

        // 4. Validación de metadatos del body
        let has_content_length = request.scan_body_headers();
        if !has_content_length && request.content_type.is_none() {
            request.status_hint = StatusCode::PreconditionFailed;
            return request;
        }

        // 5-6. Extracción del body
        let content_type = match request.content_type.clone() {
            Some(content_type) => content_type,
            None => {
                request.status_hint = StatusCode::UnsupportedMediaType;
                return request;
            }
        };

        let remainder = body_start.map(|start| &buffer[start..]).unwrap_or(&[]);

        if content_type.to_ascii_lowercase().contains("multipart/form-data") {
            match extract_boundary(&content_type)
                .and_then(|boundary| extract_multipart_payload(remainder, boundary.as_bytes()))
            {
                Some(payload) => request.body = Body::Binary(payload),
                None => request.status_hint = StatusCode::BadRequest,
            }
        } else if is_text_content_type(&content_type) {
            if !remainder.is_empty() {
                request.body = Body::Text(remainder);
            }
        } else {
            request.status_hint = StatusCode::UnsupportedMediaType;
        }

        request
    }

    /// Tokeniza `METHOD PATH VERSION`
    fn parse_request_line(&mut self, line: &[u8], limits: &ParseLimits) {
        let line = String::from_utf8_lossy(line);
        let mut tokens = line.split_whitespace();

        if let Some(method) = tokens.next() {
            self.method = Method::from_token(truncate_token(method, MAX_METHOD_LEN));
        }
        if let Some(path) = tokens.next() {
            self.path = truncate_token(path, limits.max_path_len).to_string();
        }
        if let Some(version) = tokens.next() {
            self.version = truncate_token(version, MAX_VERSION_LEN).to_string();
        }
    }

    /// Recolecta headers desde `cursor` y retorna el inicio del body
    ///
    /// Al superar los límites se deja de recolectar, pero se sigue buscando
    /// la línea vacía para ubicar el body.
    fn collect_headers(&mut self, buffer: &[u8], mut cursor: usize, limits: &ParseLimits) -> Option<usize> {
        let mut collecting = true;

        while cursor <= buffer.len() {
            let rest = &buffer[cursor..];
            if rest.starts_with(b"\r\n") {
                return Some(cursor + 2);
            }

            let end = find_subsequence(rest, b"\r\n")?;

            if collecting {
                if self.headers.len() >= limits.max_headers || end > limits.max_header_len {
                    collecting = false;
                } else {
                    self.headers.push(String::from_utf8_lossy(&rest[..end]).into_owned());
                }
            }

            cursor += end + 2;
        }

        None
    }

    /// Busca Content-Length y Content-Type; la primera ocurrencia gana
    ///
    /// Retorna si Content-Length estaba presente.
    fn scan_body_headers(&mut self) -> bool {
        let mut has_content_length = false;

        for line in &self.headers {
            let Some((name, value)) = split_header(line) else {
                continue;
            };

            match name {
                "Content-Length" if !has_content_length => {
                    has_content_length = true;
                    self.content_length = value.trim().parse().ok();
                }
                "Content-Type" if self.content_type.is_none() => {
                    self.content_type = Some(value.to_string());
                }
                _ => {}
            }
        }

        has_content_length
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene las líneas de header tal como llegaron
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Obtiene el valor de un header (primera ocurrencia, nombre exacto)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter_map(|line| split_header(line))
            .find(|(header_name, _)| *header_name == name)
            .map(|(_, value)| value)
    }

    /// Content-Type declarado
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content-Length declarado
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Obtiene el body extraído
    pub fn body(&self) -> Body<'a> {
        self.body
    }

    /// Código preliminar
    pub fn status_hint(&self) -> StatusCode {
        self.status_hint
    }

    /// Reemplaza el código preliminar (DELETE lo decide el pipeline)
    pub fn set_status_hint(&mut self, status: StatusCode) {
        self.status_hint = status;
    }
}

/// Separa "Name: Value" quitando los espacios iniciales del valor
fn split_header(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    Some((&line[..colon], line[colon + 1..].trim_start_matches(' ')))
}

/// Trunca un token a `max` bytes respetando límites de caracter
fn truncate_token(token: &str, max: usize) -> &str {
    if token.len() <= max {
        return token;
    }
    let mut end = max;
    while !token.is_char_boundary(end) {
        end -= 1;
    }
    &token[..end]
}

/// Compara el media type (antes de cualquier `;`) contra la lista de texto
fn is_text_content_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or("").trim();
    TEXT_CONTENT_TYPES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(media_type))
}

/// Extrae el parámetro `boundary=` quitando comillas
fn extract_boundary(content_type: &str) -> Option<String> {
    let start = content_type.find("boundary=")? + "boundary=".len();
    let raw = &content_type[start..];

    let boundary = if let Some(quoted) = raw.strip_prefix('"') {
        quoted.split('"').next().unwrap_or("")
    } else {
        raw.split(|c: char| c == ';' || c.is_whitespace()).next().unwrap_or("")
    };

    if boundary.is_empty() {
        None
    } else {
        Some(boundary.to_string())
    }
}

/// Ubica el archivo dentro de un body multipart
///
/// El payload empieza tras el primer CRLFCRLF posterior al boundary y
/// termina 4 bytes antes de la siguiente aparición del boundary (CRLF + `--`).
fn extract_multipart_payload<'a>(body: &'a [u8], boundary: &[u8]) -> Option<&'a [u8]> {
    let marker = find_subsequence(body, boundary)?;
    let after_marker = marker + boundary.len();
    let headers_end = find_subsequence(&body[after_marker..], b"\r\n\r\n")?;
    let start = after_marker + headers_end + 4;

    let next_marker = find_subsequence(&body[start..], boundary)?;
    let end = (start + next_marker).saturating_sub(4).max(start);

    Some(&body[start..end])
}

/// Primera posición de `needle` dentro de `haystack`
pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[u8]) -> Request<'_> {
        Request::parse(raw, &ParseLimits::default())
    }

    #[test]
    fn test_parse_simple_get() {
        let request = parse(b"GET /foo HTTP/1.1\r\n\r\n");

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/foo");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.body(), Body::None);
        assert_eq!(request.status_hint(), StatusCode::Ok);
    }

    #[test]
    fn test_get_ignores_body() {
        let request = parse(b"GET /foo HTTP/1.1\r\nContent-Type: text/plain\r\n\r\nignored");
        assert_eq!(request.body(), Body::None);
    }

    #[test]
    fn test_parse_with_headers_in_order() {
        let request = parse(b"GET / HTTP/1.1\r\nHost: localhost\r\nX-A: 1\r\nX-A: 2\r\n\r\n");

        assert_eq!(request.headers(), &["Host: localhost", "X-A: 1", "X-A: 2"]);
        assert_eq!(request.header("Host"), Some("localhost"));
        assert_eq!(request.header("X-A"), Some("1"));
    }

    #[test]
    fn test_put_text_body() {
        let request = parse(b"PUT /foo HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nbar");

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.content_length(), Some(3));
        assert_eq!(request.content_type(), Some("text/plain"));
        assert_eq!(request.body(), Body::Text(b"bar"));
        assert_eq!(request.status_hint(), StatusCode::Ok);
    }

    #[test]
    fn test_post_without_metadata_is_412() {
        let request = parse(b"POST /foo HTTP/1.1\r\nHost: x\r\n\r\nbar");

        assert_eq!(request.status_hint(), StatusCode::PreconditionFailed);
        assert_eq!(request.body(), Body::None);
    }

    #[test]
    fn test_content_length_only_is_415() {
        let request = parse(b"POST /foo HTTP/1.1\r\nContent-Length: 3\r\n\r\nbar");
        assert_eq!(request.status_hint(), StatusCode::UnsupportedMediaType);
    }

    #[test]
    fn test_unsupported_content_type_is_415() {
        let request = parse(b"PATCH /foo HTTP/1.1\r\nContent-Type: image/png\r\nContent-Length: 3\r\n\r\nbar");

        assert_eq!(request.status_hint(), StatusCode::UnsupportedMediaType);
        assert_eq!(request.body(), Body::None);
    }

    #[test]
    fn test_content_type_with_charset_is_text() {
        let request = parse(b"POST /j HTTP/1.1\r\nContent-Type: application/json; charset=utf-8\r\n\r\n{}");
        assert_eq!(request.body(), Body::Text(b"{}"));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let request = parse(b"POST /foo HTTP/1.1\r\ncontent-type: text/plain\r\n\r\nbar");
        assert_eq!(request.status_hint(), StatusCode::PreconditionFailed);
    }

    #[test]
    fn test_first_content_type_wins() {
        let request = parse(
            b"POST /foo HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Type: image/png\r\n\r\nbar",
        );
        assert_eq!(request.content_type(), Some("text/plain"));
        assert_eq!(request.body(), Body::Text(b"bar"));
    }

    #[test]
    fn test_header_value_leading_spaces_trimmed() {
        let request = parse(b"POST /foo HTTP/1.1\r\nContent-Type:    text/html\r\n\r\n<p>");
        assert_eq!(request.content_type(), Some("text/html"));
    }

    #[test]
    fn test_empty_body_is_none() {
        let request = parse(b"PUT /foo HTTP/1.1\r\nContent-Type: text/plain\r\n\r\n");
        assert_eq!(request.body(), Body::None);
        assert_eq!(request.status_hint(), StatusCode::Ok);
    }

    #[test]
    fn test_multipart_payload() {
        let raw = b"POST /up HTTP/1.1\r\n\
Content-Type: multipart/form-data; boundary=B1\r\n\
Content-Length: 99\r\n\
\r\n\
--B1\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"a.bin\"\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
\x00\x01\x02binary\xff\r\n\
--B1--\r\n";
        let request = parse(raw);

        assert_eq!(request.status_hint(), StatusCode::Ok);
        assert_eq!(request.body(), Body::Binary(b"\x00\x01\x02binary\xff"));
    }

    #[test]
    fn test_multipart_quoted_boundary() {
        let raw = b"POST /up HTTP/1.1\r\n\
Content-Type: multipart/form-data; boundary=\"xyz\"\r\n\
\r\n\
--xyz\r\n\
Content-Disposition: form-data; name=\"f\"\r\n\
\r\n\
data\r\n\
--xyz--\r\n";
        let request = parse(raw);
        assert_eq!(request.body(), Body::Binary(b"data"));
    }

    #[test]
    fn test_multipart_without_boundary_is_400() {
        let raw = b"POST /up HTTP/1.1\r\nContent-Type: multipart/form-data\r\n\r\n--x\r\n\r\ndata\r\n--x--";
        let request = parse(raw);
        assert_eq!(request.status_hint(), StatusCode::BadRequest);
        assert_eq!(request.body(), Body::None);
    }

    #[test]
    fn test_multipart_missing_closing_boundary_is_400() {
        let raw = b"POST /up HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=B1\r\n\r\n--B1\r\n\r\ndata";
        let request = parse(raw);
        assert_eq!(request.status_hint(), StatusCode::BadRequest);
    }

    #[test]
    fn test_no_crlf_leaves_empty_method_and_path() {
        let request = parse(b"garbage without line end");

        assert_eq!(request.method(), &Method::Other(String::new()));
        assert_eq!(request.path(), "");
        assert_eq!(request.status_hint(), StatusCode::Ok);
    }

    #[test]
    fn test_tokens_are_truncated() {
        let long_path = format!("/{}", "a".repeat(300));
        let raw = format!("VERYLONGMETHOD {} HTTP/1.1-extra\r\n\r\n", long_path);
        let request = parse(raw.as_bytes());

        assert_eq!(request.method().as_str(), "VERYLONGM");
        assert_eq!(request.path().len(), 255);
        assert_eq!(request.version(), "HTTP/1.1-");
    }

    #[test]
    fn test_header_count_limit_stops_collecting() {
        let limits = ParseLimits { max_headers: 2, ..ParseLimits::default() };
        let raw = b"PUT /h HTTP/1.1\r\nA: 1\r\nB: 2\r\nContent-Type: text/plain\r\n\r\nbody";
        let request = Request::parse(raw, &limits);

        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.status_hint(), StatusCode::PreconditionFailed);
    }

    #[test]
    fn test_header_length_limit_stops_collecting() {
        let limits = ParseLimits { max_header_len: 25, ..ParseLimits::default() };
        let raw = b"PUT /h HTTP/1.1\r\nContent-Type: text/plain\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaa\r\nX-After: 1\r\n\r\nbody";
        let request = Request::parse(raw, &limits);

        assert_eq!(request.headers(), &["Content-Type: text/plain"]);
        assert_eq!(request.body(), Body::Text(b"body"));
    }

    #[test]
    fn test_find_subsequence() {
        assert_eq!(find_subsequence(b"abc\r\ndef", b"\r\n"), Some(3));
        assert_eq!(find_subsequence(b"abc", b"abcd"), None);
        assert_eq!(find_subsequence(b"abc", b""), None);
    }

    #[test]
    fn test_content_type_without_length_is_accepted() {
        let request = parse(b"PUT /note HTTP/1.1\r\nContent-Type: text/plain\r\n\r\nhola");

        assert_eq!(request.content_length(), None);
        assert_eq!(request.body(), Body::Text(b"hola"));
        assert_eq!(request.status_hint(), StatusCode::Ok);
    }
}
