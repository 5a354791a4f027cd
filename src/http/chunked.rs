//! # Transfer-Encoding: chunked
//! src/http/chunked.rs
//!
//! Cada bloque se escribe como `<largo-hex>\r\n<bytes>\r\n` y el stream se
//! cierra con el chunk terminal `0\r\n\r\n`.

use std::io::{self, Read, Write};

/// Chunk terminal
const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

/// Escritor de chunks sobre cualquier `Write`
pub struct ChunkedWriter<W: Write> {
    inner: W,
}

impl<W: Write> ChunkedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Escribe un chunk. Un bloque vacío no se escribe: cerraría el stream.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.inner.write_all(format!("{:x}\r\n", data.len()).as_bytes())?;
        self.inner.write_all(data)?;
        self.inner.write_all(b"\r\n")
    }

    /// Escribe el chunk terminal y devuelve el writer interno
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(LAST_CHUNK)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Copia `reader` completo hacia `writer` en bloques de `block_size` bytes
///
/// Retorna la cantidad de bytes de payload enviados.
pub fn stream<R: Read, W: Write>(reader: &mut R, writer: W, block_size: usize) -> io::Result<u64> {
    let mut chunked = ChunkedWriter::new(writer);
    let mut block = vec![0u8; block_size.max(1)];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        chunked.write_chunk(&block[..read])?;
        total += read as u64;
    }

    chunked.finish()?;
    Ok(total)
}

/// Reensambla un body chunked completo
///
/// Retorna `None` si el framing es inválido o falta el chunk terminal.
/// Lo usan los clientes de prueba para verificar los streams.
pub fn decode(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut payload = Vec::new();

    loop {
        let line_end = data.windows(2).position(|w| w == b"\r\n")?;
        let size_line = std::str::from_utf8(&data[..line_end]).ok()?;
        let size = usize::from_str_radix(size_line.trim(), 16).ok()?;
        data = &data[line_end + 2..];

        if size == 0 {
            return if data.starts_with(b"\r\n") { Some(payload) } else { None };
        }

        let end = size.checked_add(2)?;
        if data.len() < end || &data[size..end] != b"\r\n" {
            return None;
        }
        payload.extend_from_slice(&data[..size]);
        data = &data[end..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_single_chunk_framing() {
        let mut out = Vec::new();
        let mut writer = ChunkedWriter::new(&mut out);
        writer.write_chunk(b"hello").unwrap();
        writer.finish().unwrap();

        assert_eq!(out, b"5\r\nhello\r\n0\r\n\r\n");
    }

    #[test]
    fn test_hex_lengths() {
        let mut out = Vec::new();
        let mut writer = ChunkedWriter::new(&mut out);
        writer.write_chunk(&[7u8; 26]).unwrap();
        writer.finish().unwrap();

        assert!(out.starts_with(b"1a\r\n"));
    }

    #[test]
    fn test_empty_chunk_is_skipped() {
        let mut out = Vec::new();
        let mut writer = ChunkedWriter::new(&mut out);
        writer.write_chunk(b"").unwrap();
        writer.finish().unwrap();

        assert_eq!(out, b"0\r\n\r\n");
    }

    #[test]
    fn test_stream_splits_in_blocks() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(2500).collect();
        let mut out = Vec::new();

        let sent = stream(&mut Cursor::new(&payload), &mut out, 1024).unwrap();

        assert_eq!(sent, 2500);
        assert!(out.starts_with(b"400\r\n"));
        assert!(out.ends_with(b"0\r\n\r\n"));
        assert_eq!(decode(&out).unwrap(), payload);
    }

    #[test]
    fn test_stream_empty_reader() {
        let mut out = Vec::new();
        let sent = stream(&mut Cursor::new(Vec::<u8>::new()), &mut out, 16).unwrap();

        assert_eq!(sent, 0);
        assert_eq!(out, b"0\r\n\r\n");
    }

    #[test]
    fn test_decode_rejects_truncated() {
        assert!(decode(b"5\r\nhel").is_none());
        assert!(decode(b"5\r\nhello\r\n").is_none());
        assert!(decode(b"zz\r\n").is_none());
    }

    #[test]
    fn test_decode_rejects_huge_size_line() {
        assert!(decode(b"ffffffffffffffff\r\nabc").is_none());
        assert!(decode(b"fffffffffffffffe\r\nabc\r\n0\r\n\r\n").is_none());
    }
}
