//! # Recurso Direccionable
//! src/resources/resource.rs
//!
//! Un recurso es el estado asociado a un path exacto. Guarda a lo sumo un
//! payload (texto o binario) protegido por su propio mutex, de modo que
//! operar sobre un path nunca bloquea a otro.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Payload binario respaldado por un archivo temporal anónimo
///
/// El archivo se borra del disco al cerrarse (drop).
#[derive(Debug)]
pub struct BinaryFile {
    file: File,
    len: u64,
}

impl BinaryFile {
    /// Crea el archivo temporal, escribe el contenido y rebobina
    pub fn create(content: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::tempfile()?;
        file.write_all(content)?;
        file.flush()?;
        file.seek(SeekFrom::Start(0))?;

        Ok(Self {
            file,
            len: content.len() as u64,
        })
    }

    /// Tamaño del payload en bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rebobina y retorna el archivo listo para leer desde el offset 0
    pub fn reader(&mut self) -> io::Result<&mut File> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(&mut self.file)
    }

    /// Lee el payload completo a memoria
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut content = Vec::with_capacity(self.len as usize);
        self.reader()?.read_to_end(&mut content)?;
        Ok(content)
    }
}

/// Contenido de un recurso: a lo sumo una variante a la vez
#[derive(Debug, Default)]
pub enum Payload {
    /// Sin contenido
    #[default]
    Empty,

    /// Texto subido con POST/PUT/PATCH
    Text(Vec<u8>),

    /// Archivo subido con multipart/form-data
    Binary(BinaryFile),
}

impl Payload {
    /// Verifica si hay algún contenido
    pub fn has_data(&self) -> bool {
        !matches!(self, Payload::Empty)
    }
}

/// Un recurso del registry
#[derive(Debug)]
pub struct Resource {
    /// Posición estable dentro del registry
    index: usize,

    /// Path exacto que identifica al recurso
    path: String,

    /// Payload protegido por el lock propio del recurso
    payload: Mutex<Payload>,
}

impl Resource {
    pub(crate) fn new(index: usize, path: &str) -> Self {
        Self {
            index,
            path: path.to_string(),
            payload: Mutex::new(Payload::Empty),
        }
    }

    /// Índice del slot
    pub fn index(&self) -> usize {
        self.index
    }

    /// Path del recurso
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Toma el lock del recurso
    ///
    /// Mientras el guard viva, cualquier otra operación sobre este path espera.
    /// Un lock envenenado se recupera: el payload siempre queda en un estado
    /// consistente porque se reemplaza de una sola vez.
    pub fn lock(&self) -> MutexGuard<'_, Payload> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copia del texto guardado, `None` si no hay texto
    pub fn read_text(&self) -> Option<Vec<u8>> {
        match &*self.lock() {
            Payload::Text(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Reemplaza el payload por una copia de `bytes`
    pub fn write_text(&self, bytes: &[u8]) {
        let text = bytes.to_vec();
        *self.lock() = Payload::Text(text);
    }

    /// Reemplaza el payload por un archivo binario
    ///
    /// El archivo se escribe antes de tomar el lock. Si falla, el payload
    /// anterior queda intacto.
    pub fn write_binary(&self, content: &[u8]) -> io::Result<()> {
        let file = BinaryFile::create(content)?;
        *self.lock() = Payload::Binary(file);
        Ok(())
    }

    /// Descarta el payload. Retorna si había algo guardado.
    pub fn clear(&self) -> bool {
        let previous = std::mem::take(&mut *self.lock());
        previous.has_data()
    }

    /// Verifica si el recurso tiene contenido
    pub fn has_data(&self) -> bool {
        self.lock().has_data()
    }
}
