//! # Recursos
//!
//! Cada path distinto que llega al servidor es un recurso mutable:
//!
//! - `POST`/`PUT`/`PATCH` reemplazan su contenido (texto o binario)
//! - `GET` lo lee (los binarios se envían chunked)
//! - `DELETE` vacía el contenido, pero el slot persiste

pub mod registry;
pub mod resource;

pub use registry::ResourceRegistry;
pub use resource::{BinaryFile, Payload, Resource};
