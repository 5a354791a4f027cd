//! # Resource Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente donde cada path es un recurso mutable en
//! memoria. Los clientes guardan texto o binarios con `POST`/`PUT`/`PATCH`,
//! los leen con `GET` y los vacían con `DELETE`.
//!
//! ## Arquitectura
//!
//! - `http`: parsing a nivel de bytes, responses y streaming chunked
//! - `resources`: registry de paths con un lock por recurso
//! - `workers`: cola FIFO de conexiones y pool fijo de threads
//! - `server`: acceptor TCP y pipeline request → response
//! - `config`: argumentos CLI y variables de entorno
//! - `logging`: inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use resource_server::config::Config;
//! use resource_server::server::Server;
//!
//! let server = Server::bind(Config::default()).unwrap();
//! server.run().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod resources;
pub mod server;
pub mod workers;
