//! # Workers
//!
//! Pool fijo de threads alimentado por una cola FIFO de conexiones.
//!
//! ```text
//! Acceptor → push(conn) → ConnectionQueue → pop() → Worker → Pipeline
//! ```

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::ConnectionQueue;
