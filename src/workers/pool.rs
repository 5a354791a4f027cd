//! # Pool de Workers
//! src/workers/pool.rs
//!
//! N threads creados al arrancar que consumen la `ConnectionQueue`. Cada
//! worker procesa un item hasta terminarlo antes de tomar el siguiente.
//!
//! ## Shutdown
//!
//! 1. Se activa el flag de stop y se despierta a todos los workers
//! 2. Cada worker sale de su loop en el siguiente despertar
//! 3. Se hace join de todos los threads
//! 4. Los items que quedaron en cola NO se procesan: se devuelven al caller

use crate::error::ServerError;
use crate::workers::queue::ConnectionQueue;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Función que procesa un item
type Handler<T> = Arc<dyn Fn(T) + Send + Sync + 'static>;

/// Pool de tamaño fijo
pub struct WorkerPool<T: Send + 'static> {
    /// Cola compartida con los workers
    queue: Arc<ConnectionQueue<T>>,

    /// Threads vivos
    workers: Vec<JoinHandle<()>>,

    /// Tamaño configurado
    size: usize,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea el pool y arranca `size` workers
    ///
    /// # Errores
    ///
    /// `ServerError::WorkerSpawn` si el sistema no puede crear un thread.
    /// Los workers ya creados se detienen antes de retornar.
    pub fn new<F>(size: usize, poll_interval: Duration, handler: F) -> Result<Self, ServerError>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let handler: Handler<T> = Arc::new(handler);
        let mut pool = Self {
            queue: Arc::new(ConnectionQueue::new(poll_interval)),
            workers: Vec::with_capacity(size),
            size,
        };

        for id in 0..size {
            let name = format!("worker-{}", id);
            let queue = Arc::clone(&pool.queue);
            let handler = Arc::clone(&handler);

            let spawned = thread::Builder::new()
                .name(name.clone())
                .spawn(move || Self::worker_loop(name, queue, handler));

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(e) => {
                    pool.shutdown();
                    return Err(ServerError::WorkerSpawn(e));
                }
            }
        }

        Ok(pool)
    }

    /// Loop principal del worker
    fn worker_loop(name: String, queue: Arc<ConnectionQueue<T>>, handler: Handler<T>) {
        tracing::debug!(worker = %name, "Worker started");

        while let Some(item) = queue.pop() {
            // Un panic en el handler no debe matar al worker
            if panic::catch_unwind(AssertUnwindSafe(|| handler(item))).is_err() {
                tracing::error!(worker = %name, "Handler panicked, worker continues");
            }
        }

        tracing::debug!(worker = %name, "Worker stopped");
    }

    /// Encola un item para el siguiente worker libre
    pub fn submit(&self, item: T) {
        self.queue.push(item);
    }

    /// Cantidad de workers configurados
    pub fn size(&self) -> usize {
        self.size
    }

    /// Items esperando un worker
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Detiene los workers y retorna los items que no se despacharon
    pub fn shutdown(&mut self) -> Vec<T> {
        self.queue.shutdown();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Worker thread exited with a panic");
            }
        }

        self.queue.drain()
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            let abandoned = self.shutdown();
            if !abandoned.is_empty() {
                tracing::warn!(count = abandoned.len(), "Dropping queued items on pool drop");
            }
        }
    }
}
