//! # Cola de Conexiones
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe sin límite de tamaño. El acceptor encola y los
//! workers desencolan. No hay prioridades ni backpressure.
//!
//! Los consumidores esperan con un timeout periódico: aunque el flag de stop
//! se active sin notificar la condvar, lo ven en el siguiente despertar.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Intervalo de espera por defecto de los consumidores
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cola FIFO bloqueante con señal de shutdown
pub struct ConnectionQueue<T> {
    /// Items en orden de llegada
    items: Mutex<VecDeque<T>>,

    /// Condvar para despertar consumidores
    condvar: Condvar,

    /// Flag de stop compartido con quien lo necesite
    stop: Arc<AtomicBool>,

    /// Cada cuánto despierta un consumidor que espera
    poll_interval: Duration,
}

impl<T> ConnectionQueue<T> {
    /// Crea una cola vacía
    pub fn new(poll_interval: Duration) -> Self {
        Self::with_stop_flag(Arc::new(AtomicBool::new(false)), poll_interval)
    }

    /// Crea una cola que observa un flag de stop externo
    pub fn with_stop_flag(stop: Arc<AtomicBool>, poll_interval: Duration) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            stop,
            poll_interval,
        }
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola al final y despierta a un consumidor. Nunca bloquea.
    pub fn push(&self, item: T) {
        let mut items = self.items();
        items.push_back(item);
        self.condvar.notify_one();
    }

    /// Desencola el primer item
    ///
    /// Bloquea hasta que haya un item o se observe el stop. Con el stop
    /// activo retorna `None` aunque queden items.
    pub fn pop(&self) -> Option<T> {
        let mut items = self.items();

        loop {
            if self.is_shutdown() {
                return None;
            }

            if let Some(item) = items.pop_front() {
                return Some(item);
            }

            let (guard, _timeout) = self
                .condvar
                .wait_timeout(items, self.poll_interval)
                .unwrap_or_else(PoisonError::into_inner);
            items = guard;
        }
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// Activa el stop y despierta a todos los consumidores
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        let _items = self.items();
        self.condvar.notify_all();
    }

    /// Verifica si se pidió el stop
    pub fn is_shutdown(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Flag de stop compartido
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Retira todos los items pendientes
    pub fn drain(&self) -> Vec<T> {
        self.items().drain(..).collect()
    }
}

impl<T> Default for ConnectionQueue<T> {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
