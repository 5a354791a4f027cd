//! # Registry de Recursos
//! src/resources/registry.rs
//!
//! Mapa concurrente path → recurso con capacidad fija.
//!
//! ## Locks
//!
//! - Un único lock del registry serializa el find-or-create. Se mantiene sólo
//!   durante la búsqueda/inserción, nunca durante I/O.
//! - Cada recurso tiene su propio lock para leer/escribir el payload.
//!
//! Los slots nunca se eliminan ni se compactan: el índice asignado a un path
//! es estable durante toda la vida del proceso.

use crate::error::ServerError;
use crate::resources::resource::Resource;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Tabla de slots protegida por el lock del registry
#[derive(Default)]
struct SlotTable {
    /// Recursos en orden de creación (índice = slot)
    resources: Vec<Arc<Resource>>,

    /// Path → índice
    by_path: HashMap<String, usize>,
}

/// Registry de recursos con capacidad fija
pub struct ResourceRegistry {
    /// Cantidad máxima de paths distintos
    capacity: usize,

    /// Slots asignados
    slots: Mutex<SlotTable>,
}

impl ResourceRegistry {
    /// Crea un registry vacío con capacidad fija
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Mutex::new(SlotTable {
                resources: Vec::with_capacity(capacity),
                by_path: HashMap::with_capacity(capacity),
            }),
        }
    }

    fn table(&self) -> MutexGuard<'_, SlotTable> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Busca el recurso del path o lo crea si hay espacio
    ///
    /// # Errores
    ///
    /// `ServerError::RegistryFull` si el path es nuevo y no quedan slots.
    ///
    /// # Ejemplo
    /// ```
    /// use resource_server::resources::ResourceRegistry;
    ///
    /// let registry = ResourceRegistry::new(2);
    /// let a = registry.find_or_create("/a").unwrap();
    /// let again = registry.find_or_create("/a").unwrap();
    ///
    /// assert_eq!(a.index(), again.index());
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn find_or_create(&self, path: &str) -> Result<Arc<Resource>, ServerError> {
        let mut table = self.table();

        if let Some(&index) = table.by_path.get(path) {
            return Ok(Arc::clone(&table.resources[index]));
        }

        if table.resources.len() >= self.capacity {
            return Err(ServerError::RegistryFull {
                capacity: self.capacity,
            });
        }

        let index = table.resources.len();
        let resource = Arc::new(Resource::new(index, path));
        table.resources.push(Arc::clone(&resource));
        table.by_path.insert(path.to_string(), index);

        tracing::debug!(path, index, "Resource slot created");

        Ok(resource)
    }

    /// Busca un recurso existente sin crearlo
    pub fn find(&self, path: &str) -> Option<Arc<Resource>> {
        let table = self.table();
        table
            .by_path
            .get(path)
            .map(|&index| Arc::clone(&table.resources[index]))
    }

    /// Cantidad de slots asignados
    pub fn len(&self) -> usize {
        self.table().resources.len()
    }

    /// Verifica si no hay slots asignados
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descarta el payload de todos los recursos (los slots se conservan)
    ///
    /// Retorna cuántos recursos tenían contenido.
    pub fn clear_all(&self) -> usize {
        // Se copia la lista para no mantener el lock del registry mientras
        // se espera el lock de cada recurso.
        let resources: Vec<Arc<Resource>> = self.table().resources.clone();
        resources.iter().filter(|resource| resource.clear()).count()
    }
}
