use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Anything kept in an [`EntityStore`] is keyed by a numeric id.
pub trait Identified {
    fn id(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(u32),
    #[error("item {0} already exists")]
    AlreadyExists(u32),
    #[error("store lock poisoned")]
    LockFailed,
}

pub type Merge<'a, T> = &'a (dyn Fn(&T, &T) -> T + Send + Sync);

/// Keyed store shared by every resource kind. Each call touches a single key
/// and is atomic with respect to other calls on the same store.
pub trait EntityStore<T>: Send + Sync {
    fn get(&self, id: u32) -> Result<T, StoreError>;
    fn add(&self, item: T) -> Result<(), StoreError>;
    /// Replaces the stored item with `merge(stored, item)` and returns the result.
    fn update(&self, item: T, merge: Merge<'_, T>) -> Result<T, StoreError>;
    fn delete(&self, id: u32) -> Result<(), StoreError>;
    fn all(&self) -> Result<Vec<T>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub struct MemoryStore<T> {
    items: Mutex<HashMap<u32, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<u32, T>>, StoreError> {
        self.items.lock().map_err(|_| StoreError::LockFailed)
    }
}

impl<T> EntityStore<T> for MemoryStore<T>
where
    T: Identified + Clone + Send,
{
    fn get(&self, id: u32) -> Result<T, StoreError> {
        self.lock()?.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn add(&self, item: T) -> Result<(), StoreError> {
        let id = item.id();
        let mut items = self.lock()?;
        if items.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        items.insert(id, item);
        Ok(())
    }

    fn update(&self, item: T, merge: Merge<'_, T>) -> Result<T, StoreError> {
        let id = item.id();
        let mut items = self.lock()?;
        let stored = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        let merged = merge(stored, &item);
        *stored = merged.clone();
        Ok(merged)
    }

    fn delete(&self, id: u32) -> Result<(), StoreError> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.lock()?.clear();
        Ok(())
    }
}
