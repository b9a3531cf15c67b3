use parking_lot::Mutex;
use repguard::{new_err, ErrorKind, GuardError, ZombieLockStore};
use std::sync::Arc;

/// In-memory zombie marker. Survives nothing but keeps the store contract; clones share
/// the marker.
#[derive(Clone, Debug, Default)]
pub struct MemoryZombieLock {
    marker: Arc<Mutex<Option<String>>>,
}

impl MemoryZombieLock {
    pub fn new() -> MemoryZombieLock {
        MemoryZombieLock::default()
    }
}

impl ZombieLockStore for MemoryZombieLock {
    fn exists(&self) -> bool {
        self.marker.lock().is_some()
    }

    fn write(&self, identity: &str) -> Result<(), GuardError> {
        *self.marker.lock() = Some(identity.to_string());

        trace!("Memory zombie lock written: {}", identity);
        Ok(())
    }

    fn read(&self) -> Result<String, GuardError> {
        match self.marker.lock().as_ref() {
            Some(identity) => Ok(identity.clone()),
            None => new_err(ErrorKind::NotFound, "zombie lock is absent".to_string(), String::new()),
        }
    }

    fn remove(&self) -> Result<(), GuardError> {
        match self.marker.lock().take() {
            Some(_) => Ok(()),
            None => new_err(ErrorKind::NotFound, "zombie lock is absent".to_string(), String::new()),
        }
    }
}
