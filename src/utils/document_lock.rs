use crate::models::ServiceError;
use log::{debug, error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Per-document mutual exclusion for mutations that must not interleave
// (share create/revoke, content update, delete with cascade).
// Entries only live while some caller holds or waits on them.
#[derive(Clone, Default)]
pub struct DocumentLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, document_id: &str) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|e| {
            error!("Lock registry poisoned: {:?}", e);
            ServiceError::InternalServerError
        })?;

        Ok(Arc::clone(
            locks
                .entry(document_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }

    // Clones are only handed out under the registry mutex, so a count of two
    // (the map plus `lock`) means nobody else holds or awaits this entry
    fn release(&self, document_id: &str, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            error!("Lock registry poisoned while releasing {}", document_id);
            return;
        };

        let idle = locks
            .get(document_id)
            .map_or(false, |entry| Arc::ptr_eq(entry, &lock) && Arc::strong_count(&lock) == 2);
        if idle {
            locks.remove(document_id);
            debug!("Released lock entry for document_id={}", document_id);
        }
    }

    /// Runs `f` while holding the lock for `document_id`.
    pub fn with_lock<R, F>(&self, document_id: &str, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce() -> Result<R, ServiceError>,
    {
        let lock = self.lock_for(document_id)?;

        let result = match lock.lock() {
            Ok(_guard) => {
                debug!("Acquired lock for document_id={}", document_id);
                f()
            }
            Err(e) => {
                error!("Document lock poisoned for document_id={}: {:?}", document_id, e);
                Err(ServiceError::InternalServerError)
            }
        };

        self.release(document_id, lock);
        result
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn with_lock_serializes_critical_sections() {
        let locks = DocumentLocks::new();
        let inside = AtomicUsize::new(0);
        let overlaps = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    locks
                        .with_lock("doc", || {
                            if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            std::thread::sleep(std::time::Duration::from_millis(2));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn with_lock_propagates_errors_and_drops_idle_entries() {
        let locks = DocumentLocks::new();

        let result: Result<(), _> =
            locks.with_lock("doc", || Err(ServiceError::Forbidden("nope".to_string())));
        assert_eq!(result, Err(ServiceError::Forbidden("nope".to_string())));
        assert_eq!(locks.tracked(), 0);

        for i in 0..100 {
            locks.with_lock(&format!("doc-{}", i), || Ok(())).unwrap();
        }
        assert_eq!(locks.tracked(), 0);
    }

    #[test]
    fn entry_is_kept_while_held() {
        let locks = DocumentLocks::new();

        locks
            .with_lock("doc", || {
                assert_eq!(locks.tracked(), 1);
                Ok(())
            })
            .unwrap();
        assert_eq!(locks.tracked(), 0);
    }
}
