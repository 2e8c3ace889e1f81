//! Request deduplication for the pricing API
//!
//! At most one in-flight network operation exists per logical key at any
//! time; concurrent callers share the same pending result. The registry
//! entry is removed when the operation settles, success or failure, so a
//! later call with the same key always starts a fresh request.

use crate::error::{PriceError, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

type Registry<T> = Arc<Mutex<HashMap<String, broadcast::Sender<Result<T>>>>>;

/// In-flight request registry keyed by an opaque string (card name, set
/// code, or a compound key).
///
/// The underlying fetch runs on a spawned task, so it keeps running to
/// settlement even if the caller that started it is dropped; any new caller
/// using the same key attaches to the still-pending request.
#[derive(Debug)]
pub struct RequestDeduper<T> {
    in_flight: Registry<T>,
}

impl<T> Clone for RequestDeduper<T> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<T> Default for RequestDeduper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RequestDeduper<T> {
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys with a pending operation
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().unwrap().len()
    }

    /// Forget all pending registrations (test isolation). Operations already
    /// running settle normally; they are just no longer joinable.
    pub fn clear(&self) {
        self.in_flight.lock().unwrap().clear();
    }
}

impl<T: Clone + Send + 'static> RequestDeduper<T> {
    /// Run `fetcher` under `key`, or join the operation already in flight
    /// for that key. Every concurrent caller observes the identical
    /// settlement, value or error; the deduper adds no errors of its own.
    pub async fn dedupe<F, Fut>(&self, key: &str, fetcher: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let mut rx = {
            let mut map = self.in_flight.lock().unwrap();
            if let Some(tx) = map.get(key) {
                log::debug!("Joining in-flight request for key: {}", key);
                tx.subscribe()
            } else {
                let (tx, rx) = broadcast::channel(1);
                map.insert(key.to_string(), tx.clone());

                let registry = Arc::clone(&self.in_flight);
                let task_key = key.to_string();
                let fut = fetcher();
                tokio::spawn(async move {
                    let result = fut.await;
                    // Unregister before waking waiters, so a caller that
                    // observes the settlement can immediately retry fresh.
                    registry.lock().unwrap().remove(&task_key);
                    let _ = tx.send(result);
                });
                rx
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            // The operation was torn down without settling; classify like an
            // aborted call.
            Err(_) => Err(PriceError::Timeout),
        }
    }
}

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod tests;
