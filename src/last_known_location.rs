use std::sync::Arc;
use tokio::sync::watch;

/// A single-slot store written by one producer and read by any number of pollers.
#[derive(Clone, Debug)]
pub struct LastKnownLocation<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T: Clone> LastKnownLocation<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        LastKnownLocation { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl<T: Clone> Default for LastKnownLocation<T> {
    fn default() -> Self {
        LastKnownLocation::new()
    }
}
