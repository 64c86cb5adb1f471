//! Observable result state.
//!
//! A [`ResultCell`] holds the latest [`CallResult`] of one write call site
//! and notifies subscribers whenever a call settles. Subscribers either
//! watch the channel returned by [`ResultCell::subscribe`] or register an
//! [`Observer`] callback.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::result::CallResult;

/// Callback invoked on every settlement of a result cell.
pub trait Observer<T>: Send + Sync {
    fn on_settled(&self, result: &CallResult<T>);
}

impl<T, F> Observer<T> for F
where
    F: Fn(&CallResult<T>) + Send + Sync,
{
    fn on_settled(&self, result: &CallResult<T>) {
        self(result)
    }
}

/// Latest outcome of a write call site.
///
/// Absent until the first call settles. Every settlement replaces the
/// previous value; there is no queue of outcomes.
pub struct ResultCell<T> {
    label: &'static str,
    sender: watch::Sender<Option<CallResult<T>>>,
    observers: Mutex<Vec<Arc<dyn Observer<T>>>>,
    // Serializes settlements so observers see them in channel order.
    settling: Mutex<()>,
}

impl<T> std::fmt::Debug for ResultCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCell")
            .field("label", &self.label)
            .field("settled", &self.sender.borrow().is_some())
            .finish()
    }
}

impl<T: Clone> ResultCell<T> {
    /// Creates an empty cell. `label` names the operation in logs.
    pub fn new(label: &'static str) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            label,
            sender,
            observers: Mutex::new(Vec::new()),
            settling: Mutex::new(()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Snapshot of the current outcome.
    pub fn current(&self) -> Option<CallResult<T>> {
        self.sender.borrow().clone()
    }

    /// Returns a receiver that is notified on every later settlement.
    pub fn subscribe(&self) -> watch::Receiver<Option<CallResult<T>>> {
        self.sender.subscribe()
    }

    /// Registers an observer. An observer registered from inside
    /// `on_settled` is first called for the next settlement.
    pub fn observe(&self, observer: impl Observer<T> + 'static) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Stores a settled outcome and notifies subscribers and observers.
    ///
    /// Observers run on the settling thread. An observer must not call
    /// `settle` on the same cell; that deadlocks.
    pub fn settle(&self, result: CallResult<T>) {
        match &result {
            CallResult::Transaction(_) => debug!(operation = self.label, "call settled"),
            CallResult::Error(e) => warn!(operation = self.label, error = %e, "call failed"),
        }

        let _settling = self.settling.lock().unwrap_or_else(PoisonError::into_inner);
        self.sender.send_replace(Some(result.clone()));
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer.on_settled(&result);
        }
    }
}

/// Read-only view of a shared [`ResultCell`].
#[derive(Debug)]
pub struct ResultReader<T> {
    cell: Arc<ResultCell<T>>,
}

impl<T> Clone for ResultReader<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone> ResultReader<T> {
    pub fn new(cell: Arc<ResultCell<T>>) -> Self {
        Self { cell }
    }

    pub fn current(&self) -> Option<CallResult<T>> {
        self.cell.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CallResult<T>>> {
        self.cell.subscribe()
    }

    pub fn observe(&self, observer: impl Observer<T> + 'static) {
        self.cell.observe(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_empty() {
        let cell: ResultCell<u32> = ResultCell::new("approve");
        assert!(cell.current().is_none());
        assert_eq!(cell.label(), "approve");
    }

    #[test]
    fn settle_overwrites_previous_outcome() {
        let cell = ResultCell::new("transfer");
        cell.settle(CallResult::Error(NormalizedError::new("reverted")));
        cell.settle(CallResult::Transaction(2u32));
        assert_eq!(cell.current(), Some(CallResult::Transaction(2)));
    }

    #[test]
    fn observers_see_every_settlement() {
        let cell = ResultCell::new("approve");
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        cell.observe(move |_: &CallResult<u32>| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cell.settle(CallResult::Transaction(1));
        cell.settle(CallResult::Transaction(2));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn observer_may_register_observers() {
        let cell = Arc::new(ResultCell::new("approve"));
        let late = Arc::new(AtomicUsize::new(0));

        let inner_cell = Arc::clone(&cell);
        let inner_late = Arc::clone(&late);
        cell.observe(move |_: &CallResult<u32>| {
            let counter = Arc::clone(&inner_late);
            inner_cell.observe(move |_: &CallResult<u32>| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        cell.settle(CallResult::Transaction(1));
        assert_eq!(late.load(Ordering::SeqCst), 0);
        cell.settle(CallResult::Transaction(2));
        assert_eq!(late.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let cell = Arc::new(ResultCell::new("approve"));
        let reader = ResultReader::new(Arc::clone(&cell));
        let mut rx = reader.subscribe();

        let writer = Arc::clone(&cell);
        tokio::spawn(async move {
            writer.settle(CallResult::Transaction(9u32));
        });

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(CallResult::Transaction(9)));
        assert_eq!(reader.current(), Some(CallResult::Transaction(9)));
    }
}
