//! Shared settlement state behind every eventual value.
//!
//! A cell settles exactly once. Listeners registered before settlement are
//! delivered the outcome in registration order; listeners registered after
//! settlement fire immediately with the stored outcome, so late subscribers
//! never miss the settled value.

use std::sync::Mutex;

/// One-shot settlement callback.
pub(crate) type Listener<U, E> = Box<dyn FnOnce(Result<U, E>) + Send>;

/// Mutex-guarded settlement state shared by a future and everything derived
/// from it.
pub(crate) struct SettleCell<U, E> {
    inner: Mutex<Inner<U, E>>,
}

struct Inner<U, E> {
    /// `None` while pending, `Some` once settled. Never unset.
    outcome: Option<Result<U, E>>,
    listeners: Vec<(u64, Listener<U, E>)>,
    next_listener_id: u64,
}

impl<U, E> SettleCell<U, E>
where
    U: Clone,
    E: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                outcome: None,
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
        }
    }

    /// A cell that was born settled.
    pub(crate) fn settled(outcome: Result<U, E>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                outcome: Some(outcome),
                listeners: Vec::new(),
                next_listener_id: 0,
            }),
        }
    }

    /// Settle the cell and deliver the outcome to every registered listener,
    /// in registration order. Settling an already-settled cell is a no-op.
    ///
    /// Listeners run outside the lock, so a listener may register further
    /// listeners (chained futures do exactly that).
    pub(crate) fn settle(&self, outcome: Result<U, E>) {
        let drained = {
            let mut inner = self.inner.lock().unwrap();
            if inner.outcome.is_some() {
                return;
            }
            inner.outcome = Some(outcome.clone());
            std::mem::take(&mut inner.listeners)
        };
        for (_, listener) in drained {
            listener(outcome.clone());
        }
    }

    /// Register a listener for settlement.
    ///
    /// Returns `Some(id)` if the cell is still pending (the id can be passed
    /// to [`unregister`](Self::unregister)). If the cell has already settled
    /// the listener fires immediately and `None` is returned.
    pub(crate) fn register(&self, listener: Listener<U, E>) -> Option<u64> {
        let mut inner = self.inner.lock().unwrap();
        match inner.outcome.clone() {
            Some(outcome) => {
                drop(inner);
                listener(outcome);
                None
            }
            None => {
                let id = inner.next_listener_id;
                inner.next_listener_id += 1;
                inner.listeners.push((id, listener));
                Some(id)
            }
        }
    }

    /// Remove a pending listener. No-op after settlement.
    pub(crate) fn unregister(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Current outcome, if settled.
    pub(crate) fn snapshot(&self) -> Option<Result<U, E>> {
        self.inner.lock().unwrap().outcome.clone()
    }
}
