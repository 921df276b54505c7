//! The reactive future: a placeholder value that settles exactly once.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::cell::SettleCell;

/// What an observer is handed: the placeholder while the underlying operation
/// is in flight, then exactly one settled state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedState<T, U, E> {
    /// The operation has not settled; carries the placeholder.
    Pending(T),
    /// The operation succeeded.
    Resolved(U),
    /// The operation failed.
    Failed(E),
}

/// Handle returned by [`Eventual::observe`].
///
/// Calling [`stop`](Subscription::stop) before settlement guarantees the
/// observer is never invoked again. Dropping the handle without calling
/// `stop` leaves the observer attached.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// A placeholder value of type `T` that will, exactly once, be replaced by a
/// value of type `U` or a failure of type `E` — the eventual result of an
/// asynchronous operation started at construction time.
///
/// An `Eventual` is immutable: every transformation builds a new future that
/// shares the same underlying settlement, so derived futures never re-trigger
/// the operation and never interfere with each other. Cloning shares the
/// settlement too.
///
/// Construction and the async-returning combinators must run inside a tokio
/// runtime; the wrapped operation is spawned onto it.
///
/// ```ignore
/// use eventual_core::{Eventual, ObservedState};
///
/// let value = Eventual::new(None, async { fetch_number().await });
/// let doubled = value.map(|n| Ok(n * 2));
/// let _sub = doubled.observe(|state| match state {
///     ObservedState::Pending(placeholder) => render(placeholder),
///     ObservedState::Resolved(n) => render(Some(n)),
///     ObservedState::Failed(err) => render_error(err),
/// });
/// ```
pub struct Eventual<T, U, E> {
    placeholder: T,
    cell: Arc<SettleCell<U, E>>,
}

impl<T: Clone, U, E> Clone for Eventual<T, U, E> {
    fn clone(&self) -> Self {
        Self {
            placeholder: self.placeholder.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T, U, E> Eventual<T, U, E>
where
    U: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wrap an asynchronous operation, starting it immediately.
    ///
    /// Never blocks. The operation runs to completion regardless of how many
    /// observers attach or detach; nothing restarts it.
    pub fn new<Op>(placeholder: T, operation: Op) -> Self
    where
        Op: Future<Output = Result<U, E>> + Send + 'static,
    {
        let cell = Arc::new(SettleCell::new());
        let task_cell = cell.clone();
        tokio::spawn(async move {
            task_cell.settle(operation.await);
        });
        Self { placeholder, cell }
    }

    /// A future that settled before anyone could look at it.
    pub fn from_result(placeholder: T, outcome: Result<U, E>) -> Self {
        Self {
            placeholder,
            cell: Arc::new(SettleCell::settled(outcome)),
        }
    }

    /// Derive a future whose value is `transform` applied to this future's
    /// settled value.
    ///
    /// If this future fails, `transform` is never invoked and the derived
    /// future fails with the same cause. If `transform` returns `Err`, the
    /// derived future fails with that cause.
    pub fn map<V, F>(&self, transform: F) -> Eventual<T, V, E>
    where
        T: Clone,
        V: Clone + Send + 'static,
        F: FnOnce(U) -> Result<V, E> + Send + 'static,
    {
        let child = Arc::new(SettleCell::new());
        let target = child.clone();
        self.cell.register(Box::new(move |outcome| {
            target.settle(outcome.and_then(transform));
        }));
        Eventual {
            placeholder: self.placeholder.clone(),
            cell: child,
        }
    }

    /// Like [`map`](Self::map), but the continuation's own asynchronous
    /// result becomes the derived future's settlement.
    pub fn then<V, F, Fut>(&self, transform: F) -> Eventual<T, V, E>
    where
        T: Clone,
        V: Clone + Send + 'static,
        F: FnOnce(U) -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let child = Arc::new(SettleCell::new());
        let target = child.clone();
        self.cell.register(Box::new(move |outcome| match outcome {
            Ok(value) => {
                tokio::spawn(async move {
                    target.settle(transform(value).await);
                });
            }
            Err(cause) => target.settle(Err(cause)),
        }));
        Eventual {
            placeholder: self.placeholder.clone(),
            cell: child,
        }
    }

    /// Derive a future that intercepts failure.
    ///
    /// On failure, `rescue` decides the derived outcome: `Ok` recovers, `Err`
    /// replaces the cause. Success passes through untouched and `rescue` is
    /// never invoked.
    pub fn recover<F>(&self, rescue: F) -> Eventual<T, U, E>
    where
        T: Clone,
        F: FnOnce(E) -> Result<U, E> + Send + 'static,
    {
        let child = Arc::new(SettleCell::new());
        let target = child.clone();
        self.cell.register(Box::new(move |outcome| {
            target.settle(outcome.or_else(rescue));
        }));
        Eventual {
            placeholder: self.placeholder.clone(),
            cell: child,
        }
    }

    /// Run a side effect exactly once on settlement, success or failure,
    /// without altering the outcome.
    pub fn finalize<F>(&self, on_settle: F) -> Eventual<T, U, E>
    where
        T: Clone,
        F: FnOnce() + Send + 'static,
    {
        let child = Arc::new(SettleCell::new());
        let target = child.clone();
        self.cell.register(Box::new(move |outcome| {
            on_settle();
            target.settle(outcome);
        }));
        Eventual {
            placeholder: self.placeholder.clone(),
            cell: child,
        }
    }

    /// Same settlement, different placeholder. Does not restart or duplicate
    /// the underlying operation.
    pub fn with_placeholder<V>(&self, placeholder: V) -> Eventual<V, U, E> {
        Eventual {
            placeholder,
            cell: self.cell.clone(),
        }
    }

    /// Attach an observer.
    ///
    /// The observer is invoked synchronously with the current state: the
    /// placeholder if the operation has not settled, otherwise the settled
    /// state — a late subscriber replays the settlement and never sees the
    /// placeholder. While pending, it is invoked exactly once more when
    /// settlement occurs.
    pub fn observe<F>(&self, mut on_value: F) -> Subscription
    where
        T: Clone,
        F: FnMut(ObservedState<T, U, E>) + Send + 'static,
    {
        if self.cell.snapshot().is_none() {
            on_value(ObservedState::Pending(self.placeholder.clone()));
        }
        // If settlement happened since the snapshot, register fires inline
        // with the settled state, preserving the pending-then-settled order.
        let registered = self.cell.register(Box::new(move |outcome| {
            on_value(match outcome {
                Ok(value) => ObservedState::Resolved(value),
                Err(cause) => ObservedState::Failed(cause),
            });
        }));
        match registered {
            Some(id) => {
                let cell = Arc::downgrade(&self.cell);
                Subscription {
                    cancel: Some(Box::new(move || {
                        if let Some(cell) = cell.upgrade() {
                            cell.unregister(id);
                        }
                    })),
                }
            }
            None => Subscription { cancel: None },
        }
    }

    /// Await the settlement outcome.
    pub async fn outcome(&self) -> Result<U, E> {
        let (tx, rx) = oneshot::channel();
        self.cell.register(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        // The cell outlives this borrow, so the listener always fires.
        rx.await.expect("settlement cell dropped while pending")
    }

    /// Whether settlement has occurred.
    pub fn is_settled(&self) -> bool {
        self.cell.snapshot().is_some()
    }

    /// The value observers see before settlement.
    pub fn placeholder(&self) -> &T {
        &self.placeholder
    }
}
