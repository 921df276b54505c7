//! # eventual-core
//!
//! Reactive future core: a placeholder value that settles, exactly once, to
//! the eventual result of an asynchronous operation, observable by any number
//! of listeners attaching at any time.
//!
//! The central type is [`Eventual<T, U, E>`]: `T` is the placeholder shown
//! before settlement, `U` the success value, `E` the failure cause.
//! Transformations (`map`, `then`, `recover`, `finalize`, `with_placeholder`)
//! build new futures sharing the same underlying settlement — the wrapped
//! operation runs exactly once no matter how the chain is shaped.
//!
//! ```ignore
//! use eventual_core::{Eventual, ObservedState};
//!
//! let user = Eventual::new(None, async { load_user().await })
//!     .map(|user| Ok(user.display_name))
//!     .recover(|_| Ok("anonymous".to_string()));
//!
//! let subscription = user.observe(|state| match state {
//!     ObservedState::Pending(name) => show(name),
//!     ObservedState::Resolved(name) => show(Some(name)),
//!     ObservedState::Failed(cause) => show_error(cause),
//! });
//! ```
//!
//! This crate knows nothing about HTTP; see `eventual-http` for the fetch
//! layer built on top of it.

mod cell;
mod future;

pub use future::{Eventual, ObservedState, Subscription};
