//! # Dynamic hooks for a compose-style render lifecycle
//!
//! `rehook-core` lets a plain closure behave like a reusable custom hook:
//! it gets its own private state, and its return value is memoized and
//! recomputed only when a caller-supplied dependency value changes. There
//! are three layers:
//!
//! - `use_dynamic` / `use_dynamic_keyed` / `use_dynamic_once` — the hook
//!   adapter itself.
//! - [`Host`] — one component instance's render lifecycle: slot storage,
//!   the after-commit queue, and the invalidation flag.
//! - `Signal` / `remember*` / `effect` — the substrate the adapter is built
//!   from, usable on its own.
//!
//! ## A counter hook
//!
//! ```rust
//! use rehook_core::prelude::*;
//! use std::rc::Rc;
//!
//! struct Counter {
//!     count: i32,
//!     increment: Rc<dyn Fn()>,
//! }
//!
//! fn use_counter(step: i32) -> Rc<Counter> {
//!     use_dynamic([step], move |state: &StateHandle<i32>| {
//!         let count = state.get().unwrap_or(0);
//!         let state = state.clone();
//!         Counter {
//!             count,
//!             increment: Rc::new(move || state.update(|v| v.copied().unwrap_or(0) + step)),
//!         }
//!     })
//! }
//!
//! let mut host = Host::new();
//! let counter = host.render(|| use_counter(1));
//! assert_eq!(counter.count, 0);
//!
//! (counter.increment)();
//! assert!(host.needs_render());
//!
//! // Same dependencies: memoized, behavior not re-run, count unchanged.
//! let counter = host.render(|| use_counter(1));
//! assert_eq!(counter.count, 0);
//!
//! // Dependency change: recomputes and observes the committed write.
//! let counter = host.render(|| use_counter(2));
//! assert_eq!(counter.count, 1);
//! ```
//!
//! ## What gates recomputation
//!
//! Only the dependency value. A state write schedules a re-render (see
//! [`Host::needs_render`]) but never re-runs the behavior by itself, and
//! reads lag one commit behind writes — see the [`hook`] module docs for the
//! full contract, including the compute-once meaning of `()` dependencies.

pub mod effects;
pub mod error;
pub mod hook;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod tests;

pub use effects::*;
pub use error::*;
pub use hook::*;
pub use prelude::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
