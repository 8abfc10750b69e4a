//! Dynamic custom hooks: a behavior closure with private state and a
//! dependency-gated memo cache.
//!
//! [`use_dynamic`] turns any closure into a reusable hook. The closure gets a
//! [`StateHandle`] (the getter/setter pair for its private state cell) and
//! its return value is cached; the closure runs again only when the
//! dependency value passed by the caller stops comparing equal to the one
//! from the last run.
//!
//! Two contract points are easy to miss and are preserved deliberately:
//!
//! - **Empty dependencies mean compute-once.** `()` (or any value equal to
//!   itself every render) runs the behavior exactly once per host lifetime.
//!   This differs from frameworks where *omitting* the list means "recompute
//!   every render"; here there is no omitted form.
//! - **State reads lag one commit.** [`StateHandle::get`] returns the value
//!   committed by a *previous* render, never a `set` made during the current
//!   invocation. A `set` schedules a re-render but does not recompute; the
//!   new value becomes observable on the next recomputation that dependency
//!   change actually opens. Downstream code may rely on this timing, so it
//!   is kept as-is rather than "fixed".

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::runtime::{active_dirty, after_commit, remember, remember_with_key};
use crate::signal::Signal;

/// Getter/setter pair for one hook's private state cell.
///
/// Cloneable so a behavior can move it into the callbacks it returns.
pub struct StateHandle<T: Clone + 'static> {
    cell: Signal<Option<T>>,
    stale: Rc<RefCell<Option<T>>>,
    dirty: Rc<Cell<bool>>,
}

impl<T: Clone + 'static> StateHandle<T> {
    /// Last committed value; `None` until a `set` has been committed.
    ///
    /// A `set` made during the current invocation is not visible here — the
    /// read side is refreshed only when a render commits.
    pub fn get(&self) -> Option<T> {
        self.stale.borrow().clone()
    }

    /// Stores `value` and schedules a re-render on the owning host.
    ///
    /// This never re-invokes the behavior by itself: recomputation is gated
    /// solely by the dependency value.
    pub fn set(&self, value: T) {
        self.cell.set(Some(value));
        self.dirty.set(true);
    }

    /// Functional write: `f` sees the *pending* value (the latest `set`,
    /// committed or not), unlike [`StateHandle::get`]. Useful for callbacks
    /// that fire several times between renders.
    pub fn update(&self, f: impl FnOnce(Option<&T>) -> T) {
        let next = f(self.cell.get().as_ref());
        self.set(next);
    }
}

impl<T: Clone + 'static> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            stale: Rc::clone(&self.stale),
            dirty: Rc::clone(&self.dirty),
        }
    }
}

/// Explicit per-callsite memo cache: the dependency snapshot from the last
/// recomputation and the result it produced.
///
/// The staleness rule is the whole policy, visible and testable: a lookup
/// hits iff the stored snapshot compares equal to the incoming one.
pub struct MemoCell<D, R> {
    last: RefCell<Option<(D, Rc<R>)>>,
}

impl<D: PartialEq, R> MemoCell<D, R> {
    pub fn new() -> Self {
        Self {
            last: RefCell::new(None),
        }
    }

    /// Cached result if `deps` matches the stored snapshot.
    pub fn lookup(&self, deps: &D) -> Option<Rc<R>> {
        self.last
            .borrow()
            .as_ref()
            .and_then(|(last, result)| (last == deps).then(|| Rc::clone(result)))
    }

    /// Replaces the snapshot. Called only after a recomputation returns, so
    /// a panicking behavior leaves the previous snapshot intact.
    pub fn store(&self, deps: D, result: Rc<R>) {
        *self.last.borrow_mut() = Some((deps, result));
    }
}

impl<D: PartialEq, R> Default for MemoCell<D, R> {
    fn default() -> Self {
        Self::new()
    }
}

struct HookSlot<T: Clone + 'static, R, D> {
    cell: Signal<Option<T>>,
    stale: Rc<RefCell<Option<T>>>,
    memo: MemoCell<D, R>,
}

impl<T: Clone + 'static, R, D: PartialEq> HookSlot<T, R, D> {
    fn new() -> Self {
        Self {
            cell: Signal::new(None),
            stale: Rc::new(RefCell::new(None)),
            memo: MemoCell::new(),
        }
    }

    fn handle(&self, dirty: Rc<Cell<bool>>) -> StateHandle<T> {
        StateHandle {
            cell: self.cell.clone(),
            stale: Rc::clone(&self.stale),
            dirty,
        }
    }
}

/// Runs `behavior` as a dynamic hook at this callsite.
///
/// `behavior` receives the hook's [`StateHandle`] and its return value is
/// memoized: while `deps` compares equal to the previous render's value the
/// cached `Rc` is returned untouched and `behavior` is not called. Any
/// `D: PartialEq` works as the dependency value — tuples, arrays and `Vec`s
/// give element-wise comparison (a length change compares unequal), `()` is
/// the canonical "compute once" list.
///
/// ```
/// use rehook_core::prelude::*;
///
/// let mut host = Host::new();
/// let count = host.render(|| {
///     use_dynamic([5], |state: &StateHandle<i32>| state.get().unwrap_or(5))
/// });
/// assert_eq!(*count, 5);
/// ```
///
/// A panic inside `behavior` propagates unmodified and leaves the previous
/// memoized state intact.
///
/// Must be called during [`Host::render`](crate::Host::render); panics
/// otherwise. Slot resolution is positional, like [`remember`] — for
/// conditionally-composed hooks use [`use_dynamic_keyed`].
pub fn use_dynamic<T, R, D>(deps: D, behavior: impl FnOnce(&StateHandle<T>) -> R) -> Rc<R>
where
    T: Clone + 'static,
    R: 'static,
    D: PartialEq + 'static,
{
    let slot = remember(HookSlot::<T, R, D>::new);
    run_hook(&slot, deps, behavior)
}

/// [`use_dynamic`] with key-based slot resolution, stable across conditional
/// composition.
pub fn use_dynamic_keyed<T, R, D>(
    key: impl Into<String>,
    deps: D,
    behavior: impl FnOnce(&StateHandle<T>) -> R,
) -> Rc<R>
where
    T: Clone + 'static,
    R: 'static,
    D: PartialEq + 'static,
{
    let slot = remember_with_key(key, HookSlot::<T, R, D>::new);
    run_hook(&slot, deps, behavior)
}

/// Compute-once hook: `behavior` runs on the first render and never again
/// for the host's lifetime. Sugar for `use_dynamic((), behavior)`.
pub fn use_dynamic_once<T, R>(behavior: impl FnOnce(&StateHandle<T>) -> R) -> Rc<R>
where
    T: Clone + 'static,
    R: 'static,
{
    use_dynamic((), behavior)
}

fn run_hook<T, R, D>(
    slot: &Rc<HookSlot<T, R, D>>,
    deps: D,
    behavior: impl FnOnce(&StateHandle<T>) -> R,
) -> Rc<R>
where
    T: Clone + 'static,
    R: 'static,
    D: PartialEq + 'static,
{
    // Refresh the read side once this render commits, whether or not the
    // behavior runs. This is what gives `get` its one-commit lag.
    {
        let cell = slot.cell.clone();
        let stale = Rc::clone(&slot.stale);
        after_commit(move || {
            *stale.borrow_mut() = cell.get();
        });
    }

    if let Some(result) = slot.memo.lookup(&deps) {
        return result;
    }

    // No borrows are held across the behavior call: it may use hooks of its
    // own, write state, or unwind.
    let handle = slot.handle(active_dirty());
    let result = Rc::new(behavior(&handle));
    slot.memo.store(deps, Rc::clone(&result));
    result
}
