use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::HookError;
use crate::scope::Scope;

thread_local! {
    static ACTIVE: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Slot store and render bookkeeping for one host, installed as the thread's
/// active runtime for the duration of a `Host::render` call.
struct Runtime {
    slots: Vec<Option<Box<dyn Any>>>,
    cursor: usize,
    keyed_slots: HashMap<String, Box<dyn Any>>,
    after_commit: SmallVec<[Box<dyn FnOnce()>; 8]>,
    dirty: Rc<Cell<bool>>,
}

impl Runtime {
    fn new(dirty: Rc<Cell<bool>>) -> Self {
        Self {
            slots: Vec::new(),
            cursor: 0,
            keyed_slots: HashMap::new(),
            after_commit: SmallVec::new(),
            dirty,
        }
    }
}

/// One component instance's render lifecycle.
///
/// A `Host` owns everything a hook callsite remembers: the sequential and
/// keyed slot stores, the queue of actions to run after the next commit, and
/// the invalidation flag raised by state writes. Hosts share nothing with
/// each other; each render installs this host's runtime on the thread, runs
/// the composition closure under the root scope, then commits.
///
/// Dropping the host (or calling [`Host::unmount`]) releases every slot and
/// runs the cleanups registered against the root scope.
pub struct Host {
    rt: Option<Runtime>,
    root: Scope,
    dirty: Rc<Cell<bool>>,
}

impl Host {
    pub fn new() -> Self {
        let dirty = Rc::new(Cell::new(false));
        Self {
            rt: Some(Runtime::new(Rc::clone(&dirty))),
            root: Scope::new(),
            dirty,
        }
    }

    /// Runs one render cycle: resets the slot cursor, evaluates `f` with this
    /// host active, then commits (drains the after-commit queue).
    ///
    /// A panic inside `f` propagates unmodified; the slot store is reclaimed
    /// on the way out, so later renders on this host still work. A panicked
    /// render does not commit.
    pub fn render<R>(&mut self, f: impl FnOnce() -> R) -> R {
        let mut rt = self
            .rt
            .take()
            .unwrap_or_else(|| Runtime::new(Rc::clone(&self.dirty)));
        rt.cursor = 0;
        rt.after_commit.clear();
        self.dirty.set(false);
        let prev = ACTIVE.with(|active| active.borrow_mut().replace(rt));

        // Pull the runtime back into the host even if `f` unwinds, and
        // restore whatever was active before (nested hosts).
        struct Reclaim<'a> {
            slot: &'a mut Option<Runtime>,
            prev: Option<Runtime>,
        }
        impl Drop for Reclaim<'_> {
            fn drop(&mut self) {
                let prev = self.prev.take();
                *self.slot =
                    ACTIVE.with(|active| std::mem::replace(&mut *active.borrow_mut(), prev));
            }
        }

        let root = self.root.clone();
        let out = {
            let _reclaim = Reclaim {
                slot: &mut self.rt,
                prev,
            };
            root.run(f)
        };
        self.commit();
        out
    }

    fn commit(&mut self) {
        let Some(rt) = self.rt.as_mut() else { return };
        let jobs = std::mem::take(&mut rt.after_commit);
        log::debug!("commit: running {} after-commit job(s)", jobs.len());
        for job in jobs {
            job();
        }
    }

    /// True when a state write has scheduled another render since the last
    /// one began.
    pub fn needs_render(&self) -> bool {
        self.dirty.get()
    }

    /// Releases all slots and runs the root scope's cleanups. Equivalent to
    /// dropping the host; provided for call sites where the transition should
    /// be explicit.
    pub fn unmount(self) {
        log::debug!("host unmounted");
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.rt.take();
        // Replacing the root handle drops ScopeInner (if last) and runs the
        // registered disposers.
        let root = std::mem::take(&mut self.root);
        root.dispose();
    }
}

fn try_active<R>(f: impl FnOnce(&mut Runtime) -> R) -> Result<R, HookError> {
    ACTIVE.with(|active| match active.borrow_mut().as_mut() {
        Some(rt) => Ok(f(rt)),
        None => Err(HookError::NoActiveHost),
    })
}

fn active<R>(f: impl FnOnce(&mut Runtime) -> R) -> R {
    match try_active(f) {
        Ok(out) => out,
        Err(err) => panic!("{err}"),
    }
}

/// Schedules `job` to run when the current render commits.
///
/// This is the propagation half of the two-phase protocol: recomputation
/// decisions happen synchronously during the render, and anything that must
/// observe the committed state runs from this queue afterwards.
pub fn after_commit(job: impl FnOnce() + 'static) {
    active(|rt| rt.after_commit.push(Box::new(job)));
}

pub(crate) fn active_dirty() -> Rc<Cell<bool>> {
    active(|rt| Rc::clone(&rt.dirty))
}

/// Slot-based remember: the Nth call per render always resolves to the Nth
/// slot. Initializes the slot on first use; on a type change at the same
/// position the slot is replaced (conditional composition — prefer
/// [`remember_with_key`] there).
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let (idx, existing) = active(|rt| {
        let idx = rt.cursor;
        rt.cursor += 1;
        let existing = rt
            .slots
            .get(idx)
            .and_then(|slot| slot.as_ref())
            .and_then(|slot| slot.downcast_ref::<Rc<T>>())
            .cloned();
        (idx, existing)
    });
    if let Some(rc) = existing {
        return rc;
    }

    // Initialize outside the runtime borrow so `init` may itself use hooks.
    let rc: Rc<T> = Rc::new(init());
    active(|rt| {
        if rt.slots.len() <= idx {
            rt.slots.resize_with(idx + 1, || None);
        }
        if rt.slots[idx].is_some() {
            log::warn!("remember: slot {idx} changed type; replacing");
        }
        rt.slots[idx] = Some(Box::new(rc.clone()));
    });
    rc
}

/// Key-based remember, stable across conditional branches.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let (existing, mismatch) = active(|rt| match rt.keyed_slots.get(&key) {
        Some(slot) => match slot.downcast_ref::<Rc<T>>() {
            Some(rc) => (Some(rc.clone()), false),
            None => (None, true),
        },
        None => (None, false),
    });
    if let Some(rc) = existing {
        return rc;
    }
    if mismatch {
        log::warn!("remember_with_key: key '{key}' reused with a different type; replacing");
    }

    let rc: Rc<T> = Rc::new(init());
    active(|rt| {
        rt.keyed_slots.insert(key, Box::new(rc.clone()));
    });
    rc
}

/// `remember` specialized to interior-mutable state.
pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}
