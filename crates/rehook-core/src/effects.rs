use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::remember;
use crate::scope::{current_scope, scoped_effect};

/// Cleanup guard; runs its closure at most once, no matter how many clones
/// call [`Dispose::run`].
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    pub fn run(&self) {
        if let Some(f) = self.0.borrow_mut().take() {
            f()
        }
    }
}

/// Runs `f` immediately and wires its cleanup to the current scope, so it
/// fires on unmount. Returns the cleanup guard for manual early disposal.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let dispose = f();
    if let Some(scope) = current_scope() {
        let d = dispose.clone();
        scope.add_disposer(move || d.run());
    }
    dispose
}

/// Builds the cleanup half of an [`effect`].
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

/// Runs `effect` when `key` differs from the previous render's key (the
/// first render always runs it), disposing the previous cleanup first. The
/// last cleanup runs when the owning host unmounts.
pub fn key_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| RefCell::new(false));

    // One unmount disposer per callsite.
    if !*installed.borrow() {
        *installed.borrow_mut() = true;
        let cleanup = cleanup.clone();
        scoped_effect(move || {
            Box::new(move || {
                if let Some(d) = cleanup.borrow_mut().take() {
                    d.run();
                }
            })
        });
    }

    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);
        if let Some(d) = cleanup.borrow_mut().take() {
            d.run();
        }
        *cleanup.borrow_mut() = Some(effect());
    }
}
