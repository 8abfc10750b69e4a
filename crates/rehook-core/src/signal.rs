use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle for a registered subscriber.
    pub struct SubKey;
}

/// Cloneable handle to a single observable value cell.
///
/// This is the state-cell primitive the rest of the crate builds on: each
/// hook slot keeps its private value in one, and the host copies it into the
/// stale-side cache when a render commits.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: SlotMap<SubKey, Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    /// Current value, cloned out of the cell.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Replaces the value and notifies subscribers with the new one.
    pub fn set(&self, value: T) {
        self.0.borrow_mut().value = value;
        self.notify();
    }

    /// Mutates the value in place, then notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    /// Registers `f` to run after every write. The returned key can be passed
    /// to [`Signal::unsubscribe`].
    ///
    /// A subscriber may read this signal re-entrantly (`get`); it must not
    /// write it (`set`/`update`) — the cell is borrowed for the duration of
    /// the notification and a re-entrant write panics.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubKey {
        self.0.borrow_mut().subs.insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, key: SubKey) {
        self.0.borrow_mut().subs.remove(key);
    }

    fn notify(&self) {
        // Snapshot so a subscriber may subscribe/unsubscribe re-entrantly;
        // the value stays borrowed per call, so reads are fine but writes
        // from a subscriber are not.
        let subs: Vec<Rc<dyn Fn(&T)>> = self.0.borrow().subs.values().cloned().collect();
        for sub in subs {
            sub(&self.0.borrow().value);
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

pub fn signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
