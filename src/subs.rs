//! Open-state subscriber registry
//!
//! Callbacks are keyed by a monotonically increasing counter; ids are never
//! reused, so an unsubscribe for an already-removed id is a no-op.

use std::collections::HashMap;
use std::rc::Rc;

/// Callback invoked with the current open-state flag.
pub type SubscriberFn = Rc<dyn Fn(bool)>;

#[derive(Default)]
pub struct Subscribers {
    entries: HashMap<u64, SubscriberFn>,
    next_id: u64,
}

impl Subscribers {
    /// Register a callback under a fresh id.
    pub fn insert(&mut self, callback: SubscriberFn) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.insert(id, callback);
        id
    }

    /// Remove the callback registered under `id`. No-op if already removed.
    pub fn remove(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    /// Snapshot the currently registered callbacks.
    ///
    /// Callers invoke the snapshot outside any `RefCell` borrow so a callback
    /// may subscribe or unsubscribe reentrantly without panicking.
    pub fn snapshot(&self) -> Vec<SubscriberFn> {
        self.entries.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(counter: &Rc<Cell<u32>>) -> SubscriberFn {
        let counter = counter.clone();
        Rc::new(move |_open| counter.set(counter.get() + 1))
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut subs = Subscribers::default();
        let counter = Rc::new(Cell::new(0));

        let a = subs.insert(counting(&counter));
        let b = subs.insert(counting(&counter));
        assert_eq!(a, 0);
        assert_eq!(b, 1);

        subs.remove(a);
        let c = subs.insert(counting(&counter));
        assert_eq!(c, 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut subs = Subscribers::default();
        let counter = Rc::new(Cell::new(0));

        let id = subs.insert(counting(&counter));
        subs.remove(id);
        subs.remove(id);

        for cb in subs.snapshot() {
            cb(true);
        }
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn snapshot_invokes_all_registered() {
        let mut subs = Subscribers::default();
        let counter = Rc::new(Cell::new(0));

        subs.insert(counting(&counter));
        subs.insert(counting(&counter));
        let removed = subs.insert(counting(&counter));
        subs.remove(removed);

        for cb in subs.snapshot() {
            cb(true);
        }
        assert_eq!(counter.get(), 2);
    }
}
