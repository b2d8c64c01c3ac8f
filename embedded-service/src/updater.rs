//! Polling entry point
//!
//! Cooperative firmware calls [`Updater::update`] once per main loop iteration; each
//! registered object then samples its inputs and runs its state machines in place.

/// Anything that wants a slice of time on every main loop iteration.
pub trait Updatable {
    /// Samples inputs and advances internal state. Must not block.
    fn update(&mut self);
}

/// Updates a fixed set of [`Updatable`] objects in registration order.
pub struct Updater<'u, const N: usize> {
    items: [&'u mut dyn Updatable; N],
}

impl<'u, const N: usize> Updater<'u, N> {
    /// Creates an updater over the given objects.
    pub fn new(items: [&'u mut dyn Updatable; N]) -> Self {
        Self { items }
    }

    /// Calls `update()` on every registered object.
    pub fn update(&mut self) {
        for item in self.items.iter_mut() {
            item.update();
        }
    }

    /// Number of registered objects.
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns true if nothing is registered.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        calls: u32,
    }

    impl Updatable for Counter {
        fn update(&mut self) {
            self.calls += 1;
        }
    }

    #[test]
    fn updates_every_item_once_per_call() {
        let mut a = Counter { calls: 0 };
        let mut b = Counter { calls: 0 };

        {
            let mut updater = Updater::new([&mut a as &mut dyn Updatable, &mut b]);
            assert_eq!(updater.len(), 2);
            updater.update();
            updater.update();
        }

        assert_eq!(a.calls, 2);
        assert_eq!(b.calls, 2);
    }

    #[test]
    fn empty_updater() {
        let mut updater: Updater<'_, 0> = Updater::new([]);
        assert!(updater.is_empty());
        updater.update();
    }
}
