//! Latest-value publication cell
//!
//! The owning producer replaces the whole value in one step; readers clone
//! it out under a read lock. A reader therefore sees either the previous
//! value or the new one, never a mix of the two.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Most recently published value of a stream.
#[derive(Debug)]
pub struct LatestValue<T> {
    value: RwLock<Option<T>>,
    /// Number of publications so far
    publications: AtomicU64,
}

impl<T: Clone> LatestValue<T> {
    /// An empty cell
    pub fn new() -> Self {
        LatestValue {
            value: RwLock::new(None),
            publications: AtomicU64::new(0),
        }
    }

    /// Replace the current value. Returns the publication count including
    /// this one.
    pub fn publish(&self, value: T) -> u64 {
        let mut slot = self.value.write();
        *slot = Some(value);
        self.publications.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Current value, `None` before the first publication
    pub fn get(&self) -> Option<T> {
        self.value.read().clone()
    }

    /// How many values have been published
    pub fn publications(&self) -> u64 {
        self.publications.load(Ordering::Acquire)
    }
}

impl<T: Clone> Default for LatestValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_until_published() {
        let cell: LatestValue<u64> = LatestValue::new();
        assert_eq!(cell.get(), None);
        assert_eq!(cell.publications(), 0);
    }

    #[test]
    fn test_publish_replaces() {
        let cell = LatestValue::new();
        assert_eq!(cell.publish(1u64), 1);
        assert_eq!(cell.publish(2u64), 2);
        assert_eq!(cell.get(), Some(2));
        assert_eq!(cell.publications(), 2);
    }

    #[test]
    fn test_readers_never_see_torn_values() {
        // Each published pair has both halves equal; a torn read would not.
        let cell = Arc::new(LatestValue::new());
        cell.publish((0u64, 0u64));

        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                for i in 1..5_000u64 {
                    cell.publish((i, i));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..5_000 {
                        let (a, b) = cell.get().unwrap();
                        assert_eq!(a, b);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(cell.get(), Some((4_999, 4_999)));
    }
}
