//! Process-wide monotonic state ids.

use std::sync::atomic::{AtomicU64, Ordering};

use iso_core::StateId;

/// Hands out strictly increasing state ids, starting at 1. Ids are never
/// reused, even when the caller fails to use one.
#[derive(Debug)]
pub struct StateIdCounter {
    next: AtomicU64,
}

impl StateIdCounter {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next id.
    pub fn next_id(&self) -> StateId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> StateId {
        self.next.load(Ordering::SeqCst)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.peek() - 1
    }
}

impl Default for StateIdCounter {
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
    fn starts_at_one() {
        let ids = StateIdCounter::new();
        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn concurrent_ids_are_unique() {
        let ids = Arc::new(StateIdCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..100).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<StateId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800);
        assert_eq!(all.first(), Some(&1));
        assert_eq!(all.last(), Some(&800));
    }
}
