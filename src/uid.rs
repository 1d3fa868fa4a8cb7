//! Process-wide unique ids for wizard instances.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Prefix of every generated instance id.
pub const UID_PREFIX: &str = "steps-uid-";

static GLOBAL: UidCounter = UidCounter::new();

/// Monotonic id source. Safe to share between threads.
#[derive(Debug, Default)]
pub struct UidCounter {
    issued: AtomicUsize,
}

/// An issued id together with whether it was the counter's first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uid {
    pub value: String,
    pub first: bool,
}

impl UidCounter {
    pub const fn new() -> Self {
        Self {
            issued: AtomicUsize::new(0),
        }
    }

    pub fn next_uid(&self) -> Uid {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Uid {
            value: format!("{UID_PREFIX}{n}"),
            first: n == 1,
        }
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

/// Next id from the process-wide counter.
pub fn next_uid() -> Uid {
    GLOBAL.next_uid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_are_sequential() {
        let counter = UidCounter::new();
        let a = counter.next_uid();
        let b = counter.next_uid();
        assert_eq!(a.value, "steps-uid-1");
        assert!(a.first);
        assert_eq!(b.value, "steps-uid-2");
        assert!(!b.first);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let counter = Arc::new(UidCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| counter.next_uid().value)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 200);
    }
}
