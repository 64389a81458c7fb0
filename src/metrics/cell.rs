use std::sync::atomic::{AtomicU64, Ordering};

/// Counter bumped from `&self` methods such as `peek_lfu` and `frequency`.
///
/// Atomic so that a plain `LfuCache` shared by reference across threads
/// stays race-free. Counts are independent, so `Relaxed` ordering suffices.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(AtomicU64);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_from_shared_reference() {
        let cell = MetricsCell::new();
        let view = &cell;
        view.incr();
        view.incr();
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn no_increments_lost_across_threads() {
        let cell = MetricsCell::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..10_000 {
                        cell.incr();
                    }
                });
            }
        });
        assert_eq!(cell.get(), 80_000);
    }
}
