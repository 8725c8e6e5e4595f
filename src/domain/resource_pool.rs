//! `ResourcePool`: a thread-safe bounded token bucket backing agent energy.

use std::sync::Mutex;

/// A bounded pool of fungible resource (energy), accessed through a
/// serialized `request`/`release` interface so concurrent agents never
/// overdraw the balance.
#[derive(Debug)]
pub struct ResourcePool {
    state: Mutex<PoolState>,
}

#[derive(Debug, Clone, Copy)]
struct PoolState {
    available: f64,
    max: f64,
}

impl ResourcePool {
    #[must_use]
    pub fn new(initial: f64, max: f64) -> Self {
        let max = max.max(0.0);
        let available = initial.clamp(0.0, max);
        Self {
            state: Mutex::new(PoolState { available, max }),
        }
    }

    /// Requests up to `amount`, withdrawing `min(amount, available)`
    /// atomically and returning what was actually granted.
    ///
    /// Negative or non-finite requests grant 0 and change nothing.
    pub fn request(&self, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let mut state = self.state.lock().expect("resource pool mutex poisoned");
        let granted = amount.min(state.available);
        state.available -= granted;
        granted
    }

    /// Returns `amount` to the pool, capped at `max`. Negative amounts are
    /// ignored.
    pub fn release(&self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        let mut state = self.state.lock().expect("resource pool mutex poisoned");
        state.available = (state.available + amount).min(state.max);
    }

    /// Current balance.
    #[must_use]
    pub fn available(&self) -> f64 {
        self.state.lock().expect("resource pool mutex poisoned").available
    }

    /// Configured maximum capacity.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.state.lock().expect("resource pool mutex poisoned").max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn request_grants_at_most_available() {
        let pool = ResourcePool::new(5.0, 10.0);
        assert_eq!(pool.request(3.0), 3.0);
        assert_eq!(pool.available(), 2.0);
        assert_eq!(pool.request(10.0), 2.0);
        assert_eq!(pool.available(), 0.0);
    }

    #[test]
    fn release_caps_at_max() {
        let pool = ResourcePool::new(8.0, 10.0);
        pool.release(100.0);
        assert_eq!(pool.available(), 10.0);
    }

    #[test]
    fn negative_and_non_finite_requests_are_no_ops() {
        let pool = ResourcePool::new(5.0, 10.0);
        assert_eq!(pool.request(-1.0), 0.0);
        assert_eq!(pool.request(f64::NAN), 0.0);
        assert_eq!(pool.request(f64::INFINITY), 0.0);
        assert_eq!(pool.available(), 5.0);
    }

    #[test]
    fn negative_release_is_ignored() {
        let pool = ResourcePool::new(5.0, 10.0);
        pool.release(-3.0);
        assert_eq!(pool.available(), 5.0);
    }

    #[test]
    fn concurrent_requests_never_overdraw() {
        let pool = Arc::new(ResourcePool::new(100.0, 100.0));
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || pool.request(10.0))
            })
            .collect();
        let total_granted: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total_granted, 100.0);
        assert_eq!(pool.available(), 0.0);
    }

    proptest! {
        #[test]
        fn available_stays_within_bounds(
            initial in 0.0f64..100.0,
            max in 0.0f64..200.0,
            ops in proptest::collection::vec((-50.0f64..50.0, any::<bool>()), 0..30),
        ) {
            let max = max.max(initial);
            let pool = ResourcePool::new(initial, max);
            for (amount, is_request) in ops {
                if is_request {
                    pool.request(amount);
                } else {
                    pool.release(amount);
                }
                let available = pool.available();
                prop_assert!(available >= 0.0 && available <= max + 1e-9);
            }
        }
    }
}
