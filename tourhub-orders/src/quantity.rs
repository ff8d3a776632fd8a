use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Randomized quantity draws for synthetic orders, behind a seedable
/// generator so a scenario can be replayed exactly in tests.
pub struct QuantityPolicy {
    rng: Mutex<StdRng>,
}

impl QuantityPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Purchase-order line quantity, uniform in [5, 14]
    pub fn purchase_quantity(&self) -> u32 {
        self.rng.lock().expect("rng poisoned").gen_range(5..=14)
    }

    /// Demo sales-order line quantity, uniform in [1, 3]
    pub fn demo_quantity(&self) -> u32 {
        self.rng.lock().expect("rng poisoned").gen_range(1..=3)
    }

    /// Line count for a multi-line demo order: min(2 + rand(0..=2), available),
    /// so orders carry between 2 and 4 lines when enough products are selected
    pub fn multi_line_width(&self, available: usize) -> usize {
        let extra: usize = self.rng.lock().expect("rng poisoned").gen_range(0..=2);
        (2 + extra).min(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_quantity_in_range() {
        let policy = QuantityPolicy::from_entropy();
        for _ in 0..100 {
            let q = policy.purchase_quantity();
            assert!((5..=14).contains(&q));
        }
    }

    #[test]
    fn test_demo_quantity_in_range() {
        let policy = QuantityPolicy::from_entropy();
        for _ in 0..100 {
            let q = policy.demo_quantity();
            assert!((1..=3).contains(&q));
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let a = QuantityPolicy::seeded(42);
        let b = QuantityPolicy::seeded(42);
        let draws_a: Vec<u32> = (0..20).map(|_| a.purchase_quantity()).collect();
        let draws_b: Vec<u32> = (0..20).map(|_| b.purchase_quantity()).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn test_multi_line_width_capped_by_available() {
        let policy = QuantityPolicy::seeded(7);
        for _ in 0..20 {
            assert_eq!(policy.multi_line_width(1), 1);
            let w = policy.multi_line_width(5);
            assert!((2..=4).contains(&w));
        }
    }

    #[test]
    fn test_multi_line_width_spans_two_to_four() {
        let policy = QuantityPolicy::seeded(7);
        let widths: Vec<usize> = (0..256).map(|_| policy.multi_line_width(6)).collect();
        assert_eq!(widths.iter().min(), Some(&2));
        assert_eq!(widths.iter().max(), Some(&4));
    }
}
