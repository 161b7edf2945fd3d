//! Mixed strategy to expected per-battlefield allocation.

use crate::error::{BlottoError, BlottoResult};
use crate::game::StrategyPool;

/// Expected units on each battlefield when playing `strategy` over `pool`.
///
/// Every pool member sums to the pool budget and the weights sum to one,
/// so the result sums to the budget as well.
pub fn expected_allocation(pool: &StrategyPool, strategy: &[f64]) -> BlottoResult<Vec<f64>> {
    if strategy.len() != pool.len() {
        return Err(BlottoError::DimensionMismatch {
            expected: pool.len(),
            got: strategy.len(),
        });
    }

    let width = pool.get(0).map_or(0, |a| a.len());
    let mut expected = vec![0.0f64; width];
    for (alloc, &p) in pool.iter().zip(strategy) {
        if p == 0.0 {
            continue;
        }
        for (e, &u) in expected.iter_mut().zip(alloc.units()) {
            *e += p * u as f64;
        }
    }

    Ok(expected)
}

/// The `k` pool members with the largest weight, heaviest first.
pub fn top_weighted(strategy: &[f64], k: usize) -> Vec<(usize, f64)> {
    let mut indexed: Vec<(usize, f64)> = strategy.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Allocation, Battlefields};

    fn pool() -> StrategyPool {
        let fields = Battlefields::unweighted(&[2, 2]).unwrap();
        StrategyPool::new(
            2,
            &fields,
            vec![
                Allocation::new(vec![0, 2]),
                Allocation::new(vec![1, 1]),
                Allocation::new(vec![2, 0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn pure_strategy_returns_member() {
        assert_eq!(expected_allocation(&pool(), &[0.0, 0.0, 1.0]).unwrap(), vec![2.0, 0.0]);
    }

    #[test]
    fn uniform_mixture() {
        let e = expected_allocation(&pool(), &[1.0 / 3.0; 3]).unwrap();
        assert!((e[0] - 1.0).abs() < 1e-12);
        assert!((e[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch() {
        assert!(matches!(
            expected_allocation(&pool(), &[1.0]),
            Err(BlottoError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn top_weighted_orders_by_weight() {
        assert_eq!(top_weighted(&[0.1, 0.6, 0.3], 2), vec![(1, 0.6), (2, 0.3)]);
    }
}
