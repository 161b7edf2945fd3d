//! Random strategy pools for games too large to enumerate.
//!
//! Positions are filled left to right. Each position draws uniformly from
//! `[lo, min(capacity, remaining)]`, where `lo` is the smallest value that
//! still lets the later positions absorb the remainder (zero in the usual
//! case). The last position takes whatever is left.
//!
//! The resulting distribution is not uniform over feasible allocations:
//! early positions lean towards small values and the last position towards
//! saturation. Every sample is feasible.

use rand::Rng;

use crate::error::{BlottoError, BlottoResult};
use crate::game::{Allocation, Battlefields, StrategyPool};

/// Draw one feasible allocation of `budget` under `bounds`.
///
/// `budget` must not exceed `bounds`' total and `bounds` must be
/// non-empty; [`sample_pool`] checks both before calling this.
pub fn random_allocation<R: Rng + ?Sized>(budget: u32, bounds: &[u32], rng: &mut R) -> Allocation {
    let n = bounds.len();
    let mut units = vec![0u32; n];

    // tail[i] = capacity of positions i+1..n
    let mut tail = vec![0u64; n];
    for i in (0..n.saturating_sub(1)).rev() {
        tail[i] = tail[i + 1] + bounds[i + 1] as u64;
    }

    let mut remaining = budget;
    for i in 0..n.saturating_sub(1) {
        let hi = bounds[i].min(remaining);
        let lo = (remaining as u64).saturating_sub(tail[i]).min(hi as u64) as u32;
        let draw = rng.gen_range(lo..=hi);
        units[i] = draw;
        remaining -= draw;
    }
    if n > 0 {
        units[n - 1] = remaining.min(bounds[n - 1]);
    }

    Allocation::new(units)
}

/// Sample `pool_size` allocations of `budget` into a [`StrategyPool`].
///
/// Duplicates are kept: the pool is an ordered sample, not a set.
pub fn sample_pool<R: Rng + ?Sized>(
    budget: u32,
    battlefields: &Battlefields,
    pool_size: usize,
    rng: &mut R,
) -> BlottoResult<StrategyPool> {
    if pool_size == 0 {
        return Err(BlottoError::InvalidConfiguration(
            "Pool size must be positive".to_string(),
        ));
    }
    if battlefields.is_empty() || !battlefields.can_hold(budget) {
        return Err(BlottoError::EmptyStrategySpace(format!(
            "cannot sample {} units across a total capacity of {}",
            budget,
            battlefields.total_capacity()
        )));
    }

    if budget as u64 == battlefields.total_capacity() {
        log::warn!(
            "budget {} fills every battlefield; all {} sampled allocations are identical",
            budget,
            pool_size
        );
    }

    let bounds = battlefields.capacities();
    let allocations: Vec<Allocation> = (0..pool_size)
        .map(|_| random_allocation(budget, &bounds, rng))
        .collect();

    StrategyPool::new(budget, battlefields, allocations)
}
