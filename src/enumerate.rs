//! Exhaustive enumeration of bounded integer allocations.
//!
//! The number of allocations grows exponentially with the number of
//! battlefields. Callers that accept user-sized inputs should check
//! [`count_allocations_up_to`] first: its cost is bounded by the limit, not
//! by the budget.

use crate::game::Allocation;

/// `tail[i]` = total capacity of positions `i+1..n`.
fn tail_capacities(bounds: &[u32]) -> Vec<u64> {
    let mut tail = vec![0u64; bounds.len()];
    for i in (0..bounds.len().saturating_sub(1)).rev() {
        tail[i] = tail[i + 1] + bounds[i + 1] as u64;
    }
    tail
}

fn total_capacity(bounds: &[u32]) -> u64 {
    bounds.iter().map(|&b| b as u64).sum()
}

/// Every vector of `bounds.len()` non-negative integers that sums to
/// `total` with `v[i] <= bounds[i]`.
///
/// Output is lexicographic ascending. Returns an empty list when `bounds`
/// is empty or `total` is unreachable.
pub fn enumerate_allocations(total: u32, bounds: &[u32]) -> Vec<Allocation> {
    let mut out = Vec::new();
    if bounds.is_empty() || total as u64 > total_capacity(bounds) {
        return out;
    }

    let tail = tail_capacities(bounds);
    let mut prefix = vec![0u32; bounds.len()];
    fill(total, bounds, &tail, 0, &mut prefix, &mut out);
    out
}

/// Recursive step: position `depth` takes each value that still leaves a
/// reachable remainder, writing into the shared `prefix` buffer.
fn fill(
    remaining: u32,
    bounds: &[u32],
    tail: &[u64],
    depth: usize,
    prefix: &mut [u32],
    out: &mut Vec<Allocation>,
) {
    let last = bounds.len() - 1;
    if depth == last {
        prefix[last] = remaining;
        out.push(Allocation::new(prefix.to_vec()));
        return;
    }

    let lo = (remaining as u64).saturating_sub(tail[depth]) as u32;
    for units in lo..=remaining.min(bounds[depth]) {
        prefix[depth] = units;
        fill(remaining - units, bounds, tail, depth + 1, prefix, out);
    }
}

/// Number of allocations [`enumerate_allocations`] would produce, without
/// building them. Saturates at `u128::MAX`.
///
/// Memory grows with `min(total, capacity - total)`.
pub fn count_allocations(total: u32, bounds: &[u32]) -> u128 {
    let capacity = total_capacity(bounds);
    if bounds.is_empty() || total as u64 > capacity {
        return 0;
    }

    // v -> bounds - v maps splits of `total` onto splits of the complement.
    let total = (total as u64).min(capacity - total as u64) as usize;

    // ways[t] = number of ways to place t units on the positions seen so far.
    let mut ways = vec![0u128; total + 1];
    ways[0] = 1;
    let mut prefix = Vec::with_capacity(total + 2);
    for &bound in bounds {
        let bound = bound as usize;
        prefix.clear();
        prefix.push(0u128);
        for &w in &ways {
            match prefix[prefix.len() - 1].checked_add(w) {
                Some(sum) => prefix.push(sum),
                None => return u128::MAX,
            }
        }
        for (t, slot) in ways.iter_mut().enumerate() {
            let lo = t.saturating_sub(bound);
            *slot = prefix[t + 1] - prefix[lo];
        }
    }
    ways[total]
}

/// Number of allocations, or `limit + 1` once the count passes `limit`.
///
/// Walks the same pruned recursion as [`enumerate_allocations`] without
/// building anything. Every branch reaches at least one allocation, so the
/// work is bounded by `limit` times the number of battlefields and memory
/// by the number of battlefields.
pub fn count_allocations_up_to(total: u32, bounds: &[u32], limit: u64) -> u128 {
    if bounds.is_empty() || total as u64 > total_capacity(bounds) {
        return 0;
    }

    let cap = limit as u128 + 1;
    let tail = tail_capacities(bounds);
    let mut count = 0u128;
    count_from(total as u64, bounds, &tail, 0, cap, &mut count);
    count.min(cap)
}

fn count_from(
    remaining: u64,
    bounds: &[u32],
    tail: &[u64],
    depth: usize,
    cap: u128,
    count: &mut u128,
) {
    let last = bounds.len() - 1;
    if depth == last {
        *count += 1;
        return;
    }

    let lo = remaining.saturating_sub(tail[depth]);
    let hi = remaining.min(bounds[depth] as u64);
    if depth + 1 == last {
        // Each value leaves a remainder the last position can hold.
        *count += (hi - lo + 1) as u128;
        return;
    }

    for units in lo..=hi {
        count_from(remaining - units, bounds, tail, depth + 1, cap, count);
        if *count >= cap {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(allocs: &[Allocation]) -> Vec<Vec<u32>> {
        allocs.iter().map(|a| a.units().to_vec()).collect()
    }

    #[test]
    fn three_unit_fields_two_units() {
        let allocs = enumerate_allocations(2, &[1, 1, 1]);
        assert_eq!(units(&allocs), vec![vec![0, 1, 1], vec![1, 0, 1], vec![1, 1, 0]]);
    }

    #[test]
    fn single_position_base_case() {
        assert_eq!(units(&enumerate_allocations(3, &[5])), vec![vec![3]]);
        assert!(enumerate_allocations(6, &[5]).is_empty());
    }

    #[test]
    fn empty_bounds_yield_nothing() {
        assert!(enumerate_allocations(0, &[]).is_empty());
        assert_eq!(count_allocations(0, &[]), 0);
        assert_eq!(count_allocations_up_to(0, &[], 10), 0);
    }

    #[test]
    fn unreachable_total_yields_nothing() {
        assert!(enumerate_allocations(7, &[2, 2, 2]).is_empty());
        assert_eq!(count_allocations(7, &[2, 2, 2]), 0);
        assert_eq!(count_allocations_up_to(7, &[2, 2, 2], 10), 0);
    }

    #[test]
    fn huge_unreachable_total_is_cheap() {
        assert!(enumerate_allocations(u32::MAX, &[4, 3]).is_empty());
        assert_eq!(count_allocations(u32::MAX, &[4, 3]), 0);
        assert_eq!(count_allocations_up_to(u32::MAX, &[4, 3], 100), 0);
    }

    #[test]
    fn zero_total_is_the_zero_vector() {
        assert_eq!(units(&enumerate_allocations(0, &[3, 3])), vec![vec![0, 0]]);
        assert_eq!(count_allocations(0, &[3, 3]), 1);
        assert_eq!(count_allocations_up_to(0, &[3, 3], 10), 1);
    }

    #[test]
    fn count_matches_enumeration() {
        for (total, bounds) in [
            (2u32, vec![1u32, 1, 1]),
            (2, vec![2, 2]),
            (15, vec![4, 3, 6, 4, 3]),
            (16, vec![4, 3, 6, 4, 3]),
            (5, vec![0, 5, 2]),
            (9, vec![3, 3, 3, 1]),
        ] {
            let n = enumerate_allocations(total, &bounds).len() as u128;
            assert_eq!(count_allocations(total, &bounds), n, "total={} bounds={:?}", total, bounds);
            assert_eq!(count_allocations_up_to(total, &bounds, u64::MAX - 1), n);
        }
    }

    #[test]
    fn bounded_count_stops_past_limit() {
        let bounds = [4, 3, 6, 4, 3];
        let exact = count_allocations(16, &bounds);
        assert!(exact > 11);
        assert_eq!(count_allocations_up_to(16, &bounds, 10), 11);
        assert_eq!(count_allocations_up_to(16, &bounds, exact as u64), exact);
        assert_eq!(count_allocations_up_to(16, &bounds, exact as u64 - 1), exact);
    }

    #[test]
    fn wide_fields_do_not_scale_with_budget() {
        assert_eq!(
            count_allocations_up_to(u32::MAX, &[u32::MAX, u32::MAX], 5_000_000),
            5_000_001
        );
        // One unit of slack: only two splits, and the complement DP is tiny.
        assert_eq!(count_allocations(u32::MAX, &[u32::MAX, 1]), 2);
        assert_eq!(count_allocations_up_to(u32::MAX, &[u32::MAX, 1], 10), 2);
    }

    #[test]
    fn count_saturates_instead_of_overflowing() {
        let bounds = vec![u32::MAX; 64];
        assert_eq!(count_allocations(5000, &bounds), u128::MAX);
    }
}
