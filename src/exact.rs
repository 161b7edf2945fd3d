//! Exact majority-rule evaluation of defender allocations.
//!
//! Every defender allocation is played against every attacker allocation.
//! A battlefield goes to the defender only when it commits strictly more
//! units; ties go to the attacker. The defender wins the engagement when it
//! takes strictly more than `num_battlefields / 2` battlefields.
//!
//! The attacker pool is treated as a uniform prior, so a win probability
//! here is "fraction of attacker allocations beaten", not an equilibrium
//! quantity.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{BlottoError, BlottoResult};
use crate::game::Allocation;

/// Number of ranked defender strategies reported when not specified.
pub const DEFAULT_TOP_K: usize = 10;

/// A defender allocation with its win probability against the attacker
/// pool. `index` is the allocation's position in the defender pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAllocation {
    pub index: usize,
    pub allocation: Allocation,
    pub win_probability: f64,
}

/// Battlefields won by the defender (strict majority of units).
#[inline]
pub fn battlefields_won(defender: &[u32], attacker: &[u32]) -> usize {
    defender
        .iter()
        .zip(attacker)
        .filter(|(d, a)| d > a)
        .count()
}

/// Whether the defender wins the engagement under the majority rule.
#[inline]
pub fn defender_wins(defender: &[u32], attacker: &[u32], num_battlefields: usize) -> bool {
    battlefields_won(defender, attacker) > num_battlefields / 2
}

fn ensure_non_empty(defenders: &[Allocation], attackers: &[Allocation]) -> BlottoResult<()> {
    if defenders.is_empty() {
        return Err(BlottoError::EmptyStrategySpace(
            "no defender allocations to evaluate".to_string(),
        ));
    }
    if attackers.is_empty() {
        return Err(BlottoError::EmptyStrategySpace(
            "no attacker allocations to evaluate against".to_string(),
        ));
    }
    Ok(())
}

/// Win probability of each defender allocation, in defender order.
pub fn win_probabilities(
    defenders: &[Allocation],
    attackers: &[Allocation],
    num_battlefields: usize,
) -> BlottoResult<Vec<f64>> {
    ensure_non_empty(defenders, attackers)?;

    let total = attackers.len() as f64;
    let probs = defenders
        .par_iter()
        .map(|d| {
            let wins = attackers
                .iter()
                .filter(|a| defender_wins(d.units(), a.units(), num_battlefields))
                .count();
            wins as f64 / total
        })
        .collect();

    Ok(probs)
}

/// The `k` defender allocations with the highest win probability,
/// best first.
///
/// The sort is stable, so allocations with equal probability keep their
/// enumeration order (lower index first).
pub fn rank_defenders(
    defenders: &[Allocation],
    attackers: &[Allocation],
    num_battlefields: usize,
    k: usize,
) -> BlottoResult<Vec<RankedAllocation>> {
    let probs = win_probabilities(defenders, attackers, num_battlefields)?;

    let mut order: Vec<usize> = (0..defenders.len()).collect();
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

    Ok(order
        .into_iter()
        .take(k)
        .map(|index| RankedAllocation {
            index,
            allocation: defenders[index].clone(),
            win_probability: probs[index],
        })
        .collect())
}

/// Full win/loss table: `table[d][a]` is true when defender `d` beats
/// attacker `a`.
pub fn outcome_table(
    defenders: &[Allocation],
    attackers: &[Allocation],
    num_battlefields: usize,
) -> BlottoResult<Vec<Vec<bool>>> {
    ensure_non_empty(defenders, attackers)?;

    Ok(defenders
        .par_iter()
        .map(|d| {
            attackers
                .iter()
                .map(|a| defender_wins(d.units(), a.units(), num_battlefields))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_attacker() {
        assert_eq!(battlefields_won(&[1, 1, 1], &[1, 1, 1]), 0);
        assert!(!defender_wins(&[2, 2], &[2, 2], 2));
    }

    #[test]
    fn majority_threshold_uses_floor() {
        // 5 battlefields: need 3.
        assert!(!defender_wins(&[1, 1, 0, 0, 0], &[0, 0, 1, 1, 1], 5));
        assert!(defender_wins(&[1, 1, 1, 0, 0], &[0, 0, 0, 1, 1], 5));
        // 4 battlefields: 2 of 4 is a tie, which the attacker takes.
        assert!(!defender_wins(&[1, 1, 0, 0], &[0, 0, 1, 1], 4));
        assert!(defender_wins(&[1, 1, 1, 0], &[0, 0, 0, 3], 4));
    }

    #[test]
    fn empty_side_is_an_error() {
        let some = vec![Allocation::new(vec![1, 0])];
        assert!(matches!(
            win_probabilities(&[], &some, 2),
            Err(BlottoError::EmptyStrategySpace(_))
        ));
        assert!(matches!(
            rank_defenders(&some, &[], 2, 10),
            Err(BlottoError::EmptyStrategySpace(_))
        ));
    }

    #[test]
    fn stable_tie_break_keeps_enumeration_order() {
        let defenders = vec![
            Allocation::new(vec![0, 2]),
            Allocation::new(vec![1, 1]),
            Allocation::new(vec![2, 0]),
        ];
        let attackers = defenders.clone();
        let ranked = rank_defenders(&defenders, &attackers, 2, 10).unwrap();
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
