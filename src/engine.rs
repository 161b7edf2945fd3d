//! End-to-end pipelines.
//!
//! - [`solve_exact`]: enumerate both strategy spaces and rank defender
//!   allocations under the majority rule.
//! - [`solve_approximate`]: sample pools, build the value-weighted payoff
//!   matrix, run regret matching and aggregate the averaged strategies.
//!
//! Both return plain serializable reports; rendering lives in `display`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::Serialize;

use crate::aggregate::{expected_allocation, top_weighted};
use crate::config::{ApproxConfig, ExactConfig, Game};
use crate::enumerate::count_allocations_up_to;
use crate::error::{BlottoError, BlottoResult};
use crate::exact::{rank_defenders, RankedAllocation};
use crate::game::{Allocation, StrategyPool};
use crate::payoff::PayoffMatrix;
use crate::sampler::sample_pool;
use crate::solver::{RegretMatchingSolver, SolveResult, SolverConfig};

/// Pool members listed per player in an approximate report.
const REPORTED_SUPPORT: usize = 5;

// ---------------------------------------------------------------------------
// Exact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ExactReport {
    pub attacker_budget: u32,
    pub defender_budget: u32,
    pub capacities: Vec<u32>,
    pub attacker_strategies: usize,
    pub defender_strategies: usize,
    pub ranked: Vec<RankedAllocation>,
}

/// Number of allocations of `budget`, or an error once it passes `limit`.
/// Unreachable budgets count as 0 and are left to the enumerator to report.
fn guard_size(budget: u32, capacities: &[u32], limit: u64) -> BlottoResult<u128> {
    let count = count_allocations_up_to(budget, capacities, limit);
    if count > limit as u128 {
        return Err(BlottoError::StrategySpaceTooLarge { budget, limit });
    }
    Ok(count)
}

/// Enumerate both players' allocations and rank the defender's.
pub fn solve_exact(config: &ExactConfig) -> BlottoResult<ExactReport> {
    let game = config.validate()?;
    let capacities = game.battlefields.capacities();

    let def_count = guard_size(game.defender_budget, &capacities, config.max_strategies)?;
    let att_count = guard_size(game.attacker_budget, &capacities, config.max_strategies)?;
    log::info!(
        "enumerating {} defender and {} attacker allocations over {} battlefields",
        def_count,
        att_count,
        capacities.len()
    );

    let defenders = StrategyPool::enumerated(game.defender_budget, &game.battlefields)?;
    let attackers = StrategyPool::enumerated(game.attacker_budget, &game.battlefields)?;

    let ranked = rank_defenders(
        defenders.allocations(),
        attackers.allocations(),
        game.battlefields.len(),
        config.top_k,
    )?;

    Ok(ExactReport {
        attacker_budget: game.attacker_budget,
        defender_budget: game.defender_budget,
        capacities,
        attacker_strategies: attackers.len(),
        defender_strategies: defenders.len(),
        ranked,
    })
}

// ---------------------------------------------------------------------------
// Approximate
// ---------------------------------------------------------------------------

/// A pool member with its weight in the averaged strategy.
#[derive(Debug, Clone, Serialize)]
pub struct WeightedAllocation {
    pub allocation: Allocation,
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproxReport {
    /// Seed the pools were drawn with, if the run was seeded.
    pub seed: Option<u64>,
    pub attacker_budget: u32,
    pub defender_budget: u32,
    pub capacities: Vec<u32>,
    pub values: Vec<f64>,
    pub pool_size: usize,
    pub iterations: usize,
    pub payoff_history: Vec<f64>,
    /// Mean realized attacker payoff over all iterations.
    pub mean_payoff: f64,
    /// Attacker payoff of the averaged profile.
    pub game_value: f64,
    pub exploitability: f64,
    pub attacker_regret: f64,
    pub defender_regret: f64,
    pub attacker_allocation: Vec<f64>,
    pub defender_allocation: Vec<f64>,
    pub attacker_support: Vec<WeightedAllocation>,
    pub defender_support: Vec<WeightedAllocation>,
}

/// Run the approximate pipeline with a generator seeded from the config,
/// or from entropy when no seed is given. The seed used is recorded in the
/// report so the run can be repeated.
pub fn solve_approximate(config: &ApproxConfig) -> BlottoResult<ApproxReport> {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = solve_approximate_with_rng(config, &mut rng)?;
    report.seed = Some(seed);
    Ok(report)
}

/// Run the approximate pipeline drawing pools from `rng`. The attacker
/// pool is drawn first.
pub fn solve_approximate_with_rng<R: Rng + ?Sized>(
    config: &ApproxConfig,
    rng: &mut R,
) -> BlottoResult<ApproxReport> {
    let game = config.validate()?;
    let values = game.battlefields.values();

    log::info!(
        "sampling {} allocations per player over {} battlefields",
        config.pool_size,
        game.battlefields.len()
    );
    let attackers = sample_pool(game.attacker_budget, &game.battlefields, config.pool_size, rng)?;
    let defenders = sample_pool(game.defender_budget, &game.battlefields, config.pool_size, rng)?;

    log::info!("building {}x{} payoff matrix", attackers.len(), defenders.len());
    let matrix = PayoffMatrix::build(&attackers, &defenders, &values)?;

    let solver_config = SolverConfig {
        iterations: config.iterations,
        regret_tolerance: config.regret_tolerance,
    };
    let result = RegretMatchingSolver::new(matrix).solve(&solver_config);

    build_report(&game, config, &attackers, &defenders, result)
}

fn build_report(
    game: &Game,
    config: &ApproxConfig,
    attackers: &StrategyPool,
    defenders: &StrategyPool,
    result: SolveResult,
) -> BlottoResult<ApproxReport> {
    let attacker_allocation = expected_allocation(attackers, &result.attacker_strategy)?;
    let defender_allocation = expected_allocation(defenders, &result.defender_strategy)?;

    let support = |pool: &StrategyPool, strategy: &[f64]| -> Vec<WeightedAllocation> {
        top_weighted(strategy, REPORTED_SUPPORT)
            .into_iter()
            .filter_map(|(i, probability)| {
                pool.get(i).map(|a| WeightedAllocation {
                    allocation: a.clone(),
                    probability,
                })
            })
            .collect()
    };

    let mean_payoff = if result.payoff_history.is_empty() {
        0.0
    } else {
        result.payoff_history.iter().sum::<f64>() / result.payoff_history.len() as f64
    };

    Ok(ApproxReport {
        seed: None,
        attacker_budget: game.attacker_budget,
        defender_budget: game.defender_budget,
        capacities: game.battlefields.capacities(),
        values: game.battlefields.values(),
        pool_size: config.pool_size,
        iterations: result.iterations,
        mean_payoff,
        game_value: result.game_value,
        exploitability: result.exploitability,
        attacker_regret: result.attacker_regret,
        defender_regret: result.defender_regret,
        attacker_support: support(attackers, &result.attacker_strategy),
        defender_support: support(defenders, &result.defender_strategy),
        attacker_allocation,
        defender_allocation,
        payoff_history: result.payoff_history,
    })
}

/// Moving average over a sliding `window`, keeping only full windows.
/// Empty when the series is shorter than the window or the window is 0.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || series.len() < window {
        return Vec::new();
    }

    let inv = 1.0 / window as f64;
    let mut sum: f64 = series[..window].iter().sum();
    let mut out = Vec::with_capacity(series.len() - window + 1);
    out.push(sum * inv);
    for i in window..series.len() {
        sum += series[i] - series[i - window];
        out.push(sum * inv);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_valid_mode() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&s, 2), vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(moving_average(&s, 5), vec![3.0]);
        assert!(moving_average(&s, 6).is_empty());
        assert!(moving_average(&s, 0).is_empty());
    }

    #[test]
    fn size_guard_trips() {
        let err = guard_size(16, &[4, 3, 6, 4, 3], 10).unwrap_err();
        assert!(matches!(err, BlottoError::StrategySpaceTooLarge { limit: 10, .. }));
        assert!(guard_size(2, &[1, 1, 1], 3).is_ok());
        assert_eq!(guard_size(u32::MAX, &[4, 3], 10).unwrap(), 0);
        assert!(guard_size(u32::MAX, &[u32::MAX, u32::MAX], 10).is_err());
    }
}
