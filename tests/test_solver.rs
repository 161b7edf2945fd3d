//! Tests for the regret-matching solver.
//!
//! Convergence checks lean on the regret-matching bound
//! `max_a R_T(a) <= range * sqrt(|A| * T)` and on the zero-sum identity
//! that the exploitability of the averaged profile never exceeds the sum of
//! both players' average regrets.

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use blotto_cli::config::Preset;
use blotto_cli::game::{Battlefields, StrategyPool};
use blotto_cli::payoff::PayoffMatrix;
use blotto_cli::sampler::sample_pool;
use blotto_cli::solver::{RegretMatchingSolver, SolveResult, SolverConfig};

fn sampled_matrix(pool_size: usize, seed: u64) -> PayoffMatrix {
    let game = Preset::Extended.game().validate().unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let att = sample_pool(game.attacker_budget, &game.battlefields, pool_size, &mut rng).unwrap();
    let def = sample_pool(game.defender_budget, &game.battlefields, pool_size, &mut rng).unwrap();
    PayoffMatrix::build(&att, &def, &game.battlefields.values()).unwrap()
}

fn solve(matrix: PayoffMatrix, iterations: usize) -> SolveResult {
    RegretMatchingSolver::new(matrix).solve(&SolverConfig::new(iterations))
}

fn assert_distribution(p: &[f64]) {
    assert!(p.iter().all(|&x| x.is_finite() && x >= 0.0));
    assert_abs_diff_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_average_regret_shrinks_with_iterations() {
    let matrix = sampled_matrix(15, 42);
    let (lo, hi) = matrix.range();
    let spread = hi - lo;
    let n = matrix.rows() as f64;

    let short = solve(matrix.clone(), 100);
    let long = solve(matrix, 5000);

    for (result, t) in [(&short, 100.0), (&long, 5000.0)] {
        let bound = spread * (n / t).sqrt();
        assert!(result.attacker_regret <= bound + 1e-9);
        assert!(result.defender_regret <= bound + 1e-9);
    }

    let short_regret = short.attacker_regret + short.defender_regret;
    let long_regret = long.attacker_regret + long.defender_regret;
    assert!(
        long_regret < short_regret || short_regret == 0.0,
        "regret at T=5000 ({}) should be below T=100 ({})",
        long_regret,
        short_regret
    );
}

#[test]
fn test_exploitability_bounded_by_regret() {
    for t in [10, 200, 3000] {
        let result = solve(sampled_matrix(20, 7), t);
        assert!(result.exploitability >= 0.0);
        assert!(
            result.exploitability <= result.attacker_regret + result.defender_regret + 1e-7,
            "T={}: exploitability {} exceeds regret sum {}",
            t,
            result.exploitability,
            result.attacker_regret + result.defender_regret
        );
    }
}

#[test]
fn test_biased_pennies_converges() {
    // Equilibrium of [[2,-1],[-1,1]] is x = y = 0.4 with value 0.2.
    let m = PayoffMatrix::from_rows(vec![vec![2.0, -1.0], vec![-1.0, 1.0]]).unwrap();
    let result = solve(m, 10_000);
    assert_abs_diff_eq!(result.attacker_strategy[0], 0.4, epsilon = 0.05);
    assert_abs_diff_eq!(result.defender_strategy[0], 0.4, epsilon = 0.05);
    assert_abs_diff_eq!(result.game_value, 0.2, epsilon = 0.1);
}

#[test]
fn test_matching_pennies_stays_at_half() {
    let m = PayoffMatrix::from_rows(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
    let result = solve(m, 1000);
    assert_abs_diff_eq!(result.attacker_strategy[0], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(result.defender_strategy[0], 0.5, epsilon = 1e-12);
    assert!(result.exploitability < 1e-9);
}

#[test]
fn test_symmetric_two_field_game_stays_uniform() {
    let fields = Battlefields::unweighted(&[2, 2]).unwrap();
    let pool = StrategyPool::enumerated(2, &fields).unwrap();
    let m = PayoffMatrix::build(&pool, &pool, &fields.values()).unwrap();

    let result = solve(m, 500);
    for &p in result.attacker_strategy.iter().chain(&result.defender_strategy) {
        assert_abs_diff_eq!(p, 1.0 / 3.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(result.game_value, 2.0 / 3.0, epsilon = 1e-12);
    assert!(result.exploitability < 1e-9);
    assert!(result.payoff_history.iter().all(|&v| (v - 2.0 / 3.0).abs() < 1e-12));
}

#[test]
fn test_outputs_are_distributions() {
    let result = solve(sampled_matrix(30, 1), 300);
    assert_eq!(result.payoff_history.len(), 300);
    assert_eq!(result.iterations, 300);
    assert_distribution(&result.attacker_strategy);
    assert_distribution(&result.defender_strategy);
    assert_distribution(&result.attacker_final);
    assert_distribution(&result.defender_final);
}

#[test]
fn test_independent_solvers_do_not_share_state() {
    let matrix = sampled_matrix(12, 9);

    let mut a = RegretMatchingSolver::new(matrix.clone());
    let mut b = RegretMatchingSolver::new(matrix);
    a.run(50);
    assert_eq!(b.iterations(), 0);
    assert!(b.attacker().cumulative_regret().iter().all(|&r| r == 0.0));

    b.run(50);
    assert_eq!(a.payoff_history(), b.payoff_history());
    assert_eq!(a.attacker().strategy(), b.attacker().strategy());
}

#[test]
fn test_solver_is_deterministic() {
    let first = solve(sampled_matrix(25, 3), 400);
    let second = solve(sampled_matrix(25, 3), 400);
    assert_eq!(first.payoff_history, second.payoff_history);
    assert_eq!(first.attacker_strategy, second.attacker_strategy);
    assert_eq!(first.defender_strategy, second.defender_strategy);
}
