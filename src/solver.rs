//! Regret-matching solver for the pool-restricted Blotto game.
//!
//! Both players update simultaneously with full information. Each
//! iteration:
//!
//! 1. action values: `A · σ_def` for the attacker, `(-Aᵀ) · σ_att` for the
//!    defender;
//! 2. realized attacker payoff `σ_attᵀ · A · σ_def` (defender gets the
//!    negation), appended to the payoff history;
//! 3. cumulative regrets grow by `value - realized`;
//! 4. current strategies become the normalized positive regrets.
//!
//! The time-averaged strategies, not the final ones, carry the convergence
//! guarantee: for a zero-sum game the exploitability of the averaged
//! profile is bounded by the sum of both players' average regrets, which
//! shrinks like `1 / sqrt(T)`.

use serde::Serialize;

use crate::payoff::{dot, PayoffMatrix};
use crate::regret::RegretAccumulator;

/// How often (in iterations) progress is logged at debug level.
const LOG_INTERVAL: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Iteration budget.
    pub iterations: usize,
    /// Stop early once the summed average regret of both players is at or
    /// below this value.
    pub regret_tolerance: Option<f64>,
}

impl SolverConfig {
    pub fn new(iterations: usize) -> Self {
        SolverConfig {
            iterations,
            regret_tolerance: None,
        }
    }
}

/// Output of a solver run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// Realized attacker payoff at each iteration.
    pub payoff_history: Vec<f64>,
    /// Time-averaged attacker strategy over its pool.
    pub attacker_strategy: Vec<f64>,
    /// Time-averaged defender strategy over its pool.
    pub defender_strategy: Vec<f64>,
    /// Attacker strategy at the last iteration.
    pub attacker_final: Vec<f64>,
    /// Defender strategy at the last iteration.
    pub defender_final: Vec<f64>,
    pub iterations: usize,
    pub attacker_regret: f64,
    pub defender_regret: f64,
    /// Attacker payoff of the averaged profile.
    pub game_value: f64,
    /// Duality gap of the averaged profile (0 at equilibrium).
    pub exploitability: f64,
}

pub struct RegretMatchingSolver {
    attacker_matrix: PayoffMatrix,
    defender_matrix: PayoffMatrix,
    attacker: RegretAccumulator,
    defender: RegretAccumulator,
    payoff_history: Vec<f64>,
}

impl RegretMatchingSolver {
    /// Set up a solver over an attacker payoff matrix. The defender's
    /// matrix is its negated transpose.
    pub fn new(attacker_matrix: PayoffMatrix) -> Self {
        let defender_matrix = attacker_matrix.negated_transpose();
        let attacker = RegretAccumulator::new(attacker_matrix.rows());
        let defender = RegretAccumulator::new(attacker_matrix.cols());

        RegretMatchingSolver {
            attacker_matrix,
            defender_matrix,
            attacker,
            defender,
            payoff_history: Vec::new(),
        }
    }

    pub fn attacker_matrix(&self) -> &PayoffMatrix {
        &self.attacker_matrix
    }

    pub fn defender_matrix(&self) -> &PayoffMatrix {
        &self.defender_matrix
    }

    pub fn attacker(&self) -> &RegretAccumulator {
        &self.attacker
    }

    pub fn defender(&self) -> &RegretAccumulator {
        &self.defender
    }

    pub fn iterations(&self) -> usize {
        self.payoff_history.len()
    }

    pub fn payoff_history(&self) -> &[f64] {
        &self.payoff_history
    }

    /// Run one simultaneous update. Returns the realized attacker payoff.
    pub fn step(&mut self) -> f64 {
        let att_values = self.attacker_matrix.mul_vec(self.defender.strategy());
        let def_values = self.defender_matrix.mul_vec(self.attacker.strategy());

        let realized = dot(self.attacker.strategy(), &att_values);
        self.payoff_history.push(realized);

        self.attacker.update(&att_values, realized);
        self.defender.update(&def_values, -realized);

        realized
    }

    /// Run `iterations` steps unconditionally.
    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.step();
        }
    }

    /// Summed average regret of both players.
    pub fn average_regret(&self) -> f64 {
        self.attacker.average_regret() + self.defender.average_regret()
    }

    /// Duality gap of the current averaged profile:
    /// `max_i (A·ȳ)_i - min_j (x̄ᵀ·A)_j`.
    pub fn exploitability(&self) -> f64 {
        let x = self.attacker.average_strategy();
        let y = self.defender.average_strategy();

        let best_attack = max(&self.attacker_matrix.mul_vec(&y));
        let best_defence = max(&self.defender_matrix.mul_vec(&x));
        (best_attack + best_defence).max(0.0)
    }

    /// Iterate per `config` and collect the result.
    pub fn solve(mut self, config: &SolverConfig) -> SolveResult {
        log::info!(
            "regret matching over {}x{} pools, up to {} iterations",
            self.attacker_matrix.rows(),
            self.attacker_matrix.cols(),
            config.iterations
        );

        for t in 1..=config.iterations {
            let realized = self.step();

            if t % LOG_INTERVAL == 0 {
                log::debug!(
                    "iteration {:>7}  payoff {:>9.4}  avg regret {:.6}",
                    t,
                    realized,
                    self.average_regret()
                );
            }

            if let Some(tol) = config.regret_tolerance {
                if self.average_regret() <= tol {
                    log::info!("average regret below {} after {} iterations", tol, t);
                    break;
                }
            }
        }

        self.into_result()
    }

    pub fn into_result(self) -> SolveResult {
        let exploitability = self.exploitability();
        let attacker_strategy = self.attacker.average_strategy();
        let defender_strategy = self.defender.average_strategy();
        let game_value = self
            .attacker_matrix
            .bilinear(&attacker_strategy, &defender_strategy);

        SolveResult {
            iterations: self.payoff_history.len(),
            attacker_regret: self.attacker.average_regret(),
            defender_regret: self.defender.average_regret(),
            attacker_final: self.attacker.strategy().to_vec(),
            defender_final: self.defender.strategy().to_vec(),
            payoff_history: self.payoff_history,
            attacker_strategy,
            defender_strategy,
            game_value,
            exploitability,
        }
    }
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
