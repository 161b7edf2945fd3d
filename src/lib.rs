//! Colonel Blotto solvers.
//!
//! Two engines over a discrete, capacity-bounded Blotto game:
//!
//! - an exact engine that enumerates every allocation and ranks defender
//!   strategies by their majority-rule win rate ([`engine::solve_exact`]);
//! - an approximate engine that samples strategy pools and runs regret
//!   matching on the value-weighted payoff matrix
//!   ([`engine::solve_approximate`]).
//!
//! ```
//! use blotto_cli::config::{ApproxConfig, GameConfig};
//! use blotto_cli::engine::solve_approximate;
//!
//! let game = GameConfig {
//!     attacker_budget: 4,
//!     defender_budget: 4,
//!     capacities: vec![3, 3, 3],
//!     values: None,
//! };
//! let mut config = ApproxConfig::new(game);
//! config.pool_size = 20;
//! config.iterations = 200;
//! config.seed = Some(7);
//!
//! let report = solve_approximate(&config).unwrap();
//! let total: f64 = report.defender_allocation.iter().sum();
//! assert!((total - 4.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod exact;
pub mod game;
pub mod payoff;
pub mod regret;
pub mod sampler;
pub mod solver;
