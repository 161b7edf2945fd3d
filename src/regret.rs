//! Per-player regret-matching state.
//!
//! Three parallel arrays, one slot per pure strategy in the player's pool:
//!
//!   cumulative_regret[a]  Σ_t (value_t[a] - realized_t), never floored
//!   strategy[a]           current mixed strategy (regret matching)
//!   strategy_sum[a]       Σ_t strategy_t[a], for the time average

/// Positive-regret mass below which the current strategy falls back to
/// uniform.
pub const POSITIVE_REGRET_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct RegretAccumulator {
    cumulative_regret: Vec<f64>,
    strategy: Vec<f64>,
    strategy_sum: Vec<f64>,
    iterations: usize,
}

impl RegretAccumulator {
    /// Fresh state over `num_actions` pure strategies, playing uniformly.
    pub fn new(num_actions: usize) -> Self {
        RegretAccumulator {
            cumulative_regret: vec![0.0; num_actions],
            strategy: uniform(num_actions),
            strategy_sum: vec![0.0; num_actions],
            iterations: 0,
        }
    }

    #[inline]
    pub fn num_actions(&self) -> usize {
        self.strategy.len()
    }

    /// Strategy to play this iteration.
    #[inline]
    pub fn strategy(&self) -> &[f64] {
        &self.strategy
    }

    #[inline]
    pub fn cumulative_regret(&self) -> &[f64] {
        &self.cumulative_regret
    }

    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Record one iteration: the current strategy joins the running sum and
    /// each action's regret grows by `action_values[a] - realized`, then the
    /// current strategy is re-derived from the new regrets.
    pub fn update(&mut self, action_values: &[f64], realized: f64) {
        debug_assert_eq!(action_values.len(), self.num_actions());

        for (sum, &p) in self.strategy_sum.iter_mut().zip(&self.strategy) {
            *sum += p;
        }
        for (r, &v) in self.cumulative_regret.iter_mut().zip(action_values) {
            *r += v - realized;
        }
        self.iterations += 1;

        regret_matching(&self.cumulative_regret, &mut self.strategy);
    }

    /// Time-averaged strategy over all recorded iterations. Uniform before
    /// the first update.
    pub fn average_strategy(&self) -> Vec<f64> {
        let total: f64 = self.strategy_sum.iter().sum();
        if total > 0.0 {
            let inv = 1.0 / total;
            self.strategy_sum.iter().map(|s| s * inv).collect()
        } else {
            uniform(self.num_actions())
        }
    }

    /// Largest positive cumulative regret divided by the iteration count.
    pub fn average_regret(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        let max = self
            .cumulative_regret
            .iter()
            .fold(0.0f64, |acc, &r| acc.max(r));
        max / self.iterations as f64
    }
}

/// Write the normalized positive part of `regrets` into `out`, or the
/// uniform distribution when the positive mass is negligible.
pub fn regret_matching(regrets: &[f64], out: &mut [f64]) {
    let positive_sum: f64 = regrets.iter().map(|r| r.max(0.0)).sum();

    if positive_sum > POSITIVE_REGRET_FLOOR {
        let inv = 1.0 / positive_sum;
        for (o, &r) in out.iter_mut().zip(regrets) {
            *o = r.max(0.0) * inv;
        }
    } else {
        let p = 1.0 / out.len() as f64;
        out.iter_mut().for_each(|o| *o = p);
    }
}

pub fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}
