//! Dense attacker-vs-defender payoff matrix.
//!
//! Layout: row-major, one row per attacker strategy.
//!
//!   index = attacker * cols + defender
//!
//! Entry `(i, j)` is the total value of battlefields where attacker `i`
//! commits strictly more units than defender `j`. The game is zero-sum, so
//! the defender's matrix is the negated transpose and is derived from the
//! attacker's rather than re-scored.

use rayon::prelude::*;

use crate::error::{BlottoError, BlottoResult};
use crate::game::StrategyPool;

#[derive(Debug, Clone, PartialEq)]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Value-weighted attacker payoff of one pairing.
#[inline]
pub fn attacker_payoff(attacker: &[u32], defender: &[u32], values: &[f64]) -> f64 {
    attacker
        .iter()
        .zip(defender)
        .zip(values)
        .filter(|((a, d), _)| a > d)
        .map(|(_, v)| *v)
        .sum()
}

impl PayoffMatrix {
    /// Score every attacker strategy against every defender strategy.
    pub fn build(
        attackers: &StrategyPool,
        defenders: &StrategyPool,
        values: &[f64],
    ) -> BlottoResult<Self> {
        if attackers.is_empty() || defenders.is_empty() {
            return Err(BlottoError::EmptyStrategySpace(
                "payoff matrix needs at least one strategy per player".to_string(),
            ));
        }
        for alloc in attackers.iter().chain(defenders.iter()) {
            if alloc.len() != values.len() {
                return Err(BlottoError::DimensionMismatch {
                    expected: values.len(),
                    got: alloc.len(),
                });
            }
        }

        let rows = attackers.len();
        let cols = defenders.len();
        let mut data = vec![0.0f64; rows * cols];

        // One attacker row per rayon task.
        data.par_chunks_mut(cols)
            .zip(attackers.allocations().par_iter())
            .for_each(|(row, att)| {
                for (slot, def) in row.iter_mut().zip(defenders.iter()) {
                    *slot = attacker_payoff(att.units(), def.units(), values);
                }
            });

        Ok(PayoffMatrix { rows, cols, data })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> BlottoResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        if n_rows == 0 || n_cols == 0 {
            return Err(BlottoError::EmptyStrategySpace(
                "payoff matrix must have at least one row and one column".to_string(),
            ));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
            return Err(BlottoError::DimensionMismatch {
                expected: n_cols,
                got: bad.len(),
            });
        }

        Ok(PayoffMatrix {
            rows: n_rows,
            cols: n_cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// The opponent's view of the same game: `-Mᵀ`.
    pub fn negated_transpose(&self) -> PayoffMatrix {
        let mut data = vec![0.0f64; self.rows * self.cols];
        data.par_chunks_mut(self.rows)
            .enumerate()
            .for_each(|(j, out)| {
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = -self.data[i * self.cols + j];
                }
            });

        PayoffMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// `M · v`: expected payoff of each row strategy against the column
    /// mixture `v`.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        self.data
            .par_chunks(self.cols)
            .map(|row| dot(row, v))
            .collect()
    }

    /// `xᵀ · M · y`.
    pub fn bilinear(&self, x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.rows);
        dot(x, &self.mul_vec(y))
    }

    /// Largest and smallest entry.
    pub fn range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

#[inline]
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
