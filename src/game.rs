//! Core game objects: allocations, battlefields and strategy pools.
//!
//! Everything here is immutable once constructed. A [`StrategyPool`] is
//! only ever built from allocations that satisfy the budget and capacity
//! invariants of its battlefields, so downstream components can index into
//! pools without re-checking feasibility.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::enumerate::enumerate_allocations;
use crate::error::{BlottoError, BlottoResult};

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Units committed to each battlefield by one player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Allocation(Vec<u32>);

impl Allocation {
    pub fn new(units: Vec<u32>) -> Self {
        Allocation(units)
    }

    #[inline]
    pub fn units(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total units committed across all battlefields.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&u| u as u64).sum()
    }

    /// Whether every coordinate respects the matching battlefield capacity.
    pub fn fits(&self, battlefields: &Battlefields) -> bool {
        self.len() == battlefields.len()
            && self
                .0
                .iter()
                .zip(battlefields.iter())
                .all(|(&u, field)| u <= field.capacity)
    }
}

impl From<Vec<u32>> for Allocation {
    fn from(units: Vec<u32>) -> Self {
        Allocation(units)
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}

// ---------------------------------------------------------------------------
// Battlefields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Battlefield {
    pub capacity: u32,
    pub value: f64,
}

/// Ordered battlefield specification shared by both players.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Battlefields {
    fields: Vec<Battlefield>,
}

impl Battlefields {
    /// Build a battlefield list. `values` defaults to all ones.
    pub fn new(capacities: &[u32], values: Option<&[f64]>) -> BlottoResult<Self> {
        if capacities.is_empty() {
            return Err(BlottoError::InvalidConfiguration(
                "At least one battlefield is required".to_string(),
            ));
        }

        let fields = match values {
            Some(values) => {
                if values.len() != capacities.len() {
                    return Err(BlottoError::InvalidConfiguration(format!(
                        "Got {} values for {} battlefields",
                        values.len(),
                        capacities.len()
                    )));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                    return Err(BlottoError::InvalidConfiguration(format!(
                        "Battlefield values must be positive, got {}",
                        bad
                    )));
                }
                capacities
                    .iter()
                    .zip(values)
                    .map(|(&capacity, &value)| Battlefield { capacity, value })
                    .collect()
            }
            None => capacities
                .iter()
                .map(|&capacity| Battlefield {
                    capacity,
                    value: 1.0,
                })
                .collect(),
        };

        Ok(Battlefields { fields })
    }

    /// Battlefields with unit value, as used by the majority rule.
    pub fn unweighted(capacities: &[u32]) -> BlottoResult<Self> {
        Self::new(capacities, None)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Battlefield> {
        self.fields.iter()
    }

    pub fn capacities(&self) -> Vec<u32> {
        self.fields.iter().map(|f| f.capacity).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.fields.iter().map(|f| f.value).collect()
    }

    pub fn total_capacity(&self) -> u64 {
        self.fields.iter().map(|f| f.capacity as u64).sum()
    }

    /// Whether `budget` units can be placed without exceeding any capacity.
    pub fn can_hold(&self, budget: u32) -> bool {
        budget as u64 <= self.total_capacity()
    }
}

// ---------------------------------------------------------------------------
// Strategy pool
// ---------------------------------------------------------------------------

/// The finite action space of one player: feasible allocations of a
/// single budget, in a fixed order.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyPool {
    budget: u32,
    allocations: Vec<Allocation>,
}

impl StrategyPool {
    /// Wrap `allocations` after checking each one against `budget` and
    /// `battlefields`. An empty list is an [`BlottoError::EmptyStrategySpace`].
    pub fn new(
        budget: u32,
        battlefields: &Battlefields,
        allocations: Vec<Allocation>,
    ) -> BlottoResult<Self> {
        if allocations.is_empty() {
            return Err(BlottoError::EmptyStrategySpace(format!(
                "no feasible allocation of {} units across a total capacity of {}",
                budget,
                battlefields.total_capacity()
            )));
        }

        for alloc in &allocations {
            if alloc.len() != battlefields.len() {
                return Err(BlottoError::DimensionMismatch {
                    expected: battlefields.len(),
                    got: alloc.len(),
                });
            }
            if alloc.total() != budget as u64 || !alloc.fits(battlefields) {
                return Err(BlottoError::InvalidConfiguration(format!(
                    "Allocation {} is not a feasible split of {} units",
                    alloc, budget
                )));
            }
        }

        Ok(StrategyPool {
            budget,
            allocations,
        })
    }

    /// Every feasible allocation of `budget`, in enumeration order.
    pub fn enumerated(budget: u32, battlefields: &Battlefields) -> BlottoResult<Self> {
        let allocations = enumerate_allocations(budget, &battlefields.capacities());
        Self::new(budget, battlefields, allocations)
    }

    #[inline]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Allocation> {
        self.allocations.get(index)
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Allocation> {
        self.allocations.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
