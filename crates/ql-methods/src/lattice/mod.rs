//! Lattice methods for option pricing.
//!
//! * [`BinomialTree`]: recombining CRR tree whose node spots carry the
//!   escrowed value of the dividends not yet paid
//! * [`TimeGrid`]: the uniform step times the tree lives on
//! * [`backward_induction`]: rolls terminal payoffs back to the root

pub mod binomial_tree;

pub use binomial_tree::BinomialTree;

use ql_core::errors::{Error, Result};
use ql_core::{require, Real, Time};
use ql_instruments::{ExerciseType, Payoff};

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// A uniform grid of time points `tₙ = n·Δt`, `n = 0..=steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
    dt: Time,
}

impl TimeGrid {
    /// Uniform grid from 0 to `end` with `steps` intervals.
    pub fn uniform(end: Time, steps: usize) -> Result<Self> {
        require!(
            steps > 0,
            Error::invalid_contract("time_steps", "must be positive, got 0")
        );
        require!(
            end.is_finite() && end > 0.0,
            Error::invalid_contract(
                "maturity",
                format!("time to maturity must be positive, got {end}")
            )
        );
        let dt = end / steps as Real;
        let times = (0..=steps).map(|n| n as Real * dt).collect();
        Ok(Self { times, dt })
    }

    /// Number of time points (= steps + 1).
    pub fn size(&self) -> usize {
        self.times.len()
    }

    /// Number of steps.
    pub fn steps(&self) -> usize {
        self.times.len() - 1
    }

    /// Time at index `n`.
    pub fn time(&self, n: usize) -> Time {
        self.times[n]
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Final time.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }
}

// ─── Backward induction ───────────────────────────────────────────────────────

/// Value of `payoff` at the root of `tree`.
///
/// Terminal values are the payoff at the step-`N` spots.  Each earlier node
/// takes the discounted expectation of its two descendants; with
/// [`ExerciseType::American`] that continuation value is floored at the
/// payoff of the node's dividend-adjusted spot.
///
/// Two buffers of `N + 1` values are swapped step by step.
pub fn backward_induction<P>(tree: &BinomialTree, payoff: &P, exercise: ExerciseType) -> Real
where
    P: Payoff + ?Sized,
{
    let n = tree.steps();
    let discount = tree.discount();
    let pu = tree.probability(1);
    let pd = tree.probability(0);

    let mut values: Vec<Real> = (0..tree.size(n))
        .map(|j| payoff.value(tree.underlying(n, j)))
        .collect();
    let mut previous = vec![0.0; values.len()];

    for i in (0..n).rev() {
        for j in 0..tree.size(i) {
            let continuation = discount
                * (pu * values[tree.descendant(i, j, 1)] + pd * values[tree.descendant(i, j, 0)]);
            previous[j] = match exercise {
                ExerciseType::European => continuation,
                ExerciseType::American => continuation.max(payoff.value(tree.underlying(i, j))),
            };
        }
        std::mem::swap(&mut values, &mut previous);
    }

    values[0]
}

// ─── Tests ────────────────────────────────────────────────────────────────────
