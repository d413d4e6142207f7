//! Cox-Ross-Rubinstein binomial tree with escrowed cash dividends.
//!
//! The tree is built on the escrowed spot `S_esc = S₀ − Σ Dᵢ e^(−r τᵢ)`, so
//! `u` and `d` stay constant and the tree recombines.  At step `n` the
//! present value of every dividend going ex strictly after `tₙ` is added
//! back:
//!
//! `S(n, j) = S_esc · u^(2j − n) + Σ_{τᵢ > tₙ} Dᵢ e^(−r (τᵢ − tₙ))`
//!
//! A dividend falling between two step boundaries leaves the escrow at the
//! first boundary at or after its ex-time; this snapping shrinks as the step
//! count grows.

use super::TimeGrid;
use ql_core::errors::{Error, Result};
use ql_core::{require, DiscountFactor, Real, Time};
use ql_instruments::DividendTime;
use ql_processes::BlackScholesProcess;
use tracing::debug;

/// A recombining CRR tree over a uniform [`TimeGrid`].
///
/// Layer `i` has `i + 1` nodes; node `(i, j)` is reached by `j` up-moves
/// and `i − j` down-moves.  Only the per-step escrow is stored: node spots
/// are computed on demand.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    grid: TimeGrid,
    escrowed_spot: Real,
    dividend_pv: Real,
    escrow: Vec<Real>,
    up: Real,
    pu: Real,
    pd: Real,
    discount: DiscountFactor,
}

impl BinomialTree {
    /// Build a CRR tree for `process` from 0 to `end` in `steps` steps.
    ///
    /// `dividends` are the normalized `(τᵢ, Dᵢ)` pairs of the cash dividend
    /// schedule.
    ///
    /// # Errors
    /// * [`Error::InvalidContract`] if `steps` is zero or `end` is not positive
    /// * [`Error::InconsistentDividendSchedule`] if the dividends' present
    ///   value is not strictly below spot
    /// * [`Error::InvalidLatticeParameters`] if the up-probability is
    ///   outside `(0, 1)`
    pub fn cox_ross_rubinstein(
        process: &BlackScholesProcess,
        end: Time,
        steps: usize,
        dividends: &[DividendTime],
    ) -> Result<Self> {
        let grid = TimeGrid::uniform(end, steps)?;
        let dt = grid.dt();
        let spot = process.spot();
        let r = process.risk_free_rate();

        let dividend_pv: Real = dividends
            .iter()
            .map(|d| d.amount * process.discount(d.time))
            .sum();
        let escrowed_spot = spot - dividend_pv;
        require!(
            escrowed_spot > 0.0,
            Error::InconsistentDividendSchedule { dividend_pv, spot }
        );

        let up = (process.volatility() * dt.sqrt()).exp();
        let down = 1.0 / up;
        let pu = (process.growth(dt) - down) / (up - down);
        require!(
            pu > 0.0 && pu < 1.0,
            Error::InvalidLatticeParameters {
                probability: pu,
                rate: r,
                dividend_yield: process.dividend_yield(),
                volatility: process.volatility(),
                dt,
            }
        );

        let escrow = grid
            .times()
            .iter()
            .map(|&t| {
                dividends
                    .iter()
                    .filter(|d| d.time > t)
                    .map(|d| d.amount * process.discount(d.time - t))
                    .sum()
            })
            .collect();

        debug!(
            steps,
            dt,
            up,
            probability = pu,
            escrowed_spot,
            dividends = dividends.len(),
            "built CRR lattice"
        );

        Ok(Self {
            grid,
            escrowed_spot,
            dividend_pv,
            escrow,
            up,
            pu,
            pd: 1.0 - pu,
            discount: process.discount(dt),
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> usize {
        self.grid.steps()
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.grid.dt()
    }

    /// The time grid.
    pub fn time_grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Number of nodes at step `i`.
    pub fn size(&self, i: usize) -> usize {
        i + 1
    }

    /// Index at step `i + 1` of the `branch` descendant (0 down, 1 up).
    pub fn descendant(&self, _i: usize, index: usize, branch: usize) -> usize {
        index + branch
    }

    /// Dividend-adjusted spot at node `(i, index)`.
    pub fn underlying(&self, i: usize, index: usize) -> Real {
        let exponent = 2 * index as i64 - i as i64;
        self.escrowed_spot * self.up.powi(exponent as i32) + self.escrow[i]
    }

    /// Transition probability of `branch` (0 down, 1 up).
    pub fn probability(&self, branch: usize) -> Real {
        if branch == 1 {
            self.pu
        } else {
            self.pd
        }
    }

    /// Up factor `u = e^(σ√Δt)`.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Per-step discount factor `e^(−rΔt)`.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }

    /// Spot net of the present value of all dividends.
    pub fn escrowed_spot(&self) -> Real {
        self.escrowed_spot
    }

    /// Present value at valuation of all dividends.
    pub fn dividend_pv(&self) -> Real {
        self.dividend_pv
    }

    /// Value at step `i` of the dividends going ex strictly after `tᵢ`.
    pub fn escrow(&self, i: usize) -> Real {
        self.escrow[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::date::ymd;
    use ql_time::Actual365Fixed;
    use std::sync::Arc;

    fn process(spot: Real, r: Real, q: Real, sigma: Real) -> BlackScholesProcess {
        BlackScholesProcess::new(
            spot,
            r,
            q,
            sigma,
            ymd(1998, 5, 15).unwrap(),
            Arc::new(Actual365Fixed),
        )
        .unwrap()
    }

    fn quarterly() -> Vec<DividendTime> {
        [107.0, 199.0, 291.0]
            .iter()
            .map(|days| DividendTime {
                time: days / 365.0,
                amount: 2.06,
            })
            .collect()
    }

    #[test]
    fn crr_parameters() {
        let p = process(36.0, 0.06, 0.0, 0.2);
        let tree = BinomialTree::cox_ross_rubinstein(&p, 1.0, 100, &[]).unwrap();
        let dt: Real = 0.01;
        assert_eq!(tree.steps(), 100);
        assert_abs_diff_eq!(tree.dt(), dt, epsilon = 1e-15);
        assert_abs_diff_eq!(tree.up(), (0.2 * dt.sqrt()).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(tree.discount(), (-0.06 * dt).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(tree.probability(0) + tree.probability(1), 1.0, epsilon = 1e-15);
        assert_eq!(tree.size(7), 8);
        assert_eq!(tree.descendant(7, 3, 1), 4);
    }

    #[test]
    fn tree_recombines() {
        let p = process(36.0, 0.06, 0.0, 0.2);
        let tree = BinomialTree::cox_ross_rubinstein(&p, 1.0, 10, &quarterly()).unwrap();
        // up then down lands where down then up does
        let u = tree.up();
        let node = tree.underlying(2, 1) - tree.escrow(2);
        assert_abs_diff_eq!(node, tree.escrowed_spot(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            tree.underlying(1, 1) - tree.escrow(1),
            tree.escrowed_spot() * u,
            epsilon = 1e-12
        );
    }

    #[test]
    fn root_spot_is_undiscounted_spot() {
        let p = process(36.0, 0.06, 0.0, 0.2);
        let tree = BinomialTree::cox_ross_rubinstein(&p, 367.0 / 365.0, 801, &quarterly()).unwrap();
        assert_abs_diff_eq!(tree.underlying(0, 0), 36.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tree.escrowed_spot(), 30.018435, epsilon = 1e-6);
        assert_abs_diff_eq!(tree.dividend_pv() + tree.escrowed_spot(), 36.0, epsilon = 1e-12);
        // every dividend is paid before the last step
        assert_eq!(tree.escrow(801), 0.0);
    }

    #[test]
    fn escrow_excludes_dividend_on_step_boundary() {
        let p = process(36.0, 0.06, 0.0, 0.2);
        let divs = [DividendTime {
            time: 0.5,
            amount: 1.0,
        }];
        let tree = BinomialTree::cox_ross_rubinstein(&p, 1.0, 2, &divs).unwrap();
        assert_abs_diff_eq!(tree.escrow(0), (-0.03f64).exp(), epsilon = 1e-15);
        assert_eq!(tree.escrow(1), 0.0);
        assert_eq!(tree.escrow(2), 0.0);
    }

    #[test]
    fn dividends_within_one_step_are_aggregated() {
        let p = process(36.0, 0.0, 0.0, 0.2);
        let divs = [
            DividendTime {
                time: 0.30,
                amount: 1.0,
            },
            DividendTime {
                time: 0.40,
                amount: 2.0,
            },
        ];
        let tree = BinomialTree::cox_ross_rubinstein(&p, 1.0, 4, &divs).unwrap();
        assert_abs_diff_eq!(tree.escrow(1), 3.0, epsilon = 1e-15);
        assert_eq!(tree.escrow(2), 0.0);
    }

    #[test]
    fn dividend_pv_at_spot_rejected() {
        let p = process(10.0, 0.0, 0.0, 0.2);
        let divs = [DividendTime {
            time: 0.5,
            amount: 10.0,
        }];
        let err = BinomialTree::cox_ross_rubinstein(&p, 1.0, 50, &divs).unwrap_err();
        assert_eq!(
            err,
            Error::InconsistentDividendSchedule {
                dividend_pv: 10.0,
                spot: 10.0
            }
        );
    }

    #[test]
    fn dividend_pv_above_spot_rejected() {
        let p = process(10.0, 0.05, 0.0, 0.2);
        let divs = [
            DividendTime {
                time: 0.25,
                amount: 6.0,
            },
            DividendTime {
                time: 0.75,
                amount: 6.0,
            },
        ];
        assert!(matches!(
            BinomialTree::cox_ross_rubinstein(&p, 1.0, 50, &divs),
            Err(Error::InconsistentDividendSchedule { .. })
        ));
    }

    #[test]
    fn probability_above_one_rejected() {
        // growth e^(0.5) beats u = e^(0.01) on a single step
        let p = process(36.0, 0.5, 0.0, 0.01);
        let err = BinomialTree::cox_ross_rubinstein(&p, 1.0, 1, &[]).unwrap_err();
        match err {
            Error::InvalidLatticeParameters {
                probability,
                rate,
                volatility,
                dt,
                ..
            } => {
                assert!(probability > 1.0);
                assert_eq!(rate, 0.5);
                assert_eq!(volatility, 0.01);
                assert_eq!(dt, 1.0);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn probability_below_zero_rejected() {
        let p = process(36.0, 0.0, 0.5, 0.01);
        assert!(matches!(
            BinomialTree::cox_ross_rubinstein(&p, 1.0, 1, &[]),
            Err(Error::InvalidLatticeParameters { probability, .. }) if probability < 0.0
        ));
    }

    #[test]
    fn more_steps_fix_probability() {
        let p = process(36.0, 0.5, 0.0, 0.01);
        assert!(BinomialTree::cox_ross_rubinstein(&p, 1.0, 10_000, &[]).is_ok());
    }
}
