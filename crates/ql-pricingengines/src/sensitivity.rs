//! Finite-difference sensitivities.
//!
//! Every greek is a bump-and-reprice of [`binomial_dividend_price`]: each
//! bumped price is a fresh lattice on a bumped copy of the process or the
//! contract, nothing is shared between evaluations.  The bump sizes are the
//! public constants below.

use crate::binomial_dividend_engine::{binomial_dividend_price, lattice_price};
use ql_core::errors::Result;
use ql_core::{Real, Size, Time};
use ql_instruments::{DividendTime, DividendVanillaOptionArguments, Greeks, MoreGreeks};
use ql_processes::BlackScholesProcess;
use ql_time::date::add_days;
use std::sync::Arc;
use tracing::trace;

/// Relative spot bump for delta and gamma: `h = SPOT_BUMP · S₀`.
pub const SPOT_BUMP: Real = 0.01;

/// Absolute volatility bump for vega.
pub const VOLATILITY_BUMP: Real = 1.0e-4;

/// Absolute risk-free rate bump for rho.
pub const RATE_BUMP: Real = 1.0e-4;

/// Absolute dividend-yield bump for dividend rho.
pub const DIVIDEND_YIELD_BUMP: Real = 1.0e-4;

/// Relative strike bump for the strike sensitivity: `h = STRIKE_BUMP · K`.
pub const STRIKE_BUMP: Real = 0.01;

/// Calendar days the valuation date is advanced by for theta.
pub const THETA_BUMP_DAYS: i64 = 1;

/// Share of the remaining year fraction used as the theta shift when
/// [`THETA_BUMP_DAYS`] would reach maturity.
pub const SHORT_THETA_FRACTION: Real = 0.1;

/// Three repricings at spots `h` apart, the lowest at `S₀ − h` when
/// `central`, at `S₀` otherwise.
#[derive(Debug, Clone, Copy)]
struct SpotLadder {
    low: Real,
    mid: Real,
    high: Real,
    h: Real,
    central: bool,
}

impl SpotLadder {
    fn delta(&self) -> Real {
        if self.central {
            (self.high - self.low) / (2.0 * self.h)
        } else {
            (self.mid - self.low) / self.h
        }
    }

    fn gamma(&self) -> Real {
        (self.high - 2.0 * self.mid + self.low) / (self.h * self.h)
    }
}

/// Bump-and-reprice greeks of one option under one process.
#[derive(Debug, Clone)]
pub struct SensitivityEngine<'a> {
    process: &'a BlackScholesProcess,
    args: &'a DividendVanillaOptionArguments,
    time_steps: Size,
    base_value: Option<Real>,
}

impl<'a> SensitivityEngine<'a> {
    /// Greeks of `args` under `process` on a `time_steps`-step lattice.
    pub fn new(
        process: &'a BlackScholesProcess,
        args: &'a DividendVanillaOptionArguments,
        time_steps: Size,
    ) -> Self {
        Self {
            process,
            args,
            time_steps,
            base_value: None,
        }
    }

    /// Reuse an already computed unbumped price.
    pub fn with_base_value(mut self, value: Real) -> Self {
        self.base_value = Some(value);
        self
    }

    fn reprice(
        &self,
        bump: &'static str,
        process: &BlackScholesProcess,
        args: &DividendVanillaOptionArguments,
    ) -> Result<Real> {
        let value = binomial_dividend_price(process, args, self.time_steps)?;
        trace!(bump, value, "repriced");
        Ok(value)
    }

    /// Unbumped price.
    pub fn value(&self) -> Result<Real> {
        match self.base_value {
            Some(v) => Ok(v),
            None => self.reprice("none", self.process, self.args),
        }
    }

    /// Present value at valuation of the contract's cash dividends.
    fn dividend_pv(&self) -> Result<Real> {
        let valuation = self.process.reference_date();
        let maturity = self.args.exercise.last_date();
        Ok(self
            .args
            .dividends
            .times(valuation, maturity, self.process.day_counter())?
            .iter()
            .map(|d| d.amount * self.process.discount(d.time))
            .sum())
    }

    /// Repricings at three spots `h` apart.
    ///
    /// Centred on `S₀` unless `S₀ − h` would leave no escrowed spot, in which
    /// case the ladder starts at `S₀` and steps up.
    fn spot_ladder(&self) -> Result<SpotLadder> {
        let spot = self.process.spot();
        let h = SPOT_BUMP * spot;
        let value = self.value()?;
        let up = self.reprice("spot_up", &self.process.with_spot(spot + h)?, self.args)?;
        if spot - h > self.dividend_pv()? {
            let down = self.reprice("spot_down", &self.process.with_spot(spot - h)?, self.args)?;
            Ok(SpotLadder {
                low: down,
                mid: value,
                high: up,
                h,
                central: true,
            })
        } else {
            let up2 = self.reprice(
                "spot_up2",
                &self.process.with_spot(spot + 2.0 * h)?,
                self.args,
            )?;
            Ok(SpotLadder {
                low: value,
                mid: up,
                high: up2,
                h,
                central: false,
            })
        }
    }

    /// ∂V/∂S by central difference, forward when `S₀ − h` is not above the
    /// dividends' present value.
    pub fn delta(&self) -> Result<Real> {
        Ok(self.spot_ladder()?.delta())
    }

    /// ∂²V/∂S² from the same three spots as [`delta`](Self::delta).
    pub fn gamma(&self) -> Result<Real> {
        Ok(self.spot_ladder()?.gamma())
    }

    /// Delta and gamma from one spot ladder.
    pub fn delta_gamma(&self) -> Result<(Real, Real)> {
        let ladder = self.spot_ladder()?;
        Ok((ladder.delta(), ladder.gamma()))
    }

    /// ∂V/∂σ by central difference, forward when σ is below the bump.
    pub fn vega(&self) -> Result<Real> {
        let sigma = self.process.volatility();
        let up = self.reprice(
            "volatility_up",
            &self.process.with_volatility(sigma + VOLATILITY_BUMP)?,
            self.args,
        )?;
        if sigma > VOLATILITY_BUMP {
            let down = self.reprice(
                "volatility_down",
                &self.process.with_volatility(sigma - VOLATILITY_BUMP)?,
                self.args,
            )?;
            Ok((up - down) / (2.0 * VOLATILITY_BUMP))
        } else {
            Ok((up - self.value()?) / VOLATILITY_BUMP)
        }
    }

    /// ∂V/∂r by central difference.
    pub fn rho(&self) -> Result<Real> {
        let r = self.process.risk_free_rate();
        let up = self.reprice(
            "rate_up",
            &self.process.with_risk_free_rate(r + RATE_BUMP)?,
            self.args,
        )?;
        let down = self.reprice(
            "rate_down",
            &self.process.with_risk_free_rate(r - RATE_BUMP)?,
            self.args,
        )?;
        Ok((up - down) / (2.0 * RATE_BUMP))
    }

    /// ∂V/∂q by central difference, forward when q is below the bump.
    pub fn dividend_rho(&self) -> Result<Real> {
        let q = self.process.dividend_yield();
        let up = self.reprice(
            "dividend_yield_up",
            &self.process.with_dividend_yield(q + DIVIDEND_YIELD_BUMP)?,
            self.args,
        )?;
        if q >= DIVIDEND_YIELD_BUMP {
            let down = self.reprice(
                "dividend_yield_down",
                &self.process.with_dividend_yield(q - DIVIDEND_YIELD_BUMP)?,
                self.args,
            )?;
            Ok((up - down) / (2.0 * DIVIDEND_YIELD_BUMP))
        } else {
            Ok((up - self.value()?) / DIVIDEND_YIELD_BUMP)
        }
    }

    /// Time decay per year.
    ///
    /// The valuation date moves forward by [`THETA_BUMP_DAYS`]; dividends no
    /// longer strictly after it are dropped.  Returns
    /// `(V(τ − Δτ) − V(τ)) / Δτ` with `Δτ` the day-counter year fraction of
    /// the shift.  When the shift would reach maturity, `Δτ` is
    /// [`SHORT_THETA_FRACTION`] of the remaining year fraction instead.
    pub fn theta(&self) -> Result<Real> {
        let value = self.value()?;
        let valuation = self.process.reference_date();
        let shifted = add_days(valuation, THETA_BUMP_DAYS)?;
        let maturity = self.args.exercise.last_date();
        if shifted >= maturity {
            return self.theta_before_maturity(value);
        }
        let dt: Time = self.process.time_from_reference(shifted);

        let args = DividendVanillaOptionArguments {
            payoff: Arc::clone(&self.args.payoff),
            exercise: self.args.exercise,
            dividends: self.args.dividends.after(shifted),
        };
        let later = self.reprice("valuation_date", &self.process.with_reference_date(shifted), &args)?;
        Ok((later - value) / dt)
    }

    fn theta_before_maturity(&self, value: Real) -> Result<Real> {
        let valuation = self.process.reference_date();
        let maturity = self.args.exercise.last_date();
        let tau = self.process.time_from_reference(maturity);
        let dt = SHORT_THETA_FRACTION * tau;
        let dividends: Vec<DividendTime> = self
            .args
            .dividends
            .times(valuation, maturity, self.process.day_counter())?
            .into_iter()
            .filter(|d| d.time > dt)
            .map(|d| DividendTime {
                time: d.time - dt,
                amount: d.amount,
            })
            .collect();
        let later = lattice_price(self.process, self.args, tau - dt, &dividends, self.time_steps)?;
        trace!(bump = "time_to_maturity", value = later, "repriced");
        Ok((later - value) / dt)
    }

    /// ∂V/∂K by central difference.
    pub fn strike_sensitivity(&self) -> Result<Real> {
        let strike = self.args.payoff.strike();
        let h = STRIKE_BUMP * strike;
        let restrike = |k: Real| DividendVanillaOptionArguments {
            payoff: Arc::new(self.args.payoff.with_strike(k)),
            exercise: self.args.exercise,
            dividends: self.args.dividends.clone(),
        };
        let up = self.reprice("strike_up", self.process, &restrike(strike + h))?;
        let down = self.reprice("strike_down", self.process, &restrike(strike - h))?;
        Ok((up - down) / (2.0 * h))
    }

    /// Delta, gamma, theta, vega, rho and dividend rho.
    pub fn greeks(&self) -> Result<Greeks> {
        let engine = self.clone().with_base_value(self.value()?);
        let (delta, gamma) = engine.delta_gamma()?;
        Ok(Greeks {
            delta,
            gamma,
            theta: engine.theta()?,
            vega: engine.vega()?,
            rho: engine.rho()?,
            dividend_rho: engine.dividend_rho()?,
        })
    }

    /// Theta per day, elasticity and strike sensitivity given `greeks`.
    pub fn more_greeks(&self, greeks: &Greeks) -> Result<MoreGreeks> {
        Ok(MoreGreeks {
            theta_per_day: greeks.theta / 365.0,
            elasticity: MoreGreeks::elasticity(greeks.delta, self.process.spot(), self.value()?),
            strike_sensitivity: self.strike_sensitivity()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_instruments::{DividendSchedule, Exercise, OptionType, PlainVanillaPayoff};
    use ql_time::date::ymd;
    use ql_time::{Actual365Fixed, Date};

    fn date(y: i32, m: u32, d: u32) -> Date {
        ymd(y, m, d).unwrap()
    }

    fn process(q: Real) -> BlackScholesProcess {
        BlackScholesProcess::new(36.0, 0.06, q, 0.20, date(1998, 5, 15), Arc::new(Actual365Fixed))
            .unwrap()
    }

    fn args(option_type: OptionType, maturity: Date) -> DividendVanillaOptionArguments {
        DividendVanillaOptionArguments {
            payoff: Arc::new(PlainVanillaPayoff::new(option_type, 40.0)),
            exercise: Exercise::european(maturity),
            dividends: DividendSchedule::from_dates_and_amounts(&[date(1998, 8, 30)], &[2.06])
                .unwrap(),
        }
    }

    #[test]
    fn bump_sizes() {
        assert_eq!(SPOT_BUMP, 0.01);
        assert_eq!(VOLATILITY_BUMP, 1e-4);
        assert_eq!(RATE_BUMP, 1e-4);
        assert_eq!(DIVIDEND_YIELD_BUMP, 1e-4);
        assert_eq!(STRIKE_BUMP, 0.01);
        assert_eq!(THETA_BUMP_DAYS, 1);
    }

    #[test]
    fn delta_gamma_agree_with_single_calls() {
        let p = process(0.0);
        let a = args(OptionType::Put, date(1999, 5, 17));
        let engine = SensitivityEngine::new(&p, &a, 100);
        let (delta, gamma) = engine.delta_gamma().unwrap();
        assert_eq!(delta, engine.delta().unwrap());
        assert_eq!(gamma, engine.gamma().unwrap());
        assert!((-1.0..=0.0).contains(&delta));
        assert!(gamma > 0.0);
    }

    #[test]
    fn signs_for_a_call() {
        let p = process(0.02);
        let a = args(OptionType::Call, date(1999, 5, 17));
        let g = SensitivityEngine::new(&p, &a, 200).greeks().unwrap();
        assert!((0.0..=1.0).contains(&g.delta), "{g:?}");
        assert!(g.gamma > 0.0, "{g:?}");
        assert!(g.vega > 0.0, "{g:?}");
        assert!(g.rho > 0.0, "{g:?}");
        assert!(g.dividend_rho < 0.0, "{g:?}");
        assert!(g.theta < 0.0, "{g:?}");
    }

    #[test]
    fn strike_sensitivity_sign() {
        let p = process(0.0);
        let call = args(OptionType::Call, date(1999, 5, 17));
        let put = args(OptionType::Put, date(1999, 5, 17));
        assert!(SensitivityEngine::new(&p, &call, 200).strike_sensitivity().unwrap() < 0.0);
        assert!(SensitivityEngine::new(&p, &put, 200).strike_sensitivity().unwrap() > 0.0);
    }

    #[test]
    fn theta_of_one_day_option() {
        let p = process(0.0);
        let expiring = |option_type| DividendVanillaOptionArguments {
            dividends: DividendSchedule::empty(),
            ..args(option_type, date(1998, 5, 16))
        };
        let put = expiring(OptionType::Put);
        let engine = SensitivityEngine::new(&p, &put, 100);
        assert!(engine.value().is_ok());
        assert!(engine.theta().unwrap().is_finite());
        assert!(engine.greeks().is_ok());

        // at the money a call loses time value
        let call = DividendVanillaOptionArguments {
            payoff: Arc::new(PlainVanillaPayoff::new(OptionType::Call, 36.0)),
            ..expiring(OptionType::Call)
        };
        let theta = SensitivityEngine::new(&p, &call, 100).theta().unwrap();
        assert!(theta < 0.0, "{theta}");
    }

    #[test]
    fn theta_of_short_option_uses_fraction_of_remaining_time() {
        let p = process(0.0);
        let a = DividendVanillaOptionArguments {
            dividends: DividendSchedule::empty(),
            ..args(OptionType::Put, date(1998, 5, 16))
        };
        let engine = SensitivityEngine::new(&p, &a, 50);
        let value = engine.value().unwrap();
        let tau = 1.0 / 365.0;
        let dt = SHORT_THETA_FRACTION * tau;
        let later = lattice_price(&p, &a, tau - dt, &[], 50).unwrap();
        assert_eq!(engine.theta().unwrap(), (later - value) / dt);
    }

    #[test]
    fn spot_greeks_near_escrow_boundary() {
        // dividend present value at 99.5 % of spot: S₀ − h leaves no escrowed spot
        let p = process(0.0);
        let ex = date(1998, 8, 30);
        let amount = 0.995 * 36.0 / p.discount(p.time_from_reference(ex));
        let a = DividendVanillaOptionArguments {
            dividends: DividendSchedule::from_dates_and_amounts(&[ex], &[amount]).unwrap(),
            ..args(OptionType::Put, date(1999, 5, 17))
        };
        let engine = SensitivityEngine::new(&p, &a, 100);
        let value = engine.value().unwrap();
        let (delta, gamma) = engine.delta_gamma().unwrap();
        assert!((-1.0 - 1e-9..=1e-9).contains(&delta), "{delta}");
        assert!(gamma.is_finite());

        let h = SPOT_BUMP * 36.0;
        let up = binomial_dividend_price(&p.with_spot(36.0 + h).unwrap(), &a, 100).unwrap();
        assert_eq!(delta, (up - value) / h);
        assert_eq!(engine.delta().unwrap(), delta);
        assert_eq!(engine.gamma().unwrap(), gamma);
    }

    #[test]
    fn spot_greeks_central_away_from_boundary() {
        let p = process(0.0);
        let a = args(OptionType::Put, date(1999, 5, 17));
        let engine = SensitivityEngine::new(&p, &a, 100);
        let h = SPOT_BUMP * 36.0;
        let up = binomial_dividend_price(&p.with_spot(36.0 + h).unwrap(), &a, 100).unwrap();
        let down = binomial_dividend_price(&p.with_spot(36.0 - h).unwrap(), &a, 100).unwrap();
        assert_eq!(engine.delta().unwrap(), (up - down) / (2.0 * h));
    }

    #[test]
    fn theta_drops_dividend_going_ex() {
        // the only dividend goes ex on the shifted valuation date
        let p = process(0.0);
        let a = DividendVanillaOptionArguments {
            dividends: DividendSchedule::from_dates_and_amounts(&[date(1998, 5, 16)], &[2.06])
                .unwrap(),
            ..args(OptionType::Put, date(1999, 5, 17))
        };
        assert!(SensitivityEngine::new(&p, &a, 100).theta().unwrap().is_finite());
    }

    #[test]
    fn base_value_is_reused() {
        let p = process(0.0);
        let a = args(OptionType::Put, date(1999, 5, 17));
        let engine = SensitivityEngine::new(&p, &a, 50).with_base_value(1.0);
        assert_eq!(engine.value().unwrap(), 1.0);
    }

    #[test]
    fn more_greeks_derive_from_greeks() {
        let p = process(0.0);
        let a = args(OptionType::Put, date(1999, 5, 17));
        let engine = SensitivityEngine::new(&p, &a, 100);
        let g = engine.greeks().unwrap();
        let m = engine.more_greeks(&g).unwrap();
        assert!((m.theta_per_day * 365.0 - g.theta).abs() < 1e-12);
        let v = engine.value().unwrap();
        assert!((m.elasticity - g.delta * 36.0 / v).abs() < 1e-12);
        assert!(m.strike_sensitivity > 0.0);
    }
}
