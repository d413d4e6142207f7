//! Pricing facade for vanilla options with discrete cash dividends.
//!
//! ```
//! use std::sync::Arc;
//! use ql_helpers::DividendOptionHelper;
//! use ql_instruments::OptionType;
//! use ql_time::{date::ymd, Actual365Fixed, Target};
//!
//! let helper = DividendOptionHelper::builder()
//!     .option_type(OptionType::Put)
//!     .spot(36.0)
//!     .strike(40.0)
//!     .risk_free_rate(0.06)
//!     .volatility(0.20)
//!     .valuation_date(ymd(1998, 5, 15)?)
//!     .settlement_date(ymd(1998, 5, 17)?)
//!     .maturity_date(ymd(1999, 5, 17)?)
//!     .dividend(ymd(1998, 8, 30)?, 2.06)
//!     .calendar(Arc::new(Target))
//!     .day_counter(Arc::new(Actual365Fixed))
//!     .time_steps(200)
//!     .crr_american()?;
//! assert!(helper.npv()? > 4.0);
//! # Ok::<(), ql_core::Error>(())
//! ```

use ql_core::errors::{Error, Result};
use ql_core::{require, Rate, Real, Size, Volatility};
use ql_instruments::{
    DividendSchedule, DividendVanillaOption, DividendVanillaOptionArguments, Exercise,
    ExerciseType, Greeks, MoreGreeks, OptionResults, OptionType, PricingEngine,
};
use ql_pricingengines::{
    BinomialDividendEngine, BinomialEngineConfig, SensitivityEngine, DEFAULT_TIME_STEPS,
};
use ql_processes::BlackScholesProcess;
use ql_time::{Actual365Fixed, Calendar, Date, DayCounter, NullCalendar};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// A validated dividend option together with its lattice engine.
///
/// Every query is a pure function of the inputs; the unbumped NPV is cached
/// after the first successful evaluation.
#[derive(Debug)]
pub struct DividendOptionHelper {
    option: DividendVanillaOption,
    arguments: DividendVanillaOptionArguments,
    engine: BinomialDividendEngine,
    settlement_date: Date,
    calendar: Arc<dyn Calendar>,
    npv: OnceLock<Real>,
}

impl DividendOptionHelper {
    /// Start describing an option.
    pub fn builder() -> DividendOptionHelperBuilder {
        DividendOptionHelperBuilder::default()
    }

    /// Net present value at the valuation date.
    pub fn npv(&self) -> Result<Real> {
        if let Some(&v) = self.npv.get() {
            return Ok(v);
        }
        let v = self.engine.calculate(&self.arguments)?.npv;
        Ok(*self.npv.get_or_init(|| v))
    }

    fn sensitivities(&self) -> Result<SensitivityEngine<'_>> {
        Ok(SensitivityEngine::new(self.process(), &self.arguments, self.time_steps())
            .with_base_value(self.npv()?))
    }

    /// ∂V/∂S.
    pub fn delta(&self) -> Result<Real> {
        self.sensitivities()?.delta()
    }

    /// ∂²V/∂S².
    pub fn gamma(&self) -> Result<Real> {
        self.sensitivities()?.gamma()
    }

    /// Value change per year of calendar time, see
    /// [`SensitivityEngine::theta`].
    pub fn theta(&self) -> Result<Real> {
        self.sensitivities()?.theta()
    }

    /// ∂V/∂σ.
    pub fn vega(&self) -> Result<Real> {
        self.sensitivities()?.vega()
    }

    /// ∂V/∂r.
    pub fn rho(&self) -> Result<Real> {
        self.sensitivities()?.rho()
    }

    /// ∂V/∂q.
    pub fn dividend_rho(&self) -> Result<Real> {
        self.sensitivities()?.dividend_rho()
    }

    /// ∂V/∂K.
    pub fn strike_sensitivity(&self) -> Result<Real> {
        self.sensitivities()?.strike_sensitivity()
    }

    /// All main greeks.
    pub fn greeks(&self) -> Result<Greeks> {
        self.sensitivities()?.greeks()
    }

    /// Value, greeks and derived greeks in one pass.
    pub fn results(&self) -> Result<OptionResults> {
        let engine = self.sensitivities()?;
        let greeks = engine.greeks()?;
        let more_greeks: MoreGreeks = engine.more_greeks(&greeks)?;
        Ok(OptionResults {
            value: self.npv()?,
            greeks,
            more_greeks,
        })
    }

    /// Volatility reproducing `target_price`.
    ///
    /// Not available for lattice dividend options: always fails with
    /// [`Error::UnsupportedOperation`].
    pub fn implied_volatility(&self, target_price: Real) -> Result<Volatility> {
        Err(Error::UnsupportedOperation(format!(
            "implied volatility for a target price of {target_price} is not available \
             on the CRR dividend lattice"
        )))
    }

    /// The option contract.
    pub fn option(&self) -> &DividendVanillaOption {
        &self.option
    }

    /// The market process (spot, rates, volatility, valuation date).
    pub fn process(&self) -> &BlackScholesProcess {
        self.engine.process()
    }

    /// European or American.
    pub fn exercise_type(&self) -> ExerciseType {
        self.option.exercise().exercise_type()
    }

    /// Lattice resolution.
    pub fn time_steps(&self) -> Size {
        self.engine.config().time_steps
    }

    /// Settlement date.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Calendar the dates were checked against.
    pub fn calendar(&self) -> &dyn Calendar {
        &*self.calendar
    }
}

/// Builder for [`DividendOptionHelper`].
///
/// Option type, spot, strike, risk-free rate, volatility and the valuation,
/// settlement and maturity dates are required.  The dividend yield defaults
/// to 0, the calendar to [`NullCalendar`], the day counter to
/// [`Actual365Fixed`] and the step count to [`DEFAULT_TIME_STEPS`].
#[derive(Debug, Clone, Default)]
pub struct DividendOptionHelperBuilder {
    option_type: Option<OptionType>,
    spot: Option<Real>,
    strike: Option<Real>,
    risk_free_rate: Option<Rate>,
    dividend_yield: Option<Rate>,
    volatility: Option<Volatility>,
    valuation_date: Option<Date>,
    settlement_date: Option<Date>,
    maturity_date: Option<Date>,
    dividend_dates: Vec<Date>,
    dividend_amounts: Vec<Real>,
    calendar: Option<Arc<dyn Calendar>>,
    day_counter: Option<Arc<dyn DayCounter>>,
    time_steps: Option<Size>,
}

fn required<T>(value: Option<T>, parameter: &'static str) -> Result<T> {
    value.ok_or_else(|| Error::invalid_contract(parameter, "is required"))
}

impl DividendOptionHelperBuilder {
    /// Call or put.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    /// Spot price at the valuation date.
    pub fn spot(mut self, spot: Real) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Strike price.
    pub fn strike(mut self, strike: Real) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Continuously compounded risk-free rate.
    pub fn risk_free_rate(mut self, rate: Rate) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Continuous dividend yield, on top of the cash dividends.
    pub fn dividend_yield(mut self, dividend_yield: Rate) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    /// Volatility.
    pub fn volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Valuation date.
    pub fn valuation_date(mut self, date: Date) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Settlement date; for American options, the first exercise date.
    pub fn settlement_date(mut self, date: Date) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Maturity (expiry) date.
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Add one cash dividend.
    pub fn dividend(mut self, date: Date, amount: Real) -> Self {
        self.dividend_dates.push(date);
        self.dividend_amounts.push(amount);
        self
    }

    /// Set every cash dividend from parallel ex-date and amount lists.
    pub fn dividends(mut self, dates: Vec<Date>, amounts: Vec<Real>) -> Self {
        self.dividend_dates = dates;
        self.dividend_amounts = amounts;
        self
    }

    /// Calendar used to flag non-business settlement or maturity dates.
    pub fn calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Day counter turning dates into year fractions.
    pub fn day_counter(mut self, day_counter: Arc<dyn DayCounter>) -> Self {
        self.day_counter = Some(day_counter);
        self
    }

    /// Lattice resolution.
    pub fn time_steps(mut self, steps: Size) -> Self {
        self.time_steps = Some(steps);
        self
    }

    /// European option on a CRR lattice.
    pub fn crr_european(self) -> Result<DividendOptionHelper> {
        self.build(ExerciseType::European)
    }

    /// American option on a CRR lattice, exercisable from settlement to
    /// maturity.
    pub fn crr_american(self) -> Result<DividendOptionHelper> {
        self.build(ExerciseType::American)
    }

    fn build(self, exercise_type: ExerciseType) -> Result<DividendOptionHelper> {
        let option_type = required(self.option_type, "option_type")?;
        let spot = required(self.spot, "spot")?;
        let strike = required(self.strike, "strike")?;
        let risk_free_rate = required(self.risk_free_rate, "risk_free_rate")?;
        let volatility = required(self.volatility, "volatility")?;
        let valuation = required(self.valuation_date, "valuation_date")?;
        let settlement = required(self.settlement_date, "settlement_date")?;
        let maturity = required(self.maturity_date, "maturity_date")?;
        let calendar = self.calendar.unwrap_or_else(|| Arc::new(NullCalendar));
        let day_counter = self.day_counter.unwrap_or_else(|| Arc::new(Actual365Fixed));
        let config =
            BinomialEngineConfig::new(self.time_steps.unwrap_or(DEFAULT_TIME_STEPS))?;

        let process = BlackScholesProcess::new(
            spot,
            risk_free_rate,
            self.dividend_yield.unwrap_or(0.0),
            volatility,
            valuation,
            day_counter,
        )?;

        require!(
            settlement <= maturity,
            Error::invalid_contract(
                "settlement_date",
                format!("{settlement} is after the maturity date {maturity}")
            )
        );
        let tau = process.time_from_reference(maturity);
        require!(
            maturity > valuation && tau > 0.0,
            Error::invalid_contract(
                "maturity_date",
                format!("{maturity} is not after the valuation date {valuation} (τ = {tau})")
            )
        );

        let dividends =
            DividendSchedule::from_dates_and_amounts(&self.dividend_dates, &self.dividend_amounts)?;
        let dividend_pv: Real = dividends
            .times(valuation, maturity, process.day_counter())?
            .iter()
            .map(|d| d.amount * process.discount(d.time))
            .sum();
        require!(
            dividend_pv < spot,
            Error::InconsistentDividendSchedule { dividend_pv, spot }
        );

        for (label, date) in [("settlement", settlement), ("maturity", maturity)] {
            if !calendar.is_business_day(date) {
                warn!(
                    %date,
                    calendar = calendar.name(),
                    "{label} date is not a business day"
                );
            }
        }

        let exercise = match exercise_type {
            ExerciseType::European => Exercise::european(maturity),
            ExerciseType::American => Exercise::american(settlement, maturity)?,
        };
        let option = DividendVanillaOption::vanilla(option_type, strike, exercise, dividends)?;

        debug!(
            %exercise_type,
            %option_type,
            spot,
            strike,
            tau,
            dividends = option.dividends().len(),
            dividend_pv,
            time_steps = config.time_steps,
            "dividend option helper ready"
        );

        Ok(DividendOptionHelper {
            arguments: option.arguments(),
            option,
            engine: BinomialDividendEngine::new(Arc::new(process), config),
            settlement_date: settlement,
            calendar,
            npv: OnceLock::new(),
        })
    }
}
