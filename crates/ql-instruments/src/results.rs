//! Sensitivity result sets.

use ql_core::Real;
use serde::{Deserialize, Serialize};

/// First- and second-order sensitivities of an option value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂t, per year.
    pub theta: Real,
    /// ∂V/∂σ.
    pub vega: Real,
    /// ∂V/∂r.
    pub rho: Real,
    /// ∂V/∂q.
    pub dividend_rho: Real,
}

/// Sensitivities derived from [`Greeks`] or from extra repricings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoreGreeks {
    /// Theta per calendar day (`theta / 365`).
    pub theta_per_day: Real,
    /// `delta · S / V`.
    pub elasticity: Real,
    /// ∂V/∂K.
    pub strike_sensitivity: Real,
}

impl MoreGreeks {
    /// Elasticity of the option value with respect to spot.
    ///
    /// Zero when both value and delta vanish, `±Real::MAX` when only the
    /// value does.
    pub fn elasticity(delta: Real, spot: Real, value: Real) -> Real {
        if value.abs() > Real::EPSILON {
            delta * spot / value
        } else if delta.abs() > Real::EPSILON {
            Real::MAX.copysign(delta)
        } else {
            0.0
        }
    }
}

/// Value and every sensitivity of one option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionResults {
    /// NPV.
    pub value: Real,
    /// Main greeks.
    pub greeks: Greeks,
    /// Derived greeks.
    pub more_greeks: MoreGreeks,
}
