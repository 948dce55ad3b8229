use std::ops::{Add, Div, Mul, Sub};

/// Compound inflation growth factor over `years` at `rate_pct` percent
/// per year. Returns exactly `1.0` for `years <= 0`: year zero has no
/// inflation and the model never extrapolates inflation backward.
pub fn inflation_multiplier(years: f64, rate_pct: f64) -> f64 {
    if years > 0.0 {
        (1.0 + rate_pct / 100.0).powf(years)
    } else {
        1.0
    }
}

/// Deflate a future nominal amount to today's purchasing power.
pub fn nominal_to_real(value: f64, years: f64, rate_pct: f64) -> f64 {
    value / inflation_multiplier(years, rate_pct)
}

/// Inflate a today's-money amount to its nominal future equivalent.
/// Exact algebraic inverse of [`nominal_to_real`] for any `years >= 0`.
pub fn real_to_nominal(value: f64, years: f64, rate_pct: f64) -> f64 {
    value * inflation_multiplier(years, rate_pct)
}

/// A currency amount carried in both views at once: `nominal` is the
/// actual future-dollar figure, `real` its today's-purchasing-power
/// equivalent. Keeping the pair in one value rules out the class of
/// bug where one track gets inflated twice and the other not at all.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflatedValue {
    pub nominal: f64,
    pub real: f64,
}

impl InflatedValue {
    pub const ZERO: InflatedValue = InflatedValue {
        nominal: 0.0,
        real: 0.0,
    };

    /// A year-zero value, where nominal and real coincide.
    pub fn current(value: f64) -> Self {
        Self {
            nominal: value,
            real: value,
        }
    }

    pub fn from_nominal(nominal: f64, years: f64, rate_pct: f64) -> Self {
        Self {
            nominal,
            real: nominal_to_real(nominal, years, rate_pct),
        }
    }

    pub fn from_real(real: f64, years: f64, rate_pct: f64) -> Self {
        Self {
            nominal: real_to_nominal(real, years, rate_pct),
            real,
        }
    }

    /// Advisory check used at integration boundaries; the core formulas
    /// never branch on it.
    pub fn is_valid(&self) -> bool {
        self.nominal.is_finite() && self.real.is_finite()
    }
}

impl Add for InflatedValue {
    type Output = InflatedValue;

    fn add(self, rhs: InflatedValue) -> InflatedValue {
        InflatedValue {
            nominal: self.nominal + rhs.nominal,
            real: self.real + rhs.real,
        }
    }
}

impl Sub for InflatedValue {
    type Output = InflatedValue;

    fn sub(self, rhs: InflatedValue) -> InflatedValue {
        InflatedValue {
            nominal: self.nominal - rhs.nominal,
            real: self.real - rhs.real,
        }
    }
}

impl Mul<f64> for InflatedValue {
    type Output = InflatedValue;

    fn mul(self, rhs: f64) -> InflatedValue {
        InflatedValue {
            nominal: self.nominal * rhs,
            real: self.real * rhs,
        }
    }
}

impl Div<f64> for InflatedValue {
    type Output = InflatedValue;

    /// Dividing by zero yields the zero value rather than a fault, so
    /// the calculation graph stays total under partially-filled
    /// settings.
    fn div(self, rhs: f64) -> InflatedValue {
        if rhs == 0.0 {
            return InflatedValue::ZERO;
        }
        InflatedValue {
            nominal: self.nominal / rhs,
            real: self.real / rhs,
        }
    }
}

/// Monthly spending under level-based policy, `years` out from now.
///
/// Only the base budget floor keeps pace with inflation: it stands for
/// fixed-cost lifestyle. The net-worth-proportional portion is not
/// separately inflated because net worth itself already grows
/// nominally.
pub fn inflated_spending(
    base_monthly_budget: f64,
    net_worth: f64,
    spending_growth_pct: f64,
    years: f64,
    inflation_pct: f64,
) -> InflatedValue {
    let nominal = base_monthly_budget * inflation_multiplier(years, inflation_pct)
        + net_worth * spending_growth_pct / 100.0 / 12.0;
    InflatedValue {
        nominal,
        real: nominal / inflation_multiplier(years, inflation_pct),
    }
}

/// Re-derives [`inflated_spending`] from first principles and checks
/// the two agree within `tol`. Exists for property tests.
pub fn verify_inflated_spending(
    base_monthly_budget: f64,
    net_worth: f64,
    spending_growth_pct: f64,
    years: f64,
    inflation_pct: f64,
    tol: f64,
) -> bool {
    let value = inflated_spending(
        base_monthly_budget,
        net_worth,
        spending_growth_pct,
        years,
        inflation_pct,
    );

    // Independent derivation: inflate the base floor year by year in
    // whole steps, then the fractional remainder, and add the
    // uninflated proportional share.
    let mut floor = base_monthly_budget;
    let whole = years.max(0.0).floor() as u32;
    for _ in 0..whole {
        floor *= 1.0 + inflation_pct / 100.0;
    }
    floor *= (1.0 + inflation_pct / 100.0).powf(years.max(0.0) - whole as f64);
    let expected_nominal = floor + net_worth * spending_growth_pct / 100.0 / 12.0;
    let expected_real = nominal_to_real(expected_nominal, years, inflation_pct);

    (value.nominal - expected_nominal).abs() <= tol * (1.0 + expected_nominal.abs())
        && (value.real - expected_real).abs() <= tol * (1.0 + expected_real.abs())
}
