/// Safe-withdrawal income a net worth supports, split annual/monthly.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwrAmounts {
    pub annual: f64,
    pub monthly: f64,
}

pub fn swr_amounts(net_worth: f64, swr_pct: f64) -> SwrAmounts {
    if swr_pct <= 0.0 {
        return SwrAmounts {
            annual: 0.0,
            monthly: 0.0,
        };
    }
    let annual = net_worth * swr_pct / 100.0;
    SwrAmounts {
        annual,
        monthly: annual / 12.0,
    }
}

/// Real (today's-purchasing-power) annual income a net worth would
/// generate at safe withdrawal `years` from now: nominal future SWR
/// income deflated back by inflation. At `years = 0` this collapses
/// to `net_worth * swr/100`.
pub fn projected_retirement_income(
    net_worth: f64,
    years: f64,
    return_pct: f64,
    inflation_pct: f64,
    swr_pct: f64,
) -> f64 {
    let years = years.max(0.0);
    let grown = net_worth * (1.0 + return_pct / 100.0).powf(years);
    grown * swr_pct / 100.0 / (1.0 + inflation_pct / 100.0).powf(years)
}

/// Exact algebraic inverse of [`projected_retirement_income`]: the net
/// worth needed today so that safe withdrawals `years` from now meet
/// `target_real_income` in today's money. Inflate the target to its
/// future nominal equivalent, divide by SWR for the future net worth,
/// then discount back by the return rate.
pub fn net_worth_for_retirement_income(
    target_real_income: f64,
    years: f64,
    return_pct: f64,
    inflation_pct: f64,
    swr_pct: f64,
) -> f64 {
    if target_real_income <= 0.0 {
        return 0.0;
    }
    if swr_pct <= 0.0 {
        return f64::INFINITY;
    }

    let years = years.max(0.0);
    let future_nominal_income = target_real_income * (1.0 + inflation_pct / 100.0).powf(years);
    let future_net_worth = future_nominal_income / (swr_pct / 100.0);
    future_net_worth / (1.0 + return_pct / 100.0).powf(years)
}
