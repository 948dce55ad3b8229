use chrono::{DateTime, Datelike, TimeZone, Utc};

use super::inflation::{inflated_spending, inflation_multiplier};
use super::solver;
use super::types::{NetWorthEntry, ProjectionRow, RealTimeValue, RowYear, UserSettings};

/// Future yearly rows generated after the "now" row.
pub const PROJECTION_YEARS: u32 = 60;

/// Average Gregorian year, used for elapsed-time fractions.
pub const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// The most recent entry by timestamp; all extrapolation hangs off it.
pub fn anchor_entry(entries: &[NetWorthEntry]) -> Option<&NetWorthEntry> {
    entries.iter().max_by_key(|entry| entry.timestamp)
}

/// Linear extrapolation of the anchor entry into "right now", for live
/// display between snapshots. Deliberately not compounding: the
/// elapsed time since the last snapshot is assumed small relative to
/// a year, and the yearly rows use true exponential growth instead.
pub fn real_time_value(
    entry: &NetWorthEntry,
    settings: &UserSettings,
    now: DateTime<Utc>,
    include_contributions: bool,
) -> RealTimeValue {
    let elapsed_ms = (now - entry.timestamp).num_milliseconds().max(0) as f64;
    let appreciation = entry.amount * (settings.current_rate / 100.0) / MS_PER_YEAR * elapsed_ms;
    let contributed = if include_contributions {
        settings.yearly_contribution / MS_PER_YEAR * elapsed_ms
    } else {
        0.0
    };

    RealTimeValue {
        amount: entry.amount,
        appreciation,
        contributed,
        total: entry.amount + appreciation + contributed,
    }
}

fn end_of_year(year: i32) -> DateTime<Utc> {
    // Valid for every year the projection can reach; the fallback is
    // never taken for in-range dates.
    Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Future value of contributions after `years_from_entry` elapsed
/// years, together with the principal paid in.
///
/// Two parts: the fractional first year is contributed pro-rata and
/// then compounds over the remaining full years, and the full years
/// form an ordinary end-of-year annuity. Annuity math alone would
/// undercount the partial first year.
fn contribution_growth(yearly_contribution: f64, rate_pct: f64, years_from_entry: f64) -> (f64, f64) {
    if yearly_contribution <= 0.0 || years_from_entry <= 0.0 {
        return (0.0, 0.0);
    }

    let rate = rate_pct / 100.0;
    let full_years = years_from_entry.floor();
    let partial = years_from_entry - full_years;
    let growth = 1.0 + rate;

    let partial_seed = yearly_contribution * partial * growth.powf(full_years);
    let annuity = if rate > 0.0 {
        yearly_contribution * (growth.powf(full_years) - 1.0) / rate
    } else {
        yearly_contribution * full_years
    };

    let principal = yearly_contribution * years_from_entry;
    (partial_seed + annuity, principal)
}

fn monthly_spend_for_year(
    settings: &UserSettings,
    net_worth: f64,
    years_from_now: f64,
    apply_inflation: bool,
    use_spending_levels: bool,
) -> f64 {
    if use_spending_levels {
        let spend = inflated_spending(
            settings.base_monthly_budget,
            net_worth,
            settings.spending_growth_rate,
            years_from_now,
            settings.inflation_rate,
        );
        if apply_inflation { spend.nominal } else { spend.real }
    } else if apply_inflation {
        settings.monthly_spend * inflation_multiplier(years_from_now, settings.inflation_rate)
    } else {
        settings.monthly_spend
    }
}

struct RowInputs {
    year: RowYear,
    years_from_entry: f64,
    years_from_now: f64,
    net_worth: f64,
    interest: f64,
    contributed: f64,
}

/// Discrete year-by-year trajectory: one "now" row followed by
/// [`PROJECTION_YEARS`] future calendar years. `current_net_worth` and
/// `current_appreciation` come from [`real_time_value`], already
/// sampled at `now`.
pub fn generate_projections(
    anchor: &NetWorthEntry,
    current_net_worth: f64,
    current_appreciation: f64,
    settings: &UserSettings,
    now: DateTime<Utc>,
    apply_inflation: bool,
    use_spending_levels: bool,
) -> Vec<ProjectionRow> {
    let current_year = now.year();
    let birth_year = settings.birth_date.map(|date| date.year());
    let now_elapsed = (now - anchor.timestamp).num_milliseconds().max(0) as f64 / MS_PER_YEAR;

    let mut rows = Vec::with_capacity(PROJECTION_YEARS as usize + 1);
    let mut fi_marked = false;
    let mut crossover_marked = false;

    let now_inputs = RowInputs {
        year: RowYear::Now,
        years_from_entry: now_elapsed,
        years_from_now: 0.0,
        net_worth: current_net_worth,
        interest: current_appreciation,
        contributed: (current_net_worth - anchor.amount - current_appreciation).max(0.0),
    };
    rows.push(build_row(
        now_inputs,
        settings,
        current_year,
        birth_year,
        apply_inflation,
        use_spending_levels,
        &mut fi_marked,
        &mut crossover_marked,
    ));

    for offset in 1..=PROJECTION_YEARS {
        let year = current_year + offset as i32;
        let years_from_entry = ((end_of_year(year) - anchor.timestamp).num_milliseconds().max(0)
            as f64)
            / MS_PER_YEAR;

        let compounded =
            anchor.amount * (1.0 + settings.current_rate / 100.0).powf(years_from_entry);
        let (contribution_value, contributed) = contribution_growth(
            settings.yearly_contribution,
            settings.current_rate,
            years_from_entry,
        );
        let net_worth = compounded + contribution_value;
        let interest = net_worth - anchor.amount - contributed;

        let inputs = RowInputs {
            year: RowYear::Year(year),
            years_from_entry,
            years_from_now: offset as f64,
            net_worth,
            interest,
            contributed,
        };
        rows.push(build_row(
            inputs,
            settings,
            current_year,
            birth_year,
            apply_inflation,
            use_spending_levels,
            &mut fi_marked,
            &mut crossover_marked,
        ));
    }

    rows
}

#[allow(clippy::too_many_arguments)]
fn build_row(
    inputs: RowInputs,
    settings: &UserSettings,
    current_year: i32,
    birth_year: Option<i32>,
    apply_inflation: bool,
    use_spending_levels: bool,
    fi_marked: &mut bool,
    crossover_marked: &mut bool,
) -> ProjectionRow {
    let calendar_year = inputs.year.calendar_year(current_year);
    let age = birth_year.map(|birth| calendar_year - birth);

    let monthly_spend = monthly_spend_for_year(
        settings,
        inputs.net_worth,
        inputs.years_from_now,
        apply_inflation,
        use_spending_levels,
    );

    let annual_swr = inputs.net_worth * settings.swr / 100.0;
    let monthly_swr = annual_swr / 12.0;

    let fi_target = solver::fi_target(monthly_spend, settings.swr);
    let fi_progress = if fi_target > 0.0 {
        inputs.net_worth / fi_target * 100.0
    } else {
        0.0
    };

    let swr_covers_spend = monthly_swr >= monthly_spend;
    let is_fi_year = swr_covers_spend && !*fi_marked;
    if is_fi_year {
        *fi_marked = true;
    }

    let crossed = inputs.interest > inputs.contributed && inputs.contributed > 0.0;
    let is_crossover = crossed && !*crossover_marked;
    if is_crossover {
        *crossover_marked = true;
    }

    let coast = solver::coast_fi_year(
        inputs.net_worth,
        settings.monthly_spend,
        settings.swr,
        settings.current_rate,
        settings.inflation_rate,
        inputs.years_from_now,
    );
    let coast_fi_year = coast.map(|years| calendar_year + years as i32);
    let coast_fi_age = match (coast_fi_year, birth_year) {
        (Some(year), Some(birth)) => Some(year - birth),
        _ => None,
    };

    ProjectionRow {
        year: inputs.year,
        age,
        years_from_entry: inputs.years_from_entry,
        net_worth: inputs.net_worth,
        interest: inputs.interest,
        contributed: inputs.contributed,
        monthly_spend,
        monthly_swr,
        annual_swr,
        fi_target,
        fi_progress,
        is_fi_year,
        is_crossover,
        swr_covers_spend,
        coast_fi_year,
        coast_fi_age,
    }
}
