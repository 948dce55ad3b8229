use super::income::projected_retirement_income;
use super::solver;
use super::types::{
    FiMilestone, FiMilestonesInfo, MilestoneKind, ProjectionRow, RowYear, UserSettings,
};

/// Retirement age assumed by the coast milestones.
const COAST_RETIREMENT_AGE: i32 = 65;

/// Years to retirement assumed when no birth date is known.
const DEFAULT_YEARS_TO_RETIREMENT: f64 = 30.0;

const PERCENTAGE_THRESHOLDS: [(&str, f64); 5] = [
    ("fi_10", 10.0),
    ("fi_25", 25.0),
    ("fi_50", 50.0),
    ("fi_75", 75.0),
    ("fi_100", 100.0),
];

const LIFESTYLE_MULTIPLIERS: [(&str, f64); 4] = [
    ("lean_fi", 0.7),
    ("barista_fi", 0.85),
    ("regular_fi", 1.0),
    ("fat_fi", 1.5),
];

const RUNWAY_THRESHOLDS: [(&str, f64); 6] = [
    ("runway_6_months", 0.5),
    ("runway_1_year", 1.0),
    ("runway_2_years", 2.0),
    ("runway_3_years", 3.0),
    ("runway_5_years", 5.0),
    ("runway_10_years", 10.0),
];

const COAST_THRESHOLDS: [(&str, f64); 3] =
    [("coast_25", 25.0), ("coast_50", 50.0), ("coast_75", 75.0)];

const RETIREMENT_INCOME_TARGETS: [(&str, f64); 22] = [
    ("income_10k", 10_000.0),
    ("income_15k", 15_000.0),
    ("income_20k", 20_000.0),
    ("income_25k", 25_000.0),
    ("income_30k", 30_000.0),
    ("income_40k", 40_000.0),
    ("income_50k", 50_000.0),
    ("income_60k", 60_000.0),
    ("income_70k", 70_000.0),
    ("income_80k", 80_000.0),
    ("income_90k", 90_000.0),
    ("income_100k", 100_000.0),
    ("income_125k", 125_000.0),
    ("income_150k", 150_000.0),
    ("income_200k", 200_000.0),
    ("income_250k", 250_000.0),
    ("income_300k", 300_000.0),
    ("income_400k", 400_000.0),
    ("income_500k", 500_000.0),
    ("income_750k", 750_000.0),
    ("income_1m", 1_000_000.0),
    ("income_2m", 2_000_000.0),
];

/// Years of current spending covered by a net worth. `Infinity` when
/// spending is zero, so the degenerate case reads as always covered.
pub fn runway_years(net_worth: f64, monthly_spend: f64) -> f64 {
    if monthly_spend <= 0.0 {
        return f64::INFINITY;
    }
    net_worth / (monthly_spend * 12.0)
}

struct EvalContext<'a> {
    projections: &'a [ProjectionRow],
    settings: &'a UserSettings,
    current_year: i32,
    current_age: Option<i32>,
    years_to_retirement: f64,
}

impl<'a> EvalContext<'a> {
    fn now(&self) -> &ProjectionRow {
        &self.projections[0]
    }

    /// Milestone achieved at the first row satisfying `achieved`,
    /// stamped with that row's year, age, and net worth.
    fn from_first_row<F>(
        &self,
        id: &'static str,
        kind: MilestoneKind,
        target_value: f64,
        achieved: F,
    ) -> FiMilestone
    where
        F: Fn(&ProjectionRow) -> bool,
    {
        match self.projections.iter().find(|row| achieved(row)) {
            Some(row) => FiMilestone {
                id,
                kind,
                target_value,
                is_achieved: true,
                year: Some(row.year.calendar_year(self.current_year)),
                age: row.age,
                net_worth_at_milestone: Some(row.net_worth),
            },
            None => FiMilestone {
                id,
                kind,
                target_value,
                is_achieved: false,
                year: None,
                age: None,
                net_worth_at_milestone: None,
            },
        }
    }

    /// Milestone decided purely from the current state: achieved now
    /// or not yet, never dated in the future.
    fn from_now(&self, id: &'static str, kind: MilestoneKind, target_value: f64, achieved: bool) -> FiMilestone {
        FiMilestone {
            id,
            kind,
            target_value,
            is_achieved: achieved,
            year: achieved.then_some(self.current_year),
            age: if achieved { self.current_age } else { None },
            net_worth_at_milestone: achieved.then_some(self.now().net_worth),
        }
    }
}

/// Evaluates the fixed milestone catalog against one trajectory. Every
/// catalog entry is always present regardless of settings; an empty
/// trajectory yields an empty report rather than an error.
pub fn fi_milestones(
    projections: &[ProjectionRow],
    settings: &UserSettings,
    birth_year: Option<i32>,
) -> FiMilestonesInfo {
    let Some(now_row) = projections.first() else {
        return FiMilestonesInfo::empty();
    };

    let current_year = match projections.get(1).map(|row| row.year) {
        Some(RowYear::Year(year)) => year - 1,
        _ => match (now_row.age, birth_year) {
            (Some(age), Some(birth)) => birth + age,
            _ => 0,
        },
    };
    let current_age = now_row.age.or_else(|| birth_year.map(|b| current_year - b));
    let years_to_retirement = current_age
        .map(|age| (COAST_RETIREMENT_AGE - age).max(0) as f64)
        .unwrap_or(DEFAULT_YEARS_TO_RETIREMENT);

    let ctx = EvalContext {
        projections,
        settings,
        current_year,
        current_age,
        years_to_retirement,
    };

    let mut milestones = Vec::with_capacity(43);
    milestones.extend(percentage_milestones(&ctx));
    milestones.extend(lifestyle_milestones(&ctx));
    milestones.extend(runway_milestones(&ctx));
    milestones.extend(coast_milestones(&ctx));
    let specials = special_milestones(&ctx, &milestones);
    milestones.extend(specials);
    milestones.extend(retirement_income_milestones(&ctx));

    // Achieved entries first; catalog order within each group.
    milestones.sort_by_key(|milestone| !milestone.is_achieved);

    // Current/next are judged against today's progress, not against
    // the trajectory-wide achievement flags: a threshold the plan only
    // reaches in a future year is still ahead of the user now.
    let current_milestone = milestones
        .iter()
        .filter(|m| m.kind == MilestoneKind::Percentage && m.target_value <= now_row.fi_progress)
        .max_by(|a, b| a.target_value.total_cmp(&b.target_value))
        .cloned();
    let next_milestone = milestones
        .iter()
        .filter(|m| m.kind == MilestoneKind::Percentage && m.target_value > now_row.fi_progress)
        .min_by(|a, b| a.target_value.total_cmp(&b.target_value))
        .cloned();

    let (progress_to_next, amount_to_next) = match &next_milestone {
        Some(next) => {
            let lower = current_milestone
                .as_ref()
                .map(|m| m.target_value)
                .unwrap_or(0.0);
            let span = next.target_value - lower;
            let progress = if span > 0.0 {
                ((now_row.fi_progress - lower) / span * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            };
            let amount =
                (now_row.fi_target * next.target_value / 100.0 - now_row.net_worth).max(0.0);
            (progress, amount)
        }
        None => (100.0, 0.0),
    };

    FiMilestonesInfo {
        milestones,
        current_milestone,
        next_milestone,
        progress_to_next,
        amount_to_next,
    }
}

fn percentage_milestones(ctx: &EvalContext<'_>) -> Vec<FiMilestone> {
    PERCENTAGE_THRESHOLDS
        .iter()
        .map(|&(id, threshold)| {
            ctx.from_first_row(id, MilestoneKind::Percentage, threshold, |row| {
                row.fi_progress >= threshold
            })
        })
        .collect()
}

fn lifestyle_milestones(ctx: &EvalContext<'_>) -> Vec<FiMilestone> {
    let swr = ctx.settings.swr;
    LIFESTYLE_MULTIPLIERS
        .iter()
        .map(|&(id, multiplier)| {
            ctx.from_first_row(id, MilestoneKind::Lifestyle, multiplier, |row| {
                row.net_worth >= solver::fi_target(row.monthly_spend, swr) * multiplier
            })
        })
        .collect()
}

fn runway_milestones(ctx: &EvalContext<'_>) -> Vec<FiMilestone> {
    RUNWAY_THRESHOLDS
        .iter()
        .map(|&(id, threshold)| {
            ctx.from_first_row(id, MilestoneKind::Runway, threshold, |row| {
                runway_years(row.net_worth, row.monthly_spend) >= threshold
            })
        })
        .collect()
}

fn coast_milestones(ctx: &EvalContext<'_>) -> Vec<FiMilestone> {
    let percent = solver::coast_fi_percent(
        ctx.now().net_worth,
        ctx.settings.monthly_spend,
        ctx.years_to_retirement,
        ctx.settings.current_rate,
        ctx.settings.inflation_rate,
        ctx.settings.swr,
    );

    COAST_THRESHOLDS
        .iter()
        .map(|&(id, threshold)| {
            ctx.from_now(id, MilestoneKind::Coast, threshold, percent >= threshold)
        })
        .collect()
}

fn special_milestones(ctx: &EvalContext<'_>, evaluated: &[FiMilestone]) -> Vec<FiMilestone> {
    let crossover = ctx.from_first_row("crossover", MilestoneKind::Special, 0.0, |row| {
        row.is_crossover
    });

    // The "stop saving today and still reach 100%" milestone reuses
    // the now-row's solver-produced coast year; achieved when that
    // year falls within the retirement horizon.
    let now = ctx.now();
    let coast_fi = match now.coast_fi_year {
        Some(year)
            if (year - ctx.current_year) as f64 <= ctx.years_to_retirement =>
        {
            FiMilestone {
                id: "coast_fi",
                kind: MilestoneKind::Special,
                target_value: 100.0,
                is_achieved: true,
                year: Some(year),
                age: now.coast_fi_age,
                net_worth_at_milestone: Some(now.net_worth),
            }
        }
        _ => FiMilestone {
            id: "coast_fi",
            kind: MilestoneKind::Special,
            target_value: 100.0,
            is_achieved: false,
            year: None,
            age: None,
            net_worth_at_milestone: None,
        },
    };

    // Flamingo FI is the 50% milestone by definition, copied rather
    // than recomputed.
    let flamingo = evaluated
        .iter()
        .find(|m| m.id == "fi_50")
        .map(|fi_50| FiMilestone {
            id: "flamingo_fi",
            kind: MilestoneKind::Special,
            target_value: 50.0,
            is_achieved: fi_50.is_achieved,
            year: fi_50.year,
            age: fi_50.age,
            net_worth_at_milestone: fi_50.net_worth_at_milestone,
        })
        .unwrap_or(FiMilestone {
            id: "flamingo_fi",
            kind: MilestoneKind::Special,
            target_value: 50.0,
            is_achieved: false,
            year: None,
            age: None,
            net_worth_at_milestone: None,
        });

    vec![crossover, coast_fi, flamingo]
}

fn retirement_income_milestones(ctx: &EvalContext<'_>) -> Vec<FiMilestone> {
    let settings = ctx.settings;
    RETIREMENT_INCOME_TARGETS
        .iter()
        .map(|&(id, target)| {
            ctx.from_first_row(id, MilestoneKind::RetirementIncome, target, |row| {
                projected_retirement_income(
                    row.net_worth,
                    row.years_from_entry,
                    settings.current_rate,
                    settings.inflation_rate,
                    settings.swr,
                ) >= target
            })
        })
        .collect()
}
