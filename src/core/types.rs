use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Assumptions a projection is evaluated under. Percentages are stored
/// as whole numbers (`7` means 7%); every formula divides by 100 at the
/// point of use, and a rate of exactly `0` disables the effect rather
/// than dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub current_rate: f64,
    pub swr: f64,
    pub yearly_contribution: f64,
    pub birth_date: Option<NaiveDate>,
    pub monthly_spend: f64,
    pub inflation_rate: f64,
    pub base_monthly_budget: f64,
    pub spending_growth_rate: f64,
}

/// A historical net-worth snapshot. The most recent entry by timestamp
/// is the anchor for all extrapolation; older entries are record only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthEntry {
    pub id: u64,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Row label: either the live "now" row or a future calendar year.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RowYear {
    Now,
    Year(i32),
}

impl RowYear {
    pub fn calendar_year(self, current_year: i32) -> i32 {
        match self {
            RowYear::Now => current_year,
            RowYear::Year(year) => year,
        }
    }
}

impl Serialize for RowYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowYear::Now => serializer.serialize_str("now"),
            RowYear::Year(year) => serializer.serialize_i32(*year),
        }
    }
}

/// One modeled year of the trajectory. `interest` and `contributed`
/// are cumulative since the anchor entry, never annual.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub year: RowYear,
    pub age: Option<i32>,
    pub years_from_entry: f64,
    pub net_worth: f64,
    pub interest: f64,
    pub contributed: f64,
    pub monthly_spend: f64,
    pub monthly_swr: f64,
    pub annual_swr: f64,
    pub fi_target: f64,
    pub fi_progress: f64,
    pub is_fi_year: bool,
    pub is_crossover: bool,
    pub swr_covers_spend: bool,
    pub coast_fi_year: Option<i32>,
    pub coast_fi_age: Option<i32>,
}

/// Live valuation of the anchor entry, linearly extrapolated to "now".
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeValue {
    pub amount: f64,
    pub appreciation: f64,
    pub contributed: f64,
    pub total: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Percentage,
    Lifestyle,
    Runway,
    Coast,
    Special,
    RetirementIncome,
}

/// One catalog milestone evaluated against a trajectory. `target_value`
/// semantics depend on the kind: percent of FI target, spend
/// multiplier, years of runway, coast-FI percent, or target annual
/// real income.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiMilestone {
    pub id: &'static str,
    pub kind: MilestoneKind,
    pub target_value: f64,
    pub is_achieved: bool,
    pub year: Option<i32>,
    pub age: Option<i32>,
    pub net_worth_at_milestone: Option<f64>,
}

/// Full milestone report for one trajectory: the evaluated catalog
/// (achieved entries first, catalog order within each group) plus
/// progress aggregates over the percentage category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiMilestonesInfo {
    pub milestones: Vec<FiMilestone>,
    pub current_milestone: Option<FiMilestone>,
    pub next_milestone: Option<FiMilestone>,
    pub progress_to_next: f64,
    pub amount_to_next: f64,
}

impl FiMilestonesInfo {
    pub fn empty() -> Self {
        Self {
            milestones: Vec::new(),
            current_milestone: None,
            next_milestone: None,
            progress_to_next: 0.0,
            amount_to_next: 0.0,
        }
    }
}
