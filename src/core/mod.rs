mod engine;
mod income;
mod inflation;
mod milestones;
mod solver;
mod types;

pub use engine::{
    MS_PER_YEAR, PROJECTION_YEARS, anchor_entry, generate_projections, real_time_value,
};
pub use income::{
    SwrAmounts, net_worth_for_retirement_income, projected_retirement_income, swr_amounts,
};
pub use inflation::{
    InflatedValue, inflated_spending, inflation_multiplier, nominal_to_real, real_to_nominal,
    verify_inflated_spending,
};
pub use milestones::{fi_milestones, runway_years};
pub use solver::{
    COAST_SEARCH_HORIZON_YEARS, coast_fi_percent, coast_fi_year, fi_target, first_year_reaching,
};
pub use types::{
    FiMilestone, FiMilestonesInfo, MilestoneKind, NetWorthEntry, ProjectionRow, RealTimeValue,
    RowYear, UserSettings,
};
