use axum::{
    Router,
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    FiMilestonesInfo, NetWorthEntry, ProjectionRow, RealTimeValue, UserSettings, anchor_entry,
    fi_milestones, generate_projections, real_time_value,
};

/// Settings surface with defaults and flag-style names; the API payload
/// overlays onto this before validation, so both surfaces share one
/// set of defaults.
#[derive(Parser, Debug)]
#[command(
    name = "fitrack",
    about = "Net-worth projection and FI milestone engine"
)]
struct Cli {
    #[arg(long, default_value_t = 7.0, help = "Expected annual return in percent, e.g. 7")]
    current_rate: f64,
    #[arg(long, default_value_t = 4.0, help = "Safe withdrawal rate in percent")]
    swr: f64,
    #[arg(long, default_value_t = 0.0, help = "Yearly contribution in currency")]
    yearly_contribution: f64,
    #[arg(long, help = "Birth date (YYYY-MM-DD), used for age columns")]
    birth_date: Option<NaiveDate>,
    #[arg(long, default_value_t = 0.0, help = "Actual monthly spending in currency")]
    monthly_spend: f64,
    #[arg(long, default_value_t = 3.0, help = "Annual inflation rate in percent")]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly budget floor for level-based spending"
    )]
    base_monthly_budget: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Percent of net worth added to the monthly budget under level-based spending"
    )]
    spending_growth_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionsPayload {
    current_rate: Option<f64>,
    swr: Option<f64>,
    yearly_contribution: Option<f64>,
    birth_date: Option<NaiveDate>,
    monthly_spend: Option<f64>,
    inflation_rate: Option<f64>,
    base_monthly_budget: Option<f64>,
    spending_growth_rate: Option<f64>,

    entries: Vec<NetWorthEntry>,

    apply_inflation: Option<bool>,
    use_spending_levels: Option<bool>,
    include_contributions: Option<bool>,
    /// Evaluation instant override; defaults to the server clock.
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct ApiRequest {
    settings: UserSettings,
    entries: Vec<NetWorthEntry>,
    apply_inflation: bool,
    use_spending_levels: bool,
    include_contributions: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionsResponse {
    current: RealTimeValue,
    projections: Vec<ProjectionRow>,
    milestones: FiMilestonesInfo,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_rate: 7.0,
        swr: 4.0,
        yearly_contribution: 0.0,
        birth_date: None,
        monthly_spend: 0.0,
        inflation_rate: 3.0,
        base_monthly_budget: 0.0,
        spending_growth_rate: 0.0,
    }
}

fn build_settings(cli: Cli) -> Result<UserSettings, String> {
    if !cli.current_rate.is_finite() || cli.current_rate < 0.0 {
        return Err("--current-rate must be >= 0".to_string());
    }
    if !(0.0..=100.0).contains(&cli.swr) {
        return Err("--swr must be between 0 and 100".to_string());
    }
    if !cli.yearly_contribution.is_finite() || cli.yearly_contribution < 0.0 {
        return Err("--yearly-contribution must be >= 0".to_string());
    }
    if !cli.monthly_spend.is_finite() || cli.monthly_spend < 0.0 {
        return Err("--monthly-spend must be >= 0".to_string());
    }
    if !(0.0..=100.0).contains(&cli.inflation_rate) {
        return Err("--inflation-rate must be between 0 and 100".to_string());
    }
    if !cli.base_monthly_budget.is_finite() || cli.base_monthly_budget < 0.0 {
        return Err("--base-monthly-budget must be >= 0".to_string());
    }
    if !(0.0..=100.0).contains(&cli.spending_growth_rate) {
        return Err("--spending-growth-rate must be between 0 and 100".to_string());
    }

    Ok(UserSettings {
        current_rate: cli.current_rate,
        swr: cli.swr,
        yearly_contribution: cli.yearly_contribution,
        birth_date: cli.birth_date,
        monthly_spend: cli.monthly_spend,
        inflation_rate: cli.inflation_rate,
        base_monthly_budget: cli.base_monthly_budget,
        spending_growth_rate: cli.spending_growth_rate,
    })
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectionsPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectionsPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_rate {
        cli.current_rate = v;
    }
    if let Some(v) = payload.swr {
        cli.swr = v;
    }
    if let Some(v) = payload.yearly_contribution {
        cli.yearly_contribution = v;
    }
    if let Some(v) = payload.birth_date {
        cli.birth_date = Some(v);
    }
    if let Some(v) = payload.monthly_spend {
        cli.monthly_spend = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.base_monthly_budget {
        cli.base_monthly_budget = v;
    }
    if let Some(v) = payload.spending_growth_rate {
        cli.spending_growth_rate = v;
    }

    let settings = build_settings(cli)?;

    if payload.entries.is_empty() {
        return Err("at least one net-worth entry is required".to_string());
    }
    for entry in &payload.entries {
        if !entry.amount.is_finite() || entry.amount <= 0.0 {
            return Err(format!("entry {} must have a positive amount", entry.id));
        }
    }

    Ok(ApiRequest {
        settings,
        entries: payload.entries,
        apply_inflation: payload.apply_inflation.unwrap_or(false),
        use_spending_levels: payload.use_spending_levels.unwrap_or(false),
        include_contributions: payload.include_contributions.unwrap_or(false),
        now: payload.now,
    })
}

fn evaluate_request(request: &ApiRequest, now: DateTime<Utc>) -> Result<ProjectionsResponse, String> {
    let anchor = anchor_entry(&request.entries)
        .ok_or_else(|| "at least one net-worth entry is required".to_string())?;

    let current = real_time_value(
        anchor,
        &request.settings,
        now,
        request.include_contributions,
    );
    let projections = generate_projections(
        anchor,
        current.total,
        current.appreciation,
        &request.settings,
        now,
        request.apply_inflation,
        request.use_spending_levels,
    );
    let birth_year = request.settings.birth_date.map(|date| date.year());
    let milestones = fi_milestones(&projections, &request.settings, birth_year);

    Ok(ProjectionsResponse {
        current,
        projections,
        milestones,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/projections", post(projections_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "fitrack HTTP API listening");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projections_handler(Json(payload): Json<ProjectionsPayload>) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let now = request.now.unwrap_or_else(Utc::now);
    match evaluate_request(&request, now) {
        Ok(response) => {
            tracing::debug!(
                entries = request.entries.len(),
                rows = response.projections.len(),
                achieved = response
                    .milestones
                    .milestones
                    .iter()
                    .filter(|m| m.is_achieved)
                    .count(),
                "evaluated projection request"
            );
            json_response(StatusCode::OK, response)
        }
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn entry_json(id: u64, amount: f64, timestamp: &str) -> String {
        format!(r#"{{"id":{id},"amount":{amount},"timestamp":"{timestamp}"}}"#)
    }

    fn sample_json() -> String {
        format!(
            r#"{{
                "currentRate": 7,
                "swr": 4,
                "yearlyContribution": 12000,
                "birthDate": "1990-06-15",
                "monthlySpend": 4000,
                "inflationRate": 3,
                "now": "2026-07-01T00:00:00Z",
                "entries": [{}, {}]
            }}"#,
            entry_json(1, 100000.0, "2026-01-01T00:00:00Z"),
            entry_json(2, 80000.0, "2025-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn payload_overlays_onto_defaults() {
        let request = api_request_from_json(&sample_json()).expect("valid payload");
        assert_approx(request.settings.current_rate, 7.0);
        assert_approx(request.settings.monthly_spend, 4_000.0);
        assert_eq!(
            request.settings.birth_date,
            NaiveDate::from_ymd_opt(1990, 6, 15)
        );
        assert_eq!(request.entries.len(), 2);
        assert!(!request.apply_inflation);
        assert!(!request.use_spending_levels);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let json = format!(
            r#"{{"entries": [{}]}}"#,
            entry_json(1, 50000.0, "2026-01-01T00:00:00Z")
        );
        let request = api_request_from_json(&json).expect("valid payload");
        assert_approx(request.settings.current_rate, 7.0);
        assert_approx(request.settings.swr, 4.0);
        assert_approx(request.settings.inflation_rate, 3.0);
        assert_eq!(request.settings.birth_date, None);
    }

    #[test]
    fn rejects_empty_entries() {
        let err = api_request_from_json("{}").expect_err("must reject");
        assert!(err.contains("net-worth entry"));
    }

    #[test]
    fn rejects_non_positive_entry_amounts() {
        let json = format!(
            r#"{{"entries": [{}]}}"#,
            entry_json(7, 0.0, "2026-01-01T00:00:00Z")
        );
        let err = api_request_from_json(&json).expect_err("must reject");
        assert!(err.contains("entry 7"));
    }

    #[test]
    fn build_settings_rejects_out_of_range_values() {
        let mut cli = default_cli_for_api();
        cli.current_rate = -1.0;
        assert!(build_settings(cli).is_err());

        let mut cli = default_cli_for_api();
        cli.swr = 250.0;
        assert!(build_settings(cli).is_err());

        let mut cli = default_cli_for_api();
        cli.monthly_spend = f64::NAN;
        assert!(build_settings(cli).is_err());
    }

    #[test]
    fn evaluate_request_produces_full_report() {
        let request = api_request_from_json(&sample_json()).expect("valid payload");
        let now = request.now.expect("payload pins the clock");
        let response = evaluate_request(&request, now).expect("must evaluate");

        assert_eq!(response.projections.len(), 61);
        assert_eq!(response.milestones.milestones.len(), 43);

        // The newest entry is the anchor, not the larger or older one.
        assert_approx(response.current.amount, 100_000.0);
        assert!(response.current.total > 100_000.0);
        assert_approx(response.projections[0].net_worth, response.current.total);
    }

    #[test]
    fn response_serializes_now_row_sentinel_and_camel_case() {
        let request = api_request_from_json(&sample_json()).expect("valid payload");
        let now = request.now.expect("payload pins the clock");
        let response = evaluate_request(&request, now).expect("must evaluate");

        let value = serde_json::to_value(&response).expect("serializable");
        let rows = value["projections"].as_array().expect("rows array");
        assert_eq!(rows[0]["year"], serde_json::json!("now"));
        assert_eq!(rows[1]["year"], serde_json::json!(2027));
        assert!(rows[0].get("netWorth").is_some());
        assert!(rows[0].get("coastFiYear").is_some());
        assert!(value["milestones"].get("progressToNext").is_some());
    }

    #[test]
    fn clock_defaults_are_deterministic_under_fixed_now() {
        let request = api_request_from_json(&sample_json()).expect("valid payload");
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).single().unwrap();
        let a = evaluate_request(&request, now).expect("must evaluate");
        let b = evaluate_request(&request, now).expect("must evaluate");
        assert_approx(a.current.total, b.current.total);
        assert_eq!(
            a.projections.last().map(|r| r.net_worth),
            b.projections.last().map(|r| r.net_worth)
        );
    }
}
