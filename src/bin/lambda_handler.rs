//! AWS Lambda handler for running scenario projections
//!
//! Accepts a portfolio snapshot and stored factor rows as JSON and returns the
//! monthly projection with summary metrics, optionally compared against the
//! no-factor baseline.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use cashflow_scenarios::{
    report::period_label, PortfolioState, ProjectionConfig, ProjectionResult, Scenario,
    ScenarioComparison, ScenarioError, ScenarioFactor, ScenarioRunner,
};
use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input for one projection
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRequest {
    pub portfolio: PortfolioState,

    /// Stored factor rows (`factorType`, `config`, `startMonth`, `durationMonths`)
    #[serde(default)]
    pub factors: Vec<ScenarioFactor>,

    /// Months to project (default: PROJECTION_MONTHS env var, else 60)
    #[serde(default = "default_time_horizon")]
    pub time_horizon_months: u32,

    #[serde(default = "default_scenario_name")]
    pub scenario_name: String,

    /// Also run the baseline and return deltas
    #[serde(default)]
    pub compare_baseline: bool,

    /// Compute months in parallel
    #[serde(default)]
    pub parallel: bool,

    /// Calendar date of month 0, for period labels
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_time_horizon() -> u32 {
    std::env::var("PROJECTION_MONTHS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| ProjectionConfig::default().time_horizon_months)
}

fn default_scenario_name() -> String {
    "scenario".to_string()
}

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub scenario_name: String,
    pub time_horizon_months: u32,
    pub result: ProjectionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScenarioComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<String>>,
    pub execution_time_ms: u64,
}

/// Function URL response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionUrlResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn error_response(status: u16, message: &str) -> FunctionUrlResponse {
    FunctionUrlResponse {
        status_code: status,
        headers: cors_headers(),
        body: serde_json::json!({ "error": message }).to_string(),
    }
}

fn json_response(body: &ProjectionResponse) -> FunctionUrlResponse {
    match serde_json::to_string(body) {
        Ok(body) => FunctionUrlResponse {
            status_code: 200,
            headers: cors_headers(),
            body,
        },
        Err(e) => error_response(500, &format!("Failed to encode response: {}", e)),
    }
}

/// Run the projection described by a decoded request
fn respond(request: ProjectionRequest, start: std::time::Instant) -> Result<ProjectionResponse, ScenarioError> {
    let config = ProjectionConfig {
        time_horizon_months: request.time_horizon_months,
        parallel: request.parallel,
    };
    let scenario = Scenario::new(request.scenario_name, request.time_horizon_months, request.factors);
    let runner = ScenarioRunner::with_config(request.portfolio, &config);

    let result = runner.run(&scenario)?;
    let comparison = if request.compare_baseline {
        let baseline = runner.baseline(scenario.time_horizon_months)?;
        Some(ScenarioComparison::new(
            scenario.name.clone(),
            baseline.summary_metrics,
            result.summary_metrics.clone(),
        ))
    } else {
        None
    };

    let periods: Option<Vec<String>> = request.start_date.map(|date| {
        result
            .monthly_results
            .iter()
            .map(|m| period_label(Some(date), m.month))
            .collect()
    });

    Ok(ProjectionResponse {
        scenario_name: scenario.name,
        time_horizon_months: scenario.time_horizon_months,
        result,
        comparison,
        periods,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<FunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let payload = event.payload;

    // Handle CORS preflight
    if payload.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(FunctionUrlResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        });
    }

    if payload.is_base64_encoded {
        return Ok(error_response(415, "Binary request bodies are not supported"));
    }

    let body = payload.body.unwrap_or_else(|| "{}".to_string());
    let request: ProjectionRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    log::info!(
        "Projecting '{}': {} properties, {} loans, {} factors, {} months",
        request.scenario_name,
        request.portfolio.properties.len(),
        request.portfolio.loans.len(),
        request.factors.len(),
        request.time_horizon_months,
    );

    match respond(request, start) {
        Ok(response) => Ok(json_response(&response)),
        Err(e) => Ok(error_response(400, &e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> ProjectionRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request(r#"{"portfolio": {"properties": [], "loans": []}, "timeHorizonMonths": 6}"#);
        assert_eq!(req.time_horizon_months, 6);
        assert!(req.factors.is_empty());
        assert!(!req.compare_baseline);
        assert_eq!(req.scenario_name, "scenario");
    }

    #[test]
    fn test_respond_with_comparison_and_periods() {
        let req = request(
            r#"{
                "portfolio": {
                    "properties": [{"id": "p1", "monthlyRent": 2000, "monthlyExpenses": 200}],
                    "loans": []
                },
                "factors": [
                    {"factorType": "vacancy", "config": {"propertyId": "p1", "months": 1}, "startMonth": 0}
                ],
                "timeHorizonMonths": 3,
                "compareBaseline": true,
                "startDate": "2026-12-01"
            }"#,
        );

        let response = respond(req, std::time::Instant::now()).unwrap();
        assert_eq!(response.result.monthly_results.len(), 3);
        assert_eq!(response.result.monthly_results[0].total_income, 0.0);

        let comparison = response.comparison.unwrap();
        assert_eq!(comparison.total_net_delta, -2000.0);

        let periods = response.periods.unwrap();
        assert_eq!(periods, vec!["2026-12", "2027-01", "2027-02"]);
    }

    #[test]
    fn test_zero_horizon_is_a_client_error() {
        let req = request(r#"{"portfolio": {}, "timeHorizonMonths": 0}"#);
        assert!(matches!(
            respond(req, std::time::Instant::now()),
            Err(ScenarioError::InvalidHorizon { .. })
        ));
    }
}
