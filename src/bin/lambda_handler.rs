//! AWS Lambda handler for running household forecasts
//!
//! Accepts an API Gateway proxy request whose body carries investors and
//! properties in their stored form (whole-number percentage rates) and
//! returns the yearly forecasts with a summary.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use property_forecast::{
    contract::{portfolio_from_stored, StoredInvestor, StoredProperty},
    projection::ForecastSummary,
    Assumptions, ForecastConfig, ForecastEngine, ForecastError, YearlyForecast,
};

/// Input for one forecast
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub investors: Vec<StoredInvestor>,

    #[serde(default)]
    pub properties: Vec<StoredProperty>,

    /// Number of years to forecast (default: 30)
    #[serde(default = "default_years")]
    pub years: u32,

    /// Reject properties whose splits do not sum to 100
    #[serde(default)]
    pub strict_splits: bool,
}

fn default_years() -> u32 { 30 }

/// Output from the forecast
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub years: u32,
    pub summary: ForecastSummary,
    pub forecasts: Vec<YearlyForecast>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn response(status: i64, body: String) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(body)),
        is_base64_encoded: false,
        ..Default::default()
    }
}

fn error_response(status: i64, message: String) -> Result<ApiGatewayProxyResponse, Error> {
    let body = serde_json::to_string(&ErrorBody { error: message })?;
    Ok(response(status, body))
}

/// Parse, validate and run one request
fn run_forecast(body: &str) -> Result<ForecastResponse, ForecastError> {
    let start = std::time::Instant::now();

    let request: ForecastRequest = serde_json::from_str(body)?;
    let portfolio = portfolio_from_stored(request.investors, request.properties)?;

    let config = ForecastConfig {
        years: request.years,
        enforce_split_totals: request.strict_splits,
    };
    let result = ForecastEngine::new(Assumptions::default_model(), config).project(&portfolio)?;

    Ok(ForecastResponse {
        years: request.years,
        summary: result.summary(),
        forecasts: result.into_forecasts(),
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ApiGatewayProxyRequest>) -> Result<ApiGatewayProxyResponse, Error> {
    let body = event.payload.body.unwrap_or_else(|| "{}".to_string());

    match run_forecast(&body) {
        Ok(forecast) => Ok(response(200, serde_json::to_string(&forecast)?)),
        Err(ForecastError::Json(e)) => error_response(400, format!("Invalid JSON: {}", e)),
        Err(e) => {
            log::warn!("Rejected forecast request: {}", e);
            error_response(400, e.to_string())
        }
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

    const REQUEST: &str = r#"{
        "years": 3,
        "investors": [{"name": "Test", "base_income": 100000, "annual_growth_rate": 2}],
        "properties": [{"name": "P", "purchase_year": 1, "loan_amount": 500000,
                        "rent": 25000, "interest_rate": 4, "other_expenses": 4000,
                        "growth_rate": 2,
                        "investor_splits": [{"investor_name": "Test", "percentage": 100}]}]
    }"#;

    #[test]
    fn test_run_forecast_from_stored_request() {
        let response = run_forecast(REQUEST).unwrap();

        assert_eq!(response.forecasts.len(), 3);
        assert_eq!(response.summary.total_years, 3);
        assert_eq!(response.forecasts[0].property_lvrs["P"], 100.0);
        assert_eq!(response.forecasts[0].net_incomes["Test"], 78_212.0);
    }

    #[test]
    fn test_missing_purchase_year_is_reported() {
        let body = REQUEST.replace(r#""purchase_year": 1, "#, "");
        let err = run_forecast(&body).unwrap_err();

        assert_eq!(err.to_string(), "property 'P' is missing required field 'purchase_year'");
    }
}
