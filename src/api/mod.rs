use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    BalanceSnapshot, HouseholdState, SimulationParameters, SimulationResult, annual_payment,
    format_currency, net_income, parse_age, parse_amount, project, trace_balances,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidParameter(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidPayload(err.to_string())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::warn!("rejected request: {self}");
        error_response(self.status(), &self.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "lifeplan",
    about = "Household net-worth projection from today to age 100"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
    },
    /// Project a household snapshot read from a JSON file.
    Project(ProjectArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ProjectArgs {
    #[arg(long, help = "Path to a household state JSON file")]
    pub state: PathBuf,
    #[arg(long, default_value_t = 3.0, help = "Annual investment return in percent")]
    pub investment_rate: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual inflation in percent")]
    pub inflation_rate: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    #[arg(long, help = "Include per-tier balances for every year")]
    pub trace: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectRequest {
    state: HouseholdState,
    investment_rate: Option<f64>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AmortizeQuery {
    principal: Option<String>,
    term_years: Option<String>,
    rate_percent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NetIncomeQuery {
    gross: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AmortizeResponse {
    annual_payment: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NetIncomeResponse {
    net_income: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct ProjectOutput<'a> {
    #[serde(flatten)]
    result: &'a SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [BalanceSnapshot]>,
}

fn validate_rate(name: &str, value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value <= -100.0 {
        return Err(ApiError::InvalidParameter(format!(
            "{name} must be a finite percentage above -100"
        )));
    }
    Ok(value)
}

/// Missing rates fall back to the defaults of 3% growth and 1% inflation.
pub fn build_parameters(
    investment_rate: Option<f64>,
    inflation_rate: Option<f64>,
) -> Result<SimulationParameters, ApiError> {
    let defaults = SimulationParameters::default();
    Ok(SimulationParameters {
        investment_rate: validate_rate(
            "investment rate",
            investment_rate.unwrap_or(defaults.investment_rate),
        )?,
        inflation_rate: validate_rate(
            "inflation rate",
            inflation_rate.unwrap_or(defaults.inflation_rate),
        )?,
    })
}

fn project_request_from_json(
    json: &str,
) -> Result<(HouseholdState, SimulationParameters), ApiError> {
    let request = serde_json::from_str::<ProjectRequest>(json)?;
    let params = build_parameters(request.investment_rate, request.inflation_rate)?;
    Ok((request.state, params))
}

fn required_amount(name: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    raw.and_then(parse_amount)
        .ok_or_else(|| ApiError::InvalidParameter(format!("{name} must be a number")))
}

pub fn router() -> Router {
    Router::new()
        .route("/api/project", post(project_handler))
        .route("/api/amortize", get(amortize_handler))
        .route("/api/net-income", get(net_income_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> Result<(), ApiError> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("lifeplan HTTP API listening on http://{addr}");
    axum::serve(listener, router()).await?;
    Ok(())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_handler(body: String) -> Response {
    match project_request_from_json(&body) {
        Ok((state, params)) => {
            let result = project(&state, &params);
            log::debug!(
                "projected age {} to 100, depletion {:?}",
                result.current_age,
                result.depletion_age
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => err.into_response(),
    }
}

fn amortize(query: &AmortizeQuery) -> Result<f64, ApiError> {
    let principal = required_amount("principal", query.principal.as_deref())?;
    let term_years = query
        .term_years
        .as_deref()
        .and_then(parse_age)
        .ok_or_else(|| ApiError::InvalidParameter("termYears must be a whole number".into()))?;
    let rate = match query.rate_percent.as_deref() {
        Some(raw) => required_amount("ratePercent", Some(raw))?,
        None => 0.0,
    };
    Ok(annual_payment(principal, term_years, rate))
}

async fn amortize_handler(Query(query): Query<AmortizeQuery>) -> Response {
    match amortize(&query) {
        Ok(annual_payment) => json_response(StatusCode::OK, AmortizeResponse { annual_payment }),
        Err(err) => err.into_response(),
    }
}

async fn net_income_handler(Query(query): Query<NetIncomeQuery>) -> Response {
    match required_amount("gross", query.gross.as_deref()) {
        Ok(gross) => json_response(
            StatusCode::OK,
            NetIncomeResponse {
                net_income: net_income(gross),
            },
        ),
        Err(err) => err.into_response(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

/// Reads the state file, runs the projection and renders it in the requested format.
pub fn run_project_command(args: &ProjectArgs) -> Result<String, ApiError> {
    let params = build_parameters(Some(args.investment_rate), Some(args.inflation_rate))?;
    let raw = fs::read_to_string(&args.state)?;
    let state: HouseholdState = serde_json::from_str(&raw)?;

    let result = project(&state, &params);
    let trace = args.trace.then(|| trace_balances(&state, &params));
    log::debug!(
        "projected {} from age {}, depletion {:?}",
        args.state.display(),
        result.current_age,
        result.depletion_age
    );

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&ProjectOutput {
            result: &result,
            trace: trace.as_deref(),
        })?),
        OutputFormat::Table => Ok(render_table(&result, trace.as_deref())),
    }
}

fn render_table(result: &SimulationResult, trace: Option<&[BalanceSnapshot]>) -> String {
    let mut lines = Vec::with_capacity(result.yearly_data.len() + 6);
    lines.push(match trace {
        Some(_) => format!(
            "{:>4} {:>12} {:>12} {:>12} {:>12}  events",
            "age", "assets", "cash", "liquid", "locked"
        ),
        None => format!("{:>4} {:>12}  events", "age", "assets"),
    });

    for (idx, point) in result.yearly_data.iter().enumerate() {
        let marker = if point.is_retirement { "*" } else { " " };
        let events = point.events.join(", ");
        let row = match trace.and_then(|rows| rows.get(idx)) {
            Some(snapshot) => format!(
                "{:>4} {:>12} {:>12} {:>12} {:>12} {marker}{events}",
                point.age,
                format_currency(point.assets as f64),
                format_currency(snapshot.cash),
                format_currency(snapshot.liquid),
                format_currency(snapshot.locked),
            ),
            None => format!(
                "{:>4} {:>12} {marker}{events}",
                point.age,
                format_currency(point.assets as f64)
            ),
        };
        lines.push(row.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(format!(
        "Assets at retirement ({}): {}",
        result.retirement_age,
        format_currency(result.assets_at_retirement as f64)
    ));
    lines.push(format!(
        "Assets at 80: {}",
        format_currency(result.assets_at_80 as f64)
    ));
    lines.push(format!("Monthly balance: {:.1}", result.monthly_balance));
    lines.push(match result.depletion_age {
        Some(age) => format!("Assets run out at: {age}"),
        None => "Assets run out at: never".to_string(),
    });
    lines.join("\n")
}

/// Runs one CLI invocation to completion.
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    match cli.command {
        Command::Serve { port, bind } => run_http_server(SocketAddr::new(bind, port)).await,
        Command::Project(args) => {
            println!("{}", run_project_command(&args)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;
    use std::path::Path;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn baseline_request() -> &'static str {
        r#"{
            "state": {
                "age": "30",
                "retirementAge": 65,
                "cash": 100,
                "investments": "50",
                "grossIncome": 500,
                "monthlyExpenses": 18,
                "monthlyContribution": "3"
            },
            "investmentRate": 3.0,
            "inflationRate": 1.0
        }"#
    }

    fn sample_args(path: &Path, format: OutputFormat, trace: bool) -> ProjectArgs {
        ProjectArgs {
            state: path.to_path_buf(),
            investment_rate: 3.0,
            inflation_rate: 1.0,
            format,
            trace,
        }
    }

    fn write_state_file(name: &str) -> PathBuf {
        let file_name = format!("lifeplan-{}-{name}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let body: Value = serde_json::from_str(baseline_request()).expect("valid json");
        fs::write(&path, body["state"].to_string()).expect("write state file");
        path
    }

    #[test]
    fn build_parameters_defaults_missing_rates() {
        let params = build_parameters(None, None).expect("valid parameters");
        assert_eq!(params, SimulationParameters::default());
        let params = build_parameters(Some(5.0), None).expect("valid parameters");
        assert_approx(params.investment_rate, 5.0);
        assert_approx(params.inflation_rate, 1.0);
    }

    #[test]
    fn build_parameters_rejects_bad_rates() {
        let err = build_parameters(Some(-100.0), None).expect_err("must reject -100%");
        assert!(err.to_string().contains("investment rate"));
        let err = build_parameters(None, Some(f64::NAN)).expect_err("must reject NaN");
        assert!(err.to_string().contains("inflation rate"));
    }

    #[test]
    fn request_parses_lenient_state() {
        let (state, params) =
            project_request_from_json(baseline_request()).expect("valid request");
        assert_eq!(state.age, Some(30));
        assert_approx(state.investments, 50.0);
        assert_approx(state.monthly_contribution, 3.0);
        assert_eq!(params, SimulationParameters::default());
    }

    #[test]
    fn request_rejects_non_object_body() {
        let err = project_request_from_json("\"not an object\"")
            .expect_err("must reject non-object body");
        assert!(matches!(err, ApiError::InvalidPayload(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_request_projects_defaults() {
        let (state, params) = project_request_from_json("{}").expect("valid request");
        let result = project(&state, &params);
        assert_eq!(result.current_age, 30);
        assert_eq!(result.yearly_data.len(), 71);
        assert_eq!(result.yearly_data[0].assets, 0);
    }

    #[test]
    fn result_serializes_camel_case() {
        let (state, params) =
            project_request_from_json(baseline_request()).expect("valid request");
        let json = serde_json::to_value(project(&state, &params)).expect("serializable");
        assert_eq!(json["assetsAtRetirement"], 8899);
        assert_eq!(json["assetsAt80"], 5218);
        assert_eq!(json["depletionAge"], 98);
        assert_eq!(json["yearlyData"][0]["isRetirement"], false);
        assert_eq!(json["yearlyData"][35]["events"][0], "Retirement");
    }

    #[test]
    fn table_lists_every_year_and_summary() {
        let path = write_state_file("table");
        let output = run_project_command(&sample_args(&path, OutputFormat::Table, false))
            .expect("projection output");
        let _ = fs::remove_file(&path);

        assert!(output.lines().any(|line| line.trim_start().starts_with("30")
            && line.contains("150")));
        assert!(output.contains("*Retirement"));
        assert!(output.contains("Assets at retirement (65): 8,899"));
        assert!(output.contains("Assets at 80: 5,218"));
        assert!(output.contains("Monthly balance: 15.3"));
        assert!(output.contains("Assets run out at: 98"));
    }

    #[test]
    fn json_output_includes_trace_when_asked() {
        let path = write_state_file("json");
        let output = run_project_command(&sample_args(&path, OutputFormat::Json, true))
            .expect("projection output");
        let _ = fs::remove_file(&path);

        let json: Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(json["currentAge"], 30);
        let trace = json["trace"].as_array().expect("trace rows");
        assert_eq!(trace.len(), 71);
        assert_approx(trace[0]["total"].as_f64().expect("number"), 150.0);
    }

    #[test]
    fn missing_state_file_is_an_io_error() {
        let path = std::env::temp_dir().join("lifeplan-does-not-exist.json");
        let err = run_project_command(&sample_args(&path, OutputFormat::Json, false))
            .expect_err("must fail on missing file");
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[tokio::test]
    async fn project_handler_returns_result_json() {
        let response = project_handler(baseline_request().to_string()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
        let json = body_json(response).await;
        assert_eq!(json["retirementAge"], 65);
        assert_eq!(json["monthlyBalance"], 15.3);
    }

    #[tokio::test]
    async fn project_handler_rejects_bad_rate() {
        let response = project_handler(r#"{"investmentRate": -250}"#.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .expect("error message")
                .contains("investment rate")
        );
    }

    #[tokio::test]
    async fn amortize_handler_computes_payment() {
        let response = amortize_handler(Query(AmortizeQuery {
            principal: Some("2400".into()),
            term_years: Some("35".into()),
            rate_percent: Some("0".into()),
        }))
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_approx(json["annualPayment"].as_f64().expect("number"), 2400.0 / 35.0);
    }

    #[tokio::test]
    async fn amortize_handler_requires_principal() {
        let response = amortize_handler(Query(AmortizeQuery {
            term_years: Some("35".into()),
            ..AmortizeQuery::default()
        }))
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "principal must be a number");
    }

    #[tokio::test]
    async fn net_income_handler_uses_bands() {
        let response = net_income_handler(Query(NetIncomeQuery {
            gross: Some("800".into()),
        }))
        .await;
        let json = body_json(response).await;
        assert_approx(json["netIncome"].as_f64().expect("number"), 600.0);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Not found");
    }
}
