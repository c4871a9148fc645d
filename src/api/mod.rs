use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{
    ImpactScheme, ImpactStats, RateBasis, ScenarioHorizons, SimulationError, SimulationResult,
    SimulatorConfig, calculate_time_horizons, get_impact_stats, simulate_scenarios,
};

/// Largest capital the simulator accepts.
pub const MAX_CAPITAL: f64 = 999_999_999.0;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API JSON payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("capital is required")]
    MissingCapital,
    #[error("capital must be a valid amount")]
    InvalidCapital,
    #[error("capital cannot be negative")]
    NegativeCapital,
    #[error("capital must be greater than 0")]
    ZeroCapital,
    #[error("capital cannot exceed {max}")]
    CapitalTooLarge { max: f64 },
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
enum ApiVariant {
    #[serde(rename = "annual-36", alias = "annual", alias = "annual36")]
    Annual36,
    #[serde(rename = "monthly-14", alias = "monthly", alias = "monthly14")]
    Monthly14,
}

impl From<ApiVariant> for SimulatorConfig {
    fn from(value: ApiVariant) -> Self {
        match value {
            ApiVariant::Annual36 => SimulatorConfig::annual_36_months(),
            ApiVariant::Monthly14 => SimulatorConfig::monthly_14_months(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiImpactScheme {
    #[serde(alias = "threeCategory", alias = "three_category", alias = "three")]
    ThreeCategory,
    #[serde(alias = "fourCategory", alias = "four_category", alias = "four")]
    FourCategory,
}

impl From<ApiImpactScheme> for ImpactScheme {
    fn from(value: ApiImpactScheme) -> Self {
        match value {
            ApiImpactScheme::ThreeCategory => ImpactScheme::three_category(),
            ApiImpactScheme::FourCategory => ImpactScheme::four_category(),
        }
    }
}

/// Capital as typed by the user, or already numeric.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CapitalInput {
    Amount(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    capital: Option<CapitalInput>,
    variant: Option<ApiVariant>,
    impact_scheme: Option<ApiImpactScheme>,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub capital: f64,
    pub config: SimulatorConfig,
    pub impact_scheme: ImpactScheme,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateResponse {
    pub capital: f64,
    pub rate_basis: RateBasis,
    pub horizon_months: u32,
    pub simulation: SimulationResult,
    pub horizons: Vec<ScenarioHorizons>,
    pub impact: ImpactStats,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Parses a French-style amount such as `"1 234,56"`.
///
/// Whitespace (including no-break spaces used as thousands separators) is dropped and the first
/// comma becomes the decimal point. The longest leading number is kept; anything unparseable
/// yields `0.0`.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.replacen(',', ".", 1);
    let end = numeric_prefix_len(&cleaned);
    cleaned[..end].parse::<f64>().unwrap_or(0.0)
}

fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    end
}

pub fn validate_capital(amount: f64) -> Result<f64, ApiError> {
    if !amount.is_finite() {
        return Err(ApiError::InvalidCapital);
    }
    if amount < 0.0 {
        return Err(ApiError::NegativeCapital);
    }
    if amount == 0.0 {
        return Err(ApiError::ZeroCapital);
    }
    if amount > MAX_CAPITAL {
        return Err(ApiError::CapitalTooLarge { max: MAX_CAPITAL });
    }
    Ok(amount)
}

pub fn api_request_from_json(json: &str) -> Result<ApiRequest, ApiError> {
    let payload = serde_json::from_str::<SimulatePayload>(json)?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, ApiError> {
    let capital = match payload.capital {
        None => return Err(ApiError::MissingCapital),
        Some(CapitalInput::Text(text)) if text.trim().is_empty() => {
            return Err(ApiError::MissingCapital);
        }
        Some(CapitalInput::Text(text)) => parse_amount(&text),
        Some(CapitalInput::Amount(amount)) => amount,
    };

    Ok(ApiRequest {
        capital: validate_capital(capital)?,
        config: payload.variant.map(Into::into).unwrap_or_default(),
        impact_scheme: payload.impact_scheme.map(Into::into).unwrap_or_default(),
    })
}

pub fn build_simulate_response(request: &ApiRequest) -> Result<SimulateResponse, ApiError> {
    let simulation = simulate_scenarios(&request.config, request.capital)?;
    let horizons = calculate_time_horizons(&request.config, request.capital)?;
    let impact = get_impact_stats(&request.impact_scheme, request.capital)?;

    debug!(
        capital = request.capital,
        final_amount = simulation.final_amount,
        total_beneficiaries = impact.total_beneficiaries,
        "built simulate response"
    );

    Ok(SimulateResponse {
        capital: request.capital,
        rate_basis: request.config.rate_basis,
        horizon_months: request.config.horizon_months,
        simulation,
        horizons,
        impact,
    })
}

/// Full JSON round trip for a UI host. Both arms carry a JSON body; the error arm is
/// `{"error": "..."}`.
pub fn simulate_json(payload: &str) -> Result<String, String> {
    match api_request_from_json(payload).and_then(|request| build_simulate_response(&request)) {
        Ok(response) => serde_json::to_string(&response).map_err(|e| error_body(&e.to_string())),
        Err(err) => {
            warn!(error = %err, "rejected simulate request");
            Err(error_body(&err.to_string()))
        }
    }
}

fn error_body(msg: &str) -> String {
    let body = ErrorResponse {
        error: msg.to_string(),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ImpactKind, ScenarioKey};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn parse_amount_handles_french_formats() {
        assert_approx(parse_amount("1 234,56"), 1234.56);
        assert_approx(parse_amount("1234.56"), 1234.56);
        assert_approx(parse_amount("1 000"), 1000.0);
        assert_approx(parse_amount("0"), 0.0);
        assert_approx(parse_amount("1\u{202f}234\u{a0}567,5"), 1_234_567.5);
    }

    #[test]
    fn parse_amount_keeps_leading_number_only() {
        assert_approx(parse_amount("12abc"), 12.0);
        assert_approx(parse_amount("5."), 5.0);
        assert_approx(parse_amount(",5"), 0.5);
        assert_approx(parse_amount("2e3€"), 2000.0);
        assert_approx(parse_amount("7e"), 7.0);
        assert_approx(parse_amount("-40"), -40.0);
    }

    #[test]
    fn parse_amount_returns_zero_for_garbage() {
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
    }

    #[test]
    fn validate_capital_enforces_bounds() {
        assert!(matches!(validate_capital(-1.0), Err(ApiError::NegativeCapital)));
        assert!(matches!(validate_capital(0.0), Err(ApiError::ZeroCapital)));
        assert!(matches!(validate_capital(f64::NAN), Err(ApiError::InvalidCapital)));
        assert!(matches!(
            validate_capital(1_000_000_000.0),
            Err(ApiError::CapitalTooLarge { .. })
        ));
        assert_approx(validate_capital(MAX_CAPITAL).expect("upper bound allowed"), MAX_CAPITAL);
        assert_approx(validate_capital(0.01).expect("one cent allowed"), 0.01);
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "capital": "10 000,50",
          "variant": "monthly",
          "impactScheme": "three-category"
        }"#;
        let request = api_request_from_json(json).expect("json should parse");

        assert_approx(request.capital, 10_000.5);
        assert_eq!(request.config, SimulatorConfig::monthly_14_months());
        assert_eq!(request.impact_scheme, ImpactScheme::three_category());
    }

    #[test]
    fn api_request_from_json_defaults_to_annual_and_four_categories() {
        let request = api_request_from_json(r#"{"capital": 2500}"#).expect("json should parse");
        assert_approx(request.capital, 2500.0);
        assert_eq!(request.config, SimulatorConfig::annual_36_months());
        assert_eq!(request.impact_scheme, ImpactScheme::four_category());
    }

    #[test]
    fn api_request_from_json_accepts_aliases() {
        let request =
            api_request_from_json(r#"{"capital": 1, "variant": "monthly14", "impactScheme": "four"}"#)
                .expect("aliases should parse");
        assert_eq!(request.config.horizon_months, 14);
        assert_eq!(request.impact_scheme.rules.len(), 4);
    }

    #[test]
    fn api_request_from_json_rejects_missing_or_blank_capital() {
        assert!(matches!(api_request_from_json("{}"), Err(ApiError::MissingCapital)));
        assert!(matches!(
            api_request_from_json(r#"{"capital": "   "}"#),
            Err(ApiError::MissingCapital)
        ));
    }

    #[test]
    fn api_request_from_json_rejects_unparseable_capital_as_zero() {
        assert!(matches!(
            api_request_from_json(r#"{"capital": "abc"}"#),
            Err(ApiError::ZeroCapital)
        ));
        assert!(matches!(
            api_request_from_json(r#"{"capital": "-500"}"#),
            Err(ApiError::NegativeCapital)
        ));
    }

    #[test]
    fn api_request_from_json_rejects_unknown_variant() {
        let err = api_request_from_json(r#"{"capital": 100, "variant": "weekly"}"#)
            .expect_err("must reject unknown variant");
        assert!(err.to_string().contains("Invalid API JSON payload"));
    }

    #[test]
    fn build_simulate_response_combines_all_outputs() {
        let request = api_request_from_json(r#"{"capital": 10000}"#).expect("json should parse");
        let response = build_simulate_response(&request).expect("valid request");

        assert_eq!(response.rate_basis, RateBasis::Annual);
        assert_eq!(response.horizon_months, 36);
        assert_eq!(response.simulation.series.len(), 37);
        assert_approx_tol(response.simulation.final_amount, 12_597.12, 0.01);
        assert_eq!(response.horizons.len(), 3);
        assert_eq!(response.horizons[0].key, ScenarioKey::Pessimistic);
        assert_eq!(response.impact.total_beneficiaries, 3);
        assert_eq!(response.impact.primary_impact.kind, ImpactKind::Housing);
    }

    #[test]
    fn simulate_response_serialization_contains_expected_fields() {
        let request = api_request_from_json(r#"{"capital": 10000, "variant": "monthly-14"}"#)
            .expect("json should parse");
        let response = build_simulate_response(&request).expect("valid request");
        let json = serde_json::to_string(&response).expect("response should serialize");

        for field in [
            "\"capital\"",
            "\"rateBasis\":\"monthly\"",
            "\"horizonMonths\":14",
            "\"simulation\"",
            "\"finalAmount\"",
            "\"totalInterest\"",
            "\"series\"",
            "\"month\":0",
            "\"pessimistic\"",
            "\"normal\"",
            "\"optimistic\"",
            "\"horizons\"",
            "\"displayName\":\"Balanced\"",
            "\"gainPercentage\"",
            "\"annualizedEquivalent\"",
            "\"liquid\":true",
            "\"impact\"",
            "\"totalBeneficiaries\"",
            "\"allImpacts\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }

    #[test]
    fn simulate_json_round_trip() {
        let body = simulate_json(r#"{"capital": "10 000"}"#).expect("valid request");
        let value: serde_json::Value = serde_json::from_str(&body).expect("body is JSON");
        assert_eq!(value["simulation"]["series"].as_array().map(Vec::len), Some(37));
        assert_eq!(value["simulation"]["series"][0]["normal"], 10_000.0);
        assert_eq!(value["impact"]["treesPlanted"], 2_000);
    }

    #[test]
    fn simulate_json_reports_errors_as_json() {
        let body = simulate_json(r#"{"capital": -10}"#).expect_err("negative capital");
        let value: serde_json::Value = serde_json::from_str(&body).expect("body is JSON");
        assert_eq!(value["error"], "capital cannot be negative");

        let body = simulate_json("not json").expect_err("bad payload");
        assert!(body.contains("Invalid API JSON payload"));
    }

    #[test]
    fn simulate_json_is_idempotent() {
        let payload = r#"{"capital": 4321.09, "variant": "annual"}"#;
        assert_eq!(simulate_json(payload), simulate_json(payload));
    }
}
