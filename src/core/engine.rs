use tracing::debug;

use super::config::SimulatorConfig;
use super::error::SimulationError;
use super::types::{ScenarioKey, ScenarioValues, SeriesPoint, SimulationResult, TimeSeriesPoint};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundParams {
    pub principal: f64,
    /// Fractional, e.g. `0.08` for 8 %.
    pub annual_rate: f64,
    /// May be fractional; `month / 12` interpolates between compounding dates.
    pub years: f64,
    pub compounding_frequency: u32,
}

impl CompoundParams {
    /// Annual compounding.
    pub fn annual(principal: f64, annual_rate: f64, years: f64) -> Self {
        Self {
            principal,
            annual_rate,
            years,
            compounding_frequency: 1,
        }
    }

    pub fn with_frequency(self, compounding_frequency: u32) -> Self {
        Self {
            compounding_frequency,
            ..self
        }
    }
}

/// Rounds half away from zero to the nearest cent.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `principal * (1 + rate / n)^(n * years)`, rounded to the cent.
pub fn compound(params: CompoundParams) -> Result<f64, SimulationError> {
    let CompoundParams {
        principal,
        annual_rate,
        years,
        compounding_frequency,
    } = params;

    // `!(x >= 0.0)` also rejects NaN.
    if !(principal >= 0.0) {
        return Err(SimulationError::invalid("principal", principal));
    }
    if !(annual_rate >= 0.0) {
        return Err(SimulationError::invalid("annualRate", annual_rate));
    }
    if !(years >= 0.0) {
        return Err(SimulationError::invalid("years", years));
    }
    if compounding_frequency == 0 {
        return Err(SimulationError::invalid("compoundingFrequency", 0.0));
    }

    if principal == 0.0 {
        return Ok(0.0);
    }

    let amount = if years == 0.0 || annual_rate == 0.0 {
        principal
    } else {
        let n = f64::from(compounding_frequency);
        round_to_cents(principal * (1.0 + annual_rate / n).powf(n * years))
    };

    if !amount.is_finite() {
        return Err(SimulationError::ComputationOverflow {
            principal,
            annual_rate,
            years,
        });
    }

    Ok(amount)
}

/// Month-by-month values for `0..=total_periods`.
pub fn generate_series(
    principal: f64,
    annual_rate: f64,
    total_periods: u32,
    compounding_frequency: u32,
) -> Result<Vec<SeriesPoint>, SimulationError> {
    (0..=total_periods)
        .map(|period| {
            let years = f64::from(period) / MONTHS_PER_YEAR;
            let params = CompoundParams::annual(principal, annual_rate, years)
                .with_frequency(compounding_frequency);
            compound(params).map(|value| SeriesPoint { period, value })
        })
        .collect()
}

/// Runs every scenario over the configured horizon and merges the series.
pub fn simulate_scenarios(
    config: &SimulatorConfig,
    principal: f64,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;

    let mut series: Vec<TimeSeriesPoint> = (0..=config.horizon_months)
        .map(|month| TimeSeriesPoint {
            month,
            values: ScenarioValues::default(),
        })
        .collect();

    for scenario in &config.scenarios {
        let (annual_rate, frequency) = config.compounding_terms(scenario);
        let points = generate_series(principal, annual_rate, config.horizon_months, frequency)?;
        for (merged, point) in series.iter_mut().zip(points) {
            merged.values = merged.values.with(scenario.key, point.value);
        }
    }

    let final_amount = series
        .last()
        .map(|point| point.values.get(ScenarioKey::Normal))
        .unwrap_or(principal);
    let total_interest = final_amount - principal;

    debug!(
        principal,
        horizon_months = config.horizon_months,
        final_amount,
        total_interest,
        "simulated scenarios"
    );

    Ok(SimulationResult {
        final_amount,
        total_interest,
        series,
    })
}
