use tracing::debug;

use super::config::SimulatorConfig;
use super::engine::{CompoundParams, compound};
use super::error::SimulationError;
use super::types::{HorizonResult, ScenarioHorizons};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Horizon rows for every scenario at every configured checkpoint.
pub fn calculate_time_horizons(
    config: &SimulatorConfig,
    principal: f64,
) -> Result<Vec<ScenarioHorizons>, SimulationError> {
    config.validate()?;

    let horizons = config
        .scenarios
        .iter()
        .map(|scenario| -> Result<ScenarioHorizons, SimulationError> {
            let (annual_rate, frequency) = config.compounding_terms(scenario);
            let annualized_equivalent = config.annualized_rate(scenario);

            let results = config
                .checkpoints
                .iter()
                .map(|&months| -> Result<HorizonResult, SimulationError> {
                    let years = f64::from(months) / MONTHS_PER_YEAR;
                    let params = CompoundParams::annual(principal, annual_rate, years)
                        .with_frequency(frequency);
                    let final_amount = compound(params)?;
                    let gain_absolute = final_amount - principal;
                    Ok(HorizonResult {
                        months,
                        years,
                        final_amount,
                        gain_absolute,
                        gain_percentage: gain_percentage(gain_absolute, principal),
                        period_rate: scenario.rate,
                        annualized_equivalent,
                        liquid: config.liquid_at_checkpoints,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ScenarioHorizons {
                key: scenario.key,
                display_name: scenario.display_name.clone(),
                rate: scenario.rate,
                rate_basis: config.rate_basis,
                results,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        principal,
        checkpoints = config.checkpoints.len(),
        "calculated time horizons"
    );

    Ok(horizons)
}

fn gain_percentage(gain: f64, principal: f64) -> f64 {
    if principal > 0.0 {
        gain / principal * 100.0
    } else {
        0.0
    }
}
