//! Fixed simulator parameters.
//!
//! Two presets exist: [`SimulatorConfig::annual_36_months`] (annual rates 5/8/10 %, checkpoints at
//! 12, 24 and 36 months) and [`SimulatorConfig::monthly_14_months`] (monthly rates 0.7/1/1.3 %, a
//! single liquid checkpoint at 14 months). Both run through the same engine; a monthly rate `m` is
//! compounded as an annual rate `12 * m` applied twelve times a year, i.e. `(1 + m)^months`.

use serde::{Deserialize, Serialize};

use super::error::SimulationError;
use super::types::{RateBasis, ScenarioKey};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub key: ScenarioKey,
    pub display_name: String,
    /// Per year or per month depending on [`SimulatorConfig::rate_basis`].
    pub rate: f64,
}

impl ScenarioDefinition {
    fn new(key: ScenarioKey, display_name: &str, rate: f64) -> Self {
        Self {
            key,
            display_name: display_name.to_string(),
            rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub rate_basis: RateBasis,
    /// Last month of the charted series.
    pub horizon_months: u32,
    /// Months at which the summarizer reports a row, ascending.
    pub checkpoints: Vec<u32>,
    /// Ordered pessimistic, normal, optimistic.
    pub scenarios: [ScenarioDefinition; 3],
    pub liquid_at_checkpoints: bool,
}

impl SimulatorConfig {
    pub fn annual_36_months() -> Self {
        Self {
            rate_basis: RateBasis::Annual,
            horizon_months: 36,
            checkpoints: vec![12, 24, 36],
            scenarios: [
                ScenarioDefinition::new(ScenarioKey::Pessimistic, "Pessimistic", 0.05),
                ScenarioDefinition::new(ScenarioKey::Normal, "Normal", 0.08),
                ScenarioDefinition::new(ScenarioKey::Optimistic, "Optimistic", 0.10),
            ],
            liquid_at_checkpoints: false,
        }
    }

    pub fn monthly_14_months() -> Self {
        Self {
            rate_basis: RateBasis::Monthly,
            horizon_months: 14,
            checkpoints: vec![14],
            scenarios: [
                ScenarioDefinition::new(ScenarioKey::Pessimistic, "Conservative", 0.007),
                ScenarioDefinition::new(ScenarioKey::Normal, "Balanced", 0.01),
                ScenarioDefinition::new(ScenarioKey::Optimistic, "Dynamic", 0.013),
            ],
            liquid_at_checkpoints: true,
        }
    }

    pub fn scenario(&self, key: ScenarioKey) -> &ScenarioDefinition {
        &self.scenarios[key.index()]
    }

    /// Rate and compounding frequency to hand to [`super::engine::compound`].
    pub fn compounding_terms(&self, scenario: &ScenarioDefinition) -> (f64, u32) {
        match self.rate_basis {
            RateBasis::Annual => (scenario.rate, 1),
            RateBasis::Monthly => (scenario.rate * f64::from(MONTHS_PER_YEAR), MONTHS_PER_YEAR),
        }
    }

    pub fn annualized_rate(&self, scenario: &ScenarioDefinition) -> f64 {
        self.compounding_terms(scenario).0
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.horizon_months == 0 {
            return Err(SimulationError::InvalidConfig(
                "horizonMonths must be > 0".to_string(),
            ));
        }

        if self.checkpoints.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "checkpoints must not be empty".to_string(),
            ));
        }

        if self.checkpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(SimulationError::InvalidConfig(
                "checkpoints must be strictly ascending".to_string(),
            ));
        }

        if self.checkpoints.contains(&0) {
            return Err(SimulationError::InvalidConfig(
                "checkpoints must be > 0".to_string(),
            ));
        }

        if self
            .checkpoints
            .last()
            .is_some_and(|&last| last > self.horizon_months)
        {
            return Err(SimulationError::InvalidConfig(
                "checkpoints must not exceed horizonMonths".to_string(),
            ));
        }

        for (slot, scenario) in self.scenarios.iter().enumerate() {
            if scenario.key.index() != slot {
                return Err(SimulationError::InvalidConfig(format!(
                    "scenario {:?} is out of order",
                    scenario.key
                )));
            }
            if !scenario.rate.is_finite() || scenario.rate < 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "rate for {:?} must be a finite number >= 0",
                    scenario.key
                )));
            }
        }

        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::annual_36_months()
    }
}
