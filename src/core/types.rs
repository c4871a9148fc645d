use serde::{Deserialize, Serialize};

/// One of the three fixed rate assumptions, in display order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKey {
    Pessimistic,
    Normal,
    Optimistic,
}

impl ScenarioKey {
    pub const ALL: [ScenarioKey; 3] = [
        ScenarioKey::Pessimistic,
        ScenarioKey::Normal,
        ScenarioKey::Optimistic,
    ];

    pub fn index(self) -> usize {
        match self {
            ScenarioKey::Pessimistic => 0,
            ScenarioKey::Normal => 1,
            ScenarioKey::Optimistic => 2,
        }
    }
}

/// Whether a scenario rate is quoted per year or per month.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBasis {
    Annual,
    Monthly,
}

/// One value per scenario.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScenarioValues {
    pub pessimistic: f64,
    pub normal: f64,
    pub optimistic: f64,
}

impl ScenarioValues {
    pub fn get(&self, key: ScenarioKey) -> f64 {
        match key {
            ScenarioKey::Pessimistic => self.pessimistic,
            ScenarioKey::Normal => self.normal,
            ScenarioKey::Optimistic => self.optimistic,
        }
    }

    pub fn with(mut self, key: ScenarioKey, value: f64) -> Self {
        match key {
            ScenarioKey::Pessimistic => self.pessimistic = value,
            ScenarioKey::Normal => self.normal = value,
            ScenarioKey::Optimistic => self.optimistic = value,
        }
        self
    }
}

/// A single-scenario series entry.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub period: u32,
    pub value: f64,
}

/// A chart point carrying every scenario's amount for one month.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub month: u32,
    #[serde(flatten)]
    pub values: ScenarioValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Normal scenario amount at the final horizon month.
    pub final_amount: f64,
    /// `final_amount - principal`.
    pub total_interest: f64,
    pub series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonResult {
    pub months: u32,
    pub years: f64,
    pub final_amount: f64,
    pub gain_absolute: f64,
    /// Gain relative to principal, in percent. Zero when principal is zero.
    pub gain_percentage: f64,
    /// Scenario rate in its native basis (per year or per month).
    pub period_rate: f64,
    pub annualized_equivalent: f64,
    /// Redeemable before term, subject to finding a buyer on the secondary market.
    pub liquid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioHorizons {
    pub key: ScenarioKey,
    pub display_name: String,
    pub rate: f64,
    pub rate_basis: RateBasis,
    pub results: Vec<HorizonResult>,
}
