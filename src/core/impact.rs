//! Capital amount to whole-number social and environmental impact quantities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::SimulationError;

/// Impact categories in priority order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactKind {
    Housing,
    Education,
    Mobility,
    Nature,
}

impl ImpactKind {
    /// Counts people or families rather than an environmental quantity.
    pub fn counts_beneficiaries(self) -> bool {
        !matches!(self, ImpactKind::Nature)
    }

    fn labels(self) -> ImpactLabels {
        match self {
            ImpactKind::Housing => ImpactLabels {
                title: "Families housed",
                description: "Families given decent housing through your investment",
                unit: "family",
            },
            ImpactKind::Education => ImpactLabels {
                title: "Children schooled",
                description: "Children given access to a full year of education",
                unit: "child",
            },
            ImpactKind::Mobility => ImpactLabels {
                title: "Families equipped",
                description: "Families provided with sustainable electric transport",
                unit: "family",
            },
            ImpactKind::Nature => ImpactLabels {
                title: "Trees planted",
                description: "Trees planted for reforestation and biodiversity",
                unit: "tree",
            },
        }
    }
}

struct ImpactLabels {
    title: &'static str,
    description: &'static str,
    unit: &'static str,
}

/// Converts whole cost units into the displayed natural unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "op", content = "factor")]
pub enum Batch {
    None,
    /// e.g. ten scooters per equipped family.
    Divide(u64),
    /// e.g. a hundred trees per cost unit.
    Multiply(u64),
}

impl Batch {
    fn apply(self, units: u64) -> u64 {
        match self {
            Batch::None => units,
            Batch::Divide(factor) => units / factor,
            Batch::Multiply(factor) => units.saturating_mul(factor),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRule {
    pub kind: ImpactKind,
    pub cost_per_unit: f64,
    pub batch: Batch,
}

impl ImpactRule {
    fn quantity(&self, amount: f64) -> u64 {
        // Float-to-int casts saturate, so absurd amounts cannot wrap.
        let units = (amount / self.cost_per_unit).floor() as u64;
        self.batch.apply(units)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactScheme {
    pub rules: Vec<ImpactRule>,
    /// Reported as primary when no category reaches one unit.
    pub default_primary: ImpactKind,
}

impl ImpactScheme {
    pub fn three_category() -> Self {
        Self {
            rules: vec![
                ImpactRule {
                    kind: ImpactKind::Housing,
                    cost_per_unit: 10_000.0,
                    batch: Batch::None,
                },
                ImpactRule {
                    kind: ImpactKind::Education,
                    cost_per_unit: 6_000.0,
                    batch: Batch::None,
                },
                ImpactRule {
                    kind: ImpactKind::Mobility,
                    cost_per_unit: 1_000.0,
                    batch: Batch::Divide(10),
                },
            ],
            default_primary: ImpactKind::Mobility,
        }
    }

    pub fn four_category() -> Self {
        let mut scheme = Self::three_category();
        scheme.rules.push(ImpactRule {
            kind: ImpactKind::Nature,
            cost_per_unit: 500.0,
            batch: Batch::Multiply(100),
        });
        scheme.default_primary = ImpactKind::Nature;
        scheme
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.rules.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "impact scheme needs at least one rule".to_string(),
            ));
        }

        for (position, rule) in self.rules.iter().enumerate() {
            if !rule.cost_per_unit.is_finite() || rule.cost_per_unit <= 0.0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "costPerUnit for {:?} must be a finite number > 0",
                    rule.kind
                )));
            }
            if matches!(rule.batch, Batch::Divide(0) | Batch::Multiply(0)) {
                return Err(SimulationError::InvalidConfig(format!(
                    "batch factor for {:?} must be > 0",
                    rule.kind
                )));
            }
            if self.rules[..position].iter().any(|r| r.kind == rule.kind) {
                return Err(SimulationError::InvalidConfig(format!(
                    "{:?} appears more than once",
                    rule.kind
                )));
            }
        }

        if !self.rules.iter().any(|r| r.kind == self.default_primary) {
            return Err(SimulationError::InvalidConfig(format!(
                "default primary {:?} has no rule",
                self.default_primary
            )));
        }

        Ok(())
    }
}

impl Default for ImpactScheme {
    fn default() -> Self {
        Self::four_category()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactCategory {
    #[serde(rename = "type")]
    pub kind: ImpactKind,
    pub title: String,
    pub description: String,
    pub unit: String,
    pub cost_per_unit: f64,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactStats {
    pub total_beneficiaries: u64,
    /// Only present when the scheme has a nature category.
    pub trees_planted: Option<u64>,
    pub primary_impact: ImpactCategory,
    pub all_impacts: BTreeMap<ImpactKind, ImpactCategory>,
}

pub fn calculate_impacts(
    scheme: &ImpactScheme,
    amount: f64,
) -> Result<BTreeMap<ImpactKind, ImpactCategory>, SimulationError> {
    scheme.validate()?;
    if !(amount >= 0.0) {
        return Err(SimulationError::invalid("amount", amount));
    }

    Ok(scheme
        .rules
        .iter()
        .map(|rule| {
            let labels = rule.kind.labels();
            let category = ImpactCategory {
                kind: rule.kind,
                title: labels.title.to_string(),
                description: labels.description.to_string(),
                unit: labels.unit.to_string(),
                cost_per_unit: rule.cost_per_unit,
                quantity: rule.quantity(amount),
            };
            (rule.kind, category)
        })
        .collect())
}

pub fn get_primary_impact(
    scheme: &ImpactScheme,
    amount: f64,
) -> Result<ImpactCategory, SimulationError> {
    let impacts = calculate_impacts(scheme, amount)?;
    primary_of(&impacts, scheme.default_primary)
}

pub fn get_impact_stats(scheme: &ImpactScheme, amount: f64) -> Result<ImpactStats, SimulationError> {
    let impacts = calculate_impacts(scheme, amount)?;

    let total_beneficiaries = impacts
        .values()
        .filter(|category| category.kind.counts_beneficiaries())
        .fold(0u64, |total, category| {
            total.saturating_add(category.quantity)
        });
    let trees_planted = impacts
        .get(&ImpactKind::Nature)
        .map(|category| category.quantity);
    let primary_impact = primary_of(&impacts, scheme.default_primary)?;

    debug!(
        amount,
        total_beneficiaries,
        primary = ?primary_impact.kind,
        "calculated impact stats"
    );

    Ok(ImpactStats {
        total_beneficiaries,
        trees_planted,
        primary_impact,
        all_impacts: impacts,
    })
}

// Map iteration follows `ImpactKind` ordering, which is the priority order.
fn primary_of(
    impacts: &BTreeMap<ImpactKind, ImpactCategory>,
    default_primary: ImpactKind,
) -> Result<ImpactCategory, SimulationError> {
    impacts
        .values()
        .find(|category| category.quantity >= 1)
        .or_else(|| impacts.get(&default_primary))
        .cloned()
        .ok_or_else(|| {
            SimulationError::InvalidConfig(format!(
                "default primary {default_primary:?} has no rule"
            ))
        })
}
