mod config;
mod engine;
mod error;
mod impact;
mod summary;
mod types;

pub use config::{ScenarioDefinition, SimulatorConfig};
pub use engine::{CompoundParams, compound, generate_series, round_to_cents, simulate_scenarios};
pub use error::SimulationError;
pub use impact::{
    Batch, ImpactCategory, ImpactKind, ImpactRule, ImpactScheme, ImpactStats, calculate_impacts,
    get_impact_stats, get_primary_impact,
};
pub use summary::calculate_time_horizons;
pub use types::{
    HorizonResult, RateBasis, ScenarioHorizons, ScenarioKey, ScenarioValues, SeriesPoint,
    SimulationResult, TimeSeriesPoint,
};
