use thiserror::Error;

/// Errors raised by the compounding engine, the summarizer and the impact mapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A numeric argument was negative, NaN, or (for the compounding frequency) zero.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Argument name as it appears in the public API.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The compounding formula produced an infinite or NaN amount.
    #[error(
        "compound interest overflowed for principal {principal}, rate {annual_rate}, years {years}"
    )]
    ComputationOverflow {
        principal: f64,
        annual_rate: f64,
        years: f64,
    },

    /// A simulator or impact configuration breaks a structural invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}
