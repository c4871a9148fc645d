//! Compound-interest scenario simulator with social impact estimates.
//!
//! [`core`] holds the pure engine: compounding, the three-scenario series, horizon summaries and
//! impact quantities. [`api`] turns a JSON payload carrying a (possibly localized) capital amount
//! into one serializable response for a UI host.

pub mod api;
pub mod core;
