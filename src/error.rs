use alloy_primitives::U256;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    #[error("Math error - invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Math error - tick {tick} out of range [{min}, {max}]")]
    OutOfRange { tick: i32, min: i32, max: i32 },

    #[error("Math error - invalid range: start {start} must be below end {end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("Math error - range [{start}, {end}] collapses to a single tick {tick}")]
    DegenerateRange { start: f64, end: f64, tick: i32 },
}

impl MathError {
    pub(crate) fn invalid(name: &'static str, value: impl ToString) -> Self {
        MathError::InvalidArgument {
            name,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("Curve error - curve {index} has invalid {field}: {value}")]
    InvalidCurve {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Curve error - gap between market cap {previous_end} and {next_start}")]
    GapDetected { previous_end: f64, next_start: f64 },

    #[error("Curve error - shares sum to {total} ({percentage:.4}%), expected exactly 100%")]
    SharesMismatch { total: U256, percentage: f64 },

    #[error("Curve error - curve set is empty")]
    EmptyCurveSet,

    #[error(transparent)]
    Math(#[from] MathError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MiningError {
    #[error("Mining error - no salt found after {attempts} attempts starting at {start_salt}")]
    SaltNotFound { attempts: u64, start_salt: U256 },

    #[error("Mining error - upstream stage changed, {stage} must be mined again")]
    UpstreamStale { stage: &'static str },

    #[error(
        "Mining error - token ordering mismatch, expected token0 = {expected_token0}, mined token0 = {actual_token0}"
    )]
    OrderingMismatch {
        expected_token0: bool,
        actual_token0: bool,
    },

    #[error("Mining error - invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },

    #[error(transparent)]
    Math(#[from] MathError),
}

#[cfg(feature = "onchain")]
#[derive(Debug, Error)]
pub enum OnchainError {
    #[error("Failed to get code: {0}")]
    FailedToGetCode(String),

    #[error("Chain read timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Mining(#[from] MiningError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    CurveError(#[from] crate::error::CurveError),

    #[error(transparent)]
    MiningError(#[from] crate::error::MiningError),

    #[cfg(feature = "onchain")]
    #[error(transparent)]
    OnchainError(#[from] crate::error::OnchainError),
}
