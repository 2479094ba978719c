use thiserror::Error;

/// Rejected parameter records.
///
/// Per-tick operations never fail; these are only produced by the
/// `validate` methods on the parameter types, typically at load time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamsError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("solver frequency must be at least 1")]
    ZeroFrequency,
    #[error("curve has no keys")]
    EmptyCurve,
    #[error("curve key {index} is not after the previous key")]
    UnsortedKeys { index: usize },
}

pub type Result<T, E = ParamsError> = std::result::Result<T, E>;

pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ParamsError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ParamsError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ParamsError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ParamsError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(ParamsError::NonFinite { field });
    }
    Ok(())
}
