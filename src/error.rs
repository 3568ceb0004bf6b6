// ⛔ Engine Errors - contract violations by the caller
//
// Analyzers degrade gracefully on small samples and zero denominators.
// Only malformed input (NaN, infinities, negative balances, bad parameters)
// is reported as an error, naming the offending field.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A numeric input was NaN or infinite.
    #[error("invalid number in {field}: {value} is not finite")]
    NonFinite { field: String, value: f64 },

    /// A balance figure that must be non-negative was negative.
    #[error("invalid number in {field}: {value} must not be negative")]
    Negative { field: String, value: f64 },

    /// An analyzer parameter (tolerance, threshold, window) is unusable.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Configuration could not be applied.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub fn parameter(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reject NaN and infinities, naming the field.
pub fn ensure_finite(field: impl Into<String>, value: f64) -> Result<(), EngineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::NonFinite {
            field: field.into(),
            value,
        })
    }
}

/// Reject NaN, infinities and negative values, naming the field.
pub fn ensure_non_negative(field: impl Into<String>, value: f64) -> Result<(), EngineError> {
    let field = field.into();
    ensure_finite(field.clone(), value)?;
    if value < 0.0 {
        return Err(EngineError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite_names_field() {
        let err = ensure_finite("transactions[3].amount", f64::NAN).unwrap_err();
        assert!(err.to_string().contains("transactions[3].amount"));
        assert!(ensure_finite("x", 12.5).is_ok());
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("balance.cash", 0.0).is_ok());
        let err = ensure_non_negative("balance.cash", -1.0).unwrap_err();
        assert!(matches!(err, EngineError::Negative { .. }));
        let err = ensure_non_negative("balance.cash", f64::INFINITY).unwrap_err();
        assert!(matches!(err, EngineError::NonFinite { .. }));
    }
}
