use crate::utils::error::{Result, SynthError};

/// Probabilities are compared after rounding to this many decimal digits.
pub const OUTPUT_ROUNDING: i32 = 6;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// True when the values sum to one at `OUTPUT_ROUNDING` precision.
pub fn check_probability(values: &[f64]) -> bool {
    round_to(values.iter().sum::<f64>(), OUTPUT_ROUNDING) == 1.0
}

pub fn validate_probability_sum(subject: &str, values: &[f64]) -> Result<()> {
    if check_probability(values) {
        return Ok(());
    }
    Err(SynthError::invariant(
        subject,
        format!(
            "transition probabilities sum to {} instead of 1",
            values.iter().sum::<f64>()
        ),
    ))
}

/// Cohesion probabilities live strictly inside (0, 1).
pub fn validate_open_probability(subject: &str, p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        return Ok(());
    }
    Err(SynthError::invariant(
        subject,
        format!("p must satisfy 0 < p < 1, got {}", p),
    ))
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SynthError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_positive_mean(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SynthError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive, finite number".to_string(),
        });
    }
    Ok(())
}

/// Prefixes end up inside tagged node ids, so only identifier characters are allowed.
pub fn validate_prefix(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SynthError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(SynthError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Only ASCII letters, digits, '_', '-' and '.' are allowed".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SynthError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
