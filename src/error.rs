//! Settings validation errors

use thiserror::Error;

/// Result type for validated filter construction
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Reasons a [`MadgwickSettings`](crate::MadgwickSettings) value cannot drive the filter
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Zero, negative or NaN sample frequency would break integration
    #[error("sample frequency must be positive, got {0} Hz")]
    NonPositiveSampleFrequency(f32),

    /// Negative gain would push the estimate away from the reference
    #[error("beta must be non-negative, got {0}")]
    NegativeBeta(f32),

    /// Yaw-freeze band is empty
    #[error("pitch_lower ({lower} rad) exceeds pitch_upper ({upper} rad)")]
    InvertedPitchThresholds { lower: f32, upper: f32 },
}
