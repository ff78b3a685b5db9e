//! Configuration and output types for the Madgwick filter

use crate::error::{SettingsError, SettingsResult};
use crate::math::{DEG_TO_RAD, RAD_TO_DEG};

/// Madgwick filter settings
///
/// Configuration parameters for the filter. `sample_frequency` and `beta`
/// drive the update step; the two pitch thresholds only affect the smoothed
/// angle extraction in [`Madgwick::angles`](crate::Madgwick::angles).
///
/// # Example
/// ```
/// use madgwick_ahrs::{Madgwick, MadgwickSettings};
///
/// let settings = MadgwickSettings {
///     sample_frequency: 256.0, // Hz
///     beta: 0.041,             // Lower gain trusts the gyroscope more
///     ..Default::default()
/// };
/// let filter = Madgwick::with_settings(settings);
/// # let _ = filter;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MadgwickSettings {
    /// Rate at which `update6`/`update9` are called, in Hz
    ///
    /// Each update integrates over `1 / sample_frequency` seconds. Must be
    /// positive; the unvalidated setters do not check this.
    pub sample_frequency: f32,
    /// Filter gain (typically 0.01 to 0.5)
    ///
    /// Magnitude of the gradient-descent correction. Higher values converge
    /// to the accelerometer/magnetometer reference faster but pass more
    /// sensor noise through. Zero disables correction entirely.
    pub beta: f32,
    /// Pitch above which the smoothed yaw is frozen, in radians
    pub pitch_upper: f32,
    /// Pitch magnitude above which the smoothed yaw is mostly held, in radians
    ///
    /// Must not exceed `pitch_upper`.
    pub pitch_lower: f32,
}

impl MadgwickSettings {
    /// Integration step in seconds
    pub fn sample_period(&self) -> f32 {
        1.0 / self.sample_frequency
    }

    /// Check the settings for values the filter cannot run with
    pub fn validate(&self) -> SettingsResult<()> {
        if self.sample_frequency.is_nan() || self.sample_frequency <= 0.0 {
            return Err(SettingsError::NonPositiveSampleFrequency(self.sample_frequency));
        }
        if self.beta.is_nan() || self.beta < 0.0 {
            return Err(SettingsError::NegativeBeta(self.beta));
        }
        if self.pitch_lower > self.pitch_upper {
            return Err(SettingsError::InvertedPitchThresholds {
                lower: self.pitch_lower,
                upper: self.pitch_upper,
            });
        }
        Ok(())
    }
}

impl Default for MadgwickSettings {
    fn default() -> Self {
        Self {
            sample_frequency: 512.0,
            beta: 0.1,
            pitch_upper: 80.0 * DEG_TO_RAD,
            pitch_lower: 70.0 * DEG_TO_RAD,
        }
    }
}

/// Yaw, pitch and roll triple
///
/// Units depend on the producer: [`Madgwick::angles`](crate::Madgwick::angles)
/// returns radians, [`Madgwick::angles_deg`](crate::Madgwick::angles_deg) degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angles {
    /// Heading
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Angles {
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Convert radians to degrees
    pub fn to_degrees(self) -> Self {
        Self {
            yaw: self.yaw * RAD_TO_DEG,
            pitch: self.pitch * RAD_TO_DEG,
            roll: self.roll * RAD_TO_DEG,
        }
    }
}
