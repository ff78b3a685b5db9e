#![no_std]

//! Madgwick AHRS - a gradient-descent orientation filter for attitude and heading reference systems
//!
//! The filter fuses gyroscope, accelerometer and (optionally) magnetometer samples
//! into a unit quaternion and exposes the result as yaw, pitch and roll.
//!
//! # Features
//!
//! - 6-axis (IMU) and 9-axis (MARG) gradient-descent updates
//! - Automatic fallback to the 6-axis path when the magnetometer reads all zeros
//! - Gyroscope-only integration when the accelerometer reads all zeros
//! - Fast inverse square root normalisation (single Newton-Raphson pass)
//! - Stateful yaw smoothing that freezes heading as pitch approaches ±90°
//! - `#![no_std]` compatible for embedded systems, optional `defmt` logging
//!
//! # Quick Start
//!
//! ```rust
//! use madgwick_ahrs::{Madgwick, MadgwickSettings};
//!
//! let mut filter = Madgwick::with_settings(MadgwickSettings {
//!     sample_frequency: 100.0, // Hz
//!     beta: 0.1,
//!     ..Default::default()
//! });
//!
//! // Gyroscope in rad/s, accelerometer and magnetometer in any consistent unit
//! filter.update9(0.01, -0.02, 0.0, 0.0, 0.0, 1.0, 0.3, 0.0, -0.5);
//!
//! let (q0, q1, q2, q3) = filter.read_quaternion();
//! let angles = filter.angles_deg();
//! # let _ = (q0, q1, q2, q3, angles.yaw, angles.pitch, angles.roll);
//! ```

#[macro_use]
mod logging;

pub mod error;
mod madgwick;
mod math;
mod types;

pub use error::{SettingsError, SettingsResult};
pub use madgwick::Madgwick;
pub use math::{DEG_TO_RAD, RAD_TO_DEG, fast_inverse_sqrt};
pub use types::*;
