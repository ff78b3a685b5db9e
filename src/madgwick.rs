//! Madgwick gradient-descent orientation filter

use libm::{asin, asinf, atan2, atan2f, fabs, sqrtf};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::error::SettingsResult;
use crate::math::{RAD_TO_DEG, fast_inverse_sqrt};
use crate::types::{Angles, MadgwickSettings};

/// Lower bound on each yaw blend weight
const BLEND_WEIGHT_FLOOR: f64 = 0.001;
/// Share of the inner (`pitch_upper`) band in the yaw blend weight
const INNER_BAND_SHARE: f64 = 0.01;
/// Share of the outer (`pitch_lower`) band in the yaw blend weight
const OUTER_BAND_SHARE: f64 = 0.99;

/// Madgwick AHRS filter
///
/// Integrates gyroscope rates into a quaternion and corrects the result with
/// one gradient-descent step toward the measured gravity (and, on the 9-axis
/// path, magnetic field) direction. The caller invokes an update once per
/// sample period; the filter performs no timing of its own.
///
/// # Example
/// ```
/// use madgwick_ahrs::Madgwick;
///
/// let mut filter = Madgwick::new();
/// filter.configure(100.0, 0.1);
///
/// for _ in 0..100 {
///     filter.update6(0.0, 0.0, 0.1, 0.0, 0.0, 1.0);
/// }
///
/// assert!(!filter.magnetometer_used());
/// assert!(filter.yaw_rad().is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Madgwick {
    settings: MadgwickSettings,
    /// Orientation estimate, kept close to unit norm by the fast normalisation
    quaternion: Quaternion<f32>,
    /// Last output of [`Madgwick::angles`], fed back into the next call
    smoothed: Angles,
    magnetometer_used: bool,
}

impl Madgwick {
    /// Create a filter with default settings
    pub fn new() -> Self {
        Self::with_settings(MadgwickSettings::default())
    }

    /// Create a filter with the given settings, without validation
    pub fn with_settings(settings: MadgwickSettings) -> Self {
        Self {
            settings,
            quaternion: Quaternion::identity(),
            smoothed: Angles::default(),
            magnetometer_used: false,
        }
    }

    /// Create a filter after checking the settings
    pub fn try_with_settings(settings: MadgwickSettings) -> SettingsResult<Self> {
        settings.validate()?;
        Ok(Self::with_settings(settings))
    }

    /// Set sample frequency (Hz) and gain
    ///
    /// No validation: a non-positive `sample_frequency` produces a
    /// non-finite integration step.
    pub fn configure(&mut self, sample_frequency: f32, beta: f32) {
        trace!("configure: {} Hz, beta {}", sample_frequency, beta);
        self.settings.sample_frequency = sample_frequency;
        self.settings.beta = beta;
    }

    /// Replace all settings, without validation
    pub fn set_settings(&mut self, settings: MadgwickSettings) {
        self.settings = settings;
    }

    /// Get current settings
    pub fn settings(&self) -> MadgwickSettings {
        self.settings
    }

    /// Reset orientation to identity
    ///
    /// Smoothed angle state and the magnetometer flag are left untouched.
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::identity();
    }

    /// Whether the last update ran the 9-axis path
    pub fn magnetometer_used(&self) -> bool {
        self.magnetometer_used
    }

    /// Update with gyroscope (rad/s), accelerometer and magnetometer samples
    ///
    /// An all-zero magnetometer sample is treated as a missing sensor and
    /// the call is forwarded to [`Madgwick::update6`].
    #[allow(clippy::too_many_arguments)]
    pub fn update9(
        &mut self,
        gx: f32,
        gy: f32,
        gz: f32,
        mut ax: f32,
        mut ay: f32,
        mut az: f32,
        mut mx: f32,
        mut my: f32,
        mut mz: f32,
    ) {
        if mx == 0.0 && my == 0.0 && mz == 0.0 {
            trace!("magnetometer reads zero, using 6-axis update");
            self.update6(gx, gy, gz, ax, ay, az);
            return;
        }
        self.magnetometer_used = true;

        let (q0, q1, q2, q3) = self.read_quaternion();
        let mut q_dot = Self::gyroscope_rate(self.quaternion, gx, gy, gz);

        if !(ax == 0.0 && ay == 0.0 && az == 0.0) {
            let recip_norm = fast_inverse_sqrt(ax * ax + ay * ay + az * az);
            ax *= recip_norm;
            ay *= recip_norm;
            az *= recip_norm;

            let recip_norm = fast_inverse_sqrt(mx * mx + my * my + mz * mz);
            mx *= recip_norm;
            my *= recip_norm;
            mz *= recip_norm;

            let _2q0mx = 2.0 * q0 * mx;
            let _2q0my = 2.0 * q0 * my;
            let _2q0mz = 2.0 * q0 * mz;
            let _2q1mx = 2.0 * q1 * mx;
            let _2q0 = 2.0 * q0;
            let _2q1 = 2.0 * q1;
            let _2q2 = 2.0 * q2;
            let _2q3 = 2.0 * q3;
            let _2q0q2 = 2.0 * q0 * q2;
            let _2q2q3 = 2.0 * q2 * q3;
            let q0q0 = q0 * q0;
            let q0q1 = q0 * q1;
            let q0q2 = q0 * q2;
            let q0q3 = q0 * q3;
            let q1q1 = q1 * q1;
            let q1q2 = q1 * q2;
            let q1q3 = q1 * q3;
            let q2q2 = q2 * q2;
            let q2q3 = q2 * q3;
            let q3q3 = q3 * q3;

            // Earth-frame reference direction of the measured field
            let hx = mx * q0q0 - _2q0my * q3 + _2q0mz * q2 + mx * q1q1 + _2q1 * my * q2
                + _2q1 * mz * q3
                - mx * q2q2
                - mx * q3q3;
            let hy = _2q0mx * q3 + my * q0q0 - _2q0mz * q1 + _2q1mx * q2 - my * q1q1
                + my * q2q2
                + _2q2 * mz * q3
                - my * q3q3;
            let _2bx = sqrtf(hx * hx + hy * hy);
            let _2bz = -_2q0mx * q2 + _2q0my * q1 + mz * q0q0 + _2q1mx * q3 - mz * q1q1
                + _2q2 * my * q3
                - mz * q2q2
                + mz * q3q3;
            let _4bx = 2.0 * _2bx;
            let _4bz = 2.0 * _2bz;

            // Objective function residuals: gravity (x, y, z) then field (x, y, z)
            let fg_x = 2.0 * q1q3 - _2q0q2 - ax;
            let fg_y = 2.0 * q0q1 + _2q2q3 - ay;
            let fg_z = 1.0 - 2.0 * q1q1 - 2.0 * q2q2 - az;
            let fb_x = _2bx * (0.5 - q2q2 - q3q3) + _2bz * (q1q3 - q0q2) - mx;
            let fb_y = _2bx * (q1q2 - q0q3) + _2bz * (q0q1 + q2q3) - my;
            let fb_z = _2bx * (q0q2 + q1q3) + _2bz * (0.5 - q1q1 - q2q2) - mz;

            let gradient = Quaternion::new(
                -_2q2 * fg_x + _2q1 * fg_y - _2bz * q2 * fb_x
                    + (-_2bx * q3 + _2bz * q1) * fb_y
                    + _2bx * q2 * fb_z,
                _2q3 * fg_x + _2q0 * fg_y - 4.0 * q1 * fg_z
                    + _2bz * q3 * fb_x
                    + (_2bx * q2 + _2bz * q0) * fb_y
                    + (_2bx * q3 - _4bz * q1) * fb_z,
                -_2q0 * fg_x + _2q3 * fg_y - 4.0 * q2 * fg_z
                    + (-_4bx * q2 - _2bz * q0) * fb_x
                    + (_2bx * q1 + _2bz * q3) * fb_y
                    + (_2bx * q0 - _4bz * q2) * fb_z,
                _2q1 * fg_x
                    + _2q2 * fg_y
                    + (-_4bx * q3 + _2bz * q1) * fb_x
                    + (-_2bx * q0 + _2bz * q2) * fb_y
                    + _2bx * q1 * fb_z,
            );
            q_dot -= self.feedback(gradient);
        } else {
            warn!("accelerometer reads zero, integrating gyroscope only");
        }

        self.integrate(q_dot);
    }

    /// Update with gyroscope (rad/s) and accelerometer samples
    pub fn update6(&mut self, gx: f32, gy: f32, gz: f32, mut ax: f32, mut ay: f32, mut az: f32) {
        self.magnetometer_used = false;

        let (q0, q1, q2, q3) = self.read_quaternion();
        let mut q_dot = Self::gyroscope_rate(self.quaternion, gx, gy, gz);

        if !(ax == 0.0 && ay == 0.0 && az == 0.0) {
            let recip_norm = fast_inverse_sqrt(ax * ax + ay * ay + az * az);
            ax *= recip_norm;
            ay *= recip_norm;
            az *= recip_norm;

            let _2q0 = 2.0 * q0;
            let _2q1 = 2.0 * q1;
            let _2q2 = 2.0 * q2;
            let _2q3 = 2.0 * q3;
            let _4q0 = 4.0 * q0;
            let _4q1 = 4.0 * q1;
            let _4q2 = 4.0 * q2;
            let _8q1 = 8.0 * q1;
            let _8q2 = 8.0 * q2;
            let q0q0 = q0 * q0;
            let q1q1 = q1 * q1;
            let q2q2 = q2 * q2;
            let q3q3 = q3 * q3;

            let gradient = Quaternion::new(
                _4q0 * q2q2 + _2q2 * ax + _4q0 * q1q1 - _2q1 * ay,
                _4q1 * q3q3 - _2q3 * ax + 4.0 * q0q0 * q1 - _2q0 * ay - _4q1
                    + _8q1 * q1q1
                    + _8q1 * q2q2
                    + _4q1 * az,
                4.0 * q0q0 * q2 + _2q0 * ax + _4q2 * q3q3 - _2q3 * ay - _4q2
                    + _8q2 * q1q1
                    + _8q2 * q2q2
                    + _4q2 * az,
                4.0 * q1q1 * q3 - _2q1 * ax + 4.0 * q2q2 * q3 - _2q2 * ay,
            );
            q_dot -= self.feedback(gradient);
        } else {
            warn!("accelerometer reads zero, integrating gyroscope only");
        }

        self.integrate(q_dot);
    }

    /// Vector form of [`Madgwick::update6`]
    pub fn update_imu(&mut self, gyroscope: Vector3<f32>, accelerometer: Vector3<f32>) {
        self.update6(
            gyroscope.x,
            gyroscope.y,
            gyroscope.z,
            accelerometer.x,
            accelerometer.y,
            accelerometer.z,
        );
    }

    /// Vector form of [`Madgwick::update9`]
    pub fn update_marg(
        &mut self,
        gyroscope: Vector3<f32>,
        accelerometer: Vector3<f32>,
        magnetometer: Vector3<f32>,
    ) {
        self.update9(
            gyroscope.x,
            gyroscope.y,
            gyroscope.z,
            accelerometer.x,
            accelerometer.y,
            accelerometer.z,
            magnetometer.x,
            magnetometer.y,
            magnetometer.z,
        );
    }

    /// Quaternion components as (q0, q1, q2, q3), scalar first
    pub fn read_quaternion(&self) -> (f32, f32, f32, f32) {
        let q = &self.quaternion;
        (q.w, q.i, q.j, q.k)
    }

    /// Get current orientation quaternion
    ///
    /// The estimate is normalised with the fast inverse square root, so its
    /// norm sits within about 0.2% of one rather than exactly on it.
    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::new_unchecked(self.quaternion)
    }

    /// Set orientation quaternion directly
    pub fn set_quaternion(&mut self, quaternion: UnitQuaternion<f32>) {
        self.quaternion = quaternion.into_inner();
    }

    /// Yaw in radians, unsmoothed
    pub fn yaw_rad(&self) -> f32 {
        let (q0, q1, q2, q3) = self.read_quaternion();
        atan2f(2.0 * q1 * q2 + 2.0 * q0 * q3, 1.0 - 2.0 * q0 * q0 - 2.0 * q1 * q1)
    }

    /// Pitch in radians, unsmoothed
    ///
    /// Not clamped: yields NaN when the quaternion drifts far enough that the
    /// `asin` argument leaves [-1, 1].
    pub fn pitch_rad(&self) -> f32 {
        let (q0, q1, q2, q3) = self.read_quaternion();
        asinf(2.0 * (q3 * q1 - q2 * q0))
    }

    /// Roll in radians, unsmoothed
    pub fn roll_rad(&self) -> f32 {
        let (q0, q1, q2, q3) = self.read_quaternion();
        atan2f(2.0 * (q3 * q2 + q0 * q1), 1.0 - 2.0 * (q1 * q1 + q2 * q2))
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_rad() * RAD_TO_DEG
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_rad() * RAD_TO_DEG
    }

    pub fn roll_deg(&self) -> f32 {
        self.roll_rad() * RAD_TO_DEG
    }

    /// Smoothed yaw, pitch and roll in radians
    ///
    /// Not a pure function of the quaternion: yaw is blended with the value
    /// returned by the previous call, weighted by how close the previous pitch
    /// was to the singularity. Above `pitch_upper` yaw is frozen outright.
    /// Each call stores its output for the next one.
    pub fn angles(&mut self) -> Angles {
        let q0 = f64::from(self.quaternion.w);
        let q1 = f64::from(self.quaternion.i);
        let q2 = f64::from(self.quaternion.j);
        let q3 = f64::from(self.quaternion.k);

        let test = q0 * q1 + q2 * q3;
        let sqx = q0 * q0;
        let sqy = q1 * q1;
        let sqz = q2 * q2;

        let previous_yaw = f64::from(self.smoothed.yaw);
        let previous_pitch = f64::from(self.smoothed.pitch);
        let pitch_upper = f64::from(self.settings.pitch_upper);
        let pitch_lower = f64::from(self.settings.pitch_lower);

        let yaw = if previous_pitch > pitch_upper {
            previous_yaw
        } else {
            let inner = previous_pitch / pitch_upper;
            let outer = if fabs(previous_pitch) > pitch_lower {
                1.0
            } else {
                previous_pitch / pitch_lower
            };
            let weight = fabs(
                inner.max(BLEND_WEIGHT_FLOOR) * INNER_BAND_SHARE
                    + outer.max(BLEND_WEIGHT_FLOOR) * OUTER_BAND_SHARE,
            );

            let fresh_yaw = atan2(2.0 * q0 * q3 - 2.0 * q1 * q2, 1.0 - 2.0 * sqx - 2.0 * sqz);
            previous_yaw * weight + fresh_yaw * (1.0 - weight)
        };
        let pitch = asin(2.0 * test);
        let roll = atan2(2.0 * q1 * q3 - 2.0 * q0 * q2, 1.0 - 2.0 * sqy - 2.0 * sqz);

        self.smoothed = Angles::new(yaw as f32, pitch as f32, roll as f32);
        self.smoothed
    }

    /// Smoothed yaw, pitch and roll in degrees
    pub fn angles_deg(&mut self) -> Angles {
        self.angles().to_degrees()
    }

    // Private helper methods

    /// Rate of change of quaternion from gyroscope: 0.5 * q ⊗ (0, g)
    fn gyroscope_rate(q: Quaternion<f32>, gx: f32, gy: f32, gz: f32) -> Quaternion<f32> {
        let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);
        Quaternion::new(
            0.5 * (-q1 * gx - q2 * gy - q3 * gz),
            0.5 * (q0 * gx + q2 * gz - q3 * gy),
            0.5 * (q0 * gy - q1 * gz + q3 * gx),
            0.5 * (q0 * gz + q1 * gy - q2 * gx),
        )
    }

    /// Normalised gradient scaled by beta
    fn feedback(&self, gradient: Quaternion<f32>) -> Quaternion<f32> {
        let recip_norm = fast_inverse_sqrt(norm_squared(&gradient));
        gradient * recip_norm * self.settings.beta
    }

    /// Integrate rate of change over one sample period, then renormalise
    fn integrate(&mut self, q_dot: Quaternion<f32>) {
        let q = self.quaternion + q_dot * (1.0 / self.settings.sample_frequency);
        let recip_norm = fast_inverse_sqrt(norm_squared(&q));
        self.quaternion = q * recip_norm;
    }
}

impl Default for Madgwick {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of squares in q0, q1, q2, q3 order
fn norm_squared(q: &Quaternion<f32>) -> f32 {
    q.w * q.w + q.i * q.i + q.j * q.j + q.k * q.k
}
