//! Numeric helpers shared by the filter

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Magic constant of the classic fast inverse square root
const INV_SQRT_MAGIC: i32 = 0x5f3759df;

/// Fast inverse square root
///
/// Approximates `1 / sqrt(x)` with the bit-level trick followed by a single
/// Newton-Raphson iteration, giving a relative error of roughly 0.17%.
/// Filter tuning (beta) depends on this error profile, so the single
/// iteration must stay.
///
/// The result is only meaningful for `x > 0`. Zero, negative and non-finite
/// inputs return an unspecified value; callers guard degenerate vectors first.
pub fn fast_inverse_sqrt(x: f32) -> f32 {
    let half_x = 0.5 * x;
    let i = x.to_bits() as i32;
    let i = INV_SQRT_MAGIC.wrapping_sub(i >> 1);
    let y = f32::from_bits(i as u32);

    y * (1.5 - (half_x * y * y))
}
