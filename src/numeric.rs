//! Numeric conversion helpers used across the crate.
//!
//! These utilities guard conversions between the floating-point world and the
//! integer cell lattice. Out-of-range inputs are clamped rather than wrapped so
//! a stray position can never alias a distant cell.

/// Floor an `f32` and clamp it into the `i32` domain. `NaN` maps to zero.
///
/// # Examples
/// ```
/// use warden::numeric::floor_to_i32;
/// assert_eq!(floor_to_i32(-0.5), -1);
/// assert_eq!(floor_to_i32(2.999), 2);
/// assert_eq!(floor_to_i32(f32::INFINITY), i32::MAX);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn floor_to_i32(value: f32) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let floored = f64::from(value).floor();
    floored.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Ceil an `f32` into the `u32` domain. Negative and `NaN` inputs yield zero.
///
/// # Examples
/// ```
/// use warden::numeric::ceil_to_u32;
/// assert_eq!(ceil_to_u32(2.1), 3);
/// assert_eq!(ceil_to_u32(2.0), 2);
/// assert_eq!(ceil_to_u32(-4.0), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The ceiled value is validated against the u32 domain."
)]
#[must_use]
pub fn ceil_to_u32(value: f32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    f64::from(value).ceil().min(f64::from(u32::MAX)) as u32
}

/// Widen a cell index into world-space `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Cell indices used in practice stay far below 2^24."
)]
#[must_use]
pub fn i32_to_f32(value: i32) -> f32 {
    value as f32
}

/// Widen a cell count into world-space `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Cell counts used in practice stay far below 2^24."
)]
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    value as f32
}
