//! Math utilities.

use crate::{rad, units::Radians};
use num_traits::{AsPrimitive, Float};

pub use glam::{DVec3, Mat3, Vec3};

/// Equality test of two floating point numbers.
pub fn ulp_eq(a: f32, b: f32) -> bool {
    let diff = (a - b).abs();
    let a_abs = a.abs();
    let b_abs = b.abs();
    if a == b {
        true
    } else if a == 0.0 || b == 0.0 || a_abs < f32::MIN_POSITIVE || b_abs < f32::MIN_POSITIVE {
        diff < (f32::MIN_POSITIVE * f32::EPSILON)
    } else {
        (diff / f32::min(a_abs + b_abs, f32::MAX)) < f32::EPSILON
    }
}

/// Spherical coordinate on the unit sphere, in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sph2 {
    /// Zenith angle (polar angle) in radians. 0 is the zenith, pi is the
    /// nadir.
    pub theta: Radians,
    /// Azimuth angle in radians, always between 0 and 2pi, measured from the
    /// positive x-axis towards the positive y-axis.
    pub phi: Radians,
}

impl Sph2 {
    /// Create a new spherical coordinate.
    pub const fn new(zenith: Radians, azimuth: Radians) -> Self {
        Self {
            theta: zenith,
            phi: azimuth,
        }
    }

    /// Create a new coordinate with zenith and azimuth angles set to 0.
    pub const fn zero() -> Self {
        Self {
            theta: Radians::ZERO,
            phi: Radians::ZERO,
        }
    }
}

/// Conversion from spherical coordinate system to cartesian coordinate system.
///
/// # Arguments
///
/// * `zenith` - polar angle
/// * `azimuth` - azimuthal angle
pub fn sph_to_cart(zenith: Radians, azimuth: Radians) -> Vec3 {
    Vec3::new(
        zenith.sin() * azimuth.cos(),
        zenith.sin() * azimuth.sin(),
        zenith.cos(),
    )
}

/// Conversion from cartesian coordinate system to spherical coordinate system.
///
/// The azimuth is returned in `[0, 2π)`. A zero vector maps to the zenith.
pub fn cart_to_sph(v: Vec3) -> Sph2 {
    let rho = v.length();
    if rho == 0.0 {
        return Sph2::zero();
    }
    let theta = rad!((v.z * rcp_f32(rho)).clamp(-1.0, 1.0).acos());
    let mut phi = rad!(v.y.atan2(v.x));
    if phi < Radians::ZERO {
        phi += Radians::TAU;
    }
    if phi.value >= std::f32::consts::TAU {
        phi = Radians::ZERO;
    }
    Sph2::new(theta, phi)
}

/// Returns the reciprocal of the given value, infinity with the sign of `x`
/// for zero.
#[inline(always)]
pub fn rcp_f32(x: f32) -> f32 {
    if x == 0.0 {
        return f32::INFINITY * x.signum();
    }
    1.0 / x
}

/// Returns the square of the given value.
#[inline(always)]
pub fn sqr<F: Float>(x: F) -> F { x * x }

/// Converts a fixed-size array of one primitive numeric type into another,
/// componentwise, with `as` semantics (narrowing truncates or rounds).
pub fn convert<T, U, const N: usize>(v: [T; N]) -> [U; N]
where
    T: AsPrimitive<U>,
    U: Copy + 'static,
{
    v.map(|x| x.as_())
}

/// Widens a single precision vector.
#[inline]
pub fn widen(v: Vec3) -> DVec3 { DVec3::from_array(convert::<f32, f64, 3>(v.to_array())) }

/// Narrows a double precision vector.
#[inline]
pub fn narrow(v: DVec3) -> Vec3 { Vec3::from_array(convert::<f64, f32, 3>(v.to_array())) }

/// Returns a new array with `value` appended to the end of `arr`.
///
/// The whole array is reallocated and copied.
pub fn append<T: Clone>(arr: &[T], value: T) -> Box<[T]> {
    let mut out = Vec::with_capacity(arr.len() + 1);
    out.extend_from_slice(arr);
    out.push(value);
    out.into_boxed_slice()
}

/// Returns a new array with `value` inserted at the front of `arr`.
///
/// The whole array is reallocated and copied.
pub fn prepend<T: Clone>(arr: &[T], value: T) -> Box<[T]> {
    let mut out = Vec::with_capacity(arr.len() + 1);
    out.push(value);
    out.extend_from_slice(arr);
    out.into_boxed_slice()
}

/// Returns `n` evenly spaced values over `[start, stop]`.
///
/// Both end points are included exactly. A single sample gives `[start]`,
/// zero samples an empty array.
pub fn linspace(n: usize, start: f32, stop: f32) -> Box<[f32]> {
    match n {
        0 => Box::new([]),
        1 => Box::new([start]),
        _ => {
            let (a, b) = (start as f64, stop as f64);
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        (a + (b - a) * (i as f64 / last)) as f32
                    }
                })
                .collect()
        }
    }
}

/// Returns true if the values never decrease.
pub fn is_sorted_ascending(values: &[f32]) -> bool { values.windows(2).all(|w| w[0] <= w[1]) }

/// Converts a slice of radian values into degrees.
pub fn to_degrees(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .map(|&v| Radians::new(v).in_degrees().value())
        .collect()
}

/// Converts a slice of degree values into radians.
pub fn to_radians(values: &[f32]) -> Box<[f32]> {
    values
        .iter()
        .map(|&v| crate::deg!(v).in_radians().value())
        .collect()
}
