//! Angle units.

use crate::math::ulp_eq;
use core::fmt::Debug;
use std::{
    marker::PhantomData,
    ops::{Add, AddAssign},
};

/// Radian unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct URadian;

/// Degree unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UDegree;

/// Unit trait for angle units.
pub trait AngleUnit: Debug + Copy + Clone {
    /// The symbols of the unit, the first one is used for display.
    const SYMBOLS: &'static [&'static str];

    /// The conversion factor from radians.
    const FACTOR_FROM_RAD: f32;

    /// The conversion factor to radians.
    const FACTOR_TO_RAD: f32 = 1.0 / Self::FACTOR_FROM_RAD;

    /// The conversion factor from degrees.
    const FACTOR_FROM_DEG: f32;
}

impl AngleUnit for URadian {
    const SYMBOLS: &'static [&'static str] = &["rad", "rads", "radians"];
    const FACTOR_FROM_RAD: f32 = 1.0;
    const FACTOR_FROM_DEG: f32 = std::f32::consts::PI / 180.0;
}

impl AngleUnit for UDegree {
    const SYMBOLS: &'static [&'static str] = &["deg", "degs", "degrees", "°"];
    const FACTOR_FROM_RAD: f32 = 180.0 / std::f32::consts::PI;
    const FACTOR_FROM_DEG: f32 = 1.0;
}

/// Angle with unit.
#[derive(Copy, Clone)]
pub struct Angle<A: AngleUnit> {
    pub(crate) value: f32,
    pub(crate) unit: PhantomData<A>,
}

/// Type alias for `Angle<URadian>`.
pub type Radians = Angle<URadian>;

/// Type alias for `Angle<UDegree>`.
pub type Degrees = Angle<UDegree>;

impl<A: AngleUnit> Debug for Angle<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Angle {{ value: {}, unit: {} }}",
            self.value,
            A::SYMBOLS[0]
        )
    }
}

impl<A: AngleUnit, B: AngleUnit> PartialEq<Angle<B>> for Angle<A> {
    fn eq(&self, other: &Angle<B>) -> bool {
        ulp_eq(
            self.value * A::FACTOR_TO_RAD,
            other.value * B::FACTOR_TO_RAD,
        )
    }
}

impl<A: AngleUnit, B: AngleUnit> PartialOrd<Angle<B>> for Angle<A> {
    fn partial_cmp(&self, other: &Angle<B>) -> Option<core::cmp::Ordering> {
        let self_rad = self.value * A::FACTOR_TO_RAD;
        let other_rad = other.value * B::FACTOR_TO_RAD;
        self_rad.partial_cmp(&other_rad)
    }
}

impl<A: AngleUnit> Angle<A> {
    /// Zero angle.
    pub const ZERO: Self = Self::new(0.0);

    /// Create a new angle with unit.
    pub const fn new(value: f32) -> Self {
        Angle {
            value,
            unit: PhantomData,
        }
    }

    /// Get the value of the angle.
    pub const fn value(&self) -> f32 { self.value }

    /// Computes the sine of the angle.
    pub fn sin(&self) -> f32 { (self.value * A::FACTOR_TO_RAD).sin() }

    /// Computes the cosine of the angle.
    pub fn cos(&self) -> f32 { (self.value * A::FACTOR_TO_RAD).cos() }
}

impl Radians {
    /// PI in radians.
    pub const PI: Self = Self::new(std::f32::consts::PI);
    /// PI/2 in radians.
    pub const HALF_PI: Self = Self::new(std::f32::consts::FRAC_PI_2);
    /// 2 * PI in radians.
    pub const TAU: Self = Self::new(std::f32::consts::TAU);

    /// Converts to degrees.
    pub fn in_degrees(&self) -> Degrees { Angle::new(self.value * UDegree::FACTOR_FROM_RAD) }
}

impl Degrees {
    /// Converts to radians.
    pub fn in_radians(&self) -> Radians { Angle::new(self.value * URadian::FACTOR_FROM_DEG) }
}

impl<A: AngleUnit> Add for Angle<A> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output { Self::new(self.value + rhs.value) }
}

impl<A: AngleUnit> AddAssign for Angle<A> {
    fn add_assign(&mut self, rhs: Self) { self.value += rhs.value; }
}

/// Helper creating a new `Angle<URadian>`.
#[macro_export]
macro_rules! rad {
    ($value:expr) => {
        $crate::units::Angle::<$crate::units::URadian>::new($value)
    };
}

/// Helper creating a new `Angle<UDegree>`.
#[macro_export]
macro_rules! deg {
    ($value:expr) => {
        $crate::units::Angle::<$crate::units::UDegree>::new($value)
    };
}
