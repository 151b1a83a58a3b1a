//! Angular parameterisations of a pair of directions.
//!
//! Both systems use four angles `[θi, φi, θ, φ]`; they differ in what the
//! last two measure. In the spherical system they are the polar and azimuth
//! angles of the outgoing direction in the local frame. In the specular system
//! they are measured in a frame whose pole is the mirror direction of the
//! incoming direction:
//!
//! `out = Rz(φi + π) · Ry(θi) · sph(θs, φs)`
//!
//! so `θs = 0` is the mirror direction and `φs = 0` points away from the
//! normal within the plane of incidence.

use base::math::{cart_to_sph, sph_to_cart, Mat3, Vec3};
use base::units::Radians;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::{Display, Formatter};

/// Index of the incoming polar axis.
pub const IN_THETA: usize = 0;
/// Index of the incoming azimuth axis.
pub const IN_PHI: usize = 1;
/// Index of the outgoing (or specular) polar axis.
pub const OUT_THETA: usize = 2;
/// Index of the outgoing (or specular) azimuth axis.
pub const OUT_PHI: usize = 3;

/// Upper bound of each angle axis, in radians.
pub const MAX_ANGLES: [f32; 4] = [FRAC_PI_2, TAU, FRAC_PI_2, TAU];

/// Whether an axis is periodic.
pub const AZIMUTHAL: [bool; 4] = [false, true, false, true];

/// Tolerance used when comparing angles against the domain bounds.
pub const ANGLE_EPSILON: f32 = 1.0e-4;

/// Coordinate system the angle axes of a [`crate::Brdf`] are expressed in.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CoordSysKind {
    /// Incoming and outgoing directions in the local frame.
    Spherical,
    /// Outgoing direction relative to the mirror direction.
    Specular,
}

impl CoordSysKind {
    /// Name used in messages.
    pub const fn name(&self) -> &'static str {
        match self {
            CoordSysKind::Spherical => "spherical",
            CoordSysKind::Specular => "specular",
        }
    }

    /// Upper bound of each angle axis, in radians.
    pub const fn max_angles(&self) -> [f32; 4] { MAX_ANGLES }

    /// Converts four angles into a pair of unit directions `(in, out)`.
    pub fn to_xyz(&self, angles: [f32; 4]) -> (Vec3, Vec3) {
        let [in_theta, in_phi, theta, phi] = angles;
        let in_dir = sph_to_cart(Radians::new(in_theta), Radians::new(in_phi));
        let out_dir = match self {
            CoordSysKind::Spherical => sph_to_cart(Radians::new(theta), Radians::new(phi)),
            CoordSysKind::Specular => {
                specular_frame(in_theta, in_phi)
                    * sph_to_cart(Radians::new(theta), Radians::new(phi))
            }
        };
        (in_dir, out_dir)
    }

    /// Converts a pair of directions into four angles.
    ///
    /// Azimuths are returned in `[0, 2π)`. Directions need not be normalised.
    pub fn from_xyz(&self, in_dir: Vec3, out_dir: Vec3) -> [f32; 4] {
        let wi = cart_to_sph(in_dir);
        let (in_theta, in_phi) = (wi.theta.value(), wi.phi.value());
        let wo = match self {
            CoordSysKind::Spherical => cart_to_sph(out_dir),
            CoordSysKind::Specular => {
                cart_to_sph(specular_frame(in_theta, in_phi).transpose() * out_dir)
            }
        };
        [in_theta, in_phi, wo.theta.value(), wo.phi.value()]
    }
}

impl Display for CoordSysKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

/// Rotation taking the specular frame into the local frame.
fn specular_frame(in_theta: f32, in_phi: f32) -> Mat3 {
    Mat3::from_rotation_z(in_phi + PI) * Mat3::from_rotation_y(in_theta)
}
