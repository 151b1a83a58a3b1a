//! Read-only evaluation of a sampled BRDF between its grid points.

use crate::{
    coord::{CoordSysKind, ANGLE_EPSILON, AZIMUTHAL, IN_PHI, OUT_PHI},
    samples::SampleSet,
    Brdf,
};
use base::math::Vec3;
use std::f32::consts::{PI, TAU};

/// How positions outside of the sampled range of an axis are handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AxisMode {
    /// Nearest end sample.
    Clamp,
    /// Periodic over `[0, 2π)`, interpolating across the wrap.
    Wrap,
    /// `φ` and `2π - φ` share a value; the axis covers `[0, π]` only.
    Mirror,
}

/// Two neighbouring samples and their weights.
type Stencil = [(usize, f32); 2];

/// Borrowed view over a [`Brdf`] that evaluates it at arbitrary angles or
/// directions by multilinear interpolation of the native samples.
///
/// Polar axes clamp to their end samples. Azimuth axes wrap around 2π.
/// Isotropic data whose outgoing azimuth covers only `[0, π]` is mirrored
/// across the plane of incidence. That plane sits at outgoing azimuth 0 only
/// in specular coordinates or when the stored incoming azimuth is 0, so other
/// half-domain data wraps instead.
#[derive(Debug, Copy, Clone)]
pub struct CoordView<'a> {
    kind: CoordSysKind,
    samples: &'a SampleSet,
    modes: [AxisMode; 4],
}

impl<'a> CoordView<'a> {
    /// Creates a view over a BRDF.
    pub fn new(brdf: &'a Brdf) -> Self {
        let samples = brdf.samples();
        let incidence_at_zero = brdf.coord_sys() == CoordSysKind::Specular
            || samples.angle(IN_PHI, 0).abs() <= ANGLE_EPSILON;
        let modes = [0, 1, 2, 3].map(|axis| {
            let values = samples.angles(axis);
            if !AZIMUTHAL[axis] {
                AxisMode::Clamp
            } else if axis == OUT_PHI
                && samples.is_isotropic()
                && incidence_at_zero
                && values.len() > 1
                && values[values.len() - 1] <= PI + ANGLE_EPSILON
            {
                AxisMode::Mirror
            } else {
                AxisMode::Wrap
            }
        });
        Self {
            kind: brdf.coord_sys(),
            samples,
            modes,
        }
    }

    /// Coordinate system of the underlying samples.
    pub fn kind(&self) -> CoordSysKind { self.kind }

    /// The underlying samples.
    pub fn samples(&self) -> &'a SampleSet { self.samples }

    /// Whether the outgoing azimuth is mirrored from a half domain.
    pub fn mirrors_out_azimuth(&self) -> bool { self.modes[OUT_PHI] == AxisMode::Mirror }

    /// Directions of a grid point.
    pub fn to_xyz(&self, index: [usize; 4]) -> (Vec3, Vec3) {
        self.kind.to_xyz(self.samples.angles_at(index))
    }

    /// Interpolates the spectrum at four angles of this view's coordinate
    /// system. `out` must hold one value per channel.
    pub fn spectrum_at_angles(&self, angles: [f32; 4], out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.samples.n_channels());
        let stencils: [Stencil; 4] = [0, 1, 2, 3].map(|axis| {
            locate(self.samples.angles(axis), angles[axis], self.modes[axis])
        });
        out.iter_mut().for_each(|v| *v = 0.0);
        for &(i0, w0) in &stencils[0] {
            if w0 == 0.0 {
                continue;
            }
            for &(i1, w1) in &stencils[1] {
                if w1 == 0.0 {
                    continue;
                }
                for &(i2, w2) in &stencils[2] {
                    if w2 == 0.0 {
                        continue;
                    }
                    for &(i3, w3) in &stencils[3] {
                        if w3 == 0.0 {
                            continue;
                        }
                        let w = w0 * w1 * w2 * w3;
                        let spectrum = self.samples.spectrum([i0, i1, i2, i3]);
                        for (o, s) in out.iter_mut().zip(spectrum) {
                            *o += w * s;
                        }
                    }
                }
            }
        }
    }

    /// Interpolates the spectrum for a pair of directions in the local frame.
    ///
    /// Outgoing directions below the horizon are projected onto it. For
    /// isotropic data the pair is first rotated so that the incoming azimuth
    /// matches the stored one.
    pub fn spectrum_at(&self, in_dir: &Vec3, out_dir: &Vec3, out: &mut [f32]) {
        let mut clamped = Vec3::new(out_dir.x, out_dir.y, out_dir.z.max(0.0)).normalize_or_zero();
        if clamped == Vec3::ZERO {
            // Straight down: every horizon direction is equally close.
            clamped = Vec3::X;
        }
        let mut angles = self.kind.from_xyz(*in_dir, clamped);
        if self.samples.is_isotropic() {
            let stored = self.samples.angle(IN_PHI, 0);
            if self.kind == CoordSysKind::Spherical {
                angles[OUT_PHI] = (angles[OUT_PHI] - angles[IN_PHI] + stored).rem_euclid(TAU);
            }
            angles[IN_PHI] = stored;
        }
        self.spectrum_at_angles(angles, out);
    }
}

/// Finds the samples surrounding `x` on one axis.
fn locate(values: &[f32], x: f32, mode: AxisMode) -> Stencil {
    let n = values.len();
    if n == 1 {
        return [(0, 1.0), (0, 0.0)];
    }
    match mode {
        AxisMode::Clamp => locate_clamped(values, x),
        AxisMode::Mirror => {
            let x = x.rem_euclid(TAU);
            locate_clamped(values, if x > PI { TAU - x } else { x })
        }
        AxisMode::Wrap => {
            let x = if (0.0..=TAU).contains(&x) {
                x
            } else {
                x.rem_euclid(TAU)
            };
            let (first, last) = (values[0], values[n - 1]);
            if x >= first && x <= last {
                return locate_clamped(values, x);
            }
            let span = first + TAU - last;
            if span <= f32::EPSILON {
                return locate_clamped(values, x);
            }
            let d = if x > last { x - last } else { x + TAU - last };
            let t = (d / span).clamp(0.0, 1.0);
            [(n - 1, 1.0 - t), (0, t)]
        }
    }
}

fn locate_clamped(values: &[f32], x: f32) -> Stencil {
    let n = values.len();
    if x <= values[0] {
        return [(0, 1.0), (0, 0.0)];
    }
    if x >= values[n - 1] {
        return [(n - 1, 1.0), (n - 1, 0.0)];
    }
    // values[j] <= x < values[j + 1]
    let j = values.partition_point(|v| *v <= x) - 1;
    let width = values[j + 1] - values[j];
    let t = if width > 0.0 {
        (x - values[j]) / width
    } else {
        0.0
    };
    [(j, 1.0 - t), (j + 1, t)]
}
