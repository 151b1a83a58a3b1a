//! Sampled BRDF: a sample set tagged with its coordinate system.

use crate::{
    coord::{CoordSysKind, IN_PHI, IN_THETA, OUT_PHI, OUT_THETA},
    model::{ReflectanceModel, MIN_COS_THETA},
    samples::{SampleSet, SourceType},
    view::CoordView,
};
use base::{color::ColorModel, error::BxdfError, math::Vec3};

/// A BRDF sampled on a dense grid of angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Brdf {
    coord_sys: CoordSysKind,
    samples: SampleSet,
}

impl Brdf {
    /// Wraps a sample set, checking its axes against the bounds of the
    /// coordinate system.
    pub fn new(coord_sys: CoordSysKind, samples: SampleSet) -> Result<Self, BxdfError> {
        samples.check_domain(coord_sys.max_angles())?;
        Ok(Self { coord_sys, samples })
    }

    /// Samples an analytic model on a grid.
    ///
    /// Monochromatic data stores the mean of the model's three channels.
    /// Directions closer to the horizon than [`MIN_COS_THETA`] are tilted up
    /// before evaluation, and non-finite values are stored as zero.
    pub fn from_model(
        model: &dyn ReflectanceModel,
        coord_sys: CoordSysKind,
        angles: [Box<[f32]>; 4],
        color_model: ColorModel,
    ) -> Result<Self, BxdfError> {
        if color_model == ColorModel::Spectral {
            return Err(BxdfError::UnsupportedColorModel(color_model));
        }
        let samples = SampleSet::new(angles, color_model, Box::new([]), SourceType::Generated)?;
        let mut brdf = Self::new(coord_sys, samples)?;
        log::debug!(
            "sampling {} on a {:?} {} grid",
            model.name(),
            brdf.samples.shape(),
            coord_sys
        );

        let mut n_non_finite = 0usize;
        let indices: Vec<_> = brdf.samples.indices().collect();
        for index in indices {
            let (in_dir, out_dir) = coord_sys.to_xyz(brdf.samples.angles_at(index));
            let value = model.value(&lift_above_horizon(in_dir), &lift_above_horizon(out_dir));
            let value = if value.is_finite() {
                value
            } else {
                n_non_finite += 1;
                Vec3::ZERO
            };
            let spectrum = brdf.samples.spectrum_mut(index);
            match color_model {
                ColorModel::Monochromatic => spectrum[0] = value.element_sum() / 3.0,
                _ => spectrum.copy_from_slice(&value.to_array()),
            }
        }
        if n_non_finite > 0 {
            log::warn!(
                "{} of {} samples of {} were not finite and have been set to zero",
                n_non_finite,
                brdf.samples.n_samples(),
                model.name()
            );
        }
        Ok(brdf)
    }

    /// Coordinate system of the angle axes.
    pub fn coord_sys(&self) -> CoordSysKind { self.coord_sys }

    /// The underlying samples.
    pub fn samples(&self) -> &SampleSet { &self.samples }

    /// Mutable access to the spectra and metadata. Axes cannot be changed.
    pub fn samples_mut(&mut self) -> &mut SampleSet { &mut self.samples }

    /// Consumes the BRDF and returns its samples.
    pub fn into_samples(self) -> SampleSet { self.samples }

    /// Borrowed interpolating view.
    pub fn view(&self) -> CoordView<'_> { CoordView::new(self) }

    /// True when the incoming azimuth axis holds a single sample.
    pub fn is_isotropic(&self) -> bool { self.samples.is_isotropic() }

    /// Provenance of the samples.
    pub fn source(&self) -> SourceType { self.samples.source() }

    /// Number of incoming polar samples.
    pub fn n_in_theta(&self) -> usize { self.samples.n_angles(IN_THETA) }

    /// Number of incoming azimuth samples.
    pub fn n_in_phi(&self) -> usize { self.samples.n_angles(IN_PHI) }

    /// Number of outgoing (or specular) polar samples.
    pub fn n_out_theta(&self) -> usize { self.samples.n_angles(OUT_THETA) }

    /// Number of outgoing (or specular) azimuth samples.
    pub fn n_out_phi(&self) -> usize { self.samples.n_angles(OUT_PHI) }

    /// Interpolated spectrum for a pair of directions in the local frame.
    pub fn spectrum_at(&self, in_dir: &Vec3, out_dir: &Vec3) -> Box<[f32]> {
        let mut out = vec![0.0; self.samples.n_channels()].into_boxed_slice();
        self.view().spectrum_at(in_dir, out_dir, &mut out);
        out
    }

    /// Builds a new BRDF on another grid, possibly in another coordinate
    /// system. Spectral metadata and provenance are carried over.
    ///
    /// Within the same coordinate system values are interpolated directly in
    /// angle space; otherwise each target grid point is converted to a pair of
    /// directions and looked up through them.
    pub fn resample(
        &self,
        coord_sys: CoordSysKind,
        angles: [Box<[f32]>; 4],
    ) -> Result<Brdf, BxdfError> {
        let mut samples = SampleSet::new(
            angles,
            self.samples.color_model(),
            self.samples.wavelengths().into(),
            self.samples.source(),
        )?;
        samples.check_domain(coord_sys.max_angles())?;
        log::debug!(
            "resampling {:?} {} grid onto {:?} {} grid",
            self.samples.shape(),
            self.coord_sys,
            samples.shape(),
            coord_sys
        );

        let view = self.view();
        let same_system = coord_sys == self.coord_sys;
        let indices: Vec<_> = samples.indices().collect();
        for index in indices {
            let angles = samples.angles_at(index);
            let spectrum = samples.spectrum_mut(index);
            if same_system {
                view.spectrum_at_angles(angles, spectrum);
            } else {
                let (in_dir, out_dir) = coord_sys.to_xyz(angles);
                view.spectrum_at(&in_dir, &out_dir, spectrum);
            }
        }
        Brdf::new(coord_sys, samples)
    }
}

fn lift_above_horizon(dir: Vec3) -> Vec3 {
    if dir.z >= MIN_COS_THETA {
        return dir;
    }
    let planar = Vec3::new(dir.x, dir.y, 0.0).normalize_or_zero();
    if planar == Vec3::ZERO {
        return Vec3::Z;
    }
    let sin = (1.0 - MIN_COS_THETA * MIN_COS_THETA).sqrt();
    planar * sin + Vec3::Z * MIN_COS_THETA
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Lambertian, WardIsotropic};
    use base::math::linspace;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn grid(n: [usize; 4]) -> [Box<[f32]>; 4] {
        [
            linspace(n[0], 0.0, FRAC_PI_2),
            if n[1] == 1 {
                Box::new([0.0])
            } else {
                linspace(n[1], 0.0, TAU)
            },
            linspace(n[2], 0.0, FRAC_PI_2),
            linspace(n[3], 0.0, TAU),
        ]
    }

    #[test]
    fn rejects_out_of_domain_axes() {
        let mut angles = grid([2, 1, 3, 5]);
        angles[2] = Box::new([0.0, 2.0]);
        let samples = SampleSet::new(
            angles,
            ColorModel::Monochromatic,
            Box::new([]),
            SourceType::Measured,
        )
        .unwrap();
        assert!(matches!(
            Brdf::new(CoordSysKind::Spherical, samples),
            Err(BxdfError::AngleOutOfDomain { axis: 2, .. })
        ));
    }

    #[test]
    fn generates_lambertian() {
        let model = Lambertian {
            color: Vec3::new(0.3, 0.6, 0.9),
        };
        let brdf = Brdf::from_model(
            &model,
            CoordSysKind::Spherical,
            grid([3, 1, 7, 9]),
            ColorModel::Rgb,
        )
        .unwrap();
        assert_eq!(brdf.source(), SourceType::Generated);
        assert_eq!(brdf.samples().shape(), [3, 1, 7, 9]);
        for index in brdf.samples().indices() {
            let s = brdf.samples().spectrum(index);
            approx::assert_relative_eq!(s[0], 0.3 / PI, epsilon = 1e-6);
            approx::assert_relative_eq!(s[2], 0.9 / PI, epsilon = 1e-6);
        }

        let mono = Brdf::from_model(
            &model,
            CoordSysKind::Spherical,
            grid([2, 1, 2, 2]),
            ColorModel::Monochromatic,
        )
        .unwrap();
        approx::assert_relative_eq!(mono.samples().spectra()[0], 0.6 / PI, epsilon = 1e-6);

        assert_eq!(
            Brdf::from_model(
                &model,
                CoordSysKind::Spherical,
                grid([2, 1, 2, 2]),
                ColorModel::Spectral
            ),
            Err(BxdfError::UnsupportedColorModel(ColorModel::Spectral))
        );
    }

    #[test]
    fn generated_grazing_samples_are_finite() {
        let model = WardIsotropic::default();
        let brdf = Brdf::from_model(
            &model,
            CoordSysKind::Specular,
            grid([4, 1, 10, 13]),
            ColorModel::Rgb,
        )
        .unwrap();
        assert!(brdf
            .samples()
            .spectra()
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn resampling_between_systems_preserves_constant() {
        let model = Lambertian::default();
        let brdf = Brdf::from_model(
            &model,
            CoordSysKind::Spherical,
            grid([4, 1, 10, 13]),
            ColorModel::Rgb,
        )
        .unwrap();
        let resampled = brdf
            .resample(CoordSysKind::Specular, grid([5, 1, 19, 9]))
            .unwrap();
        assert_eq!(resampled.coord_sys(), CoordSysKind::Specular);
        assert_eq!(resampled.samples().shape(), [5, 1, 19, 9]);
        for v in resampled.samples().spectra() {
            approx::assert_relative_eq!(*v, 0.5 / PI, epsilon = 1e-5);
        }
    }

    #[test]
    fn resampling_matches_model_away_from_horizon() {
        let model = WardIsotropic::new(Vec3::ONE, 0.5);
        let dense = Brdf::from_model(
            &model,
            CoordSysKind::Spherical,
            grid([46, 1, 91, 181]),
            ColorModel::Monochromatic,
        )
        .unwrap();
        let coarse = dense
            .resample(CoordSysKind::Specular, grid([4, 1, 7, 9]))
            .unwrap();
        for index in coarse.samples().indices() {
            let (vi, vo) = coarse.view().to_xyz(index);
            if vi.z < 0.5 || vo.z < 0.5 {
                continue;
            }
            let expected = model.value(&vi, &vo).x;
            let actual = coarse.samples().spectrum(index)[0];
            approx::assert_relative_eq!(actual, expected, max_relative = 0.05);
        }
    }

    #[test]
    fn lifts_directions() {
        let lifted = lift_above_horizon(Vec3::new(1.0, 0.0, -0.2));
        approx::assert_relative_eq!(lifted.z, MIN_COS_THETA);
        approx::assert_relative_eq!(lifted.length(), 1.0, epsilon = 1e-6);
        assert_eq!(lift_above_horizon(Vec3::NEG_Z), Vec3::Z);
        assert_eq!(lift_above_horizon(Vec3::Z), Vec3::Z);
    }
}
