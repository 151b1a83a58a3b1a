//! Dense angular and spectral sample grids.

use crate::coord::{ANGLE_EPSILON, IN_PHI};
use base::{color::ColorModel, error::BxdfError, math::is_sorted_ascending};
use std::{
    fmt::{Display, Formatter},
    ops::{Index, IndexMut},
    str::FromStr,
};

/// Where the samples come from. Only used as provenance in file headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum SourceType {
    /// Measured with a gonioreflectometer or simulated.
    #[default]
    Measured,
    /// Evaluated from an analytic model.
    Generated,
    /// Derived from other data by editing.
    Edited,
}

impl SourceType {
    /// Keyword used in file headers.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SourceType::Measured => "Measured",
            SourceType::Generated => "Generated",
            SourceType::Edited => "Edited",
        }
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Measured" => Ok(SourceType::Measured),
            "Generated" => Ok(SourceType::Generated),
            "Edited" => Ok(SourceType::Edited),
            _ => Err(format!("unknown source type '{}'", s)),
        }
    }
}

/// Checks that an axis is non-empty, ascending and inside `[0, max]`.
pub(crate) fn validate_axis(axis: usize, values: &[f32], max: f32) -> Result<(), BxdfError> {
    if values.is_empty() {
        return Err(BxdfError::EmptyAxis { axis });
    }
    if values.iter().any(|v| !v.is_finite()) || !is_sorted_ascending(values) {
        return Err(BxdfError::UnsortedAxis { axis });
    }
    let (first, last) = (values[0], values[values.len() - 1]);
    if first < -ANGLE_EPSILON {
        return Err(BxdfError::AngleOutOfDomain {
            axis,
            value: first,
            max,
        });
    }
    if last > max + ANGLE_EPSILON {
        return Err(BxdfError::AngleOutOfDomain {
            axis,
            value: last,
            max,
        });
    }
    Ok(())
}

/// Resolves the wavelength array of a color model.
///
/// Spectral data needs one wavelength per channel. Other models take either an
/// empty array, replaced by zeros, or one entry per channel.
fn resolve_wavelengths(
    color_model: ColorModel,
    wavelengths: Box<[f32]>,
) -> Result<Box<[f32]>, BxdfError> {
    match color_model {
        ColorModel::Spectral if wavelengths.is_empty() => Err(BxdfError::MissingWavelengths),
        ColorModel::Spectral => Ok(wavelengths),
        _ => {
            let expected = color_model.n_channels(0);
            match wavelengths.len() {
                0 => Ok(vec![0.0; expected].into_boxed_slice()),
                n if n == expected => Ok(wavelengths),
                n => Err(BxdfError::ChannelMismatch {
                    expected,
                    actual: n,
                }),
            }
        }
    }
}

/// Dense grid of spectra over four angle axes.
///
/// The axes are, in order, incoming polar, incoming azimuth, outgoing polar
/// and outgoing azimuth, all in radians. What the outgoing angles measure
/// depends on the coordinate system of the owning [`crate::Brdf`].
///
/// Spectra are stored row-major, indexed `[i0][i1][i2][i3][channel]`. Axis
/// arrays are fixed at construction; resampling builds a new set.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    angles: [Box<[f32]>; 4],
    wavelengths: Box<[f32]>,
    color_model: ColorModel,
    source: SourceType,
    spectra: Box<[f32]>,
}

impl SampleSet {
    /// Creates a zero-filled sample set.
    ///
    /// Fails if an axis is empty, not ascending or negative, or if the
    /// wavelengths do not match the color model. Upper bounds of the axes are
    /// checked by [`crate::Brdf::new`].
    pub fn new(
        angles: [Box<[f32]>; 4],
        color_model: ColorModel,
        wavelengths: Box<[f32]>,
        source: SourceType,
    ) -> Result<Self, BxdfError> {
        for (axis, values) in angles.iter().enumerate() {
            validate_axis(axis, values, f32::INFINITY)?;
        }
        let wavelengths = resolve_wavelengths(color_model, wavelengths)?;
        let n_samples: usize = angles.iter().map(|a| a.len()).product();
        let spectra = vec![0.0; n_samples * wavelengths.len()].into_boxed_slice();
        Ok(Self {
            angles,
            wavelengths,
            color_model,
            source,
            spectra,
        })
    }

    /// Creates a sample set from existing spectra.
    pub fn from_spectra(
        angles: [Box<[f32]>; 4],
        color_model: ColorModel,
        wavelengths: Box<[f32]>,
        source: SourceType,
        spectra: Box<[f32]>,
    ) -> Result<Self, BxdfError> {
        let mut samples = Self::new(angles, color_model, wavelengths, source)?;
        if spectra.len() != samples.spectra.len() {
            return Err(BxdfError::ChannelMismatch {
                expected: samples.spectra.len(),
                actual: spectra.len(),
            });
        }
        samples.spectra = spectra;
        Ok(samples)
    }

    /// Number of samples along each axis.
    pub fn shape(&self) -> [usize; 4] { [0, 1, 2, 3].map(|axis| self.angles[axis].len()) }

    /// Number of samples along one axis.
    pub fn n_angles(&self, axis: usize) -> usize { self.angles[axis].len() }

    /// Sample positions of one axis, in radians.
    pub fn angles(&self, axis: usize) -> &[f32] { &self.angles[axis] }

    /// One sample position, in radians.
    pub fn angle(&self, axis: usize, index: usize) -> f32 { self.angles[axis][index] }

    /// The four angles of a grid point.
    pub fn angles_at(&self, index: [usize; 4]) -> [f32; 4] {
        [0, 1, 2, 3].map(|axis| self.angles[axis][index[axis]])
    }

    /// Number of grid points.
    pub fn n_samples(&self) -> usize { self.angles.iter().map(|a| a.len()).product() }

    /// Number of values per spectrum.
    pub fn n_channels(&self) -> usize { self.wavelengths.len() }

    /// Wavelengths in nanometres, zeros unless the model is spectral.
    pub fn wavelengths(&self) -> &[f32] { &self.wavelengths }

    /// Color model of the spectra.
    pub fn color_model(&self) -> ColorModel { self.color_model }

    /// Retags the spectra with another model of the same channel count.
    pub fn set_color_model(&mut self, color_model: ColorModel) -> Result<(), BxdfError> {
        let expected = color_model.n_channels(self.n_channels());
        if expected != self.n_channels() {
            return Err(BxdfError::ChannelMismatch {
                expected,
                actual: self.n_channels(),
            });
        }
        if color_model != ColorModel::Spectral && self.color_model == ColorModel::Spectral {
            self.wavelengths.iter_mut().for_each(|w| *w = 0.0);
        }
        self.color_model = color_model;
        Ok(())
    }

    /// Provenance of the samples.
    pub fn source(&self) -> SourceType { self.source }

    /// Changes the provenance of the samples.
    pub fn set_source(&mut self, source: SourceType) { self.source = source; }

    /// True when the incoming azimuth axis holds a single sample.
    pub fn is_isotropic(&self) -> bool { self.angles[IN_PHI].len() == 1 }

    /// Offset of the first channel of a grid point in the flat storage.
    pub fn offset(&self, index: [usize; 4]) -> usize {
        let [_, n1, n2, n3] = self.shape();
        (((index[0] * n1 + index[1]) * n2 + index[2]) * n3 + index[3]) * self.n_channels()
    }

    /// Spectrum at a grid point.
    pub fn spectrum(&self, index: [usize; 4]) -> &[f32] {
        let offset = self.offset(index);
        &self.spectra[offset..offset + self.n_channels()]
    }

    /// Mutable spectrum at a grid point.
    pub fn spectrum_mut(&mut self, index: [usize; 4]) -> &mut [f32] {
        let offset = self.offset(index);
        let n = self.n_channels();
        &mut self.spectra[offset..offset + n]
    }

    /// All values, row-major.
    pub fn spectra(&self) -> &[f32] { &self.spectra }

    /// Iterates over the spectra, row-major.
    pub fn spectra_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let n = self.wavelengths.len();
        self.spectra.chunks_exact_mut(n)
    }

    /// Iterates over all grid indices in storage order.
    pub fn indices(&self) -> impl Iterator<Item = [usize; 4]> {
        let [n0, n1, n2, n3] = self.shape();
        (0..n0).flat_map(move |i0| {
            (0..n1).flat_map(move |i1| {
                (0..n2).flat_map(move |i2| (0..n3).map(move |i3| [i0, i1, i2, i3]))
            })
        })
    }

    /// Checks every axis against its upper bound.
    pub(crate) fn check_domain(&self, max: [f32; 4]) -> Result<(), BxdfError> {
        for (axis, values) in self.angles.iter().enumerate() {
            validate_axis(axis, values, max[axis])?;
        }
        Ok(())
    }
}

impl Index<[usize; 4]> for SampleSet {
    type Output = [f32];

    fn index(&self, index: [usize; 4]) -> &Self::Output { self.spectrum(index) }
}

impl IndexMut<[usize; 4]> for SampleSet {
    fn index_mut(&mut self, index: [usize; 4]) -> &mut Self::Output { self.spectrum_mut(index) }
}

/// Reduced table of spectra over the incoming polar angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet2D {
    thetas: Box<[f32]>,
    wavelengths: Box<[f32]>,
    color_model: ColorModel,
    source: SourceType,
    spectra: Box<[f32]>,
}

impl SampleSet2D {
    /// Creates a zero-filled table. Polar angles must lie in `[0, π/2]`.
    pub fn new(
        thetas: Box<[f32]>,
        color_model: ColorModel,
        wavelengths: Box<[f32]>,
        source: SourceType,
    ) -> Result<Self, BxdfError> {
        validate_axis(0, &thetas, std::f32::consts::FRAC_PI_2)?;
        let wavelengths = resolve_wavelengths(color_model, wavelengths)?;
        let spectra = vec![0.0; thetas.len() * wavelengths.len()].into_boxed_slice();
        Ok(Self {
            thetas,
            wavelengths,
            color_model,
            source,
            spectra,
        })
    }

    /// Number of incoming polar samples.
    pub fn n_thetas(&self) -> usize { self.thetas.len() }

    /// Incoming polar angles in radians.
    pub fn thetas(&self) -> &[f32] { &self.thetas }

    /// Number of values per spectrum.
    pub fn n_channels(&self) -> usize { self.wavelengths.len() }

    /// Wavelengths in nanometres, zeros unless the model is spectral.
    pub fn wavelengths(&self) -> &[f32] { &self.wavelengths }

    /// Color model of the spectra.
    pub fn color_model(&self) -> ColorModel { self.color_model }

    /// Provenance of the values.
    pub fn source(&self) -> SourceType { self.source }

    /// Spectrum at one incoming polar sample.
    pub fn spectrum(&self, index: usize) -> &[f32] {
        let n = self.n_channels();
        &self.spectra[index * n..(index + 1) * n]
    }

    /// Mutable spectrum at one incoming polar sample.
    pub fn spectrum_mut(&mut self, index: usize) -> &mut [f32] {
        let n = self.n_channels();
        &mut self.spectra[index * n..(index + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::math::linspace;
    use proptest::prelude::*;

    fn axes(n: [usize; 4]) -> [Box<[f32]>; 4] {
        [
            linspace(n[0], 0.0, 1.5),
            linspace(n[1], 0.0, 6.0),
            linspace(n[2], 0.0, 1.5),
            linspace(n[3], 0.0, 6.0),
        ]
    }

    #[test]
    fn rejects_invalid_axes() {
        let mut a = axes([2, 1, 3, 4]);
        a[2] = Box::new([]);
        assert_eq!(
            SampleSet::new(a, ColorModel::Rgb, Box::new([]), SourceType::Measured),
            Err(BxdfError::EmptyAxis { axis: 2 })
        );

        let mut a = axes([2, 1, 3, 4]);
        a[0] = Box::new([0.5, 0.1]);
        assert_eq!(
            SampleSet::new(a, ColorModel::Rgb, Box::new([]), SourceType::Measured),
            Err(BxdfError::UnsortedAxis { axis: 0 })
        );

        let mut a = axes([2, 1, 3, 4]);
        a[3] = Box::new([-0.5, 0.1]);
        assert!(matches!(
            SampleSet::new(a, ColorModel::Rgb, Box::new([]), SourceType::Measured),
            Err(BxdfError::AngleOutOfDomain { axis: 3, .. })
        ));
    }

    #[test]
    fn wavelengths_follow_color_model() {
        let err = SampleSet::new(
            axes([1, 1, 2, 2]),
            ColorModel::Spectral,
            Box::new([]),
            SourceType::Measured,
        );
        assert_eq!(err, Err(BxdfError::MissingWavelengths));

        let err = SampleSet::new(
            axes([1, 1, 2, 2]),
            ColorModel::Rgb,
            Box::new([450.0]),
            SourceType::Measured,
        );
        assert_eq!(
            err,
            Err(BxdfError::ChannelMismatch {
                expected: 3,
                actual: 1
            })
        );

        let ss = SampleSet::new(
            axes([1, 1, 2, 2]),
            ColorModel::Monochromatic,
            Box::new([]),
            SourceType::Measured,
        )
        .unwrap();
        assert_eq!(ss.wavelengths(), &[0.0]);
    }

    #[test]
    fn indexing_is_row_major() {
        let mut ss = SampleSet::new(
            axes([2, 3, 4, 5]),
            ColorModel::Rgb,
            Box::new([]),
            SourceType::Measured,
        )
        .unwrap();
        ss[[1, 2, 3, 4]].copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(ss.offset([1, 2, 3, 4]), ss.spectra().len() - 3);
        assert_eq!(&ss.spectra()[ss.spectra().len() - 3..], &[1.0, 2.0, 3.0]);
        assert_eq!(ss.offset([0, 0, 0, 1]), 3);
        assert_eq!(ss.offset([0, 0, 1, 0]), 15);
        assert_eq!(ss.indices().count(), ss.n_samples());
        assert_eq!(ss.indices().nth(5), Some([0, 0, 1, 0]));
        assert!(!ss.is_isotropic());
    }

    #[test]
    fn retag_color_model() {
        let mut ss = SampleSet::new(
            axes([1, 1, 2, 2]),
            ColorModel::Xyz,
            Box::new([]),
            SourceType::Measured,
        )
        .unwrap();
        assert!(ss.set_color_model(ColorModel::Rgb).is_ok());
        assert_eq!(ss.color_model(), ColorModel::Rgb);
        assert!(ss.set_color_model(ColorModel::Monochromatic).is_err());
    }

    #[test]
    fn table_2d() {
        let mut t = SampleSet2D::new(
            linspace(4, 0.0, std::f32::consts::FRAC_PI_2),
            ColorModel::Spectral,
            Box::new([400.0, 500.0, 600.0, 700.0, 800.0]),
            SourceType::Generated,
        )
        .unwrap();
        t.spectrum_mut(3)[4] = 0.25;
        assert_eq!(t.spectrum(3), &[0.0, 0.0, 0.0, 0.0, 0.25]);
        assert!(SampleSet2D::new(
            Box::new([0.0, 2.0]),
            ColorModel::Rgb,
            Box::new([]),
            SourceType::Generated
        )
        .is_err());
    }

    proptest! {
        #[test]
        fn channel_count_invariant(
            n0 in 1usize..5, n1 in 1usize..5, n2 in 1usize..6, n3 in 1usize..6,
            n_wl in 1usize..8, model in 0u8..4,
        ) {
            let (color_model, wavelengths): (ColorModel, Box<[f32]>) = match model {
                0 => (ColorModel::Monochromatic, Box::new([])),
                1 => (ColorModel::Rgb, Box::new([])),
                2 => (ColorModel::Xyz, Box::new([])),
                _ => (ColorModel::Spectral, linspace(n_wl, 380.0, 780.0)),
            };
            let ss = SampleSet::new(axes([n0, n1, n2, n3]), color_model, wavelengths, SourceType::Measured).unwrap();
            let n_channels = color_model.n_channels(n_wl);
            prop_assert_eq!(ss.n_channels(), n_channels);
            prop_assert_eq!(ss.spectra().len(), n0 * n1 * n2 * n3 * n_channels);
            prop_assert_eq!(ss.spectrum([n0 - 1, n1 - 1, n2 - 1, n3 - 1]).len(), n_channels);
            prop_assert_eq!(ss.is_isotropic(), n1 == 1);
        }
    }
}
