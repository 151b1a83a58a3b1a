//! Color models and the XYZ to sRGB conversion.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// How the channels of a spectrum are interpreted.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModel {
    /// A single luminance channel.
    #[cfg_attr(feature = "cli", clap(name = "mono", alias = "bw"))]
    Monochromatic,
    /// Device dependent red, green and blue channels.
    Rgb,
    /// CIE 1931 XYZ tristimulus values.
    Xyz,
    /// One channel per wavelength.
    Spectral,
}

impl ColorModel {
    /// Returns the number of channels a spectrum has under this model.
    ///
    /// Spectral spectra have one channel per wavelength.
    pub const fn n_channels(&self, n_wavelengths: usize) -> usize {
        match self {
            ColorModel::Monochromatic => 1,
            ColorModel::Rgb | ColorModel::Xyz => 3,
            ColorModel::Spectral => n_wavelengths,
        }
    }

    /// Returns true if the model carries three tristimulus channels.
    pub const fn is_tristimulus(&self) -> bool { matches!(self, Self::Rgb | Self::Xyz) }
}

impl Display for ColorModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ColorModel::Monochromatic => "Monochromatic",
                ColorModel::Rgb => "RGB",
                ColorModel::Xyz => "XYZ",
                ColorModel::Spectral => "Spectral",
            }
        )
    }
}

/// CIE XYZ (D65) to linear sRGB primaries.
pub const XYZ_TO_LINEAR_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Converts XYZ to linear sRGB. Out of gamut values are not clamped.
pub fn xyz_to_linear_srgb(xyz: [f32; 3]) -> [f32; 3] {
    let m = &XYZ_TO_LINEAR_SRGB;
    [
        m[0][0] * xyz[0] + m[0][1] * xyz[1] + m[0][2] * xyz[2],
        m[1][0] * xyz[0] + m[1][1] * xyz[1] + m[1][2] * xyz[2],
        m[2][0] * xyz[0] + m[2][1] * xyz[1] + m[2][2] * xyz[2],
    ]
}

/// sRGB transfer function. Negative values are clamped to zero, values
/// above one are encoded without clamping.
pub fn srgb_gamma(linear: f32) -> f32 {
    let c = linear.max(0.0);
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts XYZ tristimulus values to gamma encoded sRGB.
pub fn xyz_to_srgb(xyz: [f32; 3]) -> [f32; 3] { xyz_to_linear_srgb(xyz).map(srgb_gamma) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts() {
        assert_eq!(ColorModel::Monochromatic.n_channels(0), 1);
        assert_eq!(ColorModel::Rgb.n_channels(0), 3);
        assert_eq!(ColorModel::Xyz.n_channels(5), 3);
        assert_eq!(ColorModel::Spectral.n_channels(81), 81);
    }

    #[test]
    fn d65_white_is_white() {
        let rgb = xyz_to_srgb([0.95047, 1.0, 1.08883]);
        for c in rgb {
            approx::assert_abs_diff_eq!(c, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn negative_components_clamped() {
        // Pure X lies outside the sRGB gamut.
        let rgb = xyz_to_srgb([1.0, 0.0, 0.0]);
        assert_eq!(rgb[1], 0.0);
        assert!(rgb[0] > 1.0);
        assert!(rgb.iter().all(|c| *c >= 0.0));
    }

    #[test]
    fn gamma_is_continuous() {
        let below = srgb_gamma(0.0031308);
        let above = srgb_gamma(0.0031309);
        approx::assert_abs_diff_eq!(below, above, epsilon = 1e-5);
        assert_eq!(srgb_gamma(0.0), 0.0);
        approx::assert_abs_diff_eq!(srgb_gamma(1.0), 1.0, epsilon = 1e-6);
    }
}
