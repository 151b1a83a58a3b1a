//! Tabular text dialects.
//!
//! - [`ddr`]: full 4D grid in specular coordinates, values scaled by π.
//! - [`sdr`]: one value per incoming polar angle, unscaled.
//!
//! Both share the header keywords, the channel labelling and the number
//! formatting implemented here.

use crate::samples::SourceType;
use base::{color::ColorModel, error::ParseErrorKind, math::to_degrees, utils::format_g};
use std::io::Write;

pub mod ddr;
pub mod sdr;
mod tokens;

pub(crate) use tokens::Tokens;

/// Writes the generator comment followed by an empty line.
pub(crate) fn write_generator_comment<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(
        writer,
        ";; This file is generated by bsdfio-{}.\n",
        base::VERSION
    )
}

/// Keyword describing the channels after `TypeColorModel`.
///
/// A single channel is always `BW`, tristimulus data is always `RGB`.
pub(crate) fn color_model_keyword(color_model: ColorModel, n_channels: usize) -> String {
    if n_channels == 1 {
        String::from("BW")
    } else if color_model.is_tristimulus() {
        String::from("RGB")
    } else {
        format!("spectral {}", n_channels)
    }
}

/// Label opening the block of one channel.
pub(crate) fn channel_label(
    color_model: ColorModel,
    n_channels: usize,
    index: usize,
    wavelength: f32,
) -> String {
    if n_channels == 1 {
        String::from("bw")
    } else if color_model.is_tristimulus() {
        String::from(["red", "green", "blue"][index.min(2)])
    } else {
        format!("wl {}", format_g(wavelength))
    }
}

/// Writes `<keyword> <count>` followed by the angles in degrees.
pub(crate) fn write_angles<W: Write>(
    writer: &mut W,
    keyword: &str,
    radians: &[f32],
) -> std::io::Result<()> {
    writeln!(writer, "{} {}", keyword, radians.len())?;
    for degrees in to_degrees(radians) {
        write!(writer, " {}", format_g(degrees))?;
    }
    writeln!(writer)
}

/// Parses the value following `Source`.
pub(crate) fn parse_source(tokens: &mut Tokens) -> Result<SourceType, base::error::ParseError> {
    let token = tokens.next()?;
    token.parse::<SourceType>().map_err(|_| {
        tokens.error(ParseErrorKind::UnexpectedToken {
            expected: "Measured, Generated or Edited",
            found: token.to_string(),
        })
    })
}

/// Parses the value following `TypeColorModel`, returning the model and its
/// channel count.
pub(crate) fn parse_color_model(
    tokens: &mut Tokens,
) -> Result<(ColorModel, usize), base::error::ParseError> {
    let token = tokens.next()?;
    if token.eq_ignore_ascii_case("BW") {
        Ok((ColorModel::Monochromatic, 1))
    } else if token.eq_ignore_ascii_case("RGB") {
        Ok((ColorModel::Rgb, 3))
    } else if token.eq_ignore_ascii_case("spectral") {
        let n = tokens.next_usize()?;
        if n == 0 {
            return Err(tokens.error(ParseErrorKind::Unsupported(String::from(
                "spectral data without wavelengths",
            ))));
        }
        Ok((ColorModel::Spectral, n))
    } else {
        Err(tokens.error(ParseErrorKind::Unsupported(format!(
            "color model '{}'",
            token
        ))))
    }
}

/// Parses the label of channel `index`, returning its wavelength (0 unless
/// spectral).
pub(crate) fn parse_channel_label(
    tokens: &mut Tokens,
    color_model: ColorModel,
    n_channels: usize,
    index: usize,
) -> Result<f32, base::error::ParseError> {
    let token = tokens.next()?;
    let expected = match (n_channels, color_model) {
        (1, _) => "bw",
        (_, ColorModel::Spectral) => "wl",
        _ => ["red", "green", "blue"][index.min(2)],
    };
    if !token.eq_ignore_ascii_case(expected) {
        return Err(tokens.error(ParseErrorKind::UnexpectedToken {
            expected,
            found: token.to_string(),
        }));
    }
    if expected == "wl" {
        tokens.next_f32()
    } else {
        Ok(0.0)
    }
}
