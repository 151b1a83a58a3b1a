//! Reflectance table dialect (SDR).
//!
//! One value per incoming polar angle (`sigma`) and channel, unscaled.

use crate::{
    io::{
        channel_label, color_model_keyword, parse_channel_label, parse_color_model,
        parse_source, write_angles, write_generator_comment, Tokens,
    },
    samples::{SampleSet2D, SourceType},
};
use base::{
    color::{xyz_to_srgb, ColorModel},
    error::{ParseError, ParseErrorKind, ReadFileError, ReadFileErrorKind, WriteFileError},
    utils::format_g,
};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// Writes a reflectance table.
pub fn write<P: AsRef<Path>>(path: P, table: &SampleSet2D) -> Result<(), WriteFileError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| WriteFileError::from_std_io_error(path, err))?;
    let mut writer = BufWriter::new(file);
    output(table, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|err| WriteFileError::from_std_io_error(path, err))?;
    log::info!("reflectance table written to {}", path.display());
    Ok(())
}

/// Formats a reflectance table into `writer`. XYZ spectra are converted to
/// sRGB sample by sample.
pub fn output<W: Write>(table: &SampleSet2D, writer: &mut W) -> std::io::Result<()> {
    let n_channels = table.n_channels();
    let color_model = table.color_model();
    write_generator_comment(writer)?;
    writeln!(writer, "Source {}", table.source())?;
    writeln!(
        writer,
        "TypeColorModel {}",
        color_model_keyword(color_model, n_channels)
    )?;
    write_angles(writer, "sigma", table.thetas())?;

    for channel in 0..n_channels {
        let label = channel_label(
            color_model,
            n_channels,
            channel,
            table.wavelengths()[channel],
        );
        writeln!(writer, "{}", label)?;
        writeln!(writer, " def")?;
        for i in 0..table.n_thetas() {
            let spectrum = table.spectrum(i);
            let value = if color_model == ColorModel::Xyz {
                xyz_to_srgb([spectrum[0], spectrum[1], spectrum[2]])[channel]
            } else {
                spectrum[channel]
            };
            write!(writer, " {}", format_g(value))?;
        }
        writeln!(writer)?;
        writeln!(writer, " enddef")?;
    }
    Ok(())
}

/// Reads an SDR file.
pub fn read<P: AsRef<Path>>(path: P) -> Result<SampleSet2D, ReadFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| ReadFileError::from_std_io_error(path, err))?;
    parse(BufReader::new(file)).map_err(|kind| ReadFileError::from_kind(path, kind))
}

/// Parses SDR content from a reader.
pub fn parse<R: BufRead>(mut reader: R) -> Result<SampleSet2D, ReadFileErrorKind> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(parse_str(&content)?)
}

/// Parses SDR content.
pub fn parse_str(content: &str) -> Result<SampleSet2D, ParseError> {
    let mut tokens = Tokens::new(content);
    let mut source = SourceType::Measured;
    let mut color = None;
    let mut thetas = None;

    while let Some(keyword) = tokens.peek() {
        match keyword {
            "Source" => {
                tokens.next()?;
                source = parse_source(&mut tokens)?;
            }
            "TypeColorModel" => {
                tokens.next()?;
                color = Some(parse_color_model(&mut tokens)?);
            }
            "sigma" => {
                tokens.next()?;
                thetas = Some(tokens.next_angles()?);
            }
            _ => break,
        }
    }
    let (color_model, n_channels) =
        color.ok_or_else(|| tokens.error(ParseErrorKind::MissingSection("TypeColorModel")))?;
    let thetas = thetas.ok_or_else(|| tokens.error(ParseErrorKind::MissingSection("sigma")))?;
    let n_thetas = thetas.len();
    let header_line = tokens.line();

    let mut wavelengths = Vec::new();
    let mut blocks = Vec::new();
    for channel in 0..n_channels {
        wavelengths.push(parse_channel_label(
            &mut tokens,
            color_model,
            n_channels,
            channel,
        )?);
        tokens.expect("def")?;
        let mut values = Vec::new();
        tokens.next_values(n_thetas, &mut values)?;
        tokens.expect("enddef")?;
        blocks.push(values);
    }

    let wavelengths = if color_model == ColorModel::Spectral {
        wavelengths.into_boxed_slice()
    } else {
        Box::new([])
    };
    let mut table = SampleSet2D::new(thetas, color_model, wavelengths, source)
        .map_err(|err| ParseError::new(header_line, ParseErrorKind::InvalidContent(err)))?;
    for (channel, values) in blocks.iter().enumerate() {
        for (i, value) in values.iter().enumerate() {
            table.spectrum_mut(i)[channel] = *value;
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::math::linspace;
    use std::f32::consts::FRAC_PI_2;

    fn table(color_model: ColorModel, wavelengths: Box<[f32]>) -> SampleSet2D {
        let mut table = SampleSet2D::new(
            linspace(4, 0.0, FRAC_PI_2),
            color_model,
            wavelengths,
            SourceType::Generated,
        )
        .unwrap();
        for i in 0..table.n_thetas() {
            for (c, v) in table.spectrum_mut(i).iter_mut().enumerate() {
                *v = 0.1 * (i + 1) as f32 + 0.01 * c as f32;
            }
        }
        table
    }

    #[test]
    fn layout() {
        let mut buf = Vec::new();
        output(&table(ColorModel::Monochromatic, Box::new([])), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with(";; This file is generated by bsdfio-"));
        assert_eq!(
            &lines[2..],
            &[
                "Source Generated",
                "TypeColorModel BW",
                "sigma 4",
                " 0 30 60 90",
                "bw",
                " def",
                " 0.1 0.2 0.3 0.4",
                " enddef",
            ]
        );
    }

    #[test]
    fn rgb_round_trip() {
        let original = table(ColorModel::Rgb, Box::new([]));
        let mut buf = Vec::new();
        output(&original, &mut buf).unwrap();
        let read_back = parse(buf.as_slice()).unwrap();
        assert_eq!(read_back.color_model(), ColorModel::Rgb);
        assert_eq!(read_back.source(), SourceType::Generated);
        for (a, b) in original.thetas().iter().zip(read_back.thetas()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-5);
        }
        for i in 0..original.n_thetas() {
            for (a, b) in original.spectrum(i).iter().zip(read_back.spectrum(i)) {
                approx::assert_relative_eq!(a, b, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn spectral_file() {
        let original = table(ColorModel::Spectral, Box::new([400.0, 500.0, 600.0]));
        let path = std::env::temp_dir().join(format!("bsdfio-table-{}.sdr", std::process::id()));
        write(&path, &original).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("TypeColorModel spectral 3\n"));
        assert!(text.contains("\nwl 500\n"));
        let read_back = read(&path).unwrap();
        assert_eq!(read_back.wavelengths(), &[400.0, 500.0, 600.0]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn parse_errors() {
        let err = parse_str("sigma 2\n 0 90\nbw\n def\n 0.5 0.5\n enddef\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSection("TypeColorModel"));

        let err = parse_str("TypeColorModel RGB\nsigma 1\n 0\nred\n def\n 0.5\n enddef\nblue\n")
            .unwrap_err();
        assert_eq!(err.line, 8);
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "green",
                found: "blue".into()
            }
        );

        let err = parse_str("TypeColorModel BW\nsigma 1\n 120\nbw\n def\n 0.5\n enddef\n")
            .unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidContent(_)));

        let err = parse_str("TypeColorModel BW\nsigma 18446744073709551615\n 0 90\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
        let err = parse_str("TypeColorModel spectral 99999999999\nsigma 1\n 0\nwl 400\n def\n 1\n enddef\n")
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }
}
