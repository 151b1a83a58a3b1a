//! Full 4D grid dialect (DDR).
//!
//! A DDR file stores a BRDF in specular coordinates. After the header come
//! the angle lists, in degrees, and one `def`/`enddef` block per channel.
//! Inside a block the values are ordered incoming azimuth (`psi`), incoming
//! polar (`sigma`), specular azimuth (`phi`) and specular polar (`theta`),
//! one line per specular azimuth. Stored values are the BRDF times π.
//!
//! ```text
//! Source Generated
//! TypeSym ASymmetrical
//! TypeColorModel BW
//! TypeData Luminance Absolute
//! sigma 2
//!  0 90
//! phi 2
//!  0 360
//! theta 3
//!  0 45 90
//! bw
//!  kbdf
//!   1.0 1.0
//!  def
//! ;; Psi = 0
//! ;; Sigma = 0
//!  1 1 1
//!  ...
//!  enddef
//! ```

use crate::{
    config::ExportConfig,
    coord::{CoordSysKind, IN_PHI, IN_THETA, OUT_PHI, OUT_THETA},
    io::{
        channel_label, color_model_keyword, parse_channel_label, parse_color_model,
        parse_source, write_angles, write_generator_comment, Tokens,
    },
    process::prepare_for_export,
    samples::{SampleSet, SourceType},
    Brdf,
};
use base::{
    color::{xyz_to_srgb, ColorModel},
    error::{
        BxdfError, ParseError, ParseErrorKind, ReadFileError, ReadFileErrorKind, WriteFileError,
    },
    units::Radians,
    utils::format_g,
};
use std::{
    f32::consts::PI,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

/// Writes a BRDF already in specular coordinates.
///
/// Nothing is created on disk when the BRDF is in another coordinate system.
pub fn write<P: AsRef<Path>>(path: P, brdf: &Brdf) -> Result<(), WriteFileError> {
    let path = path.as_ref();
    if brdf.coord_sys() != CoordSysKind::Specular {
        return Err(WriteFileError::from_bxdf_error(
            path,
            BxdfError::UnexpectedCoordSys {
                expected: CoordSysKind::Specular.name(),
                actual: brdf.coord_sys().name(),
            },
        ));
    }
    let file = File::create(path).map_err(|err| WriteFileError::from_std_io_error(path, err))?;
    let mut writer = BufWriter::new(file);
    output(brdf, &mut writer)
        .and_then(|_| writer.flush())
        .map_err(|err| WriteFileError::from_std_io_error(path, err))?;
    log::info!("BRDF written to {}", path.display());
    Ok(())
}

/// Writes any BRDF after running it through [`prepare_for_export`].
pub fn write_any<P: AsRef<Path>>(
    path: P,
    brdf: &Brdf,
    in_dir_dependent: bool,
    config: &ExportConfig,
) -> Result<(), WriteFileError> {
    let path = path.as_ref();
    let exported = prepare_for_export(brdf, in_dir_dependent, config)
        .map_err(|err| WriteFileError::from_bxdf_error(path, err))?;
    write(path, &exported)
}

/// Formats a BRDF into `writer`.
///
/// The BRDF is expected in specular coordinates; its angles are written as
/// they are whatever the coordinate system. XYZ spectra are converted to sRGB
/// sample by sample.
pub fn output<W: Write>(brdf: &Brdf, writer: &mut W) -> std::io::Result<()> {
    let samples = brdf.samples();
    let n_channels = samples.n_channels();
    let color_model = samples.color_model();
    let [n_in_theta, n_in_phi, n_out_theta, n_out_phi] = samples.shape();

    write_generator_comment(writer)?;
    writeln!(writer, "Source {}", samples.source())?;
    if brdf.is_isotropic() {
        writeln!(writer, "TypeSym ASymmetrical")?;
    } else {
        writeln!(writer, "TypeSym ASymmetrical 4D")?;
    }
    writeln!(
        writer,
        "TypeColorModel {}",
        color_model_keyword(color_model, n_channels)
    )?;
    writeln!(writer, "TypeData Luminance Absolute")?;

    if !brdf.is_isotropic() {
        write_angles(writer, "psi", samples.angles(IN_PHI))?;
    }
    write_angles(writer, "sigma", samples.angles(IN_THETA))?;
    write_angles(writer, "phi", samples.angles(OUT_PHI))?;
    write_angles(writer, "theta", samples.angles(OUT_THETA))?;

    let to_srgb = color_model == ColorModel::Xyz;
    for channel in 0..n_channels {
        let label = channel_label(
            color_model,
            n_channels,
            channel,
            samples.wavelengths()[channel],
        );
        writeln!(writer, "{}", label)?;
        writeln!(writer, " kbdf")?;
        write!(writer, " ")?;
        for _ in 0..n_in_theta * n_in_phi {
            write!(writer, " 1.0")?;
        }
        writeln!(writer)?;
        writeln!(writer, " def")?;
        for i1 in 0..n_in_phi {
            let psi = Radians::new(samples.angle(IN_PHI, i1)).in_degrees();
            writeln!(writer, ";; Psi = {}", format_g(psi.value()))?;
            for i0 in 0..n_in_theta {
                let sigma = Radians::new(samples.angle(IN_THETA, i0)).in_degrees();
                writeln!(writer, ";; Sigma = {}", format_g(sigma.value()))?;
                for i3 in 0..n_out_phi {
                    for i2 in 0..n_out_theta {
                        let value = channel_value(samples, [i0, i1, i2, i3], channel, to_srgb);
                        write!(writer, " {}", format_g(value * PI))?;
                    }
                    writeln!(writer)?;
                }
            }
        }
        writeln!(writer, " enddef")?;
    }
    Ok(())
}

fn channel_value(samples: &SampleSet, index: [usize; 4], channel: usize, to_srgb: bool) -> f32 {
    let spectrum = samples.spectrum(index);
    if to_srgb {
        xyz_to_srgb([spectrum[0], spectrum[1], spectrum[2]])[channel]
    } else {
        spectrum[channel]
    }
}

/// Reads a DDR file.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Brdf, ReadFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| ReadFileError::from_std_io_error(path, err))?;
    let brdf = parse(BufReader::new(file)).map_err(|kind| ReadFileError::from_kind(path, kind))?;
    log::info!(
        "read {} x {} x {} x {} samples from {}",
        brdf.n_in_theta(),
        brdf.n_in_phi(),
        brdf.n_out_theta(),
        brdf.n_out_phi(),
        path.display()
    );
    Ok(brdf)
}

/// Parses DDR content from a reader.
pub fn parse<R: BufRead>(mut reader: R) -> Result<Brdf, ReadFileErrorKind> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(parse_str(&content)?)
}

/// Parses DDR content.
///
/// Values are divided by π. The incoming azimuth list is required for `4D`
/// files and forbidden otherwise, where it defaults to `[0]`.
pub fn parse_str(content: &str) -> Result<Brdf, ParseError> {
    let mut tokens = Tokens::new(content);
    let mut source = SourceType::Measured;
    let mut four_d = None;
    let mut color = None;
    let mut has_data_type = false;
    let mut axes: [Option<Box<[f32]>>; 4] = [None, None, None, None];

    // Header keywords and angle lists, in any order, up to the first channel.
    while let Some(keyword) = tokens.peek() {
        let axis = match keyword {
            "psi" => Some(IN_PHI),
            "sigma" => Some(IN_THETA),
            "phi" => Some(OUT_PHI),
            "theta" => Some(OUT_THETA),
            _ => None,
        };
        if let Some(axis) = axis {
            tokens.next()?;
            axes[axis] = Some(tokens.next_angles()?);
            continue;
        }
        match keyword {
            "Source" => {
                tokens.next()?;
                source = parse_source(&mut tokens)?;
            }
            "TypeSym" => {
                tokens.next()?;
                tokens.expect("ASymmetrical")?;
                four_d = Some(tokens.peek() == Some("4D"));
                if four_d == Some(true) {
                    tokens.next()?;
                }
            }
            "TypeColorModel" => {
                tokens.next()?;
                color = Some(parse_color_model(&mut tokens)?);
            }
            "TypeData" => {
                tokens.next()?;
                let kind = tokens.next()?;
                let unit = tokens.next()?;
                if kind != "Luminance" || unit != "Absolute" {
                    return Err(tokens.error(ParseErrorKind::Unsupported(format!(
                        "data type '{} {}'",
                        kind, unit
                    ))));
                }
                has_data_type = true;
            }
            _ => break,
        }
    }

    let four_d = four_d.ok_or_else(|| tokens.error(ParseErrorKind::MissingSection("TypeSym")))?;
    let (color_model, n_channels) =
        color.ok_or_else(|| tokens.error(ParseErrorKind::MissingSection("TypeColorModel")))?;
    if !has_data_type {
        return Err(tokens.error(ParseErrorKind::MissingSection("TypeData")));
    }
    let in_phi: Box<[f32]> = match (four_d, axes[IN_PHI].take()) {
        (true, Some(psi)) => psi,
        (true, None) => return Err(tokens.error(ParseErrorKind::MissingSection("psi"))),
        (false, None) => Box::new([0.0f32]),
        (false, Some(_)) => {
            return Err(tokens.error(ParseErrorKind::Unsupported(String::from(
                "psi list in a file without 4D symmetry",
            ))))
        }
    };
    let mut take = |axis: usize, name: &'static str| {
        axes[axis]
            .take()
            .ok_or_else(|| tokens.error(ParseErrorKind::MissingSection(name)))
    };
    let in_theta = take(IN_THETA, "sigma")?;
    let out_phi = take(OUT_PHI, "phi")?;
    let out_theta = take(OUT_THETA, "theta")?;

    let shape = [in_theta.len(), in_phi.len(), out_theta.len(), out_phi.len()];
    let too_large = || {
        tokens.error(ParseErrorKind::Unsupported(format!(
            "grid of {} x {} x {} x {} samples",
            shape[0], shape[1], shape[2], shape[3]
        )))
    };
    let n_slices = shape[0].checked_mul(shape[1]).ok_or_else(too_large)?;
    let n_samples = shape[2]
        .checked_mul(shape[3])
        .and_then(|n| n.checked_mul(n_slices))
        .ok_or_else(too_large)?;
    let header_line = tokens.line();

    // Channel blocks, stored in file order: psi, sigma, phi, theta.
    let mut wavelengths = Vec::new();
    let mut blocks = Vec::new();
    for channel in 0..n_channels {
        wavelengths.push(parse_channel_label(
            &mut tokens,
            color_model,
            n_channels,
            channel,
        )?);
        if tokens.peek() == Some("kbdf") {
            tokens.next()?;
            let mut scales = Vec::new();
            tokens.next_values(n_slices, &mut scales)?;
        }
        tokens.expect("def")?;
        let mut values = Vec::new();
        tokens.next_values(n_samples, &mut values)?;
        tokens.expect("enddef")?;
        blocks.push(values);
    }

    let mut spectra = vec![0.0; n_samples * n_channels];
    let [n0, n1, n2, n3] = shape;
    for (channel, values) in blocks.iter().enumerate() {
        let mut k = 0;
        for i1 in 0..n1 {
            for i0 in 0..n0 {
                for i3 in 0..n3 {
                    for i2 in 0..n2 {
                        let offset = ((i0 * n1 + i1) * n2 + i2) * n3 + i3;
                        spectra[offset * n_channels + channel] = values[k] / PI;
                        k += 1;
                    }
                }
            }
        }
    }

    let wavelengths = if color_model == ColorModel::Spectral {
        wavelengths.into_boxed_slice()
    } else {
        Box::new([])
    };
    let samples = SampleSet::from_spectra(
        [in_theta, in_phi, out_theta, out_phi],
        color_model,
        wavelengths,
        source,
        spectra.into_boxed_slice(),
    )
    .map_err(|err| ParseError::new(header_line, ParseErrorKind::InvalidContent(err)))?;
    Brdf::new(CoordSysKind::Specular, samples)
        .map_err(|err| ParseError::new(header_line, ParseErrorKind::InvalidContent(err)))
}
