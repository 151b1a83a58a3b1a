use crate::cli::{ansi, CliError, FileKind};
use bxdf::{
    io::{ddr, sdr},
    ExportConfig,
};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[clap(
    about = "Rewrites a full-grid or reflectance file in its canonical form. Input and output \
             formats are taken from the extensions and must match."
)]
pub struct ConvertOptions {
    /// File to read.
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// File to write.
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Keep the incoming directions of the input when resampling.
    #[arg(long)]
    pub in_dir_dependent: bool,
}

pub fn convert(opts: ConvertOptions, config: &ExportConfig) -> Result<(), CliError> {
    let src = FileKind::from_path(&opts.input)?;
    let dst = FileKind::from_path(&opts.output)?;
    match (src, dst) {
        (FileKind::Ddr, FileKind::Ddr) => {
            let brdf = ddr::read(&opts.input)?;
            ddr::write_any(&opts.output, &brdf, opts.in_dir_dependent, config)?;
        }
        (FileKind::Sdr, FileKind::Sdr) => {
            let table = sdr::read(&opts.input)?;
            sdr::write(&opts.output, &table)?;
        }
        (FileKind::Ddr, FileKind::Sdr) => {
            return Err("use the reflectance command to reduce a full-grid file".into());
        }
        (FileKind::Sdr, FileKind::Ddr) => {
            return Err("a reflectance table cannot be expanded to a full grid".into());
        }
    }
    println!(
        "{} \"{}\" converted to \"{}\"",
        ansi::CYAN_CHECK,
        opts.input.display(),
        opts.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::{color::ColorModel, math::linspace};
    use bxdf::{SampleSet2D, SourceType};

    #[test]
    fn sdr_to_sdr() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("bsdfio-convert-in-{}.sdr", std::process::id()));
        let output = dir.join(format!("bsdfio-convert-out-{}.sdr", std::process::id()));
        let mut table = SampleSet2D::new(
            linspace(3, 0.0, std::f32::consts::FRAC_PI_2),
            ColorModel::Monochromatic,
            Box::new([]),
            SourceType::Measured,
        )
        .unwrap();
        table.spectrum_mut(1)[0] = 0.25;
        sdr::write(&input, &table).unwrap();
        convert(
            ConvertOptions {
                input: input.clone(),
                output: output.clone(),
                in_dir_dependent: false,
            },
            &ExportConfig::default(),
        )
        .unwrap();
        let read_back = sdr::read(&output).unwrap();
        assert_eq!(read_back.spectrum(1), &[0.25]);
        std::fs::remove_file(&input).unwrap();
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn mismatched_formats() {
        let opts = ConvertOptions {
            input: PathBuf::from("a.sdr"),
            output: PathBuf::from("b.ddr"),
            in_dir_dependent: false,
        };
        assert!(convert(opts, &ExportConfig::default()).is_err());
    }
}
