use base::cli::CommonArgs;
use bxdf::ExportConfig;
use std::path::Path;

/// ANSI color codes.
pub mod ansi {
    pub const RED_EXCLAMATION: &str = "\u{001b}[31m!\u{001b}[0m";
    pub const CYAN_CHECK: &str = "\u{001b}[36m✓\u{001b}[0m";
    pub const CYAN_MINUS: &str = "\u{001b}[36m-\u{001b}[0m";
}

mod cmd_convert;
mod cmd_generate;
mod cmd_reflectance;

pub use cmd_convert::ConvertOptions;
pub use cmd_generate::GenerateOptions;
pub use cmd_reflectance::ReflectanceOptions;

/// Errors reported by the subcommands.
pub type CliError = Box<dyn std::error::Error>;

#[derive(clap::Parser, Debug)]
#[clap(
    author,
    version,
    about = "Generates, converts and reduces tabular BRDF files."
)]
pub struct CliArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[clap(subcommand)]
    pub command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum SubCommand {
    /// Samples an analytic model and writes it in the full-grid format.
    Generate(GenerateOptions),
    /// Rewrites a tabular file in its canonical form.
    Convert(ConvertOptions),
    /// Reduces a full-grid file to its directional reflectance.
    Reflectance(ReflectanceOptions),
}

/// Entry point of the command line.
pub fn run(args: CliArgs) -> Result<(), CliError> {
    let config = load_config(args.common.config.as_deref())?;
    match args.command {
        SubCommand::Generate(opts) => cmd_generate::generate(opts, &config),
        SubCommand::Convert(opts) => cmd_convert::convert(opts, &config),
        SubCommand::Reflectance(opts) => cmd_reflectance::reflectance(opts, &config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ExportConfig, CliError> {
    match path {
        Some(path) => Ok(ExportConfig::load(path)?),
        None => Ok(ExportConfig::default()),
    }
}

/// Tabular formats recognised from the file extension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// Full 4D grid.
    Ddr,
    /// Reflectance table.
    Sdr,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("ddr") => Ok(Self::Ddr),
            Some("sdr") => Ok(Self::Sdr),
            _ => Err(format!(
                "cannot tell the format of \"{}\", expected a .ddr or .sdr extension",
                path.display()
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn file_kinds() {
        assert_eq!(
            FileKind::from_path(Path::new("a/b.ddr")).unwrap(),
            FileKind::Ddr
        );
        assert_eq!(FileKind::from_path(Path::new("b.SDR")).unwrap(), FileKind::Sdr);
        assert!(FileKind::from_path(Path::new("b.txt")).is_err());
        assert!(FileKind::from_path(Path::new("ddr")).is_err());
    }

    #[test]
    fn parses_generate() {
        let args = CliArgs::try_parse_from([
            "bsdfio",
            "generate",
            "--model",
            "ward-aniso",
            "--color",
            "0.2",
            "0.4",
            "0.6",
            "--roughness",
            "0.2",
            "--roughness-y",
            "0.5",
            "--color-model",
            "mono",
            "-o",
            "out.ddr",
            "--log-level",
            "3",
        ])
        .unwrap();
        assert_eq!(args.common.log_level, 3);
        match args.command {
            SubCommand::Generate(opts) => {
                assert_eq!(opts.model, bxdf::model::ModelKind::WardAnisotropic);
                assert_eq!(opts.color, Some(vec![0.2, 0.4, 0.6]));
                assert_eq!(opts.roughness_y, Some(0.5));
                assert_eq!(opts.color_model, base::color::ColorModel::Monochromatic);
                assert_eq!(opts.coord_sys, bxdf::CoordSysKind::Spherical);
                assert!(!opts.in_dir_dependent);
                assert_eq!(opts.output, PathBuf::from("out.ddr"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "bsdfio",
            "reflectance",
            "-i",
            "in.ddr",
            "-o",
            "out.sdr",
            "--verbose",
            "--config",
            "export.toml",
        ])
        .unwrap();
        assert!(args.common.verbose);
        assert_eq!(args.common.config, Some(PathBuf::from("export.toml")));
        assert!(matches!(args.command, SubCommand::Reflectance(_)));
    }

    #[test]
    fn rejects_unknown_model() {
        assert!(
            CliArgs::try_parse_from(["bsdfio", "generate", "--model", "phong", "-o", "x.ddr"])
                .is_err()
        );
    }
}
