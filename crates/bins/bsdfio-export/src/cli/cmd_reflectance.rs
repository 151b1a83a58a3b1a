use crate::cli::{ansi, CliError, FileKind};
use bxdf::{
    io::{ddr, sdr},
    process::reflectances,
    ExportConfig,
};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[clap(about = "Integrates a full-grid file over the outgoing hemisphere and writes the \
                directional reflectance of every incoming polar angle.")]
pub struct ReflectanceOptions {
    /// Full-grid file to read.
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Reflectance file to write.
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

pub fn reflectance(opts: ReflectanceOptions, config: &ExportConfig) -> Result<(), CliError> {
    if FileKind::from_path(&opts.input)? != FileKind::Ddr {
        return Err(format!("\"{}\" is not a full-grid file", opts.input.display()).into());
    }
    if FileKind::from_path(&opts.output)? != FileKind::Sdr {
        return Err(format!("\"{}\" is not a reflectance file", opts.output.display()).into());
    }
    let brdf = ddr::read(&opts.input)?;
    let table = reflectances(&brdf, &config.integrator)?;
    sdr::write(&opts.output, &table)?;
    println!(
        "{} reflectance of \"{}\" written to \"{}\"",
        ansi::CYAN_CHECK,
        opts.input.display(),
        opts.output.display()
    );
    Ok(())
}
