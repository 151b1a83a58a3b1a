use crate::cli::{ansi, CliError};
use base::{color::ColorModel, math::Vec3};
use bxdf::{
    io::ddr,
    model::{ModelKind, ParamValue, ReflectanceModel},
    process::uniform_grid,
    Brdf, CoordSysKind, ExportConfig,
};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[clap(about = "Samples an analytic reflectance model and writes it in the full-grid format.")]
pub struct GenerateOptions {
    /// Reflectance model to sample.
    #[arg(short, long, value_enum)]
    pub model: ModelKind,

    /// Color of the model.
    #[arg(long, value_name = "R G B", num_args(3))]
    pub color: Option<Vec<f32>>,

    /// Roughness, or roughness along X for the anisotropic model.
    #[arg(long)]
    pub roughness: Option<f32>,

    /// Roughness along Y for the anisotropic model.
    #[arg(long)]
    pub roughness_y: Option<f32>,

    /// Color model of the generated samples.
    #[arg(long, value_enum, default_value_t = ColorModel::Rgb)]
    pub color_model: ColorModel,

    /// Coordinate system in which the model is sampled.
    #[arg(long, value_enum, default_value_t = CoordSysKind::Spherical)]
    pub coord_sys: CoordSysKind,

    /// Keep the sampled incoming directions when resampling for export.
    #[arg(long)]
    pub in_dir_dependent: bool,

    /// Path of the file to write.
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

pub fn generate(opts: GenerateOptions, config: &ExportConfig) -> Result<(), CliError> {
    let model = configure_model(&opts)?;
    log::info!(
        "generating {} with {}",
        model.name(),
        model
            .parameters()
            .iter()
            .map(|p| format!("{} = {}", p.name, p.value))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let brdf = Brdf::from_model(
        model.as_ref(),
        opts.coord_sys,
        uniform_grid(config.generate.counts()),
        opts.color_model,
    )?;
    ddr::write_any(&opts.output, &brdf, opts.in_dir_dependent, config)?;
    println!(
        "{} {} written to \"{}\"",
        ansi::CYAN_CHECK,
        model.name(),
        opts.output.display()
    );
    Ok(())
}

fn configure_model(opts: &GenerateOptions) -> Result<Box<dyn ReflectanceModel>, CliError> {
    let mut model = opts.model.create();
    if let Some(color) = &opts.color {
        let color = Vec3::from_slice(color);
        model.set_parameter("Color", ParamValue::Color(color))?;
    }
    let roughness_x = match opts.model {
        ModelKind::WardAnisotropic => "Roughness X",
        _ => "Roughness",
    };
    if let Some(roughness) = opts.roughness {
        model.set_parameter(roughness_x, ParamValue::Float(roughness))?;
    }
    if let Some(roughness) = opts.roughness_y {
        model.set_parameter("Roughness Y", ParamValue::Float(roughness))?;
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(model: ModelKind) -> GenerateOptions {
        GenerateOptions {
            model,
            color: Some(vec![0.1, 0.2, 0.3]),
            roughness: Some(0.25),
            roughness_y: None,
            color_model: ColorModel::Rgb,
            coord_sys: CoordSysKind::Spherical,
            in_dir_dependent: false,
            output: PathBuf::from("unused.ddr"),
        }
    }

    #[test]
    fn applies_parameters() {
        let model = configure_model(&options(ModelKind::WardAnisotropic)).unwrap();
        let params = model.parameters();
        let find = |name: &str| params.iter().find(|p| p.name == name).map(|p| p.value);
        assert_eq!(find("Roughness X"), Some(ParamValue::Float(0.25)));
        assert_eq!(
            find("Color"),
            Some(ParamValue::Color(Vec3::new(0.1, 0.2, 0.3)))
        );
    }

    #[test]
    fn rejects_roughness_for_lambert() {
        assert!(configure_model(&options(ModelKind::Lambertian)).is_err());
        let mut opts = options(ModelKind::WardIsotropic);
        opts.roughness_y = Some(0.5);
        assert!(configure_model(&opts).is_err());
    }

    #[test]
    fn writes_a_file() {
        let mut opts = options(ModelKind::Lambertian);
        opts.roughness = None;
        opts.output =
            std::env::temp_dir().join(format!("bsdfio-generate-{}.ddr", std::process::id()));
        let mut config = ExportConfig::default();
        config.generate.n_out_theta = 10;
        config.generate.n_out_phi = 13;
        config.grid.n_spec_theta = 10;
        config.grid.n_spec_phi = 13;
        let path = opts.output.clone();
        generate(opts, &config).unwrap();
        let brdf = ddr::read(&path).unwrap();
        assert_eq!(brdf.samples().shape(), [10, 1, 10, 13]);
        std::fs::remove_file(&path).unwrap();
    }
}
