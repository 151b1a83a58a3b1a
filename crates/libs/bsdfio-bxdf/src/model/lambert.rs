use crate::model::{expect_color, ParamValue, Parameter, ReflectanceModel};
use base::{error::BxdfError, math::Vec3};
use std::f32::consts::FRAC_1_PI;

/// Lambertian model.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lambertian {
    /// Reflectance of the surface, i.e. the fraction of light that is
    /// reflected.
    pub color: Vec3,
}

impl Default for Lambertian {
    fn default() -> Self {
        Self {
            color: Vec3::splat(0.5),
        }
    }
}

impl ReflectanceModel for Lambertian {
    fn name(&self) -> &str { "Lambertian" }

    fn description(&self) -> &str { "Ideal diffuse reflection." }

    fn is_isotropic(&self) -> bool { true }

    fn parameters(&self) -> Vec<Parameter> {
        vec![Parameter {
            name: "Color",
            value: ParamValue::Color(self.color),
        }]
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), BxdfError> {
        match name {
            "Color" => self.color = expect_color(name, value)?,
            _ => return Err(BxdfError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    fn value(&self, _in_dir: &Vec3, _out_dir: &Vec3) -> Vec3 { self.color * FRAC_1_PI }

    fn clone_box(&self) -> Box<dyn ReflectanceModel> { Box::new(*self) }
}
