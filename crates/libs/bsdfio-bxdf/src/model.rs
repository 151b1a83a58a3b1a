//! Analytic reflectance models.
//!
//! Models are evaluated on a grid by [`crate::Brdf::from_model`] to produce
//! generated sample sets.

use base::{error::BxdfError, math::Vec3};
use std::fmt::{Debug, Display, Formatter};

mod lambert;
mod ward;

pub use lambert::*;
pub use ward::*;

/// Smallest cosine used when a model is sampled on a grid. Directions closer
/// to the horizon are tilted up to this elevation.
pub const MIN_COS_THETA: f32 = 1.0e-3;

/// Value of a model parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamValue {
    /// Scalar parameter.
    Float(f32),
    /// Color parameter.
    Color(Vec3),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Color(c) => write!(f, "({}, {}, {})", c.x, c.y, c.z),
        }
    }
}

/// A named parameter of a model.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Parameter {
    /// Name of the parameter.
    pub name: &'static str,
    /// Current value.
    pub value: ParamValue,
}

/// Common interface of the analytic reflectance models.
pub trait ReflectanceModel: Send + Sync + Debug + 'static {
    /// The name of the model.
    fn name(&self) -> &str;

    /// Reference describing the model.
    fn description(&self) -> &str;

    /// Tells whether the model is invariant under rotation about the normal.
    fn is_isotropic(&self) -> bool;

    /// Current parameters, for introspection.
    fn parameters(&self) -> Vec<Parameter>;

    /// Changes one parameter.
    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), BxdfError>;

    /// Evaluates the BRDF for a pair of unit directions in a local frame with
    /// the normal along +Z. Both directions point away from the surface.
    ///
    /// Directions are not validated.
    fn value(&self, in_dir: &Vec3, out_dir: &Vec3) -> Vec3;

    /// Clones the model into a boxed trait object.
    fn clone_box(&self) -> Box<dyn ReflectanceModel>;
}

impl Clone for Box<dyn ReflectanceModel> {
    fn clone(&self) -> Self { self.clone_box() }
}

/// Available analytic models.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Isotropic Ward model.
    #[cfg_attr(feature = "cli", clap(name = "ward-iso"))]
    WardIsotropic,
    /// Anisotropic Ward model.
    #[cfg_attr(feature = "cli", clap(name = "ward-aniso"))]
    WardAnisotropic,
    /// Lambertian model.
    #[cfg_attr(feature = "cli", clap(name = "lambert"))]
    Lambertian,
}

impl ModelKind {
    /// Creates the model with its default parameters.
    pub fn create(&self) -> Box<dyn ReflectanceModel> {
        match self {
            ModelKind::WardIsotropic => Box::new(WardIsotropic::default()),
            ModelKind::WardAnisotropic => Box::new(WardAnisotropic::default()),
            ModelKind::Lambertian => Box::new(Lambertian::default()),
        }
    }
}

pub(crate) fn expect_float(name: &str, value: ParamValue) -> Result<f32, BxdfError> {
    match value {
        ParamValue::Float(v) if v.is_finite() => Ok(v),
        _ => Err(BxdfError::InvalidParameterValue(name.to_string())),
    }
}

pub(crate) fn expect_color(name: &str, value: ParamValue) -> Result<Vec3, BxdfError> {
    match value {
        ParamValue::Color(c) if c.is_finite() => Ok(c),
        _ => Err(BxdfError::InvalidParameterValue(name.to_string())),
    }
}
