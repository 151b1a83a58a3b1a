use crate::model::{expect_color, expect_float, ParamValue, Parameter, ReflectanceModel};
use base::{
    error::BxdfError,
    math::{sqr, Vec3},
};
use std::f32::consts::PI;

const WARD_DESCRIPTION: &str = "Gregory J. Ward, \"Measuring and modeling anisotropic \
                                reflection,\" Computer Graphics (SIGGRAPH '92 Proceedings), pp. \
                                265-272, July 1992.";

/// Smallest `cos θh` used for `tan² θh`.
const MIN_COS_HALF: f32 = 1.0e-6;

/// Isotropic Ward model.
///
/// `f = color · exp(-tan²θh / r²) / (4π r² sqrt(cosθi cosθo))`
///
/// Diverges when either cosine approaches zero and is undefined below the
/// horizon; callers sampling grazing directions must clamp them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WardIsotropic {
    /// Specular color.
    pub color: Vec3,
    /// Standard deviation of the surface slope.
    pub roughness: f32,
}

impl Default for WardIsotropic {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 0.1,
        }
    }
}

impl WardIsotropic {
    /// Creates a new model.
    pub fn new(color: Vec3, roughness: f32) -> Self { Self { color, roughness } }

    /// Evaluates the scalar lobe.
    pub fn compute(in_dir: &Vec3, out_dir: &Vec3, roughness: f32) -> f32 {
        let half = (*in_dir + *out_dir).normalize();
        let cos_h = half.z.max(MIN_COS_HALF);
        let cos2_h = sqr(cos_h);
        let tan2_h = (1.0 - cos2_h) / cos2_h;
        let r2 = sqr(roughness);
        let norm = 1.0 / (in_dir.z * out_dir.z).sqrt();
        norm * (-tan2_h / r2).exp() / (4.0 * PI * r2)
    }
}

impl ReflectanceModel for WardIsotropic {
    fn name(&self) -> &str { "Ward isotropic" }

    fn description(&self) -> &str { WARD_DESCRIPTION }

    fn is_isotropic(&self) -> bool { true }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter {
                name: "Color",
                value: ParamValue::Color(self.color),
            },
            Parameter {
                name: "Roughness",
                value: ParamValue::Float(self.roughness),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), BxdfError> {
        match name {
            "Color" => self.color = expect_color(name, value)?,
            "Roughness" => self.roughness = expect_float(name, value)?,
            _ => return Err(BxdfError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    fn value(&self, in_dir: &Vec3, out_dir: &Vec3) -> Vec3 {
        self.color * Self::compute(in_dir, out_dir, self.roughness)
    }

    fn clone_box(&self) -> Box<dyn ReflectanceModel> { Box::new(*self) }
}

/// Anisotropic Ward model with separate slope deviations along x and y.
///
/// `f = color · exp(-((hx/αx)² + (hy/αy)²) / hz²) / (4π αx αy sqrt(cosθi cosθo))`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WardAnisotropic {
    /// Specular color.
    pub color: Vec3,
    /// Slope deviation along the x axis.
    pub roughness_x: f32,
    /// Slope deviation along the y axis.
    pub roughness_y: f32,
}

impl Default for WardAnisotropic {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness_x: 0.1,
            roughness_y: 0.3,
        }
    }
}

impl WardAnisotropic {
    /// Creates a new model.
    pub fn new(color: Vec3, roughness_x: f32, roughness_y: f32) -> Self {
        Self {
            color,
            roughness_x,
            roughness_y,
        }
    }

    /// Evaluates the scalar lobe.
    pub fn compute(in_dir: &Vec3, out_dir: &Vec3, roughness_x: f32, roughness_y: f32) -> f32 {
        let half = (*in_dir + *out_dir).normalize();
        let cos2_h = sqr(half.z.max(MIN_COS_HALF));
        let exponent = (sqr(half.x / roughness_x) + sqr(half.y / roughness_y)) / cos2_h;
        let norm = 1.0 / (in_dir.z * out_dir.z).sqrt();
        norm * (-exponent).exp() / (4.0 * PI * roughness_x * roughness_y)
    }
}

impl ReflectanceModel for WardAnisotropic {
    fn name(&self) -> &str { "Ward anisotropic" }

    fn description(&self) -> &str { WARD_DESCRIPTION }

    fn is_isotropic(&self) -> bool { false }

    fn parameters(&self) -> Vec<Parameter> {
        vec![
            Parameter {
                name: "Color",
                value: ParamValue::Color(self.color),
            },
            Parameter {
                name: "Roughness X",
                value: ParamValue::Float(self.roughness_x),
            },
            Parameter {
                name: "Roughness Y",
                value: ParamValue::Float(self.roughness_y),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), BxdfError> {
        match name {
            "Color" => self.color = expect_color(name, value)?,
            "Roughness X" => self.roughness_x = expect_float(name, value)?,
            "Roughness Y" => self.roughness_y = expect_float(name, value)?,
            _ => return Err(BxdfError::UnknownParameter(name.to_string())),
        }
        Ok(())
    }

    fn value(&self, in_dir: &Vec3, out_dir: &Vec3) -> Vec3 {
        self.color * Self::compute(in_dir, out_dir, self.roughness_x, self.roughness_y)
    }

    fn clone_box(&self) -> Box<dyn ReflectanceModel> { Box::new(*self) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::{math::sph_to_cart, units::Radians};
    use proptest::prelude::*;

    #[test]
    fn normal_incidence_is_finite() {
        let model = WardIsotropic::new(Vec3::new(0.5, 0.25, 1.0), 0.1);
        let v = model.value(&Vec3::Z, &Vec3::Z);
        assert!(v.is_finite());
        assert!(v.min_element() >= 0.0);
        approx::assert_relative_eq!(v.z, 1.0 / (4.0 * PI * 0.01), epsilon = 1e-4);
        approx::assert_relative_eq!(v.x, 0.5 * v.z, epsilon = 1e-4);
    }

    #[test]
    fn peak_in_mirror_direction() {
        let model = WardIsotropic::default();
        let vi = sph_to_cart(Radians::new(0.5), Radians::ZERO);
        let mirror = sph_to_cart(Radians::new(0.5), Radians::PI);
        let off = sph_to_cart(Radians::new(0.7), Radians::PI);
        assert!(model.value(&vi, &mirror).x > model.value(&vi, &off).x);
    }

    #[test]
    fn parameters_round_trip() {
        let mut model = WardIsotropic::default();
        model
            .set_parameter("Color", ParamValue::Color(Vec3::new(0.1, 0.2, 0.3)))
            .unwrap();
        model
            .set_parameter("Roughness", ParamValue::Float(0.25))
            .unwrap();
        assert_eq!(model.roughness, 0.25);
        assert_eq!(model.parameters()[0].value, ParamValue::Color(Vec3::new(0.1, 0.2, 0.3)));
        assert_eq!(
            model.set_parameter("Sheen", ParamValue::Float(1.0)),
            Err(BxdfError::UnknownParameter("Sheen".into()))
        );
        assert_eq!(
            model.set_parameter("Roughness", ParamValue::Color(Vec3::ONE)),
            Err(BxdfError::InvalidParameterValue("Roughness".into()))
        );
    }

    #[test]
    fn anisotropic_reduces_to_isotropic() {
        let iso = WardIsotropic::new(Vec3::ONE, 0.2);
        let aniso = WardAnisotropic::new(Vec3::ONE, 0.2, 0.2);
        let vi = sph_to_cart(Radians::new(0.4), Radians::new(0.3));
        let vo = sph_to_cart(Radians::new(0.6), Radians::new(2.9));
        approx::assert_relative_eq!(
            iso.value(&vi, &vo).x,
            aniso.value(&vi, &vo).x,
            max_relative = 1e-4
        );
        assert!(!aniso.is_isotropic());
    }

    #[test]
    fn anisotropic_depends_on_azimuth() {
        let model = WardAnisotropic::new(Vec3::ONE, 0.05, 0.4);
        let a = {
            let vi = sph_to_cart(Radians::new(0.5), Radians::ZERO);
            let vo = sph_to_cart(Radians::new(0.7), Radians::PI);
            model.value(&vi, &vo).x
        };
        let b = {
            let vi = sph_to_cart(Radians::new(0.5), Radians::HALF_PI);
            let vo = sph_to_cart(
                Radians::new(0.7),
                Radians::new(3.0 * std::f32::consts::FRAC_PI_2),
            );
            model.value(&vi, &vo).x
        };
        assert!((a - b).abs() > 1e-3, "{} vs {}", a, b);
    }

    proptest! {
        #[test]
        fn non_negative_on_upper_hemisphere(
            ti in 0.0f32..1.5, pi in 0.0f32..6.28, to in 0.0f32..1.5, po in 0.0f32..6.28,
            r in 0.02f32..1.0,
        ) {
            let vi = sph_to_cart(Radians::new(ti), Radians::new(pi));
            let vo = sph_to_cart(Radians::new(to), Radians::new(po));
            let v = WardIsotropic::compute(&vi, &vo, r);
            prop_assert!(v.is_finite());
            prop_assert!(v >= 0.0);
        }
    }
}
