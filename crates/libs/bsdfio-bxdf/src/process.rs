//! Resampling and normalisation of sampled BRDFs before export.
//!
//! [`prepare_for_export`] turns any [`Brdf`] into the canonical form expected
//! by the full-grid writer: specular coordinates on a fixed grid, tristimulus
//! data in sRGB, angle axes covering their whole domain and no incoming slice
//! reflecting more energy than it receives.

use crate::{
    config::{ExportConfig, IntegratorConfig},
    coord::{
        CoordSysKind, ANGLE_EPSILON, AZIMUTHAL, IN_PHI, IN_THETA, MAX_ANGLES, OUT_PHI, OUT_THETA,
    },
    samples::SampleSet2D,
    view::CoordView,
    Brdf,
};
use base::{
    color::{xyz_to_srgb, ColorModel},
    error::BxdfError,
    math::{append, linspace, prepend, sph_to_cart, Vec3},
    units::Radians,
};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Evenly spaced samples over the whole domain of an axis.
///
/// A single azimuth sample is placed at 0.
pub fn uniform_axis(axis: usize, n: usize) -> Box<[f32]> { linspace(n, 0.0, MAX_ANGLES[axis]) }

/// Evenly spaced samples over the whole domain of every axis.
pub fn uniform_grid(counts: [usize; 4]) -> [Box<[f32]>; 4] {
    [0, 1, 2, 3].map(|axis| uniform_axis(axis, counts[axis]))
}

/// Produces the canonical copy of `brdf` written by the full-grid writer.
///
/// Steps, in order:
///
/// 1. Data already in specular coordinates is cloned. Anything else is
///    resampled onto the configured grid or, when `in_dir_dependent` is set,
///    onto the source's incoming polar samples, as many uniform incoming
///    azimuths as the source has, and the configured specular grid.
/// 2. XYZ spectra are converted to gamma encoded sRGB.
/// 3. A single incoming polar sample is spread over a uniform axis.
/// 4. Axes are extended to cover their whole domain, see [`expand_angles`].
/// 5. Incoming slices reflecting more than they receive are scaled down, see
///    [`fix_energy_conservation`].
pub fn prepare_for_export(
    brdf: &Brdf,
    in_dir_dependent: bool,
    config: &ExportConfig,
) -> Result<Brdf, BxdfError> {
    let mut exported = match brdf.coord_sys() {
        CoordSysKind::Specular => {
            log::debug!("source is already in specular coordinates");
            brdf.clone()
        }
        _ if !in_dir_dependent => {
            brdf.resample(CoordSysKind::Specular, uniform_grid(config.grid.counts()))?
        }
        _ => {
            let samples = brdf.samples();
            let angles = [
                samples.angles(IN_THETA).into(),
                uniform_axis(IN_PHI, samples.n_angles(IN_PHI)),
                uniform_axis(OUT_THETA, config.grid.n_spec_theta),
                uniform_axis(OUT_PHI, config.grid.n_spec_phi),
            ];
            brdf.resample(CoordSysKind::Specular, angles)?
        }
    };

    if exported.samples().color_model() == ColorModel::Xyz {
        log::debug!("converting XYZ samples to sRGB");
        convert_xyz_to_srgb(&mut exported)?;
    }

    if exported.n_in_theta() == 1 {
        log::debug!(
            "spreading the single incoming polar sample over {} samples",
            config.n_filled_in_theta
        );
        let samples = exported.samples();
        let angles = [
            linspace(config.n_filled_in_theta, 0.0, FRAC_PI_2),
            samples.angles(IN_PHI).into(),
            samples.angles(OUT_THETA).into(),
            samples.angles(OUT_PHI).into(),
        ];
        exported = exported.resample(exported.coord_sys(), angles)?;
    }

    let mut exported = expand_angles(exported)?;
    fix_energy_conservation(&mut exported, &config.integrator);
    Ok(exported)
}

/// Converts XYZ spectra to gamma encoded sRGB and retags them.
pub fn convert_xyz_to_srgb(brdf: &mut Brdf) -> Result<(), BxdfError> {
    let samples = brdf.samples_mut();
    if samples.color_model() != ColorModel::Xyz {
        return Err(BxdfError::UnsupportedColorModel(samples.color_model()));
    }
    for spectrum in samples.spectra_mut() {
        let rgb = xyz_to_srgb([spectrum[0], spectrum[1], spectrum[2]]);
        spectrum.copy_from_slice(&rgb);
    }
    samples.set_color_model(ColorModel::Rgb)
}

/// Extends every axis so that it covers its whole domain.
///
/// Polar axes get 0 and π/2 end samples holding the nearest values. Azimuth
/// axes with more than one sample get 0 and 2π end samples interpolated across
/// the wrap, except isotropic outgoing azimuths sampled over `[0, π]` only,
/// which are completed by mirroring. Returns the input untouched when nothing
/// is missing.
pub fn expand_angles(brdf: Brdf) -> Result<Brdf, BxdfError> {
    let samples = brdf.samples();
    let mirror = brdf.view().mirrors_out_azimuth();
    let mut angles: [Box<[f32]>; 4] = [0, 1, 2, 3].map(|axis| samples.angles(axis).into());
    let mut expanded = false;

    for (axis, values) in angles.iter_mut().enumerate() {
        let max = MAX_ANGLES[axis];
        if AZIMUTHAL[axis] && values.len() == 1 {
            continue;
        }
        if axis == OUT_PHI && mirror {
            let mirrored = mirror_half_domain(&values[..]);
            if mirrored.len() != values.len() {
                *values = mirrored;
                expanded = true;
            }
            continue;
        }
        if values[0] > ANGLE_EPSILON {
            *values = prepend(&values[..], 0.0);
            expanded = true;
        }
        if values[values.len() - 1] < max - ANGLE_EPSILON {
            *values = append(&values[..], max);
            expanded = true;
        }
    }

    if !expanded {
        return Ok(brdf);
    }
    log::debug!(
        "expanding angle axes from {:?} to {:?}",
        samples.shape(),
        [0, 1, 2, 3].map(|axis| angles[axis].len())
    );
    brdf.resample(brdf.coord_sys(), angles)
}

/// Completes an azimuth axis covering `[0, π]` with its mirror image.
fn mirror_half_domain(values: &[f32]) -> Box<[f32]> {
    let mut out: Vec<f32> = Vec::with_capacity(values.len() * 2 + 2);
    if values[0] > ANGLE_EPSILON {
        out.push(0.0);
    }
    out.extend_from_slice(values);
    let last = out[out.len() - 1];
    let mirrored: Vec<f32> = out
        .iter()
        .rev()
        .map(|a| TAU - a)
        .filter(|m| *m > last + ANGLE_EPSILON)
        .collect();
    out.extend(mirrored);
    if out[out.len() - 1] < TAU - ANGLE_EPSILON {
        out.push(TAU);
    }
    out.into_boxed_slice()
}

/// Directional-hemispherical reflectance for one incoming direction.
///
/// Midpoint quadrature of `f · cosθ` over the outgoing hemisphere, per
/// channel. `out` must hold one value per channel.
pub fn reflectance(view: &CoordView, in_dir: &Vec3, config: &IntegratorConfig, out: &mut [f32]) {
    let n_theta = config.n_theta.max(1);
    let n_phi = config.n_phi.max(1);
    let d_theta = FRAC_PI_2 / n_theta as f32;
    let d_phi = TAU / n_phi as f32;
    let mut buf = vec![0.0f32; out.len()];
    let mut sum = vec![0.0f64; out.len()];
    for i in 0..n_theta {
        let theta = (i as f32 + 0.5) * d_theta;
        let weight = (theta.cos() * theta.sin() * d_theta * d_phi) as f64;
        for j in 0..n_phi {
            let phi = (j as f32 + 0.5) * d_phi;
            let out_dir = sph_to_cart(Radians::new(theta), Radians::new(phi));
            view.spectrum_at(in_dir, &out_dir, &mut buf);
            for (s, v) in sum.iter_mut().zip(buf.iter()) {
                *s += *v as f64 * weight;
            }
        }
    }
    for (o, s) in out.iter_mut().zip(sum) {
        *o = s as f32;
    }
}

/// Scales down every incoming slice whose reflectance exceeds one in some
/// channel, dividing the whole slice by its largest channel reflectance.
///
/// Returns the number of slices that were scaled.
pub fn fix_energy_conservation(brdf: &mut Brdf, config: &IntegratorConfig) -> usize {
    let n_channels = brdf.samples().n_channels();
    let mut scales = Vec::new();
    {
        let view = brdf.view();
        let samples = brdf.samples();
        let mut refl = vec![0.0; n_channels];
        for i0 in 0..brdf.n_in_theta() {
            for i1 in 0..brdf.n_in_phi() {
                let in_dir = sph_to_cart(
                    Radians::new(samples.angle(IN_THETA, i0)),
                    Radians::new(samples.angle(IN_PHI, i1)),
                );
                reflectance(&view, &in_dir, config, &mut refl);
                let max = refl.iter().copied().fold(0.0f32, f32::max);
                if max > 1.0 {
                    scales.push((i0, i1, max));
                }
            }
        }
    }

    let (n2, n3) = (brdf.n_out_theta(), brdf.n_out_phi());
    let samples = brdf.samples_mut();
    for &(i0, i1, max) in &scales {
        log::info!(
            "incoming slice ({}, {}) reflects {} of the incident energy, scaling it down",
            i0,
            i1,
            max
        );
        for i2 in 0..n2 {
            for i3 in 0..n3 {
                samples[[i0, i1, i2, i3]]
                    .iter_mut()
                    .for_each(|v| *v /= max);
            }
        }
    }
    if !scales.is_empty() {
        log::warn!(
            "{} incoming slice(s) violated energy conservation and were rescaled",
            scales.len()
        );
    }
    scales.len()
}

/// Reduces a BRDF to its directional-hemispherical reflectance per incoming
/// polar angle, taken at the first incoming azimuth.
pub fn reflectances(brdf: &Brdf, config: &IntegratorConfig) -> Result<SampleSet2D, BxdfError> {
    let samples = brdf.samples();
    let mut table = SampleSet2D::new(
        samples.angles(IN_THETA).into(),
        samples.color_model(),
        samples.wavelengths().into(),
        samples.source(),
    )?;
    let view = brdf.view();
    let in_phi = samples.angle(IN_PHI, 0);
    for (i, &theta) in samples.angles(IN_THETA).iter().enumerate() {
        let in_dir = sph_to_cart(Radians::new(theta), Radians::new(in_phi));
        reflectance(&view, &in_dir, config, table.spectrum_mut(i));
    }
    Ok(table)
}
