//! Common

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;

/// Uniformly sample all lights in the scene for direct lighting. Uses the
/// sample arrays requested for each light when available and falls back to
/// a single sample per light otherwise.
///
/// * `it`              - The intersection information.
/// * `bsdf`            - The BSDF at a surface interaction.
/// * `scene`           - The scene.
/// * `sampler`         - The sampler.
/// * `n_light_samples` - The number of samples to take for each light.
/// * `handle_media`    - Indicates whether effects of volumetric attenuation
///                       should be considered.
pub fn uniform_sample_all_lights(
    it: Interaction,
    bsdf: Option<&BSDF>,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    n_light_samples: &[usize],
    handle_media: bool,
) -> Spectrum {
    let mut l = Spectrum::ZERO;

    for (j, light) in scene.lights.iter().enumerate() {
        let n_samples = n_light_samples.get(j).copied().unwrap_or(1);
        let u_light_array = sampler.get_2d_array(n_samples).map(<[_]>::to_vec);
        let u_scattering_array = sampler.get_2d_array(n_samples).map(<[_]>::to_vec);

        match (u_light_array, u_scattering_array) {
            (Some(u_lights), Some(u_scatterings)) => {
                let mut ld = Spectrum::ZERO;
                for (u_light, u_scattering) in u_lights.iter().zip(u_scatterings.iter()) {
                    ld += estimate_direct(
                        it,
                        bsdf,
                        u_scattering,
                        light,
                        u_light,
                        scene,
                        sampler,
                        handle_media,
                        false,
                    );
                }
                l += ld / n_samples as Float;
            }
            _ => {
                let u_light = sampler.get_2d();
                let u_scattering = sampler.get_2d();
                l += estimate_direct(
                    it,
                    bsdf,
                    &u_scattering,
                    light,
                    &u_light,
                    scene,
                    sampler,
                    handle_media,
                    false,
                );
            }
        }
    }
    l
}

/// Sample a single light chosen from `light_distrib` (or uniformly when no
/// distribution is given) and divide by the probability of choosing it.
///
/// * `it`            - The intersection information.
/// * `bsdf`          - The BSDF at a surface interaction.
/// * `scene`         - The scene.
/// * `sampler`       - The sampler.
/// * `handle_media`  - Indicates whether effects of volumetric attenuation
///                     should be considered.
/// * `light_distrib` - Distribution for choosing a light.
pub fn uniform_sample_one_light(
    it: Interaction,
    bsdf: Option<&BSDF>,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    handle_media: bool,
    light_distrib: Option<&Distribution1D>,
) -> Spectrum {
    let n_lights = scene.lights.len();
    if n_lights == 0 {
        return Spectrum::ZERO;
    }

    let u = sampler.get_1d();
    let (light_num, light_pdf) = match light_distrib {
        Some(ld) => {
            let (ln, pdf, _) = ld.sample_discrete(u);
            if pdf == 0.0 {
                return Spectrum::ZERO;
            }
            (ln, pdf)
        }
        None => {
            let ln = min(u * n_lights as Float, n_lights as Float - 1.0) as usize;
            (ln, 1.0 / n_lights as Float)
        }
    };

    let light = &scene.lights[light_num];
    let u_light = sampler.get_2d();
    let u_scattering = sampler.get_2d();
    estimate_direct(
        it,
        bsdf,
        &u_scattering,
        light,
        &u_light,
        scene,
        sampler,
        handle_media,
        false,
    ) / light_pdf
}

/// Compute a direct lighting estimate for a light source sample by applying
/// multiple importance sampling with the power heuristic.
///
/// * `it`           - The intersection information.
/// * `bsdf`         - The BSDF at a surface interaction.
/// * `u_scattering` - Scattering sample.
/// * `light`        - The light.
/// * `u_light`      - Light sample.
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `handle_media` - Indicates whether effects of volumetric attenuation
///                    should be considered.
/// * `specular`     - Indicates whether perfectly specular lobes should be
///                    considered.
#[allow(clippy::too_many_arguments)]
pub fn estimate_direct(
    it: Interaction,
    bsdf: Option<&BSDF>,
    u_scattering: &Point2f,
    light: &ArcLight,
    u_light: &Point2f,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    handle_media: bool,
    specular: bool,
) -> Spectrum {
    let bsdf_flags = if specular {
        BxDFType::BSDF_ALL
    } else {
        BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR
    };
    let mut ld = Spectrum::ZERO;
    let hit = it.get_hit();

    // Sample light source with multiple importance sampling.
    let Li {
        wi,
        pdf: light_pdf,
        visibility,
        value: mut li,
    } = light.sample_li(hit, u_light);
    trace!("EstimateDirect u_light: {:?}, Li: {}, wi: {}, pdf: {}", u_light, li, wi, light_pdf);

    if light_pdf > 0.0 && !li.is_black() {
        let (f, scattering_pdf) = match it {
            Interaction::Surface { si } => match bsdf {
                Some(bsdf) => (
                    bsdf.f(&hit.wo, &wi, bsdf_flags) * wi.abs_dot_normal(&si.shading.n),
                    bsdf.pdf(&hit.wo, &wi, bsdf_flags),
                ),
                None => (Spectrum::ZERO, 0.0),
            },
            Interaction::Medium { mi } => {
                let p = mi.phase.p(&hit.wo, &wi);
                (Spectrum::new(p), p)
            }
        };
        trace!("  f: {}, scattering_pdf: {}", f, scattering_pdf);

        if !f.is_black() {
            if let Some(vis) = visibility {
                if handle_media {
                    li *= vis.tr(scene, sampler);
                } else if !vis.unoccluded(scene) {
                    trace!("  shadow ray blocked");
                    li = Spectrum::ZERO;
                }
            }

            if !li.is_black() {
                if light.is_delta_light() {
                    ld += f * li / light_pdf;
                } else {
                    let weight = power_heuristic(1, light_pdf, 1, scattering_pdf);
                    ld += f * li * weight / light_pdf;
                }
            }
        }
    }

    // Sample BSDF with multiple importance sampling. Delta lights cannot be
    // hit by a sampled direction.
    if !light.is_delta_light() {
        let (f, scattering_pdf, wi, sampled_specular) = match it {
            Interaction::Surface { si } => match bsdf {
                Some(bsdf) => {
                    let BxDFSample { f, pdf, wi, bxdf_type } = bsdf.sample_f(&hit.wo, u_scattering, bsdf_flags);
                    (
                        f * wi.abs_dot_normal(&si.shading.n),
                        pdf,
                        wi,
                        bxdf_type.matches(BxDFType::BSDF_SPECULAR),
                    )
                }
                None => (Spectrum::ZERO, 0.0, Vector3f::ZERO, false),
            },
            Interaction::Medium { mi } => {
                let (p, wi) = mi.phase.sample_p(&hit.wo, u_scattering);
                (Spectrum::new(p), p, wi, false)
            }
        };
        trace!("  BSDF / phase sampling f: {}, scattering_pdf: {}", f, scattering_pdf);

        if !f.is_black() && scattering_pdf > 0.0 {
            let mut weight = 1.0;
            if !sampled_specular {
                let light_pdf = light.pdf_li(hit, &wi);
                if light_pdf == 0.0 {
                    return ld;
                }
                weight = power_heuristic(1, scattering_pdf, 1, light_pdf);
            }

            // Find intersection and compute transmittance.
            let mut ray = hit.spawn_ray(&wi);
            let (light_isect, tr) = if handle_media {
                scene.intersect_tr(&mut ray, sampler)
            } else {
                (scene.intersect(&mut ray), Spectrum::ONE)
            };

            // Add light contribution from material sampling.
            let li = match light_isect {
                Some(light_isect) => match light_isect.primitive.and_then(|p| p.get_area_light()) {
                    Some(area_light) if is_same_light(area_light, light) => light_isect.le(&(-wi)),
                    _ => Spectrum::ZERO,
                },
                None => light.le(&ray),
            };

            if !li.is_black() {
                ld += f * li * tr * weight / scattering_pdf;
            }
        }
    }

    ld
}

/// Returns a distribution with probabilities proportional to each light's
/// power, or `None` when the scene has no lights.
///
/// * `scene` - The scene.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        None
    } else {
        let light_power: Vec<Float> = scene.lights.iter().map(|light| light.power().y()).collect();
        Some(Distribution1D::new(light_power))
    }
}
