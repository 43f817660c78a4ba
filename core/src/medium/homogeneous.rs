//! Homogeneous Medium

use super::*;
use crate::pbrt::*;

/// A medium with constant absorption and scattering coefficients.
pub struct HomogeneousMedium {
    /// Scattering coefficient.
    pub sigma_s: Spectrum,

    /// Attenuation coefficient `σa + σs`.
    pub sigma_t: Spectrum,

    /// Henyey-Greenstein asymmetry parameter.
    pub g: Float,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium`.
    ///
    /// * `sigma_a` - Absorption coefficient.
    /// * `sigma_s` - Scattering coefficient.
    /// * `g`       - Henyey-Greenstein asymmetry parameter.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, g: Float) -> Self {
        Self {
            sigma_s,
            sigma_t: sigma_a + sigma_s,
            g,
        }
    }
}

impl Medium for HomogeneousMedium {
    fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> Spectrum {
        let dist = min(ray.t_max * ray.d.length(), Float::MAX);
        (-self.sigma_t * dist).exp()
    }

    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        // Sample a channel and distance along the ray.
        let channel = min(
            (sampler.get_1d() * SPECTRUM_SAMPLES as Float) as usize,
            SPECTRUM_SAMPLES - 1,
        );
        let ray_length = ray.d.length();
        let dist = -(1.0 - sampler.get_1d()).ln() / self.sigma_t[channel];
        let t = min(dist / ray_length, ray.t_max);
        let sampled_medium = t < ray.t_max;

        let mi = if sampled_medium {
            Some(MediumInteraction::new(
                ray.at(t),
                -ray.d,
                ray.time,
                ray.medium.clone(),
                HenyeyGreenstein::new(self.g),
            ))
        } else {
            None
        };

        // Compute the transmittance and sampling density.
        let tr = (-self.sigma_t * min(t, Float::MAX) * ray_length).exp();
        let density = if sampled_medium { self.sigma_t * tr } else { tr };
        let mut pdf = (0..SPECTRUM_SAMPLES).map(|i| density[i]).sum::<Float>();
        pdf /= SPECTRUM_SAMPLES as Float;
        if pdf == 0.0 {
            debug_assert!(tr.is_black());
            pdf = 1.0;
        }

        let weight = if sampled_medium {
            tr * self.sigma_s / pdf
        } else {
            tr / pdf
        };
        (weight, mi)
    }
}
