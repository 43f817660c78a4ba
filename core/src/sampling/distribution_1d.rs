//! 1D Distribution.

use crate::pbrt::*;

/// Piecewise-constant 1D function with its CDF, for importance sampling.
#[derive(Clone, Debug)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func`; `func.len() + 1` entries.
    pub cdf: Vec<Float>,

    /// Integral of `func` over [0, 1].
    pub func_int: Float,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    /// An all-zero function samples uniformly.
    ///
    /// * `f` - Piecewise-constant 1D function values.
    pub fn new(f: Vec<Float>) -> Self {
        let n = f.len();

        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..n + 1 {
            cdf.push(cdf[i - 1] + f[i - 1] / n as Float);
        }

        let func_int = cdf[n];
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1) {
                *v /= func_int;
            }
        }

        Self { func: f, cdf, func_int }
    }

    /// Returns the number of function values.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Sample a discrete index. Returns the index, its probability and the
    /// sample remapped to [0, 1) within the chosen segment.
    ///
    /// * `u` - The random sample.
    pub fn sample_discrete(&self, u: Float) -> (usize, Float, Float) {
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);
        let pdf = self.discrete_pdf(offset);
        let width = self.cdf[offset + 1] - self.cdf[offset];
        let u_remapped = if width > 0.0 { (u - self.cdf[offset]) / width } else { 0.0 };
        debug_assert!((0.0..=1.0).contains(&u_remapped));
        (offset, pdf, u_remapped)
    }

    /// Return the probability of sampling a given index.
    ///
    /// * `index` - Sample index.
    pub fn discrete_pdf(&self, index: usize) -> Float {
        assert!(index < self.count());
        if self.func_int > 0.0 {
            self.func[index] / (self.func_int * self.count() as Float)
        } else {
            1.0 / self.count() as Float
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn sample_discrete_follows_function_weights() {
        let d = Distribution1D::new(vec![1.0, 3.0]);
        let (i, pdf, _) = d.sample_discrete(0.1);
        assert_eq!(i, 0);
        assert!(approx_eq!(f32, pdf, 0.25, epsilon = 1e-6));
        let (i, pdf, u) = d.sample_discrete(0.625);
        assert_eq!(i, 1);
        assert!(approx_eq!(f32, pdf, 0.75, epsilon = 1e-6));
        assert!(approx_eq!(f32, u, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn zero_function_samples_uniformly() {
        let d = Distribution1D::new(vec![0.0, 0.0, 0.0, 0.0]);
        let (i, pdf, _) = d.sample_discrete(0.6);
        assert_eq!(i, 2);
        assert!(approx_eq!(f32, pdf, 0.25, epsilon = 1e-6));
    }

    #[test]
    fn zero_weight_entries_are_never_chosen() {
        let d = Distribution1D::new(vec![1.0, 0.0, 1.0]);
        for k in 0..100 {
            let (i, _, _) = d.sample_discrete(k as Float / 100.0);
            assert_ne!(i, 1);
        }
    }
}
