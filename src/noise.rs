//! Perturbations applied to target copies before Delta-rule relaxation.

use ndarray::Array1;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;

/// How a state is perturbed before being relaxed during Delta learning.
///
/// The scale is configured on the network builder and validated there
/// (finite, non-negative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseMethod {
    /// Leave the state untouched.
    None,
    /// Add independent `N(0, scale)` noise to every unit.
    Gaussian,
}

impl NoiseMethod {
    /// Perturb `state` in place. Callers re-apply the domain activation
    /// afterwards to keep the state domain-valid.
    pub fn apply<R: Rng>(self, rng: &mut R, state: &mut Array1<f64>, scale: f64) {
        match self {
            NoiseMethod::None => {}
            NoiseMethod::Gaussian => {
                state.mapv_inplace(|v| v + scale * rng.sample::<f64, _>(StandardNormal));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn none_leaves_state_untouched() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = arr1(&[1.0, -1.0, 1.0]);
        NoiseMethod::None.apply(&mut rng, &mut state, 10.0);
        assert_eq!(state, arr1(&[1.0, -1.0, 1.0]));
    }

    #[test]
    fn gaussian_with_zero_scale_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = arr1(&[1.0, -1.0, 1.0]);
        NoiseMethod::Gaussian.apply(&mut rng, &mut state, 0.0);
        assert_eq!(state, arr1(&[1.0, -1.0, 1.0]));
    }

    #[test]
    fn gaussian_is_reproducible_for_a_fixed_seed() {
        let mut a = arr1(&[0.0; 8]);
        let mut b = arr1(&[0.0; 8]);
        NoiseMethod::Gaussian.apply(&mut StdRng::seed_from_u64(42), &mut a, 0.5);
        NoiseMethod::Gaussian.apply(&mut StdRng::seed_from_u64(42), &mut b, 0.5);
        assert_eq!(a, b);
        assert!(a.iter().any(|&v| v != 0.0));
    }
}
