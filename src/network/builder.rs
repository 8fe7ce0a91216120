//! Validating configuration assembly for [`HopfieldNetwork`].
//!
//! The builder collects every knob the network needs, validates the full set
//! in [`build`](NetworkBuilder::build), and fails fast with
//! [`HopfieldError::InvalidConfig`] rather than deferring problems to first
//! use.

use std::sync::atomic::AtomicU64;

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::learning::LearningRule;
use super::{HopfieldError, HopfieldNetwork, HopfieldResult};
use crate::domain::Domain;
use crate::noise::NoiseMethod;

/// Builder for [`HopfieldNetwork`]. See module docs.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    dimension: usize,
    learning_rate: f64,
    domain: Domain,
    learning_rule: LearningRule,
    epochs: usize,
    max_iterations: usize,
    units_updated_per_step: usize,
    max_unstable_units: usize,
    noise_method: NoiseMethod,
    noise_scale: f64,
    rand_matrix_init: bool,
    seed: u64,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            dimension: 0,
            learning_rate: 1.0,
            domain: Domain::Bipolar,
            learning_rule: LearningRule::Hebbian,
            epochs: 1,
            max_iterations: 100,
            units_updated_per_step: 1,
            max_unstable_units: 0,
            noise_method: NoiseMethod::None,
            noise_scale: 0.0,
            rand_matrix_init: false,
            seed: 0,
        }
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of units. Required; there is no usable default.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn learning_rule(mut self, learning_rule: LearningRule) -> Self {
        self.learning_rule = learning_rule;
        self
    }

    /// Number of learning-rule applications attempted per `learn_states` call.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Relaxation step budget per state.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Distinct units sampled and updated per relaxation step.
    pub fn units_updated_per_step(mut self, units: usize) -> Self {
        self.units_updated_per_step = units;
        self
    }

    /// How many of the updated units may still change value in a step that
    /// declares the state stable. Zero means a strict fixed point under the
    /// sampled subset.
    pub fn max_unstable_units(mut self, max_unstable_units: usize) -> Self {
        self.max_unstable_units = max_unstable_units;
        self
    }

    /// Perturbation applied to target copies before Delta-rule relaxation.
    pub fn noise(mut self, method: NoiseMethod, scale: f64) -> Self {
        self.noise_method = method;
        self.noise_scale = scale;
        self
    }

    /// Initialize weights uniformly in `[-1, 1)` instead of zero.
    pub fn rand_matrix_init(mut self, rand_matrix_init: bool) -> Self {
        self.rand_matrix_init = rand_matrix_init;
        self
    }

    /// Root seed for weight init, noise, and per-worker relaxation streams.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration and construct the network.
    ///
    /// # Errors
    /// `InvalidConfig` on any of: zero dimension, non-finite learning rate,
    /// `units_updated_per_step` outside `[1, dimension]`,
    /// `max_unstable_units >= units_updated_per_step`, zero iteration or
    /// epoch budget, or a non-finite / negative noise scale.
    pub fn build(self) -> HopfieldResult<HopfieldNetwork> {
        if self.dimension == 0 {
            return Err(HopfieldError::InvalidConfig(
                "dimension must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(HopfieldError::InvalidConfig(format!(
                "learning rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if self.units_updated_per_step == 0 || self.units_updated_per_step > self.dimension {
            return Err(HopfieldError::InvalidConfig(format!(
                "units updated per step must be in [1, {}], got {}",
                self.dimension, self.units_updated_per_step
            )));
        }
        if self.max_unstable_units >= self.units_updated_per_step {
            return Err(HopfieldError::InvalidConfig(format!(
                "max unstable units ({}) must be less than units updated per step ({})",
                self.max_unstable_units, self.units_updated_per_step
            )));
        }
        if self.max_iterations == 0 {
            return Err(HopfieldError::InvalidConfig(
                "maximum relaxation iterations must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(HopfieldError::InvalidConfig(
                "epochs must be positive".to_string(),
            ));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(HopfieldError::InvalidConfig(format!(
                "noise scale must be finite and non-negative, got {}",
                self.noise_scale
            )));
        }

        let matrix = if self.rand_matrix_init {
            let mut rng = StdRng::seed_from_u64(self.seed);
            Array2::random_using(
                (self.dimension, self.dimension),
                Uniform::new(-1.0, 1.0),
                &mut rng,
            )
        } else {
            Array2::zeros((self.dimension, self.dimension))
        };

        let mut network = HopfieldNetwork {
            matrix,
            bias: Array1::zeros(self.dimension),
            dimension: self.dimension,
            learning_rate: self.learning_rate,
            domain: self.domain,
            learning_rule: self.learning_rule,
            epochs: self.epochs,
            max_iterations: self.max_iterations,
            units_updated_per_step: self.units_updated_per_step,
            max_unstable_units: self.max_unstable_units,
            noise_method: self.noise_method,
            noise_scale: self.noise_scale,
            seed: self.seed,
            seed_counter: AtomicU64::new(0),
        };
        network.enforce_constraints();
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimension() {
        assert!(NetworkBuilder::new().build().is_err());
    }

    #[test]
    fn rejects_zero_units_per_step() {
        let result = NetworkBuilder::new()
            .dimension(10)
            .units_updated_per_step(0)
            .build();
        assert!(matches!(result, Err(HopfieldError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_units_per_step_above_dimension() {
        let result = NetworkBuilder::new()
            .dimension(10)
            .units_updated_per_step(11)
            .build();
        assert!(matches!(result, Err(HopfieldError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_max_unstable_at_or_above_units_per_step() {
        let result = NetworkBuilder::new()
            .dimension(10)
            .units_updated_per_step(3)
            .max_unstable_units(3)
            .build();
        assert!(matches!(result, Err(HopfieldError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_finite_learning_rate() {
        let result = NetworkBuilder::new()
            .dimension(10)
            .learning_rate(f64::NAN)
            .build();
        assert!(matches!(result, Err(HopfieldError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_negative_noise_scale() {
        let result = NetworkBuilder::new()
            .dimension(10)
            .noise(crate::noise::NoiseMethod::Gaussian, -0.5)
            .build();
        assert!(matches!(result, Err(HopfieldError::InvalidConfig(_))));
    }

    #[test]
    fn accepts_full_subset_updates() {
        let network = NetworkBuilder::new()
            .dimension(10)
            .units_updated_per_step(10)
            .build()
            .expect("units == dimension is valid");
        assert_eq!(network.units_updated_per_step(), 10);
    }

    #[test]
    fn random_init_is_seeded_and_zero_diagonal() {
        let a = NetworkBuilder::new()
            .dimension(6)
            .rand_matrix_init(true)
            .seed(99)
            .build()
            .expect("build");
        let b = NetworkBuilder::new()
            .dimension(6)
            .rand_matrix_init(true)
            .seed(99)
            .build()
            .expect("build");

        assert_eq!(a.matrix(), b.matrix());
        assert!(a.matrix().iter().any(|&w| w != 0.0));
        for i in 0..6 {
            assert_eq!(a.matrix()[[i, i]], 0.0);
        }
    }
}
