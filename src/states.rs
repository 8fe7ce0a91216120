//! Random state generation for target patterns and test probes.
//!
//! States are drawn componentwise from a uniform range and passed through
//! the domain activation, so every generated state is domain-valid.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::Domain;
use crate::network::{HopfieldError, HopfieldResult};

/// Seeded generator of domain-valid random states.
#[derive(Debug)]
pub struct StateGenerator {
    dimension: usize,
    domain: Domain,
    rand_min: f64,
    rand_max: f64,
    rng: StdRng,
}

impl StateGenerator {
    /// Draw one random state.
    pub fn next_state(&mut self) -> Array1<f64> {
        let mut state = Array1::random_using(
            self.dimension,
            Uniform::new(self.rand_min, self.rand_max),
            &mut self.rng,
        );
        self.domain.policy().activation(&mut state);
        state
    }

    /// Draw a collection of independent random states.
    pub fn create_state_collection(&mut self, count: usize) -> Vec<Array1<f64>> {
        (0..count).map(|_| self.next_state()).collect()
    }
}

/// Builder for [`StateGenerator`].
#[derive(Debug, Clone)]
pub struct StateGeneratorBuilder {
    dimension: usize,
    domain: Domain,
    rand_min: f64,
    rand_max: f64,
    seed: u64,
}

impl Default for StateGeneratorBuilder {
    fn default() -> Self {
        Self {
            dimension: 0,
            domain: Domain::Bipolar,
            rand_min: -1.0,
            rand_max: 1.0,
            seed: 0,
        }
    }
}

impl StateGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of generated states. Required.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Domain whose activation keeps generated states valid.
    pub fn domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Lower bound of the uniform draw (inclusive).
    pub fn rand_min(mut self, rand_min: f64) -> Self {
        self.rand_min = rand_min;
        self
    }

    /// Upper bound of the uniform draw (exclusive).
    pub fn rand_max(mut self, rand_max: f64) -> Self {
        self.rand_max = rand_max;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate and construct the generator.
    ///
    /// # Errors
    /// `InvalidConfig` on a zero dimension or a degenerate / non-finite
    /// uniform range.
    pub fn build(self) -> HopfieldResult<StateGenerator> {
        if self.dimension == 0 {
            return Err(HopfieldError::InvalidConfig(
                "generator dimension must be positive".to_string(),
            ));
        }
        if !self.rand_min.is_finite() || !self.rand_max.is_finite() || self.rand_min >= self.rand_max
        {
            return Err(HopfieldError::InvalidConfig(format!(
                "generator range [{}, {}) is not a valid interval",
                self.rand_min, self.rand_max
            )));
        }

        Ok(StateGenerator {
            dimension: self.dimension,
            domain: self.domain,
            rand_min: self.rand_min,
            rand_max: self.rand_max,
            rng: StdRng::seed_from_u64(self.seed),
        })
    }
}
