//! Network model: weight matrix, bias vector, constraint enforcement, and the
//! training entry point.
//!
//! A [`HopfieldNetwork`] is assembled by the [`builder`] and then mutated only
//! by learning rules ([`learning`]); relaxation ([`relaxation`]) reads it
//! through `&HopfieldNetwork`, so the type system guarantees workers cannot
//! touch the weights. Callers must not invoke a learning rule while a
//! relaxation batch over the same network is in flight.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::{Array1, Array2};

use crate::domain::{Domain, DomainPolicy};
use crate::noise::NoiseMethod;

pub mod builder;
pub mod learning;
pub mod relaxation;

use learning::LearningRule;

/// Multiplier decorrelating successive seed draws (Weyl sequence increment).
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Error type for network construction and precondition violations.
#[derive(Debug, Clone)]
pub enum HopfieldError {
    /// Invalid configuration rejected at build time.
    InvalidConfig(String),
    /// A state's length does not match the network dimension.
    DimensionMismatch(String),
}

impl fmt::Display for HopfieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopfieldError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            HopfieldError::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
        }
    }
}

impl Error for HopfieldError {}

pub type HopfieldResult<T> = Result<T, HopfieldError>;

/// A Hopfield associative-memory network.
///
/// Owns the weight matrix and bias vector; the domain policy, learning rule,
/// and relaxation parameters are fixed at build time. The network holds no
/// references to training data.
pub struct HopfieldNetwork {
    matrix: Array2<f64>,
    bias: Array1<f64>,
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
    seed: u64,
    seed_counter: AtomicU64,
}

impl fmt::Debug for HopfieldNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HopfieldNetwork")
            .field("dimension", &self.dimension)
            .field("domain", &self.domain)
            .field("learning_rule", &self.learning_rule)
            .field("learning_rate", &self.learning_rate)
            .field("units_updated_per_step", &self.units_updated_per_step)
            .field("max_iterations", &self.max_iterations)
            .field("max_unstable_units", &self.max_unstable_units)
            .field("matrix", &format!("<{0}x{0} weight matrix>", self.dimension))
            .field("bias", &format!("<{} bias vector>", self.dimension))
            .finish()
    }
}

impl HopfieldNetwork {
    /// Number of units in the network.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Read-only view of the weight matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Read-only view of the bias vector.
    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The domain policy this network's units operate under.
    pub fn policy(&self) -> &'static dyn DomainPolicy {
        self.domain.policy()
    }

    pub fn learning_rule(&self) -> LearningRule {
        self.learning_rule
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn units_updated_per_step(&self) -> usize {
        self.units_updated_per_step
    }

    pub fn max_unstable_units(&self) -> usize {
        self.max_unstable_units
    }

    pub fn noise_method(&self) -> NoiseMethod {
        self.noise_method
    }

    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    /// Total energy of `state` under this network's weights and domain.
    pub fn state_energy(&self, state: &Array1<f64>) -> f64 {
        self.policy().state_energy(&self.matrix, &self.bias, state)
    }

    /// Per-unit energies of `state`.
    pub fn all_unit_energies(&self, state: &Array1<f64>) -> Array1<f64> {
        self.policy().all_unit_energies(&self.matrix, &self.bias, state)
    }

    /// Pre-activation field of one unit given the full current state.
    pub(crate) fn unit_field(&self, state: &Array1<f64>, unit: usize) -> f64 {
        self.matrix.row(unit).dot(state) + self.bias[unit]
    }

    /// True when a full synchronous update leaves every unit unchanged.
    pub fn state_is_stable(&self, state: &Array1<f64>) -> bool {
        let policy = self.policy();
        (0..self.dimension).all(|unit| policy.activate_value(self.unit_field(state, unit)) == state[unit])
    }

    /// True when every state in the collection is stable.
    pub fn all_states_are_stable(&self, states: &[Array1<f64>]) -> bool {
        states.iter().all(|state| self.state_is_stable(state))
    }

    /// Re-establish weight invariants after an update: the diagonal is
    /// forced to zero (a unit never drives itself).
    pub(crate) fn enforce_constraints(&mut self) {
        self.matrix.diag_mut().fill(0.0);
    }

    /// A fresh seed base for one relaxation batch or noise pass.
    ///
    /// Advancing an atomic counter keeps repeated batches over the same
    /// network from replaying identical unit-selection streams while staying
    /// deterministic for a fixed root seed.
    pub(crate) fn next_seed(&self) -> u64 {
        let draw = self.seed_counter.fetch_add(1, Ordering::Relaxed);
        self.seed.wrapping_add(draw.wrapping_mul(SEED_STRIDE))
    }

    /// Learn the target states with the configured rule.
    ///
    /// Applies the rule once per epoch, up to the configured epoch count,
    /// exiting early once every target is stable under a full synchronous
    /// update. Hebbian mutates the network directly; Delta returns deltas
    /// which are scaled by the learning rate and applied here, with
    /// constraints enforced after every application.
    ///
    /// # Errors
    /// `DimensionMismatch` if any target's length differs from the network
    /// dimension.
    pub fn learn_states(&mut self, targets: &[Array1<f64>]) -> HopfieldResult<()> {
        for (index, target) in targets.iter().enumerate() {
            if target.len() != self.dimension {
                return Err(HopfieldError::DimensionMismatch(format!(
                    "target state {}: expected length {}, got {}",
                    index,
                    self.dimension,
                    target.len()
                )));
            }
        }

        for epoch in 0..self.epochs {
            if self.all_states_are_stable(targets) {
                tracing::debug!(epoch, "all target states stable, stopping learning");
                break;
            }
            match self.learning_rule {
                LearningRule::Hebbian => learning::hebbian(self, targets),
                LearningRule::Delta => {
                    let (matrix_delta, bias_delta) = learning::delta(&*self, targets)?;
                    self.matrix.scaled_add(self.learning_rate, &matrix_delta);
                    self.bias.scaled_add(self.learning_rate, &bias_delta);
                    self.enforce_constraints();
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::builder::NetworkBuilder;
    use super::*;
    use ndarray::arr1;

    fn small_network() -> HopfieldNetwork {
        NetworkBuilder::new()
            .dimension(4)
            .domain(Domain::Bipolar)
            .learning_rule(LearningRule::Hebbian)
            .learning_rate(1.0)
            .units_updated_per_step(1)
            .max_iterations(20)
            .build()
            .expect("valid configuration")
    }

    #[test]
    fn fresh_network_has_zero_weights_and_bias() {
        let network = small_network();
        assert!(network.matrix().iter().all(|&w| w == 0.0));
        assert!(network.bias().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn learn_states_rejects_mismatched_dimension() {
        let mut network = small_network();
        let bad = vec![arr1(&[1.0, -1.0])];
        assert!(matches!(
            network.learn_states(&bad),
            Err(HopfieldError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn learned_pattern_is_stable() {
        let mut network = small_network();
        let pattern = arr1(&[1.0, -1.0, 1.0, -1.0]);
        network.learn_states(std::slice::from_ref(&pattern)).expect("learn");

        assert!(network.state_is_stable(&pattern));
        // Diagonal stays zero after constraint enforcement.
        for i in 0..4 {
            assert_eq!(network.matrix()[[i, i]], 0.0);
        }
    }

    #[test]
    fn learning_stops_once_targets_are_stable() {
        let mut network = NetworkBuilder::new()
            .dimension(4)
            .domain(Domain::Bipolar)
            .learning_rule(LearningRule::Hebbian)
            .learning_rate(1.0)
            .epochs(50)
            .build()
            .expect("valid configuration");

        let pattern = arr1(&[1.0, 1.0, -1.0, -1.0]);
        network.learn_states(std::slice::from_ref(&pattern)).expect("learn");
        let after_first = network.matrix().clone();

        // A second call finds the target already stable and changes nothing.
        network.learn_states(std::slice::from_ref(&pattern)).expect("learn");
        assert_eq!(network.matrix(), &after_first);
    }

    #[test]
    fn next_seed_advances_between_draws() {
        let network = small_network();
        let first = network.next_seed();
        let second = network.next_seed();
        assert_ne!(first, second);
    }
}
