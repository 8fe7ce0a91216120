//! Hebbian and Delta learning rules.
//!
//! The two rules deliberately differ in how their updates land on the
//! network: [`hebbian`] mutates the weights in place and enforces
//! constraints itself, while [`delta`] returns the raw weight and bias
//! deltas for the caller to scale and apply. Both share the
//! **last-state-wins** bias semantics: the bias delta is overwritten per
//! target inside the batch loop, so only the final target determines it.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{HopfieldNetwork, HopfieldResult};
use crate::domain::{BipolarDomain, DomainPolicy};

/// Worker count for the Delta rule's internal relaxation batch.
const DELTA_WORKER_COUNT: usize = 8;

/// Selector for the learning rule a network trains with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningRule {
    /// One-shot pairwise correlation rule.
    Hebbian,
    /// Iterative Widrow-Hoff-style correction against relaxed noisy copies.
    Delta,
}

/// Apply the Hebbian rule for a batch of target states, in place.
///
/// For each target and each unit pair `(i, j)` the weight delta gains `+1`
/// when `s[i] == s[j]` and `-1` otherwise. The bias delta is overwritten
/// with the raw state per target (last-state-wins). Both deltas are scaled
/// by the learning rate, added to the network, and constraints are enforced.
pub fn hebbian(network: &mut HopfieldNetwork, states: &[Array1<f64>]) {
    let dimension = network.dimension();
    let mut matrix_delta = Array2::<f64>::zeros((dimension, dimension));
    let mut bias_delta = Array1::<f64>::zeros(dimension);

    for state in states {
        // s[i] == s[j] exactly when the bipolar images multiply to +1, so
        // the pairwise +/-1 contributions are the outer product of the
        // state's bipolar image.
        let mut bipolar = state.clone();
        BipolarDomain.activation(&mut bipolar);
        let col = bipolar.view().insert_axis(Axis(1));
        let row = bipolar.view().insert_axis(Axis(0));
        matrix_delta += &(&col * &row);

        // Last-state-wins: each pass overwrites the bias contribution.
        bias_delta.assign(state);
    }

    matrix_delta *= network.learning_rate();
    bias_delta *= network.learning_rate();
    network.matrix += &matrix_delta;
    network.bias += &bias_delta;
    network.enforce_constraints();
}

/// Compute the Delta rule update for a batch of target states.
///
/// Each target is copied, perturbed with the network's configured noise,
/// re-activated, and relaxed concurrently. The bipolar difference between
/// target and relaxed copy then drives an outer-product correction against
/// the bipolar *target* (not the relaxed state). The bias delta is
/// overwritten per target (last-state-wins, as in [`hebbian`]).
///
/// The returned deltas are unscaled; the caller applies them with the
/// learning rate and enforces constraints afterwards. A target whose noisy
/// copy relaxes back onto it contributes (approximately) nothing.
///
/// # Errors
/// Propagates relaxation precondition failures, which cannot occur for
/// targets that already passed the `learn_states` dimension check.
pub fn delta(
    network: &HopfieldNetwork,
    states: &[Array1<f64>],
) -> HopfieldResult<(Array2<f64>, Array1<f64>)> {
    let dimension = network.dimension();
    let policy = network.policy();

    // Private noisy copies, kept domain-valid by re-activation.
    let mut rng = StdRng::seed_from_u64(network.next_seed());
    let noisy: Vec<Array1<f64>> = states
        .iter()
        .map(|state| {
            let mut copy = state.clone();
            network
                .noise_method()
                .apply(&mut rng, &mut copy, network.noise_scale());
            policy.activation(&mut copy);
            copy
        })
        .collect();

    let results = network.concurrent_relax_states(&noisy, &[], DELTA_WORKER_COUNT)?;

    let mut matrix_delta = Array2::<f64>::zeros((dimension, dimension));
    let mut bias_delta = Array1::<f64>::zeros(dimension);

    for (target, result) in states.iter().zip(&results) {
        let mut bipolar_target = target.clone();
        BipolarDomain.activation(&mut bipolar_target);
        let mut bipolar_relaxed = result.final_state().clone();
        BipolarDomain.activation(&mut bipolar_relaxed);

        let difference = &bipolar_target - &bipolar_relaxed;

        let diff_col = difference.view().insert_axis(Axis(1));
        let target_row = bipolar_target.view().insert_axis(Axis(0));
        matrix_delta += &(&diff_col * &target_row);

        bias_delta.assign(&difference);
    }

    Ok((matrix_delta, bias_delta))
}
