//! Concurrent asynchronous relaxation of states toward learned attractors.
//!
//! Each state relaxes independently: every step samples a subset of units,
//! computes all candidate activations from the current full state, applies
//! them simultaneously, and declares stability once at most
//! `max_unstable_units` of the sampled units changed value. A batch is split
//! into `worker_count` contiguous chunks processed in parallel with
//! independent per-worker RNG streams; results come back in input order.
//!
//! Workers hold `&HopfieldNetwork`, so the weight matrix and bias are
//! read-only for the whole batch by construction.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{HopfieldError, HopfieldNetwork, HopfieldResult};

/// Outcome of relaxing one state.
///
/// `state_history` and `energy_profile` are aligned: entry 0 is the initial
/// snapshot, entry `k` the state after step `k`. Both have `num_steps + 1`
/// entries.
#[derive(Debug, Clone)]
pub struct RelaxationResult {
    /// Snapshot of the state after every step, starting with the input.
    pub state_history: Vec<Array1<f64>>,
    /// Whether the state met the stability condition within the budget.
    pub stable: bool,
    /// Number of relaxation steps taken.
    pub num_steps: usize,
    /// Total state energy after every step, aligned with `state_history`.
    pub energy_profile: Vec<f64>,
    /// 2-norm distances from the final state to each reference state.
    pub distances_to_learned: Vec<f64>,
}

impl RelaxationResult {
    /// The state the relaxation finished on.
    pub fn final_state(&self) -> &Array1<f64> {
        // The history always holds at least the initial snapshot.
        &self.state_history[self.state_history.len() - 1]
    }
}

impl HopfieldNetwork {
    /// Relax a single state until stable or the iteration budget runs out.
    ///
    /// The input is copied; the caller's state is never mutated. Distances
    /// are measured from the final state to each member of `learned` (which
    /// may be empty).
    ///
    /// # Errors
    /// `DimensionMismatch` if `state` is not of the network dimension.
    pub fn relax_state<R: Rng>(
        &self,
        state: &Array1<f64>,
        rng: &mut R,
        learned: &[Array1<f64>],
    ) -> HopfieldResult<RelaxationResult> {
        if state.len() != self.dimension() {
            return Err(HopfieldError::DimensionMismatch(format!(
                "state length {} does not match network dimension {}",
                state.len(),
                self.dimension()
            )));
        }

        let policy = self.policy();
        let mut current = state.clone();
        let mut state_history = vec![current.clone()];
        let mut energy_profile = vec![self.state_energy(&current)];
        let mut stable = false;
        let mut num_steps = 0;

        while num_steps < self.max_iterations() && !stable {
            let chosen =
                rand::seq::index::sample(rng, self.dimension(), self.units_updated_per_step());

            // Collect every candidate from the current state before applying
            // any of them: the sampled subset updates simultaneously.
            let candidates: Vec<(usize, f64)> = chosen
                .iter()
                .map(|unit| (unit, policy.activate_value(self.unit_field(&current, unit))))
                .collect();

            let mut unstable_count = 0;
            for (unit, value) in candidates {
                if current[unit] != value {
                    current[unit] = value;
                    unstable_count += 1;
                }
            }

            state_history.push(current.clone());
            energy_profile.push(self.state_energy(&current));
            num_steps += 1;
            stable = unstable_count <= self.max_unstable_units();
        }

        let distances_to_learned = policy.distances_to_collection(learned, &current, 2.0);

        Ok(RelaxationResult {
            state_history,
            stable,
            num_steps,
            energy_profile,
            distances_to_learned,
        })
    }

    /// Relax a batch of states across `worker_count` parallel workers.
    ///
    /// States are partitioned into contiguous chunks (the last chunk may be
    /// smaller); each worker relaxes its chunk sequentially with its own RNG
    /// stream seeded from the network root seed plus the worker index.
    /// Results preserve the input order: `results[i]` belongs to
    /// `states[i]` regardless of scheduling.
    ///
    /// # Errors
    /// `InvalidConfig` if `worker_count` is zero; `DimensionMismatch` if any
    /// state is not of the network dimension.
    pub fn concurrent_relax_states(
        &self,
        states: &[Array1<f64>],
        learned: &[Array1<f64>],
        worker_count: usize,
    ) -> HopfieldResult<Vec<RelaxationResult>> {
        if worker_count == 0 {
            return Err(HopfieldError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        for (index, state) in states.iter().enumerate() {
            if state.len() != self.dimension() {
                return Err(HopfieldError::DimensionMismatch(format!(
                    "state {}: expected length {}, got {}",
                    index,
                    self.dimension(),
                    state.len()
                )));
            }
        }
        if states.is_empty() {
            return Ok(Vec::new());
        }

        let batch_seed = self.next_seed();
        let chunk_size = (states.len() + worker_count - 1) / worker_count;

        let chunk_results: HopfieldResult<Vec<Vec<RelaxationResult>>> = states
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(worker, chunk)| {
                let mut rng = StdRng::seed_from_u64(batch_seed.wrapping_add(worker as u64));
                chunk
                    .iter()
                    .map(|state| self.relax_state(state, &mut rng, learned))
                    .collect()
            })
            .collect();

        Ok(chunk_results?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::network::builder::NetworkBuilder;
    use crate::network::learning::LearningRule;
    use ndarray::arr1;

    fn trained_network(units_per_step: usize) -> HopfieldNetwork {
        let mut network = NetworkBuilder::new()
            .dimension(4)
            .domain(Domain::Bipolar)
            .learning_rule(LearningRule::Hebbian)
            .learning_rate(1.0)
            .units_updated_per_step(units_per_step)
            .max_iterations(50)
            .build()
            .expect("valid configuration");
        let pattern = arr1(&[1.0, -1.0, 1.0, -1.0]);
        network.learn_states(std::slice::from_ref(&pattern)).expect("learn");
        network
    }

    #[test]
    fn stored_pattern_relaxes_in_one_step() {
        let network = trained_network(1);
        let pattern = arr1(&[1.0, -1.0, 1.0, -1.0]);
        let mut rng = StdRng::seed_from_u64(1);

        let result = network.relax_state(&pattern, &mut rng, &[]).expect("relax");
        assert!(result.stable);
        assert_eq!(result.num_steps, 1);
        assert_eq!(result.final_state(), &pattern);
    }

    #[test]
    fn history_and_energy_profile_are_aligned() {
        let network = trained_network(2);
        let probe = arr1(&[1.0, 1.0, 1.0, -1.0]);
        let mut rng = StdRng::seed_from_u64(3);

        let result = network.relax_state(&probe, &mut rng, &[]).expect("relax");
        assert_eq!(result.state_history.len(), result.num_steps + 1);
        assert_eq!(result.energy_profile.len(), result.num_steps + 1);
        assert_eq!(&result.state_history[0], &probe);
    }

    #[test]
    fn relax_rejects_mismatched_state() {
        let network = trained_network(1);
        let mut rng = StdRng::seed_from_u64(1);
        let bad = arr1(&[1.0, -1.0]);
        assert!(matches!(
            network.relax_state(&bad, &mut rng, &[]),
            Err(HopfieldError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn concurrent_relax_rejects_zero_workers() {
        let network = trained_network(1);
        let states = vec![arr1(&[1.0, -1.0, 1.0, -1.0])];
        assert!(matches!(
            network.concurrent_relax_states(&states, &[], 0),
            Err(HopfieldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn concurrent_relax_on_empty_batch_is_empty() {
        let network = trained_network(1);
        let results = network.concurrent_relax_states(&[], &[], 4).expect("relax");
        assert!(results.is_empty());
    }

    #[test]
    fn distances_measured_against_reference_collection() {
        let network = trained_network(1);
        let pattern = arr1(&[1.0, -1.0, 1.0, -1.0]);
        let learned = vec![pattern.clone()];
        let mut rng = StdRng::seed_from_u64(5);

        let result = network
            .relax_state(&pattern, &mut rng, &learned)
            .expect("relax");
        assert_eq!(result.distances_to_learned.len(), 1);
        assert_eq!(result.distances_to_learned[0], 0.0);
    }
}
