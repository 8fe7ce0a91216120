//! Integration tests for the learning rules through the public API.

use approx::assert_abs_diff_eq;
use hopfield::{hebbian, Domain, LearningRule, NetworkBuilder, NoiseMethod};
use ndarray::arr1;

#[test]
fn hebbian_bias_is_last_state_wins() {
    let mut network = NetworkBuilder::new()
        .dimension(4)
        .domain(Domain::Bipolar)
        .learning_rate(0.5)
        .build()
        .expect("build");

    let first = arr1(&[1.0, 1.0, -1.0, -1.0]);
    let second = arr1(&[-1.0, 1.0, 1.0, -1.0]);
    hebbian(&mut network, &[first, second.clone()]);

    // The bias carries only the final target of the batch, scaled by the
    // learning rate; earlier targets leave no trace in it.
    let expected = second.mapv(|v| 0.5 * v);
    for (actual, expected) in network.bias().iter().zip(expected.iter()) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-12);
    }
}

#[test]
fn hebbian_weights_accumulate_over_a_batch() {
    let mut network = NetworkBuilder::new()
        .dimension(4)
        .domain(Domain::Bipolar)
        .learning_rate(1.0)
        .build()
        .expect("build");

    let first = arr1(&[1.0, 1.0, -1.0, -1.0]);
    let second = arr1(&[1.0, -1.0, 1.0, -1.0]);
    hebbian(&mut network, &[first.clone(), second.clone()]);

    // Off-diagonal weights are the summed pairwise +/-1 contributions of
    // both targets; the diagonal stays zero.
    for i in 0..4 {
        for j in 0..4 {
            let contribution = |state: &ndarray::Array1<f64>| {
                if state[i] == state[j] {
                    1.0
                } else {
                    -1.0
                }
            };
            let expected = if i == j {
                0.0
            } else {
                contribution(&first) + contribution(&second)
            };
            assert_abs_diff_eq!(network.matrix()[[i, j]], expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn hebbian_end_to_end_recall_of_a_single_pattern() {
    let mut network = NetworkBuilder::new()
        .dimension(10)
        .domain(Domain::Bipolar)
        .learning_rule(LearningRule::Hebbian)
        .units_updated_per_step(1)
        .max_iterations(50)
        .seed(5)
        .build()
        .expect("build");

    let pattern = arr1(&[1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0]);
    network
        .learn_states(std::slice::from_ref(&pattern))
        .expect("learn");

    let targets = vec![pattern.clone()];
    let results = network
        .concurrent_relax_states(std::slice::from_ref(&pattern), &targets, 1)
        .expect("relax");
    let result = &results[0];

    assert!(result.stable);
    assert!(result.num_steps <= 10);
    assert_eq!(result.final_state(), &pattern);
    assert_abs_diff_eq!(result.distances_to_learned[0], 0.0, epsilon = 1e-12);
}

#[test]
fn delta_learning_stores_a_single_target() {
    // With zero initial weights the noisy copy relaxes away from the target,
    // so the first epoch's correction already makes the target a fixed point.
    let mut network = NetworkBuilder::new()
        .dimension(10)
        .domain(Domain::Bipolar)
        .learning_rule(LearningRule::Delta)
        .learning_rate(1.0)
        .epochs(20)
        .units_updated_per_step(5)
        .max_iterations(50)
        .noise(NoiseMethod::Gaussian, 0.3)
        .seed(21)
        .build()
        .expect("build");

    let pattern = arr1(&[1.0, 1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);
    network
        .learn_states(std::slice::from_ref(&pattern))
        .expect("learn");

    assert!(network.state_is_stable(&pattern));
    for i in 0..10 {
        assert_eq!(network.matrix()[[i, i]], 0.0);
    }
}

#[test]
fn binary_domain_round_trip_through_learning_and_relaxation() {
    let mut network = NetworkBuilder::new()
        .dimension(8)
        .domain(Domain::Binary)
        .learning_rule(LearningRule::Hebbian)
        .units_updated_per_step(2)
        .max_iterations(50)
        .seed(9)
        .build()
        .expect("build");

    let pattern = arr1(&[1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    network
        .learn_states(std::slice::from_ref(&pattern))
        .expect("learn");
    assert!(network.state_is_stable(&pattern));

    let results = network
        .concurrent_relax_states(std::slice::from_ref(&pattern), &[], 1)
        .expect("relax");
    assert!(results[0].stable);
    assert!(results[0]
        .final_state()
        .iter()
        .all(|&v| v == 0.0 || v == 1.0));
}
