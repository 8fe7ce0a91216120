//! Hopfield experiment harness.
//!
//! Runs repeated trials: build a network, learn random target states, relax
//! random test states concurrently, and stream convergence records to JSONL
//! files through the data collector. An interrupt (Ctrl-C) is observed only
//! between trials; an in-flight relaxation batch always runs to completion.

use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use hopfield::{
    CollectionEvent, DataCollector, Domain, EventKind, JsonlSink, LearningRule, NetworkBuilder,
    NoiseMethod, RelaxationResultRecord, StateGeneratorBuilder, TrialEndRecord,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RuleArg {
    Hebbian,
    Delta,
}

impl From<RuleArg> for LearningRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Hebbian => LearningRule::Hebbian,
            RuleArg::Delta => LearningRule::Delta,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    Binary,
    Bipolar,
}

impl From<DomainArg> for Domain {
    fn from(domain: DomainArg) -> Self {
        match domain {
            DomainArg::Binary => Domain::Binary,
            DomainArg::Bipolar => Domain::Bipolar,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "hopfield-experiment",
    about = "Learn target patterns and measure relaxation convergence over repeated trials"
)]
struct Args {
    /// Number of trials to undertake.
    #[arg(long, default_value_t = 1000)]
    trials: usize,

    /// Number of test states relaxed per trial.
    #[arg(long, default_value_t = 1000)]
    test_states: usize,

    /// Number of target states learned per trial.
    #[arg(long, default_value_t = 100)]
    target_states: usize,

    /// Number of relaxation worker threads.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Network dimension (units).
    #[arg(long, default_value_t = 100)]
    dimension: usize,

    /// Distinct units updated per relaxation step.
    #[arg(long, default_value_t = 5)]
    units_per_step: usize,

    /// Learning rule used to store the target states.
    #[arg(long, value_enum, default_value_t = RuleArg::Delta)]
    learning_rule: RuleArg,

    /// Unit-value domain.
    #[arg(long, value_enum, default_value_t = DomainArg::Bipolar)]
    domain: DomainArg,

    /// Learning rate applied to weight and bias deltas.
    #[arg(long, default_value_t = 1.0)]
    learning_rate: f64,

    /// Learning epochs per trial.
    #[arg(long, default_value_t = 100)]
    epochs: usize,

    /// Relaxation step budget per state.
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Updated units allowed to change while still declaring stability.
    #[arg(long, default_value_t = 0)]
    max_unstable_units: usize,

    /// Gaussian noise scale applied before Delta-rule relaxation.
    #[arg(long, default_value_t = 0.25)]
    noise_scale: f64,

    /// File to write per-state relaxation records to (JSONL).
    #[arg(long, default_value = "data/relaxation_results.jsonl")]
    relaxation_result_file: PathBuf,

    /// File to write trial summary records to (JSONL).
    #[arg(long, default_value = "data/trial_end.jsonl")]
    trial_end_file: PathBuf,

    /// Root RNG seed; each trial offsets it by the trial index.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[allow(clippy::cast_precision_loss)]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;
    }

    let collector = DataCollector::new()
        .add_sink(Box::new(JsonlSink::create(
            EventKind::RelaxationResult,
            &args.relaxation_result_file,
        )?))
        .add_sink(Box::new(JsonlSink::create(
            EventKind::TrialEnd,
            &args.trial_end_file,
        )?))
        .start();

    let domain = Domain::from(args.domain);
    let noise_method = if args.noise_scale > 0.0 {
        NoiseMethod::Gaussian
    } else {
        NoiseMethod::None
    };

    for trial in 0..args.trials {
        if interrupted.load(Ordering::SeqCst) {
            warn!(trial, "interrupt received, stopping before next trial");
            break;
        }
        info!(trial, "starting trial");

        let trial_seed = args.seed.wrapping_add(trial as u64);
        let mut network = NetworkBuilder::new()
            .dimension(args.dimension)
            .domain(domain)
            .learning_rule(args.learning_rule.into())
            .learning_rate(args.learning_rate)
            .epochs(args.epochs)
            .units_updated_per_step(args.units_per_step)
            .max_iterations(args.max_iterations)
            .max_unstable_units(args.max_unstable_units)
            .noise(noise_method, args.noise_scale)
            .seed(trial_seed)
            .build()?;

        let mut generator = StateGeneratorBuilder::new()
            .dimension(args.dimension)
            .domain(domain)
            .rand_min(-1.0)
            .rand_max(1.0)
            .seed(trial_seed)
            .build()?;

        let targets = generator.create_state_collection(args.target_states);
        network.learn_states(&targets)?;

        let test_states = generator.create_state_collection(args.test_states);
        let results = network.concurrent_relax_states(&test_states, &targets, args.threads)?;

        let mut num_stable = 0usize;
        let mut stable_steps_taken = 0usize;
        for (state_index, result) in results.iter().enumerate() {
            if result.stable {
                num_stable += 1;
                stable_steps_taken += result.num_steps;
            }
            collector.submit(CollectionEvent::RelaxationResult(RelaxationResultRecord {
                trial_index: trial,
                state_index,
                stable: result.stable,
                num_steps: result.num_steps,
                distances_to_learned: result.distances_to_learned.clone(),
                energy_profile: result.energy_profile.clone(),
            }))?;
        }

        // NaN when no state was stable; the JSON sink emits null.
        let mean_steps = stable_steps_taken as f64 / num_stable as f64;
        collector.submit(CollectionEvent::TrialEnd(TrialEndRecord {
            trial_index: trial,
            num_test_states: args.test_states,
            num_target_states: args.target_states,
            num_stable_states: num_stable,
            stable_states_mean_steps_taken: mean_steps,
        }))?;

        info!(
            trial,
            stable = num_stable,
            test_states = args.test_states,
            "trial complete"
        );
    }

    collector.finish()?;
    info!("data written");
    Ok(())
}
