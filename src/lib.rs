//! # Hopfield
//!
//! Simulation of Hopfield associative-memory networks: store a set of target
//! patterns into a weight matrix via a learning rule, then repeatedly
//! perturb and relax test patterns toward the learned attractors, recording
//! convergence statistics.
//!
//! ## Structure
//!
//! - [`domain`] — unit-value domains (binary / bipolar): activation, energy,
//!   distance
//! - [`network`] — the network model, builder, learning rules, and the
//!   concurrent relaxation engine
//! - [`states`] — seeded random state generation
//! - [`noise`] — perturbations applied before Delta-rule relaxation
//! - [`collector`] — typed event records and the record-sink boundary
//!
//! ## Example
//!
//! ```
//! use hopfield::{Domain, LearningRule, NetworkBuilder, StateGeneratorBuilder};
//!
//! let mut network = NetworkBuilder::new()
//!     .dimension(10)
//!     .domain(Domain::Bipolar)
//!     .learning_rule(LearningRule::Hebbian)
//!     .units_updated_per_step(1)
//!     .max_iterations(50)
//!     .build()?;
//!
//! let mut generator = StateGeneratorBuilder::new().dimension(10).seed(1).build()?;
//! let targets = generator.create_state_collection(2);
//! network.learn_states(&targets)?;
//!
//! let probes = generator.create_state_collection(8);
//! let results = network.concurrent_relax_states(&probes, &targets, 2)?;
//! assert_eq!(results.len(), probes.len());
//! # Ok::<(), hopfield::HopfieldError>(())
//! ```

pub mod collector;
pub mod domain;
pub mod network;
pub mod noise;
pub mod states;

pub use collector::{
    CollectionEvent, CollectorHandle, DataCollector, EventKind, JsonlSink, RecordSink,
    RelaxationResultRecord, TrialEndRecord,
};
pub use domain::{BinaryDomain, BipolarDomain, Domain, DomainPolicy};
pub use network::builder::NetworkBuilder;
pub use network::learning::{delta, hebbian, LearningRule};
pub use network::relaxation::RelaxationResult;
pub use network::{HopfieldError, HopfieldNetwork, HopfieldResult};
pub use noise::NoiseMethod;
pub use states::{StateGenerator, StateGeneratorBuilder};
