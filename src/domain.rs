//! Unit-value domains and their activation, energy, and distance functions.
//!
//! A network operates over a two-valued domain: binary `{0, 1}` or bipolar
//! `{-1, 1}`. Each domain is a stateless strategy object implementing
//! [`DomainPolicy`], selected once at build time via [`Domain`] and held for
//! the lifetime of the network.
//!
//! ## Energy
//!
//! The energy contribution of unit `i` in state `s` is
//! ```text
//! E_i = -0.5 * Σ_j W[i,j] * s[i] * f(s[j])
//! ```
//! where `f` is the identity for the bipolar domain and the affine remap
//! `2x - 1` for the binary domain, keeping energies comparable across
//! domains. The bipolar domain additionally subtracts `s[i] * bias[i]`; the
//! binary energy carries no bias term.

use ndarray::{Array1, Array2};

/// Selector for the unit-value domain a network operates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Units take values in `{0, 1}`.
    Binary,
    /// Units take values in `{-1, 1}`.
    Bipolar,
}

impl Domain {
    /// The stateless policy object for this domain.
    pub fn policy(self) -> &'static dyn DomainPolicy {
        match self {
            Domain::Binary => &BinaryDomain,
            Domain::Bipolar => &BipolarDomain,
        }
    }
}

/// Activation, energy, and distance functions for a two-valued unit domain.
///
/// Implementors are stateless; all state lives in the vectors and matrices
/// passed in. Energies are IEEE `f64` with no special handling of NaN or
/// infinity — callers must ensure finite weights.
pub trait DomainPolicy: Send + Sync {
    /// The domain's "low" value, produced for pre-activations `<= 0`.
    fn low(&self) -> f64;

    /// The domain's "high" value, produced for positive pre-activations.
    fn high(&self) -> f64;

    /// Threshold a single pre-activation value into the domain.
    fn activate_value(&self, x: f64) -> f64 {
        if x <= 0.0 {
            self.low()
        } else {
            self.high()
        }
    }

    /// Threshold each component of `state` in place.
    fn activation(&self, state: &mut Array1<f64>) {
        let (low, high) = (self.low(), self.high());
        state.mapv_inplace(|v| if v <= 0.0 { low } else { high });
    }

    /// Replace `state` with its domain-consistent complement, in place.
    fn invert(&self, state: &mut Array1<f64>);

    /// Energy contribution of one unit to the total state energy.
    fn unit_energy(
        &self,
        matrix: &Array2<f64>,
        bias: &Array1<f64>,
        state: &Array1<f64>,
        unit: usize,
    ) -> f64;

    /// Per-unit energies for every unit at once.
    ///
    /// Componentwise consistent with [`unit_energy`](Self::unit_energy).
    fn all_unit_energies(
        &self,
        matrix: &Array2<f64>,
        bias: &Array1<f64>,
        state: &Array1<f64>,
    ) -> Array1<f64>;

    /// Total energy of `state`: the sum of all unit energies.
    fn state_energy(&self, matrix: &Array2<f64>, bias: &Array1<f64>, state: &Array1<f64>) -> f64 {
        self.all_unit_energies(matrix, bias, state).sum()
    }

    /// p-norm of the elementwise difference between two states.
    fn distance(&self, a: &Array1<f64>, b: &Array1<f64>, norm: f64) -> f64 {
        (a - b).mapv(|d| d.abs().powf(norm)).sum().powf(1.0 / norm)
    }

    /// Distances from `state` to each member of a reference collection.
    fn distances_to_collection(
        &self,
        collection: &[Array1<f64>],
        state: &Array1<f64>,
        norm: f64,
    ) -> Vec<f64> {
        collection
            .iter()
            .map(|reference| self.distance(reference, state, norm))
            .collect()
    }
}

/// The `{0, 1}` domain.
#[derive(Debug, Clone, Copy)]
pub struct BinaryDomain;

impl DomainPolicy for BinaryDomain {
    fn low(&self) -> f64 {
        0.0
    }

    fn high(&self) -> f64 {
        1.0
    }

    fn invert(&self, state: &mut Array1<f64>) {
        state.mapv_inplace(|v| 1.0 - v);
        self.activation(state);
    }

    fn unit_energy(
        &self,
        matrix: &Array2<f64>,
        _bias: &Array1<f64>,
        state: &Array1<f64>,
        unit: usize,
    ) -> f64 {
        // The binary energy has no bias term; the argument is kept for
        // signature parity with the bipolar domain.
        let mut energy = 0.0;
        for j in 0..state.len() {
            energy += -0.5 * matrix[[unit, j]] * state[unit] * (2.0 * state[j] - 1.0);
        }
        energy
    }

    fn all_unit_energies(
        &self,
        matrix: &Array2<f64>,
        _bias: &Array1<f64>,
        state: &Array1<f64>,
    ) -> Array1<f64> {
        let mapped = state.mapv(|v| 2.0 * v - 1.0);
        let field = matrix.dot(&mapped);
        (state * &field) * -0.5
    }
}

/// The `{-1, 1}` domain.
#[derive(Debug, Clone, Copy)]
pub struct BipolarDomain;

impl DomainPolicy for BipolarDomain {
    fn low(&self) -> f64 {
        -1.0
    }

    fn high(&self) -> f64 {
        1.0
    }

    fn invert(&self, state: &mut Array1<f64>) {
        state.mapv_inplace(|v| -v);
        self.activation(state);
    }

    fn unit_energy(
        &self,
        matrix: &Array2<f64>,
        bias: &Array1<f64>,
        state: &Array1<f64>,
        unit: usize,
    ) -> f64 {
        let mut energy = 0.0;
        for j in 0..state.len() {
            energy += -0.5 * matrix[[unit, j]] * state[unit] * state[j];
        }
        energy - state[unit] * bias[unit]
    }

    fn all_unit_energies(
        &self,
        matrix: &Array2<f64>,
        bias: &Array1<f64>,
        state: &Array1<f64>,
    ) -> Array1<f64> {
        let field = matrix.dot(state);
        (state * &field) * -0.5 - (state * bias)
    }
}
