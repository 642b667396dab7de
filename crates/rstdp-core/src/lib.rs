//! Integer LIF neuron / R-STDP synapse tick engine.
//!
//! Owns the data model, topology builder, and the phase-ordered tick
//! pipeline (integration, propagation/plasticity, pruning, causal trace,
//! history shift). Pure integer/array arithmetic; no I/O, no threads.

pub mod brain;
pub mod error;
pub mod neuron;
pub mod params;
pub mod roles;
pub mod synapse;
pub mod topology;

pub use brain::{Brain, TickOutcome};
pub use error::{CoreError, Result};
pub use neuron::{Contribution, Neuron};
pub use params::Params;
pub use roles::Role;
pub use synapse::Synapse;
