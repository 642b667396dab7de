//! Simulation-wide constants controlling neuron, synapse, and world dynamics

use crate::error::{CoreError, Result};
use core::ops::Range;

/// Length of the history ring buffers (`contrib_history`, `spike_history`).
pub const MAX_HIST: usize = 32;

/// Depth limit for the Phase-4 causal trace.
pub const MAX_TRACE: usize = 12;

/// Index range occupied by sensor neurons (external inputs only).
pub const SENSOR_RANGE: Range<usize> = 0..4;
/// Index range occupied by motor neurons (read out by the world).
pub const MOTOR_RANGE: Range<usize> = 4..6;
/// Index range occupied by sensor-fanout neurons.
pub const FANOUT_RANGE: Range<usize> = 6..10;
/// Index range occupied by motor-fanin neurons.
pub const FANIN_RANGE: Range<usize> = 10..12;
/// First index of the unconstrained hidden population.
pub const HIDDEN_START: usize = 12;

/// Parameters controlling neuron integration, synaptic plasticity, pruning,
/// and the world, with the shipped defaults from the original simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Firing threshold on membrane voltage
    pub v_thresh: i32,
    /// Resting/floor voltage
    pub v_rest: i32,
    /// Ticks a neuron stays refractory after spiking
    pub refractory_period: u32,
    /// Ticks between unit decrements of a positive, otherwise-idle voltage
    pub membrane_decay_period: u32,
    /// Maximum synaptic confidence
    pub confidence_max: i32,
    /// Minimum confidence at which a synapse conducts
    pub confidence_thr: i32,
    /// Width of the short pre/post spike trace window
    pub spike_trace_window: u32,
    /// Width of the eligibility trace window
    pub eligibility_trace_window: u32,
    /// Ticks between confidence halving events
    pub confidence_leak_period: u32,
    /// Lockout length after a successful reinforcement
    pub reinforcement_inertia_period: u32,
    /// Ticks between pruning/rewiring passes
    pub pruning_period: u64,
    /// Number of cells in the 1-D world track
    pub world_size: i32,
    /// Number of neurons in the brain
    pub brain_size: usize,
    /// Probability of drawing a random hidden-hidden connection
    pub connection_density: f64,
    /// Number of extra pulses injected by the random activity generator
    pub random_activity_count: u32,
    /// Period, in ticks, between random activity injections
    pub random_activity_period: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            v_thresh: 2,
            v_rest: 0,
            refractory_period: 1,
            membrane_decay_period: 750,
            confidence_max: 5,
            confidence_thr: 1,
            spike_trace_window: 10,
            eligibility_trace_window: 100,
            confidence_leak_period: 5300,
            reinforcement_inertia_period: 10,
            pruning_period: 150,
            world_size: 60,
            brain_size: 36,
            connection_density: 0.1,
            random_activity_count: 1,
            random_activity_period: 5,
        }
    }
}

impl Params {
    /// Validate internal consistency of the parameter set.
    ///
    /// Rejecting an inconsistent `Params` is a Configuration fault: the
    /// caller should log and fall back to `Params::default()`, not panic.
    pub fn validate(&self) -> Result<()> {
        if self.v_thresh <= self.v_rest {
            return Err(CoreError::invalid_config(format!(
                "v_thresh ({}) must be greater than v_rest ({})",
                self.v_thresh, self.v_rest
            )));
        }
        if self.confidence_thr <= 0 || self.confidence_thr > self.confidence_max {
            return Err(CoreError::invalid_config(format!(
                "confidence_thr ({}) must be in (0, confidence_max={}]",
                self.confidence_thr, self.confidence_max
            )));
        }
        if self.brain_size <= HIDDEN_START {
            return Err(CoreError::invalid_config(format!(
                "brain_size ({}) must leave room for at least one hidden neuron past index {}",
                self.brain_size, HIDDEN_START
            )));
        }
        if !(0.0..=1.0).contains(&self.connection_density) {
            return Err(CoreError::invalid_config(format!(
                "connection_density ({}) must be in [0.0, 1.0]",
                self.connection_density
            )));
        }
        if self.pruning_period == 0 {
            return Err(CoreError::invalid_config(
                "pruning_period must be greater than zero",
            ));
        }
        if self.world_size <= 2 {
            return Err(CoreError::invalid_config(format!(
                "world_size ({}) must be greater than 2",
                self.world_size
            )));
        }
        Ok(())
    }

    /// Build a `Params` from the shipped defaults, applying validation.
    pub fn shipped() -> Result<Self> {
        let params = Self::default();
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_validate() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut p = Params::default();
        p.v_thresh = p.v_rest;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_invalid_density_rejected() {
        let mut p = Params::default();
        p.connection_density = 1.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_brain_too_small_rejected() {
        let mut p = Params::default();
        p.brain_size = HIDDEN_START;
        assert!(p.validate().is_err());
    }
}
