//! Structural role of a neuron, derived from its index rather than a subtype.
//!
//! Role membership is a pure function of index range: sensors, motors, the
//! fixed first layer, and the unconstrained hidden population never change
//! identity, so there is no need for a `Sensor`/`Motor`/`Hidden` trait
//! hierarchy — a plain enum returned by [`role_of`] is enough to drive every
//! directional constraint in topology construction and pruning.

use crate::params::{FANIN_RANGE, FANOUT_RANGE, HIDDEN_START, MOTOR_RANGE, SENSOR_RANGE};

/// Structural role of a neuron index within the brain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Indices 0..3: external inputs only.
    Sensor,
    /// Indices 4..5: read out by the world.
    Motor,
    /// Indices 6..9: receive only from sensors, send only to hidden.
    SensorFanout,
    /// Indices 10..11: send only to motors, receive only from hidden >= 12.
    MotorFanin,
    /// Indices 12..N-1: unconstrained.
    Hidden,
}

/// Classify `index` according to the fixed role bands, for a brain of
/// `brain_size` neurons.
pub fn role_of(index: usize, brain_size: usize) -> Role {
    debug_assert!(index < brain_size, "neuron index out of range");
    if SENSOR_RANGE.contains(&index) {
        Role::Sensor
    } else if MOTOR_RANGE.contains(&index) {
        Role::Motor
    } else if FANOUT_RANGE.contains(&index) {
        Role::SensorFanout
    } else if FANIN_RANGE.contains(&index) {
        Role::MotorFanin
    } else {
        debug_assert!(index >= HIDDEN_START);
        Role::Hidden
    }
}

/// Whether a synapse from `source` to `target` is permitted by the
/// directional constraints shared by topology construction (spec step 2)
/// and pruning (which must avoid re-creating a forbidden wire).
pub fn connection_allowed(source: usize, target: usize, brain_size: usize) -> bool {
    if source == target {
        return false;
    }
    let src_role = role_of(source, brain_size);
    let tgt_role = role_of(target, brain_size);

    // No incoming to sensor-fanout except from its dedicated sensor wire,
    // which is installed separately and never re-derived here.
    if tgt_role == Role::SensorFanout {
        return false;
    }
    // No outgoing from motor-fanin except to its motor, installed separately.
    if src_role == Role::MotorFanin {
        return false;
    }
    // Sensors never receive; motors never source.
    if tgt_role == Role::Sensor || src_role == Role::Motor {
        return false;
    }
    // The fixed first layer (indices 6..11 inclusive) must not be wired to
    // itself by the random pass.
    let first_layer = 6..12;
    if first_layer.contains(&source) && first_layer.contains(&target) {
        return false;
    }
    true
}
