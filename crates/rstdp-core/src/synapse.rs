//! Synapse state: integer confidence, spike traces, eligibility, and inertia.

use crate::params::Params;

/// A single outgoing synaptic connection, owned by its source neuron and
/// identified by its position in that neuron's outgoing list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Synapse {
    /// Destination neuron index.
    pub target: usize,
    /// Integer confidence in `[0, CONFIDENCE_MAX]`.
    pub confidence: i32,
    /// Whether the synapse currently conducts (`confidence >= CONFIDENCE_THR`).
    pub active: bool,
    /// Ticks remaining in the post-presynaptic-spike trace window.
    pub ltp_timer: u32,
    /// Ticks remaining in the post-postsynaptic-spike trace window.
    pub ltd_timer: u32,
    /// Latched: a pre-then-post pairing is waiting for reinforcement.
    pub eligible_for_ltp: bool,
    /// Latched: a post-then-pre pairing is waiting for reinforcement.
    pub eligible_for_ltd: bool,
    /// Ticks remaining before `eligible_for_ltp` clears.
    pub eligibility_ltp_timer: u32,
    /// Ticks remaining before `eligible_for_ltd` clears.
    pub eligibility_ltd_timer: u32,
    /// Ticks remaining before the next confidence halving.
    pub confidence_leak_timer: u32,
    /// Whether this synapse currently accepts reward-driven updates.
    pub reward_acceptor: bool,
    /// Whether this synapse currently accepts penalty-driven updates.
    pub penalty_acceptor: bool,
    /// Lockout ticks remaining before `reward_acceptor` becomes true again.
    pub reward_inertia_counter: u32,
    /// Lockout ticks remaining before `penalty_acceptor` becomes true again.
    pub penalty_inertia_counter: u32,
    /// Ticks since the last LTP-eligible reward attempt; drives pruning.
    pub ticks_since_ltp: u64,
    /// Transient: set by the Phase-4 causal tracer, cleared at tick start.
    pub highlighted: bool,
    /// If false, this synapse is exempt from plasticity, leak, and pruning.
    pub plastic: bool,
}

impl Synapse {
    /// Create a non-plastic deterministic wire at fixed maximal confidence.
    pub fn fixed_wire(target: usize, confidence: i32) -> Self {
        Self {
            target,
            confidence,
            active: true,
            ltp_timer: 0,
            ltd_timer: 0,
            eligible_for_ltp: false,
            eligible_for_ltd: false,
            eligibility_ltp_timer: 0,
            eligibility_ltd_timer: 0,
            confidence_leak_timer: 0,
            reward_acceptor: false,
            penalty_acceptor: false,
            reward_inertia_counter: 0,
            penalty_inertia_counter: 0,
            ticks_since_ltp: 0,
            highlighted: false,
            plastic: false,
        }
    }

    /// Create a plastic hidden-hidden synapse with the given initial
    /// confidence, freshly reinforcement-eligible (as after a prune/rewire).
    pub fn plastic(target: usize, confidence: i32, params: &Params) -> Self {
        let mut s = Self {
            target,
            confidence,
            active: false,
            ltp_timer: 0,
            ltd_timer: 0,
            eligible_for_ltp: false,
            eligible_for_ltd: false,
            eligibility_ltp_timer: 0,
            eligibility_ltd_timer: 0,
            confidence_leak_timer: params.confidence_leak_period,
            reward_acceptor: true,
            penalty_acceptor: true,
            reward_inertia_counter: 0,
            penalty_inertia_counter: 0,
            ticks_since_ltp: 0,
            highlighted: false,
            plastic: true,
        };
        s.recompute_active(params);
        s
    }

    /// Recompute `active` from `confidence`; must be called after every
    /// mutation of `confidence` to preserve the `active <=> confidence >=
    /// CONFIDENCE_THR` invariant.
    pub fn recompute_active(&mut self, params: &Params) {
        self.active = self.confidence >= params.confidence_thr;
    }

    /// Reset all learning state in place, as performed by pruning/rewiring.
    /// `target` and `confidence` are set by the caller before or after this
    /// call; this only resets the timers/flags that accompany a rewire.
    pub fn reset_learning_state(&mut self, params: &Params) {
        self.ltp_timer = 0;
        self.ltd_timer = 0;
        self.eligible_for_ltp = false;
        self.eligible_for_ltd = false;
        self.eligibility_ltp_timer = 0;
        self.eligibility_ltd_timer = 0;
        self.confidence_leak_timer = params.confidence_leak_period;
        self.reward_acceptor = true;
        self.penalty_acceptor = true;
        self.reward_inertia_counter = 0;
        self.penalty_inertia_counter = 0;
        self.ticks_since_ltp = 0;
        self.highlighted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_wire_is_not_plastic_and_conducts() {
        let params = Params::default();
        let s = Synapse::fixed_wire(6, params.confidence_max);
        assert!(!s.plastic);
        assert!(s.active);
    }

    #[test]
    fn test_plastic_synapse_active_matches_threshold() {
        let params = Params::default();
        let below = Synapse::plastic(12, params.confidence_thr - 1, &params);
        assert!(!below.active);
        let at = Synapse::plastic(12, params.confidence_thr, &params);
        assert!(at.active);
    }

    #[test]
    fn test_recompute_active_tracks_confidence() {
        let params = Params::default();
        let mut s = Synapse::plastic(12, params.confidence_thr, &params);
        s.confidence = 0;
        s.recompute_active(&params);
        assert!(!s.active);
        s.confidence = params.confidence_max;
        s.recompute_active(&params);
        assert!(s.active);
    }
}
