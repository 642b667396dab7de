//! The tick engine: integration, propagation/plasticity, pruning, causal
//! tracing, and history shift, run in one fixed phase order every tick.

use crate::error::{CoreError, Result};
use crate::neuron::Neuron;
use crate::params::{Params, FANIN_RANGE};
use crate::roles::connection_allowed;
use crate::topology;
use rand::Rng;
use std::collections::HashSet;

/// Sensor neuron indices.
const SENSOR_COUNT: usize = 4;
/// Motor-fanin neuron indices (10, 11), which drive the actual motors (4, 5).
const MOTOR_LEFT: usize = 4;
const MOTOR_RIGHT: usize = 5;

/// Outcome of a single tick: which motors spiked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub motor_left_spiked: bool,
    pub motor_right_spiked: bool,
}

/// The full neuron population, synapses, and global tick counter.
#[derive(Debug, Clone)]
pub struct Brain {
    pub neurons: Vec<Neuron>,
    pub params: Params,
    pub global_tick: u64,
}

/// A candidate for the periodic pruning pass: the plastic synapse with the
/// largest `ticks_since_ltp` seen so far this tick.
#[derive(Debug, Clone, Copy)]
struct PruneCandidate {
    source: usize,
    synapse_index: usize,
    ticks_since_ltp: u64,
}

impl Brain {
    /// Build a new brain from `params`, drawing topology from `rng`.
    pub fn new(params: Params, rng: &mut impl Rng) -> Result<Self> {
        params.validate()?;
        let neurons = topology::build_topology(&params, rng);
        let brain = Self {
            neurons,
            params,
            global_tick: 0,
        };
        brain.check_motor_fanin_incoming()?;
        Ok(brain)
    }

    fn check_motor_fanin_incoming(&self) -> Result<()> {
        for fanin in FANIN_RANGE {
            let has_incoming = self
                .neurons
                .iter()
                .any(|n| n.synapses.iter().any(|s| s.target == fanin));
            if !has_incoming {
                return Err(CoreError::network_topology(format!(
                    "motor-fanin neuron {fanin} has no incoming synapse after topology construction"
                )));
            }
        }
        Ok(())
    }

    /// Add `amount` to a neuron's pending input, for the random activity
    /// injector and any other out-of-band stimulus source.
    pub fn inject_activity(&mut self, neuron_index: usize, amount: i32) {
        self.neurons[neuron_index].input_buffer += amount;
    }

    /// Run one full tick: phases 0 through 5 of the fixed pipeline.
    pub fn tick(
        &mut self,
        sensor_input: [i32; SENSOR_COUNT],
        reward: bool,
        penalty: bool,
        rng: &mut impl Rng,
    ) -> TickOutcome {
        self.clear_highlights();
        self.integrate_and_fire(sensor_input);
        let candidate = self.propagate_and_plasticity(reward, penalty);
        self.prune_if_due(candidate, rng);
        self.trace_motor_spikes();
        let outcome = TickOutcome {
            motor_left_spiked: self.neurons[MOTOR_LEFT].spiked_this_step,
            motor_right_spiked: self.neurons[MOTOR_RIGHT].spiked_this_step,
        };
        self.shift_histories();
        self.global_tick += 1;
        outcome
    }

    /// Phase 0: clear the transient highlight flag on every synapse.
    fn clear_highlights(&mut self) {
        for neuron in &mut self.neurons {
            for synapse in &mut neuron.synapses {
                synapse.highlighted = false;
            }
        }
    }

    /// Phase 1: neuron integration and firing.
    fn integrate_and_fire(&mut self, sensor_input: [i32; SENSOR_COUNT]) {
        let params = &self.params;
        for (index, neuron) in self.neurons.iter_mut().enumerate() {
            neuron.spiked_this_step = false;

            if neuron.refractory_timer > 0 {
                neuron.refractory_timer -= 1;
                neuron.voltage = params.v_rest;
                neuron.input_buffer = 0;
                neuron.leak_timer = params.membrane_decay_period;
                continue;
            }

            let external = if index < SENSOR_COUNT {
                sensor_input[index]
            } else {
                0
            };
            let has_input = neuron.input_buffer > 0 || external > 0;

            neuron.voltage += neuron.input_buffer;
            if index < SENSOR_COUNT && external > 0 {
                neuron.voltage += params.v_thresh;
            }
            neuron.input_buffer = 0;

            let mut spiked = false;
            if neuron.voltage >= params.v_thresh {
                neuron.voltage = params.v_rest;
                neuron.spiked_this_step = true;
                neuron.refractory_timer = params.refractory_period;
                spiked = true;
            }

            let had_activity = has_input || spiked;
            if had_activity {
                neuron.leak_timer = params.membrane_decay_period;
            } else if neuron.voltage > params.v_rest {
                neuron.leak_timer -= 1;
                if neuron.leak_timer == 0 {
                    neuron.voltage -= 1;
                    neuron.leak_timer = params.membrane_decay_period;
                }
            } else {
                neuron.leak_timer = params.membrane_decay_period;
            }

            debug_assert!(neuron.voltage >= params.v_rest);
        }
    }

    /// Phase 2: propagation and plasticity, with the pruning candidate
    /// tracked inline as required by phase 3.
    fn propagate_and_plasticity(&mut self, reward: bool, penalty: bool) -> Option<PruneCandidate> {
        let params = self.params.clone();
        let mut candidate: Option<PruneCandidate> = None;
        let neuron_count = self.neurons.len();

        for source in 0..neuron_count {
            let source_spiked = self.neurons[source].spiked_this_step;
            let synapse_count = self.neurons[source].synapses.len();

            for synapse_index in 0..synapse_count {
                let target = self.neurons[source].synapses[synapse_index].target;

                if source_spiked && self.neurons[source].synapses[synapse_index].active {
                    self.neurons[target].input_buffer += 1;
                    self.neurons[target].record_contribution(source, synapse_index);
                }

                if !self.neurons[source].synapses[synapse_index].plastic {
                    continue;
                }

                let target_spiked = self.neurons[target].spiked_this_step;
                self.update_plastic_synapse(
                    source,
                    synapse_index,
                    source_spiked,
                    target_spiked,
                    reward,
                    penalty,
                    &params,
                );

                let synapse = &self.neurons[source].synapses[synapse_index];
                let is_better = match candidate {
                    None => true,
                    Some(c) => synapse.ticks_since_ltp > c.ticks_since_ltp,
                };
                if is_better {
                    candidate = Some(PruneCandidate {
                        source,
                        synapse_index,
                        ticks_since_ltp: synapse.ticks_since_ltp,
                    });
                }
            }
        }

        candidate
    }

    /// Per-synapse plasticity update for one plastic synapse during phase 2.
    #[allow(clippy::too_many_arguments)]
    fn update_plastic_synapse(
        &mut self,
        source: usize,
        synapse_index: usize,
        source_spiked: bool,
        target_spiked: bool,
        reward: bool,
        penalty: bool,
        params: &Params,
    ) {
        let synapse = &mut self.neurons[source].synapses[synapse_index];

        synapse.ticks_since_ltp += 1;

        if synapse.ltp_timer > 0 {
            synapse.ltp_timer -= 1;
        }
        if synapse.ltd_timer > 0 {
            synapse.ltd_timer -= 1;
        }

        if synapse.reward_inertia_counter > 0 {
            synapse.reward_inertia_counter -= 1;
            if synapse.reward_inertia_counter == 0 {
                synapse.reward_acceptor = true;
            }
        }
        if synapse.penalty_inertia_counter > 0 {
            synapse.penalty_inertia_counter -= 1;
            if synapse.penalty_inertia_counter == 0 {
                synapse.penalty_acceptor = true;
            }
        }

        if synapse.eligibility_ltp_timer > 0 {
            synapse.eligibility_ltp_timer -= 1;
            if synapse.eligibility_ltp_timer == 0 {
                synapse.eligible_for_ltp = false;
            }
        }
        if synapse.eligibility_ltd_timer > 0 {
            synapse.eligibility_ltd_timer -= 1;
            if synapse.eligibility_ltd_timer == 0 {
                synapse.eligible_for_ltd = false;
            }
        }

        if source_spiked {
            synapse.ltp_timer = params.spike_trace_window;
            if synapse.ltd_timer > 0 {
                synapse.eligible_for_ltd = true;
                synapse.eligibility_ltd_timer = params.eligibility_trace_window;
            }
        }
        if target_spiked {
            synapse.ltd_timer = params.spike_trace_window;
            if synapse.ltp_timer > 0 {
                synapse.eligible_for_ltp = true;
                synapse.eligibility_ltp_timer = params.eligibility_trace_window;
            }
        }

        if reward && synapse.reward_acceptor {
            if synapse.eligible_for_ltp {
                synapse.ticks_since_ltp = 0;
            }
            let mut modified = false;
            if synapse.eligible_for_ltp && synapse.confidence < params.confidence_max {
                synapse.confidence += 1;
                synapse.eligible_for_ltp = false;
                synapse.confidence_leak_timer = params.confidence_leak_period;
                modified = true;
            } else if synapse.eligible_for_ltd && synapse.confidence > 0 {
                synapse.confidence -= 1;
                synapse.eligible_for_ltd = false;
                synapse.confidence_leak_timer = params.confidence_leak_period;
                modified = true;
            }
            if modified {
                synapse.penalty_acceptor = false;
                synapse.penalty_inertia_counter = params.reinforcement_inertia_period;
            }
            synapse.recompute_active(params);
        } else if penalty && synapse.penalty_acceptor {
            let mut modified = false;
            if synapse.eligible_for_ltp && synapse.confidence > 0 {
                synapse.confidence -= 1;
                synapse.eligible_for_ltp = false;
                synapse.confidence_leak_timer = params.confidence_leak_period;
                modified = true;
            }
            if synapse.eligible_for_ltd {
                synapse.eligible_for_ltd = false;
            }
            if modified {
                synapse.reward_acceptor = false;
                synapse.reward_inertia_counter = params.reinforcement_inertia_period;
            }
            synapse.recompute_active(params);
        }

        if synapse.confidence_leak_timer > 0 {
            synapse.confidence_leak_timer -= 1;
            if synapse.confidence_leak_timer == 0 {
                synapse.confidence >>= 1;
                synapse.confidence_leak_timer = params.confidence_leak_period;
                synapse.recompute_active(params);
            }
        }

        debug_assert!(synapse.confidence >= 0 && synapse.confidence <= params.confidence_max);
    }

    /// Phase 3: rewire the worst plastic synapse if this tick lands on the
    /// pruning period.
    fn prune_if_due(&mut self, candidate: Option<PruneCandidate>, rng: &mut impl Rng) {
        if self.global_tick == 0 || self.global_tick % self.params.pruning_period != 0 {
            return;
        }
        let Some(candidate) = candidate else {
            return;
        };
        let brain_size = self.neurons.len();
        let source = candidate.source;
        let current_target = self.neurons[source].synapses[candidate.synapse_index].target;

        let is_only_incoming_to_motor_fanin = FANIN_RANGE.contains(&current_target)
            && self
                .neurons
                .iter()
                .filter(|n| n.synapses.iter().any(|s| s.target == current_target))
                .count()
                == 1;

        let new_target = if is_only_incoming_to_motor_fanin {
            current_target
        } else {
            let existing: HashSet<usize> = self.neurons[source]
                .synapses
                .iter()
                .map(|s| s.target)
                .collect();
            let permitted: Vec<usize> = (6..brain_size)
                .filter(|&t| {
                    t != source && connection_allowed(source, t, brain_size) && !existing.contains(&t)
                })
                .collect();
            if permitted.is_empty() {
                return;
            }
            permitted[rng.gen_range(0..permitted.len())]
        };

        let params = self.params.clone();
        let synapse = &mut self.neurons[source].synapses[candidate.synapse_index];
        synapse.target = new_target;
        synapse.confidence = 1;
        synapse.recompute_active(&params);
        synapse.reset_learning_state(&params);
        log::debug!(
            "pruned synapse {source}->{current_target} rewired to {source}->{new_target} at tick {}",
            self.global_tick
        );
    }

    /// Phase 4: depth-limited causal trace from each motor that spiked.
    fn trace_motor_spikes(&mut self) {
        for &motor in &[MOTOR_LEFT, MOTOR_RIGHT] {
            if !self.neurons[motor].spiked_this_step {
                continue;
            }
            let mut visited: HashSet<(usize, usize)> = HashSet::new();
            self.trace_from(motor, 0, &mut visited);
        }
    }

    fn trace_from(&mut self, node: usize, depth: usize, visited: &mut HashSet<(usize, usize)>) {
        if depth > crate::params::MAX_TRACE {
            return;
        }
        let contributions: Vec<(usize, usize)> = self.neurons[node]
            .contrib_at(depth)
            .iter()
            .map(|&(src, syn)| (src as usize, syn as usize))
            .collect();

        for (src, syn_idx) in contributions {
            self.neurons[src].synapses[syn_idx].highlighted = true;
            let next_depth = depth + 1;
            if self.neurons[src].spiked_at(depth)
                && next_depth <= crate::params::MAX_TRACE
                && visited.insert((next_depth, src))
            {
                self.trace_from(src, next_depth, visited);
            }
        }
    }

    /// Phase 5: shift every neuron's history ring buffers by one tick.
    fn shift_histories(&mut self) {
        for neuron in &mut self.neurons {
            neuron.shift_history();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn test_brain_builds_with_motor_fanin_incoming() {
        let mut rng = test_rng();
        let brain = Brain::new(Params::default(), &mut rng).expect("brain builds");
        assert_eq!(brain.neurons.len(), brain.params.brain_size);
    }

    #[test]
    fn test_quiescent_tick_is_near_noop() {
        let mut rng = test_rng();
        let mut brain = Brain::new(Params::default(), &mut rng).expect("brain builds");
        let before: Vec<i32> = brain.neurons.iter().map(|n| n.voltage).collect();
        let outcome = brain.tick([0, 0, 0, 0], false, false, &mut rng);
        assert!(!outcome.motor_left_spiked);
        assert!(!outcome.motor_right_spiked);
        let after: Vec<i32> = brain.neurons.iter().map(|n| n.voltage).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sensor_pulse_spikes_sensor_and_reaches_fanout_next_tick() {
        let mut rng = test_rng();
        let mut brain = Brain::new(Params::default(), &mut rng).expect("brain builds");
        brain.tick([1, 0, 0, 0], false, false, &mut rng);
        assert!(brain.neurons[0].spiked_at(0));
        assert_eq!(brain.neurons[6].input_buffer, 0);
        brain.tick([0, 0, 0, 0], false, false, &mut rng);
        // fanout neuron 6 should have spiked from the buffered delivery
        assert!(brain.neurons[6].spiked_at(0) || brain.neurons[6].voltage > 0);
    }

    #[test]
    fn test_inactive_synapse_never_delivers() {
        let mut rng = test_rng();
        let params = Params::default();
        let mut brain = Brain::new(params.clone(), &mut rng).expect("brain builds");
        // Drive every plastic synapse's confidence below threshold.
        for neuron in &mut brain.neurons {
            for synapse in &mut neuron.synapses {
                if synapse.plastic {
                    synapse.confidence = 0;
                    synapse.recompute_active(&params);
                }
            }
        }
        let before: Vec<i32> = brain.neurons.iter().map(|n| n.input_buffer).collect();
        brain.tick([1, 1, 1, 1], false, false, &mut rng);
        for (index, neuron) in brain.neurons.iter().enumerate() {
            if index >= 12 {
                assert_eq!(neuron.input_buffer, before[index]);
            }
        }
    }

    #[test]
    fn test_isolated_lif_bernoulli_eventually_rests() {
        use rand::Rng as _;
        let params = Params::default();
        let mut rng = test_rng();
        let mut neuron = Neuron::new(params.v_rest, params.membrane_decay_period);
        let mut spikes = 0;
        for _ in 0..2000 {
            let input = if rng.gen_bool(0.5) { 1 } else { 0 };
            if neuron.refractory_timer > 0 {
                neuron.refractory_timer -= 1;
                neuron.voltage = params.v_rest;
                neuron.input_buffer = 0;
                continue;
            }
            neuron.voltage += input;
            if neuron.voltage >= params.v_thresh {
                neuron.voltage = params.v_rest;
                neuron.refractory_timer = params.refractory_period;
                spikes += 1;
            }
            if spikes >= 3 {
                break;
            }
        }
        assert!(spikes >= 3);
        assert_eq!(neuron.voltage, params.v_rest);
        assert!(neuron.refractory_timer <= params.refractory_period);
    }
}
