//! Deterministic sensor/motor wiring plus randomized hidden-hidden topology.

use crate::neuron::Neuron;
use crate::params::{Params, FANIN_RANGE, HIDDEN_START};
use crate::roles::connection_allowed;
use crate::synapse::Synapse;
use rand::Rng;

/// Upper bound (inclusive) of the hidden-source range used by the motor-fanin
/// repair pass (spec step 3: "a uniformly random hidden source in 12..29").
const REPAIR_SOURCE_UPPER: usize = 29;

/// Build the initial neuron population and synapse topology: the six fixed
/// non-plastic wires, a randomized hidden-hidden layer honoring the
/// directional constraints, and a repair pass guaranteeing each motor has at
/// least one incoming synapse.
pub fn build_topology(params: &Params, rng: &mut impl Rng) -> Vec<Neuron> {
    let n = params.brain_size;
    let mut neurons: Vec<Neuron> = (0..n)
        .map(|_| Neuron::new(params.v_rest, params.membrane_decay_period))
        .collect();

    // Step 1: fixed deterministic wires, full confidence, non-plastic.
    for (source, target) in [(0, 6), (1, 7), (2, 8), (3, 9), (10, 4), (11, 5)] {
        neurons[source]
            .synapses
            .push(Synapse::fixed_wire(target, params.confidence_max));
    }

    // Step 2: randomized hidden-hidden layer (indices 6..n, past sensors/motors).
    for i in 6..n {
        for j in 6..n {
            if i == j || !connection_allowed(i, j, n) {
                continue;
            }
            if rng.gen_bool(params.connection_density) {
                let confidence = rng.gen_range(params.confidence_thr..=params.confidence_max);
                neurons[i]
                    .synapses
                    .push(Synapse::plastic(j, confidence, params));
            }
        }
    }

    // Step 3: guarantee each motor-fanin target (10, 11) has >= 1 incoming.
    for fanin in FANIN_RANGE {
        let has_incoming = neurons
            .iter()
            .any(|neuron| neuron.synapses.iter().any(|s| s.target == fanin));
        if !has_incoming {
            let upper = REPAIR_SOURCE_UPPER.min(n - 1);
            let source = rng.gen_range(HIDDEN_START..=upper);
            neurons[source]
                .synapses
                .push(Synapse::plastic(fanin, params.confidence_thr, params));
        }
    }

    neurons
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_fixed_wires_present() {
        let params = Params::default();
        let mut rng = StdRng::seed_from_u64(1);
        let neurons = build_topology(&params, &mut rng);

        assert!(neurons[0].synapses.iter().any(|s| s.target == 6 && !s.plastic));
        assert!(neurons[1].synapses.iter().any(|s| s.target == 7 && !s.plastic));
        assert!(neurons[2].synapses.iter().any(|s| s.target == 8 && !s.plastic));
        assert!(neurons[3].synapses.iter().any(|s| s.target == 9 && !s.plastic));
        assert!(neurons[10].synapses.iter().any(|s| s.target == 4 && !s.plastic));
        assert!(neurons[11].synapses.iter().any(|s| s.target == 5 && !s.plastic));
    }

    #[test]
    fn test_motors_have_incoming_after_repair() {
        // Use a density of 0 so the repair pass is the only source of wiring.
        let mut params = Params::default();
        params.connection_density = 0.0;
        let mut rng = StdRng::seed_from_u64(42);
        let neurons = build_topology(&params, &mut rng);

        let has_incoming = |target: usize| {
            neurons
                .iter()
                .any(|n| n.synapses.iter().any(|s| s.target == target))
        };
        assert!(has_incoming(10));
        assert!(has_incoming(11));
    }

    #[test]
    fn test_no_synapse_targets_a_sensor() {
        let params = Params::default();
        let mut rng = StdRng::seed_from_u64(7);
        let neurons = build_topology(&params, &mut rng);
        for neuron in &neurons {
            for s in &neuron.synapses {
                assert!(s.target >= 4, "synapse must never target a sensor");
            }
        }
    }

    #[test]
    fn test_no_hidden_hidden_wiring_among_first_layer() {
        let params = Params::default();
        let mut rng = StdRng::seed_from_u64(9);
        let neurons = build_topology(&params, &mut rng);
        for i in 6..12 {
            for s in &neurons[i].synapses {
                if s.plastic {
                    assert!(
                        !(6..12).contains(&s.target),
                        "first layer must not wire to itself"
                    );
                }
            }
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let params = Params::default();
        let mut rng1 = StdRng::seed_from_u64(123);
        let mut rng2 = StdRng::seed_from_u64(123);
        let a = build_topology(&params, &mut rng1);
        let b = build_topology(&params, &mut rng2);
        for (na, nb) in a.iter().zip(b.iter()) {
            assert_eq!(na.synapses.len(), nb.synapses.len());
            for (sa, sb) in na.synapses.iter().zip(nb.synapses.iter()) {
                assert_eq!(sa.target, sb.target);
                assert_eq!(sa.confidence, sb.confidence);
            }
        }
    }
}
