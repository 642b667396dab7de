//! Property-based checks of the invariants spec.md §8 requires to hold after
//! every tick, driven over randomized sensor/reward/penalty sequences rather
//! than the handful of fixed scenarios in `scenarios.rs`.

use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use rstdp_core::params::{FANIN_RANGE, MOTOR_RANGE, SENSOR_RANGE};
use rstdp_core::{Brain, Params};

fn assert_invariants(brain: &Brain) {
    let params = &brain.params;
    for neuron in &brain.neurons {
        if neuron.refractory_timer > 0 {
            assert_eq!(neuron.voltage, params.v_rest);
            assert_eq!(neuron.input_buffer, 0);
        }
    }
    for (source, neuron) in brain.neurons.iter().enumerate() {
        for synapse in &neuron.synapses {
            assert!(synapse.confidence >= 0 && synapse.confidence <= params.confidence_max);
            assert_eq!(synapse.active, synapse.confidence >= params.confidence_thr);
            assert!(
                !SENSOR_RANGE.contains(&synapse.target),
                "synapse {source}->{} must never target a sensor",
                synapse.target
            );
            if MOTOR_RANGE.contains(&synapse.target) {
                let expected_source = if synapse.target == 4 { 10 } else { 11 };
                assert_eq!(
                    source, expected_source,
                    "motor {} may only receive from its dedicated fan-in neuron",
                    synapse.target
                );
            }
            if !synapse.plastic {
                assert_eq!(synapse.confidence, params.confidence_max);
            }
        }
    }
    for motor in MOTOR_RANGE {
        let has_incoming = brain
            .neurons
            .iter()
            .any(|n| n.synapses.iter().any(|s| s.target == motor));
        assert!(has_incoming, "motor {motor} must keep at least one incoming synapse");
    }
    for fanin in FANIN_RANGE {
        let has_incoming = brain
            .neurons
            .iter()
            .any(|n| n.synapses.iter().any(|s| s.target == fanin));
        assert!(has_incoming, "motor-fanin {fanin} must keep at least one incoming synapse");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// For any sequence of up to 400 ticks with randomized sensor pulses and
    /// reward/penalty gating, every synapse and neuron invariant from
    /// spec.md §8 holds after every single tick, not just at the end.
    #[test]
    fn invariants_hold_across_randomized_runs(
        seed in any::<u64>(),
        steps in 1usize..400,
        reward_bias in 0u8..4,
        penalty_bias in 0u8..4,
    ) {
        let mut topo_rng = StdRng::seed_from_u64(seed);
        let mut brain = Brain::new(Params::default(), &mut topo_rng).expect("brain builds");
        let mut rng = StdRng::seed_from_u64(seed ^ 0xA5A5_A5A5_A5A5_A5A5);

        for step in 0..steps {
            let sensors = [
                (step as u64 + seed) % 7 == 0,
                (step as u64 + seed) % 5 == 0,
                (step as u64 + seed) % 3 == 0,
                (step as u64 + seed) % 11 == 0,
            ]
            .map(|b| i32::from(b));
            let reward = (step as u8 + reward_bias) % 6 == 0;
            let penalty = (step as u8 + penalty_bias) % 6 == 0;
            brain.tick(sensors, reward, penalty, &mut rng);
            assert_invariants(&brain);
        }
    }

    /// A quiescent tick (zero sensory input, no reward/penalty) never pushes
    /// any plastic synapse's confidence outside `[0, CONFIDENCE_MAX]`, for
    /// any starting seed.
    #[test]
    fn quiescent_ticks_never_violate_confidence_bounds(seed in any::<u64>(), steps in 1usize..100) {
        let mut topo_rng = StdRng::seed_from_u64(seed);
        let mut brain = Brain::new(Params::default(), &mut topo_rng).expect("brain builds");
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..steps {
            brain.tick([0, 0, 0, 0], false, false, &mut rng);
        }
        assert_invariants(&brain);
    }
}
