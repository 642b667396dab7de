//! The simulation driver: the outer/inner loop of spec.md §4.G. Owns the
//! brain, the world, and a seeded RNG; reads pacing/pause/reset/stop only
//! through the shared [`Control`] record (spec.md §5).

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstdp_core::params::HIDDEN_START;
use rstdp_core::{Brain, Params};
use rstdp_world::{Target, World};

use crate::control::Control;
use crate::error::Result;
use crate::snapshot::{Snapshot, SnapshotSink};

/// How long the inner loop sleeps between checks while paused.
const PAUSE_POLL_MS: u64 = 100;

/// Owns brain/world/RNG and drives them tick-by-tick under the shared
/// control record, assembling and emitting one [`Snapshot`] per tick.
pub struct SimulationDriver {
    control: Arc<Control>,
    params: Params,
    seed: u64,
    rng: StdRng,
    brain: Brain,
    world: World,
    reward_sum: u64,
    penalty_sum: u64,
    food_time: u64,
    danger_time: u64,
}

impl SimulationDriver {
    /// Build a driver with a fresh brain/world drawn from `seed`.
    pub fn new(params: Params, seed: u64, control: Arc<Control>) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let brain = Brain::new(params.clone(), &mut rng)?;
        let world = World::new(params.world_size);
        Ok(Self {
            control,
            params,
            seed,
            rng,
            brain,
            world,
            reward_sum: 0,
            penalty_sum: 0,
            food_time: 0,
            danger_time: 0,
        })
    }

    /// Drop the current brain/world and rebuild from the same seed,
    /// re-seeding the RNG so a `reset` reproduces the same run (spec.md
    /// §5: "no cross-tick state is preserved").
    fn rebuild(&mut self) -> Result<()> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.brain = Brain::new(self.params.clone(), &mut self.rng)?;
        self.world = World::new(self.params.world_size);
        self.reward_sum = 0;
        self.penalty_sum = 0;
        self.food_time = 0;
        self.danger_time = 0;
        Ok(())
    }

    /// Inject `RANDOM_ACTIVITY_COUNT` spikes into a uniformly random hidden
    /// neuron, once every `RANDOM_ACTIVITY_PERIOD` ticks. Each injection adds
    /// a full `v_thresh` worth of input, the same way a sensor pulse
    /// immediately crosses threshold (spec.md §4.E phase 1), so the target
    /// neuron actually spikes on the next integration rather than merely
    /// nudging its voltage.
    fn maybe_inject_random_activity(&mut self) {
        if self.brain.global_tick % self.params.random_activity_period != 0 {
            return;
        }
        let brain_size = self.params.brain_size;
        let v_thresh = self.params.v_thresh;
        for _ in 0..self.params.random_activity_count {
            let target = self.rng.gen_range(HIDDEN_START..brain_size);
            self.brain.inject_activity(target, v_thresh);
        }
    }

    /// Run until the host issues `stop` (or the command stream closes and
    /// the caller translates that into a stop). Reinitializes on `reset`
    /// at the next tick boundary, never preserving cross-tick state.
    pub fn run<S: SnapshotSink>(&mut self, sink: &mut S) -> Result<()> {
        'outer: loop {
            if !self.control.is_running() {
                return Ok(());
            }
            self.rebuild()?;
            let mut reward = false;
            let mut penalty = false;

            loop {
                // (1) emit snapshot
                let snapshot = Snapshot::capture(
                    self.brain.global_tick,
                    reward,
                    penalty,
                    self.reward_sum,
                    self.penalty_sum,
                    self.food_time,
                    self.danger_time,
                    &self.world,
                    &self.brain,
                );
                sink.emit(&snapshot)?;

                // (2) pause spin
                loop {
                    if !self.control.is_running() {
                        break 'outer;
                    }
                    if self.control.take_reset() {
                        continue 'outer;
                    }
                    if !self.control.is_paused() {
                        break;
                    }
                    thread::sleep(Duration::from_millis(PAUSE_POLL_MS));
                }

                // (3) sleep delay_ms
                let delay = self.control.delay_ms();
                if delay > 0 {
                    thread::sleep(Duration::from_millis(delay));
                }

                // (4) gather sensors, inject random activity
                let sensors = self.world.sensors();
                self.maybe_inject_random_activity();

                // (5) run the brain step with the previous tick's latched
                // reward/penalty
                let outcome = self.brain.tick(sensors, reward, penalty, &mut self.rng);

                // (6) read motor spikes, cancel a simultaneous double-fire
                let (mut left, mut right) =
                    (outcome.motor_left_spiked, outcome.motor_right_spiked);
                if left && right {
                    left = false;
                    right = false;
                }

                // (7) run the world update
                let world_outcome = self.world.update(left, right, &mut self.rng);

                // (8) latch next reward/penalty, update running counters
                reward = world_outcome.reward;
                penalty = world_outcome.penalty;
                if reward {
                    self.reward_sum += 1;
                }
                if penalty {
                    self.penalty_sum += 1;
                }
                match self.world.target {
                    Target::Food => self.food_time += 1,
                    Target::Danger => self.danger_time += 1,
                    Target::None => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::VecSink;

    fn tiny_params() -> Params {
        let mut p = Params::default();
        p.pruning_period = 10_000;
        p
    }

    #[test]
    fn test_driver_stops_immediately_when_not_running() {
        let control = Arc::new(Control::new(0));
        control.stop();
        let mut driver = SimulationDriver::new(tiny_params(), 1, control).unwrap();
        let mut sink = VecSink::default();
        driver.run(&mut sink).unwrap();
        assert!(sink.snapshots.is_empty());
    }

    #[test]
    fn test_driver_ticks_advance_and_stop_via_stop_flag() {
        let control = Arc::new(Control::new(0));
        let mut driver = SimulationDriver::new(tiny_params(), 2, Arc::clone(&control)).unwrap();
        let mut sink = VecSink::default();

        let handle = thread::spawn(move || {
            driver.run(&mut sink).unwrap();
            sink
        });
        thread::sleep(Duration::from_millis(50));
        control.stop();
        let sink = handle.join().unwrap();
        assert!(!sink.snapshots.is_empty());
        let ticks: Vec<u64> = sink.snapshots.iter().map(|s| s.t).collect();
        for window in ticks.windows(2) {
            assert_eq!(window[1], window[0] + 1);
        }
    }

    #[test]
    fn test_reset_rebuilds_and_restarts_tick_counter() {
        let control = Arc::new(Control::new(0));
        let mut driver = SimulationDriver::new(tiny_params(), 3, Arc::clone(&control)).unwrap();
        let mut sink = VecSink::default();
        let reset_control = Arc::clone(&control);
        let handle = thread::spawn(move || {
            driver.run(&mut sink).unwrap();
            sink
        });
        thread::sleep(Duration::from_millis(20));
        reset_control.request_reset();
        thread::sleep(Duration::from_millis(20));
        reset_control.stop();
        let sink = handle.join().unwrap();
        // After a reset, tick 0 must reappear since cross-tick state is
        // never preserved.
        let zero_count = sink.snapshots.iter().filter(|s| s.t == 0).count();
        assert!(zero_count >= 2, "expected tick 0 to reappear after reset");
    }
}
