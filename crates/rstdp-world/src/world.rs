//! The 1-D track: agent, a single food/danger target, sensors, and the
//! reward/penalty gradient that drives learning in the connected brain.

use rand::Rng;

/// Lower bound (inclusive) of a freshly spawned target's lifetime, in ticks.
const LIFETIME_MIN: u32 = 3000;
/// Upper bound (inclusive) of a freshly spawned target's lifetime, in ticks.
const LIFETIME_MAX: u32 = 5000;

/// What currently occupies the track's single target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Target {
    None,
    Food,
    Danger,
}

impl Target {
    /// The contractual wire encoding for the snapshot's `type` field.
    pub fn code(self) -> u8 {
        match self {
            Target::None => 0,
            Target::Food => 1,
            Target::Danger => 2,
        }
    }
}

/// Outcome of advancing the world by one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldOutcome {
    pub reward: bool,
    pub penalty: bool,
}

/// A one-dimensional track of `size` cells with an agent and a single
/// timed food-or-danger target.
#[derive(Debug, Clone)]
pub struct World {
    pub agent: i32,
    pub target: Target,
    pub target_pos: i32,
    pub timer: u32,
    pub food_eaten: u64,
    pub danger_hit: u64,
    size: i32,
}

impl World {
    /// Construct a world of `size` cells with the agent at the centre and no
    /// active target; the first `update` call spawns the initial target.
    pub fn new(size: i32) -> Self {
        let center = size / 2;
        Self {
            agent: center,
            target: Target::None,
            target_pos: 0,
            timer: 0,
            food_eaten: 0,
            danger_hit: 0,
            size,
        }
    }

    fn center(&self) -> i32 {
        self.size / 2
    }

    /// Current distance between the agent and the target, 0 when no target
    /// is active.
    pub fn distance(&self) -> i32 {
        match self.target {
            Target::None => 0,
            _ => (self.target_pos - self.agent).abs(),
        }
    }

    /// Four-bit sensor encoding: FoodLeft, FoodRight, DangerLeft, DangerRight.
    /// Exactly one bit is set when a target is active, based on the sign of
    /// `target_pos - agent`.
    pub fn sensors(&self) -> [i32; 4] {
        let mut bits = [0, 0, 0, 0];
        if self.target == Target::None {
            return bits;
        }
        let diff = self.target_pos - self.agent;
        match self.target {
            Target::Food => {
                if diff < 0 {
                    bits[0] = 1;
                } else if diff > 0 {
                    bits[1] = 1;
                }
            }
            Target::Danger => {
                if diff < 0 {
                    bits[2] = 1;
                } else if diff > 0 {
                    bits[3] = 1;
                }
            }
            Target::None => unreachable!(),
        }
        bits
    }

    /// Advance the world by one tick given the (already double-fire-cancelled)
    /// motor readout.
    pub fn update(&mut self, left: bool, right: bool, rng: &mut impl Rng) -> WorldOutcome {
        if self.target == Target::None {
            let center = self.center();
            if self.agent < center {
                self.agent += 1;
            } else if self.agent > center {
                self.agent -= 1;
            }
            self.tick_timer(rng);
            return WorldOutcome::default();
        }

        let prev_dist = (self.target_pos - self.agent).abs();
        if left {
            self.agent -= 1;
        }
        if right {
            self.agent += 1;
        }
        self.agent = self.agent.clamp(0, self.size - 1);
        let curr_dist = (self.target_pos - self.agent).abs();

        let mut outcome = match self.target {
            Target::Food => WorldOutcome {
                reward: curr_dist < prev_dist,
                penalty: curr_dist > prev_dist,
            },
            Target::Danger => WorldOutcome {
                reward: curr_dist > prev_dist,
                penalty: curr_dist < prev_dist,
            },
            Target::None => unreachable!(),
        };

        if curr_dist == 0 {
            match self.target {
                Target::Food => {
                    self.food_eaten += 1;
                    outcome = WorldOutcome {
                        reward: true,
                        penalty: false,
                    };
                }
                Target::Danger => {
                    self.danger_hit += 1;
                    outcome = WorldOutcome {
                        reward: false,
                        penalty: true,
                    };
                }
                Target::None => unreachable!(),
            }
            self.agent = self.center();
        }

        self.tick_timer(rng);
        outcome
    }

    fn tick_timer(&mut self, rng: &mut impl Rng) {
        self.timer = self.timer.saturating_sub(1);
        if self.timer == 0 {
            self.spawn(rng);
        }
    }

    fn spawn(&mut self, rng: &mut impl Rng) {
        let kind = match rng.gen_range(0..3) {
            0 => Target::None,
            1 => Target::Food,
            _ => Target::Danger,
        };
        let lifetime = rng.gen_range(LIFETIME_MIN..=LIFETIME_MAX);
        self.timer = if kind == Target::None {
            lifetime / 3
        } else {
            lifetime
        };
        self.agent = self.center();
        self.target = kind;
        self.target_pos = match kind {
            Target::None => 0,
            _ => {
                if rng.gen_bool(0.5) {
                    0
                } else {
                    self.size - 1
                }
            }
        };
    }
}
