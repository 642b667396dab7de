//! Snapshot encoder: assembles the one-record-per-tick view handed to the
//! host boundary (spec.md §4.H/§6). Field names are contractual.

use rstdp_core::Brain;
use rstdp_world::World;
use serde::Serialize;

/// The world's contribution to a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub agent: i32,
    pub target: i32,
    #[serde(rename = "type")]
    pub kind: u8,
    pub food: u64,
    pub danger: u64,
    pub dist: i32,
}

/// One neuron's readout: id, voltage, spiked-this-tick.
#[derive(Debug, Clone, Serialize)]
pub struct NeuronSnapshot {
    pub id: usize,
    pub v: i32,
    pub s: bool,
}

/// One synapse's readout: source, target, confidence, active, highlighted.
#[derive(Debug, Clone, Serialize)]
pub struct SynapseSnapshot {
    pub s: usize,
    pub t: usize,
    pub c: i32,
    pub a: bool,
    pub b: bool,
}

/// The full per-tick record emitted to the host boundary. Encoded as one
/// line of JSON per tick — "a line-delimited textual object" per spec.md
/// §4.H, with the exact syntax left as a boundary detail owned by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub t: u64,
    pub reward: bool,
    pub penalty: bool,
    pub reward_sum: u64,
    pub penalty_sum: u64,
    pub food_time: u64,
    pub danger_time: u64,
    pub world: WorldSnapshot,
    pub neurons: Vec<NeuronSnapshot>,
    pub synapses: Vec<SynapseSnapshot>,
}

impl Snapshot {
    /// Assemble a snapshot from the brain/world state at the end of a tick,
    /// plus the driver's running counters.
    #[allow(clippy::too_many_arguments)]
    pub fn capture(
        tick: u64,
        reward: bool,
        penalty: bool,
        reward_sum: u64,
        penalty_sum: u64,
        food_time: u64,
        danger_time: u64,
        world: &World,
        brain: &Brain,
    ) -> Self {
        let neurons = brain
            .neurons
            .iter()
            .enumerate()
            .map(|(id, n)| NeuronSnapshot {
                id,
                v: n.voltage,
                s: n.spiked_this_step,
            })
            .collect();

        let synapses = brain
            .neurons
            .iter()
            .enumerate()
            .flat_map(|(source, n)| {
                n.synapses.iter().map(move |syn| SynapseSnapshot {
                    s: source,
                    t: syn.target,
                    c: syn.confidence,
                    a: syn.active,
                    b: syn.highlighted,
                })
            })
            .collect();

        let world_snapshot = WorldSnapshot {
            agent: world.agent,
            target: world.target_pos,
            kind: world.target.code(),
            food: world.food_eaten,
            danger: world.danger_hit,
            dist: world.distance(),
        };

        Self {
            t: tick,
            reward,
            penalty,
            reward_sum,
            penalty_sum,
            food_time,
            danger_time,
            world: world_snapshot,
            neurons,
            synapses,
        }
    }

    /// Encode as a single JSON line (no trailing newline; callers append
    /// their own line terminator and flush per spec.md §5's per-tick FIFO
    /// requirement).
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Sink for one assembled [`Snapshot`] per tick. The driver does not know
/// the wire format or destination; the CLI supplies a concrete sink (stdout,
/// a file, an in-memory buffer for tests).
pub trait SnapshotSink {
    fn emit(&mut self, snapshot: &Snapshot) -> crate::error::Result<()>;
}

/// Discards every snapshot; useful for tests that only care about brain/
/// world state, not the emitted wire format.
#[derive(Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn emit(&mut self, _snapshot: &Snapshot) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Collects every snapshot in memory; useful for driver-level tests.
#[derive(Debug, Default)]
pub struct VecSink {
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotSink for VecSink {
    fn emit(&mut self, snapshot: &Snapshot) -> crate::error::Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}
