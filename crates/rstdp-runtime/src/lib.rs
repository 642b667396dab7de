//! Simulation driver: control atomics, command parsing, the pacing loop,
//! random activity injection, and per-tick snapshot assembly.
//!
//! Depends on `rstdp-core`/`rstdp-world` for the tick engine and the world;
//! stays logger-agnostic (uses the `log` facade only) so the CLI binary
//! owns the concrete logging/snapshot sinks.

pub mod commands;
pub mod control;
pub mod driver;
pub mod error;
pub mod log_sink;
pub mod snapshot;

pub use commands::{parse_command, Command};
pub use control::Control;
pub use driver::SimulationDriver;
pub use error::{Result, RuntimeError};
pub use log_sink::FileLogSink;
pub use snapshot::{NeuronSnapshot, NullSink, Snapshot, SnapshotSink, SynapseSnapshot, VecSink, WorldSnapshot};
