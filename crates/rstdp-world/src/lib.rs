//! The coupled 1-D reinforcement world: a track, an agent, a single timed
//! food-or-danger target, and the reward/penalty gradient it produces.
//!
//! Pure integer arithmetic and an injected RNG; no I/O, no threads.

pub mod world;

pub use world::{Target, World, WorldOutcome};
