//! Parsing of the line-oriented command stream (spec.md §6): `start`,
//! `stop`, `pause`, `resume`, `reset`, `speed <n>`.

use crate::error::{Result, RuntimeError};

/// A single command read from the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clear `paused` (also produced by `resume`).
    Start,
    /// Set `paused`.
    Pause,
    /// Terminate at the next tick boundary.
    Stop,
    /// Reinitialize brain and world at the next tick boundary.
    Reset,
    /// Set the inter-tick pacing delay, in milliseconds.
    Speed(u64),
}

/// Parse one line of the command stream. Unknown tokens and malformed
/// `speed` arguments are a Configuration fault (`RuntimeError::InvalidCommand`);
/// the caller is expected to log and continue rather than propagate.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("");

    match head {
        "start" | "resume" => Ok(Command::Start),
        "pause" => Ok(Command::Pause),
        "stop" => Ok(Command::Stop),
        "reset" => Ok(Command::Reset),
        "speed" => {
            let arg = parts
                .next()
                .ok_or_else(|| RuntimeError::invalid_command(line))?;
            let n: i64 = arg
                .parse()
                .map_err(|_| RuntimeError::invalid_command(line))?;
            Ok(Command::Speed(n.max(0) as u64))
        }
        _ => Err(RuntimeError::invalid_command(line)),
    }
}
