//! `rstdp-sim` — binary entry point for the reward-modulated integer-STDP
//! spiking simulator. Owns every concern spec.md keeps outside the core:
//! argument parsing, the stdin command-reader thread, the stdout snapshot
//! stream, and the file-backed log sink.

mod config;
mod error;

use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use clap::Parser;

use config::ParamsOverlay;
use error::CliResult;
use rstdp_core::Params;
use rstdp_runtime::snapshot::SnapshotSink;
use rstdp_runtime::{parse_command, Command, Control, FileLogSink, SimulationDriver, Snapshot};

/// Reward-modulated integer-STDP spiking network simulator.
#[derive(Parser, Debug)]
#[command(name = "rstdp-sim", version, about)]
struct Cli {
    /// RNG seed for topology, world, and random-activity injection.
    #[arg(long, env = "RSTDP_SEED", default_value_t = default_seed())]
    seed: u64,

    /// Initial inter-tick pacing delay, in milliseconds. Overridable at
    /// runtime via `speed <n>` on the command stream.
    #[arg(long = "speed-ms", env = "RSTDP_SPEED_MS", default_value_t = 50)]
    speed_ms: u64,

    /// Path to the append-only log sink.
    #[arg(long = "log-file", env = "RSTDP_LOG_FILE", default_value = "rstdp.log")]
    log_file: PathBuf,

    /// Optional TOML overlay of launch-time parameter overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn default_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Writes one JSON line per tick to stdout, flushing after every write so
/// the host boundary sees complete, ordered records (spec.md §5).
struct StdoutSink {
    writer: BufWriter<io::Stdout>,
}

impl StdoutSink {
    fn new() -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
        }
    }
}

impl SnapshotSink for StdoutSink {
    fn emit(&mut self, snapshot: &Snapshot) -> rstdp_runtime::Result<()> {
        let line = snapshot
            .to_line()
            .unwrap_or_else(|e| format!("{{\"error\":\"encode failure: {e}\"}}"));
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Spawn the command-reader thread: reads lines from stdin, applies each to
/// `control`. An unparseable line is a Configuration fault: log WARN and
/// continue. Stream closure is treated as `stop` (spec.md §7).
fn spawn_command_reader(control: Arc<Control>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("command stream read error, treating as stop: {e}");
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Command::Start) => {
                    control.resume();
                    log::info!("command: start/resume");
                }
                Ok(Command::Pause) => {
                    control.pause();
                    log::info!("command: pause");
                }
                Ok(Command::Stop) => {
                    log::info!("command: stop");
                    control.stop();
                    break;
                }
                Ok(Command::Reset) => {
                    log::info!("command: reset");
                    control.request_reset();
                }
                Ok(Command::Speed(ms)) => {
                    log::info!("command: speed {ms}");
                    control.set_delay_ms(ms);
                }
                Err(e) => {
                    log::warn!("rejecting malformed command {line:?}: {e}");
                }
            }
        }
        log::info!("command stream closed, stopping");
        control.stop();
    })
}

fn run(cli: Cli) -> CliResult<()> {
    let mut params = Params::default();
    if let Some(path) = &cli.config {
        let overlay = ParamsOverlay::load_from_file(path)?;
        overlay.apply(&mut params);
    }
    params.validate()?;

    let control = Arc::new(Control::new(cli.speed_ms));
    let reader = spawn_command_reader(Arc::clone(&control));

    let mut driver = SimulationDriver::new(params, cli.seed, Arc::clone(&control))?;
    let mut sink = StdoutSink::new();
    let result = driver.run(&mut sink);

    control.stop();
    let _ = reader.join();
    result.map_err(Into::into)
}

fn main() {
    let cli = Cli::parse();
    let log_file = cli.log_file.clone();
    let log_level = cli.log_level;
    match FileLogSink::new(&log_file).and_then(|sink| {
        sink.install(log_level)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("failed to open log file {log_file:?}: {e}");
            std::process::exit(1);
        }
    }

    log::info!("rstdp-sim starting, seed={}", cli.seed);
    match run(cli) {
        Ok(()) => {
            log::info!("rstdp-sim exiting normally");
            std::process::exit(0);
        }
        Err(e) => {
            log::error!("rstdp-sim exiting with error: {e}");
            eprintln!("fatal: {e}");
            std::process::exit(1);
        }
    }
}
