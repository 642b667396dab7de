//! File-backed log sink: timestamped plain-text lines, append-only, guarded
//! by a mutex so the simulation thread and the command-reader thread can
//! both log safely (spec.md §5/§6).

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A [`log::Log`] implementation that appends timestamped lines to a file
/// under a mutex. Installed once, at process start, via [`FileLogSink::install`].
pub struct FileLogSink {
    writer: Mutex<BufWriter<File>>,
}

impl FileLogSink {
    /// Open (creating/appending) the file at `path` and wrap it for
    /// thread-safe logging.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Install this sink as the global `log` backend at the given max level.
    pub fn install(self, level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_max_level(level);
        log::set_boxed_logger(Box::new(self))
    }
}

impl log::Log for FileLogSink {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let line = format!(
            "{}.{:03} {:<5} {}: {}\n",
            now.as_secs(),
            now.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.flush();
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};

    #[test]
    fn test_log_sink_appends_timestamped_lines() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("rstdp-test-log-{}.log", std::process::id()));
        let sink = FileLogSink::new(&path).unwrap();

        let record = log::Record::builder()
            .args(format_args!("hello world"))
            .level(log::Level::Info)
            .target("rstdp_test")
            .build();
        sink.log(&record);
        sink.flush();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("hello world"));

        let _ = std::fs::remove_file(&path);
    }
}
