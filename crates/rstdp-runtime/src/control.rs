//! The explicit control record shared between the simulation thread and the
//! command-reader thread: four atomics, nothing else.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Atomic control flags read by the simulation thread and written by the
/// command-reader thread. This is the only state the two threads share.
#[derive(Debug, Default)]
pub struct Control {
    running: AtomicBool,
    paused: AtomicBool,
    reset: AtomicBool,
    delay_ms: AtomicU64,
}

impl Control {
    /// Build a fresh control record: running, not paused, not reset, with the
    /// given initial tick pacing.
    pub fn new(initial_delay_ms: u64) -> Self {
        Self {
            running: AtomicBool::new(true),
            paused: AtomicBool::new(false),
            reset: AtomicBool::new(false),
            delay_ms: AtomicU64::new(initial_delay_ms),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Request a reset; the simulation thread observes and clears this at
    /// the next tick boundary via `take_reset`.
    pub fn request_reset(&self) {
        self.reset.store(true, Ordering::Release);
    }

    /// Observe and clear a pending reset request.
    pub fn take_reset(&self) -> bool {
        self.reset.swap(false, Ordering::AcqRel)
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms.load(Ordering::Acquire)
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_control_is_running_and_unpaused() {
        let control = Control::new(50);
        assert!(control.is_running());
        assert!(!control.is_paused());
        assert_eq!(control.delay_ms(), 50);
    }

    #[test]
    fn test_pause_resume_roundtrip() {
        let control = Control::new(0);
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }

    #[test]
    fn test_double_pause_is_equivalent_to_one() {
        let control = Control::new(0);
        control.pause();
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }

    #[test]
    fn test_reset_take_clears_flag() {
        let control = Control::new(0);
        control.request_reset();
        assert!(control.take_reset());
        assert!(!control.take_reset());
    }

    #[test]
    fn test_stop_clears_running() {
        let control = Control::new(0);
        control.stop();
        assert!(!control.is_running());
    }
}
