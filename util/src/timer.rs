use std::time::{Duration, Instant};

/// Measures how long a phase of the app (planning, materializing one run,
/// collecting metrics) took.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new `Timer` starting now.
    pub fn now() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restart the timer.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Print a message with the elapsed time since the timer was last reset.
    pub fn print_elapsed(&self, phase: &str) {
        eprintln!("{} took {:.3?}", phase, self.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;

    #[test]
    fn test_reset_restarts_elapsed() {
        let mut timer = Timer::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let before = timer.elapsed();
        timer.reset();
        assert!(timer.elapsed() < before);
    }
}
