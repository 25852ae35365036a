//! Fixed-step animation clock.

use std::thread;
use std::time::Duration;

/// Advances the animation time by a fixed step per frame, no matter how long
/// the frame actually took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    step: f64,
    delay: Duration,
    elapsed: f64,
}

impl FrameClock {
    pub fn new(step: f64, delay: Duration) -> Self {
        Self { step, delay, elapsed: 0.0 }
    }

    /// Advance to the next frame and return the animation time of it.
    pub fn tick(&mut self) -> f64 {
        self.elapsed += self.step;
        self.elapsed
    }

    /// The animation time of the current frame.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Block the thread for the delay between two frames.
    pub fn sleep(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = FrameClock::new(0.0166666, Duration::from_millis(10));
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn advances_by_fixed_step() {
        let mut clock = FrameClock::new(0.0166666, Duration::ZERO);
        assert!((clock.tick() - 0.0166666).abs() < 1e-12);
        for _ in 1..60 {
            clock.tick();
        }
        assert!((clock.elapsed() - 60.0 * 0.0166666).abs() < 1e-9);
    }
}
