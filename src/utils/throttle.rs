use std::time::Duration;

/// Cooperative periodic trigger driven by externally supplied elapsed time.
/// Replaces a background timer thread: the owner calls [`Throttle::advance`]
/// from its tick and runs the periodic work when it returns `true`.
pub struct Throttle {
    period:  Duration,
    elapsed: Duration,
    forced:  bool,
}

impl Throttle {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            forced: true, // first advance always fires
        }
    }

    /// Makes the next `advance` fire regardless of elapsed time
    pub fn force(&mut self) {
        self.forced = true;
    }

    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.forced || self.elapsed >= self.period {
            self.forced = false;
            // Only one firing per advance; a long stall must not cause a burst
            self.elapsed = if self.period.is_zero() {
                Duration::ZERO
            } else {
                Duration::from_nanos((self.elapsed.as_nanos() % self.period.as_nanos()) as u64)
            };
            return true;
        }
        false
    }
}

#[test]
fn test_throttle() {
    let mut throttle = Throttle::new(Duration::from_millis(100));
    assert!(throttle.advance(Duration::ZERO));
    assert!(!throttle.advance(Duration::from_millis(40)));
    assert!(!throttle.advance(Duration::from_millis(40)));
    assert!(throttle.advance(Duration::from_millis(40)));
    assert!(!throttle.advance(Duration::from_millis(70)));
    assert!(throttle.advance(Duration::from_millis(10)));

    // stall fires once, not five times
    assert!(throttle.advance(Duration::from_millis(550)));
    assert!(!throttle.advance(Duration::from_millis(10)));

    throttle.force();
    assert!(throttle.advance(Duration::ZERO));
}
