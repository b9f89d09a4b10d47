//! Fixed-delay pacing for rate-limited APIs.

use std::time::Duration;

/// Default delay before each API request, in seconds
pub const DEFAULT_RATE_LIMIT_SECS: f64 = 0.5;

/// Sleeps a fixed duration before every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Builds a pacer from a delay in seconds as found in the settings file.
    /// Negative or non-finite values disable pacing.
    pub fn from_secs_f64(secs: f64) -> Self {
        if secs.is_finite() && secs > 0.0 {
            Self::new(Duration::from_secs_f64(secs))
        } else {
            Self::disabled()
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::from_secs_f64(DEFAULT_RATE_LIMIT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_settings_seconds() {
        assert_eq!(Pacer::from_secs_f64(0.5).delay(), Duration::from_millis(500));
        assert_eq!(Pacer::default().delay(), Duration::from_millis(500));
    }

    #[test]
    fn invalid_values_disable_pacing() {
        assert!(Pacer::from_secs_f64(-1.0).delay().is_zero());
        assert!(Pacer::from_secs_f64(f64::NAN).delay().is_zero());
        assert!(Pacer::from_secs_f64(0.0).delay().is_zero());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_the_delay() {
        let pacer = Pacer::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
