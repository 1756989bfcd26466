/// Longest frame delta fed to the animation, in seconds. Longer gaps (a
/// hidden tab, a debugger pause) are treated as a single slow frame.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Measures the time between redraws.
#[derive(Debug)]
pub struct FrameClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    last: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
            last: None,
        }
    }

    /// Seconds since the previous tick; zero on the first one.
    pub fn tick(&mut self) -> f32 {
        let now = self.now();
        let delta = self.last.map_or(0.0, |last| (now - last) as f32);
        self.last = Some(now);
        delta.clamp(0.0, MAX_FRAME_DELTA)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.performance())
            .map_or(0.0, |performance| performance.now() / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero_and_later_ticks_are_bounded() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let delta = clock.tick();
        assert!(delta > 0.0 && delta <= MAX_FRAME_DELTA);
    }
}
