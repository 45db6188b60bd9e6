//! Decorative now-playing indicator: four bars animating out of phase.
//!
//! Purely cosmetic. Its only state is existence plus the instant it was
//! created, from which the bar heights are derived on every draw.

use std::time::Instant;

pub const BAR_COUNT: usize = 4;

/// Per-bar animation phase offsets, in seconds.
const BAR_DELAYS: [f32; BAR_COUNT] = [0.0, 0.1, 0.2, 0.3];

/// One full grow-and-shrink cycle.
const CYCLE_SECS: f32 = 0.8;

#[derive(Debug)]
pub struct Visualizer {
    pub(crate) started: Instant,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Bar levels in `0.0..=1.0` at the given instant.
    pub fn levels(&self, now: Instant) -> [f32; BAR_COUNT] {
        let elapsed = now.duration_since(self.started).as_secs_f32();
        let mut levels = [0.0; BAR_COUNT];
        for (level, delay) in levels.iter_mut().zip(BAR_DELAYS) {
            let mut phase = ((elapsed - delay) / CYCLE_SECS).fract();
            if phase < 0.0 {
                phase += 1.0;
            }
            // low at the cycle edges, peak in the middle
            *level = (std::f32::consts::PI * phase).sin();
        }
        levels
    }
}
