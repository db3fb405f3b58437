//! Tick counters used by gameplay entities

/// Countdown that expires once it drops below zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationCounter {
    max: f32,
    left: f32,
}

impl DurationCounter {
    pub fn new(duration: f32) -> Self {
        Self {
            max: duration,
            left: duration,
        }
    }

    pub fn tick(&mut self) -> &mut Self {
        self.left -= 1.0;
        self
    }

    /// True once `tick` has been called more than `max` times
    pub fn over(&self) -> bool {
        self.left < 0.0
    }

    pub fn reset(&mut self) -> &mut Self {
        self.left = self.max;
        self
    }

    /// Remaining fraction in [0, 1], for fades
    pub fn fract(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (self.left / self.max).clamp(0.0, 1.0)
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Walk cycle: picks a sheet frame from a looping counter that only advances
/// while the owner actually moves
///
/// With breakpoints `[a, b, c, d]` the frame counter runs modulo `d`:
/// `[0, a)` shows frame (0, 0), `[a, b)` frame (1, 0), `[b, c)` frame (0, 0)
/// and `[c, d)` frame (2, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementAnimation {
    frame: u32,
    breakpoints: [u32; 4],
    enabled: bool,
}

impl MovementAnimation {
    pub fn new(breakpoints: [u32; 4]) -> Self {
        Self {
            frame: 0,
            breakpoints,
            enabled: breakpoints[3] > 0,
        }
    }

    pub fn disabled() -> Self {
        Self {
            frame: 0,
            breakpoints: [0; 4],
            enabled: false,
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Advance one frame if `moving`; returns the sheet frame to show
    pub fn tick(&mut self, moving: bool) -> Option<(u32, u32)> {
        if !moving || !self.enabled {
            return None;
        }
        self.frame = self.frame.wrapping_add(1);
        let [a, b, c, d] = self.breakpoints;
        let t = self.frame % d;
        let frame = if t < a {
            (0, 0)
        } else if t < b {
            (1, 0)
        } else if t < c {
            (0, 0)
        } else {
            (2, 0)
        };
        Some(frame)
    }
}
