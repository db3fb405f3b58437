//! Fixed timestep loop
//!
//! Drives a single tick callback at a fixed rate. The first tick fires as soon
//! as the loop starts; input edges are cleared after every tick so each
//! "just pressed/released" edge is observed by exactly one tick.

use std::thread;
use std::time::{Duration, Instant};

use crate::input::InputState;

/// Tick counter and run flag handed to the callback
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock {
    tick_count: u64,
    running: bool,
}

impl Clock {
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// No further ticks fire once the current one returns
    pub fn stop(&mut self) {
        self.running = false;
    }
}

/// Receiver of loop ticks
pub trait TickHandler {
    fn on_tick(&mut self, clock: &mut Clock);

    /// Input whose edges the loop clears after each tick
    fn input_mut(&mut self) -> &mut InputState;
}

#[derive(Debug, Clone)]
pub struct GameLoop {
    ticks_per_second: u32,
    clock: Clock,
}

impl GameLoop {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            ticks_per_second: ticks_per_second.max(1),
            clock: Clock::default(),
        }
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second as f64)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.clock.running
    }

    /// Start the loop and fire tick 0 immediately
    pub fn start(&mut self, handler: &mut impl TickHandler) {
        log::info!("Loop started at {} ticks/s", self.ticks_per_second);
        self.clock = Clock {
            tick_count: 0,
            running: true,
        };
        self.fire(handler);
    }

    /// Fire the next tick; false once the loop has been stopped
    pub fn step(&mut self, handler: &mut impl TickHandler) -> bool {
        if !self.clock.running {
            return false;
        }
        self.clock.tick_count += 1;
        self.fire(handler);
        true
    }

    pub fn stop(&mut self) {
        if self.clock.running {
            log::info!("Loop stopped after {} ticks", self.clock.tick_count);
        }
        self.clock.running = false;
    }

    fn fire(&mut self, handler: &mut impl TickHandler) {
        handler.on_tick(&mut self.clock);
        handler.input_mut().clear_edges();
        if !self.clock.running {
            log::info!("Loop stopped after {} ticks", self.clock.tick_count);
        }
    }

    /// Run in real time until stopped or until `max_ticks` have fired
    ///
    /// Ticks are spaced by the fixed interval. A late tick pushes the schedule
    /// back instead of firing a burst of catch-up ticks.
    pub fn run(&mut self, handler: &mut impl TickHandler, max_ticks: Option<u64>) {
        if max_ticks == Some(0) {
            return;
        }
        let interval = self.interval();
        self.start(handler);
        let mut next = Instant::now() + interval;
        while self.clock.running && max_ticks.is_none_or(|max| self.clock.tick_count + 1 < max) {
            let now = Instant::now();
            if next > now {
                thread::sleep(next - now);
                next += interval;
            } else {
                next = now + interval;
            }
            self.step(handler);
        }
    }

    /// Run as fast as possible (headless/simulation use)
    pub fn run_unpaced(&mut self, handler: &mut impl TickHandler, max_ticks: u64) {
        if max_ticks == 0 {
            return;
        }
        self.start(handler);
        while self.clock.running && self.clock.tick_count + 1 < max_ticks {
            self.step(handler);
        }
    }
}
