//! Frame-based animations
//!
//! An animation is a finite per-frame mutator attached to an entity. Each frame
//! advances its progress and then runs `on_frame`; once finished it is detached
//! and its `on_finish` hook runs exactly once.

use std::fmt::Debug;

use glam::Vec2;

use super::entity::Transform;

/// Default animation length in ticks
pub const DEFAULT_DURATION: u32 = 60;

/// Frames elapsed out of a maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub max: u32,
    pub finished: bool,
}

impl Progress {
    pub fn new(max: u32) -> Self {
        Self {
            current: 0,
            max,
            finished: false,
        }
    }

    pub fn tick(&mut self) {
        self.current += 1;
        if self.current >= self.max {
            self.finished = true;
        }
    }

    /// Normalised time at the previous and current frame
    fn span(&self) -> (f32, f32) {
        if self.max == 0 {
            return (0.0, 1.0);
        }
        let max = self.max as f32;
        (
            self.current.saturating_sub(1) as f32 / max,
            self.current as f32 / max,
        )
    }
}

pub trait Animation: Debug {
    fn progress(&self) -> &Progress;
    fn progress_mut(&mut self) -> &mut Progress;

    fn on_start(&mut self, _target: &mut dyn Transform) {}

    fn on_frame(&mut self, _target: &mut dyn Transform) {}

    fn on_finish(&mut self, _target: &mut dyn Transform) {}

    fn finished(&self) -> bool {
        self.progress().finished
    }

    /// Advance one frame and apply it
    fn do_frame(&mut self, target: &mut dyn Transform) {
        self.progress_mut().tick();
        self.on_frame(target);
    }
}

/// Run one frame of every animation attached to `target`
///
/// Finished animations are evicted after the pass, with their finish hooks
/// run in attach order. Animations attached during the pass are kept.
pub(crate) fn run_animations(target: &mut dyn Transform) {
    if target.body().animations.is_empty() {
        return;
    }
    let mut running = std::mem::take(&mut target.body_mut().animations);
    for animation in running.iter_mut() {
        animation.do_frame(target);
    }

    let mut kept = Vec::with_capacity(running.len());
    for mut animation in running {
        if animation.finished() {
            animation.on_finish(target);
        } else {
            kept.push(animation);
        }
    }
    let attached_meanwhile = std::mem::take(&mut target.body_mut().animations);
    kept.extend(attached_meanwhile);
    target.body_mut().animations = kept;
}

/// Does nothing for its duration (useful inside sequences)
#[derive(Debug, Clone)]
pub struct Wait {
    progress: Progress,
}

impl Wait {
    pub fn new(duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
        }
    }
}

impl Animation for Wait {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }
}

/// Linear translation by `delta` spread over the duration
#[derive(Debug, Clone)]
pub struct Move {
    progress: Progress,
    step: Vec2,
}

impl Move {
    pub fn new(delta: Vec2, duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
            step: delta / duration.max(1) as f32,
        }
    }
}

impl Animation for Move {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        target.move_by(self.step);
    }
}

/// Exponential approach toward `target`, snapping once within 0.1
#[derive(Debug, Clone)]
pub struct Ease {
    progress: Progress,
    target: Vec2,
    ratio: f32,
}

impl Ease {
    pub fn new(target: Vec2, ratio: f32, duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
            target,
            ratio,
        }
    }
}

impl Animation for Ease {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        target.ease_to(self.target, self.ratio);
        let gap = self.target - target.position();
        if gap.x.abs() < 0.1 && gap.y.abs() < 0.1 {
            target.move_by(gap);
            self.progress.finished = true;
        }
    }
}

/// Accelerating translation (`t^power`)
#[derive(Debug, Clone)]
pub struct SmoothStart {
    progress: Progress,
    delta: Vec2,
    power: f32,
}

impl SmoothStart {
    pub fn new(delta: Vec2, power: f32, duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
            delta,
            power,
        }
    }
}

impl Animation for SmoothStart {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        let (t1, t2) = self.progress.span();
        let fract = t2.powf(self.power) - t1.powf(self.power);
        target.move_by(self.delta * fract);
    }
}

/// Decelerating translation (`1 - (1-t)^power`)
#[derive(Debug, Clone)]
pub struct SmoothStop {
    progress: Progress,
    delta: Vec2,
    power: f32,
}

impl SmoothStop {
    pub fn new(delta: Vec2, power: f32, duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
            delta,
            power,
        }
    }
}

impl Animation for SmoothStop {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        let (t1, t2) = self.progress.span();
        let fract = (1.0 - t1).powf(self.power) - (1.0 - t2).powf(self.power);
        target.move_by(self.delta * fract);
    }
}

/// Sine-shaped translation over `radians` of phase (π = out and back)
#[derive(Debug, Clone)]
pub struct Sin {
    progress: Progress,
    delta: Vec2,
    radians: f32,
}

impl Sin {
    pub fn new(delta: Vec2, radians: f32, duration: u32) -> Self {
        Self {
            progress: Progress::new(duration),
            delta,
            radians,
        }
    }
}

impl Animation for Sin {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        let (t1, t2) = self.progress.span();
        let fract = (t2 * self.radians).sin() - (t1 * self.radians).sin();
        target.move_by(self.delta * fract);
    }
}

/// Plays animations one after another
#[derive(Debug)]
pub struct Sequence {
    progress: Progress,
    animations: Vec<Box<dyn Animation>>,
    index: usize,
}

impl Sequence {
    pub fn new(animations: Vec<Box<dyn Animation>>) -> Self {
        // Each step needs one extra frame to hand over to the next
        let total = animations.iter().map(|a| a.progress().max + 1).sum();
        Self {
            progress: Progress::new(total),
            animations,
            index: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.index
    }
}

impl Animation for Sequence {
    fn progress(&self) -> &Progress {
        &self.progress
    }

    fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    fn on_start(&mut self, target: &mut dyn Transform) {
        if let Some(first) = self.animations.first_mut() {
            first.on_start(target);
        }
    }

    fn on_frame(&mut self, target: &mut dyn Transform) {
        let Some(current) = self.animations.get_mut(self.index) else {
            self.progress.finished = true;
            return;
        };
        current.do_frame(target);
        if current.finished() {
            current.on_finish(target);
            self.index += 1;
            match self.animations.get_mut(self.index) {
                Some(next) => next.on_start(target),
                None => self.progress.finished = true,
            }
        }
    }
}

/// Bundle animations to run side by side (see `Transform::add_animations`)
pub fn combine(
    animations: impl IntoIterator<Item = Box<dyn Animation>>,
) -> Vec<Box<dyn Animation>> {
    animations.into_iter().collect()
}
