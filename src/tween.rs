//! Timed interpolation records for scripted motion.
//!
//! Every scripted movement (pulls, throws, the reunion) is an `Interp` stored in the state
//! that owns it and advanced by elapsed time each frame. Dropping the owning state cancels it.

use std::f32::consts::PI;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    SineOut,
    SineInOut,
    CubicIn,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicIn => t * t * t,
        }
    }
}

/// A point moving from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interp {
    pub from: Vec2,
    pub to: Vec2,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Interp {
    pub fn new(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> Vec2 {
        let progress = self.progress();
        if progress >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(progress))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by `dt` and returns the new value.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.elapsed += dt;
        self.value()
    }
}
