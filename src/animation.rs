//! Per-frame intensity animation.
//!
//! Intensity rises toward a target set by pointer proximity and the target
//! itself decays back to the baseline, each on its own time constant. The
//! quick rise and the slow decay leave a glowing trail behind the pointer.

use crate::config::Config;
use crate::diagram::Diagram;
use crate::geometry::Point;

/// rAF timestamps jitter around the display period by a fraction of a millisecond.
const FRAME_SLACK_MS: f64 = 0.5;

/// Last known pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub inside: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Self {
            x: -9999.0,
            y: -9999.0,
            inside: false,
        }
    }
}

impl Pointer {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Frame-rate cap.
#[derive(Debug, Clone)]
pub struct FrameClock {
    min_interval_ms: f64,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last: None,
        }
    }

    /// Elapsed time since the last accepted frame, or `None` if `now` comes too soon.
    ///
    /// The first call after construction or `reset` is accepted with zero
    /// elapsed time.
    pub fn advance(&mut self, now: f64) -> Option<f64> {
        let Some(prev) = self.last else {
            self.last = Some(now);
            return Some(0.0);
        };
        let dt = now - prev;
        if dt + FRAME_SLACK_MS < self.min_interval_ms {
            return None;
        }
        self.last = Some(now);
        Some(dt.max(0.0))
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    base: f64,
    radius: f64,
    fade_ms: f64,
    trail_ms: f64,
    pointer: Pointer,
    clock: FrameClock,
}

impl Animator {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.base_intensity,
            radius: config.effect_radius,
            fade_ms: config.fade_ms,
            trail_ms: config.trail_ms,
            pointer: Pointer::default(),
            clock: FrameClock::new(config.min_frame_interval_ms()),
        }
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn move_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Pointer { x, y, inside: true };
    }

    pub fn leave(&mut self) {
        self.pointer.inside = false;
    }

    /// Forget the last frame time, e.g. after the loop was paused.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Run one throttled frame at `now`. Returns the elapsed time that was
    /// applied, or `None` if the frame was skipped.
    pub fn frame(&mut self, now: f64, diagram: &mut Diagram) -> Option<f64> {
        let dt = self.clock.advance(now)?;
        self.step(diagram, dt);
        Some(dt)
    }

    /// Proximity then blend/decay for `dt` milliseconds, without throttling.
    pub fn step(&self, diagram: &mut Diagram, dt: f64) {
        if self.pointer.inside {
            self.raise_near_pointer(diagram);
        }
        self.relax(diagram, dt);
    }

    /// Lift the target of every site within the effect radius of the pointer.
    pub fn raise_near_pointer(&self, diagram: &mut Diagram) {
        let p = self.pointer.position();
        let radius_sq = self.radius * self.radius;
        let (grid, sites) = diagram.split_mut();

        for i in grid.neighbors(p) {
            let site = &mut sites[i];
            let dist_sq = site.position().distance_squared(p);
            if dist_sq > radius_sq {
                continue;
            }
            let lifted = (self.base + (1.0 - dist_sq.sqrt() / self.radius)).clamp(0.0, 1.0);
            if lifted > site.target {
                site.target = lifted;
            }
        }
    }

    fn relax(&self, diagram: &mut Diagram, dt: f64) {
        let fade = (dt / self.fade_ms).clamp(0.0, 1.0);
        let decay = (dt / self.trail_ms).clamp(0.0, 1.0);
        let base = self.base;

        for site in diagram.sites.iter_mut() {
            site.intensity += (site.target - site.intensity) * fade;
            site.target -= (site.target - base) * decay;
            site.intensity = site.intensity.clamp(base, 1.0);
            site.target = site.target.clamp(base, 1.0);
        }
    }
}
