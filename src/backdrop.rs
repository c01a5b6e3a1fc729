//! The backdrop instance: one diagram, its animation state and its frame loop.
//!
//! Host events go through [`Backdrop::update`]; frames are pulled by
//! [`Backdrop::tick`], which asks the injected [`FrameScheduler`] for the next
//! frame while the loop is running. Regeneration happens in
//! [`Backdrop::settle`], never inside the per-frame work.

use crate::animation::Animator;
use crate::config::Config;
use crate::diagram::Diagram;
use crate::paint::{self, Surface};
use crate::resize::{Dimensions, ResizeCoordinator};

/// Source of display-synchronised callbacks (`requestAnimationFrame` in the browser).
pub trait FrameScheduler {
    /// Arrange for `tick` to be called once more.
    fn request_frame(&mut self);
    /// Drop an outstanding request, if any.
    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Pointer position in canvas coordinates.
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    /// Fresh measurement of the page.
    Resize(Dimensions),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Loop not running; nothing scheduled.
    Stopped,
    /// Too soon after the previous frame; rescheduled without drawing.
    Throttled,
    /// Animated and painted this many cells.
    Rendered(usize),
}

pub struct Backdrop<S> {
    config: Config,
    seed: u32,
    diagram: Diagram,
    animator: Animator,
    resize: ResizeCoordinator,
    scheduler: S,
    running: bool,
    generations: u32,
}

impl<S: FrameScheduler> Backdrop<S> {
    pub fn new(config: Config, seed: u32, scheduler: S) -> Self {
        Self {
            diagram: Diagram::empty(&config),
            animator: Animator::new(&config),
            resize: ResizeCoordinator::new(config.resize_debounce_ms),
            config,
            seed,
            scheduler,
            running: false,
            generations: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.resize.current()
    }

    /// Number of regenerations so far.
    pub fn generations(&self) -> u32 {
        self.generations
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time at which a pending resize settles, if one is waiting.
    pub fn resize_due(&self) -> Option<f64> {
        self.resize.due()
    }

    pub fn update(&mut self, event: Event, now: f64) {
        match event {
            Event::PointerMove { x, y } => self.animator.move_pointer(x, y),
            Event::PointerLeave => self.animator.leave(),
            Event::Resize(dims) => self.resize.notify(dims, now),
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        log::debug!("backdrop animation started");
        self.running = true;
        self.animator.reset_clock();
        self.scheduler.request_frame();
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        log::debug!("backdrop animation stopped");
        self.running = false;
        self.scheduler.cancel();
    }

    /// Start the loop, or stop it and leave one static frame on the surface.
    pub fn set_animated<T: Surface + ?Sized>(&mut self, animated: bool, surface: &mut T) {
        if animated {
            self.start();
        } else {
            self.stop();
            self.render_static(surface);
        }
    }

    /// Apply a pending resize whose quiet period is over. Returns true if the
    /// diagram was regenerated.
    ///
    /// A stopped backdrop gets the new diagram painted once, since no frame
    /// will follow.
    pub fn settle<T: Surface + ?Sized>(&mut self, now: f64, surface: &mut T) -> bool {
        let Some(dims) = self.resize.poll(now) else {
            return false;
        };

        surface.resize(dims);
        self.diagram = Diagram::generate(
            f64::from(dims.width),
            f64::from(dims.height),
            self.seed,
            &self.config,
        );
        self.generations += 1;
        log::info!(
            "voronoi regenerated: {}x{} @ dpr {} ({} cells)",
            dims.width,
            dims.height,
            dims.dpr,
            self.diagram.len()
        );
        if !self.running {
            self.render_static(surface);
        }
        true
    }

    /// One animation frame at timestamp `now` (ms).
    pub fn tick<T: Surface + ?Sized>(&mut self, now: f64, surface: &mut T) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stopped;
        }

        let outcome = match self.animator.frame(now, &mut self.diagram) {
            Some(_) => FrameOutcome::Rendered(paint::paint(surface, &self.diagram, &self.config)),
            None => FrameOutcome::Throttled,
        };
        self.scheduler.request_frame();
        outcome
    }

    /// Paint the current state once without advancing the animation.
    pub fn render_static<T: Surface + ?Sized>(&self, surface: &mut T) -> usize {
        paint::paint(surface, &self.diagram, &self.config)
    }
}
