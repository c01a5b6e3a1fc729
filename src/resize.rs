//! Debounced regeneration trigger.

/// Width/height changes smaller than this (CSS px) are ignored.
pub const SIZE_EPSILON_PX: u32 = 2;
/// Device pixel ratio changes smaller than this are ignored.
pub const DPR_EPSILON: f64 = 0.05;

/// Canvas size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub dpr: f64,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, dpr: f64) -> Self {
        Self { width, height, dpr }
    }

    /// True when the change from `other` is large enough to rebuild the diagram.
    pub fn differs_from(&self, other: &Dimensions) -> bool {
        self.width.abs_diff(other.width) >= SIZE_EPSILON_PX
            || self.height.abs_diff(other.height) >= SIZE_EPSILON_PX
            || (self.dpr - other.dpr).abs() >= DPR_EPSILON
    }

    /// Backing store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (f64::from(self.width) * self.dpr).round() as u32,
            (f64::from(self.height) * self.dpr).round() as u32,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    dims: Dimensions,
    due: f64,
}

/// Coalesces bursts of size notifications into one regeneration.
///
/// Each notification restarts the quiet period. Once it has elapsed, `poll`
/// hands back the latest size if it differs materially from the size of the
/// last generation.
#[derive(Debug, Clone)]
pub struct ResizeCoordinator {
    debounce_ms: f64,
    current: Option<Dimensions>,
    pending: Option<Pending>,
}

impl ResizeCoordinator {
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            debounce_ms,
            current: None,
            pending: None,
        }
    }

    /// Size of the last generation, if any.
    pub fn current(&self) -> Option<Dimensions> {
        self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time at which the pending notification settles.
    pub fn due(&self) -> Option<f64> {
        self.pending.map(|p| p.due)
    }

    pub fn notify(&mut self, dims: Dimensions, now: f64) {
        self.pending = Some(Pending {
            dims,
            due: now + self.debounce_ms,
        });
    }

    /// The size to regenerate for, once the quiet period is over.
    pub fn poll(&mut self, now: f64) -> Option<Dimensions> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;

        match self.current {
            Some(current) if !pending.dims.differs_from(&current) => None,
            _ => {
                self.current = Some(pending.dims);
                Some(pending.dims)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_changes_are_ignored() {
        let a = Dimensions::new(1000, 800, 1.0);
        assert!(!a.differs_from(&Dimensions::new(1001, 799, 1.04)));
        assert!(a.differs_from(&Dimensions::new(1002, 800, 1.0)));
        assert!(a.differs_from(&Dimensions::new(1000, 798, 1.0)));
        assert!(a.differs_from(&Dimensions::new(1000, 800, 1.05)));
    }

    #[test]
    fn burst_coalesces_to_last_size() {
        let mut rc = ResizeCoordinator::new(100.0);
        rc.notify(Dimensions::new(800, 600, 1.0), 0.0);
        rc.notify(Dimensions::new(820, 600, 1.0), 40.0);
        rc.notify(Dimensions::new(840, 600, 1.0), 80.0);
        assert_eq!(rc.due(), Some(180.0));
        assert_eq!(rc.poll(150.0), None);
        assert!(rc.is_pending());
        assert_eq!(rc.poll(180.0), Some(Dimensions::new(840, 600, 1.0)));
        assert_eq!(rc.poll(500.0), None);
        assert_eq!(rc.current(), Some(Dimensions::new(840, 600, 1.0)));
    }

    #[test]
    fn first_measurement_always_generates() {
        let mut rc = ResizeCoordinator::new(0.0);
        rc.notify(Dimensions::new(0, 0, 1.0), 5.0);
        assert_eq!(rc.poll(5.0), Some(Dimensions::new(0, 0, 1.0)));
    }

    #[test]
    fn device_size_scales_by_dpr() {
        assert_eq!(Dimensions::new(100, 50, 2.0).device_size(), (200, 100));
        assert_eq!(Dimensions::new(101, 33, 1.5).device_size(), (152, 50));
    }
}
