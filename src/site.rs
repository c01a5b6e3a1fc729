//! Jittered-grid site placement.

use std::f64::consts::TAU;

use crate::config::Config;
use crate::geometry::Point;
use crate::rng::Mulberry32;
use crate::spatial::SpatialGrid;

/// Smallest grid step in CSS pixels, whatever the density.
pub const MIN_CELL_SIZE: f64 = 60.0;
/// Lower bound applied to the configured density.
const MIN_DENSITY: u32 = 6;
/// Total jitter span as a fraction of the cell size (±30%).
const JITTER: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub target: f64,
    pub brightness: f64,
    pub grad_angle: f64,
}

impl Site {
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Grid step for a viewport of the given size.
pub fn cell_size(width: f64, height: f64, density: u32) -> f64 {
    let shorter = width.min(height);
    (shorter / f64::from(density.max(MIN_DENSITY)))
        .round()
        .max(MIN_CELL_SIZE)
}

/// Number of sites `generate_sites` produces for the given size.
pub fn expected_site_count(width: f64, height: f64, density: u32) -> usize {
    if width <= 0.0 || height <= 0.0 {
        return 0;
    }
    let step = cell_size(width, height, density);
    (width / step).ceil() as usize * (height / step).ceil() as usize
}

/// Lay sites out row by row, one per grid cell, and index them in `grid`.
///
/// The draw order per site (x, y, brightness, angle) is fixed so that a seed
/// always reproduces the same layout.
pub fn generate_sites(
    width: f64,
    height: f64,
    config: &Config,
    rng: &mut Mulberry32,
    grid: &mut SpatialGrid,
) -> Vec<Site> {
    let step = cell_size(width, height, config.site_density);
    let base = config.base_intensity;
    let mut sites = Vec::with_capacity(expected_site_count(width, height, config.site_density));

    let mut y = 0.0;
    while y < height {
        let mut x = 0.0;
        while x < width {
            let sx = (x + step / 2.0 + (rng.next_f64() - 0.5) * step * JITTER).clamp(0.0, width);
            let sy = (y + step / 2.0 + (rng.next_f64() - 0.5) * step * JITTER).clamp(0.0, height);
            let brightness = 0.5 + rng.next_f64() * 0.5;
            let grad_angle = rng.next_f64() * TAU;

            let site = Site {
                x: sx,
                y: sy,
                intensity: base,
                target: base,
                brightness,
                grad_angle,
            };
            grid.insert(sites.len(), site.position());
            sites.push(site);
            x += step;
        }
        y += step;
    }
    sites
}
