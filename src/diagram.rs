//! Topology phase: sites, their spatial index and their cells.
//!
//! A `Diagram` is rebuilt from scratch whenever the canvas size changes. Only
//! the per-site intensity fields are touched afterwards, by the animator.

use crate::config::Config;
use crate::geometry::{self, Bounds, Point, Polygon};
use crate::rng::Mulberry32;
use crate::site::{self, Site};
use crate::spatial::SpatialGrid;

#[derive(Debug, Clone)]
pub struct Diagram {
    width: f64,
    height: f64,
    pub(crate) sites: Vec<Site>,
    polygons: Vec<Polygon>,
    grid: SpatialGrid,
}

impl Diagram {
    /// A diagram with no sites, used before the first size is known.
    pub fn empty(config: &Config) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            sites: Vec::new(),
            polygons: Vec::new(),
            grid: SpatialGrid::new(config.effect_radius),
        }
    }

    /// Full regeneration for a `width` x `height` canvas (CSS pixels).
    ///
    /// The generator restarts from `seed`, so equal inputs give bit-identical
    /// diagrams.
    pub fn generate(width: f64, height: f64, seed: u32, config: &Config) -> Self {
        let mut rng = Mulberry32::new(seed);
        let mut grid = SpatialGrid::new(config.effect_radius);
        let sites = site::generate_sites(width, height, config, &mut rng, &mut grid);

        let positions: Vec<Point> = sites.iter().map(Site::position).collect();
        let polygons = geometry::voronoi_cells(&positions, &Bounds::bootstrap(width, height));

        Self {
            width,
            height,
            sites,
            polygons,
            grid,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Sites paired with their cells.
    pub fn cells(&self) -> impl Iterator<Item = (&Site, &Polygon)> {
        self.sites.iter().zip(self.polygons.iter())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(width: f64, height: f64, sites: Vec<Site>, polygons: Vec<Polygon>) -> Self {
        let mut grid = SpatialGrid::new(100.0);
        for (i, s) in sites.iter().enumerate() {
            grid.insert(i, s.position());
        }
        Self {
            width,
            height,
            sites,
            polygons,
            grid,
        }
    }

    pub(crate) fn split_mut(&mut self) -> (&SpatialGrid, &mut [Site]) {
        (&self.grid, &mut self.sites)
    }

    /// Region every vertex of every cell lies in.
    pub fn bounds(&self) -> Bounds {
        Bounds::bootstrap(self.width, self.height)
    }
}
