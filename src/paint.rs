//! Turning a diagram into draw calls.
//!
//! The drawing backend is abstracted behind [`Surface`] so the same frame
//! logic drives the browser canvas and the recording surface used in tests.

use crate::config::{Config, Rgb};
use crate::diagram::Diagram;
use crate::geometry::Point;
use crate::resize::Dimensions;
use crate::site::Site;

/// Half length of the per-cell gradient axis, in CSS pixels.
const GRADIENT_REACH: f64 = 80.0;
/// How far the far gradient stop leans toward the cool colour.
const GRADIENT_DARKEN: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    Linear {
        from: Point,
        to: Point,
        start: Rgb,
        end: Rgb,
    },
}

/// A 2-D raster target.
pub trait Surface {
    /// Match the backing store to a newly generated diagram.
    fn resize(&mut self, dims: Dimensions);
    fn clear(&mut self, color: Rgb);
    fn fill_polygon(&mut self, points: &[Point], fill: &Fill);
    fn stroke_polygon(&mut self, points: &[Point], alpha: f64);
}

/// Display colour of a site at its current intensity.
pub fn site_color(site: &Site, config: &Config) -> Rgb {
    let base = config.base_intensity;
    let t = ((site.intensity - base) / (1.0 - base)).clamp(0.0, 1.0);
    config
        .cool_color
        .lerp(config.bright_color, t)
        .scale(site.brightness)
}

pub fn site_fill(site: &Site, config: &Config) -> Fill {
    let color = site_color(site, config);
    if !config.gradient {
        return Fill::Solid(color);
    }
    let axis = Point::new(site.grad_angle.cos(), site.grad_angle.sin()) * GRADIENT_REACH;
    let center = site.position();
    Fill::Linear {
        from: center + axis,
        to: center - axis,
        start: color,
        end: color.lerp(config.cool_color, GRADIENT_DARKEN),
    }
}

/// Clear and repaint every cell. Cells with fewer than three vertices are skipped.
///
/// Returns the number of cells drawn.
pub fn paint<S: Surface + ?Sized>(surface: &mut S, diagram: &Diagram, config: &Config) -> usize {
    surface.clear(Rgb::BLACK);

    let mut drawn = 0;
    for (site, polygon) in diagram.cells() {
        if polygon.len() < 3 {
            continue;
        }
        surface.fill_polygon(polygon, &site_fill(site, config));
        if config.stroke_alpha > 0.0 {
            surface.stroke_polygon(polygon, config.stroke_alpha);
        }
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(intensity: f64, brightness: f64) -> Site {
        Site {
            x: 100.0,
            y: 50.0,
            intensity,
            target: intensity,
            brightness,
            grad_angle: 0.0,
        }
    }

    #[test]
    fn baseline_site_is_cool() {
        let config = Config::default();
        let color = site_color(&site(config.base_intensity, 1.0), &config);
        assert_eq!(color, config.cool_color);
    }

    #[test]
    fn full_site_is_bright_scaled_by_brightness() {
        let config = Config::default();
        assert_eq!(site_color(&site(1.0, 1.0), &config), config.bright_color);
        assert_eq!(site_color(&site(1.0, 0.5), &config), Rgb::new(23, 128, 128));
    }

    #[test]
    fn gradient_runs_along_angle() {
        let config = Config::default();
        let Fill::Linear { from, to, start, end } = site_fill(&site(1.0, 1.0), &config) else {
            panic!("expected a gradient fill");
        };
        assert!((from.x - 180.0).abs() < 1e-9 && (from.y - 50.0).abs() < 1e-9);
        assert!((to.x - 20.0).abs() < 1e-9 && (to.y - 50.0).abs() < 1e-9);
        assert_eq!(start, config.bright_color);
        assert_eq!(end, config.bright_color.lerp(config.cool_color, 0.7));
    }

    #[derive(Default)]
    struct CountingSurface {
        clears: usize,
        fills: usize,
        strokes: usize,
    }

    impl Surface for CountingSurface {
        fn resize(&mut self, _dims: Dimensions) {}
        fn clear(&mut self, _color: Rgb) {
            self.clears += 1;
        }
        fn fill_polygon(&mut self, _points: &[Point], _fill: &Fill) {
            self.fills += 1;
        }
        fn stroke_polygon(&mut self, _points: &[Point], _alpha: f64) {
            self.strokes += 1;
        }
    }

    #[test]
    fn degenerate_cells_are_skipped() {
        let config = Config::default();
        let triangle = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let diagram = Diagram::from_parts(
            10.0,
            10.0,
            vec![site(0.5, 1.0), site(0.5, 1.0), site(0.5, 1.0)],
            vec![triangle, vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)], Vec::new()],
        );
        let mut surface = CountingSurface::default();
        assert_eq!(paint(&mut surface, &diagram, &config), 1);
        assert_eq!(surface.clears, 1);
        assert_eq!(surface.fills, 1);
        assert_eq!(surface.strokes, 1);
    }

    #[test]
    fn flat_fill_without_gradient() {
        let config = Config {
            gradient: false,
            ..Config::default()
        };
        assert_eq!(
            site_fill(&site(config.base_intensity, 1.0), &config),
            Fill::Solid(config.cool_color)
        );
    }
}
