//! Planar Voronoi cells by repeated half-plane clipping.
//!
//! Every cell starts as an oversized quadrilateral and is cut by the
//! perpendicular bisector against each other site. The result is exact for a
//! convex bootstrap region and costs O(n^2) per diagram, so it only ever runs
//! when the layout changes.

/// Coordinates closer than this are treated as the same vertex.
const VERTEX_EPS: f64 = 1e-9;

/// Canvas-space position in CSS pixels.
pub type Point = glam::DVec2;

#[inline]
fn approx_eq(a: Point, b: Point) -> bool {
    a.abs_diff_eq(b, VERTEX_EPS)
}

/// Closed ring of vertices; the last vertex connects back to the first.
pub type Polygon = Vec<Point>;

/// Open half-plane `{ p : (p - origin) . normal < 0 }`.
#[derive(Debug, Clone, Copy)]
pub struct HalfPlane {
    pub origin: Point,
    pub normal: Point,
}

impl HalfPlane {
    /// The side of the perpendicular bisector of `owner`-`other` that contains `owner`.
    ///
    /// `None` when the two points coincide and no bisector exists.
    pub fn bisector(owner: Point, other: Point) -> Option<Self> {
        let normal = other - owner;
        if normal == Point::ZERO {
            return None;
        }
        Some(Self {
            origin: (owner + other) * 0.5,
            normal,
        })
    }

    #[inline]
    pub fn signed_distance(&self, p: Point) -> f64 {
        (p - self.origin).dot(self.normal)
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Region enclosing a `width` x `height` canvas two canvas sizes out on every side.
    pub fn bootstrap(width: f64, height: f64) -> Self {
        Self::new(
            Point::new(-width * 2.0, -height * 2.0),
            Point::new(width * 3.0, height * 3.0),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x - VERTEX_EPS
            && p.x <= self.max.x + VERTEX_EPS
            && p.y >= self.min.y - VERTEX_EPS
            && p.y <= self.max.y + VERTEX_EPS
    }

    pub fn to_polygon(&self) -> Polygon {
        vec![
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// Sutherland-Hodgman step: the part of `polygon` inside `plane`.
///
/// Points exactly on the line count as outside; edges that touch it still
/// contribute the touching point through the intersection branch. Repeated
/// vertices created by cutting through an existing vertex are collapsed.
pub fn clip(polygon: &[Point], plane: &HalfPlane) -> Polygon {
    fn push(out: &mut Polygon, p: Point) {
        if out.last().map_or(true, |&last| !approx_eq(last, p)) {
            out.push(p);
        }
    }

    let mut out = Polygon::with_capacity(polygon.len() + 1);

    for (k, &a) in polygon.iter().enumerate() {
        let b = polygon[(k + 1) % polygon.len()];
        let da = plane.signed_distance(a);
        let db = plane.signed_distance(b);

        if da < 0.0 {
            push(&mut out, a);
        }
        if (da < 0.0) != (db < 0.0) {
            push(&mut out, a.lerp(b, da / (da - db)));
        }
    }

    if out.len() > 1 && approx_eq(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

/// Voronoi cell of `sites[index]` intersected with `bounds`.
pub fn voronoi_cell(sites: &[Point], index: usize, bounds: &Bounds) -> Polygon {
    let owner = sites[index];
    let mut cell = bounds.to_polygon();
    for (j, &other) in sites.iter().enumerate() {
        if j == index {
            continue;
        }
        let Some(plane) = HalfPlane::bisector(owner, other) else {
            continue;
        };
        cell = clip(&cell, &plane);
        if cell.is_empty() {
            break;
        }
    }
    cell
}

/// One cell per site, indexed like `sites`.
pub fn voronoi_cells(sites: &[Point], bounds: &Bounds) -> Vec<Polygon> {
    (0..sites.len())
        .map(|i| voronoi_cell(sites, i, bounds))
        .collect()
}

/// Twice the signed area; positive for counter-clockwise rings in a y-up frame.
pub fn signed_area2(polygon: &[Point]) -> f64 {
    polygon
        .iter()
        .enumerate()
        .map(|(k, &a)| a.perp_dot(polygon[(k + 1) % polygon.len()]))
        .sum()
}

/// True when every turn along the ring has the same orientation.
pub fn is_convex(polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let n = polygon.len();
    let mut sign = 0.0_f64;
    for k in 0..n {
        let a = polygon[k];
        let b = polygon[(k + 1) % n];
        let c = polygon[(k + 2) % n];
        let turn = (b - a).perp_dot(c - b);
        if turn.abs() <= VERTEX_EPS {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// Vertex average. Lies strictly inside any non-degenerate convex ring.
pub fn centroid(polygon: &[Point]) -> Point {
    let sum = polygon.iter().fold(Point::ZERO, |acc, &p| acc + p);
    sum * (1.0 / polygon.len().max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn clip_keeps_inside_half() {
        let plane = HalfPlane {
            origin: Point::new(0.5, 0.0),
            normal: Point::new(1.0, 0.0),
        };
        let out = clip(&unit_square(), &plane);
        assert_eq!(
            out,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.5, 0.0),
                Point::new(0.5, 1.0),
                Point::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn clip_touching_vertex_keeps_it_once() {
        // Line x + y = 2 only touches the corner (1,1).
        let plane = HalfPlane {
            origin: Point::new(1.0, 1.0),
            normal: Point::new(1.0, 1.0),
        };
        assert_eq!(clip(&unit_square(), &plane), unit_square());
    }

    #[test]
    fn clip_along_diagonal() {
        // Diagonal through (1,0) and (0,1); keep the side containing the origin.
        let plane = HalfPlane {
            origin: Point::new(0.5, 0.5),
            normal: Point::new(1.0, 1.0),
        };
        let out = clip(&unit_square(), &plane);
        assert_eq!(
            out,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]
        );
    }

    #[test]
    fn clip_everything_outside_is_empty() {
        let plane = HalfPlane {
            origin: Point::new(-1.0, 0.0),
            normal: Point::new(1.0, 0.0),
        };
        assert!(clip(&unit_square(), &plane).is_empty());
    }

    #[test]
    fn coincident_sites_have_no_bisector() {
        let p = Point::new(3.0, 4.0);
        assert!(HalfPlane::bisector(p, p).is_none());
        let cells = voronoi_cells(&[p, p], &Bounds::bootstrap(10.0, 10.0));
        assert_eq!(cells[0].len(), 4);
        assert_eq!(cells[1].len(), 4);
    }

    #[test]
    fn two_sites_split_along_bisector() {
        let sites = [Point::new(2.0, 5.0), Point::new(8.0, 5.0)];
        let bounds = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let cells = voronoi_cells(&sites, &bounds);
        assert!(cells[0].iter().all(|p| p.x <= 5.0 + 1e-12));
        assert!(cells[1].iter().all(|p| p.x >= 5.0 - 1e-12));
        assert!((signed_area2(&cells[0]).abs() - 100.0).abs() < 1e-9);
        assert!((signed_area2(&cells[1]).abs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn convexity_check() {
        assert!(is_convex(&unit_square()));
        let dart = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(0.0, 2.0),
            Point::new(0.5, 1.0),
        ];
        assert!(!is_convex(&dart));
        assert!(!is_convex(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]));
    }
}
