//! Uniform bucket grid over site indices.

use std::collections::HashMap;

use crate::geometry::Point;

pub type CellKey = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn key(&self, p: Point) -> CellKey {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, index: usize, p: Point) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(index);
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Indices in the 3x3 block of cells around `p`'s cell.
    ///
    /// With the cell size equal to the query radius this is a superset of
    /// every index within that radius of `p`.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.key(p);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (cx + dx, cy + dy)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|bucket| bucket.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_floor_negative_coordinates() {
        let grid = SpatialGrid::new(100.0);
        assert_eq!(grid.key(Point::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.key(Point::new(99.9, 100.0)), (0, 1));
        assert_eq!(grid.key(Point::new(-0.5, -100.0)), (-1, -1));
    }

    #[test]
    fn neighbors_cover_three_by_three_block() {
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(0, Point::new(5.0, 5.0)); // (0,0)
        grid.insert(1, Point::new(15.0, 15.0)); // (1,1)
        grid.insert(2, Point::new(25.0, 5.0)); // (2,0)
        grid.insert(3, Point::new(-5.0, -5.0)); // (-1,-1)
        grid.insert(4, Point::new(14.0, 3.0)); // (1,0)

        let mut near: Vec<usize> = grid.neighbors(Point::new(4.0, 4.0)).collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 1, 3, 4]);

        let mut near: Vec<usize> = grid.neighbors(Point::new(15.0, 5.0)).collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 1, 2, 4]);
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn empty_grid_yields_nothing() {
        let grid = SpatialGrid::new(50.0);
        assert!(grid.is_empty());
        assert_eq!(grid.neighbors(Point::new(1.0, 1.0)).count(), 0);
    }
}
