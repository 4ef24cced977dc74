use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::core::types::Point3;
use crate::error::{ChartError, ChartResult};

/// Regular grid rebuilt from scattered `(x, y, z)` samples.
///
/// `z[row][col]` is the height at `(xs[col], ys[row])`; both axes are sorted
/// ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl StructuredGrid {
    /// Rebuilds the grid, requiring every `(x, y)` pair of the cartesian
    /// product of unique x and unique y values exactly once.
    pub fn from_points(points: &[Point3]) -> ChartResult<Self> {
        let mut column_of: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
        let mut row_of: BTreeMap<OrderedFloat<f64>, usize> = BTreeMap::new();
        for point in points {
            column_of.insert(OrderedFloat(point.x), 0);
            row_of.insert(OrderedFloat(point.y), 0);
        }

        let (columns, rows) = (column_of.len(), row_of.len());
        if columns < 2 || rows < 2 {
            return Err(ChartError::render(format!(
                "surface needs at least 2 distinct x and y values, got {columns}x{rows}"
            )));
        }
        if columns * rows != points.len() {
            return Err(ChartError::render(format!(
                "cannot reshape {} points into a {columns}x{rows} grid",
                points.len()
            )));
        }

        for (index, slot) in column_of.values_mut().enumerate() {
            *slot = index;
        }
        for (index, slot) in row_of.values_mut().enumerate() {
            *slot = index;
        }

        let mut z: Vec<Vec<Option<f64>>> = vec![vec![None; columns]; rows];
        for point in points {
            let column = column_of[&OrderedFloat(point.x)];
            let row = row_of[&OrderedFloat(point.y)];
            let cell = &mut z[row][column];
            if cell.is_some() {
                return Err(ChartError::render(format!(
                    "duplicate grid sample at x={}, y={}",
                    point.x, point.y
                )));
            }
            *cell = Some(point.z);
        }

        let z = z
            .into_iter()
            .map(|row| row.into_iter().collect::<Option<Vec<f64>>>())
            .collect::<Option<Vec<Vec<f64>>>>()
            .ok_or_else(|| ChartError::render("grid has unfilled cells"))?;

        Ok(Self {
            xs: column_of.keys().map(|key| key.0).collect(),
            ys: row_of.keys().map(|key| key.0).collect(),
            z,
        })
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    #[must_use]
    pub fn point(&self, row: usize, column: usize) -> Point3 {
        Point3::new(self.xs[column], self.ys[row], self.z[row][column])
    }
}

#[cfg(test)]
mod tests {
    use super::StructuredGrid;
    use crate::core::Point3;

    fn grid_points() -> Vec<Point3> {
        let mut points = Vec::new();
        for y in [1.0, 0.0] {
            for x in [0.0, 1.0, 2.0] {
                points.push(Point3::new(x, y, x + 10.0 * y));
            }
        }
        points
    }

    #[test]
    fn rebuilds_grid_regardless_of_input_order() {
        let grid = StructuredGrid::from_points(&grid_points()).expect("grid");
        assert_eq!(grid.xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(grid.ys, vec![0.0, 1.0]);
        assert_eq!(grid.z[1][2], 12.0);
        assert_eq!(grid.point(0, 1), Point3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn rejects_ragged_samples() {
        let mut points = grid_points();
        points.pop();
        assert!(StructuredGrid::from_points(&points).is_err());
    }

    #[test]
    fn rejects_duplicates_that_hide_a_missing_cell() {
        let mut points = grid_points();
        let last = points.len() - 1;
        points[last] = points[0];
        assert!(StructuredGrid::from_points(&points).is_err());
    }
}
