use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Holds a mesh vertex
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Point {
    /// Identification number (index in the mesh points array)
    pub id: usize,

    /// Coordinates
    pub coords: Vector2<f64>,
}

/// Holds a 4-node quadrilateral cell with counter-clockwise vertex numbering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    /// Identification number (index in the mesh cells array)
    pub id: usize,

    /// Point ids, counter-clockwise
    pub points: [usize; 4],
}

/// Holds mesh data (read-only input supplied by the external grid collaborator)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    /// All points
    pub points: Vec<Point>,

    /// All cells
    pub cells: Vec<Cell>,
}

/// Returns the canonical (sorted) key identifying an edge by its two point ids
pub fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Mesh {
    /// Returns the set of boundary edges (edges referenced by exactly one cell)
    pub fn boundary_edges(&self) -> HashSet<(usize, usize)> {
        let mut count: HashMap<(usize, usize), usize> = HashMap::new();
        for cell in &self.cells {
            for m in 0..4 {
                let a = cell.points[m];
                let b = cell.points[(m + 1) % 4];
                *count.entry(edge_key(a, b)).or_insert(0) += 1;
            }
        }
        count
            .into_iter()
            .filter(|(_, n)| *n == 1)
            .map(|(key, _)| key)
            .collect()
    }

    /// Returns the ids of all points satisfying a positional predicate
    pub fn find_points<F>(&self, f: F) -> Vec<usize>
    where
        F: Fn(&Vector2<f64>) -> bool,
    {
        self.points
            .iter()
            .filter(|p| f(&p.coords))
            .map(|p| p.id)
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::edge_key;
    use crate::base::SampleMeshes;

    #[test]
    fn edge_key_is_canonical() {
        assert_eq!(edge_key(3, 1), (1, 3));
        assert_eq!(edge_key(1, 3), (1, 3));
    }

    #[test]
    fn boundary_edges_works() {
        // 2x1 grid: 6 points, 2 cells, 6 boundary edges, 1 interior edge
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 2, 1);
        assert_eq!(mesh.points.len(), 6);
        assert_eq!(mesh.cells.len(), 2);
        let boundary = mesh.boundary_edges();
        assert_eq!(boundary.len(), 6);
        assert!(!boundary.contains(&edge_key(1, 4)));
        assert!(boundary.contains(&edge_key(0, 1)));
    }

    #[test]
    fn find_points_works() {
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 2, 1);
        let left = mesh.find_points(|x| x[0] == 0.0);
        assert_eq!(left, &[0, 3]);
        let right = mesh.find_points(|x| x[0] == 2.0);
        assert_eq!(right, &[2, 5]);
    }
}
