use super::{Cell, Mesh, Point};
use nalgebra::Vector2;

/// Holds sample meshes for tests and verification problems
pub struct SampleMeshes;

impl SampleMeshes {
    /// Returns a mesh with a single unit-square Qua4 cell
    ///
    /// ```text
    /// 3-------2
    /// |       |
    /// |  [0]  |
    /// |       |
    /// 0-------1
    /// ```
    pub fn one_qua4() -> Mesh {
        Self::rectangle(1.0, 1.0, 1, 1)
    }

    /// Returns a structured nx-by-ny grid of Qua4 cells over a rectangle
    ///
    /// Points are numbered row-by-row from the bottom-left corner; cells are
    /// counter-clockwise.
    pub fn rectangle(lx: f64, ly: f64, nx: usize, ny: usize) -> Mesh {
        assert!(nx > 0 && ny > 0 && lx > 0.0 && ly > 0.0);
        let dx = lx / (nx as f64);
        let dy = ly / (ny as f64);
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..(ny + 1) {
            for i in 0..(nx + 1) {
                let id = j * (nx + 1) + i;
                points.push(Point {
                    id,
                    coords: Vector2::new((i as f64) * dx, (j as f64) * dy),
                });
            }
        }
        let mut cells = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let id = j * nx + i;
                let p0 = j * (nx + 1) + i;
                let p1 = p0 + 1;
                let p2 = p1 + (nx + 1);
                let p3 = p0 + (nx + 1);
                cells.push(Cell {
                    id,
                    points: [p0, p1, p2, p3],
                });
            }
        }
        Mesh { points, cells }
    }

    /// Returns a horizontal column of n cells with unit height
    pub fn column(length: f64, n: usize) -> Mesh {
        Self::rectangle(length, 1.0, n, 1)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SampleMeshes;

    #[test]
    fn one_qua4_works() {
        let mesh = SampleMeshes::one_qua4();
        assert_eq!(mesh.points.len(), 4);
        assert_eq!(mesh.cells.len(), 1);
        assert_eq!(mesh.cells[0].points, [0, 1, 3, 2]);
        assert_eq!(mesh.points[3].coords[0], 1.0);
        assert_eq!(mesh.points[3].coords[1], 1.0);
    }

    #[test]
    fn column_works() {
        let mesh = SampleMeshes::column(10.0, 10);
        assert_eq!(mesh.points.len(), 22);
        assert_eq!(mesh.cells.len(), 10);
        // first cell is counter-clockwise
        assert_eq!(mesh.cells[0].points, [0, 1, 12, 11]);
        assert_eq!(mesh.points[1].coords[0], 1.0);
    }
}
