use crate::base::{edge_key, Cell, Mesh};
use crate::StrError;
use nalgebra::{Matrix2, Vector2};
use std::collections::HashSet;

/// Reference coordinates of the Qua4 vertices (counter-clockwise)
const REF_COORDS: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Holds a vertex-attached sub-control volume (SCV) of an element
#[derive(Clone, Debug)]
pub struct SubControlVolume {
    /// Local vertex index within the element
    pub local: usize,

    /// Global position of the attached vertex
    pub position: Vector2<f64>,

    /// Volume (area in 2D, unit thickness)
    pub volume: f64,
}

/// Holds an interior face between two SCVs of the same element
///
/// The normal is scaled by the face area and oriented from SCV `i` to SCV `j`.
#[derive(Clone, Debug)]
pub struct SubControlVolumeFace {
    /// Local index of the first adjacent SCV
    pub i: usize,

    /// Local index of the second adjacent SCV
    pub j: usize,

    /// Integration point (global coordinates)
    pub ip: Vector2<f64>,

    /// Area-scaled normal vector, oriented from SCV i to SCV j
    pub normal: Vector2<f64>,

    /// Shape-function values at the integration point
    pub shape: [f64; 4],

    /// Global shape-function gradients at the integration point
    pub grad: [Vector2<f64>; 4],
}

/// Holds a face on the domain boundary with one-sided SCV adjacency
#[derive(Clone, Debug)]
pub struct BoundaryFace {
    /// Local index of the adjacent SCV
    pub scv: usize,

    /// Canonical key (sorted global point ids) of the boundary edge
    pub edge: (usize, usize),

    /// Face area (length in 2D, unit thickness)
    pub area: f64,

    /// Area-scaled outward normal vector
    pub normal: Vector2<f64>,

    /// Integration point (global coordinates)
    pub ip: Vector2<f64>,

    /// Shape-function values at the integration point
    pub shape: [f64; 4],

    /// Global shape-function gradients at the integration point
    pub grad: [Vector2<f64>; 4],
}

/// Holds the box-method geometry of one element: SCVs, interior SCV faces, and boundary faces
#[derive(Clone, Debug)]
pub struct FvElementGeometry {
    /// The four sub-control volumes (one per vertex)
    pub scv: Vec<SubControlVolume>,

    /// The four interior faces between adjacent SCVs
    pub scvf: Vec<SubControlVolumeFace>,

    /// Boundary faces (two per boundary edge of this element)
    pub boundary_faces: Vec<BoundaryFace>,
}

/// Evaluates the bilinear shape functions at a reference point
fn shape_functions(xi: f64, eta: f64) -> [f64; 4] {
    let mut nn = [0.0; 4];
    for k in 0..4 {
        nn[k] = 0.25 * (1.0 + xi * REF_COORDS[k][0]) * (1.0 + eta * REF_COORDS[k][1]);
    }
    nn
}

/// Evaluates the reference-space shape-function derivatives at a reference point
fn shape_derivatives(xi: f64, eta: f64) -> [[f64; 2]; 4] {
    let mut dd = [[0.0; 2]; 4];
    for k in 0..4 {
        dd[k][0] = 0.25 * REF_COORDS[k][0] * (1.0 + eta * REF_COORDS[k][1]);
        dd[k][1] = 0.25 * REF_COORDS[k][1] * (1.0 + xi * REF_COORDS[k][0]);
    }
    dd
}

/// Maps a reference point to global coordinates
fn map_to_global(coords: &[Vector2<f64>; 4], xi: f64, eta: f64) -> Vector2<f64> {
    let nn = shape_functions(xi, eta);
    let mut x = Vector2::zeros();
    for k in 0..4 {
        x += coords[k] * nn[k];
    }
    x
}

/// Computes the shape values and global gradients at a reference point
fn shape_and_gradients(
    coords: &[Vector2<f64>; 4],
    xi: f64,
    eta: f64,
) -> Result<([f64; 4], [Vector2<f64>; 4]), StrError> {
    let nn = shape_functions(xi, eta);
    let dd = shape_derivatives(xi, eta);
    let mut jj = Matrix2::zeros();
    for k in 0..4 {
        jj[(0, 0)] += coords[k][0] * dd[k][0];
        jj[(0, 1)] += coords[k][0] * dd[k][1];
        jj[(1, 0)] += coords[k][1] * dd[k][0];
        jj[(1, 1)] += coords[k][1] * dd[k][1];
    }
    let inv = match jj.try_inverse() {
        Some(inv) => inv,
        None => return Err("quadrilateral element has a singular Jacobian"),
    };
    let inv_t = inv.transpose();
    let mut grad = [Vector2::zeros(); 4];
    for k in 0..4 {
        grad[k] = inv_t * Vector2::new(dd[k][0], dd[k][1]);
    }
    Ok((nn, grad))
}

/// Computes the signed area of a polygon (positive for counter-clockwise ordering)
fn polygon_area(vertices: &[Vector2<f64>]) -> f64 {
    let n = vertices.len();
    let mut twice_area = 0.0;
    for m in 0..n {
        let a = &vertices[m];
        let b = &vertices[(m + 1) % n];
        twice_area += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * twice_area
}

impl FvElementGeometry {
    /// Computes the box geometry of a Qua4 cell
    ///
    /// The `boundary_edges` set (canonical keys) determines which cell edges
    /// receive boundary faces.
    pub fn new(mesh: &Mesh, cell: &Cell, boundary_edges: &HashSet<(usize, usize)>) -> Result<Self, StrError> {
        let coords: [Vector2<f64>; 4] = [
            mesh.points[cell.points[0]].coords,
            mesh.points[cell.points[1]].coords,
            mesh.points[cell.points[2]].coords,
            mesh.points[cell.points[3]].coords,
        ];

        // center and edge midpoints (bilinear map of the reference midpoints)
        let center = map_to_global(&coords, 0.0, 0.0);
        let mut edge_mid = [Vector2::zeros(); 4];
        for m in 0..4 {
            edge_mid[m] = (coords[m] + coords[(m + 1) % 4]) * 0.5;
        }

        // sub-control volumes: quadrant polygons (vertex, next edge midpoint, center, previous edge midpoint)
        let mut scv = Vec::with_capacity(4);
        for k in 0..4 {
            let prev = (k + 3) % 4;
            let volume = polygon_area(&[coords[k], edge_mid[k], center, edge_mid[prev]]);
            if volume <= 0.0 {
                return Err("cell is not counter-clockwise or is degenerate");
            }
            scv.push(SubControlVolume {
                local: k,
                position: coords[k],
                volume,
            });
        }

        // interior SCV faces: from each edge midpoint to the element center,
        // normal oriented from SCV k to SCV k+1
        let ref_mid = [[0.0, -1.0], [1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]];
        let mut scvf = Vec::with_capacity(4);
        for k in 0..4 {
            let ip_ref = [0.5 * ref_mid[k][0], 0.5 * ref_mid[k][1]];
            let ip = map_to_global(&coords, ip_ref[0], ip_ref[1]);
            let d = center - edge_mid[k];
            let normal = Vector2::new(d[1], -d[0]);
            let (shape, grad) = shape_and_gradients(&coords, ip_ref[0], ip_ref[1])?;
            scvf.push(SubControlVolumeFace {
                i: k,
                j: (k + 1) % 4,
                ip,
                normal,
                shape,
                grad,
            });
        }

        // boundary faces: two half-edge faces per boundary edge
        let mut boundary_faces = Vec::new();
        for m in 0..4 {
            let a = cell.points[m];
            let b = cell.points[(m + 1) % 4];
            let key = edge_key(a, b);
            if !boundary_edges.contains(&key) {
                continue;
            }
            let next = (m + 1) % 4;
            let t = coords[next] - coords[m];
            let len = t.norm();
            if len <= 0.0 {
                return Err("cell is not counter-clockwise or is degenerate");
            }
            // outward unit normal of a counter-clockwise cell edge
            let outward = Vector2::new(t[1], -t[0]) / len;
            let area = 0.5 * len;
            let (ra, rb) = (REF_COORDS[m], REF_COORDS[next]);
            // one face per vertex of the edge: [vertex, edge midpoint]
            for (scv_local, lo, hi) in [(m, 0.0, 0.5), (next, 0.5, 1.0)] {
                let s = 0.5 * (lo + hi);
                let ip_ref = [ra[0] + s * (rb[0] - ra[0]), ra[1] + s * (rb[1] - ra[1])];
                let ip = map_to_global(&coords, ip_ref[0], ip_ref[1]);
                let (shape, grad) = shape_and_gradients(&coords, ip_ref[0], ip_ref[1])?;
                boundary_faces.push(BoundaryFace {
                    scv: scv_local,
                    edge: key,
                    area,
                    normal: outward * area,
                    ip,
                    shape,
                    grad,
                });
            }
        }

        Ok(FvElementGeometry {
            scv,
            scvf,
            boundary_faces,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
