use super::FvElementGeometry;
use crate::base::{Config, Essential, Mesh, Natural, Nbc};
use crate::StrError;
use std::collections::{HashMap, HashSet};

/// Holds the discretization data shared by the assembler and the solvers
///
/// Bundles the element geometries, the boundary-condition maps, and the
/// equation-numbering constants. The equation number of a DOF at a point is
/// `eq = point_id * n_eq + dof_index`.
pub struct FvBase<'a> {
    /// Configuration
    pub config: &'a Config,

    /// The mesh
    pub mesh: &'a Mesh,

    /// Box geometry of each cell
    pub geoms: Vec<FvElementGeometry>,

    /// Set of boundary edges (canonical keys)
    pub boundary_edges: HashSet<(usize, usize)>,

    /// Natural boundary conditions mapped by edge key
    pub nbc_map: HashMap<(usize, usize), Nbc>,

    /// Flags marking the prescribed (Dirichlet) equations
    pub prescribed: Vec<bool>,

    /// Prescribed (equation, value) pairs
    pub prescribed_values: Vec<(usize, f64)>,

    /// Number of equations per vertex
    pub n_eq: usize,

    /// Total number of equations
    pub neq_total: usize,
}

impl<'a> FvBase<'a> {
    /// Allocates a new instance, computing all element geometries
    pub fn new(
        config: &'a Config,
        mesh: &'a Mesh,
        essential: &Essential,
        natural: &Natural,
    ) -> Result<Self, StrError> {
        if let Some(message) = config.validate() {
            return Err(message);
        }
        if mesh.points.is_empty() || mesh.cells.is_empty() {
            return Err("mesh must have at least one point and one cell");
        }
        let boundary_edges = mesh.boundary_edges();
        let mut geoms = Vec::with_capacity(mesh.cells.len());
        for cell in &mesh.cells {
            geoms.push(FvElementGeometry::new(mesh, cell, &boundary_edges)?);
        }
        let nbc_map = natural.to_map(&boundary_edges)?;
        let n_eq = config.n_equations();
        let neq_total = mesh.points.len() * n_eq;
        let (prescribed, prescribed_values) = essential.prescribed(mesh.points.len(), n_eq)?;
        Ok(FvBase {
            config,
            mesh,
            geoms,
            boundary_edges,
            nbc_map,
            prescribed,
            prescribed_values,
            n_eq,
            neq_total,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FvBase;
    use crate::base::{Config, Dof, Essential, Natural, Nbc, SampleMeshes};

    #[test]
    fn new_works() {
        let config = Config::new();
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 2, 1);
        let mut essential = Essential::new();
        essential.points(&[0, 3], Dof::Pl, 2e5);
        let mut natural = Natural::new();
        natural.edge(2, 5, Nbc::Outflow);
        let base = FvBase::new(&config, &mesh, &essential, &natural).unwrap();
        assert_eq!(base.geoms.len(), 2);
        assert_eq!(base.n_eq, 2);
        assert_eq!(base.neq_total, 12);
        assert_eq!(base.prescribed[0], true);
        assert_eq!(base.prescribed[1], false);
        assert_eq!(base.nbc_map.len(), 1);
    }

    #[test]
    fn new_captures_errors() {
        let mut config = Config::new();
        let mesh = SampleMeshes::one_qua4();
        let essential = Essential::new();
        let natural = Natural::new();
        config.n_max_iterations = 0;
        assert_eq!(
            FvBase::new(&config, &mesh, &essential, &natural).err(),
            Some("at least one Newton iteration must be allowed")
        );

        let config = Config::new();
        let mut natural = Natural::new();
        natural.edge(0, 3, Nbc::Qw(1.0)); // diagonal, not an edge
        assert_eq!(
            FvBase::new(&config, &mesh, &essential, &natural).err(),
            Some("natural boundary condition is not on a boundary edge")
        );
    }
}
