use super::{edge_key, Nbc};
use crate::StrError;
use std::collections::{HashMap, HashSet};

/// Holds natural (Neumann-type) boundary conditions on boundary edges
pub struct Natural {
    /// List of (point a, point b, condition); the edge is identified by its two point ids
    pub all: Vec<(usize, usize, Nbc)>,
}

impl Natural {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        Natural { all: Vec::new() }
    }

    /// Sets a natural boundary condition on an edge given by its two point ids
    pub fn edge(&mut self, a: usize, b: usize, nbc: Nbc) -> &mut Self {
        self.all.push((a, b, nbc));
        self
    }

    /// Sets a natural boundary condition on a set of edges
    pub fn edges(&mut self, pairs: &[(usize, usize)], nbc: Nbc) -> &mut Self {
        for (a, b) in pairs {
            self.all.push((*a, *b, nbc));
        }
        self
    }

    /// Builds the edge-to-condition map, verifying that all edges lie on the boundary
    pub fn to_map(&self, boundary_edges: &HashSet<(usize, usize)>) -> Result<HashMap<(usize, usize), Nbc>, StrError> {
        let mut map = HashMap::with_capacity(self.all.len());
        for (a, b, nbc) in &self.all {
            let key = edge_key(*a, *b);
            if !boundary_edges.contains(&key) {
                return Err("natural boundary condition is not on a boundary edge");
            }
            map.insert(key, *nbc);
        }
        Ok(map)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Natural;
    use crate::base::{edge_key, Nbc, SampleMeshes};

    #[test]
    fn to_map_works() {
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 2, 1);
        let boundary = mesh.boundary_edges();
        let mut natural = Natural::new();
        natural.edge(0, 1, Nbc::Qw(-0.1)).edges(&[(2, 5)], Nbc::Outflow);
        let map = natural.to_map(&boundary).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&edge_key(1, 0)), Some(&Nbc::Qw(-0.1)));
        assert_eq!(map.get(&edge_key(2, 5)), Some(&Nbc::Outflow));
    }

    #[test]
    fn to_map_captures_errors() {
        let mesh = SampleMeshes::rectangle(2.0, 1.0, 2, 1);
        let boundary = mesh.boundary_edges();
        let mut natural = Natural::new();
        natural.edge(1, 4, Nbc::Qa(1.0)); // interior edge
        assert_eq!(
            natural.to_map(&boundary).err(),
            Some("natural boundary condition is not on a boundary edge")
        );
    }
}
