use super::Dof;
use crate::StrError;

/// Holds essential (Dirichlet) boundary conditions: prescribed primary values at points
pub struct Essential {
    /// List of (point id, DOF, prescribed value)
    pub all: Vec<(usize, Dof, f64)>,
}

impl Essential {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        Essential { all: Vec::new() }
    }

    /// Prescribes a value for a DOF at a set of points
    pub fn points(&mut self, ids: &[usize], dof: Dof, value: f64) -> &mut Self {
        for id in ids {
            self.all.push((*id, dof, value));
        }
        self
    }

    /// Returns the prescribed-equation flags and the list of (equation, value) pairs
    ///
    /// The flags array has length `n_point * n_eq` (the total number of equations).
    pub fn prescribed(&self, n_point: usize, n_eq: usize) -> Result<(Vec<bool>, Vec<(usize, f64)>), StrError> {
        let mut flags = vec![false; n_point * n_eq];
        let mut pairs = Vec::with_capacity(self.all.len());
        for (id, dof, value) in &self.all {
            if *id >= n_point {
                return Err("cannot find equation number because the point id is out-of-bounds");
            }
            if dof.index() >= n_eq {
                return Err("prescribed temperature requires the energy (non-isothermal) formulation");
            }
            let eq = id * n_eq + dof.index();
            flags[eq] = true;
            pairs.push((eq, *value));
        }
        Ok((flags, pairs))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
