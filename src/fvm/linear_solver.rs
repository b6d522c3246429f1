use crate::StrError;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CscMatrix;

/// Defines the interface of linear solvers for the Newton correction
pub trait LinearSolver {
    /// Solves K mdu = rr
    fn solve(&self, kk: &CscMatrix<f64>, rr: &DVector<f64>) -> Result<DVector<f64>, StrError>;
}

/// Implements a dense LU solver (with partial pivoting)
///
/// Expands the sparse matrix and factorizes it densely. Adequate for the
/// moderate systems targeted here; larger meshes call for a sparse
/// factorization behind the same trait.
pub struct DenseLuSolver;

impl DenseLuSolver {
    /// Allocates a new instance
    pub fn new() -> Self {
        DenseLuSolver {}
    }
}

impl LinearSolver for DenseLuSolver {
    fn solve(&self, kk: &CscMatrix<f64>, rr: &DVector<f64>) -> Result<DVector<f64>, StrError> {
        let n = kk.nrows();
        if kk.ncols() != n || rr.len() != n {
            return Err("linear system dimensions are inconsistent");
        }
        let mut dense = DMatrix::zeros(n, n);
        for (i, j, value) in kk.triplet_iter() {
            dense[(i, j)] += *value;
        }
        let lu = dense.lu();
        match lu.solve(rr) {
            Some(mdu) => Ok(mdu),
            None => Err("linear solver failed: singular Jacobian matrix"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{DenseLuSolver, LinearSolver};
    use crate::base::testing::approx_eq;
    use nalgebra::DVector;
    use nalgebra_sparse::{CooMatrix, CscMatrix};

    #[test]
    fn solve_works() {
        // [2 1; 1 3] x = [3; 5] => x = [4/5; 7/5]
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 0, 2.0);
        coo.push(0, 1, 1.0);
        coo.push(1, 0, 1.0);
        coo.push(1, 1, 3.0);
        let csc = CscMatrix::from(&coo);
        let rr = DVector::from_vec(vec![3.0, 5.0]);
        let mdu = DenseLuSolver::new().solve(&csc, &rr).unwrap();
        approx_eq(mdu[0], 0.8, 1e-14);
        approx_eq(mdu[1], 1.4, 1e-14);
    }

    #[test]
    fn solve_captures_errors() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 0, 1.0);
        coo.push(1, 0, 1.0); // second column is empty: singular
        let csc = CscMatrix::from(&coo);
        let rr = DVector::from_vec(vec![1.0, 1.0]);
        assert_eq!(
            DenseLuSolver::new().solve(&csc, &rr).err(),
            Some("linear solver failed: singular Jacobian matrix")
        );
        let rr3 = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        assert_eq!(
            DenseLuSolver::new().solve(&csc, &rr3).err(),
            Some("linear system dimensions are inconsistent")
        );
    }
}
