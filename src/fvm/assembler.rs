use super::{FvBase, FvState, LocalResidual, SpatialParams};
use crate::base::{FdScheme, PhasePresence, MAX_N_EQUATION};
use crate::material::FluidSystem;
use crate::StrError;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Assembles the global residual vector and the numerical Jacobian matrix
///
/// The Jacobian is obtained element-by-element with finite differences of the
/// local residual: each local primary variable is perturbed in turn and the
/// residual re-evaluated, so nonlinearities in the constitutive laws never
/// need hand-written derivatives. With recycling enabled, an element whose
/// local solution moved less than the tolerance since its last linearization
/// reuses the cached local block.
pub struct JacobianAssembler<'a> {
    /// Discretization data
    base: &'a FvBase<'a>,

    /// Element-residual evaluator
    residual: LocalResidual<'a>,

    /// Storage terms at the last accepted time step, per point
    storage_old: Vec<[f64; MAX_N_EQUATION]>,

    /// Cached local Jacobian blocks: (local solution at linearization, block)
    cached: Vec<Option<(Vec<f64>, DMatrix<f64>)>>,

    /// Number of element blocks recycled during the last assembly
    pub n_recycled: usize,
}

impl<'a> JacobianAssembler<'a> {
    /// Allocates a new instance
    pub fn new(base: &'a FvBase<'a>, fluids: &'a dyn FluidSystem, spatial: &'a SpatialParams) -> Self {
        JacobianAssembler {
            base,
            residual: LocalResidual::new(base.config, fluids, spatial),
            storage_old: vec![[0.0; MAX_N_EQUATION]; base.mesh.points.len()],
            cached: vec![None; base.mesh.cells.len()],
            n_recycled: 0,
        }
    }

    /// Recomputes the old storage terms from the last accepted solution
    ///
    /// Must be called once at the beginning of every time step (and after a
    /// rollback) because the old storage is held fixed during the Newton
    /// iterations.
    pub fn update_old_storage(&mut self, state: &FvState) -> Result<(), StrError> {
        let n_eq = self.base.n_eq;
        for point in &self.base.mesh.points {
            let eq0 = point.id * n_eq;
            let u_old = state.uu_old.as_slice();
            self.storage_old[point.id] = self.residual.storage(
                &point.coords,
                &u_old[eq0..eq0 + n_eq],
                state.presence_old[point.id],
            )?;
        }
        Ok(())
    }

    /// Gathers the local solution, presence, and old storage of a cell
    fn gather(
        &self,
        state: &FvState,
        cell_id: usize,
    ) -> ([[f64; MAX_N_EQUATION]; 4], [PhasePresence; 4], [[f64; MAX_N_EQUATION]; 4]) {
        let n_eq = self.base.n_eq;
        let points = &self.base.mesh.cells[cell_id].points;
        let mut u = [[0.0; MAX_N_EQUATION]; 4];
        let mut presence = [PhasePresence::BothPhases; 4];
        let mut storage_old = [[0.0; MAX_N_EQUATION]; 4];
        for k in 0..4 {
            let p = points[k];
            for d in 0..n_eq {
                u[k][d] = state.uu[p * n_eq + d];
            }
            presence[k] = state.presence[p];
            storage_old[k] = self.storage_old[p];
        }
        (u, presence, storage_old)
    }

    /// Computes the local Jacobian block of a cell by finite differences
    fn local_jacobian(
        &self,
        cell_id: usize,
        t_new: f64,
        dt: f64,
        u: &[[f64; MAX_N_EQUATION]; 4],
        presence: &[PhasePresence; 4],
        storage_old: &[[f64; MAX_N_EQUATION]; 4],
        res0: &[[f64; MAX_N_EQUATION]; 4],
    ) -> Result<DMatrix<f64>, StrError> {
        let n_eq = self.base.n_eq;
        let n_local = 4 * n_eq;
        let geom = &self.base.geoms[cell_id];
        let mut kk = DMatrix::zeros(n_local, n_local);
        let mut res_p = [[0.0; MAX_N_EQUATION]; 4];
        let mut res_m = [[0.0; MAX_N_EQUATION]; 4];
        for m in 0..4 {
            for d in 0..n_eq {
                let col = m * n_eq + d;
                let u_val = u[m][d];
                let eps = match self.base.config.fd_scheme {
                    FdScheme::Central => 1e-6 * (1.0 + f64::abs(u_val)),
                    _ => 1e-8 * (1.0 + f64::abs(u_val)),
                };
                let mut u_pert = *u;
                match self.base.config.fd_scheme {
                    FdScheme::Central => {
                        u_pert[m][d] = u_val + eps;
                        self.residual
                            .eval(geom, &self.base.nbc_map, t_new, dt, &u_pert, presence, storage_old, &mut res_p)?;
                        u_pert[m][d] = u_val - eps;
                        self.residual
                            .eval(geom, &self.base.nbc_map, t_new, dt, &u_pert, presence, storage_old, &mut res_m)?;
                        for k in 0..4 {
                            for eq in 0..n_eq {
                                kk[(k * n_eq + eq, col)] = (res_p[k][eq] - res_m[k][eq]) / (2.0 * eps);
                            }
                        }
                    }
                    FdScheme::Forward => {
                        u_pert[m][d] = u_val + eps;
                        self.residual
                            .eval(geom, &self.base.nbc_map, t_new, dt, &u_pert, presence, storage_old, &mut res_p)?;
                        for k in 0..4 {
                            for eq in 0..n_eq {
                                kk[(k * n_eq + eq, col)] = (res_p[k][eq] - res0[k][eq]) / eps;
                            }
                        }
                    }
                    FdScheme::Backward => {
                        u_pert[m][d] = u_val - eps;
                        self.residual
                            .eval(geom, &self.base.nbc_map, t_new, dt, &u_pert, presence, storage_old, &mut res_m)?;
                        for k in 0..4 {
                            for eq in 0..n_eq {
                                kk[(k * n_eq + eq, col)] = (res0[k][eq] - res_m[k][eq]) / eps;
                            }
                        }
                    }
                }
            }
        }
        Ok(kk)
    }

    /// Assembles the global residual and Jacobian at the current iterate
    pub fn assemble(&mut self, state: &FvState, t_new: f64, rr: &mut DVector<f64>) -> Result<CscMatrix<f64>, StrError> {
        let n_eq = self.base.n_eq;
        if rr.len() != self.base.neq_total {
            return Err("residual vector has the wrong dimension");
        }
        if state.dt <= 0.0 {
            return Err("time-step size must be positive");
        }
        rr.fill(0.0);
        let mut coo = CooMatrix::new(self.base.neq_total, self.base.neq_total);
        self.n_recycled = 0;

        for cell_id in 0..self.base.mesh.cells.len() {
            let (u, presence, storage_old) = self.gather(state, cell_id);
            let geom = &self.base.geoms[cell_id];
            let points = &self.base.mesh.cells[cell_id].points;

            // residual
            let mut res0 = [[0.0; MAX_N_EQUATION]; 4];
            self.residual
                .eval(geom, &self.base.nbc_map, t_new, state.dt, &u, &presence, &storage_old, &mut res0)?;
            for k in 0..4 {
                for eq in 0..n_eq {
                    let row = points[k] * n_eq + eq;
                    if !self.base.prescribed[row] {
                        rr[row] += res0[k][eq];
                    }
                }
            }

            // Jacobian block: recycle or recompute
            let u_flat: Vec<f64> = (0..4).flat_map(|k| u[k][..n_eq].to_vec()).collect();
            let recycle = match (self.base.config.recycle_tolerance, &self.cached[cell_id]) {
                (Some(tol), Some((u_cached, _))) => u_flat
                    .iter()
                    .zip(u_cached.iter())
                    .all(|(a, b)| f64::abs(a - b) <= tol * (1.0 + f64::abs(*b))),
                _ => false,
            };
            if recycle {
                self.n_recycled += 1;
            } else {
                let kk = self.local_jacobian(cell_id, t_new, state.dt, &u, &presence, &storage_old, &res0)?;
                self.cached[cell_id] = Some((u_flat, kk));
            }
            let kk = match &self.cached[cell_id] {
                Some((_, kk)) => kk,
                None => return Err("cached Jacobian block is missing"),
            };

            // scatter
            for k in 0..4 {
                for eq in 0..n_eq {
                    let row = points[k] * n_eq + eq;
                    if self.base.prescribed[row] {
                        continue;
                    }
                    for m in 0..4 {
                        for d in 0..n_eq {
                            let col = points[m] * n_eq + d;
                            coo.push(row, col, kk[(k * n_eq + eq, m * n_eq + d)]);
                        }
                    }
                }
            }
        }

        // prescribed equations: identity rows driving u to the prescribed value
        for (eq, value) in &self.base.prescribed_values {
            coo.push(*eq, *eq, 1.0);
            rr[*eq] = state.uu[*eq] - value;
        }
        Ok(CscMatrix::from(&coo))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
