use super::{BoundaryVariables, FluxVariables, FvElementGeometry, SpatialParams, VolumeVariables};
use crate::base::{Config, Nbc, PhasePresence, ENERGY, MAX_N_EQUATION, N_COMPONENTS};
use crate::material::FluidSystem;
use crate::StrError;
use nalgebra::Vector2;
use std::collections::HashMap;

/// Evaluates the element-local residual of the balance equations
///
/// For each vertex-attached SCV of the element, the residual collects the
/// implicit-Euler storage change, the fluxes over the interior SCV faces
/// (added to the upstream side and subtracted from the downstream side, so
/// interior fluxes cancel in the global sum), the volumetric source, and the
/// natural boundary fluxes.
pub struct LocalResidual<'a> {
    /// Configuration (formulation, gravity, source term)
    pub config: &'a Config,

    /// Fluid-property oracle
    pub fluids: &'a dyn FluidSystem,

    /// Spatial material parameters
    pub spatial: &'a SpatialParams,
}

impl<'a> LocalResidual<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, fluids: &'a dyn FluidSystem, spatial: &'a SpatialParams) -> Self {
        LocalResidual {
            config,
            fluids,
            spatial,
        }
    }

    /// Computes the storage terms (per equation) at a vertex position
    pub fn storage(
        &self,
        position: &Vector2<f64>,
        u: &[f64],
        presence: PhasePresence,
    ) -> Result<[f64; MAX_N_EQUATION], StrError> {
        let vv = VolumeVariables::new(self.config, self.fluids, self.spatial, position, u, presence)?;
        let mut s = [0.0; MAX_N_EQUATION];
        for component in 0..N_COMPONENTS {
            s[component] = vv.storage(component);
        }
        if self.config.energy {
            s[ENERGY] = vv.storage_energy(self.spatial.heat_capacity_solid(position));
        }
        Ok(s)
    }

    /// Evaluates the element residual
    ///
    /// * `u` -- current local primary variables, one row per local vertex
    /// * `presence` -- current phase presence at the local vertices
    /// * `storage_old` -- storage terms at the last accepted time step
    /// * `res` -- output residual, one row per local vertex
    #[allow(clippy::too_many_arguments)]
    pub fn eval(
        &self,
        geom: &FvElementGeometry,
        nbc_map: &HashMap<(usize, usize), Nbc>,
        t_new: f64,
        dt: f64,
        u: &[[f64; MAX_N_EQUATION]; 4],
        presence: &[PhasePresence; 4],
        storage_old: &[[f64; MAX_N_EQUATION]; 4],
        res: &mut [[f64; MAX_N_EQUATION]; 4],
    ) -> Result<(), StrError> {
        let n_eq = self.config.n_equations();

        // secondary variables at the four vertices
        let mut vv_vec = Vec::with_capacity(4);
        for k in 0..4 {
            vv_vec.push(VolumeVariables::new(
                self.config,
                self.fluids,
                self.spatial,
                &geom.scv[k].position,
                &u[k][..n_eq],
                presence[k],
            )?);
        }
        let vv: [VolumeVariables; 4] = [vv_vec[0], vv_vec[1], vv_vec[2], vv_vec[3]];

        // storage change (implicit Euler) and source
        for k in 0..4 {
            let position = &geom.scv[k].position;
            let volume = geom.scv[k].volume;
            let s_new = self.storage(position, &u[k][..n_eq], presence[k])?;
            let src = match self.config.source {
                Some(f) => f(position, t_new),
                None => [0.0; MAX_N_EQUATION],
            };
            for eq in 0..n_eq {
                res[k][eq] = volume * ((s_new[eq] - storage_old[k][eq]) / dt - src[eq]);
            }
            for eq in n_eq..MAX_N_EQUATION {
                res[k][eq] = 0.0;
            }
        }

        // interior SCV faces
        for face_index in 0..geom.scvf.len() {
            let fv = FluxVariables::new(self.config, self.fluids, self.spatial, geom, face_index, &vv);
            for eq in 0..n_eq {
                res[fv.i][eq] += fv.flux[eq];
                res[fv.j][eq] -= fv.flux[eq];
            }
        }

        // natural boundary conditions
        for bf_index in 0..geom.boundary_faces.len() {
            let edge = geom.boundary_faces[bf_index].edge;
            if let Some(nbc) = nbc_map.get(&edge) {
                let bv = BoundaryVariables::new(self.config, self.spatial, geom, bf_index, &vv, *nbc)?;
                for eq in 0..n_eq {
                    res[bv.scv][eq] += bv.flux[eq];
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LocalResidual;
    use crate::base::testing::approx_eq;
    use crate::base::{Config, Nbc, PhasePresence, SampleMeshes, MAX_N_EQUATION, WATER};
    use crate::fvm::{FvElementGeometry, SpatialParams};
    use crate::material::ConstantFluids;
    use std::collections::HashMap;

    fn eval_residual(
        pl: [f64; 4],
        nbc_map: &HashMap<(usize, usize), Nbc>,
        config: &Config,
    ) -> [[f64; MAX_N_EQUATION]; 4] {
        let fluids = ConstantFluids::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let mesh = SampleMeshes::one_qua4();
        let boundary = mesh.boundary_edges();
        let geom = FvElementGeometry::new(&mesh, &mesh.cells[0], &boundary).unwrap();
        let lr = LocalResidual::new(config, &fluids, &spatial);

        let mut u = [[0.0; MAX_N_EQUATION]; 4];
        for k in 0..4 {
            u[k][0] = pl[k];
            u[k][1] = 0.0; // fully liquid-saturated
        }
        let presence = [PhasePresence::BothPhases; 4];

        // old storage equals the current storage: no transient contribution
        let mut storage_old = [[0.0; MAX_N_EQUATION]; 4];
        for k in 0..4 {
            storage_old[k] = lr
                .storage(&geom.scv[k].position, &u[k][..config.n_equations()], presence[k])
                .unwrap();
        }

        let mut res = [[0.0; MAX_N_EQUATION]; 4];
        lr.eval(&geom, nbc_map, 1.0, 1.0, &u, &presence, &storage_old, &mut res)
            .unwrap();
        res
    }

    #[test]
    fn uniform_state_has_zero_residual() {
        let config = Config::new();
        let res = eval_residual([3e5; 4], &HashMap::new(), &config);
        for k in 0..4 {
            for eq in 0..2 {
                assert!(res[k][eq].abs() < 1e-12);
            }
        }
    }

    #[test]
    fn interior_fluxes_cancel_in_the_global_sum() {
        // linear pressure: nonzero per-vertex residuals, but the interior
        // fluxes are antisymmetric, so the element sum vanishes
        let config = Config::new();
        let res = eval_residual([2e5, 1e5, 1e5, 2e5], &HashMap::new(), &config);
        assert!(res[0][WATER].abs() > 1e-3); // flow is actually happening
        let sum: f64 = (0..4).map(|k| res[k][WATER]).sum();
        assert!(sum.abs() < 1e-9 * res[0][WATER].abs());
    }

    #[test]
    fn source_term_enters_the_residual() {
        let mut config = Config::new();
        config.set_source(|_, _| [7.0, 0.0, 0.0]);
        let res = eval_residual([3e5; 4], &HashMap::new(), &config);
        for k in 0..4 {
            // SCV volume is 0.25 on the unit square
            approx_eq(res[k][WATER], -0.25 * 7.0, 1e-12);
        }
    }

    #[test]
    fn natural_boundary_flux_enters_the_residual() {
        let config = Config::new();
        let mut nbc_map = HashMap::new();
        nbc_map.insert((0, 1), Nbc::Qw(4.0)); // bottom edge, two faces of area 0.5
        let res = eval_residual([3e5; 4], &nbc_map, &config);
        approx_eq(res[0][WATER], 2.0, 1e-12);
        approx_eq(res[1][WATER], 2.0, 1e-12);
        assert!(res[2][WATER].abs() < 1e-12);
    }
}
