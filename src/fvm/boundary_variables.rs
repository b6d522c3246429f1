use super::{FvElementGeometry, SpatialParams, VolumeVariables};
use crate::base::{Config, Nbc, AIR, ENERGY, MAX_N_EQUATION, N_COMPONENTS, N_PHASES, WATER};
use crate::StrError;
use nalgebra::Vector2;

/// Holds the boundary fluxes at one boundary face
///
/// Fluxes are integrated over the face area and are outward-positive: a
/// positive value removes mass (or heat) from the adjacent SCV. Prescribed
/// fluxes apply the given rate directly; free outflow evaluates the one-sided
/// advective flux with the interior (vertex) state.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryVariables {
    /// Local SCV index adjacent to the boundary face
    pub scv: usize,

    /// Integrated outward fluxes per equation (water, air, energy)
    pub flux: [f64; MAX_N_EQUATION],
}

impl BoundaryVariables {
    /// Computes the boundary fluxes at the boundary face `bf_index` of an element
    pub fn new(
        config: &Config,
        spatial: &SpatialParams,
        geom: &FvElementGeometry,
        bf_index: usize,
        vv: &[VolumeVariables; 4],
        nbc: Nbc,
    ) -> Result<Self, StrError> {
        let bf = &geom.boundary_faces[bf_index];
        let scv = bf.scv;
        let mut flux = [0.0; MAX_N_EQUATION];
        match nbc {
            Nbc::Qw(q) => flux[WATER] = q * bf.area,
            Nbc::Qa(q) => flux[AIR] = q * bf.area,
            Nbc::Qe(q) => {
                if !config.energy {
                    return Err("heat boundary condition requires the energy (non-isothermal) formulation");
                }
                flux[ENERGY] = q * bf.area;
            }
            Nbc::Outflow => {
                // one-sided Darcy flux with the boundary vertex's state
                let k = spatial.intrinsic_permeability(&geom.scv[scv].position);
                for phase in 0..N_PHASES {
                    let mut grad_p = Vector2::zeros();
                    let mut rho_ip = 0.0;
                    for m in 0..4 {
                        grad_p += bf.grad[m] * vv[m].pressure[phase];
                        rho_ip += bf.shape[m] * vv[m].density[phase];
                    }
                    let kmvp = -k * (grad_p - config.gravity * rho_ip).dot(&bf.normal);
                    let advected = vv[scv].mobility[phase] * kmvp;
                    for component in 0..N_COMPONENTS {
                        flux[component] += vv[scv].molar_density[phase] * vv[scv].x[phase][component] * advected;
                    }
                    if config.energy {
                        flux[ENERGY] += vv[scv].density[phase] * vv[scv].enthalpy[phase] * advected;
                    }
                }
            }
        }
        Ok(BoundaryVariables { scv, flux })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
