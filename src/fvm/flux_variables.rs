use super::{FvElementGeometry, SpatialParams, VolumeVariables};
use crate::base::{Config, AIR, ENERGY, GAS, LIQUID, MAX_N_EQUATION, N_COMPONENTS, N_PHASES, WATER};
use crate::material::FluidSystem;
use nalgebra::Vector2;

/// Computes the harmonic mean of two non-negative coefficients
pub(super) fn harmonic_mean(a: f64, b: f64) -> f64 {
    if a + b > 0.0 {
        2.0 * a * b / (a + b)
    } else {
        0.0
    }
}

/// Holds the fluxes across one interior SCV face
///
/// Fluxes are integrated over the (area-scaled) face normal and are positive
/// when directed from SCV `i` to SCV `j`. Advection is fully upwinded by the
/// sign of the normal Darcy term; diffusion and conduction use face-averaged
/// coefficients with shape-function gradients.
#[derive(Clone, Copy, Debug)]
pub struct FluxVariables {
    /// Local index of the first adjacent SCV
    pub i: usize,

    /// Local index of the second adjacent SCV
    pub j: usize,

    /// Normal Darcy term -K (grad p - rho g) . n per phase (mobility excluded)
    pub kmvp_normal: [f64; N_PHASES],

    /// Local SCV index of the upstream vertex per phase
    pub upstream: [usize; N_PHASES],

    /// Integrated fluxes per equation (water, air, energy)
    pub flux: [f64; MAX_N_EQUATION],
}

impl FluxVariables {
    /// Computes the fluxes across the interior SCV face `face_index` of an element
    pub fn new(
        config: &Config,
        fluids: &dyn FluidSystem,
        spatial: &SpatialParams,
        geom: &FvElementGeometry,
        face_index: usize,
        vv: &[VolumeVariables; 4],
    ) -> Self {
        let face = &geom.scvf[face_index];
        let (i, j) = (face.i, face.j);
        let pos_i = &geom.scv[i].position;
        let pos_j = &geom.scv[j].position;
        let k_face = harmonic_mean(
            spatial.intrinsic_permeability(pos_i),
            spatial.intrinsic_permeability(pos_j),
        );

        let mut kmvp_normal = [0.0; N_PHASES];
        let mut upstream = [i; N_PHASES];
        let mut flux = [0.0; MAX_N_EQUATION];

        // advection: full upwinding by the sign of the normal Darcy term
        for phase in 0..N_PHASES {
            let mut grad_p = Vector2::zeros();
            let mut rho_ip = 0.0;
            for k in 0..4 {
                grad_p += face.grad[k] * vv[k].pressure[phase];
                rho_ip += face.shape[k] * vv[k].density[phase];
            }
            let kmvp = -k_face * (grad_p - config.gravity * rho_ip).dot(&face.normal);
            let up = if kmvp >= 0.0 { i } else { j };
            kmvp_normal[phase] = kmvp;
            upstream[phase] = up;
            let advected = vv[up].mobility[phase] * kmvp;
            for component in 0..N_COMPONENTS {
                flux[component] += vv[up].molar_density[phase] * vv[up].x[phase][component] * advected;
            }
            if config.energy {
                flux[ENERGY] += vv[up].density[phase] * vv[up].enthalpy[phase] * advected;
            }
        }

        // binary diffusion of the minor components (molar counter-diffusion)
        let mut grad_x_al = Vector2::zeros();
        let mut grad_x_wg = Vector2::zeros();
        let mut n_l_ip = 0.0;
        let mut n_g_ip = 0.0;
        for k in 0..4 {
            grad_x_al += face.grad[k] * vv[k].x[LIQUID][AIR];
            grad_x_wg += face.grad[k] * vv[k].x[GAS][WATER];
            n_l_ip += face.shape[k] * vv[k].molar_density[LIQUID];
            n_g_ip += face.shape[k] * vv[k].molar_density[GAS];
        }
        let d_l = harmonic_mean(vv[i].diffusion[LIQUID], vv[j].diffusion[LIQUID]);
        let d_g = harmonic_mean(vv[i].diffusion[GAS], vv[j].diffusion[GAS]);
        let j_al = -n_l_ip * d_l * grad_x_al.dot(&face.normal);
        let j_wg = -n_g_ip * d_g * grad_x_wg.dot(&face.normal);
        flux[WATER] += -j_al + j_wg;
        flux[AIR] += j_al - j_wg;

        // heat conduction through the fluid-filled porous medium
        if config.energy {
            let mut grad_t = Vector2::zeros();
            for k in 0..4 {
                grad_t += face.grad[k] * vv[k].temperature;
            }
            let ll = fluids.thermal_conductivity(LIQUID);
            let lg = fluids.thermal_conductivity(GAS);
            let lambda_i = spatial.effective_thermal_conductivity(pos_i, vv[i].saturation[LIQUID], ll, lg);
            let lambda_j = spatial.effective_thermal_conductivity(pos_j, vv[j].saturation[LIQUID], ll, lg);
            flux[ENERGY] += -0.5 * (lambda_i + lambda_j) * grad_t.dot(&face.normal);
        }

        FluxVariables {
            i,
            j,
            kmvp_normal,
            upstream,
            flux,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
