use super::SpatialParams;
use crate::base::{Config, PhasePresence, GAS, LIQUID, N_PHASES};
use crate::material::FluidSystem;
use crate::StrError;
use nalgebra::Vector2;

/// Holds the secondary (constitutive) variables at one vertex
///
/// All quantities derive from the primary variables, the phase-presence tag,
/// and the material parameters at the vertex position. Mole fractions of absent
/// phases hold the would-be equilibrium values; the phase-appearance tests are
/// formulated with them.
#[derive(Clone, Copy, Debug)]
pub struct VolumeVariables {
    /// Phase pressures [liquid, gas]
    pub pressure: [f64; 2],

    /// Phase saturations [liquid, gas]
    pub saturation: [f64; 2],

    /// Mole fractions x[phase][component]
    pub x: [[f64; 2]; 2],

    /// Phase mass densities [liquid, gas]
    pub density: [f64; 2],

    /// Phase molar densities [liquid, gas]
    pub molar_density: [f64; 2],

    /// Phase mobilities kr/mu [liquid, gas]
    pub mobility: [f64; 2],

    /// Effective porous-medium diffusivities [liquid, gas]
    pub diffusion: [f64; 2],

    /// Phase specific enthalpies [liquid, gas]
    pub enthalpy: [f64; 2],

    /// Phase specific internal energies [liquid, gas]
    pub internal_energy: [f64; 2],

    /// Temperature
    pub temperature: f64,

    /// Porosity at the vertex position
    pub porosity: f64,
}

/// Computes the effective porous-medium diffusivity (Millington-Quirk tortuosity)
fn effective_diffusivity(porosity: f64, saturation: f64, dd: f64) -> f64 {
    if saturation <= 0.0 {
        return 0.0;
    }
    let tau = f64::powf(porosity * saturation, 7.0 / 3.0) / (porosity * porosity);
    porosity * saturation * tau * dd
}

impl VolumeVariables {
    /// Computes the secondary variables from the primary variables at a vertex
    ///
    /// `u` is the per-vertex tuple (pl, switch, and temperature when the energy
    /// formulation is enabled).
    pub fn new(
        config: &Config,
        fluids: &dyn FluidSystem,
        spatial: &SpatialParams,
        position: &Vector2<f64>,
        u: &[f64],
        presence: PhasePresence,
    ) -> Result<Self, StrError> {
        let pl = u[0];
        let switch = u[1];
        let t = if config.energy { u[2] } else { config.temperature };
        if !pl.is_finite() || !switch.is_finite() || !t.is_finite() {
            return Err("primary variables are not finite");
        }
        if t <= 0.0 {
            return Err("temperature is not positive");
        }

        let retention = spatial.material_law_params_at(position);
        let porosity = spatial.porosity(position);

        // saturations and phase pressures
        let (sl, sg) = match presence {
            PhasePresence::Liquid => (1.0, 0.0),
            PhasePresence::Gas => (0.0, 1.0),
            PhasePresence::BothPhases => (1.0 - switch, switch),
        };
        let pc = retention.capillary_pressure(sl);
        let pg = pl + pc;
        if pg <= 0.0 {
            return Err("gas pressure is not positive");
        }

        // equilibrium mole fractions; absent phases get would-be values
        let p_sat = fluids.vapor_pressure(t);
        let henry = fluids.henry_coefficient(t);
        let (x_wl, x_al, x_wg, x_ag) = match presence {
            PhasePresence::BothPhases => {
                let x_wg = p_sat / pg;
                let x_ag = 1.0 - x_wg;
                let x_al = x_ag * pg / henry;
                (1.0 - x_al, x_al, x_wg, x_ag)
            }
            PhasePresence::Liquid => {
                let x_al = switch;
                let x_wl = 1.0 - x_al;
                let x_wg = x_wl * p_sat / pg;
                let x_ag = x_al * henry / pg;
                (x_wl, x_al, x_wg, x_ag)
            }
            PhasePresence::Gas => {
                let x_wg = switch;
                let x_ag = 1.0 - x_wg;
                let x_wl = if p_sat > 0.0 { x_wg * pg / p_sat } else { 0.0 };
                let x_al = x_ag * pg / henry;
                (x_wl, x_al, x_wg, x_ag)
            }
        };

        // phase properties
        let rho_l = fluids.density(LIQUID, pl, t, x_al);
        let rho_g = fluids.density(GAS, pg, t, x_wg);
        let n_l = fluids.molar_density(LIQUID, pl, t, x_al);
        let n_g = fluids.molar_density(GAS, pg, t, x_wg);
        let mu_l = fluids.viscosity(LIQUID, pl, t);
        let mu_g = fluids.viscosity(GAS, pg, t);
        let h_l = fluids.enthalpy(LIQUID, pl, t, x_al);
        let h_g = fluids.enthalpy(GAS, pg, t, x_wg);
        let kr_l = retention.relative_permeability_liquid(sl);
        let kr_g = retention.relative_permeability_gas(sl);

        Ok(VolumeVariables {
            pressure: [pl, pg],
            saturation: [sl, sg],
            x: [[x_wl, x_al], [x_wg, x_ag]],
            density: [rho_l, rho_g],
            molar_density: [n_l, n_g],
            mobility: [kr_l / mu_l, kr_g / mu_g],
            diffusion: [
                effective_diffusivity(porosity, sl, fluids.diffusion_coefficient(LIQUID, pl, t)),
                effective_diffusivity(porosity, sg, fluids.diffusion_coefficient(GAS, pg, t)),
            ],
            enthalpy: [h_l, h_g],
            internal_energy: [h_l - pl / rho_l, h_g - pg / rho_g],
            temperature: t,
            porosity,
        })
    }

    /// Returns the molar storage density of a component [mol/m3 of pore+solid volume]
    ///
    /// `phi sum_alpha n_alpha x_alpha_kappa S_alpha`
    pub fn storage(&self, component: usize) -> f64 {
        let mut sum = 0.0;
        for phase in 0..N_PHASES {
            sum += self.molar_density[phase] * self.x[phase][component] * self.saturation[phase];
        }
        self.porosity * sum
    }

    /// Returns the thermal storage density [J/m3] of the fluid-filled pore space
    /// plus the solid matrix
    pub fn storage_energy(&self, rho_cp_solid: f64) -> f64 {
        let mut fluid = 0.0;
        for phase in 0..N_PHASES {
            fluid += self.density[phase] * self.internal_energy[phase] * self.saturation[phase];
        }
        self.porosity * fluid + (1.0 - self.porosity) * rho_cp_solid * self.temperature
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{effective_diffusivity, VolumeVariables};
    use crate::base::testing::{approx_eq, rel_approx_eq};
    use crate::base::{Config, PhasePresence, AIR, GAS, LIQUID, WATER};
    use crate::fvm::SpatialParams;
    use crate::material::{ConstantFluids, FluidSystem, WaterAir};
    use nalgebra::Vector2;

    #[test]
    fn both_phases_works() {
        let config = Config::new();
        let fluids = WaterAir::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let pos = Vector2::new(0.0, 0.0);
        let u = [1e5, 0.4]; // pl, sg
        let vv = VolumeVariables::new(&config, &fluids, &spatial, &pos, &u, PhasePresence::BothPhases).unwrap();

        // zero-pc linear retention: pg = pl
        assert_eq!(vv.pressure[GAS], 1e5);
        assert_eq!(vv.saturation[LIQUID], 0.6);
        assert_eq!(vv.saturation[GAS], 0.4);

        // equilibrium vapor mole fraction: p_sat / pg
        let p_sat = fluids.vapor_pressure(293.15);
        approx_eq(vv.x[GAS][WATER], p_sat / 1e5, 1e-15);
        approx_eq(vv.x[GAS][WATER] + vv.x[GAS][AIR], 1.0, 1e-15);
        approx_eq(vv.x[LIQUID][WATER] + vv.x[LIQUID][AIR], 1.0, 1e-15);
        assert!(vv.x[LIQUID][AIR] > 0.0 && vv.x[LIQUID][AIR] < 1e-4);

        // mobilities follow the relative permeabilities
        assert!(vv.mobility[LIQUID] > 0.0 && vv.mobility[GAS] > 0.0);

        // storage is positive for both components
        assert!(vv.storage(WATER) > 0.0);
        assert!(vv.storage(AIR) > 0.0);
    }

    #[test]
    fn single_phase_liquid_works() {
        let config = Config::new();
        let fluids = ConstantFluids::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let pos = Vector2::new(0.0, 0.0);
        let u = [2e5, 1e-6]; // pl, x_al
        let vv = VolumeVariables::new(&config, &fluids, &spatial, &pos, &u, PhasePresence::Liquid).unwrap();

        assert_eq!(vv.saturation[LIQUID], 1.0);
        assert_eq!(vv.saturation[GAS], 0.0);
        approx_eq(vv.x[LIQUID][AIR], 1e-6, 1e-20);
        approx_eq(vv.x[LIQUID][WATER], 1.0 - 1e-6, 1e-15);

        // no gas: the gas storage contribution vanishes
        rel_approx_eq(vv.storage(WATER), 0.3 * 55508.0 * (1.0 - 1e-6), 1e-12);
        assert_eq!(vv.diffusion[GAS], 0.0);
    }

    #[test]
    fn single_phase_gas_works() {
        let config = Config::new();
        let fluids = ConstantFluids::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let pos = Vector2::new(0.0, 0.0);
        let u = [1e5, 0.2]; // pl, x_wg
        let vv = VolumeVariables::new(&config, &fluids, &spatial, &pos, &u, PhasePresence::Gas).unwrap();

        assert_eq!(vv.saturation[LIQUID], 0.0);
        assert_eq!(vv.saturation[GAS], 1.0);
        approx_eq(vv.x[GAS][WATER], 0.2, 1e-15);

        // the absent liquid phase can neither flow nor diffuse
        assert_eq!(vv.mobility[LIQUID], 0.0);
        assert_eq!(vv.diffusion[LIQUID], 0.0);
        assert!(vv.mobility[GAS] > 0.0);

        // all stored water sits in the gas phase
        rel_approx_eq(vv.storage(WATER), 0.3 * 41.6 * 0.2, 1e-12);
    }

    #[test]
    fn energy_formulation_works() {
        let mut config = Config::new();
        config.set_energy(true);
        let fluids = WaterAir::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let pos = Vector2::new(0.0, 0.0);
        let u = [1e5, 0.5, 323.15];
        let vv = VolumeVariables::new(&config, &fluids, &spatial, &pos, &u, PhasePresence::BothPhases).unwrap();
        assert_eq!(vv.temperature, 323.15);
        assert!(vv.enthalpy[LIQUID] > 0.0);
        assert!(vv.internal_energy[GAS] < vv.enthalpy[GAS]);
        let rho_cp_solid = 2700.0 * 790.0;
        assert!(vv.storage_energy(rho_cp_solid) > 0.0);
    }

    #[test]
    fn new_captures_errors() {
        let config = Config::new();
        let fluids = ConstantFluids::new();
        let spatial = SpatialParams::new(SpatialParams::sample_coarse());
        let pos = Vector2::new(0.0, 0.0);
        assert_eq!(
            VolumeVariables::new(&config, &fluids, &spatial, &pos, &[f64::NAN, 0.5], PhasePresence::BothPhases).err(),
            Some("primary variables are not finite")
        );
        assert_eq!(
            VolumeVariables::new(&config, &fluids, &spatial, &pos, &[-1e5, 0.5], PhasePresence::BothPhases).err(),
            Some("gas pressure is not positive")
        );
    }

    #[test]
    fn effective_diffusivity_works() {
        assert_eq!(effective_diffusivity(0.3, 0.0, 2e-9), 0.0);
        assert_eq!(effective_diffusivity(0.3, -0.1, 2e-9), 0.0);
        // phi = S = 1: tau = 1 and the bulk diffusivity is recovered
        approx_eq(effective_diffusivity(1.0, 1.0, 2e-9), 2e-9, 1e-24);
        assert!(effective_diffusivity(0.3, 0.5, 2e-9) < 2e-9);
    }
}
