use crate::base::LIQUID;

/// Universal gas constant [J/(mol K)]
pub const GAS_CONSTANT: f64 = 8.314462618;

/// Defines the equilibrium fluid-property oracle
///
/// Given a phase index, the phase pressure, the temperature, and the mole
/// fraction of the phase's minor component (air in liquid, water vapor in gas),
/// implementations return thermodynamic and transport properties. Queries must
/// be cheap for repeated nearby evaluations because the numerical Jacobian
/// probes the oracle many times per element.
pub trait FluidSystem {
    /// Returns the mass density [kg/m3] of a phase
    fn density(&self, phase: usize, p: f64, t: f64, x_minor: f64) -> f64;

    /// Returns the molar density [mol/m3] of a phase
    fn molar_density(&self, phase: usize, p: f64, t: f64, x_minor: f64) -> f64;

    /// Returns the dynamic viscosity [Pa s] of a phase
    fn viscosity(&self, phase: usize, p: f64, t: f64) -> f64;

    /// Returns the specific enthalpy [J/kg] of a phase
    fn enthalpy(&self, phase: usize, p: f64, t: f64, x_minor: f64) -> f64;

    /// Returns the binary diffusion coefficient [m2/s] of the minor component in a phase
    fn diffusion_coefficient(&self, phase: usize, p: f64, t: f64) -> f64;

    /// Returns the thermal conductivity [W/(m K)] of a phase
    fn thermal_conductivity(&self, phase: usize) -> f64;

    /// Returns the saturation (vapor) pressure of water [Pa]
    fn vapor_pressure(&self, t: f64) -> f64;

    /// Returns the Henry coefficient of air in water [Pa]
    fn henry_coefficient(&self, t: f64) -> f64;
}

/// Implements a water/air fluid system: slightly compressible liquid water with
/// dissolved air, and an ideal-gas mixture of water vapor and air
pub struct WaterAir;

/// Molar mass of water [kg/mol]
const MOLAR_MASS_WATER: f64 = 18.01528e-3;

/// Molar mass of air [kg/mol]
const MOLAR_MASS_AIR: f64 = 28.966e-3;

impl WaterAir {
    /// Allocates a new instance
    pub fn new() -> Self {
        WaterAir {}
    }
}

impl FluidSystem for WaterAir {
    fn density(&self, phase: usize, p: f64, t: f64, x_minor: f64) -> f64 {
        if phase == LIQUID {
            // slightly compressible liquid water; dissolved air neglected in the density
            1000.0 * (1.0 + 4.5e-10 * (p - 1e5))
        } else {
            // ideal-gas mixture of water vapor and air
            let x_wg = x_minor;
            let mm = x_wg * MOLAR_MASS_WATER + (1.0 - x_wg) * MOLAR_MASS_AIR;
            self.molar_density(phase, p, t, x_minor) * mm
        }
    }

    fn molar_density(&self, phase: usize, p: f64, t: f64, x_minor: f64) -> f64 {
        if phase == LIQUID {
            self.density(phase, p, t, x_minor) / MOLAR_MASS_WATER
        } else {
            p / (GAS_CONSTANT * t)
        }
    }

    fn viscosity(&self, phase: usize, _p: f64, _t: f64) -> f64 {
        if phase == LIQUID {
            1.0e-3
        } else {
            1.8e-5
        }
    }

    fn enthalpy(&self, phase: usize, _p: f64, t: f64, x_minor: f64) -> f64 {
        let tc = t - 273.15;
        if phase == LIQUID {
            4180.0 * tc
        } else {
            // vapor mass fraction carries the latent heat of evaporation
            let x_wg = x_minor;
            let mm = x_wg * MOLAR_MASS_WATER + (1.0 - x_wg) * MOLAR_MASS_AIR;
            let w_wg = x_wg * MOLAR_MASS_WATER / mm;
            1005.0 * tc + w_wg * (2.45e6 + 1900.0 * tc)
        }
    }

    fn diffusion_coefficient(&self, phase: usize, _p: f64, _t: f64) -> f64 {
        if phase == LIQUID {
            2.0e-9
        } else {
            2.6e-5
        }
    }

    fn thermal_conductivity(&self, phase: usize) -> f64 {
        if phase == LIQUID {
            0.608
        } else {
            0.025
        }
    }

    fn vapor_pressure(&self, t: f64) -> f64 {
        // Magnus formula
        let tc = t - 273.15;
        611.2 * f64::exp(17.62 * tc / (243.12 + tc))
    }

    fn henry_coefficient(&self, _t: f64) -> f64 {
        6.6e9
    }
}

/// Implements a fluid system with constant properties (verification problems)
///
/// The vapor pressure is zero and the Henry coefficient is huge, so the
/// equilibrium mole fractions of the minor components vanish.
pub struct ConstantFluids {
    /// Mass densities [liquid, gas]
    pub rho: [f64; 2],

    /// Molar densities [liquid, gas]
    pub molar_rho: [f64; 2],

    /// Viscosities [liquid, gas]
    pub mu: [f64; 2],

    /// Binary diffusion coefficients [liquid, gas]
    pub dd: [f64; 2],

    /// Thermal conductivities [liquid, gas]
    pub lambda: [f64; 2],

    /// Specific heat capacities [liquid, gas]
    pub cp: [f64; 2],
}

impl ConstantFluids {
    /// Allocates a new instance with water/air-like constants
    pub fn new() -> Self {
        ConstantFluids {
            rho: [1000.0, 1.2],
            molar_rho: [55508.0, 41.6],
            mu: [1.0e-3, 1.8e-5],
            dd: [2.0e-9, 2.6e-5],
            lambda: [0.6, 0.025],
            cp: [4180.0, 1005.0],
        }
    }
}

impl FluidSystem for ConstantFluids {
    fn density(&self, phase: usize, _p: f64, _t: f64, _x_minor: f64) -> f64 {
        self.rho[phase]
    }

    fn molar_density(&self, phase: usize, _p: f64, _t: f64, _x_minor: f64) -> f64 {
        self.molar_rho[phase]
    }

    fn viscosity(&self, phase: usize, _p: f64, _t: f64) -> f64 {
        self.mu[phase]
    }

    fn enthalpy(&self, phase: usize, _p: f64, t: f64, _x_minor: f64) -> f64 {
        self.cp[phase] * (t - 273.15)
    }

    fn diffusion_coefficient(&self, phase: usize, _p: f64, _t: f64) -> f64 {
        self.dd[phase]
    }

    fn thermal_conductivity(&self, phase: usize) -> f64 {
        self.lambda[phase]
    }

    fn vapor_pressure(&self, _t: f64) -> f64 {
        0.0
    }

    fn henry_coefficient(&self, _t: f64) -> f64 {
        1.0e20
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
