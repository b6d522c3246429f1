use serde::{Deserialize, Serialize};

/// Liquid (wetting) phase index
pub const LIQUID: usize = 0;

/// Gas (non-wetting) phase index
pub const GAS: usize = 1;

/// Water component index (also the index of the water mole-balance equation)
pub const WATER: usize = 0;

/// Air component index (also the index of the air mole-balance equation)
pub const AIR: usize = 1;

/// Index of the energy-balance equation (non-isothermal only)
pub const ENERGY: usize = 2;

/// Number of fluid phases
pub const N_PHASES: usize = 2;

/// Number of components
pub const N_COMPONENTS: usize = 2;

/// Maximum number of equations (and primary variables) per vertex
pub const MAX_N_EQUATION: usize = 3;

/// Defines degrees-of-freedom (primary variable slots) at a vertex
///
/// The interpretation of `Switch` depends on the co-located [PhasePresence] tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Dof {
    /// Liquid-phase pressure pl
    Pl,

    /// Switch slot: gas saturation (two phases), dissolved-air mole fraction
    /// (liquid only), or water-vapor mole fraction (gas only)
    Switch,

    /// Temperature (non-isothermal formulation only)
    T,
}

impl Dof {
    /// Returns the slot index of this DOF within the per-vertex tuple
    pub fn index(&self) -> usize {
        match self {
            Dof::Pl => 0,
            Dof::Switch => 1,
            Dof::T => 2,
        }
    }
}

/// Indicates which fluid phases exist at a vertex
///
/// This discriminant governs the physical meaning of the `Switch` primary variable
/// and must always be stored (and rolled back) alongside the solution values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PhasePresence {
    /// Only the liquid phase is present; the switch slot is the mole fraction of air dissolved in liquid
    Liquid,

    /// Only the gas phase is present; the switch slot is the mole fraction of water vapor in gas
    Gas,

    /// Both phases are present; the switch slot is the gas saturation
    BothPhases,
}

/// Defines the finite-difference scheme for the numerical Jacobian
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FdScheme {
    /// Forward differences (one extra residual evaluation per column)
    Forward,

    /// Backward differences (one extra residual evaluation per column)
    Backward,

    /// Central differences (two evaluations per column; default, most accurate)
    Central,
}

/// Defines natural (Neumann-type) boundary conditions on boundary edges
///
/// Flux values are outward-positive, per unit of boundary area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nbc {
    /// Prescribed water molar flux [mol/(m2 s)]
    Qw(f64),

    /// Prescribed air molar flux [mol/(m2 s)]
    Qa(f64),

    /// Prescribed heat flux [W/m2] (non-isothermal formulation only)
    Qe(f64),

    /// Free outflow: advective flux computed from the one-sided Darcy velocity
    Outflow,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
