//! Makes the most frequently used structures available

pub use crate::base::{
    Cell, Config, Dof, Essential, FdScheme, Mesh, Natural, Nbc, PhasePresence, Point, SampleMeshes, AIR, ENERGY, GAS,
    LIQUID, WATER,
};
pub use crate::fvm::{
    DenseLuSolver, FvBase, FvState, JacobianAssembler, LinearSolver, NewtonController, PhaseSwitch, SpatialParams,
    Stats, ZoneParams,
};
pub use crate::material::{ConstantFluids, FluidSystem, ParamRetention, WaterAir};
pub use crate::StrError;
