//! Implements the vertex-centered (box) finite-volume discretization and solvers

mod assembler;
mod boundary_variables;
mod flux_variables;
mod fv_base;
mod geometry;
mod linear_solver;
mod local_residual;
mod newton;
mod phase_switch;
mod spatial_params;
mod state;
mod volume_variables;
pub use crate::fvm::assembler::*;
pub use crate::fvm::boundary_variables::*;
pub use crate::fvm::flux_variables::*;
pub use crate::fvm::fv_base::*;
pub use crate::fvm::geometry::*;
pub use crate::fvm::linear_solver::*;
pub use crate::fvm::local_residual::*;
pub use crate::fvm::newton::*;
pub use crate::fvm::phase_switch::*;
pub use crate::fvm::spatial_params::*;
pub use crate::fvm::state::*;
pub use crate::fvm::volume_variables::*;
