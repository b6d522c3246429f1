//! PmFlow - vertex-centered finite-volume simulator for multiphase flow in porous media
//!
//! This crate discretizes two-phase (liquid/gas), two-component (water/air), optionally
//! non-isothermal flow through porous media with the box method: a vertex-centered
//! finite-volume scheme on quadrilateral meshes. The nonlinear system is linearized by
//! numerical differentiation and solved with a Newton iteration whose controller also
//! adapts the time-step size.
//!
//! The main components are:
//!
//! * [fvm::SpatialParams] -- position-to-zone lookup of permeability, porosity, and material-law parameters
//! * [fvm::VolumeVariables] -- secondary quantities per sub-control volume (densities, mobilities, mole fractions)
//! * [fvm::FluxVariables] and [fvm::BoundaryVariables] -- per-face gradients and Darcy/diffusive/conductive fluxes
//! * [fvm::LocalResidual] -- element-local conservation residuals (storage + flux + source)
//! * [fvm::JacobianAssembler] -- finite-difference linearization into a global sparse matrix
//! * [fvm::NewtonController] -- the iterate-correct-check loop with retry and time-step adaptation

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fvm;
pub mod material;
pub mod prelude;
