//! Implements material laws and the fluid-property oracle

mod fluid_system;
mod retention;
pub use crate::material::fluid_system::*;
pub use crate::material::retention::*;
