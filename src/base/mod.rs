//! Implements basic structures: configuration, enums, mesh input, and boundary conditions

mod config;
mod enums;
mod essential;
mod mesh;
mod natural;
mod sample_meshes;
pub mod testing;
pub use crate::base::config::*;
pub use crate::base::enums::*;
pub use crate::base::essential::*;
pub use crate::base::mesh::*;
pub use crate::base::natural::*;
pub use crate::base::sample_meshes::*;
