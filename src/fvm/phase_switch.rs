use super::{FvState, SpatialParams, VolumeVariables};
use crate::base::{Config, Mesh, PhasePresence, AIR, GAS, LIQUID, WATER};
use crate::material::FluidSystem;
use crate::StrError;

/// Saturation given to a phase that has just appeared
const S_APPEAR: f64 = 1e-4;

/// Updates the phase-presence tags from the current iterate
///
/// A phase disappears when its saturation leaves [0, 1]; an absent phase
/// appears when the sum of its would-be equilibrium mole fractions exceeds
/// one. Every switch rewrites the switch primary variable consistently with
/// the new tag. A vertex that has switched `n_max_switches` times within the
/// same time step is locked for the remainder of the step, suppressing
/// presence oscillations.
pub struct PhaseSwitch {
    /// Number of switches per vertex within the current time step
    n_switches: Vec<usize>,

    /// Number of vertices currently locked
    pub n_locked: usize,
}

impl PhaseSwitch {
    /// Allocates a new instance
    pub fn new(n_point: usize) -> Self {
        PhaseSwitch {
            n_switches: vec![0; n_point],
            n_locked: 0,
        }
    }

    /// Resets the per-step switch counters (call at the beginning of a time step)
    pub fn reset(&mut self) {
        self.n_switches.iter_mut().for_each(|n| *n = 0);
        self.n_locked = 0;
    }

    /// Applies the switch criteria at every vertex; returns the number of switches
    pub fn apply(
        &mut self,
        config: &Config,
        fluids: &dyn FluidSystem,
        spatial: &SpatialParams,
        mesh: &Mesh,
        state: &mut FvState,
    ) -> Result<usize, StrError> {
        let n_eq = state.n_eq;
        let mut n_switched = 0;
        self.n_locked = 0;
        for point in &mesh.points {
            let p = point.id;
            if self.n_switches[p] >= config.n_max_switches {
                self.n_locked += 1;
                continue;
            }
            let eq0 = p * n_eq;
            let u: Vec<f64> = (0..n_eq).map(|d| state.uu[eq0 + d]).collect();
            let vv = VolumeVariables::new(config, fluids, spatial, &point.coords, &u, state.presence[p])?;
            let new = match state.presence[p] {
                PhasePresence::BothPhases => {
                    let sg = u[1];
                    if sg < 0.0 {
                        // gas phase disappears; switch to the dissolved-air mole fraction
                        Some((PhasePresence::Liquid, vv.x[LIQUID][AIR]))
                    } else if sg > 1.0 {
                        // liquid phase disappears; switch to the vapor mole fraction
                        Some((PhasePresence::Gas, vv.x[GAS][WATER]))
                    } else {
                        None
                    }
                }
                PhasePresence::Liquid => {
                    // gas appears when the would-be partial pressures exceed pg
                    if vv.x[GAS][WATER] + vv.x[GAS][AIR] > 1.0 {
                        Some((PhasePresence::BothPhases, S_APPEAR))
                    } else {
                        None
                    }
                }
                PhasePresence::Gas => {
                    // liquid appears when the would-be liquid composition exceeds unity
                    if vv.x[LIQUID][WATER] + vv.x[LIQUID][AIR] > 1.0 {
                        Some((PhasePresence::BothPhases, 1.0 - S_APPEAR))
                    } else {
                        None
                    }
                }
            };
            if let Some((presence, switch_value)) = new {
                state.presence[p] = presence;
                state.uu[eq0 + 1] = switch_value;
                self.n_switches[p] += 1;
                n_switched += 1;
            }
        }
        Ok(n_switched)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
