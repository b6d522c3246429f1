use crate::base::PhasePresence;
use crate::StrError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Holds the solution state: primary variables and phase-presence tags
///
/// The primary variables are stored in a flat vector with the equation layout
/// `eq = point_id * n_eq + dof_index`. The accepted values of the previous
/// time step are kept alongside so a diverged step can be rolled back; the
/// presence tags must travel with the values because they define what the
/// switch slot means.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FvState {
    /// Current (pseudo) time
    pub t: f64,

    /// Current time-step size
    pub dt: f64,

    /// Number of equations per vertex
    pub n_eq: usize,

    /// Primary variables (current iterate)
    pub uu: DVector<f64>,

    /// Primary variables at the last accepted time step
    pub uu_old: DVector<f64>,

    /// Phase presence at each vertex (current)
    pub presence: Vec<PhasePresence>,

    /// Phase presence at each vertex (last accepted time step)
    pub presence_old: Vec<PhasePresence>,
}

impl FvState {
    /// Allocates a new instance with all-zero values and both phases present everywhere
    pub fn new(n_point: usize, n_eq: usize) -> Self {
        let n = n_point * n_eq;
        FvState {
            t: 0.0,
            dt: 0.0,
            n_eq,
            uu: DVector::zeros(n),
            uu_old: DVector::zeros(n),
            presence: vec![PhasePresence::BothPhases; n_point],
            presence_old: vec![PhasePresence::BothPhases; n_point],
        }
    }

    /// Accepts the current iterate as the new time-step solution
    pub fn accept_step(&mut self, t_new: f64) {
        self.uu_old.copy_from(&self.uu);
        self.presence_old.copy_from_slice(&self.presence);
        self.t = t_new;
    }

    /// Rolls the current iterate back to the last accepted time-step solution
    pub fn rollback(&mut self) {
        self.uu.copy_from(&self.uu_old);
        self.presence.copy_from_slice(&self.presence_old);
    }

    /// Reads a JSON file containing a state
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(&path).map_err(|_| "cannot open file")?;
        let reader = BufReader::new(file);
        let state = serde_json::from_reader(reader).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with this state
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            std::fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&file, &self).map_err(|_| "cannot write JSON file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
