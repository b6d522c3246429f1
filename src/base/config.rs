use super::FdScheme;
use crate::StrError;
use nalgebra::Vector2;

/// Defines a volumetric source term as a function of position and time
///
/// Returns the source rate per equation (water, air, energy), per unit volume.
pub type FnSource = fn(&Vector2<f64>, f64) -> [f64; 3];

/// Holds configuration parameters for the discretization and the nonlinear solution
pub struct Config {
    /// Enables the energy (non-isothermal) formulation: adds temperature as a
    /// primary variable and an energy-balance equation per vertex
    pub energy: bool,

    /// Constant temperature used by the isothermal formulation
    pub temperature: f64,

    /// Gravity acceleration vector (zero vector disables the gravity term)
    pub gravity: Vector2<f64>,

    /// Finite-difference scheme for the numerical Jacobian
    pub fd_scheme: FdScheme,

    /// Tolerance for Jacobian recycling (partial reassembly); None disables recycling
    ///
    /// An element whose local solution moved less than this tolerance since its
    /// last linearization reuses the cached local Jacobian block. This is a
    /// speed/accuracy tradeoff, not a correctness requirement.
    pub recycle_tolerance: Option<f64>,

    /// Absolute tolerance on the residual max-norm
    pub tol_rr_abs: f64,

    /// Relative tolerance on the corrective-update norm
    pub tol_mdu_rel: f64,

    /// Maximum number of Newton iterations per time step
    pub n_max_iterations: usize,

    /// Target number of Newton iterations for the time-step heuristic
    pub n_target_iterations: usize,

    /// Maximum number of time-step retries (step halving) after divergence
    pub n_max_retries: usize,

    /// Maximum number of phase-presence switches per vertex per time step
    /// before the vertex is locked (oscillation suppression)
    pub n_max_switches: usize,

    /// Damping (relaxation) factor applied to the Newton update, within (0, 1]
    pub relaxation: f64,

    /// Initial time
    pub t_ini: f64,

    /// Final time
    pub t_fin: f64,

    /// Initial time-step size
    pub dt_ini: f64,

    /// Minimum allowed time-step size
    pub dt_min: f64,

    /// Maximum allowed time-step size
    pub dt_max: f64,

    /// Volumetric source term
    pub source: Option<FnSource>,

    /// Prints time stepping messages
    pub verbose_timesteps: bool,

    /// Prints Newton iteration messages
    pub verbose_iterations: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            energy: false,
            temperature: 293.15,
            gravity: Vector2::zeros(),
            fd_scheme: FdScheme::Central,
            recycle_tolerance: None,
            tol_rr_abs: 1e-8,
            tol_mdu_rel: 1e-8,
            n_max_iterations: 10,
            n_target_iterations: 4,
            n_max_retries: 5,
            n_max_switches: 3,
            relaxation: 1.0,
            t_ini: 0.0,
            t_fin: 1.0,
            dt_ini: 0.1,
            dt_min: 1e-10,
            dt_max: 0.1,
            source: None,
            verbose_timesteps: false,
            verbose_iterations: false,
        }
    }

    /// Returns the number of equations (and primary variables) per vertex
    pub fn n_equations(&self) -> usize {
        if self.energy {
            3
        } else {
            2
        }
    }

    /// Enables or disables the energy (non-isothermal) formulation
    pub fn set_energy(&mut self, flag: bool) -> &mut Self {
        self.energy = flag;
        self
    }

    /// Sets the constant temperature of the isothermal formulation
    pub fn set_temperature(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("temperature must be > 0.0");
        }
        self.temperature = value;
        Ok(self)
    }

    /// Sets a downward gravity acceleration of the given magnitude
    pub fn set_gravity(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 {
            return Err("gravity must be ≥ 0.0");
        }
        self.gravity = Vector2::new(0.0, -value);
        Ok(self)
    }

    /// Sets the finite-difference scheme for the numerical Jacobian
    pub fn set_fd_scheme(&mut self, scheme: FdScheme) -> &mut Self {
        self.fd_scheme = scheme;
        self
    }

    /// Enables Jacobian recycling with the given local-solution-change tolerance
    pub fn set_recycle_tolerance(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("recycle tolerance must be > 0.0");
        }
        self.recycle_tolerance = Some(value);
        Ok(self)
    }

    /// Sets the convergence tolerances (residual max-norm and relative update norm)
    pub fn set_tolerances(&mut self, tol_rr_abs: f64, tol_mdu_rel: f64) -> Result<&mut Self, StrError> {
        if tol_rr_abs <= 0.0 || tol_mdu_rel <= 0.0 {
            return Err("tolerances must be > 0.0");
        }
        self.tol_rr_abs = tol_rr_abs;
        self.tol_mdu_rel = tol_mdu_rel;
        Ok(self)
    }

    /// Sets the damping (relaxation) factor within (0, 1]
    pub fn set_relaxation(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 || value > 1.0 {
            return Err("relaxation factor must be within (0, 1]");
        }
        self.relaxation = value;
        Ok(self)
    }

    /// Sets the maximum number of Newton iterations per time step
    pub fn set_n_max_iterations(&mut self, value: usize) -> &mut Self {
        self.n_max_iterations = value;
        self
    }

    /// Sets the target number of Newton iterations for the time-step heuristic
    pub fn set_n_target_iterations(&mut self, value: usize) -> &mut Self {
        self.n_target_iterations = value;
        self
    }

    /// Sets the maximum number of time-step retries after divergence
    pub fn set_n_max_retries(&mut self, value: usize) -> &mut Self {
        self.n_max_retries = value;
        self
    }

    /// Sets the time window and the initial/minimum/maximum time-step sizes
    pub fn set_time_loop(
        &mut self,
        t_ini: f64,
        t_fin: f64,
        dt_ini: f64,
        dt_min: f64,
        dt_max: f64,
    ) -> Result<&mut Self, StrError> {
        if t_fin <= t_ini {
            return Err("t_fin must be > t_ini");
        }
        if dt_min <= 0.0 || dt_ini < dt_min || dt_max < dt_ini {
            return Err("time-step sizes must satisfy 0 < dt_min ≤ dt_ini ≤ dt_max");
        }
        self.t_ini = t_ini;
        self.t_fin = t_fin;
        self.dt_ini = dt_ini;
        self.dt_min = dt_min;
        self.dt_max = dt_max;
        Ok(self)
    }

    /// Sets the volumetric source term
    pub fn set_source(&mut self, source: FnSource) -> &mut Self {
        self.source = Some(source);
        self
    }

    /// Validates all data; returns a message on failure
    pub fn validate(&self) -> Option<StrError> {
        if self.temperature <= 0.0 {
            return Some("temperature must be > 0.0");
        }
        if self.n_max_iterations < 1 {
            return Some("at least one Newton iteration must be allowed");
        }
        if self.dt_min <= 0.0 || self.dt_ini < self.dt_min || self.dt_max < self.dt_ini {
            return Some("time-step sizes must satisfy 0 < dt_min ≤ dt_ini ≤ dt_max");
        }
        if self.t_fin <= self.t_ini {
            return Some("t_fin must be > t_ini");
        }
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::base::FdScheme;
    use crate::StrError;

    #[test]
    fn new_works() -> Result<(), StrError> {
        let mut config = Config::new();
        assert_eq!(config.n_equations(), 2);
        config
            .set_energy(true)
            .set_temperature(313.15)?
            .set_gravity(9.81)?
            .set_fd_scheme(FdScheme::Forward)
            .set_recycle_tolerance(1e-6)?
            .set_tolerances(1e-6, 1e-9)?
            .set_relaxation(0.9)?
            .set_n_max_iterations(20)
            .set_n_target_iterations(5)
            .set_n_max_retries(8)
            .set_time_loop(0.0, 100.0, 1.0, 1e-3, 10.0)?;
        assert_eq!(config.n_equations(), 3);
        assert_eq!(config.gravity[1], -9.81);
        assert_eq!(config.recycle_tolerance, Some(1e-6));
        assert_eq!(config.validate(), None);
        Ok(())
    }

    #[test]
    fn setters_capture_errors() {
        let mut config = Config::new();
        assert_eq!(config.set_temperature(0.0).err(), Some("temperature must be > 0.0"));
        assert_eq!(config.set_gravity(-1.0).err(), Some("gravity must be ≥ 0.0"));
        assert_eq!(
            config.set_recycle_tolerance(0.0).err(),
            Some("recycle tolerance must be > 0.0")
        );
        assert_eq!(config.set_tolerances(0.0, 1.0).err(), Some("tolerances must be > 0.0"));
        assert_eq!(
            config.set_relaxation(1.5).err(),
            Some("relaxation factor must be within (0, 1]")
        );
        assert_eq!(config.set_time_loop(1.0, 1.0, 0.1, 0.1, 0.1).err(), Some("t_fin must be > t_ini"));
        assert_eq!(
            config.set_time_loop(0.0, 1.0, 0.1, 0.2, 0.3).err(),
            Some("time-step sizes must satisfy 0 < dt_min ≤ dt_ini ≤ dt_max")
        );
    }

    #[test]
    fn validate_works() {
        let mut config = Config::new();
        assert_eq!(config.validate(), None);
        config.n_max_iterations = 0;
        assert_eq!(config.validate(), Some("at least one Newton iteration must be allowed"));
        config.n_max_iterations = 10;
        config.dt_ini = 1.0; // larger than dt_max
        assert_eq!(
            config.validate(),
            Some("time-step sizes must satisfy 0 < dt_min ≤ dt_ini ≤ dt_max")
        );
    }
}
