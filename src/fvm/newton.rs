use super::{FvBase, FvState, JacobianAssembler, LinearSolver, PhaseSwitch, SpatialParams};
use crate::material::FluidSystem;
use crate::StrError;
use nalgebra::DVector;

/// Holds counters accumulated over a simulation run
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    /// Number of accepted time steps
    pub n_timesteps: usize,

    /// Total number of Newton iterations
    pub n_iterations: usize,

    /// Total number of time-step retries (step halvings)
    pub n_retries: usize,
}

/// Controls the Newton-Raphson iterations and the adaptive time stepping
///
/// A time step converges when the residual max-norm falls below the absolute
/// tolerance (or the relative update norm below its tolerance) and the last
/// phase-switch pass performed no switch. A diverged step is rolled back and
/// retried with half the step size, up to the configured retry limit.
pub struct NewtonController<'a> {
    /// Discretization data
    base: &'a FvBase<'a>,

    /// Number of iterations of the last converged step
    pub iterations: usize,
}

impl<'a> NewtonController<'a> {
    /// Allocates a new instance
    pub fn new(base: &'a FvBase<'a>) -> Self {
        NewtonController { base, iterations: 0 }
    }

    /// Analyzes the residual vector; returns whether it satisfies the tolerance
    pub fn analyze_rr(&self, rr: &DVector<f64>) -> Result<bool, StrError> {
        let mut rr_max = 0.0;
        for value in rr.iter() {
            if !value.is_finite() {
                return Err("residual vector contains non-finite values");
            }
            rr_max = f64::max(rr_max, f64::abs(*value));
        }
        Ok(rr_max < self.base.config.tol_rr_abs)
    }

    /// Analyzes the corrective update; returns whether it satisfies the relative tolerance
    pub fn analyze_mdu(&self, uu: &DVector<f64>, mdu: &DVector<f64>) -> Result<bool, StrError> {
        let norm = mdu.norm();
        if !norm.is_finite() {
            return Err("corrective update contains non-finite values");
        }
        Ok(norm < self.base.config.tol_mdu_rel * (1.0 + uu.norm()))
    }

    /// Suggests the next time-step size from the last iteration count
    ///
    /// Grows the step when the solver converged faster than the target number
    /// of iterations, shrinks it when slower; never exceeds `dt_max`.
    pub fn suggest_next_dt(&self, dt: f64, n_iterations: usize) -> f64 {
        let target = self.base.config.n_target_iterations as f64;
        let n = n_iterations as f64;
        let new_dt = if n <= target {
            dt * (1.0 + (target - n) / target)
        } else {
            dt / (1.0 + (n - target) / target)
        };
        f64::min(new_dt, self.base.config.dt_max)
    }

    /// Runs the Newton-Raphson iterations for one time step
    ///
    /// Returns the number of iterations on convergence. The caller is
    /// responsible for rolling back the state if an error is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn solve_step(
        &mut self,
        assembler: &mut JacobianAssembler,
        solver: &dyn LinearSolver,
        phase_switch: &mut PhaseSwitch,
        fluids: &dyn FluidSystem,
        spatial: &SpatialParams,
        state: &mut FvState,
        t_new: f64,
    ) -> Result<usize, StrError> {
        let config = self.base.config;
        let mut rr = DVector::zeros(self.base.neq_total);
        if config.verbose_iterations {
            println!("{:>5} {:>13} {:>13}", "it", "max(R)", "‖mdu‖");
        }
        for it in 1..=config.n_max_iterations {
            let kk = assembler.assemble(state, t_new, &mut rr)?;
            let converged_rr = self.analyze_rr(&rr)?;
            if converged_rr {
                if config.verbose_iterations {
                    println!("{:>5} {:>13.6e} {:>13}", it, rr.amax(), "-");
                }
                // a presence switch invalidates the convergence; keep iterating
                if phase_switch.apply(config, fluids, spatial, self.base.mesh, state)? == 0 {
                    self.iterations = it;
                    return Ok(it);
                }
                continue;
            }
            let mdu = solver.solve(&kk, &rr)?;
            let converged_mdu = self.analyze_mdu(&state.uu, &mdu)?;
            state.uu.axpy(-config.relaxation, &mdu, 1.0);
            if config.verbose_iterations {
                println!("{:>5} {:>13.6e} {:>13.6e}", it, rr.amax(), mdu.norm());
            }
            let n_switched = phase_switch.apply(config, fluids, spatial, self.base.mesh, state)?;
            if converged_mdu && n_switched == 0 {
                self.iterations = it;
                return Ok(it);
            }
        }
        Err("Newton-Raphson did not converge")
    }

    /// Runs the whole simulation: time loop with retries and adaptive stepping
    pub fn run(
        &mut self,
        assembler: &mut JacobianAssembler,
        solver: &dyn LinearSolver,
        phase_switch: &mut PhaseSwitch,
        fluids: &dyn FluidSystem,
        spatial: &SpatialParams,
        state: &mut FvState,
    ) -> Result<Stats, StrError> {
        let config = self.base.config;
        let mut stats = Stats::default();
        let mut t = config.t_ini;
        let mut dt = config.dt_ini;
        state.t = t;
        while t < config.t_fin {
            dt = f64::min(dt, config.t_fin - t);
            let mut n_retries = 0;
            loop {
                state.dt = dt;
                phase_switch.reset();
                assembler.update_old_storage(state)?;
                match self.solve_step(assembler, solver, phase_switch, fluids, spatial, state, t + dt) {
                    Ok(n_it) => {
                        t += dt;
                        state.accept_step(t);
                        stats.n_timesteps += 1;
                        stats.n_iterations += n_it;
                        if config.verbose_timesteps {
                            println!("t = {:>13.6e}  dt = {:>13.6e}  iterations = {}", t, dt, n_it);
                        }
                        dt = self.suggest_next_dt(dt, n_it);
                        break;
                    }
                    Err(_) => {
                        state.rollback();
                        n_retries += 1;
                        stats.n_retries += 1;
                        if n_retries > config.n_max_retries {
                            return Err("maximum number of time-step retries was reached");
                        }
                        dt *= 0.5;
                        if dt < config.dt_min {
                            return Err("time-step size became smaller than the minimum allowed");
                        }
                        if config.verbose_timesteps {
                            println!("retry {} with dt = {:>13.6e}", n_retries, dt);
                        }
                    }
                }
            }
        }
        Ok(stats)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
