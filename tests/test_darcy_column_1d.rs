use pmflow::prelude::*;
use pmflow::fvm::{FluxVariables, VolumeVariables};
use pmflow::StrError;

// Horizontal liquid-saturated column, 10 m long, with prescribed pressures at
// both ends: pl(0) = 2e5 Pa and pl(10) = 1e5 Pa. With constant properties the
// converged pressure profile is linear and the Darcy velocity is
//
//   q = (k / mu) (dP / L) = (1e-12 / 1e-3) (1e5 / 10) = 1e-5 m/s
#[test]
fn darcy_column_1d() -> Result<(), StrError> {
    // config
    let mut config = Config::new();
    config
        .set_tolerances(1e-8, 1e-10)?
        .set_time_loop(0.0, 1.0, 1.0, 1e-3, 1.0)?;

    // mesh and boundary conditions
    let mesh = SampleMeshes::column(10.0, 10);
    let left = mesh.find_points(|x| x[0] == 0.0);
    let right = mesh.find_points(|x| x[0] == 10.0);
    let all: Vec<_> = (0..mesh.points.len()).collect();
    let mut essential = Essential::new();
    essential
        .points(&left, Dof::Pl, 2e5)
        .points(&right, Dof::Pl, 1e5)
        .points(&all, Dof::Switch, 0.0); // keep the column liquid-saturated
    let natural = Natural::new();

    // materials
    let fluids = ConstantFluids::new();
    let spatial = SpatialParams::new(SpatialParams::sample_coarse());

    // discretization and solvers
    let base = FvBase::new(&config, &mesh, &essential, &natural)?;
    let mut assembler = JacobianAssembler::new(&base, &fluids, &spatial);
    let mut phase_switch = PhaseSwitch::new(mesh.points.len());
    let mut newton = NewtonController::new(&base);
    let solver = DenseLuSolver::new();

    // initial state: uniform pressure, no gas
    let mut state = FvState::new(mesh.points.len(), base.n_eq);
    for p in 0..mesh.points.len() {
        state.uu[p * base.n_eq] = 1.5e5;
    }
    state.uu_old.copy_from(&state.uu);

    // solve
    let stats = newton.run(&mut assembler, &solver, &mut phase_switch, &fluids, &spatial, &mut state)?;
    assert_eq!(stats.n_timesteps, 1);
    assert_eq!(stats.n_retries, 0);

    // the pressure profile is linear: pl(x) = 2e5 - 1e4 x
    for point in &mesh.points {
        let pl = state.uu[point.id * base.n_eq];
        let correct = 2e5 - 1e4 * point.coords[0];
        assert!(
            f64::abs(pl - correct) < 1e-3,
            "pl({}) = {} should be {}",
            point.coords[0],
            pl,
            correct
        );
    }

    // evaluate the Darcy flux through an interior cross-section (cell 4)
    let cell = &mesh.cells[4];
    let mut vv = Vec::new();
    for k in 0..4 {
        let point = &mesh.points[cell.points[k]];
        let u = [state.uu[point.id * base.n_eq], state.uu[point.id * base.n_eq + 1]];
        vv.push(VolumeVariables::new(
            &config,
            &fluids,
            &spatial,
            &point.coords,
            &u,
            state.presence[point.id],
        )?);
    }
    let vv = [vv[0], vv[1], vv[2], vv[3]];
    let geom = &base.geoms[4];
    let mut molar_flux = 0.0; // over the full unit cross-section
    for (face_index, sign) in [(0, 1.0), (2, -1.0)] {
        let fv = FluxVariables::new(&config, &fluids, &spatial, geom, face_index, &vv);
        // velocity through the half-face: v = mobility kmvp / area
        let v = sign * vv[0].mobility[LIQUID] * fv.kmvp_normal[LIQUID] / 0.5;
        assert!(f64::abs(v - 1e-5) < 1e-11, "v = {} should be 1e-5", v);
        molar_flux += sign * fv.flux[WATER];
    }
    let correct = 1e-5 * 55508.0;
    assert!(f64::abs(molar_flux - correct) / correct < 1e-6);
    Ok(())
}

// With only one Newton iteration allowed, every attempt at the step fails and
// the controller keeps halving dt until the retry limit is reached.
#[test]
fn retry_limit_is_enforced() -> Result<(), StrError> {
    let mut config = Config::new();
    config
        .set_n_max_iterations(1)
        .set_n_max_retries(3)
        .set_time_loop(0.0, 1.0, 1.0, 1e-12, 1.0)?;

    let mesh = SampleMeshes::column(10.0, 10);
    let left = mesh.find_points(|x| x[0] == 0.0);
    let right = mesh.find_points(|x| x[0] == 10.0);
    let all: Vec<_> = (0..mesh.points.len()).collect();
    let mut essential = Essential::new();
    essential
        .points(&left, Dof::Pl, 2e5)
        .points(&right, Dof::Pl, 1e5)
        .points(&all, Dof::Switch, 0.0);
    let natural = Natural::new();

    let fluids = ConstantFluids::new();
    let spatial = SpatialParams::new(SpatialParams::sample_coarse());
    let base = FvBase::new(&config, &mesh, &essential, &natural)?;
    let mut assembler = JacobianAssembler::new(&base, &fluids, &spatial);
    let mut phase_switch = PhaseSwitch::new(mesh.points.len());
    let mut newton = NewtonController::new(&base);
    let solver = DenseLuSolver::new();

    let mut state = FvState::new(mesh.points.len(), base.n_eq);
    for p in 0..mesh.points.len() {
        state.uu[p * base.n_eq] = 1.5e5;
    }
    state.uu_old.copy_from(&state.uu);

    let res = newton.run(&mut assembler, &solver, &mut phase_switch, &fluids, &spatial, &mut state);
    assert_eq!(res.err(), Some("maximum number of time-step retries was reached"));
    // the rollback left the state at the initial condition
    assert_eq!(state.uu[2], 1.5e5);
    Ok(())
}
