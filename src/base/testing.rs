/// Panics if two numbers are not approximately equal (absolute tolerance)
pub fn approx_eq(a: f64, b: f64, tol: f64) {
    let diff = f64::abs(a - b);
    if diff > tol {
        panic!("numbers are not approximately equal. diff = {:?} > tol = {:?}", diff, tol);
    }
}

/// Panics if two numbers are not approximately equal (relative to the reference value)
pub fn rel_approx_eq(a: f64, reference: f64, tol: f64) {
    let diff = f64::abs(a - reference) / f64::max(1.0, f64::abs(reference));
    if diff > tol {
        panic!(
            "numbers are not approximately equal. relative diff = {:?} > tol = {:?}",
            diff, tol
        );
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
