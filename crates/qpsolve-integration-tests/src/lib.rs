//! Shared problem fixtures for the end-to-end tests.

use nalgebra::{DMatrix, DVector};
use qpsolve_types::QpProblem;

/// minimize (x-2)^2 + (y-2.5)^2 subject to x <= 1
///
/// Optimum at (1, 2.5) with the inequality strictly active.
pub fn separable_with_bound() -> QpProblem {
    QpProblem::new(
        DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 2.0]),
        DVector::from_vec(vec![-4.0, -5.0]),
    )
    .and_then(|p| p.with_inequality(DMatrix::from_row_slice(1, 2, &[1.0, 0.0]), DVector::from_vec(vec![1.0])))
    .expect("fixture dimensions are consistent")
}

/// minimize 0.5 * |x|^2 + [1, -2, 0] . x
/// subject to x >= 0, x1 + x2 + x3 = 1
///
/// Optimum at (0, 1, 0).
pub fn simplex_projection() -> QpProblem {
    QpProblem::new(DMatrix::identity(3, 3), DVector::from_vec(vec![1.0, -2.0, 0.0]))
        .and_then(|p| p.with_inequality(-DMatrix::<f64>::identity(3, 3), DVector::zeros(3)))
        .and_then(|p| p.with_equality(DMatrix::from_element(1, 3, 1.0), DVector::from_element(1, 1.0)))
        .expect("fixture dimensions are consistent")
}

/// x >= 1 and x <= 0 at once
pub fn infeasible_box() -> QpProblem {
    QpProblem::new(DMatrix::identity(1, 1), DVector::zeros(1))
        .and_then(|p| {
            p.with_inequality(
                DMatrix::from_row_slice(2, 1, &[-1.0, 1.0]),
                DVector::from_vec(vec![-1.0, 0.0]),
            )
        })
        .expect("fixture dimensions are consistent")
}

/// minimize 0.5 * (x^2 + y^2) subject to x + y = 1, no inequalities
pub fn equality_only() -> QpProblem {
    QpProblem::new(DMatrix::identity(2, 2), DVector::zeros(2))
        .and_then(|p| p.with_equality(DMatrix::from_row_slice(1, 2, &[1.0, 1.0]), DVector::from_vec(vec![1.0])))
        .expect("fixture dimensions are consistent")
}
