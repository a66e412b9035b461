use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::qpswift_options::QpSwiftOptions;

/// Solver converged
pub const QP_OPTIMAL: i32 = 0;
/// KKT factorization failed
pub const QP_KKTFAIL: i32 = 1;
/// Iteration limit reached
pub const QP_MAXIT: i32 = 2;
/// Unrecoverable failure
pub const QP_FATAL: i32 = 3;

/// Status block returned by qpSWIFT alongside the solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub exit_flag: i32,
    pub iterations: u32,
    pub setup_time: f64,
    pub solve_time: f64,
    /// Objective value at the returned point
    pub fval: f64,
}

impl BasicInfo {
    pub fn is_optimal(&self) -> bool {
        self.exit_flag == QP_OPTIMAL
    }
}

/// Output of a qpSWIFT run with `OUTPUT = 1`
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub sol: DVector<f64>,
    pub basic_info: BasicInfo,
}

/// The qpSWIFT call convention.
///
/// qpSWIFT takes its arguments positionally as `(c, h, P, G, A, b, opts)`,
/// with the linear cost first. Without equality constraints it is called
/// with `(c, h, P, G)` and the options as a keyword argument, which is what
/// [`run_without_equality`](QpSwiftRunner::run_without_equality) models.
///
/// Runs never fail: every failure is reported through
/// [`BasicInfo::exit_flag`].
///
/// Callers must pass consistent shapes: with `n = q.len()`, `P` is n x n,
/// `G` and `A` have n columns and as many rows as `h` and `b`. A
/// [`QpProblem`](qpsolve_types::QpProblem) guarantees this; direct calls
/// with other shapes are a programming error.
pub trait QpSwiftRunner: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        q: &DVector<f64>,
        h: &DVector<f64>,
        p: &DMatrix<f64>,
        g: &DMatrix<f64>,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        opts: &QpSwiftOptions,
    ) -> RunResult;

    fn run_without_equality(
        &self,
        q: &DVector<f64>,
        h: &DVector<f64>,
        p: &DMatrix<f64>,
        g: &DMatrix<f64>,
        opts: &QpSwiftOptions,
    ) -> RunResult;
}
