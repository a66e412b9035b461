use clarabel::solver::{DefaultSettings, SolverStatus};
use nalgebra::{DMatrix, DVector};
use qpsolve_types::LinearConstraints;

use crate::clarabel_backend::{solve_with_clarabel, ClarabelOutcome};
use crate::qpswift_options::QpSwiftOptions;
use crate::qpswift_runner::{BasicInfo, QpSwiftRunner, RunResult, QP_FATAL, QP_KKTFAIL, QP_MAXIT, QP_OPTIMAL};

/// qpSWIFT defaults, used when the option is not given
const DEFAULT_MAXITER: u32 = 100;
const DEFAULT_ABSTOL: f64 = 1e-6;
const DEFAULT_RELTOL: f64 = 1e-6;

/// Runs the qpSWIFT call convention on top of Clarabel.
///
/// Stands in for the native qpSWIFT library: same argument order, same
/// options, same result shape. `SIGMA` has no Clarabel counterpart and is
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelRunner;

impl ClarabelRunner {
    pub fn new() -> Self {
        ClarabelRunner
    }

    fn settings(opts: &QpSwiftOptions) -> DefaultSettings<f64> {
        if let Some(sigma) = opts.sigma() {
            tracing::debug!("SIGMA = {} has no Clarabel counterpart, ignoring", sigma);
        }

        let mut settings = DefaultSettings::default();
        settings.verbose = opts.verbose();
        settings.max_iter = opts.max_iter().unwrap_or(DEFAULT_MAXITER);
        settings.tol_gap_abs = opts.abs_tol().unwrap_or(DEFAULT_ABSTOL);
        settings.tol_gap_rel = opts.rel_tol().unwrap_or(DEFAULT_RELTOL);
        settings
    }

    fn to_run_result(outcome: ClarabelOutcome) -> RunResult {
        RunResult {
            basic_info: BasicInfo {
                exit_flag: exit_flag(outcome.status),
                iterations: outcome.iterations,
                setup_time: outcome.setup_time,
                solve_time: outcome.solve_time,
                fval: outcome.objective,
            },
            sol: DVector::from_vec(outcome.x),
        }
    }
}

/// Map Clarabel termination status to a qpSWIFT exit flag
fn exit_flag(status: SolverStatus) -> i32 {
    match status {
        SolverStatus::Solved => QP_OPTIMAL,
        SolverStatus::NumericalError | SolverStatus::InsufficientProgress => QP_KKTFAIL,
        SolverStatus::MaxIterations | SolverStatus::MaxTime => QP_MAXIT,
        _ => QP_FATAL,
    }
}

fn debug_assert_columns(q: &DVector<f64>, p: &DMatrix<f64>, g: &DMatrix<f64>) {
    let n = q.len();
    debug_assert!(p.nrows() == n && p.ncols() == n, "P must be {}x{}", n, n);
    debug_assert_eq!(g.ncols(), n, "G must have {} columns", n);
}

impl QpSwiftRunner for ClarabelRunner {
    fn run(
        &self,
        q: &DVector<f64>,
        h: &DVector<f64>,
        p: &DMatrix<f64>,
        g: &DMatrix<f64>,
        a: &DMatrix<f64>,
        b: &DVector<f64>,
        opts: &QpSwiftOptions,
    ) -> RunResult {
        debug_assert_columns(q, p, g);
        debug_assert_eq!(a.ncols(), q.len(), "A must have {} columns", q.len());
        let inequality = LinearConstraints::new(g.clone(), h.clone());
        let equality = LinearConstraints::new(a.clone(), b.clone());
        let outcome = solve_with_clarabel(p, q, Some(&equality), Some(&inequality), Self::settings(opts));
        Self::to_run_result(outcome)
    }

    fn run_without_equality(
        &self,
        q: &DVector<f64>,
        h: &DVector<f64>,
        p: &DMatrix<f64>,
        g: &DMatrix<f64>,
        opts: &QpSwiftOptions,
    ) -> RunResult {
        debug_assert_columns(q, p, g);
        let inequality = LinearConstraints::new(g.clone(), h.clone());
        let outcome = solve_with_clarabel(p, q, None, Some(&inequality), Self::settings(opts));
        Self::to_run_result(outcome)
    }
}
