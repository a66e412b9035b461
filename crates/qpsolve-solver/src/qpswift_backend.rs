//! Solver interface for qpSWIFT.
//!
//! qpSWIFT is a light-weight sparse QP solver targeted at embedded and
//! robotic applications: a primal-dual interior-point method with Mehrotra
//! predictor-corrector steps and Nesterov-Todd scaling, factorizing its KKT
//! system with a sparse LDL' decomposition.
//!
//! Two limitations of the backend show through this adapter:
//!
//! - problems without inequality constraints are rejected with
//!   [`QpError::NotImplemented`];
//! - the equality matrix must have full row rank. This is not checked. If a
//!   verbose run reports the iteration limit, check the rank of `A` and that
//!   `G` has no zero rows.

use nalgebra::DVector;
use qpsolve_types::{QpError, QpProblem, Result};

use crate::backend::QpSolver;
use crate::clarabel_runner::ClarabelRunner;
use crate::qpswift_options::{keys, QpSwiftOptions};
use crate::qpswift_runner::QpSwiftRunner;
use crate::registry::SolverId;

/// Emitted when a warm-start vector is passed to qpSWIFT
pub const WARM_START_NOTICE: &str = "qpSWIFT: note that warm-start values ignored by wrapper";

/// `OUTPUT` level that makes qpSWIFT return both `sol` and `basicInfo`
const OUTPUT_SOLUTION_AND_INFO: i64 = 1;

/// Solve a QP with qpSWIFT through `runner`.
///
/// Returns `Ok(None)` when qpSWIFT exits with a non-zero flag. The caller's
/// `opts` are not modified: `OUTPUT` and `VERBOSE` are set on a copy,
/// overriding whatever the caller put under those keys.
///
/// A warm-start `initvals` is ignored and reported as a `tracing` warn
/// event; install a subscriber (e.g. `tracing_subscriber::fmt`, which
/// writes to standard output) to see it.
pub fn qpswift_solve_qp<R: QpSwiftRunner + ?Sized>(
    runner: &R,
    problem: &QpProblem,
    initvals: Option<&DVector<f64>>,
    verbose: bool,
    opts: Option<&QpSwiftOptions>,
) -> Result<Option<DVector<f64>>> {
    if initvals.is_some() {
        tracing::warn!("{}", WARM_START_NOTICE);
    }

    let mut opts = opts.cloned().unwrap_or_default();
    opts.insert(keys::OUTPUT, OUTPUT_SOLUTION_AND_INFO);
    opts.insert(keys::VERBOSE, i64::from(verbose));

    let Some(ineq) = problem.inequality() else {
        return Err(QpError::NotImplemented(
            "QP without inequality constraints is still WIP for qpSWIFT".to_string(),
        ));
    };

    let result = match problem.equality() {
        Some(eq) => {
            tracing::debug!(
                "Running qpSWIFT with {} inequalities and {} equalities",
                ineq.len(),
                eq.len()
            );
            runner.run(problem.q(), &ineq.vector, problem.p(), &ineq.matrix, &eq.matrix, &eq.vector, &opts)
        }
        None => {
            tracing::debug!("Running qpSWIFT with {} inequalities", ineq.len());
            runner.run_without_equality(problem.q(), &ineq.vector, problem.p(), &ineq.matrix, &opts)
        }
    };

    let info = &result.basic_info;
    if !info.is_optimal() {
        tracing::debug!(
            "qpSWIFT exited with flag {} after {} iterations",
            info.exit_flag,
            info.iterations
        );
        return Ok(None);
    }

    Ok(Some(result.sol))
}

/// qpSWIFT adapter with a stored option set
pub struct QpSwiftSolver<R = ClarabelRunner> {
    runner: R,
    options: Option<QpSwiftOptions>,
}

impl QpSwiftSolver<ClarabelRunner> {
    pub fn new() -> Self {
        QpSwiftSolver {
            runner: ClarabelRunner::new(),
            options: None,
        }
    }
}

impl Default for QpSwiftSolver<ClarabelRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: QpSwiftRunner> QpSwiftSolver<R> {
    pub fn with_runner(runner: R) -> Self {
        QpSwiftSolver { runner, options: None }
    }

    pub fn with_options(mut self, options: QpSwiftOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn options(&self) -> Option<&QpSwiftOptions> {
        self.options.as_ref()
    }
}

impl<R: QpSwiftRunner> QpSolver for QpSwiftSolver<R> {
    fn solver_id(&self) -> SolverId {
        SolverId::QpSwift
    }

    fn solve_qp(
        &self,
        problem: &QpProblem,
        initvals: Option<&DVector<f64>>,
        verbose: bool,
    ) -> Result<Option<DVector<f64>>> {
        qpswift_solve_qp(&self.runner, problem, initvals, verbose, self.options.as_ref())
    }
}
