use clarabel::solver::{DefaultSettings, DefaultSolver, IPSolver, SolverStatus, SupportedConeT};
use nalgebra::{DMatrix, DVector};
use qpsolve_types::{LinearConstraints, QpProblem, Result};
use std::time::Instant;

use crate::backend::QpSolver;
use crate::csc::{stack_to_csc, to_csc_upper};
use crate::registry::SolverId;

/// Raw outcome of one Clarabel solve
#[derive(Debug, Clone)]
pub(crate) struct ClarabelOutcome {
    pub x: Vec<f64>,
    pub status: SolverStatus,
    pub objective: f64,
    pub iterations: u32,
    pub setup_time: f64,
    pub solve_time: f64,
}

/// Solve `min 0.5 x^T P x + q^T x  s.t.  A x = b, G x <= h` with Clarabel.
///
/// Clarabel format: `M x + s = c` with `s` in a product cone. Equality rows
/// go to the zero cone, inequality rows to the nonnegative cone, so `G x <= h`
/// maps to `G x + s = h, s >= 0` without any sign change.
pub(crate) fn solve_with_clarabel(
    p: &DMatrix<f64>,
    q: &DVector<f64>,
    equality: Option<&LinearConstraints>,
    inequality: Option<&LinearConstraints>,
    settings: DefaultSettings<f64>,
) -> ClarabelOutcome {
    let n = q.len();
    let setup_start = Instant::now();

    let p_csc = to_csc_upper(p);

    let mut blocks = Vec::with_capacity(2);
    let mut rhs = Vec::new();
    let mut cones = Vec::with_capacity(2);

    if let Some(eq) = equality.filter(|eq| !eq.is_empty()) {
        blocks.push(&eq.matrix);
        rhs.extend(eq.vector.iter().copied());
        cones.push(SupportedConeT::ZeroConeT(eq.len()));
    }
    if let Some(ineq) = inequality.filter(|ineq| !ineq.is_empty()) {
        blocks.push(&ineq.matrix);
        rhs.extend(ineq.vector.iter().copied());
        cones.push(SupportedConeT::NonnegativeConeT(ineq.len()));
    }

    let m_csc = stack_to_csc(&blocks, n);

    let mut solver = DefaultSolver::new(&p_csc, q.as_slice(), &m_csc, &rhs, &cones, settings);
    let setup_time = setup_start.elapsed().as_secs_f64();

    let solve_start = Instant::now();
    solver.solve();
    let solve_time = solve_start.elapsed().as_secs_f64();

    ClarabelOutcome {
        x: solver.solution.x.clone(),
        status: solver.solution.status,
        objective: solver.solution.obj_val,
        iterations: solver.info.iterations,
        setup_time,
        solve_time,
    }
}

/// Clarabel-based QP solver (pure Rust)
///
/// Handles every constraint shape, including equality-only and
/// unconstrained problems.
pub struct ClarabelSolver {
    max_iter: u32,
    tol_gap_abs: f64,
    tol_gap_rel: f64,
}

impl ClarabelSolver {
    /// Create a new Clarabel solver with default settings
    pub fn new() -> Self {
        ClarabelSolver {
            max_iter: 200,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }

    /// Create solver with custom settings
    pub fn with_params(max_iter: u32, tolerance: f64) -> Self {
        ClarabelSolver {
            max_iter,
            tol_gap_abs: tolerance,
            tol_gap_rel: tolerance,
        }
    }

    fn settings(&self, verbose: bool) -> DefaultSettings<f64> {
        let mut settings = DefaultSettings::default();
        settings.verbose = verbose;
        settings.max_iter = self.max_iter;
        settings.tol_gap_abs = self.tol_gap_abs;
        settings.tol_gap_rel = self.tol_gap_rel;
        settings
    }
}

impl Default for ClarabelSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl QpSolver for ClarabelSolver {
    fn solver_id(&self) -> SolverId {
        SolverId::Clarabel
    }

    fn solve_qp(
        &self,
        problem: &QpProblem,
        initvals: Option<&DVector<f64>>,
        verbose: bool,
    ) -> Result<Option<DVector<f64>>> {
        if initvals.is_some() {
            tracing::warn!("Clarabel: note that warm-start values are ignored");
        }

        let outcome = solve_with_clarabel(
            problem.p(),
            problem.q(),
            problem.equality(),
            problem.inequality(),
            self.settings(verbose),
        );

        if outcome.status != SolverStatus::Solved {
            tracing::debug!(
                "Clarabel finished with status {:?} after {} iterations",
                outcome.status,
                outcome.iterations
            );
            return Ok(None);
        }

        tracing::debug!(
            "Clarabel solved {}-variable QP in {} iterations, objective {}",
            problem.num_vars(),
            outcome.iterations,
            outcome.objective
        );
        Ok(Some(DVector::from_vec(outcome.x)))
    }
}
