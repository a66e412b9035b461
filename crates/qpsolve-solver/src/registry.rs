use nalgebra::DVector;
use qpsolve_types::{QpError, QpProblem, Result};
use serde::{Deserialize, Serialize};

use crate::backend::QpSolver;
use crate::clarabel_backend::ClarabelSolver;
use crate::qpswift_backend::QpSwiftSolver;

/// QP solvers that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverId {
    /// Clarabel - interior-point solver for conic programs, pure Rust.
    ///
    /// Accepts every constraint shape and works on sparse matrices.
    Clarabel,

    /// qpSWIFT - sparse primal-dual interior-point QP solver for embedded use.
    ///
    /// Takes dense inputs here and requires at least one inequality.
    QpSwift,
}

impl SolverId {
    /// Registry name of this solver
    pub fn name(&self) -> &'static str {
        match self {
            SolverId::Clarabel => "clarabel",
            SolverId::QpSwift => "qpswift",
        }
    }

    /// Whether the adapter consumes dense matrices
    pub fn is_dense(&self) -> bool {
        matches!(self, SolverId::QpSwift)
    }
}

impl std::fmt::Display for SolverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SolverId {
    type Err = QpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "clarabel" => Ok(SolverId::Clarabel),
            "qpswift" => Ok(SolverId::QpSwift),
            _ => Err(QpError::UnknownSolver(s.to_string())),
        }
    }
}

/// All solvers compiled into this build
pub fn available_solvers() -> &'static [SolverId] {
    &[SolverId::Clarabel, SolverId::QpSwift]
}

pub fn dense_solvers() -> Vec<SolverId> {
    available_solvers().iter().copied().filter(SolverId::is_dense).collect()
}

pub fn sparse_solvers() -> Vec<SolverId> {
    available_solvers().iter().copied().filter(|id| !id.is_dense()).collect()
}

/// Adapter for `id` with default settings
pub fn solve_function(id: SolverId) -> Box<dyn QpSolver> {
    match id {
        SolverId::Clarabel => Box::new(ClarabelSolver::new()),
        SolverId::QpSwift => Box::new(QpSwiftSolver::new()),
    }
}

/// Solve `problem` with the solver registered under `solver`
pub fn solve_qp(
    problem: &QpProblem,
    solver: &str,
    initvals: Option<&DVector<f64>>,
    verbose: bool,
) -> Result<Option<DVector<f64>>> {
    let id: SolverId = solver.parse()?;
    tracing::debug!("Dispatching {}-variable QP to {}", problem.num_vars(), id);
    solve_function(id).solve_qp(problem, initvals, verbose)
}
