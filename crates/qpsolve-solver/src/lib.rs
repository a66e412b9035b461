//! QP solver adapters behind one shared interface.
//!
//! Each adapter translates a [`QpProblem`](qpsolve_types::QpProblem) into the
//! calling convention of its backend and normalizes the outcome to
//! `Option<DVector<f64>>`: `Some` with the primal solution, `None` when the
//! backend ran but did not converge.

mod backend;
mod csc;
mod clarabel_backend;
mod qpswift_options;
mod qpswift_runner;
mod clarabel_runner;
mod qpswift_backend;
mod registry;

pub use backend::QpSolver;
pub use clarabel_backend::ClarabelSolver;
pub use qpswift_options::{keys, OptionValue, QpSwiftOptions};
pub use qpswift_runner::{BasicInfo, QpSwiftRunner, RunResult, QP_FATAL, QP_KKTFAIL, QP_MAXIT, QP_OPTIMAL};
pub use clarabel_runner::ClarabelRunner;
pub use qpswift_backend::{qpswift_solve_qp, QpSwiftSolver, WARM_START_NOTICE};
pub use registry::{available_solvers, dense_solvers, solve_function, solve_qp, sparse_solvers, SolverId};

#[cfg(test)]
mod tests;
