use nalgebra::DVector;
use qpsolve_types::{QpProblem, Result};

use crate::registry::SolverId;

/// Trait for QP solver adapters
///
/// All adapters share this signature so callers can switch backends without
/// touching the problem. `Ok(None)` means the backend ran but found no
/// solution; `Err` is reserved for problems the adapter refuses outright.
pub trait QpSolver: Send + Sync {
    /// Registry identifier of the backend
    fn solver_id(&self) -> SolverId;

    /// Solve a QP problem: minimize 0.5 * x^T P x + q^T x
    /// subject to G x <= h, A x = b
    ///
    /// `initvals` is a warm-start guess; backends that cannot use it emit a
    /// notice and carry on.
    fn solve_qp(
        &self,
        problem: &QpProblem,
        initvals: Option<&DVector<f64>>,
        verbose: bool,
    ) -> Result<Option<DVector<f64>>>;
}
