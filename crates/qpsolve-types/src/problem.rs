use nalgebra::{DMatrix, DVector};

use crate::error::{QpError, Result};

/// A block of linear constraints sharing one matrix and one right-hand side.
///
/// Used both for inequalities `G x <= h` and equalities `A x = b`, so the
/// matrix and the vector always travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraints {
    pub matrix: DMatrix<f64>,
    pub vector: DVector<f64>,
}

impl LinearConstraints {
    pub fn new(matrix: DMatrix<f64>, vector: DVector<f64>) -> Self {
        LinearConstraints { matrix, vector }
    }

    /// Number of constraint rows
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    fn check_shape(&self, n: usize, label: &str) -> Result<()> {
        let rows = self.vector.len();
        if self.matrix.nrows() != rows || self.matrix.ncols() != n {
            return Err(QpError::InvalidProblem(format!(
                "{} must be {}x{}, got {}x{}",
                label,
                rows,
                n,
                self.matrix.nrows(),
                self.matrix.ncols()
            )));
        }
        Ok(())
    }
}

/// QP in standard form:
/// minimize 0.5 * x^T P x + q^T x
/// subject to G x <= h, A x = b
///
/// P is assumed symmetric and A full row rank; neither is checked.
/// Shapes are checked when the problem is built.
#[derive(Debug, Clone, PartialEq)]
pub struct QpProblem {
    p: DMatrix<f64>,
    q: DVector<f64>,
    inequality: Option<LinearConstraints>,
    equality: Option<LinearConstraints>,
}

impl QpProblem {
    /// Create an unconstrained problem from its cost model
    pub fn new(p: DMatrix<f64>, q: DVector<f64>) -> Result<Self> {
        let n = q.len();
        if p.nrows() != n || p.ncols() != n {
            return Err(QpError::InvalidProblem(format!(
                "P must be {}x{}, got {}x{}",
                n,
                n,
                p.nrows(),
                p.ncols()
            )));
        }
        Ok(QpProblem {
            p,
            q,
            inequality: None,
            equality: None,
        })
    }

    /// Attach the inequality block `G x <= h`
    pub fn with_inequality(mut self, g: DMatrix<f64>, h: DVector<f64>) -> Result<Self> {
        let block = LinearConstraints::new(g, h);
        block.check_shape(self.num_vars(), "G")?;
        self.inequality = Some(block);
        Ok(self)
    }

    /// Attach the equality block `A x = b`
    pub fn with_equality(mut self, a: DMatrix<f64>, b: DVector<f64>) -> Result<Self> {
        let block = LinearConstraints::new(a, b);
        block.check_shape(self.num_vars(), "A")?;
        self.equality = Some(block);
        Ok(self)
    }

    pub fn p(&self) -> &DMatrix<f64> {
        &self.p
    }

    pub fn q(&self) -> &DVector<f64> {
        &self.q
    }

    pub fn inequality(&self) -> Option<&LinearConstraints> {
        self.inequality.as_ref()
    }

    pub fn equality(&self) -> Option<&LinearConstraints> {
        self.equality.as_ref()
    }

    /// Get number of variables
    pub fn num_vars(&self) -> usize {
        self.q.len()
    }

    pub fn num_inequalities(&self) -> usize {
        self.inequality.as_ref().map_or(0, LinearConstraints::len)
    }

    pub fn num_equalities(&self) -> usize {
        self.equality.as_ref().map_or(0, LinearConstraints::len)
    }

    /// Compute objective: 0.5 * x^T P x + q^T x
    pub fn objective(&self, x: &DVector<f64>) -> f64 {
        0.5 * x.dot(&(&self.p * x)) + self.q.dot(x)
    }

    /// Largest violation of `G x <= h` and `|A x - b|` at `x` (0 when feasible)
    pub fn max_violation(&self, x: &DVector<f64>) -> f64 {
        let mut max_violation: f64 = 0.0;

        if let Some(ineq) = &self.inequality {
            let gx = &ineq.matrix * x;
            for (lhs, rhs) in gx.iter().zip(ineq.vector.iter()) {
                max_violation = max_violation.max(lhs - rhs);
            }
        }

        if let Some(eq) = &self.equality {
            let ax = &eq.matrix * x;
            for (lhs, rhs) in ax.iter().zip(eq.vector.iter()) {
                max_violation = max_violation.max((lhs - rhs).abs());
            }
        }

        max_violation
    }
}
