use clarabel::algebra::CscMatrix;
use nalgebra::DMatrix;

const SPARSITY_THRESHOLD: f64 = 1e-12;

/// Convert DMatrix to Clarabel CSC format (upper triangle only for P)
pub(crate) fn to_csc_upper(mat: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut colptr = vec![0];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for col in 0..mat.ncols() {
        // For upper triangle: row <= col
        for row in 0..=col {
            let val = mat[(row, col)];
            if val.abs() > SPARSITY_THRESHOLD {
                rowval.push(row);
                nzval.push(val);
            }
        }
        colptr.push(nzval.len());
    }

    CscMatrix {
        m: mat.nrows(),
        n: mat.ncols(),
        colptr,
        rowval,
        nzval,
    }
}

/// Stack constraint blocks on top of each other and convert to CSC.
///
/// Every block must have `n` columns. An empty slice gives a 0 x n matrix.
pub(crate) fn stack_to_csc(blocks: &[&DMatrix<f64>], n: usize) -> CscMatrix<f64> {
    debug_assert!(
        blocks.iter().all(|b| b.ncols() == n),
        "constraint blocks must have {} columns",
        n
    );
    let m: usize = blocks.iter().map(|b| b.nrows()).sum();
    let mut colptr = vec![0];
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();

    for col in 0..n {
        let mut offset = 0;
        for block in blocks {
            for row in 0..block.nrows() {
                let val = block[(row, col)];
                if val.abs() > SPARSITY_THRESHOLD {
                    rowval.push(offset + row);
                    nzval.push(val);
                }
            }
            offset += block.nrows();
        }
        colptr.push(nzval.len());
    }

    CscMatrix {
        m,
        n,
        colptr,
        rowval,
        nzval,
    }
}
