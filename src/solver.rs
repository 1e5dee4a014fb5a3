//! Dense Gaussian elimination for the constrained stiffness system.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::errors::{AnalysisError, Instability};

/// Solve `K·U = F` by Gaussian elimination with partial pivoting.
///
/// Both operands are consumed and overwritten during elimination. A pivot whose
/// magnitude does not exceed `pivot_tolerance` means the structure is a
/// mechanism; no displacement vector is produced in that case.
///
/// # Errors
///
/// Returns [`AnalysisError::SingularSystem`] with [`Instability::ZeroPivot`]
/// naming the row index of the failed pivot, and
/// [`AnalysisError::NumericOverflow`] when the solution is not finite.
///
/// # Examples
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use planar_truss::solver::solve;
///
/// let k = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 4.0, 0.0]);
/// let f = DVector::from_row_slice(&[6.0, 8.0]);
/// let u = solve(k, f, 1.0e-12)?;
/// assert_eq!(u.as_slice(), &[2.0, 3.0]);
/// # Ok::<(), planar_truss::AnalysisError>(())
/// ```
pub fn solve(
    mut stiffness: DMatrix<f64>,
    mut load: DVector<f64>,
    pivot_tolerance: f64,
) -> Result<DVector<f64>, AnalysisError> {
    let n = load.len();
    debug_assert_eq!(stiffness.shape(), (n, n));
    debug!("solving {n} equations");

    for i in 0..n {
        let pivot_row = (i..n)
            .max_by(|a, b| stiffness[(*a, i)].abs().total_cmp(&stiffness[(*b, i)].abs()))
            .unwrap_or(i);
        if stiffness[(pivot_row, i)].abs() <= pivot_tolerance {
            return Err(AnalysisError::SingularSystem(Instability::ZeroPivot {
                dof: i,
            }));
        }
        if pivot_row != i {
            stiffness.swap_rows(i, pivot_row);
            load.swap_rows(i, pivot_row);
        }

        let pivot = stiffness[(i, i)];
        for j in (i + 1)..n {
            let factor = stiffness[(j, i)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for col in i..n {
                let upper = stiffness[(i, col)];
                stiffness[(j, col)] -= factor * upper;
            }
            let upper = load[i];
            load[j] -= factor * upper;
        }
    }

    let mut solution = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = load[i];
        for col in (i + 1)..n {
            sum -= stiffness[(i, col)] * solution[col];
        }
        solution[i] = sum / stiffness[(i, i)];
    }

    if solution.iter().any(|value: &f64| !value.is_finite()) {
        return Err(AnalysisError::NumericOverflow { stage: "solve" });
    }
    Ok(solution)
}
