//! Verification helpers
//!
//! Reference (explicit) products and comparison helpers used to check the
//! structured kernels against materialized operators.

use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2};
use scirs2_core::numeric::{Float, Num};

use crate::shape::MatvecMode;

/// Explicit matrix-vector product `C·f` (forward) or `Cᵗ·f` (transposed)
///
/// No shape checking beyond what indexing enforces; this is a reference
/// implementation for tests and diagnostics, not a kernel.
///
/// # Panics
///
/// Panics if `f` does not match the relevant dimension of `c`.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::{dense_matvec, MatvecMode};
///
/// let c = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// assert_eq!(dense_matvec(&c.view(), &array![1.0, 0.0, 1.0].view(), MatvecMode::Forward), array![4.0, 10.0]);
/// assert_eq!(dense_matvec(&c.view(), &array![1.0, 1.0].view(), MatvecMode::Transposed), array![5.0, 7.0, 9.0]);
/// ```
pub fn dense_matvec<T>(c: &ArrayView2<T>, f: &ArrayView1<T>, mode: MatvecMode) -> Array1<T>
where
    T: Clone + Num,
{
    let (rows, cols) = c.dim();
    match mode {
        MatvecMode::Forward => {
            assert_eq!(f.len(), cols, "input length must equal column count");
            Array1::from_shape_fn(rows, |i| {
                let mut acc = T::zero();
                for j in 0..cols {
                    acc = acc + c[[i, j]].clone() * f[j].clone();
                }
                acc
            })
        }
        MatvecMode::Transposed => {
            assert_eq!(f.len(), rows, "input length must equal row count");
            Array1::from_shape_fn(cols, |j| {
                let mut acc = T::zero();
                for i in 0..rows {
                    acc = acc + c[[i, j]].clone() * f[i].clone();
                }
                acc
            })
        }
    }
}

/// Expand a diagonal operator into its dense square matrix
pub fn diagonal_to_dense<T>(d: &ArrayView1<T>) -> Array2<T>
where
    T: Clone + Num,
{
    let n = d.len();
    let mut m = Array2::<T>::zeros((n, n));
    for (i, v) in d.iter().enumerate() {
        m[[i, i]] = v.clone();
    }
    m
}

/// Largest absolute element-wise difference; infinite on length mismatch
pub fn max_abs_diff<T>(a: &ArrayView1<T>, b: &ArrayView1<T>) -> T
where
    T: Float,
{
    if a.len() != b.len() {
        return T::infinity();
    }

    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| acc.max((x - y).abs()))
}

/// Check if two vectors are approximately equal within a tolerance
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::approx_equal_vec;
///
/// let a = array![1.0, 2.0, 3.0];
/// let b = array![1.0 + 1e-11, 2.0, 3.0];
/// assert!(approx_equal_vec(&a.view(), &b.view(), 1e-10));
/// assert!(!approx_equal_vec(&a.view(), &b.view(), 1e-12));
/// ```
pub fn approx_equal_vec<T>(a: &ArrayView1<T>, b: &ArrayView1<T>, tol: T) -> bool
where
    T: Float,
{
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= tol)
}

/// Deterministic pseudo-random matrix with values in `[min, max]`
///
/// Reproducible across runs, which keeps benchmark inputs and failing test
/// cases stable.
///
/// # Examples
///
/// ```
/// use kronop_kernels::random_matrix;
///
/// let matrix = random_matrix::<f64>(10, 20, 0.0, 1.0);
/// assert_eq!(matrix.shape(), &[10, 20]);
/// assert!(matrix.iter().all(|&v| (0.0..=1.0).contains(&v)));
/// ```
pub fn random_matrix<T>(rows: usize, cols: usize, min: T, max: T) -> Array2<T>
where
    T: Float,
{
    Array2::from_shape_fn((rows, cols), |(i, j)| pseudo_random(i * 31 + j * 17, min, max))
}

/// Deterministic pseudo-random vector with values in `[min, max]`
pub fn random_vector<T>(len: usize, min: T, max: T) -> Array1<T>
where
    T: Float,
{
    Array1::from_shape_fn(len, |i| pseudo_random(i * 13 + 7, min, max))
}

fn pseudo_random<T: Float>(seed: usize, min: T, max: T) -> T {
    let normalized = ((seed as f64).sin().abs() * 1000.0).fract();
    min + T::from(normalized).unwrap_or_else(T::zero) * (max - min)
}
