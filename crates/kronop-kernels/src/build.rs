//! Explicit Kronecker product construction
//!
//! For matrices A (m×n) and B (p×q), the product C = A ⊗ B has size (mp×nq)
//! and block (i, j) equal to `a_ij · B`. For diagonal operators the product is
//! again diagonal, with `c[i·len(b) + k] = a[i] · b[k]`.
//!
//! The structured kernels in [`crate::matvec2`] and [`crate::matvec3`] never
//! need these matrices. They exist for verification and for the callers that
//! genuinely need the explicit operator.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext`.

use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};
use scirs2_core::numeric::Num;

use crate::error::KernelResult;
use crate::shape::{check_diagonal_product, check_product};

/// Write the Kronecker product of two dense factors into `c`
///
/// `c` must have shape (rows(A)·rows(B)) × (cols(A)·cols(B)). It is fully
/// overwritten; its previous contents are never read.
///
/// Columns are produced in the order (jA, jB): column `jA·q + jB` of C is the
/// concatenation over iA of `A[iA, jA] · B[:, jB]`.
///
/// # Errors
///
/// Returns `ShapeMismatch` if `c` has the wrong shape. `c` is untouched in
/// that case.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array2};
/// use kronop_kernels::kron_build;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[1.0, 0.0], [0.0, 1.0]];
/// let mut c = Array2::<f64>::zeros((4, 4));
/// kron_build(&a.view(), &b.view(), &mut c.view_mut()).unwrap();
/// assert_eq!(c[[2, 0]], 3.0);
/// assert_eq!(c[[3, 3]], 4.0);
/// assert_eq!(c[[2, 1]], 0.0);
/// ```
pub fn kron_build<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    c: &mut ArrayViewMut2<T>,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_product("kron_build", &[a.dim(), b.dim()], c.dim())?;
    fill_dense_product(a, b, c);
    Ok(())
}

fn fill_dense_product<T>(a: &ArrayView2<T>, b: &ArrayView2<T>, c: &mut ArrayViewMut2<T>)
where
    T: Clone + Num,
{
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    for ja in 0..n {
        for jb in 0..q {
            let col = ja * q + jb;
            for ia in 0..m {
                let a_val = a[[ia, ja]].clone();
                let row0 = ia * p;
                for ib in 0..p {
                    c[[row0 + ib, col]] = a_val.clone() * b[[ib, jb]].clone();
                }
            }
        }
    }
}

/// Compute the Kronecker product of two matrices
///
/// For matrices A (m×n) and B (p×q), the result C = A ⊗ B has size (mp×nq).
///
/// ```text
/// [ a11*B  a12*B  ...  a1n*B ]
/// [ a21*B  a22*B  ...  a2n*B ]
/// [  ...    ...   ...   ...  ]
/// [ am1*B  am2*B  ...  amn*B ]
/// ```
///
/// # Complexity
///
/// Time: O(m * n * p * q)
/// Space: O(m * n * p * q)
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::kronecker;
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];  // 2×2
/// let b = array![[5.0, 6.0], [7.0, 8.0]];  // 2×2
/// let c = kronecker(&a.view(), &b.view());  // 4×4
/// assert_eq!(c.shape(), &[4, 4]);
/// assert_eq!(c[[0, 0]], 5.0);   // 1*5
/// assert_eq!(c[[1, 3]], 16.0);  // 2*8
/// ```
pub fn kronecker<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T>
where
    T: Clone + Num,
{
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    let mut result = Array2::<T>::zeros((m * p, n * q));
    fill_dense_product(a, b, &mut result.view_mut());
    result
}

/// Compute the Kronecker product with parallel execution
///
/// Block rows of the result (one per row of A) are filled in parallel.
/// Only worth it for large factors; the serial [`kronecker`] is usually
/// memory bound.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::{kronecker, kronecker_parallel};
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[5.0, 6.0], [7.0, 8.0]];
/// assert_eq!(kronecker_parallel(&a.view(), &b.view()), kronecker(&a.view(), &b.view()));
/// ```
#[cfg(feature = "parallel")]
pub fn kronecker_parallel<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T>
where
    T: Clone + Num + Send + Sync,
{
    use scirs2_core::ndarray_ext::Axis;
    use scirs2_core::parallel_ops::*;

    let (m, n) = a.dim();
    let (p, q) = b.dim();

    let mut result = Array2::<T>::zeros((m * p, n * q));
    if p == 0 {
        return result;
    }

    result
        .axis_chunks_iter_mut(Axis(0), p)
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut block_row)| {
            for j in 0..n {
                let a_val = a[[i, j]].clone();
                let block_col = j * q;
                for bi in 0..p {
                    for bj in 0..q {
                        block_row[[bi, block_col + bj]] = a_val.clone() * b[[bi, bj]].clone();
                    }
                }
            }
        });

    result
}

/// Kronecker product of three matrices, `A ⊗ (B ⊗ C)`
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::kronecker3;
///
/// let a = array![[2.0]];
/// let b = array![[1.0, 2.0]];
/// let c = array![[1.0], [3.0]];
/// let k = kronecker3(&a.view(), &b.view(), &c.view());
/// assert_eq!(k, array![[2.0, 4.0], [6.0, 12.0]]);
/// ```
pub fn kronecker3<T>(a: &ArrayView2<T>, b: &ArrayView2<T>, c: &ArrayView2<T>) -> Array2<T>
where
    T: Clone + Num,
{
    let bc = kronecker(b, c);
    kronecker(a, &bc.view())
}

/// Write the diagonal of the Kronecker product of two diagonal operators
///
/// `c[ia·len(b) + ib] = a[ia] · b[ib]`, which is exactly the diagonal of
/// `kronecker(diag(a), diag(b))`.
///
/// # Errors
///
/// Returns `ShapeMismatch` if `len(c) != len(a)·len(b)`; `c` is untouched.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::kron_build_diag;
///
/// let a = array![2.0, 3.0];
/// let b = array![5.0, 7.0];
/// let mut c = Array1::<f64>::zeros(4);
/// kron_build_diag(&a.view(), &b.view(), &mut c.view_mut()).unwrap();
/// assert_eq!(c, array![10.0, 14.0, 15.0, 21.0]);
/// ```
pub fn kron_build_diag<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    c: &mut ArrayViewMut1<T>,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_diagonal_product("kron_build_diag", &[a.len(), b.len()], c.len())?;
    fill_diagonal_product(a, b, c);
    Ok(())
}

fn fill_diagonal_product<T>(a: &ArrayView1<T>, b: &ArrayView1<T>, c: &mut ArrayViewMut1<T>)
where
    T: Clone + Num,
{
    let nb = b.len();
    for (ia, a_val) in a.iter().enumerate() {
        for (ib, b_val) in b.iter().enumerate() {
            c[ia * nb + ib] = a_val.clone() * b_val.clone();
        }
    }
}

/// Diagonal of the Kronecker product of two diagonal operators
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::array;
/// use kronop_kernels::kronecker_diag;
///
/// let c = kronecker_diag(&array![2.0, 3.0].view(), &array![5.0, 7.0].view());
/// assert_eq!(c, array![10.0, 14.0, 15.0, 21.0]);
/// ```
pub fn kronecker_diag<T>(a: &ArrayView1<T>, b: &ArrayView1<T>) -> Array1<T>
where
    T: Clone + Num,
{
    let mut result = Array1::<T>::zeros(a.len() * b.len());
    fill_diagonal_product(a, b, &mut result.view_mut());
    result
}

/// Diagonal of the Kronecker product of three diagonal operators
pub fn kronecker_diag3<T>(a: &ArrayView1<T>, b: &ArrayView1<T>, c: &ArrayView1<T>) -> Array1<T>
where
    T: Clone + Num,
{
    let bc = kronecker_diag(b, c);
    kronecker_diag(a, &bc.view())
}
