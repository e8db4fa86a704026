//! Two-factor structured matrix-vector products
//!
//! Applies `K = A ⊗ B` (or `Kᵗ`) to a vector without forming K. For A (m×n)
//! and B (p×q), the forward product splits `f` into n blocks of length q,
//! applies B to each block, and accumulates `A[i, j] · (B f_j)` into output
//! block i:
//!
//! ```text
//! g_i = Σ_j A[i, j] · (B · f_j)          forward,    len(f) = nq, len(g) = mp
//! g_j = Σ_i A[i, j] · (Bᵗ · f_i)         transposed, len(f) = mp, len(g) = nq
//! ```
//!
//! Work drops from O(mnpq) for the explicit product to O(npq + mnp).
//!
//! The outer loop over A does not care what the inner operator is. It is
//! shared with [`crate::matvec3`], where the inner operator is itself a
//! two-factor product.

use scirs2_core::ndarray_ext::{s, Array1, ArrayView1, ArrayView2, ArrayViewMut1};
use scirs2_core::numeric::Num;

use crate::config::MatvecConfig;
use crate::error::KernelResult;
use crate::shape::{check_diagonal_matvec, check_matvec, matvec_lengths, MatvecMode};

/// Number of (input, output) blocks the outer factor splits a vector into
fn outer_block_counts<T>(a: &ArrayView2<T>, mode: MatvecMode) -> (usize, usize) {
    let (rows, cols) = a.dim();
    match mode {
        MatvecMode::Forward => (cols, rows),
        MatvecMode::Transposed => (rows, cols),
    }
}

/// Weight with which input block `o_in` contributes to output block `o_out`
#[inline]
fn outer_weight<T: Clone>(a: &ArrayView2<T>, mode: MatvecMode, o_in: usize, o_out: usize) -> T {
    match mode {
        MatvecMode::Forward => a[[o_out, o_in]].clone(),
        MatvecMode::Transposed => a[[o_in, o_out]].clone(),
    }
}

/// Estimated multiply-adds of an outer loop around an inner operator
pub(crate) fn outer_work<T>(
    a: &ArrayView2<T>,
    mode: MatvecMode,
    inner_out: usize,
    inner_work: usize,
) -> usize {
    let (n_in, _) = outer_block_counts(a, mode);
    a.len() * inner_out + n_in * inner_work
}

/// Outer factor loop, serial
///
/// `inner` maps an input block of length `inner_in` to an intermediate block
/// of length `inner_out`, overwriting its output. Those lengths are the inner
/// operator's requirements in `mode`, so the scratch block is sized for the
/// row product in forward mode and the column product in transposed mode.
///
/// Callers must have validated `f` and `g` already.
pub(crate) fn outer_factor_serial<T, F>(
    a: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
    inner_in: usize,
    inner_out: usize,
    mut inner: F,
) where
    T: Clone + Num,
    F: FnMut(&ArrayView1<T>, &mut ArrayViewMut1<T>),
{
    let (n_in, n_out) = outer_block_counts(a, mode);

    g.fill(T::zero());
    let mut scratch = Array1::<T>::zeros(inner_out);

    for o_in in 0..n_in {
        let block = f.slice(s![o_in * inner_in..(o_in + 1) * inner_in]);
        inner(&block, &mut scratch.view_mut());

        for o_out in 0..n_out {
            let w = outer_weight(a, mode, o_in, o_out);
            let mut out = g.slice_mut(s![o_out * inner_out..(o_out + 1) * inner_out]);
            for (dst, src) in out.iter_mut().zip(scratch.iter()) {
                *dst = dst.clone() + w.clone() * src.clone();
            }
        }
    }
}

/// Outer factor loop, parallel over output blocks
///
/// Running the serial loop in parallel over input blocks would have every
/// task writing every output block. Instead, all intermediate blocks are
/// computed first (independent per input block), then each output block is
/// reduced on its own from those intermediates.
#[cfg(feature = "parallel")]
pub(crate) fn outer_factor_parallel<T, F>(
    a: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
    inner_in: usize,
    inner_out: usize,
    inner: F,
) where
    T: Clone + Num + Send + Sync,
    F: Fn(&ArrayView1<T>, &mut ArrayViewMut1<T>) + Sync,
{
    use scirs2_core::ndarray_ext::{Array2, Axis};
    use scirs2_core::parallel_ops::*;

    let (n_in, n_out) = outer_block_counts(a, mode);

    let mut stage = Array2::<T>::zeros((n_in, inner_out));
    stage
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(o_in, mut row)| {
            let block = f.slice(s![o_in * inner_in..(o_in + 1) * inner_in]);
            inner(&block, &mut row);
        });

    let mut reduced = Array2::<T>::zeros((n_out, inner_out));
    reduced
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(o_out, mut out)| {
            for (o_in, intermediate) in stage.outer_iter().enumerate() {
                let w = outer_weight(a, mode, o_in, o_out);
                for (dst, src) in out.iter_mut().zip(intermediate.iter()) {
                    *dst = dst.clone() + w.clone() * src.clone();
                }
            }
        });

    for (dst, src) in g.iter_mut().zip(reduced.iter()) {
        *dst = src.clone();
    }
}

/// `y = M·x` (forward) or `y = Mᵗ·x` (transposed); `y` is overwritten
pub(crate) fn apply_dense_factor<T>(
    m: &ArrayView2<T>,
    x: &ArrayView1<T>,
    y: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
) where
    T: Clone + Num,
{
    match mode {
        MatvecMode::Forward => {
            for (yi, row) in y.iter_mut().zip(m.rows()) {
                let mut acc = T::zero();
                for (mv, xv) in row.iter().zip(x.iter()) {
                    acc = acc + mv.clone() * xv.clone();
                }
                *yi = acc;
            }
        }
        MatvecMode::Transposed => {
            // Row vector times M, walking M row by row
            y.fill(T::zero());
            for (xv, row) in x.iter().zip(m.rows()) {
                for (yj, mv) in y.iter_mut().zip(row.iter()) {
                    *yj = yj.clone() + xv.clone() * mv.clone();
                }
            }
        }
    }
}

pub(crate) fn two_factor_serial<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
) where
    T: Clone + Num,
{
    let (inner_in, inner_out) = matvec_lengths(&[b.dim()], mode);
    outer_factor_serial(a, f, g, mode, inner_in, inner_out, |x, y| {
        apply_dense_factor(b, x, y, mode)
    });
}

pub(crate) fn two_factor_work<T>(a: &ArrayView2<T>, b: &ArrayView2<T>, mode: MatvecMode) -> usize {
    let (_, inner_out) = matvec_lengths(&[b.dim()], mode);
    outer_work(a, mode, inner_out, b.len())
}

/// Apply the Kronecker product of two dense factors to a vector
///
/// Computes `g = (A ⊗ B) · f` in [`MatvecMode::Forward`] and
/// `g = (A ⊗ B)ᵗ · f` in [`MatvecMode::Transposed`], without forming the
/// product matrix and without storing any transpose.
///
/// # Arguments
///
/// * `a` - Outer factor (m×n)
/// * `b` - Inner factor (p×q)
/// * `f` - Input vector: length nq forward, mp transposed
/// * `g` - Output vector: length mp forward, nq transposed. Fully overwritten.
/// * `mode` - Forward or transposed
///
/// # Errors
///
/// Returns `ShapeMismatch` if either vector length is wrong. `g` is not
/// modified in that case.
///
/// # Complexity
///
/// Time: O(npq + mnp) forward, O(mpq + mnq) transposed
/// Space: one scratch block of length p (forward) or q (transposed)
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::{kron_matvec, MatvecMode};
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[1.0, 0.0], [0.0, 1.0]];
/// let f = array![1.0, 2.0, 3.0, 4.0];
/// let mut g = Array1::<f64>::zeros(4);
///
/// kron_matvec(&a.view(), &b.view(), &f.view(), &mut g.view_mut(), MatvecMode::Forward).unwrap();
/// assert_eq!(g, array![7.0, 10.0, 15.0, 22.0]);
/// ```
pub fn kron_matvec<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_matvec("kron_matvec", &[a.dim(), b.dim()], mode, f.len(), g.len())?;
    two_factor_serial(a, b, f, g, mode);
    Ok(())
}

/// [`kron_matvec`] with an explicit execution configuration
///
/// # Errors
///
/// Same as [`kron_matvec`].
pub fn kron_matvec_with<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
    config: &MatvecConfig,
) -> KernelResult<()>
where
    T: Clone + Num + Send + Sync,
{
    check_matvec("kron_matvec", &[a.dim(), b.dim()], mode, f.len(), g.len())?;

    #[cfg(feature = "parallel")]
    {
        let work = two_factor_work(a, b, mode);
        if config.use_parallel(work) {
            tracing::debug!(%mode, work, "parallel two-factor matvec");
            let (inner_in, inner_out) = matvec_lengths(&[b.dim()], mode);
            outer_factor_parallel(a, f, g, mode, inner_in, inner_out, |x, y| {
                apply_dense_factor(b, x, y, mode)
            });
            return Ok(());
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    two_factor_serial(a, b, f, g, mode);
    Ok(())
}

fn diagonal_serial<T>(a: &ArrayView1<T>, b: &ArrayView1<T>, f: &ArrayView1<T>, g: &mut ArrayViewMut1<T>)
where
    T: Clone + Num,
{
    let nb = b.len();
    for (ia, a_val) in a.iter().enumerate() {
        let base = ia * nb;
        for (ib, b_val) in b.iter().enumerate() {
            let k = base + ib;
            g[k] = a_val.clone() * (b_val.clone() * f[k].clone());
        }
    }
}

/// Apply the Kronecker product of two diagonal operators to a vector
///
/// Output block i is `a[i] · (b ⊙ f_i)`. Diagonal operators are
/// self-adjoint, so there is no transposed variant.
///
/// # Errors
///
/// Returns `ShapeMismatch` unless `len(f) = len(g) = len(a)·len(b)`; `g` is
/// not modified in that case.
///
/// # Complexity
///
/// Time: O(len(a)·len(b)), no scratch space
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::kron_matvec_diag;
///
/// let a = array![2.0, 3.0];
/// let b = array![5.0, 7.0];
/// let f = array![1.0, 1.0, 1.0, 1.0];
/// let mut g = Array1::<f64>::zeros(4);
/// kron_matvec_diag(&a.view(), &b.view(), &f.view(), &mut g.view_mut()).unwrap();
/// assert_eq!(g, array![10.0, 14.0, 15.0, 21.0]);
/// ```
pub fn kron_matvec_diag<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_diagonal_matvec("kron_matvec_diag", &[a.len(), b.len()], f.len(), g.len())?;
    diagonal_serial(a, b, f, g);
    Ok(())
}

/// [`kron_matvec_diag`] with an explicit execution configuration
///
/// # Errors
///
/// Same as [`kron_matvec_diag`].
pub fn kron_matvec_diag_with<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    config: &MatvecConfig,
) -> KernelResult<()>
where
    T: Clone + Num + Send + Sync,
{
    check_diagonal_matvec("kron_matvec_diag", &[a.len(), b.len()], f.len(), g.len())?;

    #[cfg(feature = "parallel")]
    if config.use_parallel(g.len()) {
        use scirs2_core::ndarray_ext::{Array2, Axis};
        use scirs2_core::parallel_ops::*;

        tracing::debug!(len = g.len(), "parallel diagonal matvec");

        let nb = b.len();
        let mut out = Array2::<T>::zeros((a.len(), nb));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(ia, mut row)| {
                let a_val = a[ia].clone();
                for (ib, dst) in row.iter_mut().enumerate() {
                    *dst = a_val.clone() * (b[ib].clone() * f[ia * nb + ib].clone());
                }
            });
        for (dst, src) in g.iter_mut().zip(out.iter()) {
            *dst = src.clone();
        }
        return Ok(());
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    diagonal_serial(a, b, f, g);
    Ok(())
}
