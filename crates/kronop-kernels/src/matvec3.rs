//! Three-factor structured matrix-vector products
//!
//! `A ⊗ B ⊗ C` is the outer factor A wrapped around the two-factor operator
//! `B ⊗ C`. The dense kernel is therefore the same outer block loop used by
//! [`crate::matvec2`], with the two-factor kernel as its inner operator:
//!
//! ```text
//! g_i = Σ_j A[i, j] · ((B ⊗ C) · f_j)      forward
//! g_j = Σ_i A[i, j] · ((B ⊗ C)ᵗ · f_i)     transposed
//! ```
//!
//! Diagonal factors commute, so the diagonal kernel is a flat loop.

use scirs2_core::ndarray_ext::{ArrayView1, ArrayView2, ArrayViewMut1};
use scirs2_core::numeric::Num;

use crate::config::MatvecConfig;
use crate::error::KernelResult;
use crate::matvec2::{outer_factor_serial, outer_work, two_factor_serial, two_factor_work};
use crate::shape::{check_diagonal_matvec, check_matvec, matvec_lengths, MatvecMode};

fn three_factor_serial<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    c: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
) where
    T: Clone + Num,
{
    // Inner block lengths follow the mode: nrB·nrC intermediates forward,
    // ncB·ncC transposed.
    let (inner_in, inner_out) = matvec_lengths(&[b.dim(), c.dim()], mode);
    outer_factor_serial(a, f, g, mode, inner_in, inner_out, |x, y| {
        two_factor_serial(b, c, x, y, mode)
    });
}

pub(crate) fn three_factor_work<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    c: &ArrayView2<T>,
    mode: MatvecMode,
) -> usize {
    let (_, inner_out) = matvec_lengths(&[b.dim(), c.dim()], mode);
    outer_work(a, mode, inner_out, two_factor_work(b, c, mode))
}

/// Apply the Kronecker product of three dense factors to a vector
///
/// Computes `g = (A ⊗ B ⊗ C) · f` forward or `g = (A ⊗ B ⊗ C)ᵗ · f`
/// transposed. For factor shapes (rᵢ × cᵢ), forward mode needs
/// `len(f) = c_A·c_B·c_C` and `len(g) = r_A·r_B·r_C`; transposed mode swaps
/// the two.
///
/// # Errors
///
/// Returns `ShapeMismatch` if either vector length is wrong. `g` is not
/// modified in that case.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::{kron3_matvec, MatvecMode};
///
/// let a = array![[2.0]];
/// let b = array![[1.0, 1.0]];
/// let c = array![[1.0], [-1.0]];
/// let f = array![3.0, 4.0];
/// let mut g = Array1::<f64>::zeros(2);
///
/// kron3_matvec(&a.view(), &b.view(), &c.view(), &f.view(), &mut g.view_mut(), MatvecMode::Forward)
///     .unwrap();
/// assert_eq!(g, array![14.0, -14.0]);
/// ```
pub fn kron3_matvec<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    c: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_matvec(
        "kron3_matvec",
        &[a.dim(), b.dim(), c.dim()],
        mode,
        f.len(),
        g.len(),
    )?;
    three_factor_serial(a, b, c, f, g, mode);
    Ok(())
}

/// [`kron3_matvec`] with an explicit execution configuration
///
/// The parallel path parallelises over the blocks of A only; each inner
/// two-factor product runs serially on its worker.
///
/// # Errors
///
/// Same as [`kron3_matvec`].
pub fn kron3_matvec_with<T>(
    a: &ArrayView2<T>,
    b: &ArrayView2<T>,
    c: &ArrayView2<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    mode: MatvecMode,
    config: &MatvecConfig,
) -> KernelResult<()>
where
    T: Clone + Num + Send + Sync,
{
    check_matvec(
        "kron3_matvec",
        &[a.dim(), b.dim(), c.dim()],
        mode,
        f.len(),
        g.len(),
    )?;

    #[cfg(feature = "parallel")]
    {
        let work = three_factor_work(a, b, c, mode);
        if config.use_parallel(work) {
            tracing::debug!(%mode, work, "parallel three-factor matvec");
            let (inner_in, inner_out) = matvec_lengths(&[b.dim(), c.dim()], mode);
            crate::matvec2::outer_factor_parallel(a, f, g, mode, inner_in, inner_out, |x, y| {
                two_factor_serial(b, c, x, y, mode)
            });
            return Ok(());
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    three_factor_serial(a, b, c, f, g, mode);
    Ok(())
}

fn diagonal3_serial<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    c: &ArrayView1<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
) where
    T: Clone + Num,
{
    let (nb, nc) = (b.len(), c.len());
    for (ia, a_val) in a.iter().enumerate() {
        for (ib, b_val) in b.iter().enumerate() {
            let scale = a_val.clone() * b_val.clone();
            let base = (ia * nb + ib) * nc;
            for (ic, c_val) in c.iter().enumerate() {
                let k = base + ic;
                g[k] = scale.clone() * (c_val.clone() * f[k].clone());
            }
        }
    }
}

/// Apply the Kronecker product of three diagonal operators to a vector
///
/// Block (i, j) of length `len(c)` becomes `a[i]·b[j]·(c ⊙ f_ij)`.
///
/// # Errors
///
/// Returns `ShapeMismatch` unless `len(f) = len(g) = len(a)·len(b)·len(c)`.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::kron3_matvec_diag;
///
/// let a = array![2.0];
/// let b = array![1.0, 3.0];
/// let c = array![1.0, 10.0];
/// let f = array![1.0, 1.0, 1.0, 1.0];
/// let mut g = Array1::<f64>::zeros(4);
/// kron3_matvec_diag(&a.view(), &b.view(), &c.view(), &f.view(), &mut g.view_mut()).unwrap();
/// assert_eq!(g, array![2.0, 20.0, 6.0, 60.0]);
/// ```
pub fn kron3_matvec_diag<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    c: &ArrayView1<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
) -> KernelResult<()>
where
    T: Clone + Num,
{
    check_diagonal_matvec(
        "kron3_matvec_diag",
        &[a.len(), b.len(), c.len()],
        f.len(),
        g.len(),
    )?;
    diagonal3_serial(a, b, c, f, g);
    Ok(())
}

/// [`kron3_matvec_diag`] with an explicit execution configuration
///
/// # Errors
///
/// Same as [`kron3_matvec_diag`].
pub fn kron3_matvec_diag_with<T>(
    a: &ArrayView1<T>,
    b: &ArrayView1<T>,
    c: &ArrayView1<T>,
    f: &ArrayView1<T>,
    g: &mut ArrayViewMut1<T>,
    config: &MatvecConfig,
) -> KernelResult<()>
where
    T: Clone + Num + Send + Sync,
{
    check_diagonal_matvec(
        "kron3_matvec_diag",
        &[a.len(), b.len(), c.len()],
        f.len(),
        g.len(),
    )?;

    #[cfg(feature = "parallel")]
    if config.use_parallel(g.len()) {
        use scirs2_core::ndarray_ext::{Array2, Axis};
        use scirs2_core::parallel_ops::*;

        tracing::debug!(len = g.len(), "parallel three-factor diagonal matvec");

        let (nb, nc) = (b.len(), c.len());
        let mut out = Array2::<T>::zeros((a.len(), nb * nc));
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(ia, mut row)| {
                let offset = ia * nb * nc;
                for (ib, b_val) in b.iter().enumerate() {
                    let scale = a[ia].clone() * b_val.clone();
                    for (ic, c_val) in c.iter().enumerate() {
                        let k = ib * nc + ic;
                        row[k] = scale.clone() * (c_val.clone() * f[offset + k].clone());
                    }
                }
            });
        for (dst, src) in g.iter_mut().zip(out.iter()) {
            *dst = src.clone();
        }
        return Ok(());
    }

    #[cfg(not(feature = "parallel"))]
    let _ = config;

    diagonal3_serial(a, b, c, f, g);
    Ok(())
}
