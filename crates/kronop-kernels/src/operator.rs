//! Kronecker operator dispatch
//!
//! [`KronOperator`] is the single entry point for applying a two- or
//! three-factor Kronecker operator. Its variants fix both the factor count
//! and the representation shared by all factors, so an operator mixing dense
//! and diagonal factors, or with an unsupported factor count, cannot be
//! constructed. Dispatch is an exhaustive `match`.

use std::fmt;

use scirs2_core::ndarray_ext::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut1};
use scirs2_core::numeric::Num;

use crate::build::{kronecker, kronecker3, kronecker_diag, kronecker_diag3};
use crate::config::MatvecConfig;
use crate::error::KernelResult;
use crate::matvec2::{kron_matvec, kron_matvec_diag, kron_matvec_diag_with, kron_matvec_with, two_factor_work};
use crate::matvec3::{
    kron3_matvec, kron3_matvec_diag, kron3_matvec_diag_with, kron3_matvec_with, three_factor_work,
};
use crate::shape::{matvec_lengths, FactorDims, MatvecMode};
use crate::utils::diagonal_to_dense;

/// A single Kronecker factor, tagged by representation
#[derive(Debug, Clone, Copy)]
pub enum Factor<'a, T> {
    /// Dense matrix
    Dense(ArrayView2<'a, T>),
    /// Diagonal of an implicit square matrix
    Diagonal(ArrayView1<'a, T>),
}

impl<T> Factor<'_, T> {
    /// Row count; the length for a diagonal factor
    pub fn nrows(&self) -> usize {
        match self {
            Factor::Dense(m) => m.nrows(),
            Factor::Diagonal(d) => d.len(),
        }
    }

    /// Column count; the length for a diagonal factor
    pub fn ncols(&self) -> usize {
        match self {
            Factor::Dense(m) => m.ncols(),
            Factor::Diagonal(d) => d.len(),
        }
    }

    /// (rows, cols)
    pub fn dims(&self) -> FactorDims {
        (self.nrows(), self.ncols())
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(self, Factor::Diagonal(_))
    }
}

/// Kronecker product of two or three factors sharing one representation
///
/// Factors are borrowed; the operator itself is a cheap value that can be
/// rebuilt for every call.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{array, Array1};
/// use kronop_kernels::{KronOperator, MatvecMode};
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let b = array![[1.0, 0.0], [0.0, 1.0]];
/// let op = KronOperator::dense(a.view(), b.view());
/// assert_eq!((op.nrows(), op.ncols()), (4, 4));
///
/// let g = op.matvec(&array![1.0, 2.0, 3.0, 4.0].view(), MatvecMode::Forward).unwrap();
/// assert_eq!(g, op.to_dense().dot(&array![1.0, 2.0, 3.0, 4.0]));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum KronOperator<'a, T> {
    /// `A ⊗ B`, dense factors
    Dense2 {
        a: ArrayView2<'a, T>,
        b: ArrayView2<'a, T>,
    },
    /// `A ⊗ B ⊗ C`, dense factors
    Dense3 {
        a: ArrayView2<'a, T>,
        b: ArrayView2<'a, T>,
        c: ArrayView2<'a, T>,
    },
    /// `diag(a) ⊗ diag(b)`
    Diagonal2 {
        a: ArrayView1<'a, T>,
        b: ArrayView1<'a, T>,
    },
    /// `diag(a) ⊗ diag(b) ⊗ diag(c)`
    Diagonal3 {
        a: ArrayView1<'a, T>,
        b: ArrayView1<'a, T>,
        c: ArrayView1<'a, T>,
    },
}

impl<'a, T> KronOperator<'a, T> {
    pub fn dense(a: ArrayView2<'a, T>, b: ArrayView2<'a, T>) -> Self {
        KronOperator::Dense2 { a, b }
    }

    pub fn dense3(a: ArrayView2<'a, T>, b: ArrayView2<'a, T>, c: ArrayView2<'a, T>) -> Self {
        KronOperator::Dense3 { a, b, c }
    }

    pub fn diagonal(a: ArrayView1<'a, T>, b: ArrayView1<'a, T>) -> Self {
        KronOperator::Diagonal2 { a, b }
    }

    pub fn diagonal3(a: ArrayView1<'a, T>, b: ArrayView1<'a, T>, c: ArrayView1<'a, T>) -> Self {
        KronOperator::Diagonal3 { a, b, c }
    }

    /// Factors in Kronecker order (outermost first)
    pub fn factors(&self) -> Vec<Factor<'a, T>> {
        match self {
            KronOperator::Dense2 { a, b } => vec![Factor::Dense(a.clone()), Factor::Dense(b.clone())],
            KronOperator::Dense3 { a, b, c } => vec![
                Factor::Dense(a.clone()),
                Factor::Dense(b.clone()),
                Factor::Dense(c.clone()),
            ],
            KronOperator::Diagonal2 { a, b } => {
                vec![Factor::Diagonal(a.clone()), Factor::Diagonal(b.clone())]
            }
            KronOperator::Diagonal3 { a, b, c } => vec![
                Factor::Diagonal(a.clone()),
                Factor::Diagonal(b.clone()),
                Factor::Diagonal(c.clone()),
            ],
        }
    }

    /// Number of factors (2 or 3)
    pub fn num_factors(&self) -> usize {
        match self {
            KronOperator::Dense2 { .. } | KronOperator::Diagonal2 { .. } => 2,
            KronOperator::Dense3 { .. } | KronOperator::Diagonal3 { .. } => 3,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            KronOperator::Diagonal2 { .. } | KronOperator::Diagonal3 { .. }
        )
    }

    /// (rows, cols) of every factor
    pub fn factor_dims(&self) -> Vec<FactorDims> {
        self.factors().iter().map(Factor::dims).collect()
    }

    /// Row count of the implicit operator
    pub fn nrows(&self) -> usize {
        self.factors().iter().map(Factor::nrows).product()
    }

    /// Column count of the implicit operator
    pub fn ncols(&self) -> usize {
        self.factors().iter().map(Factor::ncols).product()
    }

    /// Required input length in `mode`
    pub fn input_len(&self, mode: MatvecMode) -> usize {
        matvec_lengths(&self.factor_dims(), mode).0
    }

    /// Output length produced in `mode`
    pub fn output_len(&self, mode: MatvecMode) -> usize {
        matvec_lengths(&self.factor_dims(), mode).1
    }

    /// Estimated scalar multiply-adds of one structured matvec in `mode`
    pub fn work_estimate(&self, mode: MatvecMode) -> usize {
        match self {
            KronOperator::Dense2 { a, b } => two_factor_work(a, b, mode),
            KronOperator::Dense3 { a, b, c } => three_factor_work(a, b, c, mode),
            KronOperator::Diagonal2 { .. } | KronOperator::Diagonal3 { .. } => self.nrows(),
        }
    }
}

impl<T> KronOperator<'_, T>
where
    T: Clone + Num,
{
    /// Apply the operator, writing `g = K·f` or `g = Kᵗ·f`
    ///
    /// Diagonal operators are self-adjoint and ignore `mode`. `g` is fully
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `f` or `g` has the wrong length, before
    /// `g` is touched.
    pub fn apply(
        &self,
        f: &ArrayView1<T>,
        g: &mut ArrayViewMut1<T>,
        mode: MatvecMode,
    ) -> KernelResult<()> {
        tracing::trace!(
            operator = %self,
            %mode,
            input_len = f.len(),
            output_len = g.len(),
            "apply kronecker operator"
        );

        match self {
            KronOperator::Dense2 { a, b } => kron_matvec(a, b, f, g, mode),
            KronOperator::Dense3 { a, b, c } => kron3_matvec(a, b, c, f, g, mode),
            KronOperator::Diagonal2 { a, b } => kron_matvec_diag(a, b, f, g),
            KronOperator::Diagonal3 { a, b, c } => kron3_matvec_diag(a, b, c, f, g),
        }
    }

    /// Apply the operator into a freshly allocated output vector
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `f` has the wrong length.
    pub fn matvec(&self, f: &ArrayView1<T>, mode: MatvecMode) -> KernelResult<Array1<T>> {
        let mut g = Array1::<T>::zeros(self.output_len(mode));
        self.apply(f, &mut g.view_mut(), mode)?;
        Ok(g)
    }

    /// Materialize the operator as a dense matrix
    ///
    /// Diagonal operators are expanded to their square dense form. Only
    /// sensible for small operators.
    pub fn to_dense(&self) -> Array2<T> {
        match self {
            KronOperator::Dense2 { a, b } => kronecker(a, b),
            KronOperator::Dense3 { a, b, c } => kronecker3(a, b, c),
            KronOperator::Diagonal2 { .. } | KronOperator::Diagonal3 { .. } => {
                diagonal_to_dense(&self.to_diagonal().view())
            }
        }
    }

    /// Diagonal of the operator
    ///
    /// Exact for diagonal operators. For dense operators this is the diagonal
    /// of the materialized product.
    pub fn to_diagonal(&self) -> Array1<T> {
        match self {
            KronOperator::Diagonal2 { a, b } => kronecker_diag(a, b),
            KronOperator::Diagonal3 { a, b, c } => kronecker_diag3(a, b, c),
            KronOperator::Dense2 { .. } | KronOperator::Dense3 { .. } => self.to_dense().diag().to_owned(),
        }
    }
}

impl<T> KronOperator<'_, T>
where
    T: Clone + Num + Send + Sync,
{
    /// [`KronOperator::apply`] with an explicit execution configuration
    ///
    /// # Errors
    ///
    /// Same as [`KronOperator::apply`].
    pub fn apply_with(
        &self,
        f: &ArrayView1<T>,
        g: &mut ArrayViewMut1<T>,
        mode: MatvecMode,
        config: &MatvecConfig,
    ) -> KernelResult<()> {
        tracing::trace!(
            operator = %self,
            %mode,
            strategy = %config.strategy,
            input_len = f.len(),
            output_len = g.len(),
            "apply kronecker operator"
        );

        match self {
            KronOperator::Dense2 { a, b } => kron_matvec_with(a, b, f, g, mode, config),
            KronOperator::Dense3 { a, b, c } => kron3_matvec_with(a, b, c, f, g, mode, config),
            KronOperator::Diagonal2 { a, b } => kron_matvec_diag_with(a, b, f, g, config),
            KronOperator::Diagonal3 { a, b, c } => kron3_matvec_diag_with(a, b, c, f, g, config),
        }
    }
}

impl<T> fmt::Display for KronOperator<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_diagonal() { "diagonal" } else { "dense" };
        let dims: Vec<String> = self
            .factor_dims()
            .iter()
            .map(|(r, c)| format!("{}x{}", r, c))
            .collect();
        write!(f, "{} [{}]", kind, dims.join(" ⊗ "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{approx_equal_vec, dense_matvec};
    use scirs2_core::ndarray_ext::array;

    #[test]
    fn test_dims_and_lengths() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((4, 5));
        let op = KronOperator::dense(a.view(), b.view());

        assert_eq!(op.num_factors(), 2);
        assert!(!op.is_diagonal());
        assert_eq!((op.nrows(), op.ncols()), (8, 15));
        assert_eq!(op.input_len(MatvecMode::Forward), 15);
        assert_eq!(op.output_len(MatvecMode::Forward), 8);
        assert_eq!(op.input_len(MatvecMode::Transposed), 8);
        assert_eq!(op.output_len(MatvecMode::Transposed), 15);
        assert_eq!(op.to_string(), "dense [2x3 ⊗ 4x5]");
    }

    #[test]
    fn test_factor_tags() {
        let a = array![1.0, 2.0];
        let b = array![3.0];
        let c = array![4.0, 5.0, 6.0];
        let op = KronOperator::diagonal3(a.view(), b.view(), c.view());

        let factors = op.factors();
        assert_eq!(factors.len(), 3);
        assert!(factors.iter().all(Factor::is_diagonal));
        assert_eq!(op.factor_dims(), vec![(2, 2), (1, 1), (3, 3)]);
        assert_eq!(op.to_string(), "diagonal [2x2 ⊗ 1x1 ⊗ 3x3]");
    }

    #[test]
    fn test_dispatch_dense2_both_modes() {
        let a = array![[1.0, 2.0, 0.0], [-1.0, 0.5, 3.0]];
        let b = array![[2.0, 1.0], [1.0, 1.0], [0.0, 4.0]];
        let op = KronOperator::dense(a.view(), b.view());
        let k = op.to_dense();

        for mode in [MatvecMode::Forward, MatvecMode::Transposed] {
            let f = Array1::from_shape_fn(op.input_len(mode), |i| i as f64 - 1.0);
            let g = op.matvec(&f.view(), mode).unwrap();
            let expected = dense_matvec(&k.view(), &f.view(), mode);
            assert!(approx_equal_vec(&g.view(), &expected.view(), 1e-12));
        }
    }

    #[test]
    fn test_dispatch_dense3() {
        let a = array![[1.0, 2.0]];
        let b = array![[1.0], [3.0]];
        let c = array![[2.0, -1.0], [0.0, 1.0]];
        let op = KronOperator::dense3(a.view(), b.view(), c.view());
        let k = op.to_dense();
        assert_eq!(k.dim(), (4, 4));

        for mode in [MatvecMode::Forward, MatvecMode::Transposed] {
            let f = Array1::from_shape_fn(op.input_len(mode), |i| (i + 1) as f64);
            let g = op.matvec(&f.view(), mode).unwrap();
            let expected = dense_matvec(&k.view(), &f.view(), mode);
            assert!(approx_equal_vec(&g.view(), &expected.view(), 1e-12));
        }
    }

    #[test]
    fn test_dispatch_diagonal_ignores_mode() {
        let a = array![2.0, 3.0];
        let b = array![5.0, 7.0];
        let op = KronOperator::diagonal(a.view(), b.view());
        let f = array![1.0, 1.0, 1.0, 1.0];

        let fwd = op.matvec(&f.view(), MatvecMode::Forward).unwrap();
        let trans = op.matvec(&f.view(), MatvecMode::Transposed).unwrap();
        assert_eq!(fwd, array![10.0, 14.0, 15.0, 21.0]);
        assert_eq!(fwd, trans);
        assert_eq!(op.to_diagonal(), array![10.0, 14.0, 15.0, 21.0]);
    }

    #[test]
    fn test_diagonal_to_dense_matches_dense_operator() {
        let a = array![2.0, 3.0];
        let b = array![5.0, 7.0, 1.0];
        let da = diagonal_to_dense(&a.view());
        let db = diagonal_to_dense(&b.view());

        let diag_op = KronOperator::diagonal(a.view(), b.view());
        let dense_op = KronOperator::dense(da.view(), db.view());
        assert_eq!(diag_op.to_dense(), dense_op.to_dense());
        assert_eq!(dense_op.to_diagonal(), diag_op.to_diagonal());
    }

    #[test]
    fn test_apply_rejects_bad_lengths() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[1.0, 0.0, 1.0]];
        let op = KronOperator::dense(a.view(), b.view());
        let f = Array1::<f64>::zeros(4);
        let mut g = Array1::<f64>::from_elem(2, 8.0);

        let err = op.apply(&f.view(), &mut g.view_mut(), MatvecMode::Forward).unwrap_err();
        assert_eq!(err.expected(), &[6, 2]);
        assert_eq!(err.actual(), &[4, 2]);
        assert!(g.iter().all(|&v| v == 8.0));

        assert!(op.matvec(&f.view(), MatvecMode::Forward).is_err());
    }

    #[test]
    fn test_apply_with_matches_apply() {
        let a = array![[1.0, 2.0], [3.0, 4.0], [0.0, 1.0]];
        let b = array![[2.0, 0.5]];
        let c = array![[1.0], [2.0]];
        let op = KronOperator::dense3(a.view(), b.view(), c.view());

        for config in [MatvecConfig::serial(), MatvecConfig::parallel()] {
            for mode in [MatvecMode::Forward, MatvecMode::Transposed] {
                let f = Array1::from_shape_fn(op.input_len(mode), |i| i as f64 * 0.5);
                let expected = op.matvec(&f.view(), mode).unwrap();
                let mut g = Array1::<f64>::zeros(op.output_len(mode));
                op.apply_with(&f.view(), &mut g.view_mut(), mode, &config).unwrap();
                assert!(approx_equal_vec(&g.view(), &expected.view(), 1e-12));
            }
        }
    }

    #[test]
    fn test_work_estimate_beats_explicit() {
        let a = Array2::<f64>::zeros((20, 20));
        let b = Array2::<f64>::zeros((30, 30));
        let op = KronOperator::dense(a.view(), b.view());
        let explicit = op.nrows() * op.ncols();
        assert!(op.work_estimate(MatvecMode::Forward) < explicit);
    }
}
