//! Dimension contracts for Kronecker operators
//!
//! A Kronecker operator `A₁ ⊗ A₂ ⊗ … ⊗ Aₖ` with factor shapes (rᵢ × cᵢ) has
//! shape (∏ rᵢ × ∏ cᵢ). A diagonal factor of length n behaves as an (n × n)
//! factor. Every public kernel calls into this module before it writes
//! anything, so a failed check never leaves a partially updated output.

use std::fmt;

use crate::error::{KernelError, KernelResult};

/// (rows, cols) of a single factor
pub type FactorDims = (usize, usize);

/// Whether an operator is applied as-is or transposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatvecMode {
    /// `g = K · f`
    #[default]
    Forward,
    /// `g = Kᵗ · f`
    Transposed,
}

impl MatvecMode {
    /// Map the conventional `trans` flag onto a mode
    pub fn from_trans(trans: bool) -> Self {
        if trans {
            MatvecMode::Transposed
        } else {
            MatvecMode::Forward
        }
    }

    /// Returns `true` for [`MatvecMode::Transposed`]
    pub fn is_transposed(self) -> bool {
        matches!(self, MatvecMode::Transposed)
    }
}

impl fmt::Display for MatvecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatvecMode::Forward => write!(f, "forward"),
            MatvecMode::Transposed => write!(f, "transposed"),
        }
    }
}

/// Shape (rows, cols) of the Kronecker product of the given factors
///
/// # Examples
///
/// ```
/// use kronop_kernels::operator_dims;
///
/// assert_eq!(operator_dims(&[(2, 3), (4, 5)]), (8, 15));
/// assert_eq!(operator_dims(&[(2, 3), (4, 5), (1, 2)]), (8, 30));
/// ```
pub fn operator_dims(factors: &[FactorDims]) -> FactorDims {
    factors
        .iter()
        .fold((1, 1), |(rows, cols), &(r, c)| (rows * r, cols * c))
}

/// Required (input length, output length) of a matvec in the given mode
pub fn matvec_lengths(factors: &[FactorDims], mode: MatvecMode) -> (usize, usize) {
    let (rows, cols) = operator_dims(factors);
    match mode {
        MatvecMode::Forward => (cols, rows),
        MatvecMode::Transposed => (rows, cols),
    }
}

/// Dims of a factor set made entirely of diagonal operators
pub fn diagonal_dims(lengths: &[usize]) -> Vec<FactorDims> {
    lengths.iter().map(|&n| (n, n)).collect()
}

/// Check the input/output vector lengths of a structured matvec
///
/// # Errors
///
/// Returns [`KernelError::ShapeMismatch`] with
/// `expected = [input, output]` and `actual = [input_len, output_len]`
/// if either length disagrees with the factor dimensions.
///
/// # Examples
///
/// ```
/// use kronop_kernels::{check_matvec, MatvecMode};
///
/// let factors = [(2, 3), (4, 5)];
/// assert!(check_matvec("demo", &factors, MatvecMode::Forward, 15, 8).is_ok());
/// assert!(check_matvec("demo", &factors, MatvecMode::Transposed, 8, 15).is_ok());
/// assert!(check_matvec("demo", &factors, MatvecMode::Forward, 8, 15).is_err());
/// ```
pub fn check_matvec(
    operation: &str,
    factors: &[FactorDims],
    mode: MatvecMode,
    input_len: usize,
    output_len: usize,
) -> KernelResult<()> {
    let (expected_in, expected_out) = matvec_lengths(factors, mode);
    if expected_in == input_len && expected_out == output_len {
        return Ok(());
    }

    tracing::debug!(
        operation,
        %mode,
        ?factors,
        expected_in,
        expected_out,
        input_len,
        output_len,
        "rejecting matvec operands"
    );

    Err(KernelError::shape_mismatch(
        operation,
        vec![expected_in, expected_out],
        vec![input_len, output_len],
        format!(
            "{} mode with factors {:?}; operands are [input length, output length]",
            mode, factors
        ),
    ))
}

/// Check the input/output lengths of a diagonal structured matvec
///
/// Diagonal operators are square, so forward and transposed requirements
/// coincide: both lengths must equal the product of the factor lengths.
pub fn check_diagonal_matvec(
    operation: &str,
    lengths: &[usize],
    input_len: usize,
    output_len: usize,
) -> KernelResult<()> {
    check_matvec(
        operation,
        &diagonal_dims(lengths),
        MatvecMode::Forward,
        input_len,
        output_len,
    )
}

/// Check the destination shape of a materialized dense product
///
/// # Errors
///
/// Returns [`KernelError::ShapeMismatch`] with `expected = [rows, cols]` of
/// the product and `actual = [rows, cols]` of `dest`.
pub fn check_product(
    operation: &str,
    factors: &[FactorDims],
    dest: FactorDims,
) -> KernelResult<()> {
    let expected = operator_dims(factors);
    if expected == dest {
        return Ok(());
    }

    tracing::debug!(operation, ?factors, ?expected, ?dest, "rejecting product destination");

    Err(KernelError::shape_mismatch(
        operation,
        vec![expected.0, expected.1],
        vec![dest.0, dest.1],
        format!(
            "factors {:?}; operands are [destination rows, destination cols]",
            factors
        ),
    ))
}

/// Check the destination length of a materialized diagonal product
pub fn check_diagonal_product(
    operation: &str,
    lengths: &[usize],
    dest_len: usize,
) -> KernelResult<()> {
    let expected: usize = lengths.iter().product();
    if expected == dest_len {
        return Ok(());
    }

    tracing::debug!(operation, ?lengths, expected, dest_len, "rejecting diagonal destination");

    Err(KernelError::shape_mismatch(
        operation,
        vec![expected],
        vec![dest_len],
        format!(
            "diagonal factor lengths {:?}; operand is [destination length]",
            lengths
        ),
    ))
}
