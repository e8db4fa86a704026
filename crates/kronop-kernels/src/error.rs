//! Error types for Kronecker operator kernels
//!
//! Every kernel in this crate can fail in exactly one way: the operands it was
//! handed do not have the dimensions the operation requires. That condition is
//! detected before any output buffer is written.

use thiserror::Error;

/// Error type for Kronecker kernel operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Operand dimensions are inconsistent with the factor dimensions
    ///
    /// `expected` and `actual` list the dimensions of every operand involved,
    /// in the order described by `context`.
    #[error("{operation}: shape mismatch - expected {expected:?}, got {actual:?}. {context}")]
    ShapeMismatch {
        operation: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
        context: String,
    },
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

impl KernelError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(
        operation: impl Into<String>,
        expected: Vec<usize>,
        actual: Vec<usize>,
        context: impl Into<String>,
    ) -> Self {
        KernelError::ShapeMismatch {
            operation: operation.into(),
            expected,
            actual,
            context: context.into(),
        }
    }

    /// Name of the operation that rejected its operands
    pub fn operation(&self) -> &str {
        match self {
            KernelError::ShapeMismatch { operation, .. } => operation,
        }
    }

    /// Dimensions the operation required
    pub fn expected(&self) -> &[usize] {
        match self {
            KernelError::ShapeMismatch { expected, .. } => expected,
        }
    }

    /// Dimensions that were actually supplied
    pub fn actual(&self) -> &[usize] {
        match self {
            KernelError::ShapeMismatch { actual, .. } => actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = KernelError::shape_mismatch(
            "kron_matvec",
            vec![6, 4],
            vec![5, 4],
            "operands: [input length, output length]",
        );

        let msg = format!("{}", err);
        assert!(msg.contains("kron_matvec"));
        assert!(msg.contains("shape mismatch"));
        assert!(msg.contains("[6, 4]"));
        assert!(msg.contains("[5, 4]"));
        assert!(msg.contains("input length"));
    }

    #[test]
    fn test_accessors() {
        let err = KernelError::shape_mismatch("kron_build", vec![4, 4], vec![4, 3], "");
        assert_eq!(err.operation(), "kron_build");
        assert_eq!(err.expected(), &[4, 4]);
        assert_eq!(err.actual(), &[4, 3]);
    }
}
