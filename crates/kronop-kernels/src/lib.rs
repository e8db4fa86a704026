//! # kronop-kernels
//!
//! Structured matrix-vector products for Kronecker operators.
//!
//! **Version:** 0.1.0-alpha.1
//!
//! ## Overview
//!
//! Large operators over multi-dimensional grids (separable covariances,
//! regularizers, discretizations) often factor exactly as `A ⊗ B` or
//! `A ⊗ B ⊗ C` with small factors. This crate applies such operators and
//! their transposes without ever building the full matrix.
//!
//! **Key Features:**
//! - ✅ **Two-factor matvec** - `(A ⊗ B)·f` and `(A ⊗ B)ᵗ·f` in block form
//! - ✅ **Three-factor matvec** - outer factor wrapped around the two-factor kernel
//! - ✅ **Diagonal specializations** - O(n) elementwise scaling, no scratch space
//! - ✅ **Explicit products** - dense and diagonal Kronecker products for verification
//! - ✅ **Single dispatch point** - [`KronOperator`] covers every variant
//! - ✅ **Shape contracts** - every operation validates before writing output
//! - ✅ **Parallel execution** - output-block parallelism (feature-gated)
//!
//! ## Quick Start
//!
//! ```rust
//! use scirs2_core::ndarray_ext::{array, Array1};
//! use kronop_kernels::{kronecker, KronOperator, MatvecMode};
//!
//! let a = array![[1.0, 2.0], [3.0, 4.0]];
//! let b = array![[1.0, 0.0], [0.0, 1.0]];
//! let f = array![1.0, 2.0, 3.0, 4.0];
//!
//! // Structured product
//! let op = KronOperator::dense(a.view(), b.view());
//! let mut g = Array1::<f64>::zeros(op.output_len(MatvecMode::Forward));
//! op.apply(&f.view(), &mut g.view_mut(), MatvecMode::Forward).unwrap();
//!
//! // Same result as the explicit product
//! assert_eq!(g, kronecker(&a.view(), &b.view()).dot(&f));
//!
//! // Diagonal factors
//! let (da, db) = (array![2.0, 3.0], array![5.0, 7.0]);
//! let diag = KronOperator::diagonal(da.view(), db.view());
//! let g = diag.matvec(&array![1.0, 1.0, 1.0, 1.0].view(), MatvecMode::Forward).unwrap();
//! assert_eq!(g, array![10.0, 14.0, 15.0, 21.0]);
//! ```
//!
//! ## Usage Recommendations
//!
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `kron_matvec` | O(npq + mnp) | vs O(mnpq) explicit |
//! | `kron3_matvec` | nested | recursion onto `kron_matvec` |
//! | `kron_matvec_diag` | O(len) | self-adjoint, no mode |
//! | `kronecker` | O(mnpq) | verification / explicit use only |
//!
//! ## Features
//!
//! - `parallel` (default) - Enable parallel implementations using rayon
//! - `subscriber` - [`init_tracing`] installs a `tracing-subscriber`
//!
//! ## SciRS2 Integration
//!
//! This crate uses `scirs2-core` for all array operations and numerical
//! computations.

#![deny(warnings)]

pub mod build;
pub mod config;
pub mod error;
pub mod matvec2;
pub mod matvec3;
pub mod operator;
pub mod shape;
pub mod tracing_support;
pub mod utils;


// Re-exports
pub use build::*;
pub use config::{ExecutionStrategy, MatvecConfig};
pub use error::{KernelError, KernelResult};
pub use matvec2::{kron_matvec, kron_matvec_diag, kron_matvec_diag_with, kron_matvec_with};
pub use matvec3::{kron3_matvec, kron3_matvec_diag, kron3_matvec_diag_with, kron3_matvec_with};
pub use operator::{Factor, KronOperator};
pub use shape::*;
pub use tracing_support::{init_tracing, TracingConfig, TracingFormat};
pub use utils::*;
