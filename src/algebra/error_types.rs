use thiserror::Error;

/// Error type returned by dense factorization routines.
#[derive(Error, Debug)]
pub enum DenseFactorizationError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Cholesky factorization failed.  The matrix is not positive definite.
    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,
}
