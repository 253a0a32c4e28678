//! core — containers and numerics underpinning multivariate estimation.
//!
//! Three leaf modules with no dependencies on the model layer:
//! [`data`] (validated observation container and window arithmetic),
//! [`layout`] (three-block parameter bookkeeping), and [`linalg`] (packing,
//! moments, inverse square roots, Cholesky helpers).

pub mod data;
pub mod layout;
pub mod linalg;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{resolve_window, TimeSeries};
pub use self::layout::ParamLayout;
pub use self::linalg::{
    chol_logdet_quad, covariance_of_rows, distinct_entries, second_moment,
    standardize_residuals, symmetric_invroot, unvech, vech, EIGEN_EPS,
};
