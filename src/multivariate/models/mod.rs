//! models — reference implementations of the collaborator traits.
//!
//! The estimation engine works against the capability traits in
//! [`crate::multivariate::traits`]; these modules supply the minimal
//! concrete set that makes it usable out of the box: zero/constant mean,
//! constant/EWMA covariance, and normal/Student-t errors.

pub mod distribution;
pub mod mean;
pub mod volatility;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::distribution::{MultivariateNormal, MultivariateStudentT};
pub use self::mean::{ConstantMean, ZeroMean};
pub use self::volatility::{ConstantCovariance, EwmaCovariance};
