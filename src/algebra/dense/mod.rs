#![allow(non_snake_case)]

mod backend;
mod blaslike_traits;
mod block_concatenate;
mod cholesky;
mod core;
mod eigen;
mod lu;
mod matrix_math;
mod svd;

pub use backend::DenseFloatT;
pub use blaslike_traits::*;
pub use cholesky::*;
pub use eigen::*;
pub use lu::*;
pub use svd::*;
