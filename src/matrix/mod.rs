// Matrix data structures, generation, conversion, and validation

pub mod conversion;
pub mod csc;
pub mod csr;
pub mod dense;
pub mod generate;
pub mod validate;

pub use csc::CscMatrix;
pub use csr::CsrMatrix;
pub use dense::{DenseMatrix, Layout};
pub use generate::generate_random_dense;
pub use validate::validate_results;
