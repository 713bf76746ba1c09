//! DAXPY kernel primitives for daxpy-bench.

pub mod config;
pub mod daxpy;
pub mod data;
pub mod registry;
pub mod simd;
pub mod utils;

pub use config::*;
pub use daxpy::*;
pub use data::*;
pub use registry::*;
pub use simd::*;
pub use utils::*;
