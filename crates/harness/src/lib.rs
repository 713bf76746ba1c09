//! Correctness checking, timing and reporting for DAXPY kernels.

pub mod checker;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod driver;
pub mod timing;

pub use checker::*;
#[cfg(feature = "cli")]
pub use cli::*;
pub use config::*;
pub use driver::*;
pub use timing::*;
