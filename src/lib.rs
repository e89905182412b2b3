pub mod cli;
pub mod config;
pub mod error;
pub mod hqc;
pub mod suites;
pub mod test_utils;
pub mod testing;

pub use error::{HarnessError, Result};
pub use testing::ExitStatus;

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
