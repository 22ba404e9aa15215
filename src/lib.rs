pub mod config;
pub mod error;
pub mod corpus;

pub use config::Config;
pub use error::{PrepError, Result};
pub use corpus::{RunOptions, RunSummary};
