#![forbid(unsafe_code)]

pub mod cli;
pub mod document;
pub mod error;
pub mod output;
pub mod report;

pub use cli::run_from_env;
pub use error::{CliError, Result};
