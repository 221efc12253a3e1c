pub mod certifications;
pub mod clean;
pub mod config;
pub mod data;
pub mod error;
pub mod ratings;
pub mod releases;
pub mod report;
pub mod table;
pub mod tally;

pub use error::{Error, Result};
