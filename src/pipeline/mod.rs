//! Pipeline entry points for exporter operations.
//!
//! - `run_export`: Fetch, resolve, assemble, and write articles to CSV
//! - `run_check`: Validate credentials and API access

pub mod assemble;
pub mod check;
pub mod export;

pub use assemble::assemble;
pub use check::run_check;
pub use export::{export_with, run_export};
