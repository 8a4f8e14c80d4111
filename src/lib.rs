pub mod error;
pub mod observability;
pub mod report;
pub mod secdef;
pub mod source;

pub use error::{Result, SecdefError};
pub use secdef::{Aggregator, PassSummary, QueryResults, SecdefConfig};
pub use source::{FileSource, LineSource, MemorySource};
