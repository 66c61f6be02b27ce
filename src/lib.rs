pub mod dataset;
pub mod error;
pub mod filter;
pub mod index;

pub use dataset::{filter_dataset, DatasetLayout, DatasetReport};
pub use error::FilterError;
pub use filter::{filter_blocks, FilterStats};
pub use index::AlignmentIndex;
