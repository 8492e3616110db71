pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod merge;
pub mod pipeline;
pub mod validate;
pub mod writer;

pub use merge::{MergeOutcome, Merger, merge};
