//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides trait definitions for building data pipelines
//! that extract a table from a source, transform it, and load it to a destination.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
