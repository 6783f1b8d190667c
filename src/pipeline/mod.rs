pub mod executor;

pub use executor::{JobRunner, ProgressCallback, RunReport};
