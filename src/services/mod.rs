// Service exports
pub mod dataset;

pub use dataset::{load_dataset, load_explicit, Dataset, DatasetError};
