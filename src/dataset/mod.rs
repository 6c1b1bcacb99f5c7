pub mod generator;
pub mod loader;

pub use generator::{ensure_dataset, generate_dataset};
pub use loader::{load_dataset, write_dataset, DatasetError};
