pub mod dataset;
pub mod global_variables;
pub mod models;
pub mod monitoring;
pub mod persistence;
pub mod prediction;
pub mod routes;
pub mod scoring;
pub mod shared_data;
pub mod weather;
