pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod settings;

pub use error::{AppError, Result};
