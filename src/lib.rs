pub mod config;
pub mod error;
pub mod fetch;
pub mod gradio;

pub use error::{Error, Result};
pub use fetch::fetch_model;
