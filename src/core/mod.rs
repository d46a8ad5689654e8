pub mod config;
pub mod types;

pub use config::ExtractorConfig;
pub use types::{AiExtraction, AiExtractor};
