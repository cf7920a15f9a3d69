use std::path::Path;

use faq_core::dataset;
use faq_core::model::FaqCollection;

use crate::error::AppError;

/// Load the FAQ collection from `path`, or the embedded dataset when `path` is `None`.
pub fn load_collection(path: Option<&Path>) -> Result<FaqCollection, AppError> {
    match path {
        Some(path) => load_collection_file(path),
        None => Ok(dataset::default_collection()),
    }
}

pub fn load_collection_file(path: &Path) -> Result<FaqCollection, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("failed to read {}: {e}", path.display())))?;
    parse_collection(&content)
}

/// Parse and validate dataset JSON, reporting syntax errors with their line number.
pub fn parse_collection(content: &str) -> Result<FaqCollection, AppError> {
    let categories = dataset::parse_categories(content).map_err(|e| AppError::Parse {
        line: e.line(),
        message: e.to_string(),
    })?;
    Ok(FaqCollection::new(categories)?)
}
