use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("pattern for {category}_{subcategory} failed to compile: {source}")]
    PatternCompile {
        category: &'static str,
        subcategory: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("filter pattern failed to compile: {0}")]
    FilterPattern(#[from] regex::Error),

    #[error("invalid sender context field '{field}': {reason}")]
    InvalidSenderContext { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
