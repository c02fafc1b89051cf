//! Pipeline error type

use crate::lexical::LexerError;

/// Errors surfaced by the high-level processing pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("lexical analysis failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_creation() {
        let error = PipelineError::pipeline_error("Test error");
        match error {
            PipelineError::Pipeline { message } => assert_eq!(message, "Test error"),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_lexical_error_wraps() {
        let error = PipelineError::from(LexerError::UnbalancedFileMarkers { line: 3 });
        assert!(error.to_string().contains("lexical analysis failed"));
    }
}
