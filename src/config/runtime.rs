// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to include the origin tag in lexer error events
    pub include_position_in_errors: bool,

    /// Whether to log token statistics after tokenization
    pub log_token_statistics: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            include_position_in_errors: env::var("CCA_LEXICAL_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_token_statistics: env::var("CCA_LEXICAL_LOG_TOKEN_STATS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifyPreferences {
    /// Whether to log each fixpoint iteration
    pub log_fixpoint_iterations: bool,

    /// Whether to log a summary after the pipeline completes
    pub log_pipeline_summary: bool,
}

impl Default for SimplifyPreferences {
    fn default() -> Self {
        Self {
            log_fixpoint_iterations: env::var("CCA_SIMPLIFY_LOG_ITERATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_pipeline_summary: env::var("CCA_SIMPLIFY_LOG_SUMMARY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
