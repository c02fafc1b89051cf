//! CCA Tokenizer Core
//!
//! The tokenization and normalization core of the CCA static analyzer
//! for C/C++-like source. Raw preprocessed text becomes a linear,
//! mutable token stream; a fixed pipeline of rewrite passes then
//! canonicalizes the stream so the checkers can pattern-match on a
//! small, regular vocabulary.

// ============================================================================
// PUBLIC API - High-Level Interface
// ============================================================================

/// High-level pipeline API for processing source streams
pub mod pipeline;

/// Configuration system (compile-time constants + runtime preferences)
pub mod config;

// ============================================================================
// PUBLIC API - Core Types
// ============================================================================

/// The tokenizer owning the stream and its side tables
pub mod tokenizer;

/// Token stream data model and pattern-matching surface
pub mod tokens;

pub use lexical::LexicalMetrics;
pub use pipeline::{process_source, PipelineError, PipelineResult};
pub use tokenizer::Tokenizer;
pub use tokens::{Pattern, PatternAtom, Token, TokenId, TokenList};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub mod error {
    pub use crate::lexical::LexerError;
    pub use crate::pipeline::PipelineError;
}

// ============================================================================
// INTERNAL MODULES (Not part of public API)
// ============================================================================

mod functions;
mod lexical;
mod simplify;
mod utils;
mod varid;

/// Global logging subsystem; the `log_*!` macros route through it
#[macro_use]
pub mod logging;

// ============================================================================
// LIBRARY INFORMATION
// ============================================================================

/// Simplified-stream vocabulary version
pub const STREAM_VERSION: &str = "1.0.0";

/// Tokenizer implementation version
pub const TOKENIZER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library capability information
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub stream_version: &'static str,
    pub tokenizer_version: &'static str,
    pub pipeline_stages: u8,
}

/// Get library information
pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        stream_version: STREAM_VERSION,
        tokenizer_version: TOKENIZER_VERSION,
        pipeline_stages: 4,
    }
}

impl LibraryInfo {
    pub fn summary(&self) -> String {
        format!(
            "CCA Tokenizer v{} (Stream: v{}), {} pipeline stages",
            self.tokenizer_version, self.stream_version, self.pipeline_stages
        )
    }
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the tokenizer library
///
/// Call this once at application startup to initialize logging and
/// validate configuration.
pub fn init() -> Result<(), String> {
    logging::init_global_logging()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_info() {
        let info = get_library_info();
        assert_eq!(info.pipeline_stages, 4);
        assert!(info.summary().contains("CCA Tokenizer"));
    }
}
