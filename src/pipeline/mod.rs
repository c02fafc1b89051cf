//! High-level pipeline API
//!
//! One call takes preprocessed source through the complete sequence:
//! tokenize -> variable identities -> simplify -> function index,
//! under the stream-aware logging context.

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::log_info;
use crate::logging;
use crate::tokenizer::Tokenizer;
use std::io::Read;
use std::time::Instant;

/// Process one preprocessed source stream through the full pipeline,
/// returning the populated tokenizer alongside run statistics.
pub fn process_source<R: Read>(
    code: R,
    filename: &str,
) -> Result<(Tokenizer, PipelineResult), PipelineError> {
    let start_time = Instant::now();

    logging::with_source_context(filename, || {
        log_info!("Starting source processing pipeline", "file" => filename);

        let mut tokenizer = Tokenizer::new();

        // Stage 1: lexical analysis and stream normalization
        tokenizer.tokenize(code, filename)?;

        // Stage 2: variable identities for the raw stream
        tokenizer.set_var_id();

        // Stage 3: simplification pipeline (rebuilds identities as it
        // rewrites declarations)
        if !tokenizer.simplify() {
            return Err(PipelineError::pipeline_error(
                "simplification fixpoint iteration limit reached",
            ));
        }

        // Stage 4: function index
        tokenizer.fill_function_list();

        let result = PipelineResult {
            token_count: tokenizer.list().len(),
            file_count: tokenizer.files().len(),
            function_count: tokenizer.function_tokens().len(),
            lexical_metrics: tokenizer.lexical_metrics().clone(),
            total_duration: start_time.elapsed(),
        };
        result.log_success(filename);

        Ok((tokenizer, result))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_source() {
        let source = "int x = 5; void f() { }\n";
        let (tokenizer, result) = process_source(source.as_bytes(), "input.c").expect("pipeline");
        assert_eq!(result.file_count, 1);
        assert_eq!(result.function_count, 1);
        assert_eq!(result.token_count, tokenizer.list().len());
        assert_eq!(
            tokenizer.list().to_text(),
            "int x ; x = 5 ; void f ( ) { }"
        );
    }

    #[test]
    fn test_process_source_propagates_lexer_error() {
        let result = process_source("#endfile\n".as_bytes(), "input.c");
        assert!(matches!(result, Err(PipelineError::Lexical(_))));
    }
}
