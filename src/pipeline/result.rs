//! Pipeline result type

use crate::lexical::LexicalMetrics;
use crate::log_success;
use crate::logging::codes;
use std::time::Duration;

/// Summary of one full tokenize-and-simplify run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub token_count: usize,
    pub file_count: usize,
    pub function_count: usize,
    pub lexical_metrics: LexicalMetrics,
    pub total_duration: Duration,
}

impl PipelineResult {
    pub fn log_success(&self, file_path: &str) {
        log_success!(codes::success::PIPELINE_COMPLETE,
            "Source processing pipeline complete",
            "file" => file_path,
            "tokens" => self.token_count,
            "files" => self.file_count,
            "functions" => self.function_count,
            "duration_ms" => self.total_duration.as_secs_f64() * 1000.0
        );
    }
}
