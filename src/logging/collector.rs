//! Per-source error collection
//!
//! Events logged while a source context is active are grouped under
//! the stream's root path, normalized exactly like the tokenizer's
//! file-table entries. The collector's keys therefore line up with
//! `Tokenizer::files()[0]` of the stream that produced the events, and
//! a driver processing many translation units can print one summary
//! per stream instead of interleaved noise.

use super::events::LogEvent;
use crate::config::constants::compile_time;
use crate::utils::paths::simplify_path;
use std::collections::HashMap;
use std::sync::Mutex;

/// The source stream being processed on the current thread.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Normalized path of the stream; the same string becomes entry 0
    /// of the tokenizer's file table when the stream is tokenized.
    pub root_path: String,
}

impl SourceContext {
    /// Context for a stream declared as `filename`, normalized the way
    /// the lexer normalizes file-table entries.
    pub fn for_stream(filename: &str) -> Self {
        Self {
            root_path: simplify_path(filename),
        }
    }
}

/// Aggregated counts across all processed streams
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_streams: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

/// Thread-safe per-stream event collector
pub struct ErrorCollector {
    streams: Mutex<HashMap<String, Vec<LogEvent>>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
        }
    }

    /// Register a stream even if it never produces events
    pub fn record_context(&self, context: &SourceContext) {
        self.streams
            .lock()
            .unwrap()
            .entry(context.root_path.clone())
            .or_default();
    }

    /// Record an event against a stream's root path, bounded per stream
    pub fn record_event(&self, root_path: &str, event: LogEvent) {
        let mut streams = self.streams.lock().unwrap();
        let events = streams.entry(root_path.to_string()).or_default();
        if events.len() < compile_time::logging::MAX_EVENTS_PER_FILE {
            events.push(event);
        }
    }

    /// Errors recorded for a stream, looked up by its normalized root
    /// path (the file-table entry the tokenizer created for it)
    pub fn errors_for(&self, root_path: &str) -> Vec<LogEvent> {
        self.streams
            .lock()
            .unwrap()
            .get(&simplify_path(root_path))
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        summarize(&self.streams.lock().unwrap())
    }

    pub fn clear(&self) {
        self.streams.lock().unwrap().clear();
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(streams: &HashMap<String, Vec<LogEvent>>) -> ProcessingSummary {
    let mut summary = ProcessingSummary {
        total_streams: streams.len(),
        ..Default::default()
    };
    for events in streams.values() {
        summary.total_errors += events.iter().filter(|e| e.is_error()).count();
        summary.total_warnings += events.iter().filter(|e| e.is_warning()).count();
    }
    summary
}

/// Render collected errors in a cargo-style per-stream listing
pub fn format_collected_errors(collector: &ErrorCollector) -> String {
    let streams = collector.streams.lock().unwrap();
    let mut paths: Vec<&String> = streams.keys().collect();
    paths.sort();
    let mut out = String::new();
    for path in paths {
        let errors: Vec<&LogEvent> = streams[path].iter().filter(|e| e.is_error()).collect();
        if errors.is_empty() {
            continue;
        }
        out.push_str(&format!("{}:\n", path));
        for event in errors {
            out.push_str(&format!("  {}\n", event.format()));
        }
    }
    let summary = summarize(&streams);
    out.push_str(&format!(
        "{} stream(s), {} error(s), {} warning(s)\n",
        summary.total_streams, summary.total_errors, summary.total_warnings
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_context_normalizes_like_file_table() {
        let context = SourceContext::for_stream("./src/../a.c");
        assert_eq!(context.root_path, "a.c");
    }

    #[test]
    fn test_collects_per_stream() {
        let collector = ErrorCollector::new();
        collector.record_event(
            "a.c",
            LogEvent::error(codes::lexical::UNBALANCED_FILE_MARKERS, "bad"),
        );
        collector.record_event("a.c", LogEvent::warning("odd"));
        let summary = collector.get_summary();
        assert_eq!(summary.total_streams, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 1);
        assert_eq!(collector.errors_for("a.c").len(), 1);
    }

    #[test]
    fn test_lookup_accepts_unnormalized_path() {
        let collector = ErrorCollector::new();
        collector.record_context(&SourceContext::for_stream("./b.c"));
        collector.record_event(
            "b.c",
            LogEvent::error(codes::lexical::TOKEN_LIMIT_EXCEEDED, "too many"),
        );
        assert_eq!(collector.errors_for("./b.c").len(), 1);
    }

    #[test]
    fn test_format_lists_errors() {
        let collector = ErrorCollector::new();
        collector.record_event(
            "b.c",
            LogEvent::error(codes::lexical::TOKEN_LIMIT_EXCEEDED, "too many"),
        );
        let text = format_collected_errors(&collector);
        assert!(text.contains("b.c:"));
        assert!(text.contains("too many"));
        assert!(text.contains("1 error(s)"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_context(&SourceContext::for_stream("c.c"));
        assert_eq!(collector.get_summary().total_streams, 1);
        collector.clear();
        assert_eq!(collector.get_summary().total_streams, 0);
    }
}
