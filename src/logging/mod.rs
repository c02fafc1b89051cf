//! Global logging module for the tokenizer core
//!
//! Thread-safe global logging with per-stream event collection and a
//! clean macro interface. The core never renders user-facing
//! diagnostics itself; it emits coded events the surrounding analyzer
//! routes wherever it wants. Events carry the stream they came from
//! using the same normalized path the tokenizer stores in its file
//! table, so a checker can correlate a logged error with
//! `Tokenizer::files()` and `file_line()` output directly.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{ErrorCollector, ProcessingSummary, SourceContext};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

/// Logger and collector installed together, once per process. A single
/// cell keeps the pair consistent: either both are available or neither
/// is.
struct GlobalLogging {
    service: Arc<LoggingService>,
    collector: Arc<ErrorCollector>,
}

static GLOBAL: OnceLock<GlobalLogging> = OnceLock::new();

thread_local! {
    /// The stream currently being processed on this thread
    static SOURCE_CONTEXT: RefCell<Option<SourceContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let state = GlobalLogging {
        service: Arc::new(service::create_configured_service()),
        collector: Arc::new(ErrorCollector::new()),
    };

    // Validate error code system
    let test_codes = ["ERR001", "E101", "E102", "E103"];
    for &code in &test_codes {
        if codes::get_description(code) == "Unknown error" {
            return Err(format!("Missing metadata for error code: {}", code));
        }
    }

    GLOBAL
        .set(state)
        .map_err(|_| "Global logging already initialized")?;

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        ));
    }

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL
        .set(GlobalLogging {
            service,
            collector: Arc::new(ErrorCollector::new()),
        })
        .map_err(|_| "Global logging already initialized".to_string())
}

/// Check if global logging is initialized
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL.get().map(|state| state.service.as_ref())
}

/// Safe access to global error collector
pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL.get().map(|state| state.collector.as_ref())
}

// ============================================================================
// SOURCE CONTEXT MANAGEMENT
// ============================================================================

/// Mark `filename` as the stream being processed on this thread. The
/// name is normalized exactly like the root entry of the tokenizer's
/// file table, so events collected here group under the key a checker
/// later sees as `Tokenizer::files()[0]`.
pub fn set_source_context(filename: &str) {
    let context = SourceContext::for_stream(filename);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_context(&context);
    }

    SOURCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Detach the current thread from its stream
pub fn clear_source_context() {
    SOURCE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Run `f` with `filename` as the active stream, restoring the
/// detached state afterwards
pub fn with_source_context<F, R>(filename: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_source_context(filename);
    let result = f();
    clear_source_context();
    result
}

/// The stream the current thread is processing, if any
pub fn current_source_context() -> Option<SourceContext> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// EVENT DISPATCH
// ============================================================================

fn attach_source_context(mut event: LogEvent) -> LogEvent {
    if let Some(context) = current_source_context() {
        event = event.with_context("source", &context.root_path);
    }
    event
}

/// Route an event through the global logger, tagging it with the
/// thread's stream and filing errors under that stream's root path.
/// Used by the logging macros.
pub fn dispatch_event(event: LogEvent) {
    let event = attach_source_context(event);

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event.clone());
    }

    if event.is_error() {
        if let Some(context) = current_source_context() {
            if let Some(collector) = try_get_global_error_collector() {
                collector.record_event(&context.root_path, event);
            }
        }
    }
}

/// Log error with context (used by log_error! macro)
pub fn log_error_with_context(
    code: Code,
    message: &str,
    location: Option<&str>,
    context: Vec<(&str, &str)>,
) {
    let mut event = LogEvent::error(code, message);
    if let Some(loc) = location {
        event = event.with_location(loc);
    }
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

/// Log success with context (used by log_success! macro)
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::success(code, message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

/// Log info with context (used by log_info! macro)
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    let mut event = LogEvent::info(message);
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    dispatch_event(event);
}

// ============================================================================
// BATCH REPORTING
// ============================================================================

/// Get processing summary
pub fn get_processing_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(|collector| collector.get_summary())
        .unwrap_or_default()
}

/// Errors collected for one stream, looked up by its (possibly
/// unnormalized) declared filename
pub fn get_source_errors(filename: &str) -> Vec<LogEvent> {
    try_get_global_error_collector()
        .map(|collector| collector.errors_for(filename))
        .unwrap_or_default()
}

/// Clear all collected errors
pub fn clear_error_collection() {
    if let Some(collector) = try_get_global_error_collector() {
        collector.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_context_management() {
        clear_source_context();
        assert!(current_source_context().is_none());

        set_source_context("./test.c");
        let context = current_source_context();
        assert!(context.is_some());
        // the context key is the normalized file-table form
        assert_eq!(context.unwrap().root_path, "test.c");

        clear_source_context();
        assert!(current_source_context().is_none());
    }

    #[test]
    fn test_with_source_context() {
        let result = with_source_context("test.c", || {
            let context = current_source_context();
            assert!(context.is_some());
            assert_eq!(context.unwrap().root_path, "test.c");
            42
        });

        assert_eq!(result, 42);
        assert!(current_source_context().is_none());
    }

    #[test]
    fn test_dispatch_without_init_does_not_panic() {
        dispatch_event(LogEvent::info("uninitialized dispatch"));
        log_error_with_context(
            codes::system::INTERNAL_ERROR,
            "still fine",
            Some("[x.c:1]"),
            vec![("k", "v")],
        );
    }

    #[test]
    fn test_dispatch_tags_event_with_stream() {
        with_source_context("dir/./tagged.c", || {
            let event = attach_source_context(LogEvent::info("probe"));
            assert_eq!(
                event.context.get("source").map(String::as_str),
                Some("dir/tagged.c")
            );
        });
    }
}
