//! Event system for tokenizer logging

use super::codes::{self, Code};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    /// Origin tag in `[path:line]` form, when a token is in scope
    pub location: Option<String>,
    pub context: HashMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: message.to_string(),
            location: None,
            context: HashMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, error_code, message)
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self::new(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create warning with specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Warning, warning_code, message)
    }

    /// Create a new info event (info may not need codes)
    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Add an origin tag
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    pub fn is_debug(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    /// Human-readable single-line format
    pub fn format(&self) -> String {
        let mut out = format!("[{} {}] {}", self.level.as_str(), self.code, self.message);
        if let Some(location) = &self.location {
            out.push(' ');
            out.push_str(location);
        }
        if !self.context.is_empty() {
            let mut keys: Vec<&String> = self.context.keys().collect();
            keys.sort();
            let pairs: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}={}", k, self.context[k]))
                .collect();
            out.push_str(&format!(" ({})", pairs.join(", ")));
        }
        out
    }

    /// JSON format for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let millis = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let value = serde_json::json!({
            "timestamp_ms": millis,
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "location": self.location,
            "context": self.context,
        });
        serde_json::to_string(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_event_construction() {
        let event = LogEvent::error(codes::lexical::UNBALANCED_FILE_MARKERS, "bad marker")
            .with_location("[a.c:3]")
            .with_context("line", "3");
        assert!(event.is_error());
        assert_eq!(event.category(), "Lexical");
        assert_eq!(event.location.as_deref(), Some("[a.c:3]"));
        assert_eq!(event.context.get("line").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_format() {
        let event = LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "done")
            .with_context("tokens", "12");
        let text = event.format();
        assert!(text.contains("[INFO S010] done"));
        assert!(text.contains("tokens=12"));
    }

    #[test]
    fn test_format_json() {
        let event = LogEvent::debug("probe").with_context("k", "v");
        let json = event.format_json().unwrap();
        assert!(json.contains("\"level\":\"DEBUG\""));
        assert!(json.contains("\"k\":\"v\""));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Debug);
        assert!(LogLevel::Info <= LogLevel::Debug);
    }
}
