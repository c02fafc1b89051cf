//! Consolidated error codes and classification system
//!
//! Single source of truth for all error and success codes emitted by
//! the tokenizer core, with their behavioral metadata in one place.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const STREAM_READ_FAILED: Code = Code::new("E101");
    pub const UNBALANCED_FILE_MARKERS: Code = Code::new("E102");
    pub const TOKEN_LIMIT_EXCEEDED: Code = Code::new("E103");
    pub const INCLUDE_DEPTH_EXCEEDED: Code = Code::new("E104");
}

/// Simplification pipeline codes
pub mod simplify {
    use super::Code;

    pub const FIXPOINT_LIMIT_REACHED: Code = Code::new("E201");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("S001");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("S010");
    pub const SIMPLIFICATION_COMPLETE: Code = Code::new("S011");
    pub const VARIABLE_IDS_ASSIGNED: Code = Code::new("S012");
    pub const FUNCTION_INDEX_COMPLETE: Code = Code::new("S013");
    pub const PIPELINE_COMPLETE: Code = Code::new("S014");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn metadata_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Internal error",
            },
            ErrorMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Initialization failure",
            },
            ErrorMetadata {
                code: "E101",
                category: "Lexical",
                severity: Severity::High,
                recoverable: true,
                requires_halt: false,
                description: "Source stream could not be read",
            },
            ErrorMetadata {
                code: "E102",
                category: "Lexical",
                severity: Severity::High,
                recoverable: true,
                requires_halt: false,
                description: "#endfile without matching #file marker",
            },
            ErrorMetadata {
                code: "E103",
                category: "Lexical",
                severity: Severity::High,
                recoverable: true,
                requires_halt: false,
                description: "Token count limit exceeded",
            },
            ErrorMetadata {
                code: "E104",
                category: "Lexical",
                severity: Severity::High,
                recoverable: true,
                requires_halt: false,
                description: "#file nesting depth limit exceeded",
            },
            ErrorMetadata {
                code: "E201",
                category: "Simplify",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Fixpoint iteration limit reached",
            },
        ];
        entries.into_iter().map(|m| (m.code, m)).collect()
    })
}

pub fn get_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    metadata_registry().get(code)
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code).map_or("Unknown error", |m| m.description)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code).map_or(Severity::Low, |m| m.severity)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code).map_or("General", |m| m.category)
}

pub fn requires_halt(code: &str) -> bool {
    get_metadata(code).map_or(false, |m| m.requires_halt)
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code).map_or(true, |m| m.recoverable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(lexical::UNBALANCED_FILE_MARKERS.as_str(), "E102");
        assert_eq!(format!("{}", system::INTERNAL_ERROR), "ERR001");
    }

    #[test]
    fn test_metadata_lookup() {
        assert_eq!(get_category("E102"), "Lexical");
        assert!(requires_halt("ERR001"));
        assert!(!requires_halt("E102"));
        assert!(is_recoverable("E103"));
        assert_eq!(get_description("ZZZ"), "Unknown error");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::Low);
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert_eq!(get_severity("E201"), Severity::Medium);
    }
}
