//! Path normalization for the file table
//!
//! The tokenizer consumes already-enumerated paths from the driver; it
//! only needs to store them in a normalized form and compare the names
//! arriving through `#file` markers against the table.

/// Normalize a path: drop `./` segments, resolve `a/../`, collapse
/// doubled separators. Purely textual, no filesystem access.
pub fn simplify_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    let mut leading_up = 0usize;
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.is_empty() {
                    leading_up += 1;
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    let mut out = String::new();
    if absolute {
        out.push('/');
    }
    for _ in 0..leading_up {
        out.push_str("../");
    }
    out.push_str(&parts.join("/"));
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Compare two file names the way the host filesystem does.
pub fn same_file_name(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_path() {
        assert_eq!(simplify_path("a/b/c.h"), "a/b/c.h");
        assert_eq!(simplify_path("./a/b.h"), "a/b.h");
        assert_eq!(simplify_path("a/./b.h"), "a/b.h");
        assert_eq!(simplify_path("a/x/../b.h"), "a/b.h");
        assert_eq!(simplify_path("a//b.h"), "a/b.h");
        assert_eq!(simplify_path("/usr/include/x.h"), "/usr/include/x.h");
        assert_eq!(simplify_path("../a.h"), "../a.h");
        assert_eq!(simplify_path("."), ".");
    }

    #[test]
    fn test_same_file_name() {
        assert!(same_file_name("a.h", "a.h"));
        #[cfg(not(windows))]
        assert!(!same_file_name("a.h", "A.H"));
    }
}
