//! Core lexical analyzer
//!
//! Consumes a preprocessed byte stream plus its declared filename and
//! appends tokens to the stream, maintaining the virtual
//! include-expansion origin through `#file`/`#endfile` markers. Only
//! those two markers are interpreted; every other `#` line passes
//! through as one opaque token.

use crate::config::constants::compile_time::lexical::{MAX_INCLUDE_DEPTH, MAX_TOKEN_COUNT};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{Token, TokenList};
use crate::utils::numeric::parse_hex_after_prefix;
use crate::utils::paths::{same_file_name, simplify_path};
use crate::{log_debug, log_error, log_success};
use std::io::Read;

/// Bytes that terminate the current accumulator and form their own
/// one-byte token (doubled for `++`, `--` and `>>`).
const OPERATOR_BYTES: &[u8] = b"#+-*/%&|^?!=<>[](){};:,.~";

/// Lexical analysis errors
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("failed to read source stream: {0}")]
    Stream(#[from] std::io::Error),

    #[error("#endfile without matching #file at line {line}")]
    UnbalancedFileMarkers { line: u32 },

    #[error("too many tokens: {count} (max {max})")]
    TokenLimitExceeded { count: usize, max: usize },

    #[error("#file nesting too deep: {depth} (max {max})")]
    IncludeDepthExceeded { depth: usize, max: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::Stream(_) => codes::lexical::STREAM_READ_FAILED,
            LexerError::UnbalancedFileMarkers { .. } => codes::lexical::UNBALANCED_FILE_MARKERS,
            LexerError::TokenLimitExceeded { .. } => codes::lexical::TOKEN_LIMIT_EXCEEDED,
            LexerError::IncludeDepthExceeded { .. } => codes::lexical::INCLUDE_DEPTH_EXCEEDED,
        }
    }
}

/// Essential lexical analysis metrics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub name_tokens: usize,
    pub number_tokens: usize,
    pub string_literals: usize,
    pub char_literals: usize,
    pub operator_tokens: usize,
    pub max_include_depth: usize,
}

impl LexicalMetrics {
    fn record(&mut self, text: &str) {
        self.total_tokens += 1;
        let first = text.as_bytes()[0];
        if first == b'"' {
            self.string_literals += 1;
        } else if first == b'\'' {
            self.char_literals += 1;
        } else if first.is_ascii_digit() {
            self.number_tokens += 1;
        } else if first.is_ascii_alphabetic() || first == b'_' {
            self.name_tokens += 1;
        } else {
            self.operator_tokens += 1;
        }
    }

    fn record_include_depth(&mut self, depth: usize) {
        self.max_include_depth = self.max_include_depth.max(depth);
    }
}

/// Core lexical analyzer, borrowing the stream and file table it fills.
pub struct LexicalAnalyzer<'t> {
    list: &'t mut TokenList,
    files: &'t mut Vec<String>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl<'t> LexicalAnalyzer<'t> {
    pub fn new(list: &'t mut TokenList, files: &'t mut Vec<String>) -> Self {
        Self {
            list,
            files,
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(
        list: &'t mut TokenList,
        files: &'t mut Vec<String>,
        preferences: LexicalPreferences,
    ) -> Self {
        Self {
            list,
            files,
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize one byte stream. Bytes with the high bit set are
    /// dropped; the input is treated as plain 7-bit text.
    pub fn tokenize<R: Read>(&mut self, mut code: R, filename: &str) -> Result<(), LexerError> {
        let file = simplify_path(filename);
        let mut file_index = self.files.len();
        self.files.push(file.clone());

        log_debug!("Starting lexical analysis", "file" => file.as_str());

        let mut bytes = Vec::new();
        code.read_to_end(&mut bytes)?;

        // current accumulator and line counter of the file being read
        let mut cur = String::new();
        let mut lineno: u32 = 1;

        // origin stack driven by #file/#endfile markers
        let mut line_numbers: Vec<u32> = Vec::new();
        let mut file_indexes: Vec<usize> = Vec::new();

        let mut i = 0usize;
        while i < bytes.len() {
            if self.list.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TokenLimitExceeded {
                    count: self.list.len(),
                    max: MAX_TOKEN_COUNT,
                };
                self.log_lexer_error(&error, &file, lineno);
                return Err(error);
            }

            let ch = bytes[i];
            i += 1;

            if ch >= 0x80 {
                continue;
            }

            if ch == b'\n' {
                self.add_token(&cur, lineno, file_index);
                lineno += 1;
                cur.clear();
                continue;
            }

            // char/string literal: one token including both quotes,
            // honoring one-byte backslash escapes
            if ch == b'\'' || ch == b'"' {
                self.add_token(&cur, lineno, file_index);
                cur.clear();

                let quote = ch;
                let mut special = false;
                let mut c = quote;
                loop {
                    cur.push(c as char);
                    if c == b'\n' {
                        lineno += 1;
                    }
                    if special {
                        special = false;
                    } else {
                        special = c == b'\\';
                    }
                    match bytes.get(i) {
                        Some(&next) => {
                            i += 1;
                            c = next;
                        }
                        None => break,
                    }
                    if !special && c == quote {
                        break;
                    }
                }
                cur.push(quote as char);
                self.add_token(&cur, lineno, file_index);
                cur.clear();
                continue;
            }

            if ch == b'#' && cur.is_empty() {
                // a "#" token directly before this one fuses to "##"
                if self.list.simple_match(self.list.tail(), "#") {
                    let tail = self.list.tail().expect("matched tail");
                    self.list.set_text(tail, "##");
                    continue;
                }

                // read the rest of the logical line, honoring
                // backslash continuations that swallow the newline
                let mut line = String::from("#");
                let mut ch_prev = b'#';
                let mut fused = false;
                while i < bytes.len() {
                    let c = bytes[i];
                    i += 1;
                    if ch_prev != b'\\' && c == b'\n' {
                        break;
                    }
                    if ch_prev == b'\\' {
                        line.push(ch_prev as char);
                    }
                    if ch_prev == b'#' && c == b'#' {
                        self.add_token("##", lineno, file_index);
                        fused = true;
                        break;
                    }
                    if c != b' ' {
                        ch_prev = c;
                    }
                    if c != b'\\' && c != b'\n' {
                        line.push(c as char);
                    }
                    if c == b'\n' {
                        lineno += 1;
                    }
                }
                if fused {
                    continue;
                }

                if line.starts_with("#file") && line.contains('"') {
                    // extract the quoted path
                    let rest = &line[line.find('"').expect("checked above") + 1..];
                    let path = match rest.find('"') {
                        Some(pos) => &rest[..pos],
                        None => rest,
                    };

                    lineno += 1;
                    if file_indexes.len() >= MAX_INCLUDE_DEPTH {
                        let error = LexerError::IncludeDepthExceeded {
                            depth: file_indexes.len(),
                            max: MAX_INCLUDE_DEPTH,
                        };
                        self.log_lexer_error(&error, &file, lineno);
                        return Err(error);
                    }
                    file_indexes.push(file_index);

                    // reuse an existing table entry when the name is known
                    let mut found = false;
                    for (idx, known) in self.files.iter().enumerate() {
                        if same_file_name(known, path) {
                            found = true;
                            file_index = idx;
                        }
                    }
                    if !found {
                        self.files.push(simplify_path(path));
                        file_index = self.files.len() - 1;
                    }

                    line_numbers.push(lineno);
                    self.metrics.record_include_depth(line_numbers.len());
                    lineno = 1;
                    continue;
                } else if line.starts_with("#endfile") {
                    if line_numbers.is_empty() || file_indexes.is_empty() {
                        let error = LexerError::UnbalancedFileMarkers { line: lineno };
                        self.log_lexer_error(&error, &file, lineno);
                        return Err(error);
                    }
                    lineno = line_numbers.pop().expect("checked non-empty");
                    file_index = file_indexes.pop().expect("checked non-empty");
                    continue;
                } else {
                    // any other # line is one opaque token
                    self.add_token(&line, lineno, file_index);
                    continue;
                }
            }

            if OPERATOR_BYTES.contains(&ch) {
                let cur_bytes = cur.as_bytes();
                let float_continuation = ch == b'.'
                    && !cur_bytes.is_empty()
                    && cur_bytes[0].is_ascii_digit();
                let exponent_sign = (ch == b'+' || ch == b'-')
                    && !cur_bytes.is_empty()
                    && cur_bytes[0].is_ascii_digit()
                    && cur_bytes[cur_bytes.len() - 1] == b'e';
                if !float_continuation && !exponent_sign {
                    self.add_token(&cur, lineno, file_index);
                    cur.clear();
                    cur.push(ch as char);
                    // "++", "--" and ">>" stay one token
                    if (ch == b'+' || ch == b'-' || ch == b'>') && bytes.get(i) == Some(&ch) {
                        cur.push(ch as char);
                        i += 1;
                    }
                    self.add_token(&cur, lineno, file_index);
                    cur.clear();
                    continue;
                }
            }

            if ch.is_ascii_whitespace() || ch.is_ascii_control() {
                self.add_token(&cur, lineno, file_index);
                cur.clear();
                continue;
            }

            cur.push(ch as char);
        }
        self.add_token(&cur, lineno, file_index);

        if self.preferences.log_token_statistics {
            log_success!(codes::success::TOKENIZATION_COMPLETE,
                "Lexical analysis completed",
                "file" => file.as_str(),
                "tokens" => self.metrics.total_tokens,
                "names" => self.metrics.name_tokens,
                "numbers" => self.metrics.number_tokens,
                "strings" => self.metrics.string_literals,
                "operators" => self.metrics.operator_tokens,
                "files" => self.files.len(),
                "max_include_depth" => self.metrics.max_include_depth
            );
        }

        Ok(())
    }

    /// Append one token, canonicalizing hexadecimal literals to
    /// decimal and dropping empty accumulators.
    fn add_token(&mut self, text: &str, lineno: u32, file_index: usize) {
        if text.is_empty() {
            return;
        }
        let canonical = match text.strip_prefix("0x") {
            Some(hex) => parse_hex_after_prefix(hex).to_string(),
            None => text.to_string(),
        };
        self.metrics.record(&canonical);
        self.list
            .push_back(Token::new(canonical, lineno, file_index));
    }

    fn log_lexer_error(&self, error: &LexerError, file: &str, lineno: u32) {
        let message = error.to_string();
        if self.preferences.include_position_in_errors {
            let location = format!("[{}:{}]", file, lineno);
            log_error!(error.error_code(), &message,
                location = location.as_str(),
                "file" => file
            );
        } else {
            log_error!(error.error_code(), &message, "file" => file);
        }
    }
}
