//! The tokenizer: exclusive owner of the token stream, the file table,
//! the type-size map and the function index.
//!
//! `tokenize` fills the stream from a byte source, `simplify` runs the
//! canonicalization pipeline, `set_var_id` links declarations to uses
//! and `fill_function_list` indexes function definitions. Downstream
//! checkers walk the stream through the accessors and the pattern
//! surface in [`crate::tokens`].

use crate::config::runtime::{LexicalPreferences, SimplifyPreferences};
use crate::lexical::{combine, LexerError, LexicalAnalyzer, LexicalMetrics};
use crate::tokens::{TokenId, TokenList};
use std::collections::HashMap;
use std::io::Read;
use std::mem::size_of;
use std::os::raw::{c_char, c_double, c_float, c_int, c_long, c_short};

pub struct Tokenizer {
    pub(crate) list: TokenList,
    pub(crate) files: Vec<String>,
    pub(crate) type_size: HashMap<String, u32>,
    pub(crate) function_list: Vec<TokenId>,
    pub(crate) lexical_preferences: LexicalPreferences,
    pub(crate) simplify_preferences: SimplifyPreferences,
    last_lexical_metrics: LexicalMetrics,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            list: TokenList::new(),
            files: Vec::new(),
            type_size: HashMap::new(),
            function_list: Vec::new(),
            lexical_preferences: LexicalPreferences::default(),
            simplify_preferences: SimplifyPreferences::default(),
            last_lexical_metrics: LexicalMetrics::default(),
        }
    }

    pub fn with_preferences(
        lexical_preferences: LexicalPreferences,
        simplify_preferences: SimplifyPreferences,
    ) -> Self {
        Self {
            lexical_preferences,
            simplify_preferences,
            ..Self::new()
        }
    }

    /// Tokenize a preprocessed byte stream declared as `filename`,
    /// then normalize it: operator combination, typedef folding,
    /// inline-assembly and qualifier removal.
    pub fn tokenize<R: Read>(&mut self, code: R, filename: &str) -> Result<(), LexerError> {
        let preferences = self.lexical_preferences.clone();
        let mut analyzer =
            LexicalAnalyzer::with_preferences(&mut self.list, &mut self.files, preferences);
        analyzer.tokenize(code, filename)?;
        self.last_lexical_metrics = analyzer.metrics().clone();

        combine::combine_operators(&mut self.list);
        combine::fold_typedefs(&mut self.list);
        combine::remove_inline_assembly(&mut self.list);
        combine::remove_qualifier(&mut self.list, "volatile");
        combine::remove_qualifier(&mut self.list, "mutable");

        Ok(())
    }

    // === ACCESSORS ===

    /// Head of the token stream
    pub fn tokens(&self) -> Option<TokenId> {
        self.list.head()
    }

    /// The stream itself, for checkers walking and matching it
    pub fn list(&self) -> &TokenList {
        &self.list
    }

    /// Files referenced by the stream, in `file_index` order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Metrics of the most recent `tokenize` call
    pub fn lexical_metrics(&self) -> &LexicalMetrics {
        &self.last_lexical_metrics
    }

    /// Name tokens of indexed function definitions
    pub fn function_tokens(&self) -> &[TokenId] {
        &self.function_list
    }

    /// Human-readable origin tag for a token: `[path:line]`
    pub fn file_line(&self, tok: TokenId) -> String {
        format!(
            "[{}:{}]",
            self.files[self.list.file_index(tok)],
            self.list.line(tok)
        )
    }

    /// Path of the file a token came from
    pub fn file(&self, tok: TokenId) -> &str {
        &self.files[self.list.file_index(tok)]
    }

    /// Byte size of a type name, 0 when unknown
    pub fn size_of_type(&self, type_name: &str) -> u32 {
        self.type_size.get(type_name).copied().unwrap_or(0)
    }

    /// Drop all tokens and side tables
    pub fn clear(&mut self) {
        self.list.clear();
        self.files.clear();
        self.type_size.clear();
        self.function_list.clear();
    }

    // === SHARED PASS SUPPORT ===

    /// Fill the type-size map: host C sizes for the primitives, the
    /// sentinel 100 for every struct/class name seen in the stream.
    pub(crate) fn fill_type_size_map(&mut self) {
        self.type_size.clear();
        self.type_size
            .insert("char".to_string(), size_of::<c_char>() as u32);
        self.type_size
            .insert("short".to_string(), size_of::<c_short>() as u32);
        self.type_size
            .insert("int".to_string(), size_of::<c_int>() as u32);
        self.type_size
            .insert("long".to_string(), size_of::<c_long>() as u32);
        self.type_size
            .insert("float".to_string(), size_of::<c_float>() as u32);
        self.type_size
            .insert("double".to_string(), size_of::<c_double>() as u32);

        let mut tok = self.list.head();
        while let Some(id) = tok {
            if self.list.tok_match(Some(id), "class|struct %var%") {
                let name = self.list.text_at(Some(id), 1).expect("matched").to_string();
                self.type_size.insert(name, 100);
            }
            tok = self.list.next(id);
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_and_accessors() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("int x;\n".as_bytes(), "a.c")
            .expect("tokenize");
        assert_eq!(tokenizer.list().to_text(), "int x ;");
        assert_eq!(tokenizer.files(), ["a.c"]);
        let head = tokenizer.tokens().expect("head");
        assert_eq!(tokenizer.file_line(head), "[a.c:1]");
        assert_eq!(tokenizer.file(head), "a.c");
    }

    #[test]
    fn test_tokenize_runs_normalization() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("volatile int x; p->y = a == b;\n".as_bytes(), "a.c")
            .expect("tokenize");
        assert_eq!(tokenizer.list().to_text(), "int x ; p . y = a == b ;");
    }

    #[test]
    fn test_type_size_map() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("struct Fred { int x; };\n".as_bytes(), "a.c")
            .expect("tokenize");
        tokenizer.fill_type_size_map();
        assert_eq!(tokenizer.size_of_type("char"), 1);
        assert_eq!(
            tokenizer.size_of_type("int"),
            size_of::<c_int>() as u32
        );
        assert_eq!(tokenizer.size_of_type("Fred"), 100);
        assert_eq!(tokenizer.size_of_type("Unknown"), 0);
    }

    #[test]
    fn test_clear() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("int x;\n".as_bytes(), "a.c")
            .expect("tokenize");
        tokenizer.clear();
        assert!(tokenizer.tokens().is_none());
        assert!(tokenizer.files().is_empty());
    }
}
