//! Pattern matching over token windows
//!
//! The pattern language is the vocabulary downstream checkers use to
//! recognize token shapes: whitespace-separated atoms matched against
//! consecutive stream tokens. A compiled form is cached per pattern
//! string so the hot rewrite passes never re-parse.
//!
//! Atoms: a literal word, `%var%` (any name), `%type%` (any name except
//! `delete`), `%num%`, `%bool%`, `%any%`, `%varid%` (the call site
//! supplies the id), an alternation `a|b|c` (optional when a trailing
//! `|` leaves an empty branch), and a character class like `[;{}(]`
//! matching any single-byte token in the set.
use super::list::{TokenId, TokenList};
use super::token::{is_bool_text, is_name_text, is_number_text};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// One compiled pattern atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternAtom {
    /// Exact text
    Literal(String),
    /// `%var%`
    AnyName,
    /// `%type%`: any name except `delete`
    TypeName,
    /// `%num%`
    Number,
    /// `%bool%`
    Bool,
    /// `%any%`
    Any,
    /// `%varid%`, compared against the call-site id
    VarId,
    /// `[...]`: any single-byte token whose byte is in the set
    CharClass(String),
    /// `a|b|c`; optional when the pattern carried a trailing `|`
    Alternation {
        branches: Vec<String>,
        optional: bool,
    },
}

/// A compiled pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    atoms: Vec<PatternAtom>,
}

impl Pattern {
    /// Parse a pattern string into its compiled form.
    pub fn compile(pattern: &str) -> Self {
        let atoms = pattern.split_whitespace().map(compile_atom).collect();
        Self { atoms }
    }

    /// Fetch the compiled form from the process-wide cache, compiling
    /// on first use. Intended for the fixed pattern strings of the
    /// rewrite passes; dynamically built patterns should use
    /// [`Pattern::compile`] directly.
    pub fn cached(pattern: &str) -> Arc<Pattern> {
        static CACHE: OnceLock<Mutex<HashMap<String, Arc<Pattern>>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = cache.lock().unwrap();
        map.entry(pattern.to_string())
            .or_insert_with(|| Arc::new(Pattern::compile(pattern)))
            .clone()
    }

    pub fn atoms(&self) -> &[PatternAtom] {
        &self.atoms
    }

    /// Match the pattern against consecutive tokens starting at `tok`.
    /// `varid` backs any `%varid%` atom; it must be nonzero for such a
    /// pattern to match. Running out of tokens fails the match.
    pub fn match_at(&self, list: &TokenList, tok: Option<TokenId>, varid: u32) -> bool {
        let mut cur = tok;
        for atom in &self.atoms {
            let Some(id) = cur else {
                return false;
            };
            let text = list.text(id);
            let matched = match atom {
                PatternAtom::Literal(word) => text == word,
                PatternAtom::AnyName => is_name_text(text),
                PatternAtom::TypeName => is_name_text(text) && text != "delete",
                PatternAtom::Number => is_number_text(text),
                PatternAtom::Bool => is_bool_text(text),
                PatternAtom::Any => true,
                PatternAtom::VarId => varid != 0 && list.var_id(id) == varid,
                PatternAtom::CharClass(set) => {
                    text.len() == 1 && set.as_bytes().contains(&text.as_bytes()[0])
                }
                PatternAtom::Alternation { branches, optional } => {
                    if branches.iter().any(|b| b == text) {
                        true
                    } else if *optional {
                        // skip the atom without consuming the token
                        continue;
                    } else {
                        false
                    }
                }
            };
            if !matched {
                return false;
            }
            cur = list.next(id);
        }
        true
    }
}

fn compile_atom(word: &str) -> PatternAtom {
    match word {
        "%var%" => return PatternAtom::AnyName,
        "%type%" => return PatternAtom::TypeName,
        "%num%" => return PatternAtom::Number,
        "%bool%" => return PatternAtom::Bool,
        "%any%" => return PatternAtom::Any,
        "%varid%" => return PatternAtom::VarId,
        _ => {}
    }
    if word.len() > 2 && word.starts_with('[') && word.ends_with(']') {
        return PatternAtom::CharClass(word[1..word.len() - 1].to_string());
    }
    if word.contains('|') {
        let optional = word.split('|').any(str::is_empty);
        let branches = word
            .split('|')
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();
        return PatternAtom::Alternation { branches, optional };
    }
    PatternAtom::Literal(word.to_string())
}

impl TokenList {
    /// Match a pattern string (cached compile) at `tok`.
    pub fn tok_match(&self, tok: Option<TokenId>, pattern: &str) -> bool {
        Pattern::cached(pattern).match_at(self, tok, 0)
    }

    /// Match a pattern containing `%varid%` at `tok`.
    pub fn tok_match_varid(&self, tok: Option<TokenId>, pattern: &str, varid: u32) -> bool {
        Pattern::cached(pattern).match_at(self, tok, varid)
    }

    /// Literal-only match: every pattern word compared by text equality.
    pub fn simple_match(&self, tok: Option<TokenId>, pattern: &str) -> bool {
        let mut cur = tok;
        for word in pattern.split_whitespace() {
            let Some(id) = cur else {
                return false;
            };
            if self.text(id) != word {
                return false;
            }
            cur = self.next(id);
        }
        true
    }

    /// First stream position where the pattern matches.
    pub fn find_match(&self, pattern: &str, varid: u32) -> Option<TokenId> {
        let pat = Pattern::cached(pattern);
        self.ids().find(|&id| pat.match_at(self, Some(id), varid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::token::Token;

    fn build(texts: &[&str]) -> TokenList {
        let mut list = TokenList::new();
        for t in texts {
            list.push_back(Token::new(*t, 1, 0));
        }
        list
    }

    #[test]
    fn test_literal_and_classes() {
        let list = build(&["if", "(", "x", ")"]);
        assert!(list.tok_match(list.head(), "if ( %var% )"));
        assert!(list.tok_match(list.head(), "if ( %any% )"));
        assert!(!list.tok_match(list.head(), "if ( %num% )"));
        assert!(list.tok_match(list.at(list.head(), 1), "[;{}(]"));
        assert!(!list.tok_match(list.head(), "[;{}(]"));
    }

    #[test]
    fn test_alternation() {
        let list = build(&["while", "("]);
        assert!(list.tok_match(list.head(), "if|for|while ("));
        assert!(!list.tok_match(list.head(), "if|for ("));
    }

    #[test]
    fn test_optional_atom() {
        let with_const = build(&[")", "const", "{"]);
        let without = build(&[")", "{"]);
        assert!(with_const.tok_match(with_const.head(), ") const| {"));
        assert!(without.tok_match(without.head(), ") const| {"));
        let neither = build(&[")", "volatile", "{"]);
        assert!(!neither.tok_match(neither.head(), ") const| {"));
    }

    #[test]
    fn test_type_excludes_delete() {
        let list = build(&["delete", "p"]);
        assert!(list.tok_match(list.head(), "%var% %var%"));
        assert!(!list.tok_match(list.head(), "%type% %var%"));
    }

    #[test]
    fn test_varid() {
        let mut list = build(&["x", "=", "0"]);
        let x = list.head().unwrap();
        list.set_var_id(x, 3);
        assert!(list.tok_match_varid(list.head(), "%varid% = %num%", 3));
        assert!(!list.tok_match_varid(list.head(), "%varid% = %num%", 4));
        // id 0 never matches a %varid% atom
        assert!(!list.tok_match_varid(list.at(list.head(), 1), "%varid%", 0));
    }

    #[test]
    fn test_out_of_tokens_fails() {
        let list = build(&["if", "("]);
        assert!(!list.tok_match(list.head(), "if ( %var%"));
        assert!(!list.tok_match(list.head(), "if ( const|"));
    }

    #[test]
    fn test_simple_match() {
        let list = build(&["else", "if", "("]);
        assert!(list.simple_match(list.head(), "else if"));
        assert!(!list.simple_match(list.head(), "else {"));
        assert!(!list.simple_match(None, "else"));
    }

    #[test]
    fn test_find_match() {
        let mut list = build(&["int", "x", "[", "4", "]", ";"]);
        let x = list.at(list.head(), 1).unwrap();
        list.set_var_id(x, 1);
        let hit = list.find_match("%type% %varid% [", 1).unwrap();
        assert_eq!(hit, list.head().unwrap());
        assert!(list.find_match("%type% %varid% [", 2).is_none());
    }

    #[test]
    fn test_char_class_with_brackets() {
        // classes used by the known-value pass carry bracket bytes
        let list = build(&["[", "x", "]"]);
        assert!(list.tok_match(list.head(), "[=+-*/[]"));
        assert!(list.tok_match(list.at(list.head(), 2), "[+-*/;]]"));
    }
}
