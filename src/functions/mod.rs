//! Function index
//!
//! A side list of references into the stream marking the name token of
//! each function definition, found by a brace-depth-0 heuristic:
//! `name (` whose matching `)` is followed by `{`, with an optional
//! `const` in between.

use crate::log_success;
use crate::logging::codes;
use crate::tokenizer::Tokenizer;
use crate::tokens::TokenId;
use std::collections::HashSet;

impl Tokenizer {
    /// Rebuild the function index from the current stream.
    pub fn fill_function_list(&mut self) {
        self.function_list.clear();

        let list = &self.list;
        let mut indent = 0i32;
        let mut tok = list.head();
        while let Some(id) = tok {
            let text = list.text(id);
            if text == "{" {
                indent += 1;
            } else if text == "}" {
                indent -= 1;
            }

            if indent > 0 {
                tok = list.next(id);
                continue;
            }

            let mut cur = id;
            if list.tok_match(Some(id), "%var% (") {
                let mut tok2 = list.at(Some(id), 2);
                while let Some(t2) = tok2 {
                    let t = list.text(t2);
                    if t == ";" {
                        // declaration, not a definition
                        cur = t2;
                        break;
                    } else if t == "{" {
                        break;
                    } else if t == ")" {
                        if list.tok_match(Some(t2), ") const| {") {
                            self.function_list.push(id);
                            cur = t2;
                        } else {
                            cur = t2;
                            while let Some(next) = list.next(cur) {
                                let first = list.first_byte(next);
                                if first == b';' || first == b'{' {
                                    break;
                                }
                                cur = next;
                            }
                        }
                        break;
                    }
                    tok2 = list.next(t2);
                }
            }

            tok = list.next(cur);
        }

        // names defined more than once keep their first entry
        let mut seen: HashSet<String> = HashSet::new();
        let list = &self.list;
        self.function_list
            .retain(|&id| seen.insert(list.text(id).to_string()));

        log_success!(codes::success::FUNCTION_INDEX_COMPLETE,
            "Function index rebuilt",
            "functions" => self.function_list.len()
        );
    }

    /// Name token of the indexed function called `name`.
    pub fn function_token_by_name(&self, name: &str) -> Option<TokenId> {
        self.function_list
            .iter()
            .copied()
            .find(|&id| self.list.text(id) == name)
    }

    /// Name of parameter number `par` (1-based) scanning a parameter
    /// list from `ftok`.
    pub fn parameter_name(&self, ftok: Option<TokenId>, par: u32) -> Option<&str> {
        let mut count = 1;
        let mut tok = ftok;
        while let Some(id) = tok {
            if self.list.text(id) == "," {
                count += 1;
            }
            if par == count && self.list.tok_match(Some(id), "%var% [,)]") {
                return Some(self.list.text(id));
            }
            tok = self.list.next(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::Tokenizer;

    fn prepare(source: &str) -> Tokenizer {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(source.as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.fill_function_list();
        tokenizer
    }

    fn names(tokenizer: &Tokenizer) -> Vec<String> {
        tokenizer
            .function_tokens()
            .iter()
            .map(|&id| tokenizer.list().text(id).to_string())
            .collect()
    }

    #[test]
    fn test_definitions_found() {
        let tokenizer = prepare("void f() { }\nint g(int x) { return x; }\n");
        assert_eq!(names(&tokenizer), ["f", "g"]);
    }

    #[test]
    fn test_declarations_skipped() {
        let tokenizer = prepare("void f();\nvoid g() { }\n");
        assert_eq!(names(&tokenizer), ["g"]);
    }

    #[test]
    fn test_const_member_shape() {
        let tokenizer = prepare("int size() const { return 0; }\n");
        assert_eq!(names(&tokenizer), ["size"]);
    }

    #[test]
    fn test_nested_calls_not_indexed() {
        let tokenizer = prepare("void f() { g(); h(); }\n");
        assert_eq!(names(&tokenizer), ["f"]);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let tokenizer = prepare("void f() { }\nvoid f() { }\nvoid g() { }\n");
        assert_eq!(names(&tokenizer), ["f", "g"]);
    }

    #[test]
    fn test_lookup_by_name() {
        let tokenizer = prepare("void f() { }\n");
        let id = tokenizer.function_token_by_name("f").expect("indexed");
        assert_eq!(tokenizer.list().text(id), "f");
        assert!(tokenizer.function_token_by_name("missing").is_none());
    }

    #[test]
    fn test_parameter_name() {
        let tokenizer = prepare("int add(a, b) { }\n");
        let f = tokenizer.function_token_by_name("add").expect("indexed");
        let params = tokenizer.list().next(f);
        assert_eq!(tokenizer.parameter_name(params, 1), Some("a"));
        assert_eq!(tokenizer.parameter_name(params, 2), Some("b"));
        assert_eq!(tokenizer.parameter_name(params, 3), None);
    }
}
