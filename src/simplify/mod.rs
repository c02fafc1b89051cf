//! Token stream simplification
//!
//! One fixed, ordered pipeline canonicalizes the stream so checkers
//! pattern-match a small vocabulary: literals spliced, sizeof folded,
//! constants propagated, casts removed, declarations split, braces
//! made explicit. A fixpoint cluster then re-runs the data-flow-ish
//! passes until an iteration changes nothing.

mod braces;
mod calculations;
mod casts;
mod conditions;
mod constants;
mod declarations;
mod known_values;
mod parameters;
mod sizes;

use crate::config::constants::compile_time::simplify::MAX_FIXPOINT_ITERATIONS;
use crate::logging::codes;
use crate::tokenizer::Tokenizer;
use crate::{log_debug, log_error, log_success};

impl Tokenizer {
    /// Run the full simplification pipeline. Returns false when the
    /// fixpoint cluster hit its iteration bound before converging.
    pub fn simplify(&mut self) -> bool {
        // the sizeof and constant passes key on variable identities
        self.set_var_id();

        self.combine_string_literals();
        self.strip_unwanted_keywords();
        self.fold_sign_runs();
        self.fill_type_size_map();
        self.simplify_sizeof_variables();
        self.simplify_sizeof();
        self.simplify_array_sizeof();
        self.propagate_constant_declarations();
        self.simplify_casts();
        while self.simplify_calculations() {}
        self.simplify_pointer_arithmetic();
        self.split_declarations();

        // declarations may have been rewritten
        self.set_var_id();

        self.replace_null_literal();
        self.remove_null_pointer_casts();
        self.add_control_braces();
        self.simplify_kr_parameters();
        self.normalize_else_if();
        self.separate_case_labels();

        let mut iterations = 0usize;
        let mut converged = true;
        loop {
            let mut modified = false;
            modified |= self.simplify_conditions();
            modified |= self.simplify_function_return();
            modified |= self.simplify_known_variables();
            modified |= self.remove_redundant_conditions();
            modified |= self.simplify_redundant_parentheses();
            modified |= self.simplify_calculations();
            if !modified {
                break;
            }
            iterations += 1;
            if self.simplify_preferences.log_fixpoint_iterations {
                log_debug!("Fixpoint iteration complete", "iteration" => iterations);
            }
            if iterations >= MAX_FIXPOINT_ITERATIONS {
                log_error!(
                    codes::simplify::FIXPOINT_LIMIT_REACHED,
                    "Fixpoint cluster did not converge",
                    "iterations" => iterations
                );
                converged = false;
                break;
            }
        }

        if self.simplify_preferences.log_pipeline_summary {
            log_success!(codes::success::SIMPLIFICATION_COMPLETE,
                "Simplification pipeline complete",
                "tokens" => self.list.len(),
                "fixpoint_iterations" => iterations
            );
        }

        converged
    }

    /// Splice adjacent string literals into one token: the closing
    /// quote of the first and the opening quote of the second drop out.
    pub(crate) fn combine_string_literals(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            loop {
                let followed_by_string = list.first_byte(id) == b'"'
                    && list
                        .next(id)
                        .map(|n| list.first_byte(n) == b'"')
                        .unwrap_or(false);
                if !followed_by_string {
                    break;
                }
                let next = list.next(id).expect("checked");
                let mut spliced = list.text(id).to_string();
                spliced.truncate(spliced.len() - 1);
                spliced.push_str(&list.text(next)[1..]);
                list.set_text(id, spliced);
                list.delete_next(id);
            }
            tok = list.next(id);
        }
    }

    /// Delete `unsigned` and `unlikely` wherever they appear.
    pub(crate) fn strip_unwanted_keywords(&mut self) {
        const UNWANTED_WORDS: [&str; 2] = ["unsigned", "unlikely"];
        let list = &mut self.list;
        for word in UNWANTED_WORDS {
            while list.head().map(|h| list.text(h) == word).unwrap_or(false) {
                list.pop_front();
            }
        }
        let mut tok = list.head();
        while let Some(id) = tok {
            for word in UNWANTED_WORDS {
                let next_matches = list
                    .next(id)
                    .map(|n| list.text(n) == word)
                    .unwrap_or(false);
                if next_matches {
                    list.delete_next(id);
                    break;
                }
            }
            tok = list.next(id);
        }
    }

    /// Fold adjacent sign runs: `+ +` => `+`, `+ -` => `-`,
    /// `- -` => `+`, `- +` => `-`.
    pub(crate) fn fold_sign_runs(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            while list.next(id).is_some() {
                let text = list.text(id);
                let next_text = list.text(list.next(id).expect("checked"));
                if text == "+" {
                    if next_text == "+" {
                        list.delete_next(id);
                        continue;
                    } else if next_text == "-" {
                        list.set_text(id, "-");
                        list.delete_next(id);
                        continue;
                    }
                } else if text == "-" {
                    if next_text == "-" {
                        list.set_text(id, "+");
                        list.delete_next(id);
                        continue;
                    } else if next_text == "+" {
                        list.delete_next(id);
                        continue;
                    }
                }
                break;
            }
            tok = list.next(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::Tokenizer;

    fn simplified(source: &str) -> String {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(source.as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.simplify();
        tokenizer.list().to_text()
    }

    #[test]
    fn test_string_splice() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("s = \"ab\" \"cd\" \"ef\";\n".as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.combine_string_literals();
        assert_eq!(tokenizer.list().to_text(), "s = \"abcdef\" ;");
    }

    #[test]
    fn test_keyword_strip() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("unsigned int a; int unlikely b;\n".as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.strip_unwanted_keywords();
        assert_eq!(tokenizer.list().to_text(), "int a ; int b ;");
    }

    #[test]
    fn test_sign_folding() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("a = b + + c; d = e - - f; g = h + - i;\n".as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.fold_sign_runs();
        assert_eq!(
            tokenizer.list().to_text(),
            "a = b + c ; d = e + f ; g = h - i ;"
        );
    }

    // === END-TO-END PIPELINE SCENARIOS ===

    #[test]
    fn test_scenario_condition_folds_and_if_removed() {
        let result = simplified("int x = 5; if (x == 5) { f(); }\n");
        assert_eq!(result, "int x ; x = 5 ; { f ( ) ; }");
    }

    #[test]
    fn test_scenario_const_array_bound() {
        let result = simplified("const int N = 4; int a[N];\n");
        assert_eq!(result, "const int N = 4 ; int a [ 4 ] ;");
    }

    #[test]
    fn test_scenario_null_pointer_cast() {
        let result = simplified("char *p = (char*)0;\n");
        assert_eq!(result, "char * p ; p = 0 ;");
    }

    #[test]
    fn test_scenario_typedef_unsigned() {
        let result = simplified("typedef unsigned int U; U v;\n");
        assert_eq!(result, "int v ;");
    }

    #[test]
    fn test_scenario_declaration_split() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize("int a, b, c;\n".as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.simplify();
        assert_eq!(tokenizer.list().to_text(), "int a ; int b ; int c ;");

        let list = tokenizer.list();
        let mut ids = Vec::new();
        for id in list.ids() {
            let v = list.var_id(id);
            if v > 0 {
                ids.push(v);
            }
        }
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn test_scenario_if_else_branch_selection() {
        let result = simplified("void f() { if (true) x; else y; }\n");
        assert_eq!(result, "void f ( ) { { x ; } }");
    }

    #[test]
    fn test_calculation_laws() {
        assert_eq!(simplified("a[2 + 3];\n"), "a [ 5 ] ;");
        assert_eq!(simplified("a[7 - 3];\n"), "a [ 4 ] ;");
        assert_eq!(simplified("a[3 * 4];\n"), "a [ 12 ] ;");
        assert_eq!(simplified("a[8 / 2];\n"), "a [ 4 ] ;");
        // division by zero is left alone
        assert_eq!(simplified("a[8 / 0];\n"), "a [ 8 / 0 ] ;");
    }

    #[test]
    fn test_sizeof_int_folds_to_host_size() {
        let expected = std::mem::size_of::<std::os::raw::c_int>().to_string();
        let result = simplified("n = sizeof(int);\n");
        assert_eq!(result, format!("n = {} ;", expected));
    }

    #[test]
    fn test_adjacent_strings_collapse() {
        let result = simplified("s = \"a\" \"b\";\n");
        assert_eq!(result, "s = \"ab\" ;");
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let sources = [
            "int x = 5; if (x == 5) { f(); }\n",
            "void f() { int a, b; a = 1; b = a + 1; }\n",
            "const int N = 4; int a[N];\n",
            "void f() { if (1) x; else y; while (0) z; }\n",
        ];
        for source in sources {
            let mut tokenizer = Tokenizer::new();
            tokenizer
                .tokenize(source.as_bytes(), "test.c")
                .expect("tokenize");
            tokenizer.simplify();
            let once = tokenizer.list().to_text();
            tokenizer.simplify();
            assert_eq!(tokenizer.list().to_text(), once, "source: {}", source);
        }
    }

    #[test]
    fn test_numeric_if_condition() {
        assert_eq!(
            simplified("void f() { if (1) a; }\n"),
            "void f ( ) { { a ; } }"
        );
        assert_eq!(simplified("void f() { if (0) a; }\n"), "void f ( ) { }");
    }
}
