//! Brace normalization
//!
//! Control bodies become explicit compound statements: `if`, `for`,
//! `while` and `else` bodies gain braces, `else if` chains get closed
//! per arm, and `case`/`default` labels gain a statement separator.

use crate::tokenizer::Tokenizer;

impl Tokenizer {
    /// Insert `{` ... `}` around single-statement control bodies.
    pub(crate) fn add_control_braces(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut cur = list.head();
        while let Some(id) = cur {
            let mut tok = id;
            if list.tok_match(Some(id), "if|for|while (") {
                // skip to the closing parenthesis of the condition
                let mut par = 1i32;
                tok = list.next(id).expect("matched");
                let mut reached_end = false;
                while par >= 1 {
                    match list.next(tok) {
                        Some(next) => tok = next,
                        None => {
                            reached_end = true;
                            break;
                        }
                    }
                    let text = list.text(tok);
                    if text == "(" {
                        par += 1;
                    } else if text == ")" {
                        par -= 1;
                    }
                }
                if reached_end {
                    break;
                }
                if list.simple_match(Some(tok), ") {") {
                    cur = list.next(tok);
                    continue;
                }
            } else if list.text(id) == "else" {
                // else followed by if or a brace needs no help
                if list.tok_match(Some(id), "else if|{") {
                    cur = list.next(id);
                    continue;
                }
            } else {
                cur = list.next(id);
                continue;
            }

            // open the body
            let open = list.insert_after(tok, "{");

            // close at the first ';' at depth zero, or at the end of a
            // nested compound body
            let mut par = 0i32;
            let mut indent = 0i32;
            let mut close = Some(open);
            loop {
                match close.and_then(|x| list.next(x)) {
                    Some(next) => close = Some(next),
                    None => {
                        close = None;
                        break;
                    }
                }
                let x = close.expect("just assigned");
                let text = list.text(x);
                if text == "{" {
                    indent += 1;
                } else if text == "}" {
                    indent -= 1;
                    if indent == 0 {
                        break;
                    }
                } else if text == "(" {
                    par += 1;
                } else if text == ")" {
                    par -= 1;
                } else if indent == 0 && par == 0 && text == ";" {
                    break;
                }
            }

            if let Some(x) = close {
                list.insert_after(x, "}");
                ret = true;
                cur = list.next(x);
            } else {
                cur = None;
            }
        }
        ret
    }

    /// Close each arm of an `else if` chain with its own brace so the
    /// redundant-condition pass can erase whole arms.
    pub(crate) fn normalize_else_if(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut cur = list.head();
        while let Some(id) = cur {
            if !list.simple_match(Some(id), "else if") {
                cur = list.next(id);
                continue;
            }
            let mut indent = 0i32;
            let mut t2 = Some(id);
            while let Some(x) = t2 {
                if indent < 0 {
                    break;
                }
                if list.tok_match(Some(x), "(|{") {
                    indent += 1;
                } else if list.tok_match(Some(x), ")|}") {
                    indent -= 1;
                }
                if indent == 0 && list.tok_match(Some(x), "}|;") {
                    if !list.simple_match(list.next(x), "else") {
                        list.insert_after(id, "{");
                        list.insert_after(x, "}");
                        ret = true;
                        break;
                    }
                }
                t2 = list.next(x);
            }
            cur = list.next(id);
        }
        ret
    }

    /// `case X : stmt` and `default : stmt` gain a `;` after the label.
    pub(crate) fn separate_case_labels(&mut self) {
        let list = &mut self.list;
        let mut cur = list.head();
        while let Some(id) = cur {
            if list.tok_match(Some(id), "case %any% : %var%") {
                let colon = list.at(Some(id), 2).expect("matched");
                list.insert_after(colon, ";");
            }
            if list.tok_match(Some(id), "default : %var%") {
                let colon = list.next(id).expect("matched");
                list.insert_after(colon, ";");
            }
            cur = list.next(id);
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

    fn braced(source: &str) -> String {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(source.as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.add_control_braces();
        tokenizer.list().to_text()
    }

    #[test]
    fn test_if_body_gains_braces() {
        assert_eq!(braced("if (a) f();"), "if ( a ) { f ( ) ; }");
    }

    #[test]
    fn test_while_and_for_bodies() {
        assert_eq!(braced("while (a) f();"), "while ( a ) { f ( ) ; }");
        assert_eq!(braced("for (;;) f();"), "for ( ; ; ) { f ( ) ; }");
    }

    #[test]
    fn test_already_braced_untouched() {
        assert_eq!(braced("if (a) { f(); }"), "if ( a ) { f ( ) ; }");
    }

    #[test]
    fn test_else_body_gains_braces() {
        assert_eq!(
            braced("if (a) f(); else g();"),
            "if ( a ) { f ( ) ; } else { g ( ) ; }"
        );
    }

    #[test]
    fn test_else_if_not_braced_directly() {
        assert_eq!(
            braced("if (a) { } else if (b) { }"),
            "if ( a ) { } else if ( b ) { }"
        );
    }

    #[test]
    fn test_nested_compound_body() {
        assert_eq!(
            braced("if (a) for (;;) { g(); }"),
            "if ( a ) { for ( ; ; ) { g ( ) ; } }"
        );
    }

    #[test]
    fn test_else_if_chain_closes_arms() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(
                "if (a) { f(); } else if (b) { g(); }\n".as_bytes(),
                "test.c",
            )
            .expect("tokenize");
        tokenizer.normalize_else_if();
        assert_eq!(
            tokenizer.list().to_text(),
            "if ( a ) { f ( ) ; } else { if ( b ) { g ( ) ; } }"
        );
    }

    #[test]
    fn test_case_label_separator() {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(
                "switch (x) { case 1: f(); default: g(); }\n".as_bytes(),
                "test.c",
            )
            .expect("tokenize");
        tokenizer.separate_case_labels();
        assert_eq!(
            tokenizer.list().to_text(),
            "switch ( x ) { case 1 : ; f ( ) ; default : ; g ( ) ; }"
        );
    }

    #[test]
    fn test_full_pipeline_keeps_branches_valid() {
        assert_eq!(
            simplified("void f() { if (a) x = 1; else x = 2; }\n"),
            "void f ( ) { if ( a ) { x = 1 ; } else { x = 2 ; } }"
        );
    }
}
