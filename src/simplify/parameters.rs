//! Old-style (K&R) function parameter conversion
//!
//! `int f(a, b) int a; int b; { ... }` is rewritten so each parameter
//! name in the signature is replaced by its declaration, and the
//! declarations between `)` and `{` are removed.

use crate::tokenizer::Tokenizer;
use crate::tokens::TokenId;
use std::collections::HashMap;

impl Tokenizer {
    pub(crate) fn simplify_kr_parameters(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut indent = 0i32;
        let mut cur = list.head();

        'outer: while let Some(id) = cur {
            let text = list.text(id);
            if text == "{" {
                indent += 1;
            } else if text == "}" {
                indent -= 1;
            } else if indent == 0 && list.tok_match(Some(id), "%var% ( %var% [,)]") {
                // collect the argument names of the old-style list
                let mut argument_names: HashMap<String, TokenId> = HashMap::new();
                let mut bail_out = false;
                let mut tok = list.at(Some(id), 2);
                loop {
                    let Some(t) = tok else {
                        break;
                    };
                    if !list.tok_match(Some(t), "%var% [,)]") {
                        bail_out = true;
                        tok = Some(t);
                        break;
                    }
                    argument_names.insert(list.text(t).to_string(), t);
                    if list.text_at(Some(t), 1) == Some(")") {
                        tok = list.at(Some(t), 2);
                        break;
                    }
                    tok = list.at(Some(t), 2);
                }
                if bail_out {
                    cur = tok.and_then(|t| list.next(t));
                    continue 'outer;
                }
                let Some(first_decl) = tok else {
                    break 'outer;
                };

                // move each declaration between ')' and '{' onto its
                // parameter
                let mut start = first_decl;
                let mut tok = Some(first_decl);
                let mut bail_out = false;
                while let Some(t) = tok {
                    if list.text(t) == "{" {
                        break;
                    }
                    if list.text(t) == ";" {
                        let last = list.prev(t).expect("statement has tokens");
                        if !argument_names.contains_key(list.text(last)) {
                            bail_out = true;
                            tok = Some(last);
                            break;
                        }
                        let after = list.at(Some(last), 2);
                        list.delete_next(last);
                        let param = argument_names[list.text(last)];
                        list.replace_with_range(param, start, last);
                        ret = true;
                        tok = after;
                        match after {
                            Some(a) => start = a,
                            None => break,
                        }
                    } else {
                        tok = list.next(t);
                    }
                }
                if tok.is_none() {
                    break 'outer;
                }
                if bail_out {
                    cur = tok.and_then(|t| list.next(t));
                    continue 'outer;
                }
                indent += 1;
                cur = tok.and_then(|t| list.next(t));
                continue 'outer;
            }
            cur = list.next(id);
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::Tokenizer;

    fn converted(source: &str) -> String {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(source.as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.simplify_kr_parameters();
        tokenizer.list().to_text()
    }

    #[test]
    fn test_basic_conversion() {
        assert_eq!(
            converted("int f(a, b) int a; int b; { return a; }\n"),
            "int f ( int a , int b ) { return a ; }"
        );
    }

    #[test]
    fn test_pointer_parameter() {
        assert_eq!(
            converted("int f(p) char *p; { return 0; }\n"),
            "int f ( char * p ) { return 0 ; }"
        );
    }

    #[test]
    fn test_modern_signature_untouched() {
        assert_eq!(
            converted("int f(int a, int b) { return a; }\n"),
            "int f ( int a , int b ) { return a ; }"
        );
    }

    #[test]
    fn test_unknown_declaration_bails_out() {
        assert_eq!(
            converted("int f(a) int c; { return 0; }\n"),
            "int f ( a ) int c ; { return 0 ; }"
        );
    }
}
