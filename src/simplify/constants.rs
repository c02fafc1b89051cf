//! Constant canonicalization
//!
//! Propagates `const T name = NUM ;` values through the enclosing
//! block, replaces `NULL` with `0`, and collapses pointer casts of
//! zero so every null pointer reads as a plain `0`.

use crate::tokenizer::Tokenizer;

impl Tokenizer {
    /// `const T name = NUM ;`: rewrite each later `name` in the
    /// enclosing block to `NUM`, leaving member accesses alone.
    pub(crate) fn propagate_constant_declarations(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.tok_match(Some(id), "const %type% %var% = %num% ;") {
                let sym = list.text_at(Some(id), 2).expect("matched").to_string();
                let num = list.text_at(Some(id), 4).expect("matched").to_string();
                let mut indent = 1i32;
                let mut t2 = list.at(Some(id), 6);
                while let Some(x) = t2 {
                    let text = list.text(x);
                    if text == "{" {
                        indent += 1;
                    } else if text == "}" {
                        indent -= 1;
                        if indent == 0 {
                            break;
                        }
                    } else if text == sym {
                        // don't touch members of other structures
                        let after_dot = list
                            .prev(x)
                            .map(|p| list.text(p) == ".")
                            .unwrap_or(true);
                        if !after_dot {
                            list.set_text(x, num.as_str());
                        }
                    }
                    t2 = list.next(x);
                }
            }
            tok = list.next(id);
        }
    }

    /// `NULL` => `0`
    pub(crate) fn replace_null_literal(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.text(id) == "NULL" {
                list.set_text(id, "0");
            }
            tok = list.next(id);
        }
    }

    /// `( T * ) 0` and `( T T * ) 0` collapse to `0`.
    pub(crate) fn remove_null_pointer_casts(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.tok_match(list.next(id), "( %type% * ) 0")
                || list.tok_match(list.next(id), "( %type% %type% * ) 0")
            {
                while !list.simple_match(list.next(id), "0") {
                    list.delete_next(id);
                }
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
    fn test_const_propagation_in_block() {
        assert_eq!(
            simplified("void f() { const int N = 4; g(N); }\n"),
            "void f ( ) { const int N = 4 ; g ( 4 ) ; }"
        );
    }

    #[test]
    fn test_const_propagation_skips_members() {
        assert_eq!(
            simplified("void f() { const int N = 4; s.N = 1; g(N); }\n"),
            "void f ( ) { const int N = 4 ; s . N = 1 ; g ( 4 ) ; }"
        );
    }

    #[test]
    fn test_null_becomes_zero() {
        assert_eq!(simplified("p = NULL;\n"), "p = 0 ;");
    }

    #[test]
    fn test_null_pointer_cast_two_types() {
        assert_eq!(
            simplified("p = (struct S *)0;\n"),
            "p = 0 ;"
        );
    }
}
