//! Cast removal
//!
//! C-style casts in front of a name and the C++ keyword casts are
//! syntactic noise to the checkers; both are stripped, keeping the
//! operand.

use crate::tokenizer::Tokenizer;

impl Tokenizer {
    pub(crate) fn simplify_casts(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.tok_match(list.next(id), "( %type% *| )")
                || list.tok_match(list.next(id), "( %type% %type% *| )")
            {
                // a name in front is a call, not a cast
                if list.is_name(id) && list.text(id) != "return" {
                    tok = list.next(id);
                    continue;
                }

                // the cast must wrap a named operand
                let mut tok2 = list.at(Some(id), 3);
                while let Some(x) = tok2 {
                    if list.text(x) == ")" {
                        break;
                    }
                    tok2 = list.next(x);
                }
                if !list.tok_match(tok2, ") %var%") {
                    tok = list.next(id);
                    continue;
                }

                while list.text_at(Some(id), 1) != Some(")") {
                    list.delete_next(id);
                }
                list.delete_next(id);
                ret = true;
            } else if list.tok_match(
                list.next(id),
                "dynamic_cast|reinterpret_cast|const_cast|static_cast <",
            ) {
                // drop the keyword and template argument
                while list.next(id).is_some() && list.text_at(Some(id), 1) != Some(">") {
                    list.delete_next(id);
                }
                list.delete_next(id);
                list.delete_next(id);

                // drop the closing parenthesis matching the one just
                // removed, keeping the operand
                let mut tok2 = id;
                let mut par = 0i32;
                while list.next(tok2).is_some() && par >= 0 {
                    tok2 = list.next(tok2).expect("checked");
                    if list.simple_match(list.next(tok2), "(") {
                        par += 1;
                    } else if list.simple_match(list.next(tok2), ")") {
                        par -= 1;
                    }
                }
                if list.next(tok2).is_some() {
                    list.delete_next(tok2);
                }
                ret = true;
            }
            tok = list.next(id);
        }
        ret
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
    fn test_simple_cast_removed() {
        assert_eq!(simplified("a = (int)b;\n"), "a = b ;");
        assert_eq!(simplified("a = (struct S)b;\n"), "a = b ;");
    }

    #[test]
    fn test_pointer_cast_removed() {
        assert_eq!(simplified("a = (char *)b;\n"), "a = b ;");
    }

    #[test]
    fn test_call_not_treated_as_cast() {
        assert_eq!(simplified("a = f(b);\n"), "a = f ( b ) ;");
    }

    #[test]
    fn test_return_cast_removed() {
        assert_eq!(
            simplified("int f() { return (int)x; }\n"),
            "int f ( ) { return x ; }"
        );
    }

    #[test]
    fn test_keyword_cast_stripped() {
        assert_eq!(
            simplified("a = static_cast<int>(b);\n"),
            "a = b ;"
        );
    }

    #[test]
    fn test_dynamic_cast_keeps_operand() {
        assert_eq!(
            simplified("void f() { q = dynamic_cast<Fred *>(p); }\n"),
            "void f ( ) { q = p ; }"
        );
    }
}
