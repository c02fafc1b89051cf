//! Declaration splitting
//!
//! `T a , b ;` and friends become one statement per declarator, each
//! repeating the type prefix, so every later pass sees exactly one
//! variable per declaration. Initializers split into a declaration
//! followed by a plain assignment.

use crate::tokenizer::Tokenizer;
use crate::tokens::TokenId;

impl Tokenizer {
    pub(crate) fn split_declarations(&mut self) {
        let list = &mut self.list;
        let head = list.head();
        let mut tok = head;
        while let Some(id) = tok {
            // a declaration starts after a statement boundary, or at
            // the very front of the stream
            let type0 = if list.tok_match(Some(id), "[{};]") {
                list.next(id)
            } else if Some(id) == head {
                Some(id)
            } else {
                tok = list.next(id);
                continue;
            };
            let Some(type0) = type0 else {
                break;
            };
            if !list.tok_match(Some(type0), "%type%")
                || list.tok_match(Some(type0), "else|return")
            {
                tok = list.next(id);
                continue;
            }

            let mut tok2: Option<TokenId> = None;
            let mut typelen = 0usize;

            if list.tok_match(Some(type0), "%type% %var% ,|=") {
                if list.text_at(Some(type0), 1) != Some("operator") {
                    tok2 = list.at(Some(type0), 2); // the ',' or '=' token
                    typelen = 1;
                }
            } else if list.tok_match(Some(type0), "%type% * %var% ,|=") {
                if list.text_at(Some(type0), 2) != Some("operator") {
                    tok2 = list.at(Some(type0), 3);
                    typelen = 1;
                }
            } else if list.tok_match(Some(type0), "%type% %var% [ %num% ] ,") {
                tok2 = list.at(Some(type0), 5);
                typelen = 1;
            } else if list.tok_match(Some(type0), "%type% * %var% [ %num% ] ,") {
                tok2 = list.at(Some(type0), 6);
                typelen = 1;
            } else if list.tok_match(Some(type0), "struct %type% %var% ,|=") {
                tok2 = list.at(Some(type0), 3);
                typelen = 2;
            } else if list.tok_match(Some(type0), "struct %type% * %var% ,|=") {
                tok2 = list.at(Some(type0), 4);
                typelen = 2;
            }

            if let Some(t2) = tok2 {
                if list.text(t2) == "," {
                    list.set_text(t2, ";");
                    list.insert_copies(t2, type0, typelen);
                } else {
                    // "type var = x ,|;" => "type var ; var = x ,|;"
                    let eq = t2;
                    let mut par = 0i32;
                    let mut t2 = Some(eq);
                    while let Some(x) = t2 {
                        let first = list.first_byte(x);
                        if first == b'{' || first == b'(' {
                            par += 1;
                        } else if first == b'}' || first == b')' {
                            if par < 0 {
                                break;
                            }
                            par -= 1;
                        } else if par == 0 && (first == b';' || first == b',') {
                            let mut var_tok = list.at(Some(type0), typelen).expect("matched");
                            if list.first_byte(var_tok) == b'*' {
                                var_tok = list.next(var_tok).expect("matched");
                            }
                            list.insert_copies(eq, var_tok, 2);
                            list.set_text(eq, ";");

                            // "= x ,"  =>  "= x ; type"
                            if list.text(x) == "," {
                                list.set_text(x, ";");
                                list.insert_copies(x, type0, typelen);
                            }
                            break;
                        }
                        t2 = list.next(x);
                    }
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
    fn test_plain_split() {
        assert_eq!(simplified("int a, b;\n"), "int a ; int b ;");
    }

    #[test]
    fn test_pointer_split() {
        assert_eq!(simplified("char *a, b;\n"), "char * a ; char b ;");
    }

    #[test]
    fn test_array_split() {
        assert_eq!(
            simplified("int a[3], b;\n"),
            "int a [ 3 ] ; int b ;"
        );
    }

    #[test]
    fn test_struct_split() {
        assert_eq!(
            simplified("struct S a, b;\n"),
            "struct S a ; struct S b ;"
        );
    }

    #[test]
    fn test_initializer_split() {
        assert_eq!(
            simplified("void f() { int a = 3, b = 4; }\n"),
            "void f ( ) { int a ; a = 3 ; int b ; b = 4 ; }"
        );
    }

    #[test]
    fn test_single_declaration_untouched() {
        assert_eq!(simplified("int a;\n"), "int a ;");
    }

    #[test]
    fn test_call_arguments_not_split() {
        assert_eq!(simplified("f(a, b);\n"), "f ( a , b ) ;");
    }
}
