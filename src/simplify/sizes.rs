//! `sizeof` folding
//!
//! Rewrites `sizeof` expressions to plain numeric literals wherever
//! the operand's size is knowable: primitives and pointers use the
//! host C sizes, every struct/class gets the sentinel 100, arrays use
//! the declared element count. Unknown sizes leave the expression
//! untouched.

use crate::tokenizer::Tokenizer;
use crate::utils::numeric::parse_int_prefix;
use std::mem::size_of;
use std::os::raw::c_char;

impl Tokenizer {
    /// `sizeof(var)` => `sizeof(type)` for plain `T v ;` declarations,
    /// within the enclosing block.
    pub(crate) fn simplify_sizeof_variables(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.tok_match(Some(id), "[;{}] %type% %var% ;") {
                let var = list.at(Some(id), 2).expect("matched");
                let varid = list.var_id(var);
                if varid > 0 {
                    let type_name = list.text_at(Some(id), 1).expect("matched").to_string();
                    let mut indent = 0i32;
                    let mut t2 = Some(id);
                    while let Some(x) = t2 {
                        let text = list.text(x);
                        if text == "{" {
                            indent += 1;
                        } else if text == "}" {
                            indent -= 1;
                            if indent < 0 {
                                break;
                            }
                        } else if list.tok_match_varid(Some(x), "sizeof ( %varid% )", varid) {
                            let target = list.at(Some(x), 2).expect("matched");
                            list.set_text(target, type_name.as_str());
                            t2 = Some(target);
                            continue;
                        }
                        t2 = list.next(x);
                    }
                }
            }
            tok = list.next(id);
        }
    }

    /// Parenthesize bare `sizeof` operands, then evaluate
    /// `sizeof(T *)`, `sizeof(T)`, `sizeof(*v)` and `sizeof(v[N])`.
    pub(crate) fn simplify_sizeof(&mut self) {
        let pointer_size = size_of::<*const c_char>() as u32;
        let mut tok = self.list.head();
        while let Some(id) = tok {
            if self.list.text(id) != "sizeof" {
                tok = self.list.next(id);
                continue;
            }

            if self.list.text_at(Some(id), 1) != Some("(") {
                self.parenthesize_sizeof_operand(id);
            }

            let list = &mut self.list;
            if list.tok_match(Some(id), "sizeof ( %type% * )") {
                list.set_text(id, pointer_size.to_string());
                for _ in 0..4 {
                    list.delete_next(id);
                }
            } else if list.tok_match(Some(id), "sizeof ( %type% )") {
                let type_name = list.text_at(Some(id), 2).expect("matched").to_string();
                let size = self.size_of_type(&type_name);
                if size > 0 {
                    let list = &mut self.list;
                    list.set_text(id, size.to_string());
                    for _ in 0..3 {
                        list.delete_next(id);
                    }
                }
            } else if list.tok_match(Some(id), "sizeof ( * %var% )")
                || list.tok_match(Some(id), "sizeof ( %var% [ %num% ] )")
            {
                // element size of the declared array type, else the
                // struct sentinel
                let mut size = 100u32;
                let offset = if list.text_at(Some(id), 2) == Some("*") {
                    3
                } else {
                    2
                };
                let varid = list.var_id(list.at(Some(id), offset).expect("matched"));
                if varid != 0 {
                    if let Some(decl) = list.find_match("%type% %varid% [", varid) {
                        let type_name = list.text(decl).to_string();
                        size = self.size_of_type(&type_name);
                    }
                }
                let list = &mut self.list;
                list.set_text(id, size.to_string());
                while list.text_at(Some(id), 1) != Some(")") {
                    list.delete_next(id);
                }
                list.delete_next(id);
            }

            tok = self.list.next(id);
        }
    }

    /// Wrap the operand of a parenthesis-less `sizeof` in parentheses,
    /// following simple member chains and postfix `++`/`--`. Subscripts
    /// are left alone.
    fn parenthesize_sizeof_operand(&mut self, sizeof_tok: crate::tokens::TokenId) {
        let list = &mut self.list;
        let mut temp = list.next(sizeof_tok);
        while let Some(t) = temp {
            if list.tok_match(Some(t), "%var%") {
                if list.text_at(Some(t), 1) == Some(".") {
                    // member chain, keep looking for the final name
                    temp = list.at(Some(t), 2);
                    continue;
                }
                let mut last = t;
                if list.tok_match(list.next(t), "++") || list.tok_match(list.next(t), "--") {
                    match list.at(Some(t), 2) {
                        Some(after) => last = after,
                        None => last = list.at(Some(t), 1).expect("matched"),
                    }
                } else if list.text_at(Some(t), 1) == Some("[") {
                    break;
                }
                list.insert_after(sizeof_tok, "(");
                list.insert_after(last, ")");
                break;
            }
            temp = list.next(t);
        }
    }

    /// For `T v [ N ] ;`, rewrite later `sizeof ( v )` to the
    /// precomputed total `N * sizeof(T)`.
    pub(crate) fn simplify_array_sizeof(&mut self) {
        let mut tok = self.list.head();
        while let Some(id) = tok {
            if !self.list.tok_match(Some(id), "%type% %var% [ %num% ] ;") {
                tok = self.list.next(id);
                continue;
            }
            let type_name = self.list.text(id).to_string();
            let size = self.size_of_type(&type_name);
            if size == 0 {
                tok = self.list.next(id);
                continue;
            }
            let varid = self.list.var_id(self.list.next(id).expect("matched"));
            if varid == 0 {
                tok = self.list.next(id);
                continue;
            }
            let count = parse_int_prefix(self.list.text_at(Some(id), 3).expect("matched"));
            let total_size = (size as i64) * count;

            let list = &mut self.list;
            let mut indent = 0i32;
            let mut t2 = list.at(Some(id), 5);
            while let Some(x) = t2 {
                let text = list.text(x);
                if text == "{" {
                    indent += 1;
                } else if text == "}" {
                    indent -= 1;
                    if indent < 0 {
                        break;
                    }
                } else if list.tok_match_varid(Some(x), "sizeof ( %varid% )", varid) {
                    list.set_text(x, total_size.to_string());
                    for _ in 0..3 {
                        list.delete_next(x);
                    }
                }
                t2 = list.next(x);
            }
            tok = self.list.next(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::Tokenizer;
    use std::mem::size_of;
    use std::os::raw::{c_char, c_int, c_long, c_short};

    fn simplified(source: &str) -> String {
        let mut tokenizer = Tokenizer::new();
        tokenizer
            .tokenize(source.as_bytes(), "test.c")
            .expect("tokenize");
        tokenizer.simplify();
        tokenizer.list().to_text()
    }

    #[test]
    fn test_sizeof_primitives() {
        assert_eq!(
            simplified("a = sizeof(char);\n"),
            format!("a = {} ;", size_of::<c_char>())
        );
        assert_eq!(
            simplified("a = sizeof(short);\n"),
            format!("a = {} ;", size_of::<c_short>())
        );
        assert_eq!(
            simplified("a = sizeof(long);\n"),
            format!("a = {} ;", size_of::<c_long>())
        );
    }

    #[test]
    fn test_sizeof_pointer() {
        let expected = size_of::<*const c_char>();
        assert_eq!(
            simplified("a = sizeof(int *);\n"),
            format!("a = {} ;", expected)
        );
    }

    #[test]
    fn test_sizeof_struct_sentinel() {
        assert_eq!(
            simplified("struct Fred { int x; }; n = sizeof(Fred);\n"),
            "struct Fred { int x ; } ; n = 100 ;"
        );
    }

    #[test]
    fn test_sizeof_unknown_type_unchanged() {
        assert_eq!(
            simplified("n = sizeof(Unknown);\n"),
            "n = sizeof ( Unknown ) ;"
        );
    }

    #[test]
    fn test_sizeof_variable_uses_declared_type() {
        let int_size = size_of::<c_int>();
        assert_eq!(
            simplified("void f() { int x; n = sizeof(x); }\n"),
            format!("void f ( ) {{ int x ; n = {} ; }}", int_size)
        );
    }

    #[test]
    fn test_array_sizeof_total() {
        let expected = 10 * size_of::<c_int>();
        assert_eq!(
            simplified("void f() { int a[10]; n = sizeof(a); }\n"),
            format!("void f ( ) {{ int a [ 10 ] ; n = {} ; }}", expected)
        );
    }

    #[test]
    fn test_sizeof_deref_unknown_defaults_to_sentinel() {
        assert_eq!(
            simplified("void f() { n = sizeof(*p); }\n"),
            "void f ( ) { n = 100 ; }"
        );
    }

    #[test]
    fn test_sizeof_without_parens_gains_them() {
        // the variable substitution pass has already run by the time
        // the parentheses appear, so the operand stays symbolic
        assert_eq!(
            simplified("void f() { int x; n = sizeof x; }\n"),
            "void f ( ) { int x ; n = sizeof ( x ) ; }"
        );
    }
}
