//! Constant-expression folding
//!
//! Folds `NUM op NUM` inside bracketed contexts, collapses `* 1`,
//! strips redundant parentheses around single numbers and names, and
//! rewrites `*(v + N)` pointer arithmetic to subscript form.

use crate::tokenizer::Tokenizer;
use crate::utils::numeric::parse_int_prefix;

impl Tokenizer {
    pub(crate) fn simplify_calculations(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut tok = list.head();
        while let Some(id) = tok {
            let mut pos = id;

            if list.simple_match(list.next(pos), "* 1") || list.simple_match(list.next(pos), "1 *")
            {
                for _ in 0..2 {
                    list.delete_next(pos);
                }
                ret = true;
            }

            // (1-2)
            if list.tok_match(Some(pos), "[[,(=<>] %num% [+-*/] %num% [],);=<>]") {
                let i1 = parse_int_prefix(list.text_at(Some(pos), 1).expect("matched"));
                let i2 = parse_int_prefix(list.text_at(Some(pos), 3).expect("matched"));
                let op = list.text_at(Some(pos), 2).expect("matched").as_bytes()[0];
                if !(i2 == 0 && op == b'/') {
                    let result = match op {
                        b'+' => i1 + i2,
                        b'-' => i1 - i2,
                        b'*' => i1 * i2,
                        _ => i1 / i2,
                    };
                    pos = list.next(pos).expect("matched");
                    list.set_text(pos, result.to_string());
                    for _ in 0..2 {
                        list.delete_next(pos);
                    }
                    ret = true;
                }
            }

            // remove parentheses around a number
            if !list.is_name(pos) && list.tok_match(list.next(pos), "( %num% )") {
                list.delete_next(pos);
                pos = list.next(pos).expect("matched");
                list.delete_next(pos);
                ret = true;
            }

            // remove parentheses around a variable, but keep the
            // template-argument shape `> ( name )` intact
            if !list.is_name(pos)
                && list.text(pos) != ">"
                && list.tok_match(list.next(pos), "( %var% ) [;),+-*/><]]")
            {
                list.delete_next(pos);
                pos = list.next(pos).expect("matched");
                list.delete_next(pos);
                ret = true;
            }

            tok = list.next(pos);
        }
        ret
    }

    /// `*(v + N)` => `v [ N ]` in bracketed contexts.
    pub(crate) fn simplify_pointer_arithmetic(&mut self) {
        let list = &mut self.list;
        let mut tok = list.head();
        while let Some(id) = tok {
            if !b";{}(=<>".contains(&list.first_byte(id)) {
                tok = list.next(id);
                continue;
            }
            if list.next(id).is_none() {
                break;
            }

            if list.tok_match(list.next(id), "* ( %var% + %num% )") {
                let var = list.text_at(Some(id), 3).expect("matched").to_string();
                let num = list.text_at(Some(id), 5).expect("matched").to_string();
                let texts = [var.as_str(), "[", num.as_str(), "]"];
                let mut pos = id;
                for text in texts {
                    pos = list.next(pos).expect("matched");
                    list.set_text(pos, text);
                }
                list.delete_next(pos);
                list.delete_next(pos);
                tok = list.next(pos);
                continue;
            }

            tok = list.next(id);
        }
    }

    /// `( ( expr ) )` with matching inner and outer parentheses
    /// collapses to `( expr )`.
    pub(crate) fn simplify_redundant_parentheses(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut tok = list.head();
        while let Some(id) = tok {
            if list.simple_match(Some(id), "( (") {
                let mut par = 0i32;
                let mut t2 = Some(id);
                while let Some(x) = t2 {
                    let text = list.text(x);
                    if text == "(" {
                        par += 1;
                    } else if text == ")" {
                        par -= 1;
                        if par == 1 {
                            if list.simple_match(Some(x), ") )") {
                                list.delete_next(id);
                                list.delete_next(x);
                                ret = true;
                            }
                            break;
                        }
                    }
                    t2 = list.next(x);
                }
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
    fn test_multiply_by_one_collapses() {
        assert_eq!(simplified("a = b * 1;\n"), "a = b ;");
        assert_eq!(simplified("a = 1 * b;\n"), "a = b ;");
    }

    #[test]
    fn test_fold_in_parens() {
        assert_eq!(simplified("a = (2 + 3);\n"), "a = 5 ;");
        assert_eq!(simplified("f(10 - 4);\n"), "f ( 6 ) ;");
    }

    #[test]
    fn test_parens_around_number_removed() {
        assert_eq!(simplified("a = (7);\n"), "a = 7 ;");
    }

    #[test]
    fn test_parens_around_variable_removed() {
        assert_eq!(simplified("a = (b);\n"), "a = b ;");
    }

    #[test]
    fn test_prefix_parens_kept() {
        // a name in front means a call, not grouping
        assert_eq!(simplified("a = f(b);\n"), "a = f ( b ) ;");
    }

    #[test]
    fn test_pointer_arithmetic_rewrite() {
        assert_eq!(simplified("x = *(p + 4);\n"), "x = p [ 4 ] ;");
    }

    #[test]
    fn test_doubled_parentheses_collapse() {
        assert_eq!(
            simplified("void f() { while ((x)) g(); }\n"),
            "void f ( ) { while ( x ) { g ( ) ; } }"
        );
    }
}
