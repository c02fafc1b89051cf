//! Known-value propagation
//!
//! Within a flat statement region, an assignment `v = LIT ;` makes
//! every following use of `v` replaceable by the literal until a
//! nested block, another write, or an unrecognized use appears.
//! Functions that just return a constant are inlined at call sites.

use crate::tokenizer::Tokenizer;
use crate::tokens::{Pattern, TokenId};
use crate::utils::numeric::parse_int_prefix;

fn incdec(value: &mut String, op: &str) {
    let mut n = parse_int_prefix(value);
    if op == "++" {
        n += 1;
    } else if op == "--" {
        n -= 1;
    }
    *value = n.to_string();
}

impl Tokenizer {
    pub(crate) fn simplify_known_variables(&mut self) -> bool {
        let mut ret = false;

        // the global region first, then every function body
        ret |= self.propagate_in_block(self.list.head(), 1);

        let mut tok = self.list.head();
        while let Some(id) = tok {
            if self.list.tok_match(Some(id), ") const| {") {
                ret |= self.propagate_in_block(Some(id), 0);
            }
            tok = self.list.next(id);
        }
        ret
    }

    /// Scan one block for constant assignments and propagate them.
    /// `initial_indent` of 1 scans through to the end of the stream.
    fn propagate_in_block(&mut self, start: Option<TokenId>, initial_indent: i32) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut indent = initial_indent;
        let mut tok2 = start;
        while let Some(x) = tok2 {
            let text = list.text(x);
            if text == "{" {
                indent += 1;
            } else if text == "}" {
                indent -= 1;
                if indent <= 0 {
                    break;
                }
            } else if list.tok_match(Some(x), "%var% = %num% ;")
                || list.tok_match(Some(x), "%var% = %bool% ;")
            {
                let varid = list.var_id(x);
                if varid == 0 {
                    tok2 = list.next(x);
                    continue;
                }
                let mut value = list.text_at(Some(x), 2).expect("matched").to_string();

                let mut tok3 = list.next(x);
                while let Some(y) = tok3 {
                    // a nested block may be a loop, bail out
                    if list.tok_match(Some(y), "[{}]") {
                        break;
                    }
                    // the variable used in an unrecognized pattern
                    if list.var_id(y) == varid {
                        break;
                    }

                    let mut pos = y;

                    // condition uses
                    if list.tok_match_varid(
                        Some(pos),
                        "if ( %varid% ==|!=|<|<=|>|>= %num% )",
                        varid,
                    ) || list.tok_match_varid(Some(pos), "if ( %varid% )", varid)
                    {
                        pos = list.at(Some(pos), 2).expect("matched");
                        if list.text(pos) != value {
                            ret = true;
                        }
                        list.set_text(pos, value.as_str());
                    }

                    // calculation uses
                    if list.tok_match_varid(Some(pos), "[=+-*/[] %varid% [+-*/;]]", varid) {
                        pos = list.next(pos).expect("matched");
                        if list.text(pos) != value {
                            ret = true;
                        }
                        list.set_text(pos, value.as_str());
                    }

                    // postfix increment/decrement
                    if list.tok_match_varid(list.next(pos), "%varid% ++|--", varid) {
                        let op = list.text_at(Some(pos), 2).expect("matched").to_string();
                        if list.tok_match(Some(pos), "; %any% %any% ;") {
                            // the whole statement goes away
                            list.delete_next(pos);
                            list.delete_next(pos);
                        } else {
                            pos = list.next(pos).expect("matched");
                            list.set_text(pos, value.as_str());
                            list.delete_next(pos);
                        }
                        incdec(&mut value, &op);
                        let assigned = list.at(Some(x), 2).expect("matched");
                        list.set_text(assigned, value.as_str());
                        ret = true;
                    }

                    // prefix increment/decrement
                    if list.tok_match_varid(list.next(pos), "++|-- %varid%", varid) {
                        let op = list.text_at(Some(pos), 1).expect("matched").to_string();
                        incdec(&mut value, &op);
                        let assigned = list.at(Some(x), 2).expect("matched");
                        list.set_text(assigned, value.as_str());
                        if list.tok_match(Some(pos), "; %any% %any% ;") {
                            list.delete_next(pos);
                            list.delete_next(pos);
                        } else {
                            list.delete_next(pos);
                            let target = list.next(pos).expect("matched");
                            list.set_text(target, value.as_str());
                        }
                        pos = list.next(pos).expect("statement continues");
                        ret = true;
                    }

                    tok3 = list.next(pos);
                }
            }
            tok2 = list.next(x);
        }
        ret
    }

    /// `T f ( ) { return NUM ; }`: call sites of `f` in expression
    /// positions become the literal.
    pub(crate) fn simplify_function_return(&mut self) -> bool {
        let mut ret = false;
        let mut indent = 0i32;
        let mut tok = self.list.head();
        while let Some(id) = tok {
            let text = self.list.text(id);
            if text == "{" {
                indent += 1;
            } else if text == "}" {
                indent -= 1;
            } else if indent == 0
                && self
                    .list
                    .tok_match(Some(id), "%var% ( ) { return %num% ; }")
            {
                let name = self.list.text(id).to_string();
                let value = self.list.text_at(Some(id), 5).expect("matched").to_string();
                let pattern = Pattern::compile(&format!("[(=+-*/] {} ( ) [;)+-*/]", name));

                let list = &mut self.list;
                let mut tok2 = list.head();
                while let Some(y) = tok2 {
                    let mut pos = y;
                    if pattern.match_at(list, Some(y), 0) {
                        pos = list.next(y).expect("matched");
                        list.set_text(pos, value.as_str());
                        list.delete_next(pos);
                        list.delete_next(pos);
                        ret = true;
                    }
                    tok2 = list.next(pos);
                }
            }
            tok = self.list.next(id);
        }
        ret
    }
}
