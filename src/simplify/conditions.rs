//! Condition simplification
//!
//! Boolean connectives absorb `true`/`false`, numeric constants in
//! conditions normalize to booleans, constant comparisons fold, and
//! `if (true)`/`if (false)` statements keep only the selected branch.

use crate::tokenizer::Tokenizer;
use crate::tokens::TokenId;
use crate::utils::numeric::parse_float_prefix;

impl Tokenizer {
    pub(crate) fn simplify_conditions(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut cur = list.head();
        while let Some(id) = cur {
            let mut pos = id;

            if list.simple_match(Some(pos), "( true &&")
                || list.simple_match(Some(pos), "&& true &&")
                || list.simple_match(list.next(pos), "&& true )")
            {
                list.delete_next(pos);
                list.delete_next(pos);
                ret = true;
            } else if list.simple_match(Some(pos), "( false ||")
                || list.simple_match(Some(pos), "|| false ||")
                || list.simple_match(list.next(pos), "|| false )")
            {
                list.delete_next(pos);
                list.delete_next(pos);
                ret = true;
            }

            // numeric constant directly in a condition becomes a bool
            if list.tok_match(Some(pos), "if|while ( %num%")
                && matches!(
                    list.text_at(Some(pos), 3),
                    Some(")") | Some("||") | Some("&&")
                )
            {
                let num = list.at(Some(pos), 2).expect("matched");
                let value = if list.text(num) != "0" { "true" } else { "false" };
                list.set_text(num, value);
                ret = true;
            }

            // same for a numeric constant between connectives
            let text = list.text(pos).to_string();
            if (text == "&&" || text == "||")
                && list.tok_match(list.next(pos), "%num%")
                && matches!(
                    list.text_at(Some(pos), 2),
                    Some(")") | Some("&&") | Some("||")
                )
            {
                let num = list.next(pos).expect("matched");
                let value = if list.text(num) != "0" { "true" } else { "false" };
                list.set_text(num, value);
                ret = true;
            }

            // fold "(%num% CMP %num%)" to "(true)"/"(false)"
            if list.at(Some(pos), 4).is_none() {
                break;
            }
            if (text == "&&" || text == "||" || text == "(")
                && list.tok_match(list.next(pos), "%num% %any% %num%")
                && matches!(
                    list.text_at(Some(pos), 4),
                    Some(")") | Some("&&") | Some("||")
                )
            {
                let op1 = parse_float_prefix(list.text_at(Some(pos), 1).expect("matched"));
                let op2 = parse_float_prefix(list.text_at(Some(pos), 3).expect("matched"));
                let result = match list.text_at(Some(pos), 2).expect("matched") {
                    "==" => Some(op1 == op2),
                    "!=" => Some(op1 != op2),
                    ">=" => Some(op1 >= op2),
                    ">" => Some(op1 > op2),
                    "<=" => Some(op1 <= op2),
                    "<" => Some(op1 < op2),
                    _ => None,
                };
                if let Some(result) = result {
                    pos = list.next(pos).expect("matched");
                    list.delete_next(pos);
                    list.delete_next(pos);
                    list.set_text(pos, if result { "true" } else { "false" });
                    ret = true;
                }
            }

            cur = list.next(pos);
        }
        ret
    }

    /// Keep the selected branch of `if (true)` / `if (false)`, drop
    /// the rest.
    pub(crate) fn remove_redundant_conditions(&mut self) -> bool {
        let list = &mut self.list;
        let mut ret = false;
        let mut cur = list.head();
        while let Some(id) = cur {
            let mut pos = id;
            if !list.simple_match(Some(pos), "if")
                || !list.tok_match(list.next(pos), "( %bool% ) {")
            {
                cur = list.next(pos);
                continue;
            }

            let bool_value = list.text_at(Some(pos), 2) == Some("true");

            // token after the body's closing brace, if any
            let body_open = list.at(Some(pos), 4).expect("matched");
            let else_tag = list
                .find_closing(body_open, "{", "}")
                .and_then(|close| list.next(close));

            if else_tag.map(|e| list.text(e) == "else").unwrap_or(false) {
                let else_tag = else_tag.expect("checked");
                if list.simple_match(list.next(else_tag), "if") {
                    if !bool_value {
                        // "if (false) {aaa;} else if (...)" => "if (...)"
                        let keep_from = list.at(Some(else_tag), 2);
                        list.erase_between(pos, keep_from);
                        ret = true;
                    } else {
                        // keep the first arm, erase every else-if and
                        // else after it
                        let Some(last) = find_end_of_else_chain(list, else_tag) else {
                            return ret;
                        };
                        let before_else = list.prev(else_tag).expect("body precedes else");
                        list.erase_between(before_else, last);
                        ret = true;
                    }
                } else {
                    if !bool_value {
                        // "if (false) {aaa;} else {bbb;}" => "{bbb;}"
                        let else_body = list.at(Some(else_tag), 1);
                        match list.prev(pos) {
                            Some(prev) => pos = prev,
                            None => list.set_text(pos, ";"),
                        }
                        list.erase_between(pos, else_body);
                    } else {
                        // "if (true) {aaa;} else {bbb;}" => "{aaa;}"
                        if list.simple_match(list.next(else_tag), "{") {
                            let else_open = list.next(else_tag).expect("checked");
                            let Some(end) = list.find_closing(else_open, "{", "}") else {
                                return ret;
                            };
                            let after_end = list.next(end);
                            let before_else = list.prev(else_tag).expect("body precedes else");
                            list.erase_between(before_else, after_end);
                        }
                        match list.prev(pos) {
                            Some(prev) => pos = prev,
                            None => list.set_text(pos, ";"),
                        }
                        let keep_from = list.at(Some(pos), 5);
                        list.erase_between(pos, keep_from);
                    }
                    ret = true;
                }
            } else {
                if !bool_value {
                    // remove the if and its body entirely
                    match list.prev(pos) {
                        Some(prev) => pos = prev,
                        None => list.set_text(pos, ";"),
                    }
                    list.erase_between(pos, else_tag);
                } else {
                    // "if (true) {aaa;}" => "{aaa;}"
                    match list.prev(pos) {
                        Some(prev) => pos = prev,
                        None => list.set_text(pos, ";"),
                    }
                    let keep_from = list.at(Some(pos), 5);
                    list.erase_between(pos, keep_from);
                }
                ret = true;
            }

            cur = list.next(pos);
        }
        ret
    }
}

/// Walk an `else if` chain starting at its `else` token; returns the
/// token after the final arm's closing brace.
fn find_end_of_else_chain(
    list: &crate::tokens::TokenList,
    else_tag: TokenId,
) -> Option<Option<TokenId>> {
    // start at the "(" of the first else-if
    let mut tag = list.at(Some(else_tag), 2);
    loop {
        let mut t = tag?;
        if list.text(t) == "(" {
            t = list.find_closing(t, "(", ")")?;
            t = list.next(t)?;
        }
        let close = list.find_closing(t, "{", "}")?;
        let after = list.next(close);
        let Some(after_id) = after else {
            return Some(None);
        };
        if !list.simple_match(Some(after_id), "else") {
            return Some(after);
        }
        let mut next = list.next(after_id)?;
        if list.simple_match(Some(next), "if") {
            next = list.next(next)?;
        }
        tag = Some(next);
    }
}
