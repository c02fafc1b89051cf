//! Variable-identity pass
//!
//! Numbers each declaration and links every textual use inside the
//! enclosing scope to it, so the rewrite passes and checkers can ask
//! "same variable?" instead of comparing names. Member accesses get
//! their own ids in a second sub-pass keyed on (outer id, member name).

use crate::logging::codes;
use crate::log_success;
use crate::tokenizer::Tokenizer;

impl Tokenizer {
    /// (Re)build variable identities over the whole stream.
    pub fn set_var_id(&mut self) {
        let list = &mut self.list;

        // clear all ids
        let mut tok = list.head();
        while let Some(id) = tok {
            list.set_var_id(id, 0);
            tok = list.next(id);
        }

        let mut var_id: u32 = 0;

        // declarations and their scoped uses
        let mut tok = list.head();
        while let Some(id) = tok {
            if Some(id) != list.head() && !list.tok_match(Some(id), "[;{}(]") {
                tok = list.next(id);
                continue;
            }

            // step onto the type token following the boundary
            let mut cur = id;
            if list.tok_match(Some(id), "[;{}(] %type%") {
                cur = list.next(id).expect("matched");
            }

            if list.tok_match(Some(cur), "else|return") {
                tok = list.next(cur);
                continue;
            }

            // walk the declarator: names and '*' until one of "; [ = ("
            let mut varname: Option<String> = None;
            let mut tok2 = list.next(cur);
            while let Some(t2) = tok2 {
                if list.tok_match(Some(t2), "[;[=(]") {
                    break;
                }
                if list.is_name(t2) {
                    varname = Some(list.text(t2).to_string());
                } else if list.text(t2) != "*" {
                    break;
                }
                tok2 = list.next(t2);
            }

            // declaration found when the walk ended on "; [ ="
            if let (true, Some(name)) = (list.tok_match(tok2, "[;[=]"), varname) {
                var_id += 1;
                let mut indent = 0i32;
                let mut par = 0i32;
                let mut dot = false;
                let mut t2 = list.next(cur);
                while let Some(x) = t2 {
                    let text = list.text(x);
                    if !dot && text == name {
                        list.set_var_id(x, var_id);
                    } else if text == "{" {
                        indent += 1;
                    } else if text == "}" {
                        indent -= 1;
                        if indent < 0 {
                            break;
                        }
                    } else if text == "(" {
                        par += 1;
                    } else if text == ")" {
                        // a parameter list closing into a function body
                        // does not leave the scope
                        if par == 0 && indent == 0 && list.tok_match(Some(x), ") const| {") {
                        } else {
                            par -= 1;
                        }
                    } else if par < 0 && text == ";" {
                        break;
                    }
                    dot = list.text(x) == ".";
                    t2 = list.next(x);
                }
            }

            tok = list.next(cur);
        }

        // struct/class members: one id per (outer id, member name)
        let mut tok = list.head();
        while let Some(id) = tok {
            let member_unnumbered = list
                .at(Some(id), 2)
                .map(|x| list.var_id(x) == 0)
                .unwrap_or(false);
            if list.var_id(id) != 0
                && list.tok_match(list.next(id), ". %var%")
                && member_unnumbered
            {
                var_id += 1;
                let outer = list.var_id(id);
                let member = list.text_at(Some(id), 2).expect("matched").to_string();
                let pattern = format!(". {}", member);
                let mut t2 = Some(id);
                while let Some(x) = t2 {
                    if list.var_id(x) == outer && list.simple_match(list.next(x), &pattern) {
                        let target = list.at(Some(x), 2).expect("matched");
                        list.set_var_id(target, var_id);
                    }
                    t2 = list.next(x);
                }
            }
            tok = list.next(id);
        }

        log_success!(codes::success::VARIABLE_IDS_ASSIGNED,
            "Variable identities assigned",
            "ids" => var_id
        );
    }
}
