//! Post-lex stream normalization
//!
//! Runs inside `tokenize()` right after the byte scan: fuses adjacent
//! token pairs into multi-character operators, folds typedefs onto
//! their uses, and strips inline assembly and storage qualifiers the
//! rewrite passes never want to see.

use crate::tokens::TokenList;

/// Pairs fused into one token. `->` deliberately becomes `.`: the
/// simplified stream does not keep the pointer/value distinction.
const COMBINE_WITH_NEXT: [(&str, &str, &str); 18] = [
    ("<", "<", "<<"),
    ("&", "&", "&&"),
    ("|", "|", "||"),
    ("+", "=", "+="),
    ("-", "=", "-="),
    ("*", "=", "*="),
    ("/", "=", "/="),
    ("&", "=", "&="),
    ("|", "=", "|="),
    ("=", "=", "=="),
    ("!", "=", "!="),
    ("<", "=", "<="),
    (">", "=", ">="),
    (":", ":", "::"),
    ("-", ">", "."),
    ("private", ":", "private:"),
    ("protected", ":", "protected:"),
    ("public", ":", "public:"),
];

/// One left-to-right pass over the fusion table. Order-preserving:
/// tokens are only merged, never moved.
pub fn combine_operators(list: &mut TokenList) {
    let mut tok = list.head();
    while let Some(id) = tok {
        if list.next(id).is_none() {
            break;
        }
        for &(first, second, combined) in &COMBINE_WITH_NEXT {
            let next_matches = list
                .next(id)
                .map(|n| list.text(n) == second)
                .unwrap_or(false);
            if list.text(id) == first && next_matches {
                list.set_text(id, combined);
                list.delete_next(id);
            }
        }
        tok = list.next(id);
    }
}

/// Fold `typedef A B ;` and `typedef A B C ;` statements: the
/// statement is removed and later uses of the alias are rewritten to
/// the underlying type tokens.
pub fn fold_typedefs(list: &mut TokenList) {
    let mut tok = list.head();
    while let Some(id) = tok {
        if list.tok_match(Some(id), "typedef %type% %type% ;") {
            let type1 = list.text_at(Some(id), 1).expect("matched").to_string();
            let alias = list.text_at(Some(id), 2).expect("matched").to_string();
            let after = list.at(Some(id), 4);

            let mut t2 = after;
            while let Some(x) = t2 {
                if list.text(x) == alias {
                    list.set_text(x, type1.as_str());
                }
                t2 = list.next(x);
            }

            delete_statement(list, id, 4);
            tok = after;
            continue;
        }

        if list.tok_match(Some(id), "typedef %type% %type% %type% ;") {
            let type1 = list.text_at(Some(id), 1).expect("matched").to_string();
            let type2 = list.text_at(Some(id), 2).expect("matched").to_string();
            let alias = list.text_at(Some(id), 3).expect("matched").to_string();
            let after = list.at(Some(id), 5);

            let mut t2 = after;
            while let Some(x) = t2 {
                if list.text(x) == alias {
                    list.set_text(x, type1.as_str());
                    let inserted = list.insert_after(x, type2.as_str());
                    t2 = list.next(inserted);
                    continue;
                }
                t2 = list.next(x);
            }

            delete_statement(list, id, 5);
            tok = after;
            continue;
        }

        tok = list.next(id);
    }
}

/// Unlink `count` tokens starting at `first`.
fn delete_statement(list: &mut TokenList, first: crate::tokens::TokenId, count: usize) {
    match list.prev(first) {
        Some(prev) => {
            for _ in 0..count {
                list.delete_next(prev);
            }
        }
        None => {
            for _ in 0..count {
                list.pop_front();
            }
        }
    }
}

/// Delete `__asm { ... }` through the first closing brace. Inline
/// assembly carries nothing the analysis passes understand.
pub fn remove_inline_assembly(list: &mut TokenList) {
    let mut tok = list.head();
    while let Some(id) = tok {
        if list.simple_match(list.next(id), "__asm {") {
            while list.next(id).is_some() {
                let last = list.simple_match(list.next(id), "}");
                list.delete_next(id);
                if last {
                    break;
                }
            }
        }
        tok = list.next(id);
    }
}

/// Remove every occurrence of a single-word qualifier (`volatile`,
/// `mutable`), head tokens included.
pub fn remove_qualifier(list: &mut TokenList, word: &str) {
    while list.head().map(|h| list.text(h) == word).unwrap_or(false) {
        list.pop_front();
    }
    let mut tok = list.head();
    while let Some(id) = tok {
        while list
            .next(id)
            .map(|n| list.text(n) == word)
            .unwrap_or(false)
        {
            list.delete_next(id);
        }
        tok = list.next(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    fn build(texts: &[&str]) -> TokenList {
        let mut list = TokenList::new();
        for t in texts {
            list.push_back(Token::new(*t, 1, 0));
        }
        list
    }

    #[test]
    fn test_combine_operators() {
        let mut list = build(&["a", "<", "<", "b", ";", "c", "=", "=", "d"]);
        combine_operators(&mut list);
        assert_eq!(list.to_text(), "a << b ; c == d");
    }

    #[test]
    fn test_combine_is_idempotent() {
        let mut list = build(&["a", "&", "&", "b", "-", ">", "c", "<", "="]);
        combine_operators(&mut list);
        let once = list.to_text();
        combine_operators(&mut list);
        assert_eq!(list.to_text(), once);
        assert_eq!(once, "a && b . c <=");
    }

    #[test]
    fn test_arrow_becomes_dot() {
        let mut list = build(&["p", "-", ">", "x"]);
        combine_operators(&mut list);
        assert_eq!(list.to_text(), "p . x");
    }

    #[test]
    fn test_access_specifier_fusion() {
        let mut list = build(&["public", ":", "int", "x", ";"]);
        combine_operators(&mut list);
        assert_eq!(list.to_text(), "public: int x ;");
    }

    #[test]
    fn test_typedef_two_tokens() {
        let mut list = build(&["typedef", "int", "U", ";", "U", "v", ";"]);
        fold_typedefs(&mut list);
        assert_eq!(list.to_text(), "int v ;");
    }

    #[test]
    fn test_typedef_three_tokens() {
        let mut list = build(&["typedef", "unsigned", "int", "U", ";", "U", "v", ";"]);
        fold_typedefs(&mut list);
        assert_eq!(list.to_text(), "unsigned int v ;");
    }

    #[test]
    fn test_remove_inline_assembly() {
        let mut list = build(&["f", ";", "__asm", "{", "mov", "eax", "}", "g", ";"]);
        remove_inline_assembly(&mut list);
        assert_eq!(list.to_text(), "f ; g ;");
    }

    #[test]
    fn test_remove_qualifier_including_head() {
        let mut list = build(&["volatile", "int", "volatile", "x", ";"]);
        remove_qualifier(&mut list, "volatile");
        assert_eq!(list.to_text(), "int x ;");
    }
}
