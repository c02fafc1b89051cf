//! Arena-backed doubly-linked token list
//!
//! The rewrite passes splice, delete and insert tokens while other
//! cursors (the function index, pattern windows) keep stable references
//! into the stream. An owning vector of slots with index-based links
//! gives both: `TokenId`s stay valid across arbitrary splicing, and a
//! delete is a constant-time unlink. Unlinked slots are reclaimed in
//! bulk by `clear`.
use super::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to one token slot in a [`TokenList`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(usize);

#[derive(Debug, Clone)]
struct Slot {
    token: Token,
    prev: Option<TokenId>,
    next: Option<TokenId>,
}

/// The mutable token stream.
#[derive(Debug, Clone, Default)]
pub struct TokenList {
    slots: Vec<Slot>,
    head: Option<TokenId>,
    tail: Option<TokenId>,
    live: usize,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every token and reclaim the arena storage.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.live = 0;
    }

    pub fn head(&self) -> Option<TokenId> {
        self.head
    }

    pub fn tail(&self) -> Option<TokenId> {
        self.tail
    }

    /// Number of linked tokens
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot(&self, id: TokenId) -> &Slot {
        &self.slots[id.0]
    }

    fn slot_mut(&mut self, id: TokenId) -> &mut Slot {
        &mut self.slots[id.0]
    }

    fn alloc(&mut self, token: Token) -> TokenId {
        let id = TokenId(self.slots.len());
        self.slots.push(Slot {
            token,
            prev: None,
            next: None,
        });
        id
    }

    // === NAVIGATION ===

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.slot(id).next
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.slot(id).prev
    }

    /// N-step lookahead from an optional cursor
    pub fn at(&self, start: Option<TokenId>, n: usize) -> Option<TokenId> {
        let mut cur = start;
        for _ in 0..n {
            cur = cur.and_then(|id| self.next(id));
        }
        cur
    }

    /// Text of the token n steps ahead of the cursor
    pub fn text_at(&self, start: Option<TokenId>, n: usize) -> Option<&str> {
        self.at(start, n).map(|id| self.text(id))
    }

    /// Iterate the linked tokens front to back
    pub fn ids(&self) -> TokenIter<'_> {
        TokenIter {
            list: self,
            cur: self.head,
        }
    }

    // === ACCESSORS ===

    pub fn token(&self, id: TokenId) -> &Token {
        &self.slot(id).token
    }

    pub fn text(&self, id: TokenId) -> &str {
        &self.slot(id).token.text
    }

    /// Rewrite a token's text. A token rewritten to something that is
    /// not a name loses its variable identity (`var_id > 0` implies
    /// `is_name`).
    pub fn set_text(&mut self, id: TokenId, text: impl Into<String>) {
        let slot = self.slot_mut(id);
        slot.token.text = text.into();
        if !slot.token.is_name() {
            slot.token.var_id = 0;
        }
    }

    pub fn var_id(&self, id: TokenId) -> u32 {
        self.slot(id).token.var_id
    }

    pub fn set_var_id(&mut self, id: TokenId, var_id: u32) {
        self.slot_mut(id).token.var_id = var_id;
    }

    pub fn file_index(&self, id: TokenId) -> usize {
        self.slot(id).token.file_index
    }

    pub fn line(&self, id: TokenId) -> u32 {
        self.slot(id).token.line
    }

    pub fn is_name(&self, id: TokenId) -> bool {
        self.slot(id).token.is_name()
    }

    pub fn is_number(&self, id: TokenId) -> bool {
        self.slot(id).token.is_number()
    }

    /// First byte of the token text
    pub fn first_byte(&self, id: TokenId) -> u8 {
        self.slot(id).token.text.as_bytes()[0]
    }

    // === MUTATION PRIMITIVES ===

    /// Append a token at the back of the stream.
    pub fn push_back(&mut self, token: Token) -> TokenId {
        let id = self.alloc(token);
        match self.tail {
            Some(tail) => {
                self.slot_mut(tail).next = Some(id);
                self.slot_mut(id).prev = Some(tail);
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.live += 1;
        id
    }

    /// Insert a new token after `id`, inheriting its origin.
    pub fn insert_after(&mut self, id: TokenId, text: impl Into<String>) -> TokenId {
        let token = Token::new(text, self.line(id), self.file_index(id));
        self.insert_token_after(id, token)
    }

    /// Insert a fully specified token after `id`.
    pub fn insert_token_after(&mut self, id: TokenId, token: Token) -> TokenId {
        let new_id = self.alloc(token);
        let old_next = self.slot(id).next;
        self.slot_mut(new_id).prev = Some(id);
        self.slot_mut(new_id).next = old_next;
        self.slot_mut(id).next = Some(new_id);
        match old_next {
            Some(next) => self.slot_mut(next).prev = Some(new_id),
            None => self.tail = Some(new_id),
        }
        self.live += 1;
        new_id
    }

    /// Unlink the token after `id`. No-op at the tail.
    pub fn delete_next(&mut self, id: TokenId) {
        let Some(victim) = self.slot(id).next else {
            return;
        };
        let after = self.slot(victim).next;
        self.slot_mut(id).next = after;
        match after {
            Some(a) => self.slot_mut(a).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.slot_mut(victim).prev = None;
        self.slot_mut(victim).next = None;
        self.live -= 1;
    }

    /// Unlink the head token.
    pub fn pop_front(&mut self) {
        let Some(head) = self.head else {
            return;
        };
        let next = self.slot(head).next;
        self.head = next;
        match next {
            Some(n) => self.slot_mut(n).prev = None,
            None => self.tail = None,
        }
        self.slot_mut(head).prev = None;
        self.slot_mut(head).next = None;
        self.live -= 1;
    }

    /// Delete every token strictly between `begin` and `end`; an `end`
    /// of `None` deletes through the tail.
    pub fn erase_between(&mut self, begin: TokenId, end: Option<TokenId>) {
        while let Some(next) = self.slot(begin).next {
            if Some(next) == end {
                break;
            }
            self.delete_next(begin);
        }
    }

    /// Copy `n` tokens starting at `src` and insert the copies after
    /// `dest`, preserving origin and variable identity.
    pub fn insert_copies(&mut self, dest: TokenId, src: TokenId, n: usize) {
        let mut copies = Vec::with_capacity(n);
        let mut cur = Some(src);
        for _ in 0..n {
            let Some(id) = cur else {
                break;
            };
            copies.push(self.slot(id).token.clone());
            cur = self.slot(id).next;
        }
        let mut at = dest;
        for token in copies {
            at = self.insert_token_after(at, token);
        }
    }

    /// Splice the linked range `start..=end` into the position of
    /// `dest`, unlinking `dest` itself.
    pub fn replace_with_range(&mut self, dest: TokenId, start: TokenId, end: TokenId) {
        // unlink the range from its current position
        let before = self.slot(start).prev;
        let after = self.slot(end).next;
        match before {
            Some(b) => self.slot_mut(b).next = after,
            None => self.head = after,
        }
        match after {
            Some(a) => self.slot_mut(a).prev = before,
            None => self.tail = before,
        }
        // splice it in place of dest
        let dest_prev = self.slot(dest).prev;
        let dest_next = self.slot(dest).next;
        self.slot_mut(start).prev = dest_prev;
        self.slot_mut(end).next = dest_next;
        match dest_prev {
            Some(p) => self.slot_mut(p).next = Some(start),
            None => self.head = Some(start),
        }
        match dest_next {
            Some(n) => self.slot_mut(n).prev = Some(end),
            None => self.tail = Some(end),
        }
        self.slot_mut(dest).prev = None;
        self.slot_mut(dest).next = None;
        self.live -= 1;
    }

    /// Find the closing `close` matching the nesting opened right after
    /// `tok`, scanning forward.
    pub fn find_closing(&self, tok: TokenId, open: &str, close: &str) -> Option<TokenId> {
        let mut indent = 0i32;
        let mut cur = self.next(tok);
        while let Some(id) = cur {
            let text = self.text(id);
            if text == open {
                indent += 1;
            } else if text == close {
                indent -= 1;
                if indent < 0 {
                    return Some(id);
                }
            }
            cur = self.next(id);
        }
        None
    }

    /// Render the stream as space-separated token texts.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for id in self.ids() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(self.text(id));
        }
        out
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Forward iterator over linked token ids
pub struct TokenIter<'a> {
    list: &'a TokenList,
    cur: Option<TokenId>,
}

impl Iterator for TokenIter<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let id = self.cur?;
        self.cur = self.list.next(id);
        Some(id)
    }
}
