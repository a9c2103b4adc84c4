//! Streamed units and the per-call provenance arena.

use std::cell::RefCell;

use crate::{char_iter::CharIterator, codepoint::CodePointTuple, unicode::is_variation_selector};

/// Index of a [`Char`] inside its [`CharPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharId(u32);

/// A single streamed unit.
///
/// `source` points at the unit this one was derived from. It is a plain
/// index into the owning pool, never an owning edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char {
    pub value: CodePointTuple,
    pub offset: usize,
    pub source: Option<CharId>,
    id: CharId,
}

impl Char {
    #[inline]
    pub fn id(&self) -> CharId {
        self.id
    }

    /// End-of-stream marker appended by [`CharPool::stream`].
    ///
    /// Deletions never reach the output, so an empty value only ever
    /// travels downstream as the sentinel.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of scalars this unit stands for.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.value.size()
    }
}

/// Arena holding every [`Char`] created during one pipeline invocation.
///
/// Single-threaded by construction. A fresh pool is created per call and
/// dropped once the output string is assembled.
#[derive(Debug, Default)]
pub struct CharPool {
    chars: RefCell<Vec<Char>>,
}

impl CharPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    fn push(&self, value: CodePointTuple, offset: usize, source: Option<CharId>) -> Char {
        let mut chars = self.chars.borrow_mut();
        let id = CharId(chars.len() as u32);
        let c = Char {
            value,
            offset,
            source,
            id,
        };
        chars.push(c);
        c
    }

    /// Decodes `text` into units terminated by a sentinel.
    ///
    /// A scalar followed by a variation selector becomes one two-scalar
    /// unit; every other scalar is a unit of its own.
    pub fn stream<'a>(&'a self, text: &'a str) -> CharIterator<'a> {
        let mut offset = 0;
        let mut done = false;
        let mut chars = text.chars().peekable();
        CharIterator::new(std::iter::from_fn(move || {
            if done {
                return None;
            }
            match chars.next() {
                Some(ch) => {
                    let value = match chars.next_if(|&next| is_variation_selector(next)) {
                        Some(vs) => CodePointTuple::pair(ch as i32, vs as i32),
                        None => CodePointTuple::from_char(ch),
                    };
                    let c = self.push(value, offset, None);
                    offset += value.size();
                    Some(c)
                }
                None => {
                    done = true;
                    Some(self.push(CodePointTuple::EMPTY, offset, None))
                }
            }
        }))
    }

    /// Creates a unit derived from `source`.
    #[inline]
    pub fn derive(&self, value: CodePointTuple, offset: usize, source: &Char) -> Char {
        self.push(value, offset, Some(source.id))
    }

    /// Moves a pass-through unit to `offset`.
    ///
    /// Returns `c` itself when nothing changes, so untouched text does not
    /// grow the arena.
    #[inline]
    pub fn with_offset(&self, c: &Char, offset: usize) -> Char {
        if c.offset == offset {
            return *c;
        }
        self.push(c.value, offset, Some(c.id))
    }

    pub fn get(&self, id: CharId) -> Option<Char> {
        self.chars.borrow().get(id.0 as usize).copied()
    }

    pub fn source_of(&self, c: &Char) -> Option<Char> {
        c.source.and_then(|id| self.get(id))
    }

    /// True when some ancestor of `c` carried a different value.
    pub fn is_transliterated(&self, c: &Char) -> bool {
        let chars = self.chars.borrow();
        let mut current = *c;
        while let Some(src) = current.source.and_then(|id| chars.get(id.0 as usize)) {
            if src.value != current.value {
                return true;
            }
            current = *src;
        }
        false
    }

    /// Walks the provenance chain back to the unit read from the input text.
    pub fn origin_of(&self, c: &Char) -> Char {
        let chars = self.chars.borrow();
        let mut current = *c;
        while let Some(src) = current.source.and_then(|id| chars.get(id.0 as usize)) {
            current = *src;
        }
        current
    }

    pub fn len(&self) -> usize {
        self.chars.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.borrow().is_empty()
    }
}
