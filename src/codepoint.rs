//! `CodePointTuple`: one scalar, or a base scalar plus a combining/selector scalar.
//!
//! The tuple doubles as the key type of every lookup table, so it is `Copy`,
//! `Ord` and hashable. `-1` marks an absent slot and sorts before any scalar.

use std::fmt;

/// Marker for an absent slot.
pub const ABSENT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodePointTuple(pub i32, pub i32);

impl CodePointTuple {
    /// Both slots absent. Used for deletions and the end-of-stream sentinel.
    pub const EMPTY: CodePointTuple = CodePointTuple(ABSENT, ABSENT);

    #[inline]
    pub const fn single(cp: i32) -> Self {
        CodePointTuple(cp, ABSENT)
    }

    #[inline]
    pub const fn pair(cp1: i32, cp2: i32) -> Self {
        CodePointTuple(cp1, cp2)
    }

    #[inline]
    pub const fn from_char(c: char) -> Self {
        CodePointTuple(c as i32, ABSENT)
    }

    /// Builds a tuple from a string of one or two scalars.
    pub fn from_text(s: &str) -> Option<Self> {
        let mut it = s.chars();
        let first = it.next();
        let second = it.next();
        if it.next().is_some() {
            return None;
        }
        match (first, second) {
            (None, _) => Some(Self::EMPTY),
            (Some(a), None) => Some(Self::from_char(a)),
            (Some(a), Some(b)) => Some(CodePointTuple(a as i32, b as i32)),
        }
    }

    /// Number of present scalars (0, 1 or 2).
    #[inline]
    pub const fn size(&self) -> usize {
        match (self.0 != ABSENT, self.1 != ABSENT) {
            (false, _) => 0,
            (true, false) => 1,
            (true, true) => 2,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == ABSENT
    }

    #[inline]
    pub fn first(&self) -> Option<char> {
        to_char(self.0)
    }

    #[inline]
    pub fn second(&self) -> Option<char> {
        if self.0 == ABSENT {
            return None;
        }
        to_char(self.1)
    }

    /// True when the tuple is exactly the given single scalar.
    #[inline]
    pub fn is_char(&self, c: char) -> bool {
        self.0 == c as i32 && self.1 == ABSENT
    }

    pub fn chars(&self) -> impl Iterator<Item = char> {
        self.first().into_iter().chain(self.second())
    }

    #[inline]
    pub fn push_to(&self, out: &mut String) {
        out.extend(self.chars());
    }
}

impl From<char> for CodePointTuple {
    fn from(c: char) -> Self {
        Self::from_char(c)
    }
}

impl fmt::Display for CodePointTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|c| fmt::Write::write_char(f, c))
    }
}

#[inline]
fn to_char(cp: i32) -> Option<char> {
    u32::try_from(cp).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_sorts_first() {
        let base = CodePointTuple::single(0x8FBB);
        let ivs = CodePointTuple::pair(0x8FBB, 0xE0100);
        let next = CodePointTuple::single(0x8FBC);
        assert!(base < ivs);
        assert!(ivs < next);
        assert!(CodePointTuple::EMPTY < base);
    }

    #[test]
    fn size_and_display() {
        assert_eq!(CodePointTuple::EMPTY.size(), 0);
        assert_eq!(CodePointTuple::from_char('あ').size(), 1);
        let t = CodePointTuple::from_text("辻\u{E0101}").unwrap();
        assert_eq!(t.size(), 2);
        assert_eq!(t.to_string(), "辻\u{E0101}");
        assert_eq!(CodePointTuple::EMPTY.to_string(), "");
    }

    #[test]
    fn from_str_rejects_long_input() {
        assert_eq!(CodePointTuple::from_text("abc"), None);
        assert_eq!(CodePointTuple::from_text(""), Some(CodePointTuple::EMPTY));
    }

    #[test]
    fn is_char_only_matches_singles() {
        assert!(CodePointTuple::from_char('ー').is_char('ー'));
        assert!(!CodePointTuple::pair('ー' as i32, 0xFE00).is_char('ー'));
    }
}
