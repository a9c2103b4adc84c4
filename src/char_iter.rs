//! Pull-based stream of [`Char`]s.
//!
//! Every rule takes a `CharIterator` and returns a new one wrapping it, so a
//! recipe becomes a nested chain of lazy adapters. Nothing is computed until
//! the outermost iterator is pulled.

use std::iter::FusedIterator;

use crate::{char::Char, transliterator::TransliteratorError};

pub struct CharIterator<'a> {
    inner: Box<dyn Iterator<Item = Char> + 'a>,
    peeked: Option<Option<Char>>,
}

impl<'a> CharIterator<'a> {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Char> + 'a,
    {
        Self {
            inner: Box::new(iter.fuse()),
            peeked: None,
        }
    }

    /// Whether another unit is available. Repeated calls pull upstream at
    /// most once.
    pub fn has_next(&mut self) -> bool {
        self.peek().is_some()
    }

    pub fn peek(&mut self) -> Option<&Char> {
        let inner = &mut self.inner;
        self.peeked.get_or_insert_with(|| inner.next()).as_ref()
    }

    /// Like `next`, but reports exhaustion as an error.
    pub fn next_char(&mut self) -> Result<Char, TransliteratorError> {
        self.next().ok_or(TransliteratorError::EndOfStream)
    }

    /// Drains the stream into text, skipping the sentinel.
    pub fn collect_string(self) -> String {
        let (lower, _) = self.size_hint();
        let mut out = String::with_capacity(lower);
        for c in self {
            c.value.push_to(&mut out);
        }
        out
    }
}

impl Iterator for CharIterator<'_> {
    type Item = Char;

    #[inline]
    fn next(&mut self) -> Option<Char> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.inner.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let extra = match self.peeked {
            Some(Some(_)) => 1,
            Some(None) => return (0, Some(0)),
            None => 0,
        };
        let (lo, hi) = self.inner.size_hint();
        (lo + extra, hi.and_then(|h| h.checked_add(extra)))
    }
}

impl FusedIterator for CharIterator<'_> {}

#[cfg(test)]
mod tests {
    use crate::char::CharPool;

    #[test]
    fn has_next_is_idempotent() {
        let pool = CharPool::new();
        let mut it = pool.stream("a");
        assert!(it.has_next());
        assert!(it.has_next());
        assert_eq!(it.next().map(|c| c.value.to_string()), Some("a".to_string()));
        assert!(it.has_next()); // sentinel
        assert!(it.next().is_some_and(|c| c.is_sentinel()));
        assert!(!it.has_next());
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn next_char_reports_end_of_stream() {
        let pool = CharPool::new();
        let mut it = pool.stream("");
        assert!(it.next_char().is_ok_and(|c| c.is_sentinel()));
        assert!(matches!(
            it.next_char(),
            Err(crate::transliterator::TransliteratorError::EndOfStream)
        ));
    }

    #[test]
    fn collect_string_skips_sentinel() {
        let pool = CharPool::new();
        assert_eq!(pool.stream("かな").collect_string(), "かな");
    }
}
