//! The transliterator abstraction shared by every rule.
//!
//! A transliterator wraps an input [`CharIterator`] and hands back a new lazy
//! iterator. Rules own nothing but immutable configuration and `'static`
//! tables, so a single instance can serve any number of threads; all
//! per-call state lives in the iterator it returns.

pub mod circled_or_squared;
pub mod combined;
pub mod hira_kata;
pub mod hira_kata_composition;
pub mod hyphens;
pub mod ivs_svs_base;
pub mod japanese_iteration_marks;
pub mod jisx0201_and_alike;
pub mod kanji_old_new;
pub mod prolonged_sound_marks;
pub mod simple;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    table::TableLoadError,
};

pub use circled_or_squared::{CircledOrSquared, CircledOrSquaredOptions, Templates};
pub use combined::{Combined, RomanNumerals};
pub use hira_kata::{HiraKata, HiraKataMode, HiraKataOptions};
pub use hira_kata_composition::{HiraKataComposition, HiraKataCompositionOptions};
pub use hyphens::{Hyphens, HyphensOptions, HyphensVariant};
pub use ivs_svs_base::{Charset, IvsSvsBase, IvsSvsBaseMode, IvsSvsBaseOptions};
pub use japanese_iteration_marks::JapaneseIterationMarks;
pub use jisx0201_and_alike::{Jisx0201AndAlike, Jisx0201AndAlikeOptions};
pub use kanji_old_new::KanjiOldNew;
pub use prolonged_sound_marks::{ProlongedSoundMarks, ProlongedSoundMarksOptions};
pub use simple::{IdeographicAnnotations, MathematicalAlphanumerics, Radicals, Spaces};

/// Public error type for every rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransliteratorError {
    #[error("unknown transliterator `{0}`")]
    UnknownRule(String),

    #[error("invalid options for `{rule}`: {reason}")]
    InvalidOptions { rule: &'static str, reason: String },

    #[error("lookup table unavailable: {0}")]
    Table(#[from] TableLoadError),

    #[error("character stream exhausted")]
    EndOfStream,
}

/// A single normalization rule.
pub trait Transliterator: Send + Sync {
    /// Registry name, e.g. `"hira-kata"`.
    fn name(&self) -> &'static str;

    /// Wraps `input` in this rule's lazy adapter.
    ///
    /// Output offsets start at 0 and advance by each unit's scalar count.
    /// The end-of-stream sentinel is always forwarded last.
    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a>;

    /// Runs this rule alone over `text`.
    fn transliterate_str(&self, text: &str) -> String {
        let pool = CharPool::with_capacity(text.len() + 1);
        self.transliterate(&pool, pool.stream(text)).collect_string()
    }
}

/// Per-rule configuration, as carried by the registry and recipes.
///
/// `Default` asks a rule for its own defaults; any other variant must match
/// the rule it is handed to.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RuleOptions {
    #[default]
    Default,
    CircledOrSquared(CircledOrSquaredOptions),
    Hyphens(HyphensOptions),
    IvsSvsBase(IvsSvsBaseOptions),
    Jisx0201AndAlike(Jisx0201AndAlikeOptions),
    HiraKata(HiraKataOptions),
    HiraKataComposition(HiraKataCompositionOptions),
    ProlongedSoundMarks(ProlongedSoundMarksOptions),
}

impl RuleOptions {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CircledOrSquared(_) => "circled-or-squared",
            Self::Hyphens(_) => "hyphens",
            Self::IvsSvsBase(_) => "ivs-svs-base",
            Self::Jisx0201AndAlike(_) => "jisx0201-and-alike",
            Self::HiraKata(_) => "hira-kata",
            Self::HiraKataComposition(_) => "hira-kata-composition",
            Self::ProlongedSoundMarks(_) => "prolonged-sound-marks",
        }
    }

    /// Error for options handed to the wrong rule.
    pub(crate) fn mismatch(&self, rule: &'static str) -> TransliteratorError {
        TransliteratorError::InvalidOptions {
            rule,
            reason: format!("got {} options", self.kind()),
        }
    }

    /// Accepts only [`RuleOptions::Default`], for rules without settings.
    pub(crate) fn expect_default(self, rule: &'static str) -> Result<(), TransliteratorError> {
        match self {
            Self::Default => Ok(()),
            other => Err(other.mismatch(rule)),
        }
    }
}

/// Output side of a rule iterator: the running offset plus a FIFO of
/// units queued by 1:N expansions.
pub(crate) struct Emitter<'a> {
    pool: &'a CharPool,
    offset: usize,
    pending: SmallVec<[Char; 4]>,
    pending_idx: usize,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(pool: &'a CharPool) -> Self {
        Self {
            pool,
            offset: 0,
            pending: SmallVec::new(),
            pending_idx: 0,
        }
    }

    #[inline]
    pub(crate) fn pool(&self) -> &'a CharPool {
        self.pool
    }

    /// Next queued unit, if any.
    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Char> {
        let c = *self.pending.get(self.pending_idx)?;
        self.pending_idx += 1;
        if self.pending_idx == self.pending.len() {
            self.pending.clear();
            self.pending_idx = 0;
        }
        Some(c)
    }

    /// Forwards `c` unchanged apart from its offset.
    #[inline]
    pub(crate) fn pass(&mut self, c: &Char) -> Char {
        let out = self.pool.with_offset(c, self.offset);
        self.offset += c.char_count();
        out
    }

    /// Emits `value` in place of `source`.
    #[inline]
    pub(crate) fn replace(&mut self, value: CodePointTuple, source: &Char) -> Char {
        let out = self.pool.derive(value, self.offset, source);
        self.offset += value.size();
        out
    }

    /// Queues `value` derived from `source`.
    pub(crate) fn enqueue(&mut self, value: CodePointTuple, source: &Char) {
        let c = self.replace(value, source);
        self.pending.push(c);
    }

    /// Queues one derived unit per scalar.
    pub(crate) fn enqueue_scalars<I>(&mut self, scalars: I, source: &Char)
    where
        I: IntoIterator<Item = char>,
    {
        for ch in scalars {
            self.enqueue(CodePointTuple::from_char(ch), source);
        }
    }

    /// Queues `c` as a pass-through.
    pub(crate) fn enqueue_pass(&mut self, c: &Char) {
        let out = self.pass(c);
        self.pending.push(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitter_drains_fifo_in_order() {
        let pool = CharPool::new();
        let src: Vec<Char> = pool.stream("㍿").collect();
        let mut out = Emitter::new(&pool);
        out.enqueue_scalars("株式".chars(), &src[0]);
        let a = out.pop().unwrap();
        let b = out.pop().unwrap();
        assert_eq!((a.value.to_string(), a.offset), ("株".to_string(), 0));
        assert_eq!((b.value.to_string(), b.offset), ("式".to_string(), 1));
        assert!(out.pop().is_none());
        assert_eq!(out.pass(&src[1]).offset, 2);
    }

    #[test]
    fn default_options_only_fit_plain_rules() {
        assert!(RuleOptions::Default.expect_default("spaces").is_ok());
        let err = RuleOptions::HiraKata(HiraKataOptions::default())
            .expect_default("spaces")
            .unwrap_err();
        assert_eq!(
            err,
            TransliteratorError::InvalidOptions {
                rule: "spaces",
                reason: "got hira-kata options".into()
            }
        );
    }
}
