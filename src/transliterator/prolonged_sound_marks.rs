//! Repairs hyphen-like characters used as the katakana prolonged sound mark.
//!
//! A hyphen, dash or minus right after a vowel-ended kana becomes ー (or ｰ
//! after half-width kana). Optionally, runs of them after an alphanumeric
//! become hyphen-minus of the matching width.

use smallvec::SmallVec;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
};

const NAME: &str = "prolonged-sound-marks";

// ── Character classes ──
// High bits: script. Low bits: flags.
mod class {
    pub const OTHER: u8 = 0x00;
    pub const HIRAGANA: u8 = 0x20;
    pub const KATAKANA: u8 = 0x40;
    pub const ALPHABET: u8 = 0x60;
    pub const DIGIT: u8 = 0x80;
    pub const EITHER: u8 = 0xA0;
    pub const SCRIPT_MASK: u8 = 0xE0;

    pub const HALFWIDTH: u8 = 1 << 0;
    pub const VOWEL_ENDED: u8 = 1 << 1;
    pub const HATSUON: u8 = 1 << 2;
    pub const SOKUON: u8 = 1 << 3;
    pub const PROLONGED_SOUND_MARK: u8 = 1 << 4;
}

use class::*;

fn classify(value: &CodePointTuple) -> u8 {
    let Some(c) = value.first() else {
        return OTHER;
    };
    match c as u32 {
        0x30..=0x39 => DIGIT | HALFWIDTH,
        0xFF10..=0xFF19 => DIGIT,
        0x41..=0x5A | 0x61..=0x7A => ALPHABET | HALFWIDTH,
        0xFF21..=0xFF3A | 0xFF41..=0xFF5A => ALPHABET,
        0xFF70 => KATAKANA | PROLONGED_SOUND_MARK | HALFWIDTH,
        0x30FC => EITHER | PROLONGED_SOUND_MARK,
        0x3063 => HIRAGANA | SOKUON,
        0x3093 => HIRAGANA | HATSUON,
        0x30C3 => KATAKANA | SOKUON,
        0x30F3 => KATAKANA | HATSUON,
        0xFF6F => KATAKANA | SOKUON | HALFWIDTH,
        0xFF9D => KATAKANA | HATSUON | HALFWIDTH,
        0x3041..=0x309C | 0x309F => HIRAGANA | VOWEL_ENDED,
        0x30A1..=0x30FA | 0x30FD..=0x30FF => KATAKANA | VOWEL_ENDED,
        0xFF66..=0xFF6F | 0xFF71..=0xFF9F => KATAKANA | VOWEL_ENDED | HALFWIDTH,
        _ => OTHER,
    }
}

#[inline]
fn is_alnum(class: u8) -> bool {
    matches!(class & SCRIPT_MASK, ALPHABET | DIGIT)
}

#[inline]
fn is_halfwidth(class: u8) -> bool {
    class & HALFWIDTH != 0
}

fn is_hyphen_like(value: &CodePointTuple) -> bool {
    value.size() == 1
        && value.first().is_some_and(|c| {
            matches!(
                c,
                '\u{002D}'
                    | '\u{2010}'
                    | '\u{2014}'
                    | '\u{2015}'
                    | '\u{2212}'
                    | '\u{FF0D}'
                    | '\u{FF70}'
                    | '\u{30FC}'
            )
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ProlongedSoundMarksOptions {
    /// Leave characters that an earlier rule already rewrote.
    pub skip_already_transliterated_chars: bool,
    pub allow_prolonged_hatsuon: bool,
    pub allow_prolonged_sokuon: bool,
    /// Turn hyphen-like runs after letters and digits into `-`/`－`.
    pub replace_prolonged_marks_following_alnums: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ProlongedSoundMarks {
    options: ProlongedSoundMarksOptions,
    prolongable: u8,
}

impl ProlongedSoundMarks {
    pub fn new(options: ProlongedSoundMarksOptions) -> Self {
        let mut prolongable = VOWEL_ENDED;
        if options.allow_prolonged_hatsuon {
            prolongable |= HATSUON;
        }
        if options.allow_prolonged_sokuon {
            prolongable |= SOKUON;
        }
        Self {
            options,
            prolongable,
        }
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => ProlongedSoundMarksOptions::default(),
            RuleOptions::ProlongedSoundMarks(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)))
    }

    #[inline]
    fn is_prolongable(&self, class: u8) -> bool {
        class & PROLONGED_SOUND_MARK == 0 && class & self.prolongable != 0
    }
}

impl Default for ProlongedSoundMarks {
    fn default() -> Self {
        Self::new(ProlongedSoundMarksOptions::default())
    }
}

impl Transliterator for ProlongedSoundMarks {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(ProlongedIter {
            rule: self,
            input,
            out: Emitter::new(pool),
            last: None,
        })
    }
}

struct ProlongedIter<'a> {
    rule: &'a ProlongedSoundMarks,
    input: CharIterator<'a>,
    out: Emitter<'a>,
    /// Class of the last character that was not hyphen-like.
    last: Option<u8>,
}

impl ProlongedIter<'_> {
    fn eligible(&self, c: &Char) -> bool {
        !self.rule.options.skip_already_transliterated_chars || !self.out.pool().is_transliterated(c)
    }

    /// Buffers a run of hyphen-like characters after an alphanumeric plus the
    /// character that ended it, then queues their replacements.
    fn replace_alnum_run(&mut self, first: Char, alnum: u8) {
        let mut run: SmallVec<[Char; 4]> = SmallVec::new();
        run.push(first);
        let mut ended_by = None;
        for next in self.input.by_ref() {
            if !next.is_sentinel() && is_hyphen_like(&next.value) {
                run.push(next);
            } else {
                ended_by = Some(next);
                break;
            }
        }
        if let Some(next) = &ended_by {
            self.last = Some(classify(&next.value));
        }
        let replace = run.iter().all(|c| self.eligible(c));
        let hyphen = CodePointTuple::from_char(if is_halfwidth(alnum) { '-' } else { '－' });
        for c in &run {
            if replace {
                self.out.enqueue(hyphen, c);
            } else {
                self.out.enqueue_pass(c);
            }
        }
        if let Some(next) = &ended_by {
            self.out.enqueue_pass(next);
        }
    }
}

impl Iterator for ProlongedIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        loop {
            if let Some(c) = self.out.pop() {
                return Some(c);
            }
            let c = self.input.next()?;
            if c.is_sentinel() {
                return Some(self.out.pass(&c));
            }
            if !is_hyphen_like(&c.value) {
                self.last = Some(classify(&c.value));
                return Some(self.out.pass(&c));
            }
            let Some(last) = self.last.filter(|_| self.eligible(&c)) else {
                return Some(self.out.pass(&c));
            };
            if self.rule.is_prolongable(last) {
                let mark = if is_halfwidth(last) { '\u{FF70}' } else { '\u{30FC}' };
                return Some(self.out.replace(CodePointTuple::from_char(mark), &c));
            }
            if self.rule.options.replace_prolonged_marks_following_alnums && is_alnum(last) {
                self.replace_alnum_run(c, last);
                continue;
            }
            return Some(self.out.pass(&c));
        }
    }
}

impl TransliteratorTestConfig for ProlongedSoundMarks {
    fn samples() -> &'static [&'static str] {
        &["カ-ド", "ｶ-", "ウッ－ウン－", "1ー－2ー3"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "かー", "カー", "ｶｰ", "ウッ－ウン－", "1ー－2ー3", "A-B", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("カ-ド", "カード"),
            ("ス\u{2015}パ\u{2212}", "スーパー"),
            ("ｶ-", "ｶｰ"),
            ("ほ\u{2010}", "ほー"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    fn with(options: ProlongedSoundMarksOptions) -> ProlongedSoundMarks {
        ProlongedSoundMarks::new(options)
    }

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(ProlongedSoundMarks::default());
    }

    #[test]
    fn hatsuon_and_sokuon_need_options() {
        let sokuon = with(ProlongedSoundMarksOptions {
            allow_prolonged_sokuon: true,
            ..Default::default()
        });
        let hatsuon = with(ProlongedSoundMarksOptions {
            allow_prolonged_hatsuon: true,
            ..Default::default()
        });
        assert_eq!(sokuon.transliterate_str("ウッ－ウン－"), "ウッーウン－");
        assert_eq!(hatsuon.transliterate_str("ウッ－ウン－"), "ウッ－ウンー");
    }

    #[test]
    fn alnum_runs_follow_width() {
        let rule = with(ProlongedSoundMarksOptions {
            replace_prolonged_marks_following_alnums: true,
            ..Default::default()
        });
        assert_eq!(rule.transliterate_str("1ー－2ー3"), "1--2-3");
        assert_eq!(rule.transliterate_str("１ー－２ー３"), "１－－２－３");
        assert_eq!(rule.transliterate_str("Aー"), "A-");
        assert_eq!(rule.transliterate_str("x－カ-"), "x-カー");
    }

    #[test]
    fn alnum_run_offsets() {
        let rule = with(ProlongedSoundMarksOptions {
            replace_prolonged_marks_following_alnums: true,
            ..Default::default()
        });
        let pool = CharPool::new();
        let out: Vec<Char> = rule.transliterate(&pool, pool.stream("1ーー2")).collect();
        assert_eq!(out.iter().map(|c| c.offset).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!(out[4].is_sentinel());
    }

    #[test]
    fn skip_already_transliterated() {
        let rule = with(ProlongedSoundMarksOptions {
            skip_already_transliterated_chars: true,
            ..Default::default()
        });
        let pool = CharPool::new();
        let src: Vec<Char> = pool.stream("カ\u{2212}カ-").collect();
        // Pretend an earlier rule produced the first dash.
        let rewritten = pool.derive(CodePointTuple::from_char('-'), 1, &src[1]);
        let input = vec![src[0], rewritten, src[2], src[3], src[4]];
        let out = rule
            .transliterate(&pool, CharIterator::new(input.into_iter()))
            .collect_string();
        assert_eq!(out, "カ-カー");
    }
}
