//! Expands iteration marks into the character they repeat: 佐々木 → 佐佐木,
//! いすゞ → いすず, ところゝ → ところろ.

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
    unicode::{is_kanji, is_semi_voiced, is_voiced, unvoiced_form, voiced_form},
};

const NAME: &str = "japanese-iteration-marks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Hiragana,
    Katakana,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Kana { script: Script, voiced: bool },
    Kanji,
}

impl Mark {
    fn of(c: char) -> Option<Self> {
        use Script::*;
        Some(match c {
            'ゝ' | '〱' => Mark::Kana { script: Hiragana, voiced: false },
            'ゞ' | '〲' => Mark::Kana { script: Hiragana, voiced: true },
            'ヽ' | '〳' => Mark::Kana { script: Katakana, voiced: false },
            'ヾ' | '〴' => Mark::Kana { script: Katakana, voiced: true },
            '々' => Mark::Kanji,
            _ => return None,
        })
    }
}

/// What a preceding unit can be repeated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeatable {
    Kana { script: Script, letter: char, voiced: bool },
    Kanji(CodePointTuple),
}

impl Repeatable {
    fn of(value: &CodePointTuple) -> Option<Self> {
        let first = value.first()?;
        if is_kanji(first) {
            // Selectors travel with the kanji.
            return Some(Repeatable::Kanji(*value));
        }
        if value.size() != 1 {
            return None;
        }
        let script = match first as u32 {
            0x3041..=0x3096 => Script::Hiragana,
            0x30A1..=0x30FA => Script::Katakana,
            _ => return None,
        };
        // Sokuon, hatsuon and semi-voiced kana are never repeated.
        if matches!(first, 'っ' | 'ッ' | 'ん' | 'ン') || is_semi_voiced(first) {
            return None;
        }
        Some(Repeatable::Kana {
            script,
            letter: first,
            voiced: is_voiced(first),
        })
    }

    fn expand(&self, mark: Mark) -> Option<CodePointTuple> {
        match (*self, mark) {
            (Repeatable::Kanji(value), Mark::Kanji) => Some(value),
            (
                Repeatable::Kana {
                    script,
                    letter,
                    voiced,
                },
                Mark::Kana {
                    script: mark_script,
                    voiced: mark_voiced,
                },
            ) if script == mark_script => {
                let repeated = match (voiced, mark_voiced) {
                    (false, false) | (true, true) => Some(letter),
                    (true, false) => unvoiced_form(letter),
                    (false, true) => voiced_form(letter),
                }?;
                Some(CodePointTuple::from_char(repeated))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseIterationMarks;

impl JapaneseIterationMarks {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        options.expect_default(NAME)?;
        Ok(Box::new(Self))
    }
}

impl Transliterator for JapaneseIterationMarks {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(IterationMarksIter {
            input,
            out: Emitter::new(pool),
            prev: None,
            prev_was_mark: false,
        })
    }
}

struct IterationMarksIter<'a> {
    input: CharIterator<'a>,
    out: Emitter<'a>,
    prev: Option<Repeatable>,
    prev_was_mark: bool,
}

impl Iterator for IterationMarksIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        let c = self.input.next()?;
        if c.is_sentinel() {
            return Some(self.out.pass(&c));
        }
        let mark = if c.value.size() == 1 {
            c.value.first().and_then(Mark::of)
        } else {
            None
        };
        let Some(mark) = mark else {
            self.prev = Repeatable::of(&c.value);
            self.prev_was_mark = false;
            return Some(self.out.pass(&c));
        };
        // Only the first of consecutive marks is expanded; the repeated
        // character stays the reference.
        let expanded = if self.prev_was_mark {
            None
        } else {
            self.prev.and_then(|p| p.expand(mark))
        };
        self.prev_was_mark = true;
        Some(match expanded {
            Some(value) => self.out.replace(value, &c),
            None => self.out.pass(&c),
        })
    }
}

impl TransliteratorTestConfig for JapaneseIterationMarks {
    fn samples() -> &'static [&'static str] {
        &["佐々木", "いすゞ", "ところゝ", "バヽ", "々"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "々", "んゝ", "っゝ", "ぱゝ", "ゝ", "日本", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("佐々木", "佐佐木"),
            ("時々", "時時"),
            ("いすゞ", "いすず"),
            ("ところゝ", "ところろ"),
            ("がゝ", "がか"),
            ("がゞ", "がが"),
            ("カヽ", "カカ"),
            ("カヾ", "カガ"),
            ("ウヾ", "ウヴ"),
            ("こ〱", "ここ"),
        ]
    }
}
