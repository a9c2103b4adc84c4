//! Fuses a kana and a following (semi-)voiced sound mark: か + ゛ → が.

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
    unicode::{
        COMBINING_SEMI_VOICED_MARK, COMBINING_VOICED_MARK, SEMI_VOICED_MARK, VOICED_MARK,
        semi_voiced_form, voiced_form,
    },
};

const NAME: &str = "hira-kata-composition";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct HiraKataCompositionOptions {
    /// Also fuse the spacing marks U+309B/U+309C.
    pub compose_non_combining_marks: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HiraKataComposition {
    options: HiraKataCompositionOptions,
}

impl HiraKataComposition {
    pub fn new(options: HiraKataCompositionOptions) -> Self {
        Self { options }
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => HiraKataCompositionOptions::default(),
            RuleOptions::HiraKataComposition(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)))
    }

    fn compose(&self, base: &CodePointTuple, mark: &CodePointTuple) -> Option<CodePointTuple> {
        if base.size() != 1 || mark.size() != 1 {
            return None;
        }
        let (base, mark) = (base.first()?, mark.first()?);
        let composed = match mark {
            COMBINING_VOICED_MARK => voiced_form(base),
            COMBINING_SEMI_VOICED_MARK => semi_voiced_form(base),
            VOICED_MARK if self.options.compose_non_combining_marks => voiced_form(base),
            SEMI_VOICED_MARK if self.options.compose_non_combining_marks => semi_voiced_form(base),
            _ => None,
        }?;
        Some(CodePointTuple::from_char(composed))
    }
}

impl Transliterator for HiraKataComposition {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(CompositionIter {
            rule: self,
            input,
            out: Emitter::new(pool),
            pending: None,
        })
    }
}

/// Holds back one unit until the next one shows whether it is a mark.
struct CompositionIter<'a> {
    rule: &'a HiraKataComposition,
    input: CharIterator<'a>,
    out: Emitter<'a>,
    pending: Option<Char>,
}

impl Iterator for CompositionIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        loop {
            let Some(c) = self.input.next() else {
                return self.pending.take().map(|p| self.out.pass(&p));
            };
            let Some(p) = self.pending.take() else {
                self.pending = Some(c);
                continue;
            };
            if let Some(composed) = self.rule.compose(&p.value, &c.value) {
                return Some(self.out.replace(composed, &p));
            }
            self.pending = Some(c);
            return Some(self.out.pass(&p));
        }
    }
}

impl TransliteratorTestConfig for HiraKataComposition {
    fn samples() -> &'static [&'static str] {
        &["か\u{3099}", "ハ\u{309A}", "う\u{3099}", "ゝ\u{3099}"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "か\u{309B}", "が", "a\u{3099}", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("か\u{3099}き\u{3099}", "がぎ"),
            ("ハ\u{309A}ン", "パン"),
            ("う\u{3099}ワ\u{3099}", "ゔヷ"),
            ("ゝ\u{3099}ヽ\u{3099}〱\u{3099}", "ゞヾ〲"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(HiraKataComposition::default());
        assert_transliterator_contract!(HiraKataComposition::new(HiraKataCompositionOptions {
            compose_non_combining_marks: true
        }));
    }

    #[test]
    fn non_combining_marks_need_the_option() {
        let rule = HiraKataComposition::new(HiraKataCompositionOptions {
            compose_non_combining_marks: true,
        });
        assert_eq!(rule.transliterate_str("か\u{309B}ほ\u{309C}"), "がぽ");
        assert_eq!(HiraKataComposition::default().transliterate_str("か\u{309B}"), "か\u{309B}");
    }

    #[test]
    fn mark_without_base_survives() {
        let rule = HiraKataComposition::default();
        assert_eq!(rule.transliterate_str("\u{3099}か"), "\u{3099}か");
        assert_eq!(rule.transliterate_str("ま\u{3099}"), "ま\u{3099}");
        assert_eq!(rule.transliterate_str("か\u{3099}\u{3099}"), "が\u{3099}");
    }

    #[test]
    fn composed_offsets_shrink() {
        let rule = HiraKataComposition::default();
        let pool = CharPool::new();
        let out: Vec<Char> = rule
            .transliterate(&pool, pool.stream("か\u{3099}x"))
            .collect();
        let got: Vec<(String, usize)> = out.iter().map(|c| (c.value.to_string(), c.offset)).collect();
        assert_eq!(got, vec![("が".into(), 0), ("x".into(), 1), ("".into(), 2)]);
    }
}
