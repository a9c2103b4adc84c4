//! Hiragana ⇄ katakana.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    char::CharPool,
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
    unicode::{KANA_ROWS, SMALL_KANA},
};

const NAME: &str = "hira-kata";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HiraKataMode {
    #[default]
    HiraToKata,
    KataToHira,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct HiraKataOptions {
    pub mode: HiraKataMode,
}

// (hiragana, katakana) for every letter both scripts share.
fn kana_pairs() -> impl Iterator<Item = (char, char)> {
    KANA_ROWS
        .iter()
        .flat_map(|row| {
            let voiced = row.hiragana_voiced.zip(row.katakana_voiced);
            let semi_voiced = row.hiragana_semi_voiced.zip(row.katakana_semi_voiced);
            std::iter::once((row.hiragana, row.katakana))
                .chain(voiced)
                .chain(semi_voiced)
        })
        .chain(SMALL_KANA.iter().map(|&(h, k, _)| (h, k)))
}

static HIRA_TO_KATA: LazyLock<HashMap<char, char>> = LazyLock::new(|| kana_pairs().collect());
static KATA_TO_HIRA: LazyLock<HashMap<char, char>> =
    LazyLock::new(|| kana_pairs().map(|(h, k)| (k, h)).collect());

#[derive(Debug, Clone, Copy)]
pub struct HiraKata {
    mapping: &'static HashMap<char, char>,
}

impl HiraKata {
    pub fn new(options: HiraKataOptions) -> Self {
        let mapping = match options.mode {
            HiraKataMode::HiraToKata => &*HIRA_TO_KATA,
            HiraKataMode::KataToHira => &*KATA_TO_HIRA,
        };
        Self { mapping }
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => HiraKataOptions::default(),
            RuleOptions::HiraKata(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)))
    }

    fn lookup(&self, value: &CodePointTuple) -> Option<char> {
        if value.size() != 1 {
            return None;
        }
        value.first().and_then(|c| self.mapping.get(&c).copied())
    }
}

impl Default for HiraKata {
    fn default() -> Self {
        Self::new(HiraKataOptions::default())
    }
}

impl Transliterator for HiraKata {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        let mut out = Emitter::new(pool);
        let mut input = input;
        CharIterator::new(std::iter::from_fn(move || {
            let c = input.next()?;
            Some(match self.lookup(&c.value) {
                Some(mapped) => out.replace(CodePointTuple::from_char(mapped), &c),
                None => out.pass(&c),
            })
        }))
    }
}

impl TransliteratorTestConfig for HiraKata {
    fn samples() -> &'static [&'static str] {
        &["ひらがな", "カタカナ", "ぱぴぷぺぽ", "ぁぃぅ"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "カタカナ", "日本", "ｶﾀｶﾅ", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("ひらがな", "ヒラガナ"),
            ("ゔぁいおりん", "ヴァイオリン"),
            ("がっこう", "ガッコウ"),
            ("ゖゕゎ", "ヶヵヮ"),
        ]
    }
}
