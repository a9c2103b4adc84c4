//! Full-width ⇄ half-width conversion along the JIS X 0201 repertoire.
//!
//! GL covers ASCII-range letters, digits and symbols; GR covers half-width
//! katakana and the Japanese punctuation JIS X 0201 encodes. A handful of
//! code points (U+005C, U+007E, U+00A5) are ambiguous between charsets and
//! are resolved by explicit override flags.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    codepoint::CodePointTuple,
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
    unicode::{
        COMBINING_SEMI_VOICED_MARK, COMBINING_VOICED_MARK, HALFWIDTH_SEMI_VOICED_MARK,
        HALFWIDTH_VOICED_MARK, KANA_ROWS, KanaRow, SMALL_KANA,
    },
};

const NAME: &str = "jisx0201-and-alike";

// ── Static tables (full-width → half-width) ──

/// U+3000 and U+FF01–U+FF5D, except U+FF3C which only maps through an override.
fn gl_table() -> impl Iterator<Item = (char, char)> {
    let fullwidth_ascii = (0xFF01u32..=0xFF5D)
        .filter(|&cp| cp != 0xFF3C)
        .filter_map(|cp| Some((char::from_u32(cp)?, char::from_u32(cp - 0xFEE0)?)));
    std::iter::once(('\u{3000}', ' ')).chain(fullwidth_ascii)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlOverride {
    U005cAsYenSign,
    U005cAsBackslash,
    U007eAsFullwidthTilde,
    U007eAsWaveDash,
    U007eAsOverline,
    U007eAsFullwidthMacron,
    U00a5AsYenSign,
}

// Applied in this order; a later override wins on a shared key.
const GL_OVERRIDES: [(GlOverride, char, char); 7] = [
    (GlOverride::U005cAsYenSign, '\u{FFE5}', '\u{005C}'),
    (GlOverride::U005cAsBackslash, '\u{FF3C}', '\u{005C}'),
    (GlOverride::U007eAsFullwidthTilde, '\u{FF5E}', '\u{007E}'),
    (GlOverride::U007eAsWaveDash, '\u{301C}', '\u{007E}'),
    (GlOverride::U007eAsOverline, '\u{203E}', '\u{007E}'),
    (GlOverride::U007eAsFullwidthMacron, '\u{FFE3}', '\u{007E}'),
    (GlOverride::U00a5AsYenSign, '\u{FFE5}', '\u{00A5}'),
];

const UNSAFE_SPECIALS: [(char, char); 1] = [('\u{30A0}', '=')];

const GR_PUNCTUATION: [(char, char); 8] = [
    ('。', '｡'),
    ('「', '｢'),
    ('」', '｣'),
    ('、', '､'),
    ('・', '･'),
    ('ー', 'ｰ'),
    ('゛', 'ﾞ'),
    ('゜', 'ﾟ'),
];

fn gr_table() -> impl Iterator<Item = (char, char)> {
    let katakana = KANA_ROWS
        .iter()
        .filter_map(|row| Some((row.katakana, row.halfwidth?)));
    let small = SMALL_KANA.iter().filter_map(|&(_, k, hw)| Some((k, hw?)));
    GR_PUNCTUATION.into_iter().chain(katakana).chain(small)
}

/// Letters whose half-width form needs a trailing sound mark.
fn voiced_letters(
    pick: impl Fn(&KanaRow) -> (Option<char>, Option<char>),
) -> impl Iterator<Item = (char, CodePointTuple)> {
    KANA_ROWS.iter().flat_map(move |row| {
        let (voiced, semi_voiced) = pick(row);
        let hw = row.halfwidth;
        let with_mark = move |letter: Option<char>, mark: char| {
            Some((letter?, CodePointTuple::pair(hw? as i32, mark as i32)))
        };
        with_mark(voiced, HALFWIDTH_VOICED_MARK)
            .into_iter()
            .chain(with_mark(semi_voiced, HALFWIDTH_SEMI_VOICED_MARK))
    })
}

fn hiragana_table() -> impl Iterator<Item = (char, CodePointTuple)> {
    let base = KANA_ROWS
        .iter()
        .filter_map(|row| Some((row.hiragana, CodePointTuple::from_char(row.halfwidth?))));
    let voiced = voiced_letters(|row| (row.hiragana_voiced, row.hiragana_semi_voiced));
    let small = SMALL_KANA
        .iter()
        .filter_map(|&(h, _, hw)| Some((h, CodePointTuple::from_char(hw?))));
    base.chain(voiced).chain(small)
}

/// Half-width base → (voiced, semi-voiced) full-width katakana.
static VOICED_REVERSE: LazyLock<HashMap<char, (Option<char>, Option<char>)>> = LazyLock::new(|| {
    KANA_ROWS
        .iter()
        .filter_map(|row| {
            let hw = row.halfwidth?;
            (row.katakana_voiced.is_some() || row.katakana_semi_voiced.is_some())
                .then_some((hw, (row.katakana_voiced, row.katakana_semi_voiced)))
        })
        .collect()
});

// ── Options ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Jisx0201AndAlikeOptions {
    /// `true`: full-width → half-width. `false`: the reverse.
    pub fullwidth_to_halfwidth: bool,
    pub convert_gl: bool,
    pub convert_gr: bool,
    /// Forward only: hiragana → half-width katakana.
    pub convert_hiraganas: bool,
    /// Reverse only: fuse ｶﾞ into ガ.
    pub combine_voiced_sound_marks: bool,
    /// U+30A0 ⇄ `=`.
    pub convert_unsafe_specials: Option<bool>,
    pub u005c_as_yen_sign: Option<bool>,
    pub u005c_as_backslash: Option<bool>,
    pub u007e_as_fullwidth_tilde: Option<bool>,
    pub u007e_as_wave_dash: Option<bool>,
    pub u007e_as_overline: Option<bool>,
    pub u007e_as_fullwidth_macron: Option<bool>,
    pub u00a5_as_yen_sign: Option<bool>,
}

impl Default for Jisx0201AndAlikeOptions {
    fn default() -> Self {
        Self {
            fullwidth_to_halfwidth: true,
            convert_gl: true,
            convert_gr: true,
            convert_hiraganas: false,
            combine_voiced_sound_marks: true,
            convert_unsafe_specials: None,
            u005c_as_yen_sign: None,
            u005c_as_backslash: None,
            u007e_as_fullwidth_tilde: None,
            u007e_as_wave_dash: None,
            u007e_as_overline: None,
            u007e_as_fullwidth_macron: None,
            u00a5_as_yen_sign: None,
        }
    }
}

impl Jisx0201AndAlikeOptions {
    /// Unset flags resolved against the direction's defaults.
    fn resolve(&self) -> (bool, Vec<GlOverride>) {
        let forward = self.fullwidth_to_halfwidth;
        let unsafe_specials = self.convert_unsafe_specials.unwrap_or(forward);
        let tilde_default = forward
            || (self.u007e_as_wave_dash.is_none()
                && self.u007e_as_overline.is_none()
                && self.u007e_as_fullwidth_macron.is_none());
        let flags = [
            (
                GlOverride::U005cAsYenSign,
                self.u005c_as_yen_sign.unwrap_or(if forward {
                    self.u00a5_as_yen_sign.is_none()
                } else {
                    self.u005c_as_backslash.is_none()
                }),
            ),
            (GlOverride::U005cAsBackslash, self.u005c_as_backslash.unwrap_or(false)),
            (
                GlOverride::U007eAsFullwidthTilde,
                self.u007e_as_fullwidth_tilde.unwrap_or(tilde_default),
            ),
            (GlOverride::U007eAsWaveDash, self.u007e_as_wave_dash.unwrap_or(forward)),
            (GlOverride::U007eAsOverline, self.u007e_as_overline.unwrap_or(false)),
            (
                GlOverride::U007eAsFullwidthMacron,
                self.u007e_as_fullwidth_macron.unwrap_or(false),
            ),
            (GlOverride::U00a5AsYenSign, self.u00a5_as_yen_sign.unwrap_or(!forward)),
        ];
        let overrides = flags.into_iter().filter(|(_, on)| *on).map(|(o, _)| o).collect();
        (unsafe_specials, overrides)
    }

    fn build_mapping(&self) -> HashMap<CodePointTuple, CodePointTuple> {
        let (unsafe_specials, overrides) = self.resolve();
        let single = CodePointTuple::from_char;
        let mut pairs: Vec<(CodePointTuple, CodePointTuple)> = Vec::new();
        if self.convert_gl {
            pairs.extend(gl_table().map(|(fw, hw)| (single(fw), single(hw))));
            pairs.extend(
                GL_OVERRIDES
                    .iter()
                    .filter(|(o, _, _)| overrides.contains(o))
                    .map(|&(_, fw, hw)| (single(fw), single(hw))),
            );
            if unsafe_specials {
                pairs.extend(UNSAFE_SPECIALS.iter().map(|&(fw, hw)| (single(fw), single(hw))));
            }
        }
        if self.convert_gr {
            pairs.extend(gr_table().map(|(fw, hw)| (single(fw), single(hw))));
            if self.fullwidth_to_halfwidth {
                pairs.extend(
                    voiced_letters(|row| (row.katakana_voiced, row.katakana_semi_voiced))
                        .map(|(fw, hw)| (single(fw), hw)),
                );
                pairs.push((single(COMBINING_VOICED_MARK), single(HALFWIDTH_VOICED_MARK)));
                pairs.push((
                    single(COMBINING_SEMI_VOICED_MARK),
                    single(HALFWIDTH_SEMI_VOICED_MARK),
                ));
                if self.convert_hiraganas {
                    pairs.extend(hiragana_table().map(|(fw, hw)| (single(fw), hw)));
                }
            }
        }
        if self.fullwidth_to_halfwidth {
            pairs.into_iter().collect()
        } else {
            pairs.into_iter().map(|(fw, hw)| (hw, fw)).collect()
        }
    }
}

// ── Transliterator ──

#[derive(Debug, Clone)]
pub struct Jisx0201AndAlike {
    mapping: HashMap<CodePointTuple, CodePointTuple>,
    /// Set in the reverse direction when half-width sound marks are fused.
    voiced: Option<&'static HashMap<char, (Option<char>, Option<char>)>>,
}

impl Jisx0201AndAlike {
    pub fn new(options: Jisx0201AndAlikeOptions) -> Self {
        let combine = !options.fullwidth_to_halfwidth
            && options.combine_voiced_sound_marks
            && options.convert_gr;
        Self {
            mapping: options.build_mapping(),
            voiced: combine.then(|| &*VOICED_REVERSE),
        }
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => Jisx0201AndAlikeOptions::default(),
            RuleOptions::Jisx0201AndAlike(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)))
    }

    /// Full-width letter for a half-width base and a following sound mark.
    fn combine(&self, base: &CodePointTuple, mark: &CodePointTuple) -> Option<char> {
        let (voiced, semi_voiced) = self.voiced?.get(&base.first()?)?;
        if mark.is_char(HALFWIDTH_VOICED_MARK) {
            *voiced
        } else if mark.is_char(HALFWIDTH_SEMI_VOICED_MARK) {
            *semi_voiced
        } else {
            None
        }
    }

    fn starts_combination(&self, value: &CodePointTuple) -> bool {
        match (self.voiced, value.first()) {
            (Some(voiced), Some(c)) if value.size() == 1 => voiced.contains_key(&c),
            _ => false,
        }
    }
}

impl Default for Jisx0201AndAlike {
    fn default() -> Self {
        Self::new(Jisx0201AndAlikeOptions::default())
    }
}

impl Transliterator for Jisx0201AndAlike {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(WidthIter {
            rule: self,
            input,
            out: Emitter::new(pool),
            pending: None,
        })
    }
}

struct WidthIter<'a> {
    rule: &'a Jisx0201AndAlike,
    input: CharIterator<'a>,
    out: Emitter<'a>,
    /// Half-width base held back until the next unit is known.
    pending: Option<Char>,
}

impl WidthIter<'_> {
    fn map(&mut self, c: &Char) -> Char {
        match self.rule.mapping.get(&c.value) {
            Some(mapped) => self.out.replace(*mapped, c),
            None => self.out.pass(c),
        }
    }

    fn queue(&mut self, c: &Char) {
        match self.rule.mapping.get(&c.value) {
            Some(mapped) => self.out.enqueue(*mapped, c),
            None => self.out.enqueue_pass(c),
        }
    }
}

impl Iterator for WidthIter<'_> {
    type Item = Char;

    fn next(&mut self) -> Option<Char> {
        loop {
            if let Some(c) = self.out.pop() {
                return Some(c);
            }
            let Some(c) = self.input.next() else {
                return self.pending.take().map(|p| self.map(&p));
            };
            if let Some(p) = self.pending.take() {
                if let Some(combined) = self.rule.combine(&p.value, &c.value) {
                    return Some(self.out.replace(CodePointTuple::from_char(combined), &p));
                }
                let flushed = self.map(&p);
                if self.rule.starts_combination(&c.value) {
                    self.pending = Some(c);
                } else {
                    self.queue(&c);
                }
                return Some(flushed);
            }
            if self.rule.starts_combination(&c.value) {
                self.pending = Some(c);
                continue;
            }
            return Some(self.map(&c));
        }
    }
}

impl TransliteratorTestConfig for Jisx0201AndAlike {
    fn samples() -> &'static [&'static str] {
        &["ＡＢＣ１２３", "アイウエオ", "ガギグ", "パピプ", "あいう"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "abc def", "日本", "あいう", "ｱｲｳ", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("ＡＢＣ　１２３", "ABC 123"),
            ("アイウエオ", "ｱｲｳｴｵ"),
            ("ガパヴ", "ｶﾞﾊﾟｳﾞ"),
            ("「テスト」。", "｢ﾃｽﾄ｣｡"),
            ("～〜", "~~"),
            ("￥", "\\"),
            ("゠", "="),
            ("か\u{3099}", "かﾞ"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    fn reverse() -> Jisx0201AndAlike {
        Jisx0201AndAlike::new(Jisx0201AndAlikeOptions {
            fullwidth_to_halfwidth: false,
            ..Default::default()
        })
    }

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(Jisx0201AndAlike::default());
    }

    #[test]
    fn forward_overrides() {
        assert_eq!(Jisx0201AndAlike::default().transliterate_str("＼"), "＼");
        let rule = Jisx0201AndAlike::new(Jisx0201AndAlikeOptions {
            u005c_as_backslash: Some(true),
            u00a5_as_yen_sign: Some(true),
            u007e_as_wave_dash: Some(false),
            ..Default::default()
        });
        assert_eq!(rule.transliterate_str("＼￥〜"), "\\¥〜");
    }

    #[test]
    fn forward_hiraganas_need_the_option() {
        let rule = Jisx0201AndAlike::new(Jisx0201AndAlikeOptions {
            convert_hiraganas: true,
            ..Default::default()
        });
        assert_eq!(rule.transliterate_str("がっこう"), "ｶﾞｯｺｳ");
        assert_eq!(Jisx0201AndAlike::default().transliterate_str("がっこう"), "がっこう");
    }

    #[test]
    fn reverse_fuses_sound_marks() {
        let rule = reverse();
        assert_eq!(rule.transliterate_str("ﾃｽﾄﾓｼﾞﾚﾂ"), "テストモジレツ");
        assert_eq!(rule.transliterate_str("ｶﾞﾊﾟｳﾞｶ"), "ガパヴカ");
        assert_eq!(rule.transliterate_str("ｱﾞ"), "ア゛");
        assert_eq!(rule.transliterate_str("ﾊﾞﾊﾞ"), "ババ");
        assert_eq!(rule.transliterate_str("ｶｶﾞ"), "カガ");
    }

    #[test]
    fn reverse_without_fusing() {
        let rule = Jisx0201AndAlike::new(Jisx0201AndAlikeOptions {
            fullwidth_to_halfwidth: false,
            combine_voiced_sound_marks: false,
            ..Default::default()
        });
        assert_eq!(rule.transliterate_str("ｶﾞ"), "カ゛");
    }

    #[test]
    fn reverse_gl_defaults() {
        let rule = reverse();
        assert_eq!(rule.transliterate_str("ABC 123"), "ＡＢＣ　１２３");
        assert_eq!(rule.transliterate_str("\\~¥"), "￥～￥");
        assert_eq!(rule.transliterate_str("="), "＝");
        let wave = Jisx0201AndAlike::new(Jisx0201AndAlikeOptions {
            fullwidth_to_halfwidth: false,
            u007e_as_wave_dash: Some(true),
            ..Default::default()
        });
        assert_eq!(wave.transliterate_str("~"), "〜");
    }

    #[test]
    fn reverse_offsets_stay_contiguous() {
        let rule = reverse();
        let pool = CharPool::new();
        let out: Vec<Char> = rule.transliterate(&pool, pool.stream("ｶﾞｱｶ")).collect();
        let got: Vec<(String, usize)> = out.iter().map(|c| (c.value.to_string(), c.offset)).collect();
        assert_eq!(
            got,
            vec![
                ("ガ".into(), 0),
                ("ア".into(), 1),
                ("カ".into(), 2),
                ("".into(), 3)
            ]
        );
    }

    #[test]
    fn forward_pairs_count_two_scalars() {
        let rule = Jisx0201AndAlike::default();
        let pool = CharPool::new();
        let out: Vec<Char> = rule.transliterate(&pool, pool.stream("ガア")).collect();
        assert_eq!(out.iter().map(|c| c.offset).collect::<Vec<_>>(), vec![0, 2, 3]);
    }
}
