//! Hyphen, dash and bar unification under a configurable target charset.

use std::sync::LazyLock;

use crate::{
    char::{Char, CharPool},
    char_iter::CharIterator,
    table::{self, SortedTable, TableLoadError, decode_records},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
};

const NAME: &str = "hyphens";

/// Target repertoire for a hyphen-like character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HyphensVariant {
    Ascii,
    Jisx0201,
    Jisx0208_90,
    Jisx0208_90Windows,
    Jisx0208Verbatim,
}

impl HyphensVariant {
    const COUNT: usize = 5;

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Replacement per variant; `None` when the variant has no counterpart.
#[derive(Debug)]
pub struct HyphensRecord {
    fields: [Option<Box<[char]>>; HyphensVariant::COUNT],
}

impl HyphensRecord {
    pub fn get(&self, variant: HyphensVariant) -> Option<&[char]> {
        self.fields[variant.index()].as_deref()
    }
}

fn decode_hyphens(name: &'static str, bytes: &[u8]) -> Result<SortedTable<HyphensRecord>, TableLoadError> {
    let entries = decode_records(name, bytes, |w| {
        let key = w.tuple()?;
        let mut fields: [Option<Box<[char]>>; HyphensVariant::COUNT] = Default::default();
        for field in &mut fields {
            let scalars = w.scalars()?;
            *field = (!scalars.is_empty()).then_some(scalars);
        }
        Ok((key, HyphensRecord { fields }))
    })?;
    SortedTable::from_entries(name, entries)
}

static HYPHENS: LazyLock<Result<SortedTable<HyphensRecord>, TableLoadError>> =
    LazyLock::new(|| table::load(NAME, include_bytes!("../../data/hyphens.data"), decode_hyphens));

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct HyphensOptions {
    /// Variants tried in order; the first one with a mapping wins.
    pub precedence: Vec<HyphensVariant>,
}

impl Default for HyphensOptions {
    fn default() -> Self {
        Self {
            precedence: vec![HyphensVariant::Jisx0208_90],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hyphens {
    table: &'static SortedTable<HyphensRecord>,
    precedence: Vec<HyphensVariant>,
}

impl Hyphens {
    pub fn new(options: HyphensOptions) -> Result<Self, TransliteratorError> {
        Ok(Self {
            table: table::get(&HYPHENS)?,
            precedence: options.precedence,
        })
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => HyphensOptions::default(),
            RuleOptions::Hyphens(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)?))
    }

    fn lookup(&self, c: &Char) -> Option<&'static [char]> {
        let record = self.table.get(&c.value)?;
        self.precedence.iter().find_map(|&v| record.get(v))
    }
}

impl Transliterator for Hyphens {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        CharIterator::new(HyphensIter {
            rule: self,
            input,
            out: Emitter::new(pool),
        })
    }
}

struct HyphensIter<'a> {
    rule: &'a Hyphens,
    input: CharIterator<'a>,
    out: Emitter<'a>,
}

impl Iterator for HyphensIter<'_> {
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
            match self.rule.lookup(&c) {
                Some(scalars) => self.out.enqueue_scalars(scalars.iter().copied(), &c),
                None => return Some(self.out.pass(&c)),
            }
        }
    }
}

impl TransliteratorTestConfig for Hyphens {
    fn samples() -> &'static [&'static str] {
        &["A-B", "東京～大阪", "ハイフン‐ダッシュ—"]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("A-B", "A\u{2212}B"),
            ("東京～大阪", "東京〜大阪"),
            ("\u{2E3A}", "\u{2014}\u{2014}"),
            ("ｰ", "ー"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;
    use HyphensVariant::*;

    fn with(precedence: Vec<HyphensVariant>) -> Hyphens {
        Hyphens::new(HyphensOptions { precedence }).unwrap()
    }

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(Hyphens::new(Default::default()).unwrap());
    }

    #[test]
    fn precedence_falls_through_absent_variants() {
        // U+00A2 has no ASCII form.
        assert_eq!(with(vec![Ascii, Jisx0208_90]).transliterate_str("¢"), "¢");
        assert_eq!(with(vec![Ascii, Jisx0208_90Windows]).transliterate_str("¢"), "\u{FFE0}");
        assert_eq!(with(vec![Ascii]).transliterate_str("¢"), "¢");
        // U+2225 has only a JIS X 0208 form.
        assert_eq!(with(vec![Ascii, Jisx0208_90]).transliterate_str("\u{2225}"), "\u{2016}");
        assert_eq!(with(vec![Ascii]).transliterate_str("\u{2225}"), "\u{2225}");
    }

    #[test]
    fn precedence_order_decides_between_present_variants() {
        assert_eq!(with(vec![Ascii, Jisx0208_90]).transliterate_str("a-b"), "a-b");
        assert_eq!(with(vec![Jisx0208_90, Ascii]).transliterate_str("a-b"), "a\u{2212}b");
    }

    #[test]
    fn windows_then_jisx0201() {
        let rule = with(vec![Jisx0208_90Windows, Jisx0201]);
        assert_eq!(rule.transliterate_str("\u{2212}〜ー"), "\u{FF0D}\u{FF5E}ー");
        assert_eq!(rule.transliterate_str("\u{2015}"), "\u{2015}");
    }

    #[test]
    fn multi_scalar_offsets() {
        let rule = with(vec![Ascii]);
        let pool = CharPool::new();
        let out: Vec<Char> = rule.transliterate(&pool, pool.stream("\u{2E3B}x")).collect();
        let offsets: Vec<usize> = out.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4]);
    }
}
