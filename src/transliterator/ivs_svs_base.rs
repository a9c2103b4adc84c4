//! Moves kanji between bare code points and their ideographic/standardized
//! variation sequences.
//!
//! `IvsOrSvs` mode attaches a selector to a bare base character; `Base` mode
//! strips it again, resolving compatibility ideographs to the base that the
//! chosen JIS charset expects.
//!
//! The bundled `data/ivs_svs_base.data` is a partial selection of records,
//! enough for the kanji-old-new chain and common IVS kanji. Characters
//! without a record pass through untouched.

use std::{collections::HashSet, sync::LazyLock};

use crate::{
    char::CharPool,
    char_iter::CharIterator,
    codepoint::{ABSENT, CodePointTuple},
    table::{self, SortedTable, TableLoadError, decode_records},
    testing::transliterator_contract::TransliteratorTestConfig,
    transliterator::{Emitter, RuleOptions, Transliterator, TransliteratorError},
    unicode::is_variation_selector,
};

const NAME: &str = "ivs-svs-base";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IvsSvsRecord {
    pub ivs: CodePointTuple,
    pub svs: Option<CodePointTuple>,
    pub base90: Option<char>,
    pub base2004: Option<char>,
}

impl IvsSvsRecord {
    fn base(&self, charset: Charset) -> Option<char> {
        match charset {
            Charset::Unijis90 => self.base90,
            Charset::Unijis2004 => self.base2004,
        }
    }
}

/// Decoded records plus the three lookup indexes built from them.
#[derive(Debug)]
pub struct IvsSvsTables {
    records: Box<[IvsSvsRecord]>,
    by_variant: SortedTable<usize>,
    by_base90: SortedTable<usize>,
    by_base2004: SortedTable<usize>,
}

impl IvsSvsTables {
    fn record(&self, index: Option<&usize>) -> Option<&IvsSvsRecord> {
        index.and_then(|&i| self.records.get(i))
    }

    /// Record for an IVS or SVS tuple.
    pub fn by_variant(&self, key: &CodePointTuple) -> Option<&IvsSvsRecord> {
        self.record(self.by_variant.get(key))
    }

    /// First record whose charset base is `key`.
    pub fn by_base(&self, key: &CodePointTuple, charset: Charset) -> Option<&IvsSvsRecord> {
        let index = match charset {
            Charset::Unijis90 => self.by_base90.get(key),
            Charset::Unijis2004 => self.by_base2004.get(key),
        };
        self.record(index)
    }
}

fn optional_tuple(t: CodePointTuple) -> Option<CodePointTuple> {
    (!t.is_empty()).then_some(t)
}

fn optional_scalar(cp: i32) -> Option<char> {
    if cp == ABSENT {
        return None;
    }
    u32::try_from(cp).ok().and_then(char::from_u32)
}

fn base_index(
    name: &'static str,
    records: &[IvsSvsRecord],
    base: impl Fn(&IvsSvsRecord) -> Option<char>,
) -> Result<SortedTable<usize>, TableLoadError> {
    let mut seen = HashSet::new();
    let entries = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| base(r).map(|b| (CodePointTuple::from_char(b), i)))
        .filter(|(key, _)| seen.insert(*key))
        .collect();
    SortedTable::from_unsorted(name, entries)
}

fn decode_ivs_svs(name: &'static str, bytes: &[u8]) -> Result<IvsSvsTables, TableLoadError> {
    let rows = decode_records(name, bytes, |w| {
        let ivs = w.tuple()?;
        let svs = optional_tuple(w.tuple()?);
        let base90 = optional_scalar(w.slot()?);
        let base2004 = optional_scalar(w.slot()?);
        Ok((
            ivs,
            IvsSvsRecord {
                ivs,
                svs,
                base90,
                base2004,
            },
        ))
    })?;
    let records: Box<[IvsSvsRecord]> = rows.into_iter().map(|(_, r)| r).collect();

    let variants = records
        .iter()
        .enumerate()
        .flat_map(|(i, r)| std::iter::once((r.ivs, i)).chain(r.svs.map(|svs| (svs, i))))
        .collect();
    let by_variant = SortedTable::from_unsorted(name, variants)?;
    let by_base90 = base_index(name, &records, |r| r.base90)?;
    let by_base2004 = base_index(name, &records, |r| r.base2004)?;
    Ok(IvsSvsTables {
        records,
        by_variant,
        by_base90,
        by_base2004,
    })
}

static IVS_SVS_BASE: LazyLock<Result<IvsSvsTables, TableLoadError>> =
    LazyLock::new(|| table::load(NAME, include_bytes!("../../data/ivs_svs_base.data"), decode_ivs_svs));

/// Direction of the conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum IvsSvsBaseMode {
    /// Bare base character → variation sequence.
    IvsOrSvs,
    /// Variation sequence → bare base character.
    #[default]
    Base,
}

/// JIS repertoire the base characters are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Charset {
    Unijis90,
    #[default]
    Unijis2004,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct IvsSvsBaseOptions {
    pub mode: IvsSvsBaseMode,
    pub charset: Charset,
    pub prefer_svs: bool,
    pub drop_selectors_altogether: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct IvsSvsBase {
    tables: &'static IvsSvsTables,
    options: IvsSvsBaseOptions,
}

impl IvsSvsBase {
    pub fn new(options: IvsSvsBaseOptions) -> Result<Self, TransliteratorError> {
        Ok(Self {
            tables: table::get(&IVS_SVS_BASE)?,
            options,
        })
    }

    pub(crate) fn factory(options: RuleOptions) -> Result<Box<dyn Transliterator>, TransliteratorError> {
        let options = match options {
            RuleOptions::Default => IvsSvsBaseOptions::default(),
            RuleOptions::IvsSvsBase(o) => o,
            other => return Err(other.mismatch(NAME)),
        };
        Ok(Box::new(Self::new(options)?))
    }

    fn to_variant(&self, value: &CodePointTuple) -> Option<CodePointTuple> {
        let record = self.tables.by_base(value, self.options.charset)?;
        match record.svs {
            Some(svs) if self.options.prefer_svs => Some(svs),
            _ => Some(record.ivs),
        }
    }

    fn to_base(&self, value: &CodePointTuple) -> Option<CodePointTuple> {
        let base = self
            .tables
            .by_variant(value)
            .and_then(|r| r.base(self.options.charset));
        if let Some(base) = base {
            return Some(CodePointTuple::from_char(base));
        }
        if self.options.drop_selectors_altogether && value.second().is_some_and(is_variation_selector) {
            return Some(CodePointTuple::single(value.0));
        }
        None
    }
}

impl Transliterator for IvsSvsBase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn transliterate<'a>(&'a self, pool: &'a CharPool, input: CharIterator<'a>) -> CharIterator<'a> {
        let mut out = Emitter::new(pool);
        let mut input = input;
        CharIterator::new(std::iter::from_fn(move || {
            let c = input.next()?;
            if c.is_sentinel() {
                return Some(out.pass(&c));
            }
            let mapped = match self.options.mode {
                IvsSvsBaseMode::IvsOrSvs => self.to_variant(&c.value),
                IvsSvsBaseMode::Base => self.to_base(&c.value),
            };
            Some(match mapped {
                Some(value) => out.replace(value, &c),
                None => out.pass(&c),
            })
        }))
    }
}

impl TransliteratorTestConfig for IvsSvsBase {
    fn samples() -> &'static [&'static str] {
        &["辻\u{E0101}", "塚\u{FE00}", "舊字體", "葛\u{E0100}"]
    }
    fn should_pass_through() -> &'static [&'static str] {
        &["hello", "日本", "舊字體", "葛\u{E0100}", ""]
    }
    fn should_transform() -> &'static [(&'static str, &'static str)] {
        &[
            ("辻\u{E0101}", "辻"),
            ("塚\u{FE00}", "\u{FA10}"),
            ("塚\u{E0101}", "\u{FA10}"),
            ("舊\u{E0100}字\u{E0100}", "舊字"),
        ]
    }
}

#[cfg(test)]
mod contract_tests {
    use super::*;
    use crate::assert_transliterator_contract;

    fn rule(mode: IvsSvsBaseMode, charset: Charset) -> IvsSvsBase {
        IvsSvsBase::new(IvsSvsBaseOptions {
            mode,
            charset,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn universal_contract_compliance() {
        assert_transliterator_contract!(IvsSvsBase::new(Default::default()).unwrap());
    }

    #[test]
    fn charset_selects_the_base() {
        let to_base90 = rule(IvsSvsBaseMode::Base, Charset::Unijis90);
        let to_base2004 = rule(IvsSvsBaseMode::Base, Charset::Unijis2004);
        assert_eq!(to_base90.transliterate_str("辻\u{E0100}"), "辻");
        assert_eq!(to_base90.transliterate_str("辻\u{E0101}"), "辻\u{E0101}");
        assert_eq!(to_base2004.transliterate_str("辻\u{E0100}"), "辻\u{E0100}");
    }

    #[test]
    fn forward_picks_ivs_unless_svs_preferred() {
        let forward = rule(IvsSvsBaseMode::IvsOrSvs, Charset::Unijis2004);
        assert_eq!(forward.transliterate_str("辻舊"), "辻\u{E0101}舊\u{E0100}");
        assert_eq!(forward.transliterate_str("\u{FA10}"), "塚\u{E0101}");
        let prefer = IvsSvsBase::new(IvsSvsBaseOptions {
            mode: IvsSvsBaseMode::IvsOrSvs,
            prefer_svs: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(prefer.transliterate_str("\u{FA10}"), "塚\u{FE00}");
        assert_eq!(prefer.transliterate_str("舊"), "舊\u{E0100}");
    }

    #[test]
    fn drop_selectors_altogether() {
        let rule = IvsSvsBase::new(IvsSvsBaseOptions {
            drop_selectors_altogether: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.transliterate_str("葛\u{E0100}"), "葛");
        assert_eq!(rule.transliterate_str("♡\u{FE0F}"), "♡");
        assert_eq!(rule.transliterate_str("か\u{3099}"), "か\u{3099}");
    }
}
